use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::settings::types::Settings;

/// Environment variable naming the settings file.
pub const CONFIG_ENV: &str = "POSECAST_CONFIG";

/// Settings file used when `POSECAST_CONFIG` is unset.
pub const DEFAULT_CONFIG_FILE: &str = "posecast.json";

/// Settings load/save errors.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("could not read settings {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid settings {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("could not serialise settings: {0}")]
    Serialize(serde_json::Error),

    #[error("could not write settings {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Resolve the settings path from the environment.
pub fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

/// Load settings from a JSON file, returning defaults on a missing file.
pub fn load(path: &Path) -> Result<Settings, SettingsError> {
    if !path.exists() {
        return Ok(Settings::default());
    }
    let contents = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Save settings atomically (write .tmp then rename).
pub fn save(path: &Path, settings: &Settings) -> Result<(), SettingsError> {
    let write_err = |source| SettingsError::Write {
        path: path.to_path_buf(),
        source,
    };

    let json = serde_json::to_string_pretty(settings).map_err(SettingsError::Serialize)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }

    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, &json).map_err(write_err)?;
    std::fs::rename(&tmp_path, path).map_err(write_err)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn load_returns_default_when_file_missing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nonexistent.json");
        let result = load(&path).unwrap();
        assert_eq!(result, Settings::default());
    }

    #[test]
    fn load_parses_valid_json_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("posecast.json");
        let json = r#"{"capture":{"delay_ms":1000},"stream":{"host":"10.0.0.5","port":9999}}"#;
        std::fs::write(&path, json).unwrap();

        let result = load(&path).unwrap();
        assert_eq!(result.capture.delay_ms, 1000);
        assert_eq!(result.stream.host, "10.0.0.5");
        assert_eq!(result.stream.port, 9999);
    }

    #[test]
    fn load_returns_error_for_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("posecast.json");
        std::fs::write(&path, "not valid json!!!").unwrap();

        let result = load(&path);
        assert!(matches!(result, Err(SettingsError::Parse { .. })));
    }

    #[test]
    fn load_rejects_out_of_range_port() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("posecast.json");
        std::fs::write(&path, r#"{"stream":{"port":70000}}"#).unwrap();

        assert!(load(&path).is_err());
    }

    #[test]
    fn save_round_trips_through_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("posecast.json");
        let mut settings = Settings::default();
        settings.capture.delay_ms = 4200;
        settings.stream.enabled = false;

        save(&path, &settings).unwrap();
        assert_eq!(load(&path).unwrap(), settings);
    }

    #[test]
    fn save_is_atomic() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("posecast.json");
        save(&path, &Settings::default()).unwrap();

        let tmp_path = dir.path().join("posecast.json.tmp");
        assert!(
            !tmp_path.exists(),
            ".tmp file should be cleaned up after rename"
        );
    }
}
