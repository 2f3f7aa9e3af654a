use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use pose_wire::{Frame, RecordError, RecordReader};

use crate::source::backend::{PoseSource, Result, SourceError};

/// Plays back a JSON-lines recording in the streaming record format.
///
/// Consecutive records sharing a timestamp are returned together as one
/// sensor capture. Malformed records are logged and skipped; a read error
/// is reported after the frames already grouped have been returned.
pub struct ReplaySource<R> {
    reader: RecordReader<R>,
    pending: Option<Frame>,
    failed: Option<SourceError>,
    skipped: u64,
}

impl ReplaySource<BufReader<File>> {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| SourceError::Open {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> ReplaySource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: RecordReader::new(reader),
            pending: None,
            failed: None,
            skipped: 0,
        }
    }

    /// Records dropped because they did not decode.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    fn read_frame(&mut self) -> Result<Option<Frame>> {
        loop {
            match self.reader.next_frame() {
                None => return Ok(None),
                Some(Ok(frame)) => return Ok(Some(frame)),
                Some(Err(RecordError::Io(e))) => {
                    return Err(SourceError::Record {
                        line: self.reader.line_number(),
                        source: RecordError::Io(e),
                    })
                }
                Some(Err(e)) => {
                    self.skipped += 1;
                    tracing::warn!(
                        "Skipping record on line {}: {e}",
                        self.reader.line_number()
                    );
                }
            }
        }
    }
}

impl<R: BufRead> PoseSource for ReplaySource<R> {
    fn next_frames(&mut self) -> Result<Option<Vec<Frame>>> {
        if let Some(e) = self.failed.take() {
            return Err(e);
        }
        let first = match self.pending.take() {
            Some(frame) => frame,
            None => match self.read_frame()? {
                Some(frame) => frame,
                None => return Ok(None),
            },
        };

        let timestamp_us = first.timestamp_us;
        let mut frames = vec![first];
        loop {
            match self.read_frame() {
                Ok(Some(frame)) if frame.timestamp_us == timestamp_us => frames.push(frame),
                Ok(Some(frame)) => {
                    self.pending = Some(frame);
                    break;
                }
                Ok(None) => break,
                Err(e) => {
                    self.failed = Some(e);
                    break;
                }
            }
        }
        Ok(Some(frames))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pose_wire::{encode_frame, JointPose};
    use std::io::Cursor;
    use tempfile::TempDir;

    fn frame(body_id: u32, timestamp_us: u64) -> Frame {
        Frame::from_fn(body_id, timestamp_us, |_| JointPose::default())
    }

    fn recording(frames: &[Frame]) -> Vec<u8> {
        frames
            .iter()
            .flat_map(|f| encode_frame(f).unwrap())
            .collect()
    }

    fn ids(frames: &[Frame]) -> Vec<(u32, u64)> {
        frames.iter().map(|f| (f.body_id, f.timestamp_us)).collect()
    }

    #[test]
    fn groups_bodies_sharing_a_timestamp() {
        let data = recording(&[frame(1, 0), frame(2, 0), frame(1, 33_000), frame(1, 66_000)]);
        let mut source = ReplaySource::new(Cursor::new(data));

        let first = source.next_frames().unwrap().unwrap();
        assert_eq!(ids(&first), vec![(1, 0), (2, 0)]);
        let second = source.next_frames().unwrap().unwrap();
        assert_eq!(ids(&second), vec![(1, 33_000)]);
        let third = source.next_frames().unwrap().unwrap();
        assert_eq!(ids(&third), vec![(1, 66_000)]);
        assert!(source.next_frames().unwrap().is_none());
    }

    #[test]
    fn empty_recording_is_exhausted_immediately() {
        let mut source = ReplaySource::new(Cursor::new(Vec::new()));
        assert!(source.next_frames().unwrap().is_none());
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let mut data = recording(&[frame(1, 0)]);
        data.extend_from_slice(b"{\"body_id\": 1}\n");
        data.extend(recording(&[frame(1, 10)]));
        let mut source = ReplaySource::new(Cursor::new(data));

        assert_eq!(ids(&source.next_frames().unwrap().unwrap()), vec![(1, 0)]);
        assert_eq!(ids(&source.next_frames().unwrap().unwrap()), vec![(1, 10)]);
        assert!(source.next_frames().unwrap().is_none());
        assert_eq!(source.skipped(), 1);
    }

    #[test]
    fn invalid_utf8_line_is_skipped() {
        let mut data = recording(&[frame(1, 0)]);
        data.extend_from_slice(b"\xff\xfe garbage\n");
        data.extend(recording(&[frame(1, 10)]));
        let mut source = ReplaySource::new(Cursor::new(data));

        assert_eq!(ids(&source.next_frames().unwrap().unwrap()), vec![(1, 0)]);
        assert_eq!(ids(&source.next_frames().unwrap().unwrap()), vec![(1, 10)]);
        assert!(source.next_frames().unwrap().is_none());
        assert_eq!(source.skipped(), 1);
    }

    /// Reader that hands out `data` and then fails.
    struct FailingTail {
        data: Cursor<Vec<u8>>,
    }

    impl std::io::Read for FailingTail {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            std::io::Read::read(&mut self.data, buf)
        }
    }

    impl BufRead for FailingTail {
        fn fill_buf(&mut self) -> std::io::Result<&[u8]> {
            if self.data.position() as usize >= self.data.get_ref().len() {
                return Err(std::io::Error::other("disk gone"));
            }
            self.data.fill_buf()
        }

        fn consume(&mut self, amt: usize) {
            self.data.consume(amt);
        }
    }

    #[test]
    fn read_error_keeps_grouped_frames() {
        let data = recording(&[frame(1, 0), frame(2, 0)]);
        let mut source = ReplaySource::new(FailingTail {
            data: Cursor::new(data),
        });

        assert_eq!(ids(&source.next_frames().unwrap().unwrap()), vec![(1, 0), (2, 0)]);
        let err = source.next_frames().unwrap_err();
        assert!(matches!(
            err,
            SourceError::Record {
                source: RecordError::Io(_),
                ..
            }
        ));
    }

    #[test]
    fn open_reads_recording_from_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.jsonl");
        std::fs::write(&path, recording(&[frame(3, 5), frame(3, 6)])).unwrap();

        let mut source = ReplaySource::open(&path).unwrap();
        assert_eq!(ids(&source.next_frames().unwrap().unwrap()), vec![(3, 5)]);
        assert_eq!(ids(&source.next_frames().unwrap().unwrap()), vec![(3, 6)]);
    }

    #[test]
    fn open_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = ReplaySource::open(&dir.path().join("missing.jsonl"))
            .err()
            .unwrap();
        assert!(matches!(err, SourceError::Open { .. }));
    }
}
