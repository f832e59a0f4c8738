use crate::prelude::{decode_line, CalibError, CalibResult, LineSource};
use crate::telemetry::LogManager;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Reads a previously captured log file line by line.
///
/// Restartable: calling `start` again reopens the file from the top.
pub struct FileLineSource {
    path: PathBuf,
    reader: Option<BufReader<File>>,
    exhausted: bool,
    buffer: Vec<u8>,
    logger: LogManager,
}

impl FileLineSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            reader: None,
            exhausted: false,
            buffer: Vec::new(),
            logger: LogManager::new("file-source"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LineSource for FileLineSource {
    fn start(&mut self) -> CalibResult<()> {
        let file = File::open(&self.path).map_err(|err| CalibError::SourceUnavailable {
            source_name: self.path.display().to_string(),
            reason: err.to_string(),
        })?;
        self.reader = Some(BufReader::new(file));
        self.exhausted = false;
        self.logger
            .record(&format!("reading {}", self.path.display()));
        Ok(())
    }

    fn next_line(&mut self) -> CalibResult<Option<String>> {
        if self.exhausted {
            return Ok(None);
        }
        let Some(reader) = self.reader.as_mut() else {
            return Err(CalibError::SourceUnavailable {
                source_name: self.path.display().to_string(),
                reason: "source not started".into(),
            });
        };

        self.buffer.clear();
        if reader.read_until(b'\n', &mut self.buffer)? == 0 {
            // release the handle as soon as the last line is consumed
            self.reader = None;
            self.exhausted = true;
            return Ok(None);
        }
        Ok(Some(decode_line(&self.buffer)))
    }

    fn close(&mut self) -> CalibResult<()> {
        self.reader = None;
        self.exhausted = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn capture(contents: &str) -> NamedTempFile {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(contents.as_bytes()).unwrap();
        temp
    }

    #[test]
    fn yields_lines_in_file_order() {
        let temp = capture("first\r\nsecond\nthird");
        let mut source = FileLineSource::new(temp.path());
        source.start().unwrap();
        let lines: Vec<String> = source.lines().collect::<CalibResult<_>>().unwrap();
        assert_eq!(lines, vec!["first", "second", "third"]);
        source.close().unwrap();
    }

    #[test]
    fn invalid_utf8_does_not_end_the_stream() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"before\nD Other : garbage \xff\xfe bytes\nafter\n")
            .unwrap();
        let mut source = FileLineSource::new(temp.path());
        source.start().unwrap();
        let lines: Vec<String> = source.lines().collect::<CalibResult<_>>().unwrap();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "D Other : garbage \u{fffd}\u{fffd} bytes");
        assert_eq!(lines[2], "after");
    }

    #[test]
    fn missing_file_is_unavailable_before_any_line() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = FileLineSource::new(dir.path().join("absent.log"));
        assert!(matches!(
            source.start(),
            Err(CalibError::SourceUnavailable { .. })
        ));
    }

    #[test]
    fn reading_before_start_is_an_error() {
        let temp = capture("line\n");
        let mut source = FileLineSource::new(temp.path());
        assert!(source.next_line().is_err());
    }

    #[test]
    fn exhausted_source_keeps_returning_none() {
        let temp = capture("only\n");
        let mut source = FileLineSource::new(temp.path());
        source.start().unwrap();
        assert_eq!(source.next_line().unwrap().as_deref(), Some("only"));
        assert_eq!(source.next_line().unwrap(), None);
        assert_eq!(source.next_line().unwrap(), None);
    }

    #[test]
    fn restart_replays_from_the_top() {
        let temp = capture("a\nb\n");
        let mut source = FileLineSource::new(temp.path());
        source.start().unwrap();
        assert_eq!(source.next_line().unwrap().as_deref(), Some("a"));
        source.close().unwrap();

        source.start().unwrap();
        let lines: Vec<String> = source.lines().collect::<CalibResult<_>>().unwrap();
        assert_eq!(lines, vec!["a", "b"]);
    }
}
