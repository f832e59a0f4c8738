use std::fmt;

/// Common error type for line sources, parsing and distance estimation.
#[derive(thiserror::Error, Debug)]
pub enum CalibError {
    #[error("line source {source_name} unavailable: {reason}")]
    SourceUnavailable { source_name: String, reason: String },
    #[error("line source process failed with {}", ExitCode(.code))]
    ProcessFailure { code: Option<i32> },
    #[error("malformed detection line: {line:?}")]
    MalformedDetectionLine { line: String },
    #[error("division by zero: bounding-box {field} is 0")]
    DivisionByZero { field: &'static str },
    #[error("read failure")]
    Io(#[from] std::io::Error),
}

pub type CalibResult<T> = Result<T, CalibError>;

/// Decodes one raw line, replacing invalid UTF-8 and dropping the line ending.
///
/// Log captures routinely carry stray bytes; a garbled line must not end the
/// stream, so decoding never fails.
pub fn decode_line(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw)
        .trim_end_matches(['\n', '\r'])
        .to_string()
}

struct ExitCode<'a>(&'a Option<i32>);

impl fmt::Display for ExitCode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self.0 {
            Some(code) => write!(f, "exit code {}", code),
            None => write!(f, "no exit code (terminated by signal)"),
        }
    }
}

/// Ordered producer of text lines with an explicit lifecycle.
///
/// `start` acquires the underlying resource, `next_line` yields lines in
/// emission order until `Ok(None)`, and `close` releases the resource.
pub trait LineSource {
    fn start(&mut self) -> CalibResult<()>;
    fn next_line(&mut self) -> CalibResult<Option<String>>;
    fn close(&mut self) -> CalibResult<()>;

    /// Borrowing iterator over the remaining lines.
    fn lines(&mut self) -> Lines<'_, Self>
    where
        Self: Sized,
    {
        Lines {
            source: self,
            done: false,
        }
    }
}

/// Iterator adapter returned by [`LineSource::lines`].
///
/// Stops after the first error so a failing source is never polled again.
pub struct Lines<'a, S: LineSource> {
    source: &'a mut S,
    done: bool,
}

impl<S: LineSource> Iterator for Lines<'_, S> {
    type Item = CalibResult<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.source.next_line() {
            Ok(Some(line)) => Some(Ok(line)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn process_failure_reports_exit_code() {
        let err = CalibError::ProcessFailure { code: Some(3) };
        assert_eq!(err.to_string(), "line source process failed with exit code 3");

        let err = CalibError::ProcessFailure { code: None };
        assert!(err.to_string().contains("terminated by signal"));
    }

    #[test]
    fn decode_line_replaces_invalid_bytes() {
        assert_eq!(decode_line(b"ok\r\n"), "ok");
        assert_eq!(decode_line(b"bad \xff\xfe end\n"), "bad \u{fffd}\u{fffd} end");
    }

    #[test]
    fn io_error_message_is_not_repeated() {
        let err = CalibError::from(std::io::Error::new(std::io::ErrorKind::InvalidData, "boom"));
        assert_eq!(err.to_string(), "read failure");
    }

    #[test]
    fn malformed_line_carries_offending_text() {
        let err = CalibError::MalformedDetectionLine {
            line: "Found target at 1.00".into(),
        };
        assert!(err.to_string().contains("Found target at 1.00"));
    }
}
