use crate::prelude::{decode_line, CalibError, CalibResult, LineSource};
use crate::telemetry::LogManager;
use std::io::{BufRead, BufReader};
use std::process::{Child, ChildStdout, Command, ExitStatus, Stdio};

/// Streams the standard output of a long-running external process.
///
/// Forward-only and consumed once. The child is reaped on `close`, when its
/// output ends, or on drop if the consumer abandons the stream early.
pub struct ProcessLineSource {
    program: String,
    args: Vec<String>,
    child: Option<Child>,
    stdout: Option<BufReader<ChildStdout>>,
    buffer: Vec<u8>,
    finished: bool,
    logger: LogManager,
}

impl ProcessLineSource {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            child: None,
            stdout: None,
            buffer: Vec::new(),
            finished: false,
            logger: LogManager::new("process-source"),
        }
    }

    /// Builds a source from `[program, args...]`.
    pub fn from_command(command: &[String]) -> CalibResult<Self> {
        let (program, args) = command
            .split_first()
            .ok_or_else(|| CalibError::SourceUnavailable {
                source_name: "<empty command>".into(),
                reason: "no program given".into(),
            })?;
        Ok(Self::new(program.clone(), args.iter().cloned()))
    }

    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn unavailable(&self, reason: String) -> CalibError {
        CalibError::SourceUnavailable {
            source_name: self.command_line(),
            reason,
        }
    }

    fn reap(&mut self) -> CalibResult<Option<ExitStatus>> {
        self.stdout = None;
        match self.child.take() {
            Some(mut child) => Ok(Some(child.wait()?)),
            None => Ok(None),
        }
    }
}

impl LineSource for ProcessLineSource {
    fn start(&mut self) -> CalibResult<()> {
        if self.child.is_some() || self.finished {
            return Err(self.unavailable("process source already consumed".into()));
        }

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|err| self.unavailable(err.to_string()))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| self.unavailable("stdout not captured".into()))?;
        self.stdout = Some(BufReader::new(stdout));
        self.child = Some(child);
        self.logger
            .record(&format!("streaming `{}`", self.command_line()));
        Ok(())
    }

    fn next_line(&mut self) -> CalibResult<Option<String>> {
        if self.finished {
            return Ok(None);
        }
        let Some(stdout) = self.stdout.as_mut() else {
            return Err(self.unavailable("source not started".into()));
        };

        self.buffer.clear();
        // blocks until the process emits a full line or closes its output
        if stdout.read_until(b'\n', &mut self.buffer)? > 0 {
            return Ok(Some(decode_line(&self.buffer)));
        }

        self.finished = true;
        match self.reap()? {
            Some(status) if !status.success() => {
                Err(CalibError::ProcessFailure {
                    code: status.code(),
                })
            }
            _ => {
                self.logger
                    .record(&format!("`{}` finished", self.command_line()));
                Ok(None)
            }
        }
    }

    fn close(&mut self) -> CalibResult<()> {
        self.finished = true;
        if let Some(child) = self.child.as_mut() {
            // ignore: the child may already have exited on its own
            let _ = child.kill();
        }
        self.reap()?;
        Ok(())
    }
}

impl Drop for ProcessLineSource {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

/// Runs a one-shot command to completion, discarding its output.
///
/// Used to clear the device log backlog before streaming starts.
pub fn run_clear_command(command: &[String]) -> CalibResult<()> {
    let logger = LogManager::new("process-source");
    let (program, args) = command
        .split_first()
        .ok_or_else(|| CalibError::SourceUnavailable {
            source_name: "<empty command>".into(),
            reason: "no program given".into(),
        })?;

    let status = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map_err(|err| CalibError::SourceUnavailable {
            source_name: command.join(" "),
            reason: err.to_string(),
        })?;

    if status.success() {
        logger.record(&format!("cleared backlog with `{}`", command.join(" ")));
    } else {
        logger.warn(&format!(
            "`{}` exited with {:?}; continuing",
            command.join(" "),
            status.code()
        ));
    }
    Ok(())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn shell(script: &str) -> ProcessLineSource {
        ProcessLineSource::new("sh", ["-c", script])
    }

    #[test]
    fn streams_lines_then_ends_on_clean_exit() {
        let mut source = shell("printf 'one\\ntwo\\n'");
        source.start().unwrap();
        let lines: Vec<String> = source.lines().collect::<CalibResult<_>>().unwrap();
        assert_eq!(lines, vec!["one", "two"]);
        assert_eq!(source.next_line().unwrap(), None);
    }

    #[test]
    fn non_zero_exit_fails_after_replaying_output() {
        let mut source = shell("echo before; exit 7");
        source.start().unwrap();
        let results: Vec<CalibResult<String>> = source.lines().collect();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].as_ref().unwrap(), "before");
        assert!(matches!(
            results[1],
            Err(CalibError::ProcessFailure { code: Some(7) })
        ));
    }

    #[test]
    fn missing_program_is_unavailable() {
        let mut source = ProcessLineSource::new("definitely-not-a-real-binary-xyz", Vec::<String>::new());
        assert!(matches!(
            source.start(),
            Err(CalibError::SourceUnavailable { .. })
        ));
    }

    #[test]
    fn invalid_utf8_output_is_decoded_lossily() {
        let mut source = shell("printf 'E JNIpart : \\377\\nnext\\n'");
        source.start().unwrap();
        let lines: Vec<String> = source.lines().collect::<CalibResult<_>>().unwrap();
        assert_eq!(lines, vec!["E JNIpart : \u{fffd}", "next"]);
    }

    #[test]
    fn dropping_a_running_source_reaps_the_process() {
        let mut source = shell("echo $$; sleep 30");
        source.start().unwrap();
        let pid = source.next_line().unwrap().unwrap();
        drop(source);

        let alive = Command::new("kill")
            .args(["-0", pid.trim()])
            .stderr(Stdio::null())
            .status()
            .unwrap();
        assert!(!alive.success(), "process {} still running", pid);
    }

    #[test]
    fn source_cannot_be_restarted() {
        let mut source = shell("echo once");
        source.start().unwrap();
        while source.next_line().unwrap().is_some() {}
        assert!(source.start().is_err());
    }

    #[test]
    fn close_releases_a_running_process() {
        let mut source = shell("echo ready; sleep 30");
        source.start().unwrap();
        assert_eq!(source.next_line().unwrap().as_deref(), Some("ready"));
        source.close().unwrap();
        assert_eq!(source.next_line().unwrap(), None);
    }

    #[test]
    fn clear_command_discards_output() {
        run_clear_command(&["sh".to_string(), "-c".into(), "echo noise".into()]).unwrap();
        assert!(run_clear_command(&[]).is_err());
    }

    #[test]
    fn from_command_rejects_empty_list() {
        assert!(ProcessLineSource::from_command(&[]).is_err());
        let source = ProcessLineSource::from_command(&["adb".to_string(), "logcat".to_string()]).unwrap();
        assert_eq!(source.command_line(), "adb logcat");
    }
}
