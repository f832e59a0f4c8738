use anyhow::{ensure, Context};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_ADB: &str = "adb";
pub const DEFAULT_TAG: &str = "JNIpart:E";

/// External commands used by live ingestion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Run once before streaming to drop the device's log backlog.
    pub clear_command: Vec<String>,
    /// Long-running command whose stdout carries detection lines.
    pub stream_command: Vec<String>,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self::from_args(DEFAULT_ADB, DEFAULT_TAG)
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        config
            .validate()
            .with_context(|| format!("validating workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(adb: &str, tag: &str) -> Self {
        Self {
            clear_command: vec![adb.to_string(), "logcat".into(), "-c".into()],
            stream_command: vec![adb.to_string(), "logcat".into(), "-s".into(), tag.to_string()],
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(!self.clear_command.is_empty(), "clear_command is empty");
        ensure!(!self.stream_command.is_empty(), "stream_command is empty");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn config_from_args_builds_logcat_commands() {
        let cfg = WorkflowConfig::from_args("adb", "JNIpart:E");
        assert_eq!(cfg.clear_command, vec!["adb", "logcat", "-c"]);
        assert_eq!(cfg.stream_command, vec!["adb", "logcat", "-s", "JNIpart:E"]);
        assert_eq!(cfg, WorkflowConfig::default());
    }

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"stream_command: [\"cat\", \"capture.log\"]\n")
            .unwrap();
        let path = temp.into_temp_path();
        let cfg = WorkflowConfig::load(&path).unwrap();
        assert_eq!(cfg.stream_command, vec!["cat", "capture.log"]);
        assert_eq!(cfg.clear_command, WorkflowConfig::default().clear_command);
    }

    #[test]
    fn config_load_rejects_empty_command() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"stream_command: []\n").unwrap();
        let path = temp.into_temp_path();
        assert!(WorkflowConfig::load(&path).is_err());
    }
}
