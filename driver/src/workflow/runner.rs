use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use calibcore::distance::LiveEstimate;
use calibcore::export::{csv_path_for, DetectionTable};
use calibcore::prelude::LineSource;
use calibcore::source::{run_clear_command, FileLineSource, ProcessLineSource};
use calibcore::telemetry::LogManager;
use calibcore::{DistanceEstimate, MeasurementExtractor, Mode};
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub input: PathBuf,
    pub output: PathBuf,
    pub lines_read: usize,
    pub detections: usize,
}

impl BatchSummary {
    pub fn write_report(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self).context("serializing batch report")?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating report directory {}", parent.display()))?;
        }
        fs::write(path, json).with_context(|| format!("writing report {}", path.display()))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LiveSummary {
    pub lines_read: usize,
    pub detections: usize,
    pub skipped: usize,
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    /// Clears the device backlog, then prints one line per live detection to `out`
    /// until the stream command exits. Rejected lines are reported to `diag`.
    pub fn run_live<W: Write, D: Write>(
        &self,
        out: &mut W,
        diag: &mut D,
    ) -> anyhow::Result<LiveSummary> {
        run_clear_command(&self.config.clear_command).context("clearing log backlog")?;

        let mut source = ProcessLineSource::from_command(&self.config.stream_command)
            .context("building live stream command")?;
        source.start().context("starting live stream")?;

        let streamed = stream_live(&mut source, out, diag);
        let closed = source.close().context("closing live stream");
        let summary = streamed?;
        closed?;

        LogManager::new("runner").record(&format!(
            "live stream ended: {} lines, {} detections, {} skipped",
            summary.lines_read, summary.detections, summary.skipped
        ));
        Ok(summary)
    }

    /// Parses a captured log and writes `<input>.csv`. Any bad detection line
    /// aborts the run before the CSV is written.
    pub fn run_batch(&self, input: &Path) -> anyhow::Result<BatchSummary> {
        let mut source = FileLineSource::new(input);
        source
            .start()
            .with_context(|| format!("opening capture {}", input.display()))?;

        let extractor = MeasurementExtractor::new(Mode::Batch);
        let mut table = DetectionTable::new();
        for (index, line) in source.lines().enumerate() {
            let line = line.with_context(|| format!("reading {}", input.display()))?;
            let detection = extractor
                .extract(&line)
                .with_context(|| format!("line {} of {}", index + 1, input.display()))?;
            if let Some(detection) = detection {
                table.push_detection(&detection);
            }
        }
        source.close()?;

        let output = csv_path_for(input);
        table
            .export_csv(&output)
            .with_context(|| format!("writing {}", output.display()))?;

        let metrics = extractor.metrics();
        LogManager::new("runner").record(&format!(
            "wrote {} detections from {} lines to {}",
            table.len(),
            metrics.lines,
            output.display()
        ));

        Ok(BatchSummary {
            input: input.to_path_buf(),
            output,
            lines_read: metrics.lines,
            detections: table.len(),
        })
    }
}

/// Live loop over an already started source. Bad lines are reported to
/// `diag` and skipped; only source failures end the loop early.
pub fn stream_live<S: LineSource, W: Write, D: Write>(
    source: &mut S,
    out: &mut W,
    diag: &mut D,
) -> anyhow::Result<LiveSummary> {
    let extractor = MeasurementExtractor::new(Mode::Live);
    for line in source.lines() {
        let line = line.context("reading live stream")?;
        match extractor.extract(&line) {
            Ok(Some(detection)) => {
                if let DistanceEstimate::Live(LiveEstimate {
                    uncorrected,
                    corrected,
                }) = detection.estimate
                {
                    writeln!(
                        out,
                        "D: {}\t  d_unmodified: {}\tx,y: {} {}",
                        corrected, uncorrected, detection.measurement.x, detection.measurement.y
                    )
                    .context("writing live output")?;
                }
            }
            Ok(None) => {}
            Err(err) => {
                writeln!(diag, "skipped: {}", err).context("reporting rejected line")?;
            }
        }
    }
    out.flush().context("flushing live output")?;

    let metrics = extractor.metrics();
    Ok(LiveSummary {
        lines_read: metrics.lines,
        detections: metrics.detections,
        skipped: metrics.rejected,
    })
}
