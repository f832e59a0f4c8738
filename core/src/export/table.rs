use crate::detection::{Detection, Measurement};
use crate::distance::{BatchEstimate, DistanceEstimate};
use crate::prelude::CalibResult;
use serde::Serialize;
use std::ffi::OsString;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const CSV_HEADER: &str = "x,y,width,height,WcalcZ,HcalcZ";

/// One batch row: the measurement and its width/height estimates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TableRow {
    pub measurement: Measurement,
    pub estimate: BatchEstimate,
}

/// Ordered collection of batch detections, serialized once the source ends.
#[derive(Debug, Default)]
pub struct DetectionTable {
    rows: Vec<TableRow>,
}

impl DetectionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, measurement: Measurement, estimate: BatchEstimate) {
        self.rows.push(TableRow {
            measurement,
            estimate,
        });
    }

    /// Appends a batch-mode detection. Live detections carry no height
    /// estimate and are not tabulated; returns whether the row was added.
    pub fn push_detection(&mut self, detection: &Detection) -> bool {
        match detection.estimate {
            DistanceEstimate::Batch(estimate) => {
                self.push(detection.measurement, estimate);
                true
            }
            DistanceEstimate::Live(_) => false,
        }
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Header row, then one `", "`-joined row per detection in encounter order.
    pub fn write_csv<W: Write>(&self, mut writer: W) -> CalibResult<()> {
        writeln!(writer, "{}", CSV_HEADER)?;
        for row in &self.rows {
            let m = &row.measurement;
            writeln!(
                writer,
                "{}, {}, {}, {}, {}, {}",
                m.x, m.y, m.width, m.height, row.estimate.by_width, row.estimate.by_height
            )?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn export_csv(&self, path: &Path) -> CalibResult<()> {
        let file = File::create(path)?;
        self.write_csv(BufWriter::new(file))
    }
}

/// `<input>.csv`, keeping the input's own extension.
pub fn csv_path_for(input: &Path) -> PathBuf {
    let mut name = OsString::from(input.as_os_str());
    name.push(".csv");
    PathBuf::from(name)
}
