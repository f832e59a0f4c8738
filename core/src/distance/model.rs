use crate::detection::Measurement;
use crate::distance::calibration::{
    Mode, BATCH_HEIGHT_K, BATCH_WIDTH_K, CENTER_X, CENTER_Y, LIVE_WIDTH_K, PARALLAX_COEFF,
};
use crate::prelude::{CalibError, CalibResult};
use serde::Serialize;

/// Independent width and height distance estimates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BatchEstimate {
    pub by_width: f64,
    pub by_height: f64,
}

/// Width-based estimate with and without parallax correction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LiveEstimate {
    pub uncorrected: f64,
    pub corrected: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum DistanceEstimate {
    Batch(BatchEstimate),
    Live(LiveEstimate),
}

fn nonzero(value: u32, field: &'static str) -> CalibResult<f64> {
    if value == 0 {
        Err(CalibError::DivisionByZero { field })
    } else {
        Ok(f64::from(value))
    }
}

pub fn estimate_batch(measurement: &Measurement) -> CalibResult<BatchEstimate> {
    let width = nonzero(measurement.width, "width")?;
    let height = nonzero(measurement.height, "height")?;
    Ok(BatchEstimate {
        by_width: BATCH_WIDTH_K / width,
        by_height: BATCH_HEIGHT_K / height,
    })
}

/// Live model: only the width channel is used, then penalised by the squared
/// offset of the target from the image center.
pub fn estimate_live(measurement: &Measurement) -> CalibResult<LiveEstimate> {
    let width = nonzero(measurement.width, "width")?;
    // height is unused here but a zero height still marks a degenerate box
    nonzero(measurement.height, "height")?;

    let uncorrected = LIVE_WIDTH_K / width;
    let dx = f64::from(measurement.x) - CENTER_X;
    let dy = f64::from(measurement.y) - CENTER_Y;
    let corrected = uncorrected + dx.powi(2) * PARALLAX_COEFF + dy.powi(2) * PARALLAX_COEFF;

    Ok(LiveEstimate {
        uncorrected,
        corrected,
    })
}

pub fn compute_distance(measurement: &Measurement, mode: Mode) -> CalibResult<DistanceEstimate> {
    match mode {
        Mode::Batch => estimate_batch(measurement).map(DistanceEstimate::Batch),
        Mode::Live => estimate_live(measurement).map(DistanceEstimate::Live),
    }
}
