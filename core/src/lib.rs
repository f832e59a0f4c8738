//! Detection-log parsing and calibrated distance estimation.
//!
//! Lines come from a [`LineSource`] (a captured log file or a live process),
//! the [`detection`] module turns qualifying lines into measurements, and the
//! [`distance`] module converts bounding-box sizes into distance estimates.

pub mod detection;
pub mod distance;
pub mod export;
pub mod prelude;
pub mod source;
pub mod telemetry;

pub use detection::{
    format_detection_line, try_parse, Detection, Measurement, MeasurementExtractor,
};
pub use distance::{compute_distance, DistanceEstimate, Mode};
pub use prelude::{CalibError, CalibResult, LineSource};
