/// Width constant for the plain (batch) model.
pub const BATCH_WIDTH_K: f64 = 5128.205128;
/// Height constant for the plain (batch) model.
pub const BATCH_HEIGHT_K: f64 = 2595.380223;
/// Width constant for the live model.
pub const LIVE_WIDTH_K: f64 = 6329.113924;
/// Quadratic off-center parallax coefficient (live model).
pub const PARALLAX_COEFF: f64 = 3.733e-04;
/// Assumed image center.
pub const CENTER_X: f64 = 320.5;
pub const CENTER_Y: f64 = 240.5;

/// Selects which calibrated model is applied to a measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Batch,
    Live,
}
