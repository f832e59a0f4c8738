pub mod calibration;
pub mod model;

pub use calibration::Mode;
pub use model::{
    compute_distance, estimate_batch, estimate_live, BatchEstimate, DistanceEstimate,
    LiveEstimate,
};
