pub mod extractor;
pub mod measurement;
pub mod parser;
pub mod template;

pub use extractor::{Detection, MeasurementExtractor};
pub use measurement::Measurement;
pub use parser::{extract_fields, try_parse};
pub use template::format_detection_line;
