/// Marker phrase identifying a detection record.
pub const MARKER: &str = "Found target at ";
/// Ends the x field.
pub const X_END: &str = ".00, ";
/// Ends the y field and opens the size clause.
pub const Y_END: &str = ".00...size ";
/// Ends the width field.
pub const WIDTH_END: &str = ".00, ";
/// Ends the height field.
pub const HEIGHT_END: &str = ".00... ratio";

/// Anchors searched after the marker, in order. Each closes one numeric field.
pub const FIELD_ANCHORS: [&str; 4] = [X_END, Y_END, WIDTH_END, HEIGHT_END];

/// Formats a detection message the way the vision pipeline logs it.
pub fn format_detection_line(x: u32, y: u32, width: u32, height: u32, ratio: f64) -> String {
    format!(
        "{}{:.2}, {:.2}...size {:.2}, {:.2}... ratio {:.2}",
        MARKER, x as f64, y as f64, width as f64, height as f64, ratio
    )
}
