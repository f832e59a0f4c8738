use crate::detection::measurement::Measurement;
use crate::detection::template::{FIELD_ANCHORS, MARKER};
use crate::prelude::{CalibError, CalibResult};

/// Splits a detection line into its four raw numeric fields.
///
/// Returns `Ok(None)` when the marker phrase is absent. Every anchor is
/// searched strictly after the end of the previous one, and the text between
/// two consecutive anchors is one field.
pub fn extract_fields(line: &str) -> CalibResult<Option<[&str; 4]>> {
    let Some(marker_at) = line.find(MARKER) else {
        return Ok(None);
    };

    let mut cursor = marker_at + MARKER.len();
    let mut fields = [""; 4];
    for (slot, anchor) in fields.iter_mut().zip(FIELD_ANCHORS) {
        let offset = line[cursor..]
            .find(anchor)
            .ok_or_else(|| malformed(line))?;
        *slot = &line[cursor..cursor + offset];
        cursor += offset + anchor.len();
    }

    Ok(Some(fields))
}

/// Parses a detection line into a [`Measurement`].
///
/// Lines without the marker phrase yield `Ok(None)`. A marker with an
/// incomplete anchor sequence, or a field that is not a non-negative
/// integer, yields [`CalibError::MalformedDetectionLine`].
pub fn try_parse(line: &str) -> CalibResult<Option<Measurement>> {
    let Some([x, y, width, height]) = extract_fields(line)? else {
        return Ok(None);
    };

    let field = |raw: &str| raw.parse::<u32>().map_err(|_| malformed(line));
    Ok(Some(Measurement::new(
        field(x)?,
        field(y)?,
        field(width)?,
        field(height)?,
    )))
}

fn malformed(line: &str) -> CalibError {
    CalibError::MalformedDetectionLine {
        line: line.trim_end().to_string(),
    }
}
