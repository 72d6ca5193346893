//! NDJSON record decoding.

use serde_json::Value;

use crate::foundation::error::{RasterError, RasterResult};
use crate::sketch::model::{GridPoint, Sketch, Stroke};

/// Field name QuickDraw uses for the stroke payload.
pub const DEFAULT_STROKE_FIELD: &str = "drawing";

/// Decodes one NDJSON record into a [`Sketch`].
///
/// A record is a JSON object whose stroke field holds `[[xs, ys, ...], ...]`. Elements after
/// `ys` (QuickDraw raw timestamps) are ignored.
#[derive(Clone, Debug)]
pub struct RecordParser {
    stroke_field: String,
}

impl Default for RecordParser {
    fn default() -> Self {
        Self::new(DEFAULT_STROKE_FIELD)
    }
}

impl RecordParser {
    /// Create a parser reading strokes from `stroke_field`.
    pub fn new(stroke_field: impl Into<String>) -> Self {
        Self {
            stroke_field: stroke_field.into(),
        }
    }

    /// Field the parser reads strokes from.
    pub fn stroke_field(&self) -> &str {
        &self.stroke_field
    }

    /// Decode `line`.
    ///
    /// Fails with [`RasterError::Parse`] for invalid JSON, a missing or mis-shaped stroke
    /// field, or a coordinate that is not a number.
    pub fn parse(&self, line: &str) -> RasterResult<Sketch> {
        let line = line.trim();
        if line.is_empty() {
            return Err(RasterError::parse("empty record"));
        }

        let value: Value = serde_json::from_str(line)
            .map_err(|e| RasterError::parse(format!("invalid JSON: {e}")))?;
        let Value::Object(record) = value else {
            return Err(RasterError::parse("record is not a JSON object"));
        };
        let drawing = record.get(&self.stroke_field).ok_or_else(|| {
            RasterError::parse(format!("missing stroke field '{}'", self.stroke_field))
        })?;

        parse_drawing(drawing)
    }
}

fn parse_drawing(drawing: &Value) -> RasterResult<Sketch> {
    let strokes = drawing
        .as_array()
        .ok_or_else(|| RasterError::parse("stroke field is not an array"))?;
    strokes
        .iter()
        .enumerate()
        .map(|(i, stroke)| parse_stroke(i, stroke))
        .collect()
}

fn parse_stroke(index: usize, stroke: &Value) -> RasterResult<Stroke> {
    let channels = stroke
        .as_array()
        .ok_or_else(|| RasterError::parse(format!("stroke {index} is not an array")))?;

    // Without both coordinate sequences there is nothing to pair; keep it as a degenerate stroke.
    let [xs, ys, ..] = channels.as_slice() else {
        return Ok(Stroke::default());
    };

    let xs = parse_coords(index, "x", xs)?;
    let ys = parse_coords(index, "y", ys)?;
    Ok(Stroke::new(
        xs.into_iter()
            .zip(ys)
            .map(|(x, y)| GridPoint::new(x, y))
            .collect(),
    ))
}

fn parse_coords(stroke: usize, axis: &str, seq: &Value) -> RasterResult<Vec<i32>> {
    let values = seq.as_array().ok_or_else(|| {
        RasterError::parse(format!("stroke {stroke}: {axis} coordinates are not an array"))
    })?;
    values
        .iter()
        .map(|v| {
            parse_coord(v).ok_or_else(|| {
                RasterError::parse(format!("stroke {stroke}: invalid {axis} coordinate {v}"))
            })
        })
        .collect()
}

/// Numbers are truncated toward zero. Strings holding an integer are accepted too, since some
/// exports quote their coordinates.
fn parse_coord(v: &Value) -> Option<i32> {
    match v {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return i32::try_from(i).ok();
            }
            let f = n.as_f64()?.trunc();
            (f.is_finite() && f >= f64::from(i32::MIN) && f <= f64::from(i32::MAX))
                .then_some(f as i32)
        }
        Value::String(s) => s.trim().parse::<i32>().ok(),
        _ => None,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sketch/parse.rs"]
mod tests;
