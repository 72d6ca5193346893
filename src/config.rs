use std::path::Path;

use crate::foundation::error::{RasterError, RasterResult};

/// Largest accepted `canvas_limit`. Keeps every working canvas addressable by the `u16`
/// dimensions the CPU rasterizer uses.
pub const MAX_CANVAS_LIMIT: i32 = 4096;

/// Geometry and output settings shared by the rasterizer.
///
/// Defaults reproduce the QuickDraw reference corpus: 64x64 output, 10 units of padding,
/// 6 px strokes, coordinates in `[0, 255]`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RasterConfig {
    /// Side length of the square output image, in pixels.
    pub output_size: u32,
    /// Margin added around the drawn extent, in canvas units.
    pub padding: i32,
    /// Stroke thickness in pixels of the working canvas.
    pub line_width: f64,
    /// Largest valid coordinate on either axis.
    pub canvas_limit: i32,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            output_size: 64,
            padding: 10,
            line_width: 6.0,
            canvas_limit: 255,
        }
    }
}

impl RasterConfig {
    /// Reject settings the rasterizer cannot honor.
    pub fn validate(&self) -> RasterResult<()> {
        if self.output_size == 0 {
            return Err(RasterError::validation("output_size must be >= 1"));
        }
        if self.padding < 0 {
            return Err(RasterError::validation("padding must be >= 0"));
        }
        if !self.line_width.is_finite() || self.line_width <= 0.0 {
            return Err(RasterError::validation("line_width must be finite and > 0"));
        }
        if !(1..=MAX_CANVAS_LIMIT).contains(&self.canvas_limit) {
            return Err(RasterError::validation(format!(
                "canvas_limit must be in 1..={MAX_CANVAS_LIMIT}"
            )));
        }
        Ok(())
    }
}

/// How output images of one source are numbered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IndexMode {
    /// Consecutive indices over rendered images only; skipped records leave no gaps.
    #[default]
    Dense,
    /// Index = 0-based line position in the source; skipped records leave gaps.
    SourceLine,
}

/// Settings for converting sources into a per-class image corpus.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatchConfig {
    /// Record field holding the stroke payload.
    pub stroke_field: String,
    /// Maximum number of records read per source. `None` reads everything.
    pub max_per_class: Option<usize>,
    /// Output numbering scheme.
    pub index_mode: IndexMode,
    /// File-stem prefix stripped to obtain the class name (`full_raw_cat.ndjson` -> `cat`).
    pub class_prefix: String,
    /// Worker threads for converting sources in parallel. `None` uses the rayon default.
    pub threads: Option<usize>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            stroke_field: crate::sketch::parse::DEFAULT_STROKE_FIELD.to_string(),
            max_per_class: Some(1500),
            index_mode: IndexMode::Dense,
            class_prefix: "full_raw_".to_string(),
            threads: None,
        }
    }
}

impl BatchConfig {
    /// Reject settings the batch driver cannot honor.
    pub fn validate(&self) -> RasterResult<()> {
        if self.stroke_field.is_empty() {
            return Err(RasterError::validation("stroke_field must not be empty"));
        }
        if self.threads == Some(0) {
            return Err(RasterError::validation("threads must be >= 1 when set"));
        }
        Ok(())
    }
}

/// Complete configuration file layout: `{ "raster": {...}, "batch": {...} }`.
///
/// Both sections and every field are optional; missing values fall back to defaults.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Rasterizer settings.
    pub raster: RasterConfig,
    /// Corpus conversion settings.
    pub batch: BatchConfig,
}

impl PipelineConfig {
    /// Parse a configuration from JSON text and validate it.
    pub fn from_json_str(text: &str) -> RasterResult<Self> {
        let cfg: Self = serde_json::from_str(text)
            .map_err(|e| RasterError::validation(format!("invalid config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read and validate a configuration file.
    pub fn from_json_path(path: &Path) -> RasterResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| RasterError::io(path, e))?;
        Self::from_json_str(&text)
    }

    /// Validate both sections.
    pub fn validate(&self) -> RasterResult<()> {
        self.raster.validate()?;
        self.batch.validate()
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
