//! Per-record parse + render over a stream of NDJSON lines.
//!
//! Parse failures are per-record: the record is skipped and counted. Read and write failures
//! abort the source they happened in.

use std::fmt;
use std::io::BufRead;
use std::path::PathBuf;

use crate::config::{BatchConfig, IndexMode, RasterConfig};
use crate::encode::sink::ImageSink;
use crate::foundation::core::GrayImage;
use crate::foundation::error::{RasterError, RasterResult};
use crate::raster::Rasterizer;
use crate::sketch::parse::RecordParser;

/// Parser and rasterizer bundled with their immutable configuration.
#[derive(Clone, Debug, Default)]
pub struct Pipeline {
    parser: RecordParser,
    rasterizer: Rasterizer,
}

impl Pipeline {
    /// Build a pipeline from validated settings.
    pub fn new(raster: RasterConfig, batch: &BatchConfig) -> RasterResult<Self> {
        batch.validate()?;
        Ok(Self {
            parser: RecordParser::new(batch.stroke_field.clone()),
            rasterizer: Rasterizer::new(raster)?,
        })
    }

    /// Record parser.
    pub fn parser(&self) -> &RecordParser {
        &self.parser
    }

    /// Rasterizer.
    pub fn rasterizer(&self) -> &Rasterizer {
        &self.rasterizer
    }

    /// Parse and render one record.
    pub fn render_line(&self, line: &str) -> RasterResult<GrayImage> {
        let sketch = self.parser.parse(line)?;
        Ok(self.rasterizer.render(&sketch))
    }

    /// Parse and render one raw record. Bytes that are not UTF-8 are a parse error.
    pub fn render_bytes(&self, line: &[u8]) -> RasterResult<GrayImage> {
        let text = std::str::from_utf8(line)
            .map_err(|e| RasterError::parse(format!("record is not valid UTF-8: {e}")))?;
        self.render_line(text)
    }
}

/// A successfully rendered record.
#[derive(Clone, Debug)]
pub struct RenderedRecord {
    /// 0-based position of the record in its input.
    pub line: usize,
    /// Rendered output image.
    pub image: GrayImage,
}

/// Why a record produced no image.
#[derive(Debug)]
pub struct SkipReason {
    /// 0-based position of the record in its input.
    pub line: usize,
    /// Decode failure.
    pub error: RasterError,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.error)
    }
}

/// Lazily parse and render every line. A bad record yields `Err` for that line only.
pub fn render_batch<'a, I>(
    pipeline: &'a Pipeline,
    lines: I,
) -> impl Iterator<Item = Result<RenderedRecord, SkipReason>> + 'a
where
    I: IntoIterator,
    I::IntoIter: 'a,
    I::Item: AsRef<str>,
{
    lines
        .into_iter()
        .enumerate()
        .map(move |(line, text)| into_outcome(line, pipeline.render_line(text.as_ref())))
}

fn into_outcome(
    line: usize,
    rendered: RasterResult<GrayImage>,
) -> Result<RenderedRecord, SkipReason> {
    match rendered {
        Ok(image) => Ok(RenderedRecord { line, image }),
        Err(error) => Err(SkipReason { line, error }),
    }
}

/// One NDJSON file holding the records of one class.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Source {
    /// Class name used for the output directory and file names.
    pub class: String,
    /// Path of the NDJSON file.
    pub path: PathBuf,
}

/// Whether a source produced any output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceStatus {
    /// At least one image was written.
    Converted,
    /// Every attempted record was skipped, or the source had no records.
    Empty,
}

/// Per-source counts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceReport {
    /// Class of the source.
    pub class: String,
    /// Records read (bounded by the per-class cap).
    pub attempted: usize,
    /// Images written.
    pub rendered: usize,
    /// Records skipped as malformed.
    pub skipped: usize,
}

impl SourceReport {
    fn new(class: &str) -> Self {
        Self {
            class: class.to_string(),
            attempted: 0,
            rendered: 0,
            skipped: 0,
        }
    }

    /// [`SourceStatus::Empty`] when nothing was rendered.
    pub fn status(&self) -> SourceStatus {
        if self.rendered == 0 {
            SourceStatus::Empty
        } else {
            SourceStatus::Converted
        }
    }
}

/// Open `source.path` and convert it into `sink`.
pub fn convert_source<S: ImageSink + ?Sized>(
    pipeline: &Pipeline,
    source: &Source,
    sink: &mut S,
    cfg: &BatchConfig,
) -> RasterResult<SourceReport> {
    let file = std::fs::File::open(&source.path).map_err(|e| RasterError::io(&source.path, e))?;
    convert_lines(pipeline, source, std::io::BufReader::new(file), sink, cfg)
}

/// Convert the records read from `reader` into `sink`.
///
/// At most `cfg.max_per_class` lines are read. Indices follow `cfg.index_mode`. Lines that are
/// not UTF-8 are skipped like any malformed record. A read error aborts with
/// [`RasterError::Io`] naming `source.path`; `sink.end` is not called in that case.
#[tracing::instrument(skip_all, fields(class = %source.class))]
pub fn convert_lines<R: BufRead, S: ImageSink + ?Sized>(
    pipeline: &Pipeline,
    source: &Source,
    reader: R,
    sink: &mut S,
    cfg: &BatchConfig,
) -> RasterResult<SourceReport> {
    let cap = cfg.max_per_class.unwrap_or(usize::MAX);
    let mut report = SourceReport::new(&source.class);
    let mut read_error = None;

    sink.begin(&source.class)?;
    {
        let lines = reader.split(b'\n').take(cap).map_while(|line| match line {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                read_error = Some(e);
                None
            }
        });
        let outcomes = lines
            .enumerate()
            .map(|(line, bytes)| into_outcome(line, pipeline.render_bytes(&bytes)));

        for outcome in outcomes {
            report.attempted += 1;
            match outcome {
                Ok(record) => {
                    let index = match cfg.index_mode {
                        IndexMode::Dense => report.rendered,
                        IndexMode::SourceLine => record.line,
                    };
                    sink.push_image(index, &record.image)?;
                    report.rendered += 1;
                }
                Err(skip) => {
                    tracing::debug!(%skip, "skipping record");
                    report.skipped += 1;
                }
            }
        }
    }

    if let Some(e) = read_error {
        return Err(RasterError::io(&source.path, e));
    }
    sink.end()?;

    match report.status() {
        SourceStatus::Converted => tracing::info!(
            attempted = report.attempted,
            rendered = report.rendered,
            skipped = report.skipped,
            "converted source"
        ),
        SourceStatus::Empty => tracing::warn!(
            attempted = report.attempted,
            skipped = report.skipped,
            "source produced no images"
        ),
    }
    Ok(report)
}

#[cfg(test)]
#[path = "../../tests/unit/batch/convert.rs"]
mod tests;
