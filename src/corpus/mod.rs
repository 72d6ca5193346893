//! Directory-level driver: discover sources, convert them in parallel, write the label index.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::batch::{Pipeline, Source, SourceReport, SourceStatus, convert_source};
use crate::config::BatchConfig;
use crate::encode::png::PngDirSink;
use crate::foundation::error::{RasterError, RasterResult};

/// File name of the class label index written into the output root.
pub const LABEL_INDEX_FILE: &str = "class_indices.json";

const SOURCE_EXTENSION: &str = "ndjson";

/// Class name for `path`: the file stem without `prefix` (`full_raw_cat.ndjson` -> `cat`).
pub fn class_name_for(path: &Path, prefix: &str) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    let class = stem.strip_prefix(prefix).unwrap_or(stem);
    (!class.is_empty()).then(|| class.to_string())
}

/// List `*.ndjson` files directly inside `dir`, sorted by path.
///
/// Fails when `dir` holds no sources or two files map to the same class.
pub fn discover_sources(dir: &Path, prefix: &str) -> RasterResult<Vec<Source>> {
    let entries = std::fs::read_dir(dir).map_err(|e| RasterError::io(dir, e))?;

    let mut sources = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| RasterError::io(dir, e))?.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(SOURCE_EXTENSION)
        {
            continue;
        }
        let Some(class) = class_name_for(&path, prefix) else {
            tracing::warn!(path = %path.display(), "cannot derive class name, ignoring");
            continue;
        };
        sources.push(Source { class, path });
    }

    if sources.is_empty() {
        return Err(RasterError::validation(format!(
            "no .{SOURCE_EXTENSION} sources found in '{}'",
            dir.display()
        )));
    }

    sources.sort_by(|a, b| a.path.cmp(&b.path));
    let mut seen = BTreeSet::new();
    for s in &sources {
        if !seen.insert(s.class.as_str()) {
            return Err(RasterError::validation(format!(
                "class '{}' is produced by more than one source",
                s.class
            )));
        }
    }
    Ok(sources)
}

/// Result of converting one source.
#[derive(Debug)]
pub struct SourceOutcome {
    /// The source that was converted.
    pub source: Source,
    /// Counts, or the fatal error that stopped this source.
    pub result: RasterResult<SourceReport>,
}

/// Results of a corpus conversion, in source order.
#[derive(Debug)]
pub struct CorpusReport {
    /// One entry per source.
    pub outcomes: Vec<SourceOutcome>,
    /// Where the label index was written.
    pub label_index: PathBuf,
}

impl CorpusReport {
    /// Sources that failed with an error.
    pub fn failures(&self) -> impl Iterator<Item = (&Source, &RasterError)> + '_ {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (&o.source, e)))
    }

    /// Sources that converted without error but produced no image.
    pub fn empty_sources(&self) -> impl Iterator<Item = &Source> + '_ {
        self.outcomes.iter().filter_map(|o| match &o.result {
            Ok(r) if r.status() == SourceStatus::Empty => Some(&o.source),
            _ => None,
        })
    }

    /// Total images written across all sources.
    pub fn total_rendered(&self) -> usize {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok())
            .map(|r| r.rendered)
            .sum()
    }
}

/// Convert every source into `out_root/<class>/`, in parallel across sources.
///
/// A failing source does not stop the others; its error is kept in the report. The label index
/// lists every class whose conversion finished.
pub fn convert_corpus(
    pipeline: &Pipeline,
    sources: &[Source],
    out_root: &Path,
    cfg: &BatchConfig,
) -> RasterResult<CorpusReport> {
    cfg.validate()?;
    std::fs::create_dir_all(out_root).map_err(|e| RasterError::io(out_root, e))?;
    let pool = build_thread_pool(cfg.threads)?;

    let outcomes = pool.install(|| {
        sources
            .par_iter()
            .map(|source| {
                let mut sink = PngDirSink::new(out_root);
                let result = convert_source(pipeline, source, &mut sink, cfg);
                if let Err(e) = &result {
                    tracing::error!(class = %source.class, error = %e, "source failed");
                }
                SourceOutcome {
                    source: source.clone(),
                    result,
                }
            })
            .collect::<Vec<_>>()
    });

    let classes = outcomes
        .iter()
        .filter(|o| o.result.is_ok())
        .map(|o| o.source.class.clone())
        .collect::<Vec<_>>();
    let label_index = write_label_index(out_root, &classes)?;

    Ok(CorpusReport {
        outcomes,
        label_index,
    })
}

/// Write `{"0": "<class>", "1": ...}` over the sorted, de-duplicated class list.
///
/// The order matches the alphabetical directory order image-folder loaders assign labels in.
pub fn write_label_index(out_root: &Path, classes: &[String]) -> RasterResult<PathBuf> {
    let sorted = classes.iter().collect::<BTreeSet<_>>();
    let map = sorted.into_iter().enumerate().collect::<BTreeMap<_, _>>();
    let json = serde_json::to_vec_pretty(&map)
        .map_err(|e| RasterError::encode(format!("serialize label index: {e}")))?;

    let path = out_root.join(LABEL_INDEX_FILE);
    std::fs::write(&path, json).map_err(|e| RasterError::io(&path, e))?;
    Ok(path)
}

fn build_thread_pool(threads: Option<usize>) -> RasterResult<rayon::ThreadPool> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| RasterError::validation(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/corpus/discover.rs"]
mod tests;
