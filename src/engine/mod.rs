use thiserror::Error;
use tracing::debug;

use crate::model::Document;

mod builder;
mod headings;
mod metadata;
mod normalize;
mod patterns;
mod segmenter;
mod validate;

pub use builder::FALLBACK_CHAPTER_TITLE;
pub use normalize::normalize;
pub use patterns::PatternSet;
pub use segmenter::SegmentStats;

#[derive(Debug, Clone, Copy)]
pub struct ExtractOptions {
    /// Escalate validation warnings to a failure carrying the
    /// partially-built document.
    pub strict: bool,
    /// Derive word/page counts after the model is built.
    pub compute_metadata: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            strict: false,
            compute_metadata: true,
        }
    }
}

/// Successful extraction: the read-only document plus any non-fatal
/// warnings gathered along the way.
#[derive(Debug)]
pub struct Extraction {
    pub document: Document,
    pub warnings: Vec<String>,
    pub stats: SegmentStats,
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("input is empty or contains no extractable text")]
    EmptyInput,

    #[error("pattern library failed to initialize: {0}")]
    Internal(String),

    /// Strict-mode escalation. Carries the partial document so the
    /// caller can choose to discard it or complete it manually.
    #[error("strict validation failed: {reasons}")]
    StrictValidation {
        reasons: String,
        warnings: Vec<String>,
        partial: Box<Document>,
    },
}

/// Top-level entry point: normalization, segmentation, metadata
/// derivation and validation in one synchronous pass. Reentrant; no
/// state outlives the call and no I/O happens inside it.
pub fn extract(raw: &str, options: &ExtractOptions) -> Result<Extraction, ExtractError> {
    let lines = normalize::normalize(raw);
    if lines.is_empty() {
        return Err(ExtractError::EmptyInput);
    }

    let patterns = PatternSet::new().map_err(|error| ExtractError::Internal(error.to_string()))?;

    let result = segmenter::segment(&patterns, &lines);
    let mut document = result.document;
    let mut warnings = result.warnings;

    if options.compute_metadata {
        metadata::apply(&mut document);
    }

    warnings.extend(validate::validate(&document));

    debug!(
        chapters = document.chapters.len(),
        warnings = warnings.len(),
        lines = result.stats.lines_total,
        "extraction finished"
    );

    if options.strict && !warnings.is_empty() {
        return Err(ExtractError::StrictValidation {
            reasons: warnings.join("; "),
            warnings,
            partial: Box::new(document),
        });
    }

    Ok(Extraction {
        document,
        warnings,
        stats: result.stats,
    })
}
