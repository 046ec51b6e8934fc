use std::fs;

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use crate::cli::CheckArgs;
use crate::engine::{self, ExtractOptions};

/// Runs extraction without writing artifacts and reports validation
/// findings. With `--strict`, any warning fails the command.
pub fn run(args: CheckArgs) -> Result<()> {
    let raw = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;

    let options = ExtractOptions {
        strict: false,
        compute_metadata: true,
    };
    let extraction = engine::extract(&raw, &options)
        .with_context(|| format!("extraction failed for {}", args.input.display()))?;

    let document = &extraction.document;
    info!(
        title = %document.title,
        author = %document.author,
        chapters = document.chapters.len(),
        sections = document.section_count(),
        jury_members = document.jury.len(),
        bibliography_entries = document.bibliography.len(),
        word_count = document.metadata.word_count,
        page_estimate = document.metadata.page_estimate,
        "document summary"
    );

    if extraction.warnings.is_empty() {
        info!("no validation warnings");
        return Ok(());
    }

    for warning in &extraction.warnings {
        warn!(warning = %warning, "validation warning");
    }

    if args.strict {
        bail!(
            "{} validation warning(s) in strict mode",
            extraction.warnings.len()
        );
    }

    Ok(())
}
