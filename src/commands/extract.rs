use std::fs;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use tracing::{info, warn};

use crate::cli::ExtractArgs;
use crate::engine::{self, ExtractError, ExtractOptions};
use crate::model::{ExtractionCounts, ExtractionOptionsEcho, ExtractionRunManifest};
use crate::util::{ensure_directory, now_utc_string, sha256_text, utc_compact_string, write_json_pretty};

pub fn run(args: ExtractArgs) -> Result<()> {
    let started_ts = Utc::now();
    let run_id = format!("run-{}", utc_compact_string(started_ts));

    let raw = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let source_sha256 = sha256_text(&raw);

    info!(
        input = %args.input.display(),
        bytes = raw.len(),
        run_id = %run_id,
        "starting extraction"
    );

    let options = ExtractOptions {
        strict: args.strict,
        compute_metadata: !args.skip_metadata,
    };

    ensure_directory(&args.output_dir)?;
    let document_path = args
        .document_path
        .clone()
        .unwrap_or_else(|| args.output_dir.join("document.json"));
    let manifest_path = args.manifest_path.clone().unwrap_or_else(|| {
        args.output_dir
            .join(format!("extraction_run_{}.json", utc_compact_string(started_ts)))
    });

    let extraction = match engine::extract(&raw, &options) {
        Ok(extraction) => extraction,
        Err(ExtractError::StrictValidation {
            reasons,
            warnings,
            partial,
        }) => {
            for warning in &warnings {
                warn!(warning = %warning, "validation warning");
            }
            let partial_path = args.output_dir.join("document.partial.json");
            write_json_pretty(&partial_path, partial.as_ref())?;
            info!(path = %partial_path.display(), "wrote partial document for diagnosis");
            bail!("strict validation failed: {reasons}");
        }
        Err(error) => {
            return Err(error).with_context(|| format!("extraction failed for {}", args.input.display()));
        }
    };

    for warning in &extraction.warnings {
        warn!(warning = %warning, "extraction warning");
    }

    write_json_pretty(&document_path, &extraction.document)?;

    let document = &extraction.document;
    let manifest = ExtractionRunManifest {
        manifest_version: 1,
        run_id: run_id.clone(),
        generated_at: now_utc_string(),
        source_path: args.input.display().to_string(),
        source_sha256,
        document_path: document_path.display().to_string(),
        options: ExtractionOptionsEcho {
            strict: options.strict,
            compute_metadata: options.compute_metadata,
        },
        counts: ExtractionCounts {
            chapters: document.chapters.len(),
            sections: document.section_count(),
            jury_members: document.jury.len(),
            abstracts: document.abstracts.len(),
            figure_entries: document.figures.len(),
            table_entries: document.tables.len(),
            bibliography_entries: document.bibliography.len(),
            word_count: document.metadata.word_count,
            page_estimate: document.metadata.page_estimate,
            lines_total: extraction.stats.lines_total,
            boundary_lines: extraction.stats.boundary_lines,
            skipped_lines: extraction.stats.skipped_lines,
        },
        warnings: extraction.warnings.clone(),
        notes: vec![
            "Extraction ran single-pass over the normalized line stream.".to_string(),
            "Free-text fields are not sanitized; escape them before rendering into markup."
                .to_string(),
        ],
    };
    write_json_pretty(&manifest_path, &manifest)?;

    if args.stdout {
        let rendered = serde_json::to_string_pretty(&extraction.document)
            .context("failed to render document json")?;
        println!("{rendered}");
    }

    info!(
        document = %document_path.display(),
        manifest = %manifest_path.display(),
        chapters = document.chapters.len(),
        warnings = extraction.warnings.len(),
        "extraction completed"
    );

    Ok(())
}
