use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "memoire",
    version,
    about = "Academic thesis structure extraction tooling"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract the document model from a thesis file and write JSON artifacts
    Extract(ExtractArgs),
    /// Run extraction and report validation findings without writing artifacts
    Check(CheckArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ExtractArgs {
    /// Source document, HTML or plain text
    #[arg(long)]
    pub input: PathBuf,

    #[arg(long, default_value = "out")]
    pub output_dir: PathBuf,

    #[arg(long)]
    pub document_path: Option<PathBuf>,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,

    /// Treat validation warnings as a hard failure
    #[arg(long, default_value_t = false)]
    pub strict: bool,

    /// Skip word/page count derivation
    #[arg(long, default_value_t = false)]
    pub skip_metadata: bool,

    /// Also print the document JSON to stdout
    #[arg(long, default_value_t = false)]
    pub stdout: bool,
}

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    #[arg(long)]
    pub input: PathBuf,

    #[arg(long, default_value_t = false)]
    pub strict: bool,
}
