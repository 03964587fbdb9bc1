use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "resume-extract",
    version,
    about = "Normalizes a resume document into JSON for the portfolio front end"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Extract(ExtractArgs),
    Status(StatusArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ExtractArgs {
    /// Project root that source candidates and output paths resolve against.
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Explicit source file; skips the candidate-path probe.
    #[arg(long)]
    pub source: Option<PathBuf>,

    #[arg(long, default_value = ".cache/resume-extract")]
    pub cache_root: PathBuf,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,

    /// Category labels tried by the summary-tail skills fallback.
    #[arg(long = "skill-category")]
    pub skill_categories: Vec<String>,

    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    #[arg(long, default_value = ".cache/resume-extract")]
    pub cache_root: PathBuf,
}
