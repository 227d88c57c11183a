use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tpl-split")]
#[command(about = "A CLI tool for rendering HTML templates into bounded-size, navigable artifacts")]
#[command(version = "0.1.0")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output directory for rendered artifacts
    #[arg(short, long, global = true, default_value = "./output")]
    pub output: PathBuf,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render templates into one or more self-contained artifacts
    Render(RenderArgs),

    /// Analyze template complexity without rendering
    Analyze(AnalyzeArgs),

    /// Validate input sources and data contexts
    Validate(ValidateArgs),
}

#[derive(Args)]
pub struct RenderArgs {
    /// Input sources (file paths, directories, or URLs)
    #[arg(required = true, value_name = "SOURCE")]
    pub sources: Vec<String>,

    /// JSON file with the data context for substitution
    #[arg(short, long, value_name = "FILE")]
    pub data: Option<PathBuf>,

    /// Soft size ceiling per artifact, in bytes
    #[arg(long, default_value = "500000")]
    pub max_size: usize,

    /// Component count above which splitting is preferred
    #[arg(long, default_value = "100")]
    pub split_threshold: usize,

    /// Number of visual-priority tiers for component scheduling
    #[arg(long, default_value = "5")]
    pub priority_levels: usize,

    /// Disable skeleton placeholders for deferred components
    #[arg(long)]
    pub no_skeleton: bool,

    /// Emit inline progress feedback markers
    #[arg(long)]
    pub feedback: bool,

    /// Never split on logical sections, even when detected
    #[arg(long)]
    pub no_logical_division: bool,

    /// Write a JSON manifest next to the artifacts
    #[arg(long, default_value = "true")]
    pub include_manifest: bool,

    /// Force overwrite existing output files
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Input sources (file paths, directories, or URLs)
    #[arg(required = true, value_name = "SOURCE")]
    pub sources: Vec<String>,

    /// Soft size ceiling per artifact, in bytes
    #[arg(long, default_value = "500000")]
    pub max_size: usize,

    /// Component count above which splitting is preferred
    #[arg(long, default_value = "100")]
    pub split_threshold: usize,

    /// Output analysis to JSON file
    #[arg(long, value_name = "FILE")]
    pub json_output: Option<PathBuf>,

    /// Show detailed section and scenario information
    #[arg(long)]
    pub detailed: bool,
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Input sources (file paths, directories, or URLs)
    #[arg(required = true, value_name = "SOURCE")]
    pub sources: Vec<String>,

    /// JSON data context to validate alongside the sources
    #[arg(short, long, value_name = "FILE")]
    pub data: Option<PathBuf>,

    /// Check if sources are accessible
    #[arg(long)]
    pub check_access: bool,
}
