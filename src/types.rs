use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Logical section of a template usable as a split boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Header,
    Main,
    Footer,
}

impl Section {
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Header => "header",
            Section::Main => "main",
            Section::Footer => "footer",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplexityProfile {
    pub component_count: usize,
    pub image_count: usize,
    pub table_count: usize,
    pub form_count: usize,
    pub script_count: usize,
    pub has_header: bool,
    pub has_footer: bool,
    pub has_main_content: bool,
    pub complexity_score: u64,
    pub division_points: Vec<Section>,
    pub size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderOptions {
    pub priority_levels: usize,
    pub skeleton_loading: bool,
    pub feedback_enabled: bool,
    pub artifact_max_size: usize,
    pub split_threshold: usize,
    pub use_logical_division: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            priority_levels: 5,
            skeleton_loading: true,
            feedback_enabled: false,
            artifact_max_size: 500_000,
            split_threshold: 100,
            use_logical_division: true,
        }
    }
}

/// Decision output consumed by the assembler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitPlan {
    NoSplit,
    Logical(Vec<Section>),
    Automatic { target_count: usize },
}

impl SplitPlan {
    pub fn kind(&self) -> &'static str {
        match self {
            SplitPlan::NoSplit => "no-split",
            SplitPlan::Logical(_) => "logical",
            SplitPlan::Automatic { .. } => "automatic",
        }
    }
}

/// Self-contained output document. Immutable once returned; the caller owns
/// persistence and display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artifact {
    pub artifact_type: String,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SourceType {
    LocalFile,
    Url,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateMetadata {
    pub filename: String,
    pub source_type: SourceType,
    pub created_at: String,
    pub size_chars: usize,
}

/// Per-source summary produced by the render command.
#[derive(Debug, Clone)]
pub struct RenderReport {
    pub source: String,
    pub plan_kind: String,
    pub artifact_count: usize,
    pub output_files: Vec<PathBuf>,
    pub manifest_file: Option<PathBuf>,
}
