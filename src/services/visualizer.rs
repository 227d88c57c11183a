use crate::error::Result;
use crate::services::renderer::{resolve, stringify};
use crate::types::Artifact;
use regex::{Captures, Regex};
use serde_json::Value;
use tracing::info;

/// Last-resort artifact producer: plain substitution, no complexity
/// analysis, no splitting, no priority pass. Used when the progressive
/// path fails so callers still receive a viewable document.
pub struct ArtifactVisualizer {
    expression_pattern: Regex,
}

impl ArtifactVisualizer {
    pub fn new() -> Self {
        Self {
            expression_pattern: Regex::new(r"\{\{\s*([A-Za-z_][\w.]*)\s*\}\}").unwrap(),
        }
    }

    pub async fn create_html_artifact(&self, template: &str, data: &Value) -> Result<Artifact> {
        info!("Creating fallback HTML artifact ({} chars)", template.len());

        let body = self
            .expression_pattern
            .replace_all(template, |captures: &Captures| {
                captures
                    .get(1)
                    .and_then(|path| resolve(path.as_str(), data))
                    .map(stringify)
                    .unwrap_or_default()
            })
            .to_string();

        let content = format!(
            "<!DOCTYPE html>\n<html lang=\"pt-BR\">\n<head>\n<meta charset=\"utf-8\">\n<title>Visualização HTML</title>\n</head>\n<body>\n{}\n</body>\n</html>\n",
            body
        );

        Ok(Artifact {
            artifact_type: "text/html".to_string(),
            title: "Visualização HTML".to_string(),
            content,
        })
    }
}

impl Default for ArtifactVisualizer {
    fn default() -> Self {
        Self::new()
    }
}
