use crate::error::{Result, SplitterError};
use crate::types::{SourceType, TemplateMetadata};
use serde_json::Value;
use std::path::Path;
use tokio::fs;
use tracing::{info, warn};
use url::Url;
use walkdir::WalkDir;

const TEMPLATE_EXTENSIONS: &[&str] = &["html", "htm", "hbs"];

pub struct ContentFetcher;

impl ContentFetcher {
    pub async fn fetch_content(source: &str) -> Result<(String, TemplateMetadata)> {
        if Self::is_url(source) {
            Self::fetch_from_url(source).await
        } else {
            Self::fetch_from_file(source).await
        }
    }

    async fn fetch_from_url(url: &str) -> Result<(String, TemplateMetadata)> {
        info!("Fetching template from URL: {}", url);

        let parsed_url = Url::parse(url)?;
        let client = reqwest::Client::new();
        let response = client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(SplitterError::HttpStatus {
                status: response.status().as_u16(),
            });
        }

        let content = response.text().await?;
        let filename = Self::extract_filename_from_url(&parsed_url);
        let size_chars = content.chars().count();

        let metadata = TemplateMetadata {
            filename,
            source_type: SourceType::Url,
            created_at: chrono::Utc::now().to_rfc3339(),
            size_chars,
        };

        Ok((content, metadata))
    }

    async fn fetch_from_file(file_path: &str) -> Result<(String, TemplateMetadata)> {
        info!("Reading template file: {}", file_path);

        let path = Path::new(file_path);

        if !path.exists() {
            return Err(SplitterError::FileNotFound {
                path: file_path.to_string(),
            });
        }

        let content = fs::read_to_string(path).await?;
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();
        let size_chars = content.chars().count();

        let metadata = TemplateMetadata {
            filename,
            source_type: SourceType::LocalFile,
            created_at: chrono::Utc::now().to_rfc3339(),
            size_chars,
        };

        Ok((content, metadata))
    }

    /// Loads the JSON data context. No file means an empty context; a file
    /// that parses to anything other than an object is rejected.
    pub async fn load_data_context(path: Option<&Path>) -> Result<Value> {
        let Some(path) = path else {
            return Ok(Value::Object(serde_json::Map::new()));
        };

        if !path.exists() {
            return Err(SplitterError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let raw = fs::read_to_string(path).await?;
        let data: Value = serde_json::from_str(&raw)?;

        if !data.is_object() {
            return Err(SplitterError::InvalidData {
                reason: format!(
                    "Data context in {} must be a JSON object",
                    path.display()
                ),
            });
        }

        Ok(data)
    }

    fn is_url(source: &str) -> bool {
        source.starts_with("http://") || source.starts_with("https://")
    }

    fn extract_filename_from_url(url: &Url) -> String {
        url.path_segments()
            .and_then(|segments| segments.last())
            .and_then(|name| if name.is_empty() { None } else { Some(name) })
            .unwrap_or("downloaded.html")
            .to_string()
    }

    fn is_template_file(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| TEMPLATE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
            .unwrap_or(false)
    }

    /// Expands directory sources into the template files beneath them;
    /// files and URLs pass through unchanged.
    pub fn expand_sources(sources: &[String]) -> Vec<String> {
        let mut expanded = Vec::new();

        for source in sources {
            let path = Path::new(source);
            if !Self::is_url(source) && path.is_dir() {
                let mut found = 0;
                for entry in WalkDir::new(path)
                    .sort_by_file_name()
                    .into_iter()
                    .filter_map(|entry| entry.ok())
                {
                    if entry.file_type().is_file() && Self::is_template_file(entry.path()) {
                        expanded.push(entry.path().display().to_string());
                        found += 1;
                    }
                }
                if found == 0 {
                    warn!("No template files found under directory: {}", source);
                }
            } else {
                expanded.push(source.clone());
            }
        }

        expanded
    }

    pub async fn validate_sources(sources: &[String]) -> Result<Vec<String>> {
        let mut validated = Vec::new();

        for source in sources {
            if Self::is_url(source) {
                // Validate URL format
                Url::parse(source)?;
                validated.push(source.clone());
            } else {
                let path = Path::new(source);
                if path.exists() && (path.is_file() || path.is_dir()) {
                    validated.push(source.clone());
                } else {
                    return Err(SplitterError::FileNotFound {
                        path: source.clone(),
                    });
                }
            }
        }

        Ok(validated)
    }
}
