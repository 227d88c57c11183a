use crate::error::Result;
use crate::services::navigation::NavigationInjector;
use crate::services::renderer::ProgressiveRenderer;
use crate::types::{Artifact, RenderOptions, Section, SplitPlan};
use regex::Regex;
use serde_json::Value;
use tracing::{debug, info, warn};

pub const BASE_TITLE: &str = "Visualização Progressiva";
const ARTIFACT_TYPE: &str = "text/html";

pub struct ArtifactAssembler {
    tag_pattern: Regex,
    component_class_pattern: Regex,
    style_block_pattern: Regex,
    navigation: NavigationInjector,
}

impl ArtifactAssembler {
    pub fn new() -> Self {
        Self {
            // Every tag boundary; section and component extraction filter by name
            tag_pattern: Regex::new(r"(?i)<(/?)([a-z][a-z0-9]*)").unwrap(),
            component_class_pattern: Regex::new(
                r#"(?i)class\s*=\s*["'][^"']*\b(container|section|row|col|card|component)"#,
            )
            .unwrap(),
            style_block_pattern: Regex::new(r"(?is)<style[^>]*>.*?</style>").unwrap(),
            navigation: NavigationInjector::new(),
        }
    }

    /// Executes a split plan. Chunks are rendered sequentially in document
    /// order; a renderer failure for any chunk aborts the whole call.
    pub async fn assemble(
        &self,
        renderer: &ProgressiveRenderer,
        plan: &SplitPlan,
        template: &str,
        data: &Value,
        options: &RenderOptions,
    ) -> Result<Vec<Artifact>> {
        info!(
            "Assembling artifacts with plan '{}' ({} chars)",
            plan.kind(),
            template.len()
        );

        match plan {
            SplitPlan::NoSplit => self.assemble_single(renderer, template, data, options).await,
            SplitPlan::Logical(points) => {
                self.assemble_logical(renderer, points, template, data, options)
                    .await
            }
            SplitPlan::Automatic { target_count } => {
                self.assemble_automatic(renderer, template, data, options, *target_count)
                    .await
            }
        }
    }

    async fn assemble_single(
        &self,
        renderer: &ProgressiveRenderer,
        template: &str,
        data: &Value,
        options: &RenderOptions,
    ) -> Result<Vec<Artifact>> {
        let content = renderer.render(template, data, options).await?;

        Ok(vec![Artifact {
            artifact_type: ARTIFACT_TYPE.to_string(),
            title: BASE_TITLE.to_string(),
            content,
        }])
    }

    async fn assemble_logical(
        &self,
        renderer: &ProgressiveRenderer,
        points: &[Section],
        template: &str,
        data: &Value,
        options: &RenderOptions,
    ) -> Result<Vec<Artifact>> {
        let styles = self.navigation.extract_styles(template);

        // Extract first so part totals reflect the sections actually present
        let mut fragments: Vec<(Section, String)> = Vec::new();
        for section in points {
            match self.extract_section(template, *section) {
                Some(fragment) => fragments.push((*section, fragment)),
                None => debug!("Section '{}' not found, skipping", section.as_str()),
            }
        }

        if fragments.is_empty() {
            warn!("No logical sections could be extracted, rendering as a single artifact");
            return self.assemble_single(renderer, template, data, options).await;
        }

        let total = fragments.len();
        let mut artifacts = Vec::with_capacity(total);

        for (index, (section, fragment)) in fragments.iter().enumerate() {
            debug!(
                "Rendering section '{}' as part {} of {}",
                section.as_str(),
                index + 1,
                total
            );

            let shell = self.build_chunk_shell(fragment, index + 1, total, &styles, None);
            let content = renderer.render(&shell, data, options).await?;

            artifacts.push(Artifact {
                artifact_type: ARTIFACT_TYPE.to_string(),
                title: Self::title_for(index + 1, total),
                content,
            });
        }

        Ok(artifacts)
    }

    async fn assemble_automatic(
        &self,
        renderer: &ProgressiveRenderer,
        template: &str,
        data: &Value,
        options: &RenderOptions,
        target_count: usize,
    ) -> Result<Vec<Artifact>> {
        let target_count = target_count.max(1);
        let styles = self.navigation.extract_styles(template);
        let components = self.extract_components(template);

        let (chunks, head_inner) = if components.len() >= target_count && !components.is_empty() {
            let per_artifact = (components.len() + target_count - 1) / target_count;
            info!(
                "Component chunking: {} components, {} per artifact",
                components.len(),
                per_artifact
            );

            let chunks: Vec<String> = components
                .chunks(per_artifact)
                .map(|group| group.join("\n"))
                .collect();
            (chunks, None)
        } else {
            debug!(
                "Found {} components for {} artifacts, falling back to content windows",
                components.len(),
                target_count
            );

            // Keep the original head on every chunk so scripts and metadata
            // survive the split; styles are injected separately
            let head_inner = self
                .extract_element(template, "head")
                .map(|element| Self::element_inner(&element, "head").to_string())
                .map(|inner| self.style_block_pattern.replace_all(&inner, "").to_string());

            let body = self
                .extract_element(template, "body")
                .map(|element| Self::element_inner(&element, "body").to_string())
                .unwrap_or_else(|| template.to_string());

            let characters: Vec<char> = body.chars().collect();
            let chunk_size = ((characters.len() + target_count - 1) / target_count).max(1);

            let chunks: Vec<String> = characters
                .chunks(chunk_size)
                .map(|window| window.iter().collect())
                .collect();
            (chunks, head_inner)
        };

        if chunks.is_empty() {
            warn!("Automatic split produced no chunks, rendering as a single artifact");
            return self.assemble_single(renderer, template, data, options).await;
        }

        let total = chunks.len();
        let mut artifacts = Vec::with_capacity(total);

        for (index, chunk) in chunks.iter().enumerate() {
            let shell =
                self.build_chunk_shell(chunk, index + 1, total, &styles, head_inner.as_deref());
            let content = renderer.render(&shell, data, options).await?;

            artifacts.push(Artifact {
                artifact_type: ARTIFACT_TYPE.to_string(),
                title: Self::title_for(index + 1, total),
                content,
            });
        }

        Ok(artifacts)
    }

    /// Finds the first block matching one of the section's tag candidates.
    fn extract_section(&self, template: &str, section: Section) -> Option<String> {
        let candidates: &[&str] = match section {
            Section::Header => &["header", "nav"],
            Section::Main => &["main", "section", "article"],
            Section::Footer => &["footer"],
        };

        for &tag in candidates {
            if let Some(element) = self.extract_element(template, tag) {
                return Some(element);
            }
        }

        None
    }

    /// Balanced scan for the first `<tag>...</tag>` block. An unclosed
    /// block tolerantly extends to the end of the document.
    fn extract_element(&self, template: &str, tag: &str) -> Option<String> {
        let mut depth: usize = 0;
        let mut start: Option<usize> = None;

        for captures in self.tag_pattern.captures_iter(template) {
            if !captures[2].eq_ignore_ascii_case(tag) {
                continue;
            }

            let whole = captures.get(0).unwrap();
            let is_close = !captures[1].is_empty();

            if !is_close {
                if start.is_none() {
                    start = Some(whole.start());
                }
                depth += 1;
            } else if let Some(open_start) = start {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    let end = template[whole.start()..]
                        .find('>')
                        .map(|offset| whole.start() + offset + 1)
                        .unwrap_or(template.len());
                    return Some(template[open_start..end].to_string());
                }
            }
        }

        start.map(|open_start| template[open_start..].to_string())
    }

    /// Extracts non-overlapping top-level block components: `<div>` elements
    /// whose class matches a recognizable container pattern.
    fn extract_components(&self, template: &str) -> Vec<String> {
        let tokens: Vec<(usize, bool)> = self
            .tag_pattern
            .captures_iter(template)
            .filter(|captures| captures[2].eq_ignore_ascii_case("div"))
            .map(|captures| {
                let whole = captures.get(0).unwrap();
                (whole.start(), !captures[1].is_empty())
            })
            .collect();

        let mut components = Vec::new();
        let mut index = 0;

        while index < tokens.len() {
            let (position, is_close) = tokens[index];
            if is_close {
                index += 1;
                continue;
            }

            let open_end = template[position..]
                .find('>')
                .map(|offset| position + offset + 1)
                .unwrap_or(template.len());

            if !self.component_class_pattern.is_match(&template[position..open_end]) {
                index += 1;
                continue;
            }

            let mut depth = 1;
            let mut cursor = index + 1;
            let mut end = template.len();

            while cursor < tokens.len() {
                let (token_position, token_is_close) = tokens[cursor];
                if token_is_close {
                    depth -= 1;
                    if depth == 0 {
                        end = template[token_position..]
                            .find('>')
                            .map(|offset| token_position + offset + 1)
                            .unwrap_or(template.len());
                        break;
                    }
                } else {
                    depth += 1;
                }
                cursor += 1;
            }

            components.push(template[position..end].to_string());
            index = cursor + 1;
        }

        components
    }

    /// Strips the open tag and the trailing close tag from an extracted
    /// element, leaving its inner markup.
    fn element_inner<'a>(element: &'a str, tag: &str) -> &'a str {
        let inner_start = element.find('>').map(|offset| offset + 1).unwrap_or(0);
        let inner = &element[inner_start..];

        if let Some(close_start) = inner.rfind("</") {
            let after = &inner.as_bytes()[close_start + 2..];
            if after.len() >= tag.len() && after[..tag.len()].eq_ignore_ascii_case(tag.as_bytes()) {
                return &inner[..close_start];
            }
        }

        inner
    }

    /// Wraps a chunk fragment in a self-contained document shell with the
    /// shared styles, navigation controls and part banner.
    fn build_chunk_shell(
        &self,
        fragment: &str,
        index: usize,
        total: usize,
        styles: &str,
        head_inner: Option<&str>,
    ) -> String {
        let navigation = NavigationInjector::build_navigation(index, total);

        let mut shell = String::with_capacity(fragment.len() + styles.len() + 512);
        shell.push_str("<!DOCTYPE html>\n<html lang=\"pt-BR\">\n<head>\n<meta charset=\"utf-8\">\n");
        shell.push_str(&format!("<title>{}</title>\n", Self::title_for(index, total)));
        shell.push_str("<link rel=\"stylesheet\" href=\"shared.css\">\n");

        if let Some(head) = head_inner {
            let head = head.trim();
            if !head.is_empty() {
                shell.push_str(head);
                shell.push('\n');
            }
        }

        shell.push_str("<style>\n");
        shell.push_str(styles);
        shell.push_str("\n</style>\n</head>\n<body>\n");

        if !navigation.is_empty() {
            shell.push_str(&navigation);
            shell.push('\n');
        }

        if total > 1 {
            shell.push_str(&format!(
                "<div class=\"artifact-alert\">Parte {} de {}</div>\n",
                index, total
            ));
        }

        shell.push_str("<div class=\"artifact-content\">\n");
        shell.push_str(fragment);
        shell.push_str("\n</div>\n</body>\n</html>\n");

        shell
    }

    fn title_for(index: usize, total: usize) -> String {
        if total > 1 {
            format!("{} (Parte {} de {})", BASE_TITLE, index, total)
        } else {
            BASE_TITLE.to_string()
        }
    }
}

impl Default for ArtifactAssembler {
    fn default() -> Self {
        Self::new()
    }
}
