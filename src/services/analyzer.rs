use crate::types::{ComplexityProfile, Section};
use regex::Regex;
use std::collections::HashMap;
use tracing::debug;

/// Weighted complexity contribution of each counted construct.
const COMPONENT_WEIGHT: f64 = 0.1;
const IMAGE_WEIGHT: f64 = 0.2;
const TABLE_WEIGHT: f64 = 0.5;
const FORM_WEIGHT: f64 = 0.3;
const SCRIPT_WEIGHT: f64 = 0.3;

pub struct ComplexityAnalyzer {
    component_pattern: Regex,
    image_pattern: Regex,
    table_pattern: Regex,
    form_pattern: Regex,
    script_pattern: Regex,
    header_pattern: Regex,
    main_pattern: Regex,
    footer_pattern: Regex,
}

impl ComplexityAnalyzer {
    pub fn new() -> Self {
        Self {
            // Opening tags only; the pattern scan tolerates malformed markup
            component_pattern: Regex::new(r"(?i)<div\b").unwrap(),
            image_pattern: Regex::new(r"(?i)<img\b").unwrap(),
            table_pattern: Regex::new(r"(?i)<table\b").unwrap(),
            form_pattern: Regex::new(r"(?i)<form\b").unwrap(),
            script_pattern: Regex::new(r"(?i)<script\b").unwrap(),
            header_pattern: Regex::new(r"(?i)<(header|nav)\b").unwrap(),
            main_pattern: Regex::new(r"(?i)<(main|section|article)\b").unwrap(),
            footer_pattern: Regex::new(r"(?i)<footer\b").unwrap(),
        }
    }

    /// Scans raw template markup into a structural profile. Pure and
    /// infallible: absent constructs simply count zero.
    pub fn analyze(&self, template: &str) -> ComplexityProfile {
        let component_count = self.component_pattern.find_iter(template).count();
        let image_count = self.image_pattern.find_iter(template).count();
        let table_count = self.table_pattern.find_iter(template).count();
        let form_count = self.form_pattern.find_iter(template).count();
        let script_count = self.script_pattern.find_iter(template).count();

        let has_header = self.header_pattern.is_match(template);
        let has_main_content = self.main_pattern.is_match(template);
        let has_footer = self.footer_pattern.is_match(template);

        let complexity_score = (component_count as f64 * COMPONENT_WEIGHT
            + image_count as f64 * IMAGE_WEIGHT
            + table_count as f64 * TABLE_WEIGHT
            + form_count as f64 * FORM_WEIGHT
            + script_count as f64 * SCRIPT_WEIGHT)
            .round() as u64;

        // Fixed document order: header, main, footer
        let mut division_points = Vec::new();
        if has_header {
            division_points.push(Section::Header);
        }
        if has_main_content {
            division_points.push(Section::Main);
        }
        if has_footer {
            division_points.push(Section::Footer);
        }

        debug!(
            "Analyzed template: {} components, score {}, {} division points",
            component_count,
            complexity_score,
            division_points.len()
        );

        ComplexityProfile {
            component_count,
            image_count,
            table_count,
            form_count,
            script_count,
            has_header,
            has_footer,
            has_main_content,
            complexity_score,
            division_points,
            size: template.chars().count(),
        }
    }

    pub fn get_analysis_stats(
        &self,
        profile: &ComplexityProfile,
    ) -> HashMap<String, serde_json::Value> {
        let mut stats = HashMap::new();

        stats.insert("component_count".to_string(), profile.component_count.into());
        stats.insert("image_count".to_string(), profile.image_count.into());
        stats.insert("table_count".to_string(), profile.table_count.into());
        stats.insert("form_count".to_string(), profile.form_count.into());
        stats.insert("script_count".to_string(), profile.script_count.into());
        stats.insert(
            "complexity_score".to_string(),
            profile.complexity_score.into(),
        );
        stats.insert("size_chars".to_string(), profile.size.into());

        let sections: Vec<serde_json::Value> = profile
            .division_points
            .iter()
            .map(|s| s.as_str().into())
            .collect();
        stats.insert("division_points".to_string(), sections.into());

        stats
    }
}

impl Default for ComplexityAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
