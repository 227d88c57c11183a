use crate::error::{Result, SplitterError};
use crate::types::RenderOptions;
use regex::{Captures, Regex};
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

pub type HelperFn = fn(&Value) -> String;

/// Named value-formatting helpers available to `{{helper path}}`
/// expressions. Populated once at process start and passed into the
/// renderer at construction; never mutated per request.
pub struct HelperRegistry {
    helpers: HashMap<String, HelperFn>,
}

impl HelperRegistry {
    pub fn new() -> Self {
        Self {
            helpers: HashMap::new(),
        }
    }

    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("uppercase", |value| stringify(value).to_uppercase());
        registry.register("lowercase", |value| stringify(value).to_lowercase());
        registry.register("json", |value| {
            serde_json::to_string(value).unwrap_or_default()
        });
        registry
    }

    pub fn register(&mut self, name: &str, helper: HelperFn) {
        self.helpers.insert(name.to_string(), helper);
    }

    pub fn get(&self, name: &str) -> Option<&HelperFn> {
        self.helpers.get(name)
    }
}

impl Default for HelperRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

/// Walks a dotted path through a JSON data context.
pub fn resolve<'a>(path: &str, data: &'a Value) -> Option<&'a Value> {
    let mut current = data;
    for key in path.split('.') {
        current = current.get(key)?;
    }
    Some(current)
}

pub fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Lower-level rendering primitive: variable substitution plus
/// priority-tiered component scheduling over a single document.
pub struct ProgressiveRenderer {
    helpers: HelperRegistry,
    expression_pattern: Regex,
    component_open_pattern: Regex,
    component_class_pattern: Regex,
}

impl ProgressiveRenderer {
    pub fn new(helpers: HelperRegistry) -> Self {
        Self {
            helpers,
            expression_pattern: Regex::new(
                r"\{\{\s*([A-Za-z_][\w.]*)(?:\s+([A-Za-z_][\w.]*))?\s*\}\}",
            )
            .unwrap(),
            component_open_pattern: Regex::new(r"(?i)<div\b[^>]*>").unwrap(),
            component_class_pattern: Regex::new(
                r#"(?i)class\s*=\s*["'][^"']*\b(container|section|row|col|card|component)"#,
            )
            .unwrap(),
        }
    }

    /// Renders a document shell against a data context. Substitution runs
    /// first, then recognizable components are annotated with their
    /// priority tier in document order.
    pub async fn render(
        &self,
        shell: &str,
        data: &Value,
        options: &RenderOptions,
    ) -> Result<String> {
        if options.priority_levels == 0 {
            return Err(SplitterError::Render {
                reason: "Number of priority levels must be greater than 0".to_string(),
            });
        }

        let substituted = self.substitute(shell, data);
        let scheduled = self.schedule_components(&substituted, options);

        Ok(scheduled)
    }

    /// Replaces `{{dotted.path}}` and `{{helper dotted.path}}` expressions.
    /// Missing paths and unknown helpers render as empty strings rather
    /// than failing.
    pub fn substitute(&self, template: &str, data: &Value) -> String {
        self.expression_pattern
            .replace_all(template, |captures: &Captures| {
                let first = captures.get(1).map(|m| m.as_str()).unwrap_or("");
                match captures.get(2) {
                    Some(argument) => {
                        let value = resolve(argument.as_str(), data);
                        match self.helpers.get(first) {
                            Some(helper) => helper(value.unwrap_or(&Value::Null)),
                            None => String::new(),
                        }
                    }
                    None => resolve(first, data).map(stringify).unwrap_or_default(),
                }
            })
            .to_string()
    }

    fn schedule_components(&self, markup: &str, options: &RenderOptions) -> String {
        let component_opens: Vec<(usize, usize)> = self
            .component_open_pattern
            .find_iter(markup)
            .filter(|m| self.component_class_pattern.is_match(m.as_str()))
            .map(|m| (m.start(), m.end()))
            .collect();

        if component_opens.is_empty() {
            return markup.to_string();
        }

        let total = component_opens.len();
        // Ceiling division spreads components evenly across the tiers
        let per_tier = (total + options.priority_levels - 1) / options.priority_levels;
        let per_tier = per_tier.max(1);

        debug!(
            "Scheduling {} components across {} priority tiers",
            total, options.priority_levels
        );

        let mut output = String::with_capacity(markup.len() + total * 24);
        let mut last_end = 0;

        for (index, (start, _)) in component_opens.iter().enumerate() {
            let tier = (index / per_tier).min(options.priority_levels - 1);

            output.push_str(&markup[last_end..*start]);

            if options.feedback_enabled {
                output.push_str(&format!(
                    "<!-- progresso: componente {} de {} -->",
                    index + 1,
                    total
                ));
            }

            // Insert annotations right after the tag name: "<div" is four
            // characters regardless of case
            let insert_at = start + 4;
            output.push_str(&markup[*start..insert_at]);
            output.push_str(&format!(" data-priority=\"{}\"", tier));
            if options.skeleton_loading && tier > 0 {
                output.push_str(" data-skeleton=\"pending\"");
            }

            last_end = insert_at;
        }

        output.push_str(&markup[last_end..]);
        output
    }
}
