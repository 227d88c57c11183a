use regex::Regex;

/// Navigation rules appended to every chunk so the controls look the same
/// regardless of what the source template styles.
const NAVIGATION_STYLES: &str = r#".artifact-nav { display: flex; gap: 8px; margin-bottom: 16px; }
.artifact-nav .nav-control { padding: 4px 12px; border: 1px solid #ccc; border-radius: 4px; text-decoration: none; color: #333; }
.artifact-nav .nav-control.active { background: #333; color: #fff; font-weight: bold; }
.artifact-alert { padding: 8px 12px; background: #fff3cd; border: 1px solid #ffe69c; border-radius: 4px; margin-bottom: 16px; }"#;

pub struct NavigationInjector {
    style_pattern: Regex,
}

impl NavigationInjector {
    pub fn new() -> Self {
        Self {
            style_pattern: Regex::new(r"(?is)<style[^>]*>(.*?)</style>").unwrap(),
        }
    }

    /// Builds the cross-artifact navigation block for part `index` of `total`.
    /// Single-artifact output needs no navigation, so `total <= 1` yields an
    /// empty string. Controls are inert anchors; artifacts stay independently
    /// viewable.
    pub fn build_navigation(index: usize, total: usize) -> String {
        if total <= 1 {
            return String::new();
        }

        let mut markup = String::from("<nav class=\"artifact-nav\">\n");
        for part in 1..=total {
            let class = if part == index {
                "nav-control active"
            } else {
                "nav-control"
            };
            markup.push_str(&format!(
                "  <a href=\"#\" class=\"{}\">Parte {}</a>\n",
                class, part
            ));
        }
        markup.push_str("</nav>");

        markup
    }

    /// Concatenates every inline `<style>` body from the source template in
    /// document order and appends the fixed navigation rules.
    pub fn extract_styles(&self, template: &str) -> String {
        let mut css = String::new();

        for captures in self.style_pattern.captures_iter(template) {
            if let Some(body) = captures.get(1) {
                let body = body.as_str().trim();
                if !body.is_empty() {
                    css.push_str(body);
                    css.push('\n');
                }
            }
        }

        css.push_str(NAVIGATION_STYLES);
        css
    }
}

impl Default for NavigationInjector {
    fn default() -> Self {
        Self::new()
    }
}
