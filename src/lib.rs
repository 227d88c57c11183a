//! # Template Splitter Library
//!
//! A library for rendering large HTML templates into bounded-size,
//! self-contained artifacts. Templates are analyzed for structural
//! complexity, split along logical section boundaries or automatic
//! size/component windows, and each chunk is rendered progressively with
//! priority-ordered component scheduling.
//!
//! ## Example Usage
//!
//! ```rust
//! use template_splitter::{ArtifactPipeline, RenderOptions};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pipeline = ArtifactPipeline::default();
//!     let data = json!({ "title": "Painel da Loja" });
//!
//!     let artifacts = pipeline
//!         .render_to_artifacts("<h1>{{title}}</h1>", &data, &RenderOptions::default())
//!         .await?;
//!
//!     println!("Created {} artifacts", artifacts.len());
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod services;
pub mod types;

// Re-export main types and services for easier usage
pub use error::{Result, SplitterError};
pub use services::{
    ArtifactAssembler, ArtifactPipeline, ArtifactVisualizer, ComplexityAnalyzer, ContentFetcher,
    HelperRegistry, NavigationInjector, ProgressiveRenderer, SplitPlanner,
};
pub use types::{
    Artifact, ComplexityProfile, RenderOptions, RenderReport, Section, SourceType, SplitPlan,
    TemplateMetadata,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pipeline() -> ArtifactPipeline {
        ArtifactPipeline::default()
    }

    #[test]
    fn test_analyzer_counts_and_score() {
        let analyzer = ComplexityAnalyzer::new();
        let template = r#"
            <div>a</div><div>b</div><div>c</div>
            <img src="a.png"><img src="b.png">
            <table><tr><td>1</td></tr></table>
            <form action="/buy"></form>
            <script>go()</script>
        "#;

        let profile = analyzer.analyze(template);

        assert_eq!(profile.component_count, 3);
        assert_eq!(profile.image_count, 2);
        assert_eq!(profile.table_count, 1);
        assert_eq!(profile.form_count, 1);
        assert_eq!(profile.script_count, 1);
        // 3*0.1 + 2*0.2 + 1*0.5 + 1*0.3 + 1*0.3 = 1.8, rounded to 2
        assert_eq!(profile.complexity_score, 2);
    }

    #[test]
    fn test_analyzer_empty_template() {
        let analyzer = ComplexityAnalyzer::new();
        let profile = analyzer.analyze("");

        assert_eq!(profile.component_count, 0);
        assert_eq!(profile.complexity_score, 0);
        assert_eq!(profile.size, 0);
        assert!(profile.division_points.is_empty());
    }

    #[test]
    fn test_analyzer_is_idempotent() {
        let analyzer = ComplexityAnalyzer::new();
        let template = "<header><nav>x</nav></header><main><div class=\"row\">y</div></main>";

        assert_eq!(analyzer.analyze(template), analyzer.analyze(template));
    }

    #[test]
    fn test_division_points_in_document_order() {
        let analyzer = ComplexityAnalyzer::new();
        let template = "<footer>f</footer><header>h</header><main>m</main>";

        let profile = analyzer.analyze(template);

        // Fixed header -> main -> footer order regardless of source order
        assert_eq!(
            profile.division_points,
            vec![Section::Header, Section::Main, Section::Footer]
        );
    }

    #[test]
    fn test_planner_no_split_under_thresholds() {
        let analyzer = ComplexityAnalyzer::new();
        let profile = analyzer.analyze("<div>pequeno</div>");
        let plan = SplitPlanner::decide(&profile, &RenderOptions::default());

        assert_eq!(plan, SplitPlan::NoSplit);
    }

    #[test]
    fn test_planner_component_count_triggers_automatic_split() {
        // 150 components, no logical sections
        let template = "<div class=\"component\">Produto</div>".repeat(150);
        let analyzer = ComplexityAnalyzer::new();
        let profile = analyzer.analyze(&template);
        assert_eq!(profile.component_count, 150);

        let plan = SplitPlanner::decide(&profile, &RenderOptions::default());
        assert_eq!(plan, SplitPlan::Automatic { target_count: 1 });
    }

    #[test]
    fn test_planner_prefers_logical_sections() {
        // Three detectable sections covering ~900k chars
        let pad = "x".repeat(300_000);
        let template = format!(
            "<header>{}</header><main>{}</main><footer>{}</footer>",
            pad, pad, pad
        );
        let analyzer = ComplexityAnalyzer::new();
        let profile = analyzer.analyze(&template);

        let plan = SplitPlanner::decide(&profile, &RenderOptions::default());
        assert_eq!(
            plan,
            SplitPlan::Logical(vec![Section::Header, Section::Main, Section::Footer])
        );
    }

    #[test]
    fn test_planner_logical_division_can_be_disabled() {
        let pad = "x".repeat(300_000);
        let template = format!(
            "<header>{}</header><main>{}</main><footer>{}</footer>",
            pad, pad, pad
        );
        let analyzer = ComplexityAnalyzer::new();
        let profile = analyzer.analyze(&template);

        let options = RenderOptions {
            use_logical_division: false,
            ..RenderOptions::default()
        };

        assert_eq!(
            SplitPlanner::decide(&profile, &options),
            SplitPlan::Automatic { target_count: 3 }
        );
    }

    #[test]
    fn test_estimated_artifact_count() {
        assert_eq!(SplitPlanner::estimated_artifact_count(0, 500_000), 1);
        assert_eq!(SplitPlanner::estimated_artifact_count(400_000, 500_000), 1);
        assert_eq!(SplitPlanner::estimated_artifact_count(400_001, 500_000), 2);
        assert_eq!(SplitPlanner::estimated_artifact_count(900_000, 500_000), 3);
    }

    #[tokio::test]
    async fn test_small_template_renders_single_artifact() {
        let template = "<p>Bem-vindo à loja virtual!</p>";
        let artifacts = pipeline()
            .render_to_artifacts(template, &json!({}), &RenderOptions::default())
            .await
            .unwrap();

        assert_eq!(artifacts.len(), 1);
        assert_eq!(artifacts[0].title, "Visualização Progressiva");
        assert!(!artifacts[0].title.contains("Parte"));
        assert_eq!(artifacts[0].artifact_type, "text/html");
    }

    #[tokio::test]
    async fn test_component_chunking_keeps_all_components() {
        // The component count forces a split even though one artifact is
        // enough size-wise
        let template = "<div class=\"component\">Produto</div>".repeat(150);
        let artifacts = pipeline()
            .render_to_artifacts(&template, &json!({}), &RenderOptions::default())
            .await
            .unwrap();

        assert_eq!(artifacts.len(), 1);
        assert_eq!(
            artifacts[0].content.matches("Produto").count(),
            150,
            "all components survive the chunking"
        );
        // Priority tiers: 150 components over 5 tiers, 30 per tier
        assert_eq!(artifacts[0].content.matches("data-priority=\"0\"").count(), 30);
    }

    #[tokio::test]
    async fn test_logical_split_produces_ordered_parts() {
        let pad = "x".repeat(300_000);
        let template = format!(
            "<header><h1>Loja</h1>{}</header><main>{}</main><footer>{}</footer>",
            pad, pad, pad
        );
        let artifacts = pipeline()
            .render_to_artifacts(&template, &json!({}), &RenderOptions::default())
            .await
            .unwrap();

        assert_eq!(artifacts.len(), 3);
        assert!(artifacts[0].title.ends_with("(Parte 1 de 3)"));
        assert!(artifacts[1].title.ends_with("(Parte 2 de 3)"));
        assert!(artifacts[2].title.ends_with("(Parte 3 de 3)"));

        // Document order: header part, then main, then footer
        assert!(artifacts[0].content.contains("<header"));
        assert!(artifacts[1].content.contains("<main"));
        assert!(artifacts[2].content.contains("<footer"));

        // Each part carries the full navigation with its own control active
        for artifact in &artifacts {
            assert_eq!(artifact.content.matches("<a href=\"#\"").count(), 3);
            assert_eq!(artifact.content.matches("nav-control active").count(), 1);
        }
        assert!(artifacts[1].content.contains("Parte 2 de 3</div>"));
    }

    #[tokio::test]
    async fn test_missing_section_is_skipped_and_renumbered() {
        let assembler = ArtifactAssembler::new();
        let renderer = ProgressiveRenderer::new(HelperRegistry::with_builtins());
        let template = "<header>topo</header><main>conteúdo</main>";
        let plan = SplitPlan::Logical(vec![Section::Header, Section::Main, Section::Footer]);

        let artifacts = assembler
            .assemble(&renderer, &plan, template, &json!({}), &RenderOptions::default())
            .await
            .unwrap();

        assert_eq!(artifacts.len(), 2);
        assert!(artifacts[0].title.ends_with("(Parte 1 de 2)"));
        assert!(artifacts[1].title.ends_with("(Parte 2 de 2)"));
    }

    #[tokio::test]
    async fn test_byte_window_fallback_reconstructs_body() {
        // No components at all, length over the ceiling: content windows
        let template = "abcdefghij".repeat(250);
        let options = RenderOptions {
            artifact_max_size: 1000,
            ..RenderOptions::default()
        };

        let artifacts = pipeline()
            .render_to_artifacts(&template, &json!({}), &options)
            .await
            .unwrap();

        // ceil(2500 / 800) = 4 windows
        assert_eq!(artifacts.len(), 4);

        let mut reconstructed = String::new();
        for artifact in &artifacts {
            let start_marker = "<div class=\"artifact-content\">\n";
            let start = artifact.content.find(start_marker).unwrap() + start_marker.len();
            let end = artifact.content.rfind("\n</div>\n</body>").unwrap();
            reconstructed.push_str(&artifact.content[start..end]);
        }

        assert_eq!(reconstructed, template);
    }

    #[test]
    fn test_navigation_empty_for_single_artifact() {
        assert_eq!(NavigationInjector::build_navigation(1, 1), "");
        assert_eq!(NavigationInjector::build_navigation(1, 0), "");
    }

    #[test]
    fn test_navigation_marks_exactly_one_active_control() {
        let markup = NavigationInjector::build_navigation(2, 4);

        assert_eq!(markup.matches("<a href").count(), 4);
        assert_eq!(markup.matches("active").count(), 1);
        assert!(markup.contains("class=\"nav-control active\">Parte 2<"));
    }

    #[test]
    fn test_extract_styles_concatenates_in_document_order() {
        let injector = NavigationInjector::new();
        let template =
            "<style>h1 { color: red; }</style><div>x</div><style>p { margin: 0; }</style>";

        let css = injector.extract_styles(template);
        let first = css.find("h1 { color: red; }").unwrap();
        let second = css.find("p { margin: 0; }").unwrap();

        assert!(first < second);
        assert!(css.contains(".artifact-nav"));
    }

    #[tokio::test]
    async fn test_renderer_substitutes_paths_and_helpers() {
        let renderer = ProgressiveRenderer::new(HelperRegistry::with_builtins());
        let data = json!({ "name": "Loja Virtual", "user": { "name": "Ana" } });
        let options = RenderOptions::default();

        let output = renderer
            .render(
                "<h1>{{name}}</h1><p>{{user.name}}</p><b>{{uppercase name}}</b><i>{{missing.path}}</i>",
                &data,
                &options,
            )
            .await
            .unwrap();

        assert!(output.contains("<h1>Loja Virtual</h1>"));
        assert!(output.contains("<p>Ana</p>"));
        assert!(output.contains("<b>LOJA VIRTUAL</b>"));
        assert!(output.contains("<i></i>"));
    }

    #[tokio::test]
    async fn test_renderer_schedules_priority_tiers() {
        let renderer = ProgressiveRenderer::new(HelperRegistry::with_builtins());
        let template = "<div class=\"card\">Item</div>".repeat(10);
        let options = RenderOptions {
            feedback_enabled: true,
            ..RenderOptions::default()
        };

        let output = renderer.render(&template, &json!({}), &options).await.unwrap();

        // 10 components over 5 tiers: 2 per tier
        assert_eq!(output.matches("data-priority=\"0\"").count(), 2);
        assert_eq!(output.matches("data-priority=\"4\"").count(), 2);
        // Skeleton placeholders only past the first tier
        assert_eq!(output.matches("data-skeleton=\"pending\"").count(), 8);
        assert!(output.contains("progresso: componente 1 de 10"));
    }

    #[tokio::test]
    async fn test_renderer_rejects_zero_priority_levels() {
        let renderer = ProgressiveRenderer::new(HelperRegistry::with_builtins());
        let options = RenderOptions {
            priority_levels: 0,
            ..RenderOptions::default()
        };

        let result = renderer.render("<p>x</p>", &json!({}), &options).await;
        assert!(matches!(result, Err(SplitterError::Render { .. })));
    }

    #[tokio::test]
    async fn test_pipeline_falls_back_to_simple_artifact() {
        let options = RenderOptions {
            priority_levels: 0,
            ..RenderOptions::default()
        };
        let data = json!({ "title": "Painel" });

        let artifacts = pipeline()
            .render_to_artifacts("<h1>{{title}}</h1>", &data, &options)
            .await
            .unwrap();

        assert_eq!(artifacts.len(), 1);
        assert_eq!(artifacts[0].title, "Visualização HTML");
        assert!(artifacts[0].content.contains("<h1>Painel</h1>"));
    }

    #[test]
    fn test_render_options_defaults() {
        let options = RenderOptions::default();

        assert_eq!(options.priority_levels, 5);
        assert_eq!(options.artifact_max_size, 500_000);
        assert_eq!(options.split_threshold, 100);
        assert!(options.skeleton_loading);
        assert!(options.use_logical_division);
        assert!(!options.feedback_enabled);
    }
}
