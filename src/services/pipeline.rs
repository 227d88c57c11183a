use crate::error::Result;
use crate::services::analyzer::ComplexityAnalyzer;
use crate::services::assembler::ArtifactAssembler;
use crate::services::planner::SplitPlanner;
use crate::services::renderer::{HelperRegistry, ProgressiveRenderer};
use crate::services::visualizer::ArtifactVisualizer;
use crate::types::{Artifact, ComplexityProfile, RenderOptions, SplitPlan};
use serde_json::Value;
use tracing::{info, warn};

/// Full render path: analyze, decide, assemble, with a guaranteed
/// single-artifact fallback when the progressive path fails.
pub struct ArtifactPipeline {
    analyzer: ComplexityAnalyzer,
    assembler: ArtifactAssembler,
    renderer: ProgressiveRenderer,
    visualizer: ArtifactVisualizer,
}

impl ArtifactPipeline {
    pub fn new(helpers: HelperRegistry) -> Self {
        Self {
            analyzer: ComplexityAnalyzer::new(),
            assembler: ArtifactAssembler::new(),
            renderer: ProgressiveRenderer::new(helpers),
            visualizer: ArtifactVisualizer::new(),
        }
    }

    pub fn analyze(&self, template: &str) -> ComplexityProfile {
        self.analyzer.analyze(template)
    }

    pub fn plan(&self, template: &str, options: &RenderOptions) -> SplitPlan {
        let profile = self.analyzer.analyze(template);
        SplitPlanner::decide(&profile, options)
    }

    /// Renders a template and data context into one or more artifacts.
    /// Callers always receive at least one artifact: any failure in the
    /// progressive path degrades to the simple visualizer output.
    pub async fn render_to_artifacts(
        &self,
        template: &str,
        data: &Value,
        options: &RenderOptions,
    ) -> Result<Vec<Artifact>> {
        match self.try_progressive(template, data, options).await {
            Ok(artifacts) => Ok(artifacts),
            Err(error) => {
                warn!(
                    "Progressive rendering failed ({}), falling back to simple artifact",
                    error
                );
                let artifact = self.visualizer.create_html_artifact(template, data).await?;
                Ok(vec![artifact])
            }
        }
    }

    async fn try_progressive(
        &self,
        template: &str,
        data: &Value,
        options: &RenderOptions,
    ) -> Result<Vec<Artifact>> {
        let profile = self.analyzer.analyze(template);
        let plan = SplitPlanner::decide(&profile, options);

        info!(
            "Rendering template ({} chars, score {}) with plan '{}'",
            profile.size,
            profile.complexity_score,
            plan.kind()
        );

        self.assembler
            .assemble(&self.renderer, &plan, template, data, options)
            .await
    }
}

impl Default for ArtifactPipeline {
    fn default() -> Self {
        Self::new(HelperRegistry::with_builtins())
    }
}
