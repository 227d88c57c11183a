pub mod analyzer;
pub mod assembler;
pub mod fetcher;
pub mod navigation;
pub mod pipeline;
pub mod planner;
pub mod renderer;
pub mod visualizer;

pub use analyzer::ComplexityAnalyzer;
pub use assembler::ArtifactAssembler;
pub use fetcher::ContentFetcher;
pub use navigation::NavigationInjector;
pub use pipeline::ArtifactPipeline;
pub use planner::SplitPlanner;
pub use renderer::{HelperRegistry, ProgressiveRenderer};
pub use visualizer::ArtifactVisualizer;
