use crate::types::{ComplexityProfile, RenderOptions, SplitPlan};
use tracing::{debug, info};

/// Fraction of `artifact_max_size` each artifact is actually allowed to
/// fill; the remainder is headroom for the shell, styles and navigation.
const SIZE_FILL_RATIO: f64 = 0.8;

pub struct SplitPlanner;

impl SplitPlanner {
    /// Decides how a template should be split, preferring logical section
    /// boundaries over arbitrary offsets when they cover the required
    /// number of parts.
    pub fn decide(profile: &ComplexityProfile, options: &RenderOptions) -> SplitPlan {
        let size_ceiling = options.artifact_max_size as f64 * SIZE_FILL_RATIO;

        let should_split = profile.component_count > options.split_threshold
            || profile.size as f64 > size_ceiling;

        if !should_split {
            debug!(
                "No split needed: {} components, {} chars",
                profile.component_count, profile.size
            );
            return SplitPlan::NoSplit;
        }

        let estimated = Self::estimated_artifact_count(profile.size, options.artifact_max_size);

        if options.use_logical_division
            && !profile.division_points.is_empty()
            && profile.division_points.len() <= estimated
        {
            info!(
                "Logical split across {} sections (estimated {} artifacts)",
                profile.division_points.len(),
                estimated
            );
            return SplitPlan::Logical(profile.division_points.clone());
        }

        let target_count = estimated.max(1);
        info!("Automatic split into {} artifacts", target_count);

        SplitPlan::Automatic { target_count }
    }

    /// Ceiling of `size / (artifact_max_size * 0.8)`, never below 1.
    pub fn estimated_artifact_count(size: usize, artifact_max_size: usize) -> usize {
        let window = (artifact_max_size as f64 * SIZE_FILL_RATIO).max(1.0);
        let estimated = (size as f64 / window).ceil() as usize;
        estimated.max(1)
    }
}
