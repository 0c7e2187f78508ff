use tracing::{info, warn};

use crate::error::Result;
use crate::frame::SourceImage;

use super::config::StitchConfig;
use super::stitch::{check_usable, stitch_reported};
use super::types::{ProgressReporter, StitchOutput};

/// A way of turning posed photographs into a panorama.
///
/// A primary strategy (e.g. a feature-matching stitcher) signals that it
/// cannot handle a batch by returning an error; the caller then falls back.
pub trait PanoramaStrategy: Send + Sync {
    fn name(&self) -> &str;

    fn stitch(
        &self,
        sources: &[SourceImage],
        config: &StitchConfig,
        reporter: &dyn ProgressReporter,
    ) -> Result<StitchOutput>;
}

/// Pose-driven spherical projection with feather blending and gap filling.
#[derive(Clone, Copy, Debug, Default)]
pub struct SphericalProjection;

impl PanoramaStrategy for SphericalProjection {
    fn name(&self) -> &str {
        "spherical projection"
    }

    fn stitch(
        &self,
        sources: &[SourceImage],
        config: &StitchConfig,
        reporter: &dyn ProgressReporter,
    ) -> Result<StitchOutput> {
        stitch_reported(sources, config, reporter)
    }
}

/// Try `primary` (if any), then `fallback` when the primary fails.
///
/// Returns the output and the name of the strategy that produced it.
/// Batches with fewer than two usable images fail before either strategy
/// runs; a failure of the fallback is returned as is.
pub fn stitch_with_fallback<'s>(
    primary: Option<&'s dyn PanoramaStrategy>,
    fallback: &'s dyn PanoramaStrategy,
    sources: &[SourceImage],
    config: &StitchConfig,
    reporter: &dyn ProgressReporter,
) -> Result<(StitchOutput, &'s str)> {
    check_usable(sources, config)?;

    if let Some(primary) = primary {
        match primary.stitch(sources, config, reporter) {
            Ok(output) => return Ok((output, primary.name())),
            Err(e) => warn!(
                strategy = primary.name(),
                fallback = fallback.name(),
                "Primary strategy failed, falling back: {}",
                e
            ),
        }
    }

    let output = fallback.stitch(sources, config, reporter)?;
    info!(strategy = fallback.name(), "Panorama produced");
    Ok((output, fallback.name()))
}
