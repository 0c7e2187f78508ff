use tracing::info;

use crate::error::Result;
use crate::io::image_io::save_panorama;
use crate::io::manifest::StitchJob;

use super::strategy::{stitch_with_fallback, PanoramaStrategy, SphericalProjection};
use super::types::{ProgressReporter, StitchOutput, StitchStage};

/// Summary of a finished job.
#[derive(Clone, Debug)]
pub struct JobReport {
    pub output: StitchOutput,
    /// Name of the strategy that produced the panorama.
    pub strategy: String,
    /// Images listed in the manifest.
    pub requested: usize,
    /// Images that decoded and were handed to the stitcher.
    pub loaded: usize,
}

/// Load every image of `job`, stitch them and write the panorama to
/// `job.output`. `primary` is tried first when given; spherical projection
/// is always the fallback.
pub fn run_job(
    job: &StitchJob,
    primary: Option<&dyn PanoramaStrategy>,
    reporter: &dyn ProgressReporter,
) -> Result<JobReport> {
    job.config.validate()?;

    let sources = job.load_sources();
    info!(
        requested = job.images.len(),
        loaded = sources.len(),
        "Images loaded"
    );

    let fallback = SphericalProjection;
    let (output, strategy) =
        stitch_with_fallback(primary, &fallback, &sources, &job.config, reporter)?;

    reporter.begin_stage(StitchStage::Encoding, None);
    save_panorama(&output.panorama, &job.output)?;
    reporter.finish_stage();
    info!(path = %job.output.display(), "Panorama written");

    Ok(JobReport {
        output,
        strategy: strategy.to_string(),
        requested: job.images.len(),
        loaded: sources.len(),
    })
}
