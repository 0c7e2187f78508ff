pub mod config;
mod job;
mod stitch;
mod strategy;
mod types;

pub use job::{run_job, JobReport};
pub use stitch::{stitch, stitch_images, stitch_reported};
pub use strategy::{stitch_with_fallback, PanoramaStrategy, SphericalProjection};
pub use types::{NoOpReporter, ProgressReporter, StitchOutput, StitchStage};
