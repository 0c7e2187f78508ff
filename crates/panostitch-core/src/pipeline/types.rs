use ndarray::Array2;

use crate::fill::FillReport;
use crate::frame::ColorGrid;

/// Stitch stage, used for progress reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StitchStage {
    Preparing,
    Compositing,
    Normalizing,
    GapFilling,
    Encoding,
}

impl std::fmt::Display for StitchStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Preparing => write!(f, "Preparing images"),
            Self::Compositing => write!(f, "Compositing"),
            Self::Normalizing => write!(f, "Normalizing"),
            Self::GapFilling => write!(f, "Filling gaps"),
            Self::Encoding => write!(f, "Writing panorama"),
        }
    }
}

/// Result of a stitch.
#[derive(Clone, Debug)]
pub struct StitchOutput {
    /// Finished panorama, clamped to the display range.
    pub panorama: ColorGrid,
    /// Accumulated feather weight per canvas pixel, before gap filling.
    pub weight: Array2<f32>,
    /// Fraction of canvas pixels covered by at least one source.
    pub coverage: f64,
    pub fill: FillReport,
}

/// Thread-safe progress reporting for a stitch.
///
/// All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    /// A new stage has started. `total_items` is the number of work items
    /// in this stage (canvas rows while compositing), if known.
    fn begin_stage(&self, _stage: StitchStage, _total_items: Option<usize>) {}

    /// `items_done` work items of the current stage have completed.
    fn advance(&self, _items_done: usize) {}

    /// The current stage is finished.
    fn finish_stage(&self) {}
}

/// No-op progress reporter, used when `stitch` delegates.
pub struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}
