use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::composite::CompositeConfig;
use crate::consts::{DEFAULT_OUTPUT_HEIGHT, DEFAULT_OUTPUT_WIDTH};
use crate::error::{Result, StitchError};
use crate::fill::GapFillConfig;
use crate::io::prepare::PrepareConfig;

/// Everything that controls one stitch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StitchConfig {
    #[serde(default = "default_output_width")]
    pub output_width: usize,
    #[serde(default = "default_output_height")]
    pub output_height: usize,
    #[serde(default)]
    pub composite: CompositeConfig,
    #[serde(default)]
    pub gap_fill: GapFillConfig,
    #[serde(default)]
    pub prepare: PrepareConfig,
}

fn default_output_width() -> usize {
    DEFAULT_OUTPUT_WIDTH
}
fn default_output_height() -> usize {
    DEFAULT_OUTPUT_HEIGHT
}

impl Default for StitchConfig {
    fn default() -> Self {
        Self {
            output_width: DEFAULT_OUTPUT_WIDTH,
            output_height: DEFAULT_OUTPUT_HEIGHT,
            composite: CompositeConfig::default(),
            gap_fill: GapFillConfig::default(),
            prepare: PrepareConfig::default(),
        }
    }
}

impl StitchConfig {
    /// Check ranges before any pixel work. A canvas that is not 2:1 is
    /// accepted with a warning.
    pub fn validate(&self) -> Result<()> {
        if self.output_width == 0 || self.output_height == 0 {
            return Err(StitchError::InvalidConfig(format!(
                "Output size must be non-zero, got {}x{}",
                self.output_width, self.output_height
            )));
        }
        if self.output_width != 2 * self.output_height {
            warn!(
                width = self.output_width,
                height = self.output_height,
                "Output is not 2:1; pixels will not be square on the sphere"
            );
        }
        self.composite.validate()?;
        if self.gap_fill.smoothing_sigma < 0.0 {
            return Err(StitchError::InvalidConfig(format!(
                "Smoothing sigma must be >= 0, got {}",
                self.gap_fill.smoothing_sigma
            )));
        }
        if self.gap_fill.inpaint && self.gap_fill.inpaint_radius == 0 {
            return Err(StitchError::InvalidConfig(
                "Inpaint radius must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
