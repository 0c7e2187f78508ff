use tracing::{info, warn};

use crate::composite::{composite_with_progress, usable_source_count};
use crate::consts::MIN_SOURCE_IMAGES;
use crate::error::{Result, StitchError};
use crate::fill::fill_gaps;
use crate::frame::{ColorGrid, FieldOfView, SourceImage};
use crate::io::prepare::prepare_sources;

use super::config::StitchConfig;
use super::types::{NoOpReporter, ProgressReporter, StitchOutput, StitchStage};

/// Stitch posed photographs into an equirectangular panorama.
pub fn stitch(sources: &[SourceImage], config: &StitchConfig) -> Result<StitchOutput> {
    stitch_reported(sources, config, &NoOpReporter)
}

/// [`stitch`] with stage-by-stage progress reporting.
pub fn stitch_reported(
    sources: &[SourceImage],
    config: &StitchConfig,
    reporter: &dyn ProgressReporter,
) -> Result<StitchOutput> {
    config.validate()?;

    let usable = check_usable(sources, config)?;

    let prepared;
    let sources = if config.prepare.is_identity() {
        sources
    } else {
        reporter.begin_stage(StitchStage::Preparing, Some(sources.len()));
        prepared = prepare_sources(sources.to_vec(), &config.prepare);
        reporter.finish_stage();
        check_usable(&prepared, config)?;
        &prepared[..]
    };

    let (width, height) = (config.output_width, config.output_height);
    reporter.begin_stage(StitchStage::Compositing, Some(height));
    let mut canvas = composite_with_progress(sources, width, height, &config.composite, |done| {
        reporter.advance((done * height as f32).round() as usize);
    })?;
    reporter.finish_stage();

    reporter.begin_stage(StitchStage::Normalizing, None);
    let threshold = config.composite.weight_threshold;
    let gaps = canvas.normalize(threshold);
    let coverage = canvas.coverage(threshold);
    reporter.finish_stage();

    if gaps > 0 {
        warn!(
            gap_pixels = gaps,
            coverage = %format_args!("{:.1}%", coverage * 100.0),
            "Sources do not cover the whole sphere"
        );
    }

    reporter.begin_stage(StitchStage::GapFilling, None);
    let fill = fill_gaps(&mut canvas, threshold, &config.gap_fill);
    reporter.finish_stage();

    canvas.color.clamp_to_display();
    info!(
        width,
        height,
        sources = usable,
        coverage = %format_args!("{:.1}%", coverage * 100.0),
        "Panorama stitched"
    );

    Ok(StitchOutput {
        panorama: canvas.color,
        weight: canvas.weight,
        coverage,
        fill,
    })
}

/// Count the sources that can contribute weight, failing below the minimum.
pub(super) fn check_usable(sources: &[SourceImage], config: &StitchConfig) -> Result<usize> {
    let usable = usable_source_count(sources, &config.composite);
    if usable < MIN_SOURCE_IMAGES {
        return Err(StitchError::InsufficientInput {
            usable,
            required: MIN_SOURCE_IMAGES,
        });
    }
    Ok(usable)
}

/// Stitch `(pixels, azimuth, elevation)` triples with default blending and
/// gap filling, returning only the finished panorama.
pub fn stitch_images(
    images: &[(ColorGrid, f64, f64)],
    output_width: usize,
    output_height: usize,
    horizontal_fov_deg: f64,
    vertical_fov_deg: f64,
) -> Result<ColorGrid> {
    let sources: Vec<SourceImage> = images
        .iter()
        .map(|(pixels, az, el)| SourceImage::new(pixels.clone(), *az, *el))
        .collect();

    let mut config = StitchConfig {
        output_width,
        output_height,
        ..StitchConfig::default()
    };
    config.composite.fov = FieldOfView::new(horizontal_fov_deg, vertical_fov_deg);

    Ok(stitch(&sources, &config)?.panorama)
}
