use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use panostitch_core::camera::EdgePolicy;
use panostitch_core::consts::{
    DEFAULT_FEATHER_FRACTION, DEFAULT_H_FOV_DEG, DEFAULT_INPAINT_RADIUS, DEFAULT_OUTPUT_HEIGHT,
    DEFAULT_OUTPUT_WIDTH, DEFAULT_V_FOV_DEG,
};
use panostitch_core::equirect::AzimuthOrigin;
use panostitch_core::fill::GapFillMethod;
use panostitch_core::frame::FieldOfView;
use panostitch_core::io::manifest::{ImageEntry, StitchJob};
use panostitch_core::pipeline::config::StitchConfig;
use panostitch_core::pipeline::{run_job, ProgressReporter, StitchStage};

use crate::summary::{print_job_report, print_stitch_summary};

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum FillArg {
    Propagate,
    SkyGradient,
    None,
}

impl From<FillArg> for GapFillMethod {
    fn from(arg: FillArg) -> Self {
        match arg {
            FillArg::Propagate => GapFillMethod::Propagate,
            FillArg::SkyGradient => GapFillMethod::SkyGradient,
            FillArg::None => GapFillMethod::None,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OriginArg {
    Center,
    LeftEdge,
}

impl From<OriginArg> for AzimuthOrigin {
    fn from(arg: OriginArg) -> Self {
        match arg {
            OriginArg::Center => AzimuthOrigin::Center,
            OriginArg::LeftEdge => AzimuthOrigin::LeftEdge,
        }
    }
}

#[derive(Args)]
pub struct StitchArgs {
    /// Images as PATH@AZIMUTH[,ELEVATION], e.g. front.jpg@0,10
    pub images: Vec<String>,

    /// Job manifest (TOML); replaces the image list and all options below
    #[arg(long, short = 'm')]
    pub manifest: Option<PathBuf>,

    /// Output file path (overrides the manifest's output)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output width in pixels
    #[arg(long, default_value_t = DEFAULT_OUTPUT_WIDTH)]
    pub width: usize,

    /// Output height in pixels
    #[arg(long, default_value_t = DEFAULT_OUTPUT_HEIGHT)]
    pub height: usize,

    /// Horizontal field of view of every camera, in degrees
    #[arg(long, default_value_t = DEFAULT_H_FOV_DEG)]
    pub hfov: f64,

    /// Vertical field of view of every camera, in degrees
    #[arg(long, default_value_t = DEFAULT_V_FOV_DEG)]
    pub vfov: f64,

    /// Feather width as a fraction of image size (0.0-0.5)
    #[arg(long, default_value_t = DEFAULT_FEATHER_FRACTION)]
    pub feather: f32,

    /// Accept projections up to this far outside the frame, clamped onto it
    #[arg(long)]
    pub edge_clamp: Option<f64>,

    /// Canvas column that azimuth 0 maps to
    #[arg(long, value_enum, default_value = "center")]
    pub azimuth_origin: OriginArg,

    /// How uncovered regions are filled
    #[arg(long, value_enum, default_value = "propagate")]
    pub fill: FillArg,

    /// Blend the seam between covered and filled regions by inpainting
    #[arg(long)]
    pub inpaint: bool,

    /// Inpainting neighbourhood radius in pixels
    #[arg(long, default_value_t = DEFAULT_INPAINT_RADIUS)]
    pub inpaint_radius: usize,

    /// Downscale sources whose longest side exceeds this many pixels
    #[arg(long)]
    pub max_input_dim: Option<u32>,

    /// Mirror every source left-to-right before stitching
    #[arg(long)]
    pub mirror: bool,
}

/// Parse `PATH@AZIMUTH[,ELEVATION]`.
pub fn parse_image_arg(arg: &str) -> Result<ImageEntry> {
    let (path, angles) = arg
        .rsplit_once('@')
        .with_context(|| format!("Expected PATH@AZIMUTH[,ELEVATION], got '{}'", arg))?;
    if path.is_empty() {
        bail!("Missing image path in '{}'", arg);
    }

    let mut parts = angles.split(',').map(str::trim);
    let azimuth: f64 = parts
        .next()
        .unwrap_or_default()
        .parse()
        .with_context(|| format!("Invalid azimuth in '{}'", arg))?;
    let elevation: f64 = match parts.next() {
        Some(el) => el
            .parse()
            .with_context(|| format!("Invalid elevation in '{}'", arg))?,
        None => 0.0,
    };
    if parts.next().is_some() {
        bail!("Too many angles in '{}'", arg);
    }

    Ok(ImageEntry {
        path: PathBuf::from(path),
        azimuth,
        elevation,
    })
}

fn build_job_from_args(args: &StitchArgs) -> Result<StitchJob> {
    let images = args
        .images
        .iter()
        .map(|arg| parse_image_arg(arg))
        .collect::<Result<Vec<_>>>()?;

    let mut config = StitchConfig {
        output_width: args.width,
        output_height: args.height,
        ..StitchConfig::default()
    };
    config.composite.fov = FieldOfView::new(args.hfov, args.vfov);
    config.composite.feather_fraction = args.feather;
    config.composite.azimuth_origin = args.azimuth_origin.into();
    if let Some(margin) = args.edge_clamp {
        config.composite.edge_policy = EdgePolicy::Clamp { margin };
    }
    config.gap_fill.method = args.fill.into();
    config.gap_fill.inpaint = args.inpaint;
    config.gap_fill.inpaint_radius = args.inpaint_radius;
    config.prepare.max_input_dimension = args.max_input_dim;
    config.prepare.mirror_horizontal = args.mirror;

    Ok(StitchJob {
        output: args
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from("panorama.jpg")),
        config,
        images,
    })
}

pub fn run(args: &StitchArgs) -> Result<()> {
    let mut job = if let Some(ref manifest) = args.manifest {
        if !args.images.is_empty() {
            bail!("Pass images either on the command line or in a manifest, not both");
        }
        StitchJob::load(manifest)
            .with_context(|| format!("Failed to read manifest {}", manifest.display()))?
    } else {
        build_job_from_args(args)?
    };
    if let (Some(_), Some(output)) = (&args.manifest, &args.output) {
        job.output = output.clone();
    }

    print_stitch_summary(&job);

    let reporter = BarReporter::new()?;
    let report = run_job(&job, None, &reporter).context("Stitch failed")?;
    reporter.bar.finish_and_clear();

    print_job_report(&report, &job.output);
    Ok(())
}

/// Drives a terminal progress bar from stitch stages.
struct BarReporter {
    bar: ProgressBar,
}

impl BarReporter {
    fn new() -> Result<Self> {
        let bar = ProgressBar::new(1);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{msg:20} [{bar:40}] {pos}/{len}")?
                .progress_chars("=> "),
        );
        Ok(Self { bar })
    }
}

impl ProgressReporter for BarReporter {
    fn begin_stage(&self, stage: StitchStage, total_items: Option<usize>) {
        self.bar.set_length(total_items.unwrap_or(1) as u64);
        self.bar.set_position(0);
        self.bar.set_message(stage.to_string());
    }

    fn advance(&self, items_done: usize) {
        self.bar.set_position(items_done as u64);
    }

    fn finish_stage(&self) {
        if let Some(len) = self.bar.length() {
            self.bar.set_position(len);
        }
    }
}
