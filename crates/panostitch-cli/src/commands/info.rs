use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use panostitch_core::composite::source_coverage;
use panostitch_core::frame::FieldOfView;
use panostitch_core::io::manifest::StitchJob;
use panostitch_core::pipeline::config::StitchConfig;

use super::stitch::parse_image_arg;
use crate::summary::print_coverage_table;

#[derive(Args)]
pub struct InfoArgs {
    /// Images as PATH@AZIMUTH[,ELEVATION]
    pub images: Vec<String>,

    /// Job manifest (TOML) to inspect instead of an image list
    #[arg(long, short = 'm')]
    pub manifest: Option<PathBuf>,

    /// Field of view as HFOV,VFOV in degrees (ignored with --manifest)
    #[arg(long)]
    pub fov: Option<String>,

    /// Width of the canvas used to estimate coverage
    #[arg(long, default_value = "720")]
    pub sample_width: usize,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let job = if let Some(ref manifest) = args.manifest {
        StitchJob::load(manifest)
            .with_context(|| format!("Failed to read manifest {}", manifest.display()))?
    } else {
        let images = args
            .images
            .iter()
            .map(|arg| parse_image_arg(arg))
            .collect::<Result<Vec<_>>>()?;
        let mut config = StitchConfig::default();
        if let Some(ref fov) = args.fov {
            config.composite.fov = parse_fov(fov)?;
        }
        StitchJob {
            output: PathBuf::new(),
            config,
            images,
        }
    };

    if job.images.is_empty() {
        bail!("No images given");
    }

    let sources = job.load_sources();
    let width = args.sample_width.max(2);
    let coverage = source_coverage(&sources, width, width / 2, &job.config.composite)?;

    print_coverage_table(&sources, &coverage, &job.config.composite.fov);
    if sources.len() < job.images.len() {
        println!(
            "{} of {} images could not be read",
            job.images.len() - sources.len(),
            job.images.len()
        );
    }
    Ok(())
}

fn parse_fov(text: &str) -> Result<FieldOfView> {
    let (h, v) = text
        .split_once(',')
        .with_context(|| format!("Expected HFOV,VFOV, got '{}'", text))?;
    Ok(FieldOfView::new(
        h.trim().parse().context("Invalid horizontal FOV")?,
        v.trim().parse().context("Invalid vertical FOV")?,
    ))
}
