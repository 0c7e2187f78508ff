use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use panostitch_core::io::manifest::{ImageEntry, StitchJob};
use panostitch_core::pipeline::config::StitchConfig;

#[derive(Args)]
pub struct ConfigArgs {
    /// Write the manifest to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Print or save a default job manifest as TOML.
pub fn run(args: &ConfigArgs) -> Result<()> {
    let job = StitchJob {
        output: PathBuf::from("panorama.jpg"),
        config: StitchConfig::default(),
        images: [0.0, 90.0, 180.0, 270.0]
            .iter()
            .map(|&azimuth| ImageEntry {
                path: PathBuf::from(format!("az{:03}.jpg", azimuth as u32)),
                azimuth,
                elevation: 0.0,
            })
            .collect(),
    };
    let toml_str = toml::to_string_pretty(&job)?;

    if let Some(ref path) = args.output {
        std::fs::write(path, &toml_str)
            .with_context(|| format!("Failed to write manifest to {}", path.display()))?;
        println!("Default manifest saved to {}", path.display());
    } else {
        print!("{}", toml_str);
    }

    Ok(())
}
