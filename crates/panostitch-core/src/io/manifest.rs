use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;
use crate::frame::{Orientation, SourceImage};
use crate::io::image_io::load_source;
use crate::pipeline::config::StitchConfig;

/// One photograph listed in a job manifest.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageEntry {
    pub path: PathBuf,
    /// Heading in degrees; wraps around 360.
    pub azimuth: f64,
    /// Tilt in degrees above the horizon.
    #[serde(default)]
    pub elevation: f64,
}

impl ImageEntry {
    pub fn orientation(&self) -> Orientation {
        Orientation::new(self.azimuth, self.elevation)
    }
}

/// A complete stitch request: where to write, how to stitch, what to read.
///
/// ```toml
/// output = "pano.jpg"
///
/// [config]
/// output_width = 4096
///
/// [[images]]
/// path = "front.jpg"
/// azimuth = 0.0
/// elevation = 0.0
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StitchJob {
    pub output: PathBuf,
    #[serde(default)]
    pub config: StitchConfig,
    #[serde(default)]
    pub images: Vec<ImageEntry>,
}

impl StitchJob {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read a manifest from disk. Relative image and output paths are
    /// resolved against the manifest's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let mut job = Self::from_toml_str(&text)?;
        if let Some(base) = path.parent() {
            job.resolve_paths(base);
        }
        Ok(job)
    }

    fn resolve_paths(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        resolve(&mut self.output);
        for entry in &mut self.images {
            resolve(&mut entry.path);
        }
    }

    /// Decode every listed image. Images that fail to decode or are empty
    /// are logged and skipped; the caller decides whether enough remain.
    pub fn load_sources(&self) -> Vec<SourceImage> {
        self.images
            .iter()
            .enumerate()
            .filter_map(
                |(i, entry)| match load_source(&entry.path, entry.orientation(), i) {
                    Ok(source) => Some(source),
                    Err(e) => {
                        warn!(path = %entry.path.display(), "Skipping image: {}", e);
                        None
                    }
                },
            )
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_paths_resolve_against_manifest_dir() {
        let mut job = StitchJob::from_toml_str(
            r#"
            output = "out/pano.jpg"

            [[images]]
            path = "a.jpg"
            azimuth = 90.0

            [[images]]
            path = "/abs/b.jpg"
            azimuth = 180.0
            elevation = -10.0
            "#,
        )
        .unwrap();
        job.resolve_paths(Path::new("/data/trip"));

        assert_eq!(job.output, PathBuf::from("/data/trip/out/pano.jpg"));
        assert_eq!(job.images[0].path, PathBuf::from("/data/trip/a.jpg"));
        assert_eq!(job.images[0].elevation, 0.0);
        assert_eq!(job.images[1].path, PathBuf::from("/abs/b.jpg"));
        assert_eq!(job.config, StitchConfig::default());
    }
}
