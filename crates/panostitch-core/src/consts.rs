/// Minimum pixel count (h*w) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Minimum number of usable source images for a stitch.
pub const MIN_SOURCE_IMAGES: usize = 2;

/// Upper bound of the display range for color samples.
pub const MAX_CHANNEL_VALUE: f32 = 255.0;

/// Default equirectangular output width (2:1 aspect with the default height).
pub const DEFAULT_OUTPUT_WIDTH: usize = 4096;

/// Default equirectangular output height.
pub const DEFAULT_OUTPUT_HEIGHT: usize = 2048;

/// Default horizontal field of view in degrees (phone camera held in portrait).
pub const DEFAULT_H_FOV_DEG: f64 = 55.0;

/// Default vertical field of view in degrees (phone camera held in portrait).
pub const DEFAULT_V_FOV_DEG: f64 = 75.0;

/// Default feather width as a fraction of each image dimension.
pub const DEFAULT_FEATHER_FRACTION: f32 = 0.2;

/// Accumulated weight at or below which a canvas pixel counts as a gap.
pub const DEFAULT_WEIGHT_THRESHOLD: f32 = 0.001;

/// Minimum cosine between a direction and the camera axis for the direction
/// to be considered in front of the camera.
pub const DEFAULT_GRAZING_EPSILON: f64 = 0.01;

/// Default Gaussian sigma (canvas pixels) for smoothing propagated gap fill.
pub const DEFAULT_FILL_SMOOTHING_SIGMA: f32 = 4.0;

/// Default neighbourhood radius (canvas pixels) for fast-marching inpainting.
pub const DEFAULT_INPAINT_RADIUS: usize = 5;

/// JPEG quality used when encoding the finished panorama.
pub const JPEG_QUALITY: u8 = 92;
