mod common;

use panostitch_core::error::StitchError;
use panostitch_core::frame::{ColorGrid, Orientation};
use panostitch_core::io::image_io::{
    encode_jpeg, grid_from_rgb8, grid_to_rgb8, load_color_grid, load_source, save_panorama,
};
use panostitch_core::io::manifest::StitchJob;
use panostitch_core::pipeline::{run_job, NoOpReporter};

use common::write_solid_png;

#[test]
fn test_png_roundtrip_is_lossless() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("grid.png");
    let grid = ColorGrid::from_fn(7, 11, |row, col| {
        [(row * 30) as f32, (col * 20) as f32, 128.0]
    });

    save_panorama(&grid, &path).unwrap();
    let loaded = load_color_grid(&path).unwrap();
    assert_eq!(loaded, grid);
}

#[test]
fn test_save_clamps_out_of_range_samples() {
    let mut grid = ColorGrid::solid(2, 2, [300.0, -20.0, 127.6]);
    grid.set_pixel(1, 1, [0.4, 254.6, 255.0]);
    let img = grid_to_rgb8(&grid);
    assert_eq!(img.get_pixel(0, 0).0, [255, 0, 128]);
    assert_eq!(img.get_pixel(1, 1).0, [0, 255, 255]);
    assert_eq!(grid_from_rgb8(&img).pixel(0, 0), [255.0, 0.0, 128.0]);
}

#[test]
fn test_jpeg_output() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pano.JPG");
    let grid = ColorGrid::solid(16, 32, [200.0, 100.0, 50.0]);

    save_panorama(&grid, &path).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[..2], &[0xFF, 0xD8]);

    let loaded = load_color_grid(&path).unwrap();
    assert_eq!((loaded.width(), loaded.height()), (32, 16));
    let px = loaded.pixel(8, 16);
    assert!((px[0] - 200.0).abs() < 4.0, "{px:?}");

    let encoded = encode_jpeg(&grid).unwrap();
    assert_eq!(&encoded[..2], &[0xFF, 0xD8]);
}

#[test]
fn test_load_source_labels_with_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_solid_png(dir.path(), "east.png", 12, 8, [0, 0, 255]);
    let source = load_source(&path, Orientation::new(90.0, 5.0), 3).unwrap();
    assert_eq!(source.width(), 12);
    assert_eq!(source.height(), 8);
    assert_eq!(source.orientation, Orientation::new(90.0, 5.0));
    assert_eq!(source.pixels.pixel(0, 0), [0.0, 0.0, 255.0]);
    assert!(source.display_name(3).ends_with("east.png"));
}

#[test]
fn test_undecodable_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.png");
    std::fs::write(&path, b"definitely not a png").unwrap();
    assert!(matches!(
        load_source(&path, Orientation::default(), 0),
        Err(StitchError::ImageError(_))
    ));
}

#[test]
fn test_run_job_skips_unreadable_images() {
    let dir = tempfile::tempdir().unwrap();
    write_solid_png(dir.path(), "front.png", 40, 40, [255, 0, 0]);
    write_solid_png(dir.path(), "back.png", 40, 40, [0, 0, 255]);
    let manifest = dir.path().join("job.toml");
    std::fs::write(
        &manifest,
        r#"
        output = "out.jpg"

        [config]
        output_width = 64
        output_height = 32

        [config.composite.fov]
        horizontal_deg = 60.0
        vertical_deg = 60.0

        [[images]]
        path = "front.png"
        azimuth = 0.0

        [[images]]
        path = "missing.png"
        azimuth = 90.0

        [[images]]
        path = "back.png"
        azimuth = 180.0
        "#,
    )
    .unwrap();

    let job = StitchJob::load(&manifest).unwrap();
    let report = run_job(&job, None, &NoOpReporter).unwrap();
    assert_eq!(report.requested, 3);
    assert_eq!(report.loaded, 2);
    assert_eq!(report.strategy, "spherical projection");

    let written = load_color_grid(&dir.path().join("out.jpg")).unwrap();
    assert_eq!((written.width(), written.height()), (64, 32));
}

#[test]
fn test_run_job_fails_when_too_few_images_load() {
    let dir = tempfile::tempdir().unwrap();
    write_solid_png(dir.path(), "only.png", 20, 20, [10, 20, 30]);
    let mut job = StitchJob::from_toml_str(
        r#"
        output = "out.png"

        [[images]]
        path = "only.png"
        azimuth = 0.0

        [[images]]
        path = "gone.png"
        azimuth = 180.0
        "#,
    )
    .unwrap();
    job.output = dir.path().join("out.png");
    for image in &mut job.images {
        image.path = dir.path().join(&image.path);
    }

    let err = run_job(&job, None, &NoOpReporter).unwrap_err();
    assert!(matches!(
        err,
        StitchError::InsufficientInput {
            usable: 1,
            required: 2
        }
    ));
    assert!(!job.output.exists());
}
