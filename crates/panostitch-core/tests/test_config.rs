use panostitch_core::camera::EdgePolicy;
use panostitch_core::composite::CompositeConfig;
use panostitch_core::consts::{DEFAULT_OUTPUT_HEIGHT, DEFAULT_OUTPUT_WIDTH};
use panostitch_core::equirect::AzimuthOrigin;
use panostitch_core::error::StitchError;
use panostitch_core::fill::{GapFillConfig, GapFillMethod};
use panostitch_core::frame::FieldOfView;
use panostitch_core::io::manifest::StitchJob;
use panostitch_core::pipeline::config::StitchConfig;
use panostitch_core::pipeline::StitchStage;

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

#[test]
fn test_gap_fill_method_display() {
    assert_eq!(format!("{}", GapFillMethod::Propagate), "Propagate");
    assert_eq!(format!("{}", GapFillMethod::SkyGradient), "Sky Gradient");
    assert_eq!(format!("{}", GapFillMethod::None), "None");
}

#[test]
fn test_azimuth_origin_display() {
    assert_eq!(format!("{}", AzimuthOrigin::Center), "Center");
    assert_eq!(format!("{}", AzimuthOrigin::LeftEdge), "Left Edge");
}

#[test]
fn test_edge_policy_display() {
    assert_eq!(format!("{}", EdgePolicy::Reject), "Reject");
    assert_eq!(
        format!("{}", EdgePolicy::Clamp { margin: 0.02 }),
        "Clamp (margin 0.02)"
    );
}

#[test]
fn test_fov_display() {
    assert_eq!(format!("{}", FieldOfView::default()), "55°x75°");
}

#[test]
fn test_stitch_stage_display() {
    assert_eq!(format!("{}", StitchStage::GapFilling), "Filling gaps");
    assert_eq!(format!("{}", StitchStage::Encoding), "Writing panorama");
}

// ---------------------------------------------------------------------------
// Defaults and TOML
// ---------------------------------------------------------------------------

#[test]
fn test_defaults() {
    let config = StitchConfig::default();
    assert_eq!(config.output_width, DEFAULT_OUTPUT_WIDTH);
    assert_eq!(config.output_height, DEFAULT_OUTPUT_HEIGHT);
    assert_eq!(config.composite.azimuth_origin, AzimuthOrigin::Center);
    assert_eq!(config.composite.edge_policy, EdgePolicy::Reject);
    assert_eq!(config.gap_fill.method, GapFillMethod::Propagate);
    assert!(!config.gap_fill.inpaint);
    assert!(config.prepare.is_identity());
    assert!(config.validate().is_ok());
}

#[test]
fn test_toml_roundtrip() {
    let mut config = StitchConfig::default();
    config.composite.edge_policy = EdgePolicy::Clamp { margin: 0.05 };
    config.composite.azimuth_origin = AzimuthOrigin::LeftEdge;
    config.gap_fill.method = GapFillMethod::SkyGradient;
    config.prepare.max_input_dimension = Some(1600);

    let text = toml::to_string_pretty(&config).unwrap();
    let parsed: StitchConfig = toml::from_str(&text).unwrap();
    assert_eq!(parsed, config);
}

#[test]
fn test_partial_toml_fills_defaults() {
    let parsed: StitchConfig = toml::from_str(
        r#"
        output_width = 1024
        output_height = 512

        [composite]
        feather_fraction = 0.1

        [composite.fov]
        horizontal_deg = 65.0
        vertical_deg = 50.0

        [gap_fill]
        inpaint = true
        "#,
    )
    .unwrap();

    assert_eq!(parsed.output_width, 1024);
    assert_eq!(parsed.composite.feather_fraction, 0.1);
    assert_eq!(parsed.composite.fov, FieldOfView::new(65.0, 50.0));
    assert_eq!(
        parsed.composite.weight_threshold,
        CompositeConfig::default().weight_threshold
    );
    assert!(parsed.gap_fill.inpaint);
    assert_eq!(
        parsed.gap_fill.inpaint_radius,
        GapFillConfig::default().inpaint_radius
    );
}

#[test]
fn test_manifest_parses_images() {
    let job = StitchJob::from_toml_str(
        r#"
        output = "pano.jpg"

        [config]
        output_width = 2048
        output_height = 1024

        [[images]]
        path = "north.jpg"
        azimuth = 0.0

        [[images]]
        path = "east.jpg"
        azimuth = 90.0
        elevation = 15.0
        "#,
    )
    .unwrap();
    assert_eq!(job.images.len(), 2);
    assert_eq!(job.images[1].orientation().elevation_deg, 15.0);
    assert_eq!(job.config.output_height, 1024);
}

#[test]
fn test_manifest_syntax_error_is_reported() {
    let err = StitchJob::from_toml_str("output = ").unwrap_err();
    assert!(matches!(err, StitchError::Manifest(_)));
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn assert_invalid(config: &StitchConfig) {
    assert!(matches!(
        config.validate(),
        Err(StitchError::InvalidConfig(_))
    ));
}

#[test]
fn test_validate_rejects_bad_values() {
    let mut c = StitchConfig::default();
    c.output_height = 0;
    assert_invalid(&c);

    let mut c = StitchConfig::default();
    c.composite.fov = FieldOfView::new(180.0, 60.0);
    assert_invalid(&c);

    let mut c = StitchConfig::default();
    c.composite.feather_fraction = 0.5;
    assert_invalid(&c);

    let mut c = StitchConfig::default();
    c.composite.edge_policy = EdgePolicy::Clamp { margin: -0.1 };
    assert_invalid(&c);

    let mut c = StitchConfig::default();
    c.gap_fill.smoothing_sigma = -1.0;
    assert_invalid(&c);

    let mut c = StitchConfig::default();
    c.gap_fill.inpaint = true;
    c.gap_fill.inpaint_radius = 0;
    assert_invalid(&c);
}

#[test]
fn test_non_2_to_1_canvas_is_allowed() {
    let config = StitchConfig {
        output_width: 1000,
        output_height: 700,
        ..StitchConfig::default()
    };
    assert!(config.validate().is_ok());
}
