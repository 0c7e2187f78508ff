use std::path::Path;

use console::Style;
use panostitch_core::camera::EdgePolicy;
use panostitch_core::fill::GapFillMethod;
use panostitch_core::frame::{FieldOfView, SourceImage};
use panostitch_core::io::manifest::StitchJob;
use panostitch_core::pipeline::JobReport;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    disabled: Style,
    path: Style,
    warn: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
            warn: Style::new().yellow().bold(),
        }
    }
}

pub fn print_stitch_summary(job: &StitchJob) {
    let s = Styles::new();
    let config = &job.config;

    println!();
    println!("  {}", s.title.apply_to("Panostitch"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(10)));
    println!();

    println!(
        "  {:<14}{}",
        s.label.apply_to("Output"),
        s.path.apply_to(job.output.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Canvas"),
        s.value
            .apply_to(format!("{}x{}", config.output_width, config.output_height))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Images"),
        s.value.apply_to(job.images.len())
    );
    println!();

    println!("  {}", s.header.apply_to("Projection"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("FOV"),
        s.value.apply_to(config.composite.fov)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Feather"),
        s.value
            .apply_to(format!("{:.0}%", config.composite.feather_fraction * 100.0))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Azimuth 0"),
        s.method.apply_to(config.composite.azimuth_origin)
    );
    match config.composite.edge_policy {
        EdgePolicy::Reject => println!(
            "    {:<12}{}",
            s.label.apply_to("Edges"),
            s.disabled.apply_to("hard reject")
        ),
        policy => println!(
            "    {:<12}{}",
            s.label.apply_to("Edges"),
            s.method.apply_to(policy)
        ),
    }
    if let Some(max_dim) = config.prepare.max_input_dimension {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Downscale"),
            s.value.apply_to(format!("≤ {} px", max_dim))
        );
    }
    if config.prepare.mirror_horizontal {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Mirror"),
            s.method.apply_to("on")
        );
    }
    println!();

    println!("  {}", s.header.apply_to("Gap Fill"));
    match config.gap_fill.method {
        GapFillMethod::None => println!(
            "    {:<12}{}",
            s.label.apply_to("Method"),
            s.disabled.apply_to("disabled")
        ),
        method => println!(
            "    {:<12}{}",
            s.label.apply_to("Method"),
            s.method.apply_to(method)
        ),
    }
    if config.gap_fill.method == GapFillMethod::Propagate {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Smoothing"),
            s.value
                .apply_to(format!("σ = {}", config.gap_fill.smoothing_sigma))
        );
        let inpaint = if config.gap_fill.inpaint {
            s.method
                .apply_to(format!("radius {}", config.gap_fill.inpaint_radius))
        } else {
            s.disabled.apply_to("off".to_string())
        };
        println!("    {:<12}{}", s.label.apply_to("Inpaint"), inpaint);
    }
    println!();
}

pub fn print_job_report(report: &JobReport, output: &Path) {
    let s = Styles::new();
    let out = &report.output;

    println!(
        "  {:<14}{}",
        s.label.apply_to("Strategy"),
        s.method.apply_to(&report.strategy)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Images"),
        s.value
            .apply_to(format!("{} of {}", report.loaded, report.requested))
    );
    let coverage = format!("{:.1}%", out.coverage * 100.0);
    if out.coverage < 1.0 {
        println!(
            "  {:<14}{} ({} gap pixels filled)",
            s.label.apply_to("Coverage"),
            s.warn.apply_to(coverage),
            out.fill.filled_pixels
        );
    } else {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Coverage"),
            s.value.apply_to(coverage)
        );
    }
    println!();
    println!("Panorama saved to {}", s.path.apply_to(output.display()));
}

pub fn print_coverage_table(sources: &[SourceImage], coverage: &[f64], fov: &FieldOfView) {
    let s = Styles::new();

    println!(
        "  {} {}",
        s.header.apply_to("Sources"),
        s.label.apply_to(format!("(FOV {})", fov))
    );
    println!(
        "    {:<32}{:>11}{:>9}{:>9}{:>10}",
        s.label.apply_to("Image"),
        s.label.apply_to("Size"),
        s.label.apply_to("Az"),
        s.label.apply_to("El"),
        s.label.apply_to("Sphere")
    );
    for (i, (source, cov)) in sources.iter().zip(coverage).enumerate() {
        println!(
            "    {:<32}{:>11}{:>9.1}{:>9.1}{:>9.1}%",
            source.display_name(i),
            format!("{}x{}", source.width(), source.height()),
            source.orientation.normalized_azimuth(),
            source.orientation.clamped_elevation(),
            cov * 100.0
        );
    }
}
