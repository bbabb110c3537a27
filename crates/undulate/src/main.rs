//! undulate: render an image as procedural line-art and export it as SVG.
//!
//! Loads an image file, renders it through the wave or dithering pattern
//! along the selected line family and writes the resulting SVG document.
//! A short render summary is printed afterwards, optionally as JSON.
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin undulate -- [OPTIONS] <IMAGE_PATH>
//! ```
//!
//! Set `RUST_LOG=debug` for per-pass timing from the library crates.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use undulate_export::{SvgBackend, SvgMetadata};
use undulate_pipeline::{LineStyle, PatternStyle, RenderConfig, RenderSummary, Renderer};

/// Render an image as wave or dithered line-art.
///
/// Walks a family of lines across the image and modulates each one by the
/// local darkness, then writes the drawing as an SVG document.
#[derive(Parser)]
#[command(name = "undulate", version)]
struct Cli {
    /// Path to the input image (PNG, JPEG, BMP, WebP).
    image_path: PathBuf,

    /// Where to write the SVG document. Defaults to the input path with an
    /// `.svg` extension.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Document title. Defaults to the input file stem.
    #[arg(long)]
    title: Option<String>,

    /// Line family.
    #[arg(long, value_enum, default_value_t = Lines::Straight)]
    lines: Lines,

    /// Darkness modulation.
    #[arg(long, value_enum, default_value_t = Pattern::Waves)]
    pattern: Pattern,

    /// Line density (spacings across the longer side of the image).
    #[arg(long, default_value_t = RenderConfig::DEFAULT_LINES_COUNT)]
    lines_count: f64,

    /// Orientation of the line family in degrees.
    #[arg(long, default_value_t = RenderConfig::DEFAULT_ORIENTATION, allow_negative_numbers = true)]
    orientation: f64,

    /// Number of polygon sides (polygon lines only).
    #[arg(long, default_value_t = RenderConfig::DEFAULT_POLYGON_SIDES, value_parser = clap::builder::RangedU64ValueParser::<u32>::new().range(3..))]
    polygon_sides: u32,

    /// Sine carrier amplitude (sines lines only).
    #[arg(long, default_value_t = RenderConfig::DEFAULT_SINES_AMPLITUDE)]
    sines_amplitude: f64,

    /// Sine carrier periods along each line (sines lines only).
    #[arg(long, default_value_t = RenderConfig::DEFAULT_SINES_FREQUENCY)]
    sines_frequency: f64,

    /// Maximum modulation amplitude (0.0-1.0).
    #[arg(long, default_value_t = RenderConfig::DEFAULT_MAX_AMPLITUDE)]
    max_amplitude: f64,

    /// Maximum modulation frequency (0.0-1.0).
    #[arg(long, default_value_t = RenderConfig::DEFAULT_MAX_FREQUENCY)]
    max_frequency: f64,

    /// Rotation of the wave displacement in degrees, strictly inside (-90, 90).
    #[arg(long, default_value_t = RenderConfig::DEFAULT_WAVE_ANGLE, allow_negative_numbers = true)]
    wave_angle: f64,

    /// Wave squareness (0.0 sine, 1.0 nearly square).
    #[arg(long, default_value_t = RenderConfig::DEFAULT_WAVE_SQUARENESS)]
    wave_squareness: f64,

    /// Stroke thickness in pixels of the 1000x1000 document.
    #[arg(long, default_value_t = RenderConfig::DEFAULT_LINE_THICKNESS)]
    line_thickness: f64,

    /// Light lines on a dark background.
    #[arg(long)]
    invert: bool,

    /// Use raw darkness instead of the square-root compressed intensity.
    #[arg(long)]
    no_true_intensity: bool,

    /// Blur radius applied through an SVG filter (0 disables).
    #[arg(long, default_value_t = RenderConfig::DEFAULT_BLUR)]
    blur: f64,

    /// Full render config as a JSON string.
    ///
    /// When provided, all other render parameter flags are ignored.
    /// Missing fields take their default values.
    #[arg(long)]
    config_json: Option<String>,

    /// Print the render summary as JSON instead of a human-readable report.
    #[arg(long)]
    json: bool,
}

/// Line family selection.
#[derive(Clone, Copy, ValueEnum)]
enum Lines {
    /// Parallel straight lines.
    Straight,
    /// One spiral from the center outward.
    Spiral,
    /// One concentric polygon spiral.
    Polygon,
    /// Parallel sine-shaped carriers.
    Sines,
}

/// Pattern selection.
#[derive(Clone, Copy, ValueEnum)]
enum Pattern {
    /// Lateral wave displacement.
    Waves,
    /// On/off dashes from an ordered dithering table.
    Dithering,
}

/// Build a [`RenderConfig`] from CLI arguments.
///
/// If `--config-json` is provided, the JSON is parsed directly and all
/// individual parameter flags are ignored.
fn config_from_cli(cli: &Cli) -> Result<RenderConfig, String> {
    if let Some(ref json) = cli.config_json {
        return serde_json::from_str(json).map_err(|e| format!("Error parsing --config-json: {e}"));
    }

    Ok(RenderConfig {
        line_style: match cli.lines {
            Lines::Straight => LineStyle::Straight,
            Lines::Spiral => LineStyle::Spiral,
            Lines::Polygon => LineStyle::Polygon,
            Lines::Sines => LineStyle::Sines,
        },
        pattern: match cli.pattern {
            Pattern::Waves => PatternStyle::Waves,
            Pattern::Dithering => PatternStyle::Dithering,
        },
        lines_count: cli.lines_count,
        orientation: cli.orientation,
        polygon_sides: cli.polygon_sides,
        sines_amplitude: cli.sines_amplitude,
        sines_frequency: cli.sines_frequency,
        max_amplitude: cli.max_amplitude,
        max_frequency: cli.max_frequency,
        wave_angle: cli.wave_angle,
        wave_squareness: cli.wave_squareness,
        line_thickness: cli.line_thickness,
        invert_colors: cli.invert,
        true_intensity: !cli.no_true_intensity,
        blur: cli.blur,
    })
}

/// Document title: explicit `--title`, else the input file stem.
fn title_for(cli: &Cli) -> String {
    cli.title.clone().unwrap_or_else(|| {
        cli.image_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("undulate")
            .to_string()
    })
}

fn output_path(cli: &Cli) -> PathBuf {
    cli.output
        .clone()
        .unwrap_or_else(|| cli.image_path.with_extension("svg"))
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let config = match config_from_cli(&cli) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = config.validate() {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    let image_bytes = match std::fs::read(&cli.image_path) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("Error reading {}: {e}", cli.image_path.display());
            return ExitCode::FAILURE;
        }
    };
    let image = match undulate_pipeline::load_image(&image_bytes) {
        Ok(image) => image,
        Err(e) => {
            eprintln!("Error loading {}: {e}", cli.image_path.display());
            return ExitCode::FAILURE;
        }
    };

    eprintln!(
        "Image: {} ({}x{}, {} bytes)",
        cli.image_path.display(),
        image.width(),
        image.height(),
        image_bytes.len(),
    );
    log::debug!("config: {config:?}");

    let config_json = match serde_json::to_string(&config) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Error serializing config: {e}");
            return ExitCode::FAILURE;
        }
    };
    let metadata = SvgMetadata {
        title: Some(title_for(&cli)),
        description: Some(format!("{:?} lines, {:?} pattern", config.line_style, config.pattern)),
        config_json: Some(config_json),
    };

    let mut renderer = Renderer::new(image);
    let mut plotter = SvgBackend::plotter(metadata);
    let summary = renderer.render(&config, &mut plotter);
    let svg = plotter.backend().export();

    let svg_path = output_path(&cli);
    if let Err(e) = std::fs::write(&svg_path, &svg) {
        eprintln!("Error writing SVG to {}: {e}", svg_path.display());
        return ExitCode::FAILURE;
    }
    eprintln!("SVG written to {} ({} bytes)", svg_path.display(), svg.len());

    if cli.json {
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error serializing summary: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        println!("{}", report(&summary, &svg_path));
    }

    ExitCode::SUCCESS
}

/// Human-readable summary of one render pass.
fn report(summary: &RenderSummary, svg_path: &Path) -> String {
    let fitting = &summary.fitting;
    format!(
        "Rendered {}\n\
         {:<16} {}\n\
         {:<16} {}\n\
         {:<16} {}\n\
         {:<16} {}x{}\n\
         {:<16} {}x{} at ({:.1}, {:.1}), zoom {:.1}\n\
         {:<16} {:.3}ms",
        svg_path.display(),
        "Logical lines",
        summary.line_count,
        "Plotter lines",
        summary.plotter_lines,
        "Points",
        summary.points,
        "Sampled grid",
        summary.grid_size.width,
        summary.grid_size.height,
        "Fitted image",
        fitting.size_in_plotter.width,
        fitting.size_in_plotter.height,
        fitting.offset.x,
        fitting.offset.y,
        fitting.zoom_factor,
        "Duration",
        summary.duration.as_secs_f64() * 1000.0,
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("undulate").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn flags_default_to_config_defaults() {
        let cli = parse(&["photo.png"]);
        assert_eq!(config_from_cli(&cli).unwrap(), RenderConfig::default());
        assert_eq!(output_path(&cli), PathBuf::from("photo.svg"));
        assert_eq!(title_for(&cli), "photo");
    }

    #[test]
    fn flags_map_onto_config() {
        let cli = parse(&[
            "in.jpg",
            "--lines",
            "polygon",
            "--pattern",
            "dithering",
            "--polygon-sides",
            "5",
            "--orientation",
            "-30",
            "--invert",
            "--no-true-intensity",
            "-o",
            "out.svg",
        ]);
        let config = config_from_cli(&cli).unwrap();
        assert_eq!(config.line_style, LineStyle::Polygon);
        assert_eq!(config.pattern, PatternStyle::Dithering);
        assert_eq!(config.polygon_sides, 5);
        assert!((config.orientation + 30.0).abs() < f64::EPSILON);
        assert!(config.invert_colors);
        assert!(!config.true_intensity);
        assert_eq!(output_path(&cli), PathBuf::from("out.svg"));
    }

    #[test]
    fn polygon_sides_below_three_rejected() {
        let result =
            Cli::try_parse_from(["undulate", "in.png", "--polygon-sides", "2"].iter().copied());
        assert!(result.is_err());
    }

    #[test]
    fn config_json_overrides_flags() {
        let cli = parse(&[
            "in.png",
            "--lines",
            "spiral",
            "--config-json",
            r#"{"line_style":"Sines","lines_count":12.0}"#,
        ]);
        let config = config_from_cli(&cli).unwrap();
        assert_eq!(config.line_style, LineStyle::Sines);
        assert!((config.lines_count - 12.0).abs() < f64::EPSILON);
        assert_eq!(config.pattern, PatternStyle::Waves);
    }

    #[test]
    fn malformed_config_json_is_reported() {
        let cli = parse(&["in.png", "--config-json", "{not json"]);
        let err = config_from_cli(&cli).unwrap_err();
        assert!(err.starts_with("Error parsing --config-json"));
    }

    #[test]
    fn explicit_title_wins() {
        let cli = parse(&["dir/cat.png", "--title", "Cat"]);
        assert_eq!(title_for(&cli), "Cat");
    }
}
