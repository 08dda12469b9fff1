//! orthorect-bench: CLI tool for decomposition experiments and diagnostics.
//!
//! Decomposes a polygon read from a shape file with configurable
//! parameters, printing per-pass diagnostics. Useful for:
//!
//! - Checking whether a shape decomposes at all, and why not
//! - Seeing which passes needed the `search2` fallback
//! - Measuring per-pass durations on large inputs
//! - Rendering the result to SVG for inspection
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin orthorect-bench -- [OPTIONS] <SHAPE_PATH>
//! ```
//!
//! The shape file is JSON: `{ "exterior": [[x, y], ...], "holes": [...] }`.
//! Log verbosity follows `RUST_LOG` (default `info`).

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use orthorect::{
    DecomposeConfig, DecomposeDiagnostics, Decomposer, Polygon, ScanOrder, ShapeFile,
    WebTimeClock, WindingPolicy,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Orthogonal polygon decomposition experiments and diagnostics.
///
/// Decomposes the polygon in a shape file into rectangles and prints
/// detailed per-pass timing and count diagnostics.
#[derive(Parser)]
#[command(name = "orthorect-bench", version)]
struct Cli {
    /// Path to the input shape file (JSON).
    shape_path: PathBuf,

    /// Collinearity tolerance, as the sine of the turn angle (0 = exact).
    #[arg(long, default_value_t = DecomposeConfig::DEFAULT_TOLERANCE)]
    tolerance: f64,

    /// Winding handling for the input ring.
    #[arg(long, value_enum, default_value_t = Winding::Normalize)]
    winding: Winding,

    /// Where the rectangle scan starts on each pass.
    #[arg(long, value_enum, default_value_t = Scan::AsGiven)]
    scan_order: Scan,

    /// Write SVG output to file.
    #[arg(long)]
    svg: Option<PathBuf>,

    /// Number of runs for averaging.
    #[arg(long, default_value_t = 1, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    runs: usize,

    /// Output diagnostics as JSON instead of human-readable report.
    #[arg(long)]
    json: bool,

    /// Print the rectangles as JSON instead of diagnostics.
    #[arg(long, conflicts_with = "json")]
    rects: bool,

    /// Full decomposition config as a JSON string.
    ///
    /// When provided, `--tolerance`, `--winding` and `--scan-order` are
    /// ignored.
    /// The JSON must be a valid `DecomposeConfig` serialization.
    #[arg(long)]
    config_json: Option<String>,
}

/// Winding policy selection.
#[derive(Clone, Copy, ValueEnum)]
enum Winding {
    /// Reverse clockwise input before decomposing.
    Normalize,
    /// Reject clockwise input.
    Strict,
}

/// Scan order selection.
#[derive(Clone, Copy, ValueEnum)]
enum Scan {
    /// Scan each ring from its first vertex.
    AsGiven,
    /// Start each scan just after the last concave vertex.
    AfterLastConcave,
}

/// Errors raised before the decomposition starts.
#[derive(Debug, thiserror::Error)]
enum BenchError {
    #[error("error parsing --config-json: {0}")]
    ConfigJson(#[source] serde_json::Error),

    #[error("error reading {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error parsing {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Build a [`DecomposeConfig`] from CLI arguments.
///
/// If `--config-json` is provided, the JSON is parsed directly and the
/// individual parameter flags are ignored.
fn config_from_cli(cli: &Cli) -> Result<DecomposeConfig, BenchError> {
    if let Some(ref json) = cli.config_json {
        return serde_json::from_str(json).map_err(BenchError::ConfigJson);
    }

    Ok(DecomposeConfig {
        tolerance: cli.tolerance,
        winding: match cli.winding {
            Winding::Normalize => WindingPolicy::Normalize,
            Winding::Strict => WindingPolicy::RequireCounterClockwise,
        },
        scan_order: match cli.scan_order {
            Scan::AsGiven => ScanOrder::AsGiven,
            Scan::AfterLastConcave => ScanOrder::AfterLastConcave,
        },
    })
}

/// Read and parse a shape file.
fn load_shape(path: &Path) -> Result<Polygon, BenchError> {
    let json = std::fs::read_to_string(path).map_err(|source| BenchError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let shape: ShapeFile = serde_json::from_str(&json).map_err(|source| BenchError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Polygon::from(shape))
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    let config = match config_from_cli(&cli) {
        Ok(c) => c,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let decomposer = match Decomposer::new(config) {
        Ok(d) => d,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let polygon = match load_shape(&cli.shape_path) {
        Ok(p) => p,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    info!(
        shape = %cli.shape_path.display(),
        vertices = polygon.exterior.vertex_count(),
        holes = polygon.holes.len(),
        "loaded shape"
    );
    info!(?config, runs = cli.runs, "starting");

    let mut all_diagnostics = Vec::with_capacity(cli.runs);

    for run in 0..cli.runs {
        if cli.runs > 1 {
            info!("run {}/{}", run + 1, cli.runs);
        }

        match decomposer.decompose_with_diagnostics(&polygon, &WebTimeClock) {
            Ok((rectangles, diagnostics)) => {
                if cli.rects {
                    if run == 0 {
                        match serde_json::to_string_pretty(&rectangles) {
                            Ok(json) => println!("{json}"),
                            Err(e) => {
                                error!("error serializing rectangles: {e}");
                                return ExitCode::FAILURE;
                            }
                        }
                    }
                } else if cli.json {
                    match serde_json::to_string_pretty(&diagnostics) {
                        Ok(json) => println!("{json}"),
                        Err(e) => {
                            error!("error serializing diagnostics: {e}");
                            return ExitCode::FAILURE;
                        }
                    }
                } else {
                    println!("{}", diagnostics.report());
                }

                // Write SVG on the first run only.
                if run == 0
                    && let Some(ref svg_path) = cli.svg
                {
                    write_svg(svg_path, &cli.shape_path, &config, &polygon, &rectangles);
                }

                all_diagnostics.push(diagnostics);
            }
            Err(e) => {
                error!("decomposition error: {e}");
                return ExitCode::FAILURE;
            }
        }
    }

    // Print summary when multiple runs.
    if cli.runs > 1 {
        print_multi_run_summary(&all_diagnostics);
    }

    ExitCode::SUCCESS
}

/// Render the decomposition to `svg_path`, logging the outcome.
fn write_svg(
    svg_path: &Path,
    shape_path: &Path,
    config: &DecomposeConfig,
    polygon: &Polygon,
    rectangles: &[orthorect::Rectangle],
) {
    let title = shape_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("bench");
    let desc = format!("{} rectangles", rectangles.len());
    let config_json = serde_json::to_string(config).ok();
    let metadata = orthorect_export::SvgMetadata {
        title: Some(title),
        description: Some(&desc),
        config_json: config_json.as_deref(),
    };
    let svg = orthorect_export::to_svg(polygon, rectangles, &metadata);
    match std::fs::write(svg_path, &svg) {
        Ok(()) => info!(
            path = %svg_path.display(),
            bytes = svg.len(),
            "SVG written"
        ),
        Err(e) => error!("error writing SVG to {}: {e}", svg_path.display()),
    }
}

/// Print aggregated statistics across multiple runs.
#[allow(clippy::cast_precision_loss)]
fn print_multi_run_summary(all_diagnostics: &[DecomposeDiagnostics]) {
    debug_assert!(!all_diagnostics.is_empty(), "no diagnostics to summarize");

    println!();
    println!(
        "Summary ({} runs)\n{}",
        all_diagnostics.len(),
        "=".repeat(60),
    );

    if all_diagnostics.is_empty() {
        println!("Warning: no diagnostics to summarize");
        return;
    }

    let durations: Vec<f64> = all_diagnostics
        .iter()
        .map(|d| d.total_duration.as_secs_f64() * 1000.0)
        .collect();

    let min = durations.iter().copied().reduce(f64::min).unwrap_or(0.0);
    let max = durations.iter().copied().reduce(f64::max).unwrap_or(0.0);
    let mean = durations.iter().sum::<f64>() / durations.len() as f64;

    println!("Total duration: min={min:.3}ms  mean={mean:.3}ms  max={max:.3}ms");

    // Per-pass means. Every run decomposes the same polygon, so pass
    // counts agree across runs.
    println!();
    println!("{:<8} {:>12}", "Pass", "Mean (ms)");
    println!("{}", "-".repeat(24));

    let passes = all_diagnostics
        .iter()
        .map(|d| d.iterations.len())
        .max()
        .unwrap_or(0);
    for pass in 0..passes {
        let pass_durations: Vec<f64> = all_diagnostics
            .iter()
            .filter_map(|d| d.iterations.get(pass))
            .map(|it| it.duration.as_secs_f64() * 1000.0)
            .collect();

        if pass_durations.is_empty() {
            continue;
        }

        let pass_mean = pass_durations.iter().sum::<f64>() / pass_durations.len() as f64;
        println!("{pass:<8} {pass_mean:>10.3}ms");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("orthorect-bench").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn flags_build_config() {
        let cli = parse(&[
            "shape.json",
            "--tolerance",
            "0.5",
            "--winding",
            "strict",
            "--scan-order",
            "after-last-concave",
        ]);
        let config = config_from_cli(&cli).unwrap();
        assert!((config.tolerance - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.winding, WindingPolicy::RequireCounterClockwise);
        assert_eq!(config.scan_order, ScanOrder::AfterLastConcave);
    }

    #[test]
    fn defaults_match_library_defaults() {
        let cli = parse(&["shape.json"]);
        assert_eq!(config_from_cli(&cli).unwrap(), DecomposeConfig::default());
        assert_eq!(cli.runs, 1);
    }

    #[test]
    fn config_json_overrides_flags() {
        let cli = parse(&[
            "shape.json",
            "--tolerance",
            "0.5",
            "--config-json",
            r#"{"tolerance":0.25,"winding":"RequireCounterClockwise"}"#,
        ]);
        let config = config_from_cli(&cli).unwrap();
        assert!((config.tolerance - 0.25).abs() < f64::EPSILON);
        assert_eq!(config.winding, WindingPolicy::RequireCounterClockwise);
    }

    #[test]
    fn bad_config_json_is_reported() {
        let cli = parse(&["shape.json", "--config-json", "{not json"]);
        let err = config_from_cli(&cli).unwrap_err();
        assert!(err.to_string().starts_with("error parsing --config-json"));
    }

    #[test]
    fn zero_runs_is_rejected() {
        let result = Cli::try_parse_from(["orthorect-bench", "shape.json", "--runs", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn rects_conflicts_with_json() {
        let result = Cli::try_parse_from(["orthorect-bench", "shape.json", "--rects", "--json"]);
        assert!(result.is_err());
    }

    #[test]
    fn missing_shape_file_is_a_read_error() {
        let err = load_shape(Path::new("/nonexistent/shape.json")).unwrap_err();
        assert!(matches!(err, BenchError::Read { .. }));
    }

    #[test]
    fn sample_shape_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../assets/shapes/l-shape.json");
        let polygon = load_shape(&path).unwrap();
        assert_eq!(polygon.exterior.vertex_count(), 6);
        assert!(!polygon.has_holes());
    }
}
