use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

use clap::{ArgAction, Parser};
use serde::Serialize;

use maskblur_core::pipeline::pipeline_logger::{
    NullPipelineLogger, PipelineLogger, StdoutPipelineLogger,
};
use maskblur_core::pipeline::redact_image_use_case::{RedactImageUseCase, RedactionReport};
use maskblur_core::shared::blur_margin::BlurMargin;
use maskblur_core::shared::config::RedactionConfig;
use maskblur_core::shared::constants::{
    DEFAULT_BLUR_DEVIATION, DEFAULT_BLUR_KERNEL_SIZE, DEFAULT_MIN_SIMILARITY, DEFAULT_THRESHOLD,
    IMAGE_EXTENSIONS,
};
use maskblur_core::shared::error::RedactError;
use maskblur_core::shared::rect::Rect;
use maskblur_core::shared::roi::Roi;

/// Find the best match of one or more mask images inside an image and blur it.
#[derive(Parser, Debug)]
#[command(name = "maskblur", version)]
struct Cli {
    /// Input image file.
    #[arg(short, long)]
    input: PathBuf,

    /// Output image file.
    #[arg(short, long)]
    output: PathBuf,

    /// Gaussian blur deviation (0 derives it from the kernel size).
    #[arg(short = 'd', long, default_value_t = DEFAULT_BLUR_DEVIATION)]
    blur_deviation: u32,

    /// Gaussian blur kernel size (must be odd).
    #[arg(short = 'k', long, default_value_t = DEFAULT_BLUR_KERNEL_SIZE)]
    blur_kernel_size: u32,

    /// Binarization threshold applied to the input before searching (0-255).
    #[arg(short, long, default_value_t = DEFAULT_THRESHOLD)]
    threshold: f64,

    /// Region of interest as x,y,width,height. Negative x/y count from the
    /// right/bottom edge; width/height <= 0 extend to the image edge.
    #[arg(short, long, allow_hyphen_values = true)]
    roi: Option<Roi>,

    /// Extra pixels blurred around the match as top,right,bottom,left.
    #[arg(short = 'm', long)]
    blur_margin: Option<BlurMargin>,

    /// Verbosity: -v info, -vv debug with stage timings, -vvv trace.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Matches must score strictly above this similarity (0.0-1.0).
    #[arg(long, default_value_t = DEFAULT_MIN_SIMILARITY)]
    min_similarity: f64,

    /// Search and report, but do not write the output image.
    #[arg(long)]
    dry_run: bool,

    /// Print the result as JSON on stdout.
    #[arg(long)]
    json: bool,

    /// Abort the search once this many seconds have passed.
    #[arg(long)]
    deadline_secs: Option<f64>,

    /// Mask images, searched in order.
    #[arg(required = true, num_args = 1..)]
    masks: Vec<PathBuf>,
}

#[derive(Serialize)]
struct JsonRect {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
}

impl From<Rect> for JsonRect {
    fn from(r: Rect) -> Self {
        Self {
            x: r.x,
            y: r.y,
            width: r.width,
            height: r.height,
        }
    }
}

#[derive(Serialize)]
struct JsonReport {
    matched: JsonRect,
    blurred: JsonRect,
    similarity: f64,
    mask_index: usize,
    mask_path: String,
    input_orientation: &'static str,
    mask_orientation: &'static str,
    warnings: Vec<String>,
    written: bool,
}

impl From<&RedactionReport> for JsonReport {
    fn from(report: &RedactionReport) -> Self {
        Self {
            matched: report.matched.into(),
            blurred: report.blurred.into(),
            similarity: report.similarity,
            mask_index: report.mask_index,
            mask_path: report.mask_path.display().to_string(),
            input_orientation: report.input_orientation.as_str(),
            mask_orientation: report.mask_orientation.as_str(),
            warnings: report.warnings.iter().map(|w| w.to_string()).collect(),
            written: report.written,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(report) => {
            if cli.json {
                match serde_json::to_string_pretty(&JsonReport::from(&report)) {
                    Ok(text) => println!("{text}"),
                    Err(e) => {
                        eprintln!("Error: {e}");
                        process::exit(2);
                    }
                }
            }
        }
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(e.exit_code());
        }
    }
}

fn run(cli: &Cli) -> Result<RedactionReport, RedactError> {
    validate(cli)?;
    let config = build_config(cli);

    let logger: Box<dyn PipelineLogger> = if cli.verbose >= 2 {
        Box::new(StdoutPipelineLogger::new())
    } else {
        Box::new(NullPipelineLogger)
    };
    let mut use_case = RedactImageUseCase::from_config(&config)?.with_logger(logger);
    let report = use_case.execute(&config)?;

    if report.written {
        log::info!(
            "Blurred {} (mask {}, similarity {:.6}); output written to {}",
            report.blurred,
            report.mask_path.display(),
            report.similarity,
            config.output_path.display()
        );
    } else {
        log::info!(
            "Would blur {} (mask {}, similarity {:.6})",
            report.blurred,
            report.mask_path.display(),
            report.similarity
        );
    }
    Ok(report)
}

fn build_config(cli: &Cli) -> RedactionConfig {
    RedactionConfig::new(&cli.input, &cli.output, cli.masks.clone())
        .with_threshold(cli.threshold)
        .with_blur(cli.blur_kernel_size, cli.blur_deviation)
        .with_roi(cli.roi.unwrap_or_else(Roi::whole_image))
        .with_blur_margin(cli.blur_margin.unwrap_or_default())
        .with_min_similarity(cli.min_similarity)
        .with_dry_run(cli.dry_run)
        .with_deadline(
            cli.deadline_secs
                .and_then(|secs| Duration::try_from_secs_f64(secs).ok()),
        )
}

fn validate(cli: &Cli) -> Result<(), RedactError> {
    if !cli.input.exists() {
        return Err(RedactError::Configuration(format!(
            "Input file not found: {}",
            cli.input.display()
        )));
    }
    if let Some(missing) = cli.masks.iter().find(|m| !m.exists()) {
        return Err(RedactError::Configuration(format!(
            "Mask file not found: {}",
            missing.display()
        )));
    }
    if !is_image(&cli.output) {
        return Err(RedactError::Configuration(format!(
            "Output must have an image extension ({}), got {}",
            IMAGE_EXTENSIONS.join(", "),
            cli.output.display()
        )));
    }
    if let Some(secs) = cli.deadline_secs {
        if !secs.is_finite() || secs <= 0.0 {
            return Err(RedactError::Configuration(format!(
                "Deadline must be a positive number of seconds, got {secs}"
            )));
        }
    }
    Ok(())
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// `RUST_LOG` still wins over the `-v` count when set.
fn init_logging(verbose: u8) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level(verbose)))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("maskblur").chain(args.iter().copied())).unwrap()
    }

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        image::RgbImage::new(4, 4).save(&path).unwrap();
        path
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["-i", "in.png", "-o", "out.png", "mask.png"]);
        assert_eq!(cli.threshold, 80.0);
        assert_eq!(cli.blur_kernel_size, 3);
        assert_eq!(cli.blur_deviation, 10);
        assert_eq!(cli.min_similarity, 0.1);
        assert_eq!(cli.verbose, 0);
        assert!(cli.roi.is_none());
        assert!(!cli.dry_run);
        assert_eq!(cli.masks, vec![PathBuf::from("mask.png")]);
    }

    #[test]
    fn test_short_options_and_multiple_masks() {
        let cli = parse(&[
            "-i", "in.png", "-o", "out.png", "-k", "5", "-d", "2", "-t", "120", "-r", "-100,0",
            "-m", "2,4", "-vv", "a.png", "b.png",
        ]);
        assert_eq!(cli.blur_kernel_size, 5);
        assert_eq!(cli.blur_deviation, 2);
        assert_eq!(cli.threshold, 120.0);
        assert_eq!(cli.roi, Some(Roi::new(-100, 0, 0, 0)));
        assert_eq!(
            cli.blur_margin,
            Some(BlurMargin {
                top: 2,
                right: 4,
                bottom: 0,
                left: 0
            })
        );
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.masks.len(), 2);
    }

    #[test]
    fn test_masks_are_required() {
        assert!(Cli::try_parse_from(["maskblur", "-i", "in.png", "-o", "out.png"]).is_err());
    }

    #[test]
    fn test_malformed_roi_is_rejected() {
        assert!(
            Cli::try_parse_from(["maskblur", "-i", "a", "-o", "b", "-r", "1,x", "m.png"]).is_err()
        );
    }

    #[rstest]
    #[case(0, "warn")]
    #[case(1, "info")]
    #[case(2, "debug")]
    #[case(3, "trace")]
    #[case(7, "trace")]
    fn test_log_level(#[case] verbose: u8, #[case] expected: &str) {
        assert_eq!(log_level(verbose), expected);
    }

    #[test]
    fn test_validate_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let mask = touch(dir.path(), "mask.png");
        let cli = parse(&[
            "-i",
            dir.path().join("nope.png").to_str().unwrap(),
            "-o",
            "out.png",
            mask.to_str().unwrap(),
        ]);
        let err = validate(&cli).unwrap_err();
        assert!(err.to_string().contains("Input file not found"));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_validate_missing_mask() {
        let dir = tempfile::tempdir().unwrap();
        let input = touch(dir.path(), "in.png");
        let mask = touch(dir.path(), "mask.png");
        let cli = parse(&[
            "-i",
            input.to_str().unwrap(),
            "-o",
            "out.png",
            mask.to_str().unwrap(),
            dir.path().join("gone.png").to_str().unwrap(),
        ]);
        let err = validate(&cli).unwrap_err();
        assert!(err.to_string().contains("gone.png"));
    }

    #[rstest]
    #[case("out.png", true)]
    #[case("OUT.JPG", true)]
    #[case("out.txt", false)]
    #[case("out", false)]
    fn test_is_image(#[case] path: &str, #[case] expected: bool) {
        assert_eq!(is_image(Path::new(path)), expected);
    }

    #[test]
    fn test_validate_rejects_non_positive_deadline() {
        let dir = tempfile::tempdir().unwrap();
        let input = touch(dir.path(), "in.png");
        let cli = parse(&[
            "-i",
            input.to_str().unwrap(),
            "-o",
            "out.png",
            "--deadline-secs",
            "0",
            input.to_str().unwrap(),
        ]);
        assert!(validate(&cli).is_err());
    }

    #[test]
    fn test_build_config_carries_options() {
        let cli = parse(&[
            "-i", "in.png", "-o", "out.png", "--dry-run", "--min-similarity", "0.5",
            "--deadline-secs", "1.5", "m.png",
        ]);
        let config = build_config(&cli);
        assert!(config.dry_run);
        assert_eq!(config.min_similarity, 0.5);
        assert_eq!(config.deadline, Some(Duration::from_millis(1500)));
        assert_eq!(config.roi, Roi::whole_image());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_json_report_shape() {
        use maskblur_core::matching::orientation::Orientation;

        let report = RedactionReport {
            matched: Rect::new(1, 2, 3, 4),
            blurred: Rect::new(0, 0, 5, 6),
            similarity: 0.75,
            mask_index: 0,
            mask_path: PathBuf::from("m.png"),
            input_orientation: Orientation::Inverted,
            mask_orientation: Orientation::Normal,
            warnings: vec![],
            written: false,
        };
        let value = serde_json::to_value(JsonReport::from(&report)).unwrap();
        assert_eq!(value["matched"]["width"], 3);
        assert_eq!(value["input_orientation"], "inverted");
        assert_eq!(value["written"], false);
    }
}
