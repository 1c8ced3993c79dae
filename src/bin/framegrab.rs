use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use colored::Colorize;
use env_logger::Env;
use framegrab::{
    Container, DecodeErrorPolicy, ExtractionConfig, FfmpegLogLevel, FrameExtractor,
    FrameGrabError, ScalingAlgorithm,
};
use serde_json::json;

const CLI_AFTER_HELP: &str = "Examples:\n  framegrab input.mp4\n  framegrab input.mkv --out-dir stills --verbose\n  framegrab input.mp4 --dump --log-level info\n  framegrab input.mp4 --json";

#[derive(Debug, Parser)]
#[command(
    name = "framegrab",
    version,
    about = "Save the first decodable video frame of a media file as frame1.ppm",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    /// Input media file.
    input: PathBuf,

    /// Directory to write frame1.ppm into.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Stop at the first packet that fails to decode instead of skipping it.
    #[arg(long)]
    abort_on_decode_error: bool,

    /// Resampling used for colour conversion (bilinear, fast-bilinear, bicubic, point).
    #[arg(long, default_value = "bilinear", value_parser = parse_scaling)]
    scaling: ScalingAlgorithm,

    /// FFmpeg log level (quiet, panic, fatal, error, warning, info, verbose, debug, trace).
    #[arg(long, value_parser = parse_log_level)]
    log_level: Option<FfmpegLogLevel>,

    /// Print FFmpeg's description of the input before extracting.
    #[arg(long)]
    dump: bool,

    /// Print container metadata as JSON and exit without extracting.
    #[arg(long)]
    json: bool,

    /// Show debug-level progress output.
    #[arg(long)]
    verbose: bool,
}

fn parse_log_level(value: &str) -> Result<FfmpegLogLevel, String> {
    FfmpegLogLevel::parse(value).ok_or_else(|| format!("unknown FFmpeg log level: {value}"))
}

fn parse_scaling(value: &str) -> Result<ScalingAlgorithm, String> {
    match value.to_ascii_lowercase().as_str() {
        "bilinear" => Ok(ScalingAlgorithm::Bilinear),
        "fast-bilinear" | "fast_bilinear" => Ok(ScalingAlgorithm::FastBilinear),
        "bicubic" => Ok(ScalingAlgorithm::Bicubic),
        "point" | "nearest" => Ok(ScalingAlgorithm::Point),
        _ => Err(format!("unknown scaling algorithm: {value}")),
    }
}

fn build_config(cli: &Cli) -> ExtractionConfig {
    let policy = if cli.abort_on_decode_error {
        DecodeErrorPolicy::Abort
    } else {
        DecodeErrorPolicy::Continue
    };

    let mut config = ExtractionConfig::new()
        .with_output_directory(&cli.out_dir)
        .with_decode_error_policy(policy)
        .with_scaling(cli.scaling)
        .with_format_dump(cli.dump);
    if let Some(level) = cli.log_level {
        config = config.with_ffmpeg_log_level(level);
    }
    config
}

fn print_metadata(cli: &Cli) -> Result<(), FrameGrabError> {
    if let Some(level) = cli.log_level {
        framegrab::set_ffmpeg_log_level(level);
    }

    let mut container = Container::open(&cli.input)?;
    container.probe_streams()?;
    let Some(metadata) = container.metadata() else {
        return Ok(());
    };

    let streams: Vec<_> = metadata
        .streams
        .iter()
        .map(|stream| {
            json!({
                "index": stream.index,
                "kind": stream.kind.to_string(),
                "codec": stream.codec_name,
                "width": stream.width,
                "height": stream.height,
                "pixel_format": format!("{:?}", stream.pixel_format),
            })
        })
        .collect();

    let value = json!({
        "path": cli.input.display().to_string(),
        "format": metadata.format,
        "duration_seconds": metadata.duration.as_secs_f64(),
        "streams": streams,
    });
    println!("{value:#}");
    Ok(())
}

fn run(cli: &Cli) -> Result<(), FrameGrabError> {
    if cli.json {
        return print_metadata(cli);
    }

    let report = FrameExtractor::new(build_config(cli)).extract(&cli.input)?;
    match &report.output {
        Some(path) => println!(
            "{} {}x{} frame -> {} ({} packets read)",
            "saved".green().bold(),
            report.width,
            report.height,
            path.display(),
            report.packets_read,
        ),
        None => println!(
            "{} no decodable frame in {} packets",
            "done".yellow().bold(),
            report.packets_read,
        ),
    }
    if report.decode_failures > 0 {
        log::warn!("{} packets failed to decode", report.decode_failures);
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!(
                "{} [{}] {error}",
                "error:".red().bold(),
                error.stage()
            );
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn input_is_the_only_required_argument() {
        let cli = Cli::try_parse_from(["framegrab", "movie.mp4"]).unwrap();
        assert_eq!(cli.input, PathBuf::from("movie.mp4"));
        assert_eq!(cli.out_dir, PathBuf::from("."));
        assert_eq!(cli.scaling, ScalingAlgorithm::Bilinear);
        assert!(!cli.abort_on_decode_error);

        assert!(Cli::try_parse_from(["framegrab"]).is_err());
    }

    #[test]
    fn flags_map_onto_config() {
        let cli = Cli::try_parse_from([
            "framegrab",
            "movie.mp4",
            "--out-dir",
            "stills",
            "--abort-on-decode-error",
            "--log-level",
            "error",
        ])
        .unwrap();
        let config = build_config(&cli);
        assert_eq!(config.output_directory(), Path::new("stills"));
        assert_eq!(config.decode_error_policy(), DecodeErrorPolicy::Abort);
        assert_eq!(cli.log_level, Some(FfmpegLogLevel::Error));
    }

    #[test]
    fn parse_scaling_aliases() {
        assert_eq!(parse_scaling("BICUBIC"), Ok(ScalingAlgorithm::Bicubic));
        assert_eq!(parse_scaling("nearest"), Ok(ScalingAlgorithm::Point));
        assert_eq!(parse_scaling("fast-bilinear"), Ok(ScalingAlgorithm::FastBilinear));
        assert!(parse_scaling("lanczos").is_err());
    }

    #[test]
    fn rejects_unknown_log_level() {
        assert!(Cli::try_parse_from(["framegrab", "a.mp4", "--log-level", "loud"]).is_err());
    }
}
