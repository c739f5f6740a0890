// vidfit-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use vidfit_core::config::{
    DEFAULT_MP4_TARGET_KB, DEFAULT_SCALE_HEIGHT, DEFAULT_THREADS, DEFAULT_WEBM_TARGET_KB,
};

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "vidfit: Fit a video into a target file size",
    long_about = "Encodes a video in two passes with ffmpeg, choosing the bitrate so the \
                  output lands close to the requested size."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output for troubleshooting
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Encode to MP4 (H.264 video, AAC audio)
    Mp4(Mp4Args),
    /// Encode to WebM (VP9 video, Opus audio)
    Webm(WebmArgs),
}

/// Arguments shared by every output variant.
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Input video file
    #[arg(required = true, value_name = "INPUT")]
    pub input_path: PathBuf,

    /// Output height in pixels; width follows the aspect ratio
    #[arg(short, long, value_name = "HEIGHT", default_value = DEFAULT_SCALE_HEIGHT,
          allow_hyphen_values = true)]
    pub scale: String,

    /// Directory where the encoded file is written
    #[arg(short = 'o', long = "output-dir", value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Thread-count hint passed to the encoder
    #[arg(long, value_name = "N", default_value_t = DEFAULT_THREADS,
          value_parser = clap::value_parser!(u32).range(1..))]
    pub threads: u32,

    /// Replace the output file if it already exists
    #[arg(long)]
    pub overwrite: bool,
}

#[derive(Args, Debug, Clone)]
pub struct Mp4Args {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Target output size in kilobytes
    #[arg(short, long, value_name = "KB", default_value_t = DEFAULT_MP4_TARGET_KB,
          value_parser = clap::value_parser!(u64).range(1..))]
    pub target: u64,
}

#[derive(Args, Debug, Clone)]
pub struct WebmArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Target output size in kilobytes
    #[arg(short, long, value_name = "KB", default_value_t = DEFAULT_WEBM_TARGET_KB,
          value_parser = clap::value_parser!(u64).range(1..))]
    pub target: u64,

    /// Drop the audio track
    #[arg(short = 'n', long = "noaudio")]
    pub no_audio: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mp4_defaults() {
        let cli = Cli::try_parse_from(["vidfit", "mp4", "clip.mkv"]).unwrap();
        let Commands::Mp4(args) = cli.command else {
            panic!("expected mp4 subcommand");
        };
        assert_eq!(args.common.input_path, PathBuf::from("clip.mkv"));
        assert_eq!(args.common.scale, "720");
        assert_eq!(args.target, 24_500);
        assert_eq!(args.common.threads, 4);
        assert_eq!(args.common.output_dir, PathBuf::from("."));
        assert!(!args.common.overwrite);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_webm_flags() {
        let cli = Cli::try_parse_from([
            "vidfit", "webm", "clip.mkv", "-s", "480", "-t", "2000", "-n", "-o", "out", "-v",
        ])
        .unwrap();
        let Commands::Webm(args) = cli.command else {
            panic!("expected webm subcommand");
        };
        assert_eq!(args.common.scale, "480");
        assert_eq!(args.target, 2000);
        assert!(args.no_audio);
        assert_eq!(args.common.output_dir, PathBuf::from("out"));
        assert!(cli.verbose);
    }

    #[test]
    fn test_webm_default_target() {
        let cli = Cli::try_parse_from(["vidfit", "webm", "clip.mkv"]).unwrap();
        let Commands::Webm(args) = cli.command else {
            panic!("expected webm subcommand");
        };
        assert_eq!(args.target, 4_000);
        assert!(!args.no_audio);
    }

    #[test]
    fn test_noaudio_is_webm_only() {
        assert!(Cli::try_parse_from(["vidfit", "mp4", "clip.mkv", "--noaudio"]).is_err());
    }

    #[test]
    fn test_zero_target_rejected() {
        assert!(Cli::try_parse_from(["vidfit", "mp4", "clip.mkv", "-t", "0"]).is_err());
        assert!(Cli::try_parse_from(["vidfit", "webm", "clip.mkv", "-t", "abc"]).is_err());
    }

    #[test]
    fn test_input_required() {
        assert!(Cli::try_parse_from(["vidfit", "webm"]).is_err());
    }
}
