// cutline-cli/src/cli.rs
//
// Defines the command-line argument structure using clap.

use clap::{ArgGroup, Parser};
use std::path::PathBuf;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "cutline: trim, crop and re-encode clips with ffmpeg",
    long_about = "Compiles a clip request (trim window, crop, scale, fades, audio handling, \
                  output target) into ffmpeg invocations and runs them."
)]
#[command(group(ArgGroup::new("end").args(["duration", "to"])))]
#[command(group(ArgGroup::new("audio").args(["mute", "audio_force", "volume", "normalize"])))]
#[command(group(ArgGroup::new("scale").args(["width", "height"])))]
#[command(group(ArgGroup::new("target").args(["youtube", "nvidia", "x264", "x265", "gif", "apng", "webp"])))]
pub struct Cli {
    /// Source media file
    #[arg(short = 'i', long = "input", required = true, value_name = "INPUT")]
    pub input: PathBuf,

    /// Output file
    #[arg(required = true, value_name = "OUTPUT")]
    pub output: PathBuf,

    // --- Trim ---
    /// Start position (seconds, M:S or H:M:S with optional fraction)
    #[arg(short = 's', long, alias = "ss", default_value = "0", value_name = "TIME")]
    pub start: String,

    /// Length of the clip
    #[arg(short = 't', long, value_name = "TIME")]
    pub duration: Option<String>,

    /// End position on the source timeline
    #[arg(long, value_name = "TIME")]
    pub to: Option<String>,

    /// Use fast (input) seeking even for video targets
    #[arg(long)]
    pub fast_seek: bool,

    // --- Audio ---
    /// Drop the audio stream
    #[arg(short = 'm', long)]
    pub mute: bool,

    /// Re-encode audio even when it could be copied
    #[arg(long)]
    pub audio_force: bool,

    /// Scale audio volume by a factor (e.g. 1.5)
    #[arg(long, value_name = "FACTOR")]
    pub volume: Option<f64>,

    /// Loudness-normalize audio (EBU R128)
    #[arg(long)]
    pub normalize: bool,

    // --- Fades ---
    /// Fade in and out over SECS (overrides --fade-in/--fade-out)
    #[arg(short = 'f', long, value_name = "SECS")]
    pub fade: Option<String>,

    /// Fade in over SECS
    #[arg(long, value_name = "SECS")]
    pub fade_in: Option<String>,

    /// Fade out over SECS
    #[arg(long, value_name = "SECS")]
    pub fade_out: Option<String>,

    // --- Picture ---
    /// Crop rectangle in source pixels
    #[arg(short = 'c', long, value_name = "W:H:X:Y")]
    pub crop: Option<String>,

    /// Output width in pixels, or a factor such as 0.5x
    #[arg(long, value_name = "N|Fx")]
    pub width: Option<String>,

    /// Output height in pixels, or a factor such as 0.5x
    #[arg(long, value_name = "N|Fx")]
    pub height: Option<String>,

    /// Retime to a constant frame rate
    #[arg(short = 'r', long, value_name = "FPS")]
    pub framerate: Option<f64>,

    /// Repeat the clip N additional times
    #[arg(long = "loop", value_name = "N", default_value_t = 0)]
    pub loop_count: u32,

    /// Interpolate up to FPS for slow motion
    #[arg(long, value_name = "FPS")]
    pub slowmo: Option<f64>,

    /// Motion-estimation quality for --slowmo
    #[arg(long, value_name = "PRESET", default_value = "sensible",
          value_parser = ["fast", "sensible", "slow"])]
    pub slowmo_preset: String,

    #[arg(long, allow_negative_numbers = true, value_name = "B")]
    pub brightness: Option<f64>,

    #[arg(long, allow_negative_numbers = true, value_name = "C")]
    pub contrast: Option<f64>,

    #[arg(long, value_name = "S")]
    pub saturation: Option<f64>,

    /// Apply a light unsharp mask
    #[arg(long)]
    pub sharpen: bool,

    /// Fix limited-range sources: 1 tags full range, 2 also rescales
    #[arg(long, value_name = "LEVEL", default_value_t = 0,
          value_parser = clap::value_parser!(u8).range(0..=2))]
    pub fixrgb: u8,

    /// Text for the title metadata tag
    #[arg(long, value_name = "TITLE")]
    pub title: Option<String>,

    // --- Output target ---
    /// H.264 with YouTube bitrate caps
    #[arg(long)]
    pub youtube: bool,

    /// H.264 via NVENC with CUDA decoding
    #[arg(long)]
    pub nvidia: bool,

    /// H.264 via libx264 (default)
    #[arg(long)]
    pub x264: bool,

    /// H.265 via libx265
    #[arg(long)]
    pub x265: bool,

    /// Animated GIF (two-pass palette)
    #[arg(long)]
    pub gif: bool,

    /// Animated PNG
    #[arg(long)]
    pub apng: bool,

    /// Animated WebP
    #[arg(long)]
    pub webp: bool,

    /// Raise CRF/QP for much smaller files
    #[arg(long)]
    pub garbage: bool,

    // --- GIF palette ---
    /// Maximum palette size (2-256)
    #[arg(long, value_name = "N")]
    pub palette_colors: Option<u16>,

    #[arg(long, value_name = "ALG",
          value_parser = ["bayer", "heckbert", "floyd_steinberg", "sierra2", "sierra2_4a", "none"])]
    pub dither: Option<String>,

    #[arg(long, value_name = "MODE", value_parser = ["full", "diff", "single"])]
    pub stats_mode: Option<String>,

    /// Reserve a transparent palette entry
    #[arg(long)]
    pub transparency: bool,

    // --- Execution ---
    /// Extra arguments appended before the output path
    #[arg(long, value_name = "ARGS", allow_hyphen_values = true)]
    pub ffmpeg_args: Option<String>,

    /// Print the ffmpeg command lines without running them
    #[arg(long)]
    pub dry_run: bool,

    /// Log the resolved request, timeline and commands
    #[arg(long)]
    pub debug: bool,

    /// Also write logs to a timestamped file in this directory
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    #[arg(long, value_name = "PATH", env = "CUTLINE_FFMPEG", default_value = "ffmpeg")]
    pub ffmpeg_path: PathBuf,

    #[arg(long, value_name = "PATH", env = "CUTLINE_FFPROBE", default_value = "ffprobe")]
    pub ffprobe_path: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_basic_args() {
        let cli = Cli::parse_from(["cutline", "-i", "in.mkv", "out.mp4"]);
        assert_eq!(cli.input, PathBuf::from("in.mkv"));
        assert_eq!(cli.output, PathBuf::from("out.mp4"));
        assert_eq!(cli.start, "0");
        assert_eq!(cli.slowmo_preset, "sensible");
        assert_eq!(cli.loop_count, 0);
        assert!(!cli.dry_run);
    }

    #[test]
    fn test_parse_trim_and_effects() {
        let cli = Cli::parse_from([
            "cutline", "-i", "in.mkv", "--ss", "1:30", "-t", "10", "-f", "0.5",
            "-c", "640:360:0:0", "--height", "0.5x", "--brightness", "-0.1", "--gif", "out.gif",
        ]);
        assert_eq!(cli.start, "1:30");
        assert_eq!(cli.duration.as_deref(), Some("10"));
        assert_eq!(cli.fade.as_deref(), Some("0.5"));
        assert_eq!(cli.crop.as_deref(), Some("640:360:0:0"));
        assert_eq!(cli.height.as_deref(), Some("0.5x"));
        assert_eq!(cli.brightness, Some(-0.1));
        assert!(cli.gif);
    }

    #[test]
    fn test_exclusive_groups() {
        for args in [
            vec!["cutline", "-i", "in.mkv", "--gif", "--webp", "out"],
            vec!["cutline", "-i", "in.mkv", "-t", "5", "--to", "9", "out"],
            vec!["cutline", "-i", "in.mkv", "--mute", "--normalize", "out"],
            vec!["cutline", "-i", "in.mkv", "--width", "640", "--height", "360", "out"],
        ] {
            assert!(Cli::try_parse_from(args.iter().copied()).is_err(), "{args:?} should conflict");
        }
    }

    #[test]
    fn test_ffmpeg_args_accept_hyphens() {
        let cli = Cli::parse_from(["cutline", "-i", "in.mkv", "--ffmpeg-args", "-map 0", "out.mp4"]);
        assert_eq!(cli.ffmpeg_args.as_deref(), Some("-map 0"));
    }

    #[test]
    fn test_fixrgb_range() {
        assert!(Cli::try_parse_from(["cutline", "-i", "in.mkv", "--fixrgb", "3", "out"]).is_err());
    }
}
