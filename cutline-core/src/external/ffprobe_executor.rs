//! ffprobe integration for reading source properties.
//!
//! The prober asks for JSON restricted to the first video stream's width,
//! height, duration and frame rate, then hands the document to
//! [`MediaInfo::from_probe_json`].

use crate::config::CompilerConfig;
use crate::error::{CoreError, CoreResult, command_start_error};
use crate::media::MediaInfo;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Reads source properties for one input.
pub trait MediaProber {
    fn probe(&self, input: &Path) -> CoreResult<MediaInfo>;
}

/// Runs the ffprobe binary as a child process.
#[derive(Debug, Clone)]
pub struct FfprobeCommandProber {
    ffprobe_path: PathBuf,
    fallback_duration_secs: f64,
}

impl FfprobeCommandProber {
    #[must_use]
    pub fn new(ffprobe_path: impl Into<PathBuf>, fallback_duration_secs: f64) -> Self {
        Self {
            ffprobe_path: ffprobe_path.into(),
            fallback_duration_secs,
        }
    }

    #[must_use]
    pub fn from_config(config: &CompilerConfig) -> Self {
        Self::new(&config.ffprobe_path, config.fallback_duration_secs)
    }

    /// Arguments passed to ffprobe for `input`.
    #[must_use]
    pub fn probe_args(input: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = ["-v", "error", "-i"].iter().map(OsString::from).collect();
        args.push(input.as_os_str().to_owned());
        args.extend(
            [
                "-select_streams",
                "v:0",
                "-hide_banner",
                "-print_format",
                "json",
                "-show_entries",
                "stream=width,height,duration,r_frame_rate",
            ]
            .iter()
            .map(OsString::from),
        );
        args
    }
}

impl MediaProber for FfprobeCommandProber {
    fn probe(&self, input: &Path) -> CoreResult<MediaInfo> {
        log::debug!("Running ffprobe for video properties on: {}", input.display());

        let output = Command::new(&self.ffprobe_path)
            .args(Self::probe_args(input))
            .output()
            .map_err(|e| command_start_error(self.ffprobe_path.display().to_string(), e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            log::error!("ffprobe failed on {}: {}", input.display(), stderr.trim());
            return Err(CoreError::ProbeFailure(format!(
                "ffprobe exited with {} for {}: {}",
                output.status,
                input.display(),
                stderr.trim()
            )));
        }

        let info = MediaInfo::from_probe_json(
            &String::from_utf8_lossy(&output.stdout),
            self.fallback_duration_secs,
        )?;
        log::debug!(
            "Probed {}: {}x{} @ {:.3}fps, {:.3}s",
            input.display(),
            info.width,
            info.height,
            info.frame_rate,
            info.duration_secs
        );
        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_args_select_first_video_stream() {
        let args: Vec<String> = FfprobeCommandProber::probe_args(Path::new("clip.mov"))
            .into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(&args[..4], ["-v", "error", "-i", "clip.mov"]);
        assert!(args.windows(2).any(|w| w == ["-select_streams", "v:0"]));
        assert_eq!(args.last().map(String::as_str), Some("stream=width,height,duration,r_frame_rate"));
    }

    #[test]
    fn missing_ffprobe_binary_fails_to_start() {
        let prober = FfprobeCommandProber::new("cutline-no-such-ffprobe", 1000.0);
        let err = prober.probe(Path::new("clip.mov")).unwrap_err();
        assert!(matches!(err, CoreError::CommandStart(..)));
    }
}
