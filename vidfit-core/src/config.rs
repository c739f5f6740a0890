// ============================================================================
// vidfit-core/src/config.rs
// ============================================================================
//
// CONFIGURATION: Encode Requests, Variant Profiles and Encoder Settings
//
// This module defines the configuration structures used by the pipeline:
//
// - Variant / VariantProfile: the output flavour (MP4/H.264 + AAC or
//   WebM/VP9 + Opus) and everything that differs between the two.
// - EncoderSettings: tunables shared by both passes (audio allocation,
//   thread hint, row-based multithreading).
// - EncodeRequest: what the user asked for on a single run.
//
// USAGE:
// The CLI builds an EncodeRequest and EncoderSettings from its arguments,
// calls `validate()` on both and hands them to `process_video`.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{CoreError, CoreResult};

// ============================================================================
// DEFAULT CONSTANTS
// ============================================================================

/// Bitrate reserved for the audio track when one is kept (kbps).
pub const DEFAULT_AUDIO_BITRATE_KBPS: u32 = 64;

/// Thread-count hint passed to the encoder.
pub const DEFAULT_THREADS: u32 = 4;

/// Default output height in pixels. Kept as a string since it is forwarded
/// verbatim into the scale filter.
pub const DEFAULT_SCALE_HEIGHT: &str = "720";

/// Default target size for the MP4 variant (kilobytes).
pub const DEFAULT_MP4_TARGET_KB: u64 = 24_500;

/// Default target size for the WebM variant (kilobytes).
pub const DEFAULT_WEBM_TARGET_KB: u64 = 4_000;

// ============================================================================
// VARIANTS
// ============================================================================

/// Output flavour produced by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// H.264 video with AAC audio in an MP4 container.
    Mp4,
    /// VP9 video with Opus audio in a WebM container.
    Webm,
}

/// Codec and naming details for a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantProfile {
    pub video_codec: &'static str,
    pub audio_codec: &'static str,
    /// Container extension, without the leading dot.
    pub extension: &'static str,
    /// Appended to the input stem when naming the output file.
    pub output_suffix: &'static str,
    pub default_target_kb: u64,
}

impl Variant {
    /// Returns the codec/naming profile for this variant.
    #[must_use]
    pub fn profile(self) -> VariantProfile {
        match self {
            Variant::Mp4 => VariantProfile {
                video_codec: "libx264",
                audio_codec: "aac",
                extension: "mp4",
                output_suffix: "_discord",
                default_target_kb: DEFAULT_MP4_TARGET_KB,
            },
            Variant::Webm => VariantProfile {
                video_codec: "libvpx-vp9",
                audio_codec: "libopus",
                extension: "webm",
                output_suffix: "",
                default_target_kb: DEFAULT_WEBM_TARGET_KB,
            },
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Mp4 => write!(f, "MP4 (H.264/AAC)"),
            Variant::Webm => write!(f, "WebM (VP9/Opus)"),
        }
    }
}

impl VariantProfile {
    /// Output file name for `input`: `<stem><suffix>.<extension>`.
    pub fn output_file_name(&self, input: &Path) -> CoreResult<String> {
        let stem = input.file_stem().ok_or_else(|| {
            CoreError::PathError(format!(
                "Cannot derive output name from '{}'",
                input.display()
            ))
        })?;
        Ok(format!(
            "{}{}.{}",
            stem.to_string_lossy(),
            self.output_suffix,
            self.extension
        ))
    }
}

// ============================================================================
// ENCODER SETTINGS
// ============================================================================

/// Tunables shared by both encoder passes.
///
/// # Examples
///
/// ```rust
/// use vidfit_core::config::EncoderSettings;
///
/// let settings = EncoderSettings {
///     threads: 8,
///     ..Default::default()
/// };
/// assert_eq!(settings.audio_bitrate_kbps, 64);
/// settings.validate().unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderSettings {
    /// Bitrate given to the audio track and deducted from the video budget.
    pub audio_bitrate_kbps: u32,

    /// Thread-count hint (`-threads`).
    pub threads: u32,

    /// Enables row-based multithreading (`-row-mt 1`).
    pub row_mt: bool,

    /// Suppresses the ffmpeg banner (`-hide_banner`).
    pub hide_banner: bool,
}

impl Default for EncoderSettings {
    fn default() -> Self {
        Self {
            audio_bitrate_kbps: DEFAULT_AUDIO_BITRATE_KBPS,
            threads: DEFAULT_THREADS,
            row_mt: true,
            hide_banner: true,
        }
    }
}

impl EncoderSettings {
    pub fn validate(&self) -> CoreResult<()> {
        if self.audio_bitrate_kbps == 0 {
            return Err(CoreError::Config(
                "Audio bitrate must be greater than 0 kbps".to_string(),
            ));
        }
        if self.threads == 0 {
            return Err(CoreError::Config(
                "Thread count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// ENCODE REQUEST
// ============================================================================

/// A single encode as requested by the user.
#[derive(Debug, Clone)]
pub struct EncodeRequest {
    pub input_path: PathBuf,

    pub variant: Variant,

    /// Output height in pixels; width follows the aspect ratio.
    pub scale_height: String,

    /// Desired output size in kilobytes.
    pub target_size_kb: u64,

    /// Drop the audio track even when the source has one.
    pub audio_suppressed: bool,

    /// Directory the output file is written to.
    pub output_dir: PathBuf,

    /// Replace an existing output file instead of refusing to run.
    pub overwrite: bool,
}

impl EncodeRequest {
    /// Creates a request with the variant's default target, the default
    /// scale and the current directory as output directory.
    pub fn new(input_path: PathBuf, variant: Variant) -> Self {
        Self {
            input_path,
            variant,
            scale_height: DEFAULT_SCALE_HEIGHT.to_string(),
            target_size_kb: variant.profile().default_target_kb,
            audio_suppressed: false,
            output_dir: PathBuf::from("."),
            overwrite: false,
        }
    }

    /// Full path of the file the second pass writes.
    pub fn output_path(&self) -> CoreResult<PathBuf> {
        let name = self.variant.profile().output_file_name(&self.input_path)?;
        Ok(self.output_dir.join(name))
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.target_size_kb == 0 {
            return Err(CoreError::Config(
                "Target size must be greater than 0".to_string(),
            ));
        }

        match self.scale_height.parse::<i64>() {
            Ok(height) if height > 0 || height == -1 || height == -2 => {}
            _ => {
                return Err(CoreError::Config(format!(
                    "Scale must be a positive pixel height, got '{}'",
                    self.scale_height
                )));
            }
        }

        if self.output_dir.exists() && !self.output_dir.is_dir() {
            return Err(CoreError::PathError(format!(
                "Output directory '{}' is not a directory",
                self.output_dir.display()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mp4_output_name_has_discord_suffix() {
        let profile = Variant::Mp4.profile();
        let name = profile
            .output_file_name(Path::new("/videos/clip.mkv"))
            .unwrap();
        assert_eq!(name, "clip_discord.mp4");
    }

    #[test]
    fn test_webm_output_name_uses_plain_stem() {
        let profile = Variant::Webm.profile();
        let name = profile
            .output_file_name(Path::new("holiday.final.mp4"))
            .unwrap();
        assert_eq!(name, "holiday.final.webm");
    }

    #[test]
    fn test_output_name_requires_file_component() {
        let profile = Variant::Webm.profile();
        assert!(matches!(
            profile.output_file_name(Path::new("/")),
            Err(CoreError::PathError(_))
        ));
    }

    #[test]
    fn test_request_defaults_follow_variant() {
        let mp4 = EncodeRequest::new(PathBuf::from("a.mov"), Variant::Mp4);
        assert_eq!(mp4.target_size_kb, 24_500);
        assert_eq!(mp4.scale_height, "720");
        assert_eq!(mp4.output_path().unwrap(), PathBuf::from("./a_discord.mp4"));

        let webm = EncodeRequest::new(PathBuf::from("a.mov"), Variant::Webm);
        assert_eq!(webm.target_size_kb, 4_000);
        assert_eq!(webm.output_path().unwrap(), PathBuf::from("./a.webm"));
    }

    #[test]
    fn test_request_validation() {
        let mut request = EncodeRequest::new(PathBuf::from("a.mov"), Variant::Webm);
        assert!(request.validate().is_ok());

        request.scale_height = "tall".to_string();
        assert!(matches!(request.validate(), Err(CoreError::Config(_))));

        request.scale_height = "480".to_string();
        request.target_size_kb = 0;
        assert!(matches!(request.validate(), Err(CoreError::Config(_))));
    }

    #[test]
    fn test_settings_validation() {
        assert!(EncoderSettings::default().validate().is_ok());

        let settings = EncoderSettings {
            threads: 0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }
}
