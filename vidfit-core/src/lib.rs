//! Core library for size-targeted two-pass video encoding using ffmpeg and ffprobe.
//!
//! This crate probes an input file, derives the video bitrate that makes the
//! output fit a target size, and drives a two-pass ffmpeg encode for one of the
//! supported output variants (MP4 H.264/AAC or WebM VP9/Opus).
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use vidfit_core::{EncodeRequest, EncoderSettings, Variant, process_video};
//! use vidfit_core::external::{CrateFfprobeExecutor, SidecarSpawner};
//! use std::path::PathBuf;
//!
//! let mut request = EncodeRequest::new(PathBuf::from("/path/to/clip.mkv"), Variant::Mp4);
//! request.target_size_kb = 8000;
//! request.validate().unwrap();
//!
//! let result = process_video(
//!     &SidecarSpawner,
//!     &CrateFfprobeExecutor::new(),
//!     &request,
//!     &EncoderSettings::default(),
//! ).unwrap();
//! println!("wrote {} ({} bytes)", result.filename, result.output_size);
//! ```

pub mod config;
pub mod error;
pub mod external;
pub mod media;
pub mod processing;
pub mod temp_files;
pub mod terminal;
pub mod utils;

// Re-exports for public API
pub use config::{EncodeRequest, EncoderSettings, Variant, VariantProfile};
pub use error::{CoreError, CoreResult};
pub use media::StreamInfo;
pub use processing::{execute_plan, plan_encode, process_video};
pub use processing::bitrate::calculate_video_bitrate;
pub use utils::{format_bytes, format_duration};

use std::path::PathBuf;
use std::time::Duration;

/// Result of an encoding operation, containing statistics about the process.
///
/// Returned by `process_video` and `execute_plan` once both passes succeed.
#[derive(Debug, Clone)]
pub struct EncodeResult {
    pub filename: String,
    pub output_path: PathBuf,
    /// Video bitrate used for both passes, in kbps.
    pub bitrate_kbps: u32,
    pub duration: Duration,
    pub input_size: u64,
    pub output_size: u64,
}
