//! FFprobe integration for stream discovery.
//!
//! The pipeline only needs to know which streams a file carries and how long
//! its video runs; this module runs ffprobe through the `ffprobe` crate and
//! hands the metadata to `media::stream_info_from_metadata`.
use crate::error::{CoreError, CoreResult, command_start_error};
use crate::media::{StreamInfo, stream_info_from_metadata};
use ffprobe::{FfProbeError, ffprobe};
use std::path::Path;

/// Trait for probing a media file's streams.
pub trait FfprobeExecutor {
    /// Returns the first video and audio stream of `input_path`.
    fn probe(&self, input_path: &Path) -> CoreResult<StreamInfo>;
}

/// `FfprobeExecutor` backed by the `ffprobe` crate.
#[derive(Debug, Clone, Default)]
pub struct CrateFfprobeExecutor;

impl CrateFfprobeExecutor {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl FfprobeExecutor for CrateFfprobeExecutor {
    fn probe(&self, input_path: &Path) -> CoreResult<StreamInfo> {
        log::debug!(
            "Running ffprobe (via crate) for stream info on: {}",
            input_path.display()
        );
        match ffprobe(input_path) {
            Ok(metadata) => stream_info_from_metadata(&metadata, input_path),
            Err(err) => {
                log::error!("ffprobe failed on {}: {:?}", input_path.display(), err);
                Err(map_ffprobe_error(err, input_path))
            }
        }
    }
}

fn map_ffprobe_error(err: FfProbeError, input_path: &Path) -> CoreError {
    match err {
        FfProbeError::Io(io_err) => command_start_error("ffprobe", io_err),
        FfProbeError::Status(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            CoreError::Probe(format!(
                "ffprobe exited with {} for {}: {}",
                output.status,
                input_path.display(),
                stderr.trim()
            ))
        }
        FfProbeError::Deserialize(err) => CoreError::Probe(format!(
            "Could not parse ffprobe output for {}: {err}",
            input_path.display()
        )),
        _ => CoreError::Probe(format!(
            "Unknown ffprobe error for {}: {err:?}",
            input_path.display()
        )),
    }
}
