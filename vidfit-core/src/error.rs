// ============================================================================
// vidfit-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Error Types for the vidfit Core Library
//
// This module defines the single error enum used across vidfit-core. Each
// stage of the pipeline (probe, bitrate calculation, the two encoder passes)
// maps its failures onto one of these variants, and everything propagates to
// the CLI with `?`.
//
// KEY COMPONENTS:
// - CoreError: The error enum
// - CoreResult: Result alias
// - command_*_error helpers for external process failures

use std::io;
use std::process::ExitStatus;

use thiserror::Error;

use crate::processing::two_pass::Pass;

/// Errors produced by vidfit-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// ffprobe could not be run, failed, or returned output with no usable streams.
    #[error("Probe failed: {0}")]
    Probe(String),

    /// The probed file has no video stream, so no duration is available.
    #[error("No video stream found in {0}")]
    MissingVideoStream(String),

    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    /// The target size cannot accommodate the duration (and audio allocation).
    #[error(
        "Target size too small: total bitrate {total_kbps} kbps leaves no room for video \
         after reserving {audio_kbps} kbps for audio"
    )]
    BitrateTooLow { total_kbps: i64, audio_kbps: u32 },

    /// The encoder exited with a non-zero status during one of the passes.
    #[error("ffmpeg {pass} failed ({status}):\n{stderr}")]
    EncoderProcess {
        pass: Pass,
        status: ExitStatus,
        stderr: String,
    },

    /// The final pass exited cleanly but left no usable file behind.
    #[error("ffmpeg pass 2 reported success but the output {0} is missing or empty")]
    MissingOutput(String),

    #[error("Failed to start {0}: {1}")]
    CommandStart(String, #[source] io::Error),

    #[error("Failed waiting for {0}: {1}")]
    CommandWait(String, #[source] io::Error),

    #[error("Required dependency '{0}' not found in PATH")]
    DependencyNotFound(String),

    #[error("Path error: {0}")]
    PathError(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type alias used throughout vidfit-core.
pub type CoreResult<T> = Result<T, CoreError>;

/// Builds a `CommandStart` error for a process that could not be spawned.
pub fn command_start_error(cmd: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::CommandStart(cmd.into(), err)
}

/// Builds a `CommandWait` error for a process whose exit could not be collected.
pub fn command_wait_error(cmd: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::CommandWait(cmd.into(), err)
}

/// Builds an `EncoderProcess` error from a pass, its exit status and captured stderr.
pub fn encoder_process_error(pass: Pass, status: ExitStatus, stderr: impl Into<String>) -> CoreError {
    CoreError::EncoderProcess {
        pass,
        status,
        stderr: stderr.into(),
    }
}
