// ============================================================================
// vidfit-cli/src/error.rs
// ============================================================================
//
// CLI ERROR HANDLING: Error types and utilities for the CLI
//
// The CLI reuses the core error type so that every failure, whether it comes
// from argument checks here or from the encode pipeline, is reported the same
// way by main.rs.

// ---- Internal crate imports ----
use vidfit_core::{CoreError, CoreResult};

/// Type alias for CLI results using CoreError.
pub type CliResult<T> = CoreResult<T>;

/// Suggestion shown beneath an error, when there is an obvious fix.
pub fn suggestion_for(error: &CoreError) -> Option<&'static str> {
    match error {
        CoreError::DependencyNotFound(_) => {
            Some("Install ffmpeg (which ships ffprobe) and make sure both are on PATH")
        }
        CoreError::BitrateTooLow { .. } => {
            Some("Raise --target, or drop the audio track with --noaudio (webm)")
        }
        CoreError::PathError(msg) if msg.contains("overwrite the input") => {
            Some("Choose another --output-dir")
        }
        CoreError::PathError(msg) if msg.contains("already exists") => {
            Some("Pass --overwrite or choose another --output-dir")
        }
        _ => None,
    }
}
