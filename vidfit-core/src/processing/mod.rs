//! Core processing logic and orchestration.
//!
//! This module organizes the pipeline steps into submodules and exposes the
//! functions that drive a complete encode.

/// Target bitrate calculation
pub mod bitrate;

/// Two-pass encoder driver
pub mod two_pass;

/// Encode orchestration: probe, calculate, run both passes
pub mod video;

pub use bitrate::calculate;
pub use two_pass::{EncodeJob, Pass, PassConfig, run_two_pass_encode};
pub use video::{EncodePlan, check_paths, execute_plan, plan_encode, process_video};
