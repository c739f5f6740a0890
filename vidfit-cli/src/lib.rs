// vidfit-cli/src/lib.rs
//
// Library portion of the vidfit CLI application.
// Contains argument definitions and command logic.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;

// Re-export items needed by the binary or integration tests
pub use cli::{Cli, Commands, CommonArgs, Mp4Args, WebmArgs};
pub use commands::encode::{run_encode, run_mp4, run_webm};
