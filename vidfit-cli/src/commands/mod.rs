//! Command implementations for the CLI.

/// The `mp4` and `webm` encode subcommands.
pub mod encode;
