//! Temporary file management utilities.
//!
//! Two-pass encoding leaves rate-control statistics behind. They are written
//! into a private temporary directory that the tempfile crate removes on drop,
//! so nothing is left in the working directory even when an encode fails.

use crate::error::CoreResult;
use std::path::PathBuf;
use tempfile::{Builder as TempFileBuilder, TempDir};

/// File name prefix handed to ffmpeg's `-passlogfile`.
const PASSLOG_NAME: &str = "vidfit-pass";

/// A temporary directory holding the pass-log statistics of one encode.
#[derive(Debug)]
pub struct PasslogDir {
    dir: TempDir,
}

impl PasslogDir {
    /// Creates a fresh directory under the system temp location.
    pub fn new() -> CoreResult<Self> {
        let dir = TempFileBuilder::new().prefix("vidfit-passlog-").tempdir()?;
        log::debug!("Pass-log directory: {}", dir.path().display());
        Ok(Self { dir })
    }

    /// Prefix passed to ffmpeg; the encoder appends its own suffixes.
    #[must_use]
    pub fn prefix(&self) -> PathBuf {
        self.dir.path().join(PASSLOG_NAME)
    }
}
