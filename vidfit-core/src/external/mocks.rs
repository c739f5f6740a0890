// vidfit-core/src/external/mocks.rs

// --- Mocking Infrastructure (for testing) ---

// Compiled for this crate's own tests, or for dependents with the "test-mocks" feature.

use super::{FfmpegProcess, FfmpegSpawner, FfprobeExecutor};
use crate::error::{CoreError, CoreResult};
use crate::media::StreamInfo;
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::FfmpegEvent;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::rc::Rc;

/// Bytes written into dummy output files.
const DUMMY_OUTPUT: &[u8] = b"vidfit mock encoder output";

/// Builds an `ExitStatus` carrying `code` as the process exit code.
#[cfg(unix)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(code << 8)
}

/// Builds an `ExitStatus` carrying `code` as the process exit code.
#[cfg(windows)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    ExitStatus::from_raw(code as u32)
}

/// Mock implementation of FfmpegProcess.
#[derive(Clone)]
pub struct MockFfmpegProcess {
    /// Events to emit when handle_events is called.
    pub events_to_emit: Rc<RefCell<Vec<FfmpegEvent>>>,
    /// Exit status to return when wait is called.
    pub exit_status: ExitStatus,
}

impl FfmpegProcess for MockFfmpegProcess {
    fn handle_events<F>(&mut self, mut handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>,
    {
        let events = self.events_to_emit.borrow().clone();
        for event in events {
            handler(event)?;
        }
        Ok(())
    }

    fn wait(&mut self) -> CoreResult<ExitStatus> {
        Ok(self.exit_status)
    }
}

/// Represents an expected ffmpeg command call and its mock result.
pub struct MockFfmpegExpectation {
    pub arg_pattern: String,
    pub result: CoreResult<MockFfmpegProcess>,
    /// Write a small file at the command's output path (its last argument).
    pub create_dummy_output: bool,
}

/// Mock implementation of FfmpegSpawner supporting multiple expectations.
///
/// Each spawn consumes the first expectation whose pattern appears in one of
/// the command's arguments. A spawn with no matching expectation panics.
#[derive(Clone, Default)]
pub struct MockFfmpegSpawner {
    expectations: Rc<RefCell<Vec<MockFfmpegExpectation>>>,
    received_calls: Rc<RefCell<Vec<Vec<String>>>>,
}

impl MockFfmpegSpawner {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn add_expectation(
        &self,
        arg_pattern: &str,
        result: CoreResult<MockFfmpegProcess>,
        create_dummy_output: bool,
    ) {
        self.expectations.borrow_mut().push(MockFfmpegExpectation {
            arg_pattern: arg_pattern.to_string(),
            result,
            create_dummy_output,
        });
    }

    pub fn add_success_expectation(
        &self,
        arg_pattern: &str,
        events: Vec<FfmpegEvent>,
        create_dummy_output: bool,
    ) {
        let process = MockFfmpegProcess {
            events_to_emit: Rc::new(RefCell::new(events)),
            exit_status: exit_status(0),
        };
        self.add_expectation(arg_pattern, Ok(process), create_dummy_output);
    }

    pub fn add_spawn_error_expectation(&self, arg_pattern: &str, error: CoreError) {
        self.add_expectation(arg_pattern, Err(error), false);
    }

    /// Adds an expectation for a process that exits with `exit_code`.
    ///
    /// `create_dummy_output` simulates a partial file left behind by the failure.
    pub fn add_exit_error_expectation(
        &self,
        arg_pattern: &str,
        events: Vec<FfmpegEvent>,
        exit_code: i32,
        create_dummy_output: bool,
    ) {
        let process = MockFfmpegProcess {
            events_to_emit: Rc::new(RefCell::new(events)),
            exit_status: exit_status(exit_code),
        };
        self.add_expectation(arg_pattern, Ok(process), create_dummy_output);
    }

    pub fn get_received_calls(&self) -> Vec<Vec<String>> {
        self.received_calls.borrow().clone()
    }

    /// Number of expectations that were never matched.
    pub fn remaining_expectations(&self) -> usize {
        self.expectations.borrow().len()
    }
}

impl FfmpegSpawner for MockFfmpegSpawner {
    type Process = MockFfmpegProcess;

    fn spawn(&self, cmd: FfmpegCommand) -> CoreResult<Self::Process> {
        let args: Vec<String> = cmd
            .get_args()
            .map(|s| s.to_string_lossy().into_owned())
            .collect();
        self.received_calls.borrow_mut().push(args.clone());

        let mut expectations = self.expectations.borrow_mut();

        let found_index = expectations
            .iter()
            .position(|exp| args.iter().any(|arg| arg.contains(&exp.arg_pattern)));

        let Some(index) = found_index else {
            log::error!("MockFfmpegSpawner: No expectation found for command args: {:?}", args);
            panic!("MockFfmpegSpawner: No expectation found for command args: {:?}", args);
        };

        let expectation = expectations.remove(index);
        log::info!(
            "MockFfmpegSpawner: Matched expectation with pattern '{}'",
            expectation.arg_pattern
        );

        if expectation.result.is_ok() && expectation.create_dummy_output {
            match args.last() {
                Some(output_path) => {
                    let output_path = PathBuf::from(output_path);
                    if let Some(parent) = output_path.parent() {
                        if let Err(e) = std::fs::create_dir_all(parent) {
                            log::error!(
                                "MockFfmpegSpawner failed to create parent dir {:?}: {}",
                                parent,
                                e
                            );
                        }
                    }
                    match std::fs::write(&output_path, DUMMY_OUTPUT) {
                        Ok(()) => log::info!(
                            "MockFfmpegSpawner created dummy output file: {:?}",
                            output_path
                        ),
                        Err(e) => log::error!(
                            "MockFfmpegSpawner failed to create dummy output file {:?}: {}",
                            output_path,
                            e
                        ),
                    }
                }
                None => log::warn!(
                    "MockFfmpegSpawner couldn't find output path in args to create dummy file."
                ),
            }
        }

        expectation.result
    }
}

/// Mock implementation of FfprobeExecutor.
#[derive(Clone, Default)]
pub struct MockFfprobeExecutor {
    results: Rc<RefCell<HashMap<PathBuf, Result<StreamInfo, String>>>>,
}

impl MockFfprobeExecutor {
    pub fn new() -> Self {
        Default::default()
    }

    /// Returns `info` when `input_path` is probed.
    pub fn expect_stream_info(&self, input_path: &Path, info: StreamInfo) {
        self.results
            .borrow_mut()
            .insert(input_path.to_path_buf(), Ok(info));
    }

    /// Fails with `CoreError::Probe(message)` when `input_path` is probed.
    pub fn expect_probe_error(&self, input_path: &Path, message: &str) {
        self.results
            .borrow_mut()
            .insert(input_path.to_path_buf(), Err(message.to_string()));
    }
}

impl FfprobeExecutor for MockFfprobeExecutor {
    fn probe(&self, input_path: &Path) -> CoreResult<StreamInfo> {
        log::info!("MockFfprobeExecutor::probe called for: {}", input_path.display());
        match self.results.borrow().get(input_path) {
            Some(Ok(info)) => Ok(info.clone()),
            Some(Err(message)) => Err(CoreError::Probe(message.clone())),
            None => {
                log::error!(
                    "MockFfprobeExecutor: No expectation set for path: {}",
                    input_path.display()
                );
                Err(CoreError::Probe(format!(
                    "MockFfprobeExecutor: No expectation set for path {}",
                    input_path.display()
                )))
            }
        }
    }
}
