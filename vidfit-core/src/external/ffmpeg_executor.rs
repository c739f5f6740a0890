// ============================================================================
// vidfit-core/src/external/ffmpeg_executor.rs
// ============================================================================
//
// FFMPEG EXECUTOR: FFmpeg Process Management and Abstraction
//
// This module provides the process-runner seam for ffmpeg. The encoder driver
// only ever talks to the FfmpegSpawner/FfmpegProcess traits, so tests can swap
// in the mocks from `external::mocks` without an ffmpeg binary.
//
// KEY COMPONENTS:
// - FfmpegProcess: Trait representing an active FFmpeg process
// - FfmpegSpawner: Trait for creating new FFmpeg processes
// - SidecarSpawner: Concrete implementation using ffmpeg-sidecar
// - run_to_completion: spawn, drain events, wait, return status + diagnostics

use crate::error::{CoreResult, command_start_error, command_wait_error};
use ffmpeg_sidecar::child::FfmpegChild as SidecarChild;
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel};
use std::collections::VecDeque;
use std::io;
use std::process::ExitStatus;

/// Number of diagnostic lines kept for error reports.
const STDERR_TAIL_LINES: usize = 40;

// --- FFmpeg Execution Abstraction ---

/// Trait representing an active ffmpeg process instance.
pub trait FfmpegProcess {
    /// Processes events from the running command using a provided handler closure.
    fn handle_events<F>(&mut self, handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>;

    /// Waits for the command to complete and returns its exit status.
    fn wait(&mut self) -> CoreResult<ExitStatus>;
}

/// Trait representing something that can spawn an FfmpegProcess.
pub trait FfmpegSpawner {
    type Process: FfmpegProcess;
    /// Spawns the ffmpeg command, consuming the command object.
    fn spawn(&self, cmd: FfmpegCommand) -> CoreResult<Self::Process>;
}

// --- Concrete Implementation using ffmpeg-sidecar ---

/// Wrapper around `ffmpeg_sidecar::child::FfmpegChild` implementing `FfmpegProcess`.
pub struct SidecarProcess(SidecarChild);

impl FfmpegProcess for SidecarProcess {
    fn handle_events<F>(&mut self, mut handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>,
    {
        let iterator = self.0.iter().map_err(|e| {
            log::error!("Failed to get ffmpeg event iterator: {}", e);
            command_wait_error("ffmpeg (event stream)", io::Error::other(e.to_string()))
        })?;
        for event in iterator {
            handler(event)?;
        }
        Ok(())
    }

    fn wait(&mut self) -> CoreResult<ExitStatus> {
        self.0
            .wait()
            .map_err(|e| command_wait_error("ffmpeg (sidecar)", e))
    }
}

/// Concrete implementation of `FfmpegSpawner` using `ffmpeg-sidecar`.
#[derive(Debug, Clone, Default)]
pub struct SidecarSpawner;

impl FfmpegSpawner for SidecarSpawner {
    type Process = SidecarProcess;

    fn spawn(&self, mut cmd: FfmpegCommand) -> CoreResult<Self::Process> {
        cmd.spawn()
            .map(SidecarProcess)
            .map_err(|e| command_start_error("ffmpeg (sidecar)", e))
    }
}

// --- Run To Completion ---

/// Exit status and captured diagnostics of a finished ffmpeg run.
#[derive(Debug, Clone)]
pub struct ProcessOutcome {
    pub status: ExitStatus,
    /// Tail of the warning/error output, newline separated.
    pub stderr: String,
}

impl ProcessOutcome {
    #[must_use]
    pub fn success(&self) -> bool {
        self.status.success()
    }
}

/// Spawns `cmd`, drains its event stream and waits for it to exit.
///
/// Warning and error lines are kept (last few dozen) for error reporting;
/// everything else goes to the trace log.
pub fn run_to_completion<S: FfmpegSpawner>(
    spawner: &S,
    cmd: FfmpegCommand,
) -> CoreResult<ProcessOutcome> {
    let mut child = spawner.spawn(cmd)?;
    let mut tail: VecDeque<String> = VecDeque::with_capacity(STDERR_TAIL_LINES);

    let mut keep = |line: String| {
        if tail.len() == STDERR_TAIL_LINES {
            tail.pop_front();
        }
        tail.push_back(line);
    };

    child.handle_events(|event| {
        match event {
            FfmpegEvent::Log(LogLevel::Warning | LogLevel::Error | LogLevel::Fatal, line)
            | FfmpegEvent::Error(line) => {
                log::debug!("ffmpeg: {line}");
                keep(line);
            }
            FfmpegEvent::Log(_, line) => log::trace!("ffmpeg: {line}"),
            _ => {}
        }
        Ok(())
    })?;

    let status = child.wait()?;
    let stderr = tail.into_iter().collect::<Vec<_>>().join("\n");
    Ok(ProcessOutcome { status, stderr })
}
