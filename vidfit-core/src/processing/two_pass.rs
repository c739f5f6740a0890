// ============================================================================
// vidfit-core/src/processing/two_pass.rs
// ============================================================================
//
// TWO-PASS ENCODER DRIVER
//
// Runs ffmpeg twice against the same input:
//
// 1. Analysis pass (`-pass 1`): no audio, null muxer, output to the discard
//    sink. ffmpeg writes rate-control statistics to the pass-log file.
// 2. Final pass (`-pass 2`): reads the statistics back and writes the real
//    output, with or without an audio track.
//
// The second pass only starts after the first exits with status 0. A failed
// second pass has its partial output removed before the error is returned.

use std::fmt;
use std::path::{Path, PathBuf};

use ffmpeg_sidecar::command::FfmpegCommand;

use crate::config::{EncodeRequest, EncoderSettings};
use crate::error::{CoreError, CoreResult, encoder_process_error};
use crate::external::{FfmpegCommandBuilder, FfmpegSpawner, VideoFilterChain, null_sink, run_to_completion};
use crate::terminal;

/// One of the two encoder invocations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    First,
    Second,
}

impl Pass {
    /// Value passed to ffmpeg's `-pass` option.
    #[must_use]
    pub fn number(self) -> u8 {
        match self {
            Pass::First => 1,
            Pass::Second => 2,
        }
    }
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pass {}", self.number())
    }
}

/// Options and output target for one encoder invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassConfig {
    pub pass: Pass,
    /// Ordered `(option, value)` pairs; a `None` value is a bare flag.
    pub options: Vec<(String, Option<String>)>,
    pub output: String,
    /// Emit `-y` so an existing output is replaced.
    pub overwrite: bool,
}

impl PassConfig {
    /// Value of the first occurrence of `name`, if present with a value.
    #[must_use]
    pub fn option(&self, name: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|(key, _)| key == name)
            .and_then(|(_, value)| value.as_deref())
    }

    /// True when `name` is present, with or without a value.
    #[must_use]
    pub fn has_flag(&self, name: &str) -> bool {
        self.options.iter().any(|(key, _)| key == name)
    }
}

/// Both passes of an encode, ready to run.
#[derive(Debug, Clone)]
pub struct EncodeJob {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub video_filter: String,
    pub hide_banner: bool,
    pub first_pass: PassConfig,
    pub second_pass: PassConfig,
}

fn opt(name: &str, value: impl Into<String>) -> (String, Option<String>) {
    (name.to_string(), Some(value.into()))
}

fn flag(name: &str) -> (String, Option<String>) {
    (name.to_string(), None)
}

impl EncodeJob {
    /// Builds both pass configurations.
    ///
    /// `has_audio` decides the audio handling of the final pass for every
    /// variant: an encoded first audio stream, or `-an`. `passlog_prefix` is
    /// shared by both passes so the second finds the first one's statistics.
    pub fn new(
        request: &EncodeRequest,
        settings: &EncoderSettings,
        bitrate_kbps: u32,
        has_audio: bool,
        passlog_prefix: &Path,
    ) -> CoreResult<Self> {
        let profile = request.variant.profile();
        let output_path = request.output_path()?;
        let passlog = passlog_prefix.to_string_lossy().into_owned();

        let mut base = vec![
            opt("-c:v", profile.video_codec),
            opt("-b:v", format!("{bitrate_kbps}k")),
        ];
        if settings.row_mt {
            base.push(opt("-row-mt", "1"));
        }
        base.push(opt("-threads", settings.threads.to_string()));

        let mut first = vec![opt("-map", "0:v:0")];
        first.extend(base.iter().cloned());
        first.extend([
            opt("-pass", "1"),
            opt("-passlogfile", passlog.clone()),
            flag("-an"),
            opt("-f", "null"),
        ]);

        let mut second = vec![opt("-map", "0:v:0")];
        if has_audio {
            second.push(opt("-map", "0:a:0"));
        }
        second.extend(base);
        second.extend([opt("-pass", "2"), opt("-passlogfile", passlog)]);
        if has_audio {
            second.push(opt("-c:a", profile.audio_codec));
            second.push(opt("-b:a", format!("{}k", settings.audio_bitrate_kbps)));
        } else {
            second.push(flag("-an"));
        }

        let video_filter = VideoFilterChain::new()
            .add_scale_to_height(&request.scale_height)
            .build()
            .ok_or_else(|| CoreError::Config("Scale height must not be empty".to_string()))?;

        Ok(Self {
            input_path: request.input_path.clone(),
            output_path: output_path.clone(),
            video_filter,
            hide_banner: settings.hide_banner,
            first_pass: PassConfig {
                pass: Pass::First,
                options: first,
                output: null_sink().to_string(),
                overwrite: true,
            },
            second_pass: PassConfig {
                pass: Pass::Second,
                options: second,
                output: output_path.to_string_lossy().into_owned(),
                overwrite: request.overwrite,
            },
        })
    }

    /// Builds the ffmpeg command line for one pass.
    #[must_use]
    pub fn build_command(&self, config: &PassConfig) -> FfmpegCommand {
        let mut cmd = FfmpegCommandBuilder::new()
            .with_hide_banner(self.hide_banner)
            .with_overwrite(config.overwrite)
            .build();

        cmd.input(self.input_path.to_string_lossy().as_ref());
        cmd.args(["-vf", self.video_filter.as_str()]);

        for (name, value) in &config.options {
            cmd.arg(name);
            if let Some(value) = value {
                cmd.arg(value);
            }
        }

        cmd.output(config.output.as_str());
        cmd
    }
}

/// Runs one pass to completion, failing on a non-zero exit.
fn run_pass<S: FfmpegSpawner>(spawner: &S, job: &EncodeJob, config: &PassConfig) -> CoreResult<()> {
    let cmd = job.build_command(config);
    let args: Vec<String> = cmd
        .get_args()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();
    log::debug!("FFmpeg command ({}): ffmpeg {}", config.pass, args.join(" "));
    terminal::print_processing(&format!("Running encoder {}", config.pass));

    let outcome = run_to_completion(spawner, cmd)?;
    if !outcome.success() {
        log::error!("Encoder {} exited with {}", config.pass, outcome.status);
        return Err(encoder_process_error(config.pass, outcome.status, outcome.stderr));
    }

    terminal::print_success(&format!("Encoder {} complete", config.pass));
    Ok(())
}

fn remove_partial_output(path: &Path) {
    if !path.exists() {
        return;
    }
    match std::fs::remove_file(path) {
        Ok(()) => log::warn!("Removed incomplete output {}", path.display()),
        Err(e) => log::error!(
            "Failed to remove incomplete output {}: {}",
            path.display(),
            e
        ),
    }
}

/// Runs the analysis pass and then the final pass.
///
/// Returns the size in bytes of the written output.
pub fn run_two_pass_encode<S: FfmpegSpawner>(spawner: &S, job: &EncodeJob) -> CoreResult<u64> {
    log::info!(
        "Starting two-pass encode: {} -> {}",
        job.input_path.display(),
        job.output_path.display()
    );

    run_pass(spawner, job, &job.first_pass)?;

    let second = run_pass(spawner, job, &job.second_pass).and_then(|()| {
        let size = std::fs::metadata(&job.output_path).map(|m| m.len()).unwrap_or(0);
        if size == 0 {
            return Err(CoreError::MissingOutput(job.output_path.display().to_string()));
        }
        Ok(size)
    });

    if second.is_err() {
        remove_partial_output(&job.output_path);
    }
    second
}
