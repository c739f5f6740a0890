// ============================================================================
// vidfit-core/src/processing/video.rs
// ============================================================================
//
// VIDEO PROCESSING: Encode Orchestration
//
// This module ties the pipeline together: probe the input, compute the target
// bitrate, build both encoder passes and run them.
//
// WORKFLOW:
// 1. plan_encode: validate the request, check input/output paths, probe the
//    streams, calculate the bitrate and assemble the EncodeJob.
// 2. execute_plan: run the two passes and collect the result statistics.
//
// The split lets the caller report the calculated bitrate before the
// (long-running) encode starts; process_video runs both steps back to back.

// ---- Internal crate imports ----
use crate::EncodeResult;
use crate::config::{EncodeRequest, EncoderSettings};
use crate::error::{CoreError, CoreResult};
use crate::external::{FfmpegSpawner, FfprobeExecutor};
use crate::media::StreamInfo;
use crate::processing::bitrate;
use crate::processing::two_pass::{EncodeJob, run_two_pass_encode};
use crate::temp_files::PasslogDir;

// ---- External crate imports ----
use log::{debug, info};

// ---- Standard library imports ----
use std::fs;
use std::path::Path;
use std::time::Instant;

/// Everything decided before the encoder runs.
#[derive(Debug)]
pub struct EncodePlan {
    pub request: EncodeRequest,
    pub stream_info: StreamInfo,
    /// Video bitrate in kbps.
    pub bitrate_kbps: u32,
    /// Whether the output carries an audio track.
    pub has_audio: bool,
    pub job: EncodeJob,
    // Holds the pass-log directory alive until the plan is consumed.
    passlog: PasslogDir,
}

fn same_file(a: &Path, b: &Path) -> CoreResult<bool> {
    Ok(fs::canonicalize(a)? == fs::canonicalize(b)?)
}

/// Checks the input file and output location before any tool runs.
///
/// Creates the output directory when it does not exist yet.
pub fn check_paths(request: &EncodeRequest) -> CoreResult<()> {
    let input = &request.input_path;
    if !input.exists() {
        return Err(CoreError::PathError(format!(
            "Input file not found: {}",
            input.display()
        )));
    }
    if !input.is_file() {
        return Err(CoreError::PathError(format!(
            "Input path is not a file: {}",
            input.display()
        )));
    }

    let output = request.output_path()?;
    if output.exists() && same_file(input, &output)? {
        return Err(CoreError::PathError(format!(
            "Output {} would overwrite the input file",
            output.display()
        )));
    }
    if output.exists() && !request.overwrite {
        return Err(CoreError::PathError(format!(
            "Output file already exists: {} (pass --overwrite to replace it)",
            output.display()
        )));
    }

    if !request.output_dir.exists() {
        fs::create_dir_all(&request.output_dir).map_err(|e| {
            CoreError::PathError(format!(
                "Failed to create output directory '{}': {}",
                request.output_dir.display(),
                e
            ))
        })?;
    }

    Ok(())
}

/// Probes the input and prepares both encoder passes.
pub fn plan_encode<P: FfprobeExecutor>(
    ffprobe_executor: &P,
    request: &EncodeRequest,
    settings: &EncoderSettings,
) -> CoreResult<EncodePlan> {
    request.validate()?;
    settings.validate()?;
    check_paths(request)?;

    let stream_info = ffprobe_executor.probe(&request.input_path)?;
    let video = stream_info.require_video(&request.input_path)?;
    debug!(
        "Video stream: codec={:?} duration={:?} size={:?}x{:?}",
        video.codec_name, video.duration_secs, video.width, video.height
    );

    let has_audio = stream_info.has_audio(request.audio_suppressed);
    if stream_info.audio.is_some() && !has_audio {
        info!("Audio stream present but suppressed; output will be silent");
    }

    let bitrate_kbps = bitrate::calculate(
        &stream_info,
        request.target_size_kb,
        request.audio_suppressed,
        settings,
    )?;

    let passlog = PasslogDir::new()?;
    let job = EncodeJob::new(request, settings, bitrate_kbps, has_audio, &passlog.prefix())?;

    Ok(EncodePlan {
        request: request.clone(),
        stream_info,
        bitrate_kbps,
        has_audio,
        job,
        passlog,
    })
}

/// Runs both encoder passes of `plan`.
pub fn execute_plan<S: FfmpegSpawner>(spawner: &S, plan: EncodePlan) -> CoreResult<EncodeResult> {
    let start = Instant::now();
    let input_size = fs::metadata(&plan.request.input_path)?.len();

    let output_size = run_two_pass_encode(spawner, &plan.job)?;
    let duration = start.elapsed();

    info!(
        "Encode finished in {:.1}s: {} bytes -> {} bytes",
        duration.as_secs_f64(),
        input_size,
        output_size
    );

    // Pass-log statistics are removed here.
    drop(plan.passlog);

    Ok(EncodeResult {
        filename: plan
            .job
            .output_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        output_path: plan.job.output_path,
        bitrate_kbps: plan.bitrate_kbps,
        duration,
        input_size,
        output_size,
    })
}

/// Probes, calculates and encodes a single file.
///
/// # Examples
///
/// ```rust,no_run
/// use vidfit_core::config::{EncodeRequest, EncoderSettings, Variant};
/// use vidfit_core::external::{CrateFfprobeExecutor, SidecarSpawner};
/// use vidfit_core::process_video;
/// use std::path::PathBuf;
///
/// let request = EncodeRequest::new(PathBuf::from("clip.mkv"), Variant::Webm);
/// let result = process_video(
///     &SidecarSpawner,
///     &CrateFfprobeExecutor::new(),
///     &request,
///     &EncoderSettings::default(),
/// )
/// .unwrap();
/// println!("{} kbps -> {}", result.bitrate_kbps, result.output_path.display());
/// ```
pub fn process_video<S: FfmpegSpawner, P: FfprobeExecutor>(
    spawner: &S,
    ffprobe_executor: &P,
    request: &EncodeRequest,
    settings: &EncoderSettings,
) -> CoreResult<EncodeResult> {
    let plan = plan_encode(ffprobe_executor, request, settings)?;
    execute_plan(spawner, plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Variant;
    use crate::external::mocks::{MockFfmpegSpawner, MockFfprobeExecutor};
    use crate::external::null_sink;
    use crate::media::{AudioStream, VideoStream};
    use std::path::{Path, PathBuf};
    use tempfile::{TempDir, tempdir};

    fn streams(duration: f64, audio: bool) -> StreamInfo {
        StreamInfo {
            video: Some(VideoStream {
                codec_name: Some("h264".to_string()),
                duration_secs: Some(duration),
                width: Some(1920),
                height: Some(1080),
            }),
            audio: audio.then(|| AudioStream {
                codec_name: Some("aac".to_string()),
                channels: Some(2),
            }),
        }
    }

    fn setup(variant: Variant) -> (TempDir, EncodeRequest) {
        let dir = tempdir().unwrap();
        let input = dir.path().join("clip.mkv");
        fs::write(&input, vec![0u8; 4096]).unwrap();
        let mut request = EncodeRequest::new(input, variant);
        request.output_dir = dir.path().join("out");
        (dir, request)
    }

    #[test]
    fn test_missing_input_is_rejected_before_probing() {
        let request = EncodeRequest::new(PathBuf::from("/nonexistent/clip.mkv"), Variant::Webm);
        let prober = MockFfprobeExecutor::new();
        let err = plan_encode(&prober, &request, &EncoderSettings::default()).unwrap_err();
        assert!(err.to_string().contains("Input file not found"));
    }

    #[test]
    fn test_existing_output_requires_overwrite() {
        let (_dir, mut request) = setup(Variant::Webm);
        fs::create_dir_all(&request.output_dir).unwrap();
        fs::write(request.output_path().unwrap(), b"old").unwrap();

        let err = check_paths(&request).unwrap_err();
        assert!(err.to_string().contains("--overwrite"));

        request.overwrite = true;
        check_paths(&request).unwrap();
    }

    #[test]
    fn test_check_paths_creates_output_dir() {
        let (_dir, request) = setup(Variant::Mp4);
        assert!(!request.output_dir.exists());
        check_paths(&request).unwrap();
        assert!(request.output_dir.is_dir());
    }

    #[test]
    fn test_plan_computes_bitrate_with_audio() {
        let (_dir, request) = setup(Variant::Webm);
        let prober = MockFfprobeExecutor::new();
        prober.expect_stream_info(&request.input_path, streams(100.0, true));

        let plan = plan_encode(&prober, &request, &EncoderSettings::default()).unwrap();
        // 4000 KB * 8 / 100 s = 320 kbps, minus 64 for audio
        assert_eq!(plan.bitrate_kbps, 256);
        assert!(plan.has_audio);
        assert_eq!(plan.job.second_pass.option("-c:a"), Some("libopus"));
    }

    #[test]
    fn test_plan_with_suppressed_audio_uses_full_budget() {
        let (_dir, mut request) = setup(Variant::Webm);
        request.audio_suppressed = true;
        let prober = MockFfprobeExecutor::new();
        prober.expect_stream_info(&request.input_path, streams(100.0, true));

        let plan = plan_encode(&prober, &request, &EncoderSettings::default()).unwrap();
        assert_eq!(plan.bitrate_kbps, 320);
        assert!(!plan.has_audio);
        assert!(plan.job.second_pass.has_flag("-an"));
    }

    #[test]
    fn test_plan_rejects_video_less_input() {
        let (_dir, request) = setup(Variant::Mp4);
        let prober = MockFfprobeExecutor::new();
        prober.expect_stream_info(
            &request.input_path,
            StreamInfo {
                video: None,
                audio: Some(AudioStream::default()),
            },
        );

        let err = plan_encode(&prober, &request, &EncoderSettings::default()).unwrap_err();
        assert!(matches!(err, CoreError::MissingVideoStream(_)));
    }

    #[test]
    fn test_probe_failure_propagates() {
        let (_dir, request) = setup(Variant::Mp4);
        let prober = MockFfprobeExecutor::new();
        prober.expect_probe_error(&request.input_path, "moov atom not found");

        let err = plan_encode(&prober, &request, &EncoderSettings::default()).unwrap_err();
        assert!(matches!(err, CoreError::Probe(ref m) if m.contains("moov atom")));
    }

    #[test]
    fn test_process_video_end_to_end() {
        let (_dir, request) = setup(Variant::Mp4);
        let prober = MockFfprobeExecutor::new();
        prober.expect_stream_info(&request.input_path, streams(245.0, true));

        let spawner = MockFfmpegSpawner::new();
        spawner.add_success_expectation(null_sink(), vec![], false);
        spawner.add_success_expectation("clip_discord.mp4", vec![], true);

        let result =
            process_video(&spawner, &prober, &request, &EncoderSettings::default()).unwrap();

        // 24500 KB * 8 / 245 s = 800 kbps, minus 64 for audio
        assert_eq!(result.bitrate_kbps, 736);
        assert_eq!(result.filename, "clip_discord.mp4");
        assert_eq!(result.output_path, request.output_dir.join("clip_discord.mp4"));
        assert_eq!(result.input_size, 4096);
        assert!(result.output_size > 0);
        assert_eq!(spawner.remaining_expectations(), 0);

        let calls = spawner.get_received_calls();
        assert_eq!(calls.len(), 2);
        assert!(calls.iter().all(|c| c.iter().any(|a| a == "736k")));
    }

    #[test]
    fn test_passlog_dir_removed_after_execute() {
        let (_dir, request) = setup(Variant::Webm);
        let prober = MockFfprobeExecutor::new();
        prober.expect_stream_info(&request.input_path, streams(60.0, false));

        let plan = plan_encode(&prober, &request, &EncoderSettings::default()).unwrap();
        let passlog_dir: PathBuf = plan
            .job
            .first_pass
            .option("-passlogfile")
            .map(Path::new)
            .and_then(Path::parent)
            .unwrap()
            .to_path_buf();
        assert!(passlog_dir.is_dir());

        let spawner = MockFfmpegSpawner::new();
        spawner.add_success_expectation(null_sink(), vec![], false);
        spawner.add_success_expectation("clip.webm", vec![], true);
        execute_plan(&spawner, plan).unwrap();

        assert!(!passlog_dir.exists());
    }
}
