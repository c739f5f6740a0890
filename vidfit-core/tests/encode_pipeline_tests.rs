// vidfit-core/tests/encode_pipeline_tests.rs

use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;
use vidfit_core::config::{EncodeRequest, EncoderSettings, Variant};
use vidfit_core::error::CoreError;
use vidfit_core::external::mocks::{MockFfmpegSpawner, MockFfprobeExecutor};
use vidfit_core::external::null_sink;
use vidfit_core::media::{AudioStream, StreamInfo, VideoStream};
use vidfit_core::processing::Pass;
use vidfit_core::process_video;

fn create_dummy_file(dir: &Path, filename: &str) -> PathBuf {
    let file_path = dir.join(filename);
    fs::write(&file_path, b"dummy content").expect("Failed to create dummy file");
    file_path
}

fn streams(duration: f64, audio: bool) -> StreamInfo {
    StreamInfo {
        video: Some(VideoStream {
            codec_name: Some("hevc".to_string()),
            duration_secs: Some(duration),
            width: Some(3840),
            height: Some(2160),
        }),
        audio: audio.then(AudioStream::default),
    }
}

#[test]
fn test_mp4_encode_succeeds() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let input = create_dummy_file(dir.path(), "holiday.mov");

    let mut request = EncodeRequest::new(input.clone(), Variant::Mp4);
    request.output_dir = dir.path().join("encoded");
    request.scale_height = "480".to_string();

    let prober = MockFfprobeExecutor::new();
    prober.expect_stream_info(&input, streams(49.0, true));

    let spawner = MockFfmpegSpawner::new();
    spawner.add_success_expectation(null_sink(), vec![], false);
    spawner.add_success_expectation("holiday_discord.mp4", vec![], true);

    let result = process_video(&spawner, &prober, &request, &EncoderSettings::default())?;

    // floor(24500 * 8 / 49) = 4000, minus 64 for audio
    assert_eq!(result.bitrate_kbps, 3936);
    assert!(request.output_dir.join("holiday_discord.mp4").is_file());

    let calls = spawner.get_received_calls();
    assert_eq!(calls.len(), 2);
    for call in &calls {
        assert!(call.iter().any(|a| a == "scale=-1:480"));
        assert!(call.iter().any(|a| a == "libx264"));
    }
    assert!(calls[1].iter().any(|a| a == "aac"));
    Ok(())
}

#[test]
fn test_first_pass_failure_reports_stderr() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let input = create_dummy_file(dir.path(), "broken.mkv");

    let mut request = EncodeRequest::new(input.clone(), Variant::Webm);
    request.output_dir = dir.path().to_path_buf();

    let prober = MockFfprobeExecutor::new();
    prober.expect_stream_info(&input, streams(30.0, false));

    let spawner = MockFfmpegSpawner::new();
    spawner.add_exit_error_expectation(
        null_sink(),
        vec![
            FfmpegEvent::Log(LogLevel::Info, "frame=   10".to_string()),
            FfmpegEvent::Log(LogLevel::Error, "Invalid data found when processing input".to_string()),
        ],
        1,
        false,
    );

    let err = process_video(&spawner, &prober, &request, &EncoderSettings::default())
        .expect_err("first pass should fail");

    match &err {
        CoreError::EncoderProcess { pass, stderr, .. } => {
            assert_eq!(*pass, Pass::First);
            assert!(stderr.contains("Invalid data found"));
            assert!(!stderr.contains("frame="));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(spawner.get_received_calls().len(), 1);
    assert!(!dir.path().join("broken.webm").exists());
    Ok(())
}

#[test]
fn test_second_pass_failure_leaves_no_output() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let input = create_dummy_file(dir.path(), "clip.mkv");

    let mut request = EncodeRequest::new(input.clone(), Variant::Webm);
    request.output_dir = dir.path().join("out");

    let prober = MockFfprobeExecutor::new();
    prober.expect_stream_info(&input, streams(30.0, true));

    let spawner = MockFfmpegSpawner::new();
    spawner.add_success_expectation(null_sink(), vec![], false);
    spawner.add_exit_error_expectation(
        "clip.webm",
        vec![FfmpegEvent::Error("Conversion failed!".to_string())],
        1,
        true,
    );

    let err = process_video(&spawner, &prober, &request, &EncoderSettings::default())
        .expect_err("second pass should fail");
    assert!(err.to_string().contains("pass 2"));
    assert!(err.to_string().contains("Conversion failed!"));
    assert!(!request.output_dir.join("clip.webm").exists());
    Ok(())
}

#[test]
fn test_short_budget_fails_before_encoding() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let input = create_dummy_file(dir.path(), "long.mkv");

    let mut request = EncodeRequest::new(input.clone(), Variant::Webm);
    request.output_dir = dir.path().to_path_buf();
    request.target_size_kb = 100;

    let prober = MockFfprobeExecutor::new();
    // 100 KB over an hour leaves 0 kbps in total
    prober.expect_stream_info(&input, streams(3600.0, true));

    let spawner = MockFfmpegSpawner::new();
    let err = process_video(&spawner, &prober, &request, &EncoderSettings::default())
        .expect_err("budget is too small");

    assert!(matches!(err, CoreError::BitrateTooLow { audio_kbps: 64, .. }));
    assert!(spawner.get_received_calls().is_empty());
    Ok(())
}

#[test]
fn test_overwrite_adds_yes_flag_to_second_pass() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let input = create_dummy_file(dir.path(), "again.mkv");
    let existing = create_dummy_file(dir.path(), "again.webm");

    let mut request = EncodeRequest::new(input.clone(), Variant::Webm);
    request.output_dir = dir.path().to_path_buf();

    let prober = MockFfprobeExecutor::new();
    prober.expect_stream_info(&input, streams(10.0, false));

    let spawner = MockFfmpegSpawner::new();
    let err = process_video(&spawner, &prober, &request, &EncoderSettings::default())
        .expect_err("existing output without --overwrite");
    assert!(matches!(err, CoreError::PathError(_)));
    assert!(existing.is_file());

    request.overwrite = true;
    spawner.add_success_expectation(null_sink(), vec![], false);
    spawner.add_success_expectation("again.webm", vec![], true);
    process_video(&spawner, &prober, &request, &EncoderSettings::default())?;

    let calls = spawner.get_received_calls();
    assert!(calls.last().is_some_and(|c| c.iter().any(|a| a == "-y")));
    Ok(())
}

#[test]
fn test_output_resolving_to_input_is_refused() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let input = create_dummy_file(dir.path(), "clip.webm");

    let mut request = EncodeRequest::new(input.clone(), Variant::Webm);
    request.output_dir = dir.path().join(".");
    request.overwrite = true;

    let prober = MockFfprobeExecutor::new();
    prober.expect_stream_info(&input, streams(10.0, true));

    let spawner = MockFfmpegSpawner::new();
    spawner.add_success_expectation(null_sink(), vec![], false);
    spawner.add_exit_error_expectation("clip.webm", vec![], 1, false);

    let err = process_video(&spawner, &prober, &request, &EncoderSettings::default())
        .expect_err("output is the input file");

    assert!(matches!(err, CoreError::PathError(ref m) if m.contains("overwrite the input")));
    assert!(spawner.get_received_calls().is_empty());
    assert!(input.is_file());
    assert_eq!(fs::read(&input)?, b"dummy content");
    Ok(())
}
