//! Implementation of the `mp4` and `webm` subcommands.
//!
//! Both subcommands share one flow: build the request, check the input and
//! the external tools, probe and report the bitrate, then run the two passes.

use crate::cli::{CommonArgs, Mp4Args, WebmArgs};
use crate::error::CliResult;

use vidfit_core::external::{
    CrateFfprobeExecutor, FfmpegSpawner, FfprobeExecutor, SidecarSpawner, check_dependency,
};
use vidfit_core::processing::{check_paths, execute_plan, plan_encode};
use vidfit_core::{
    EncodeRequest, EncodeResult, EncoderSettings, Variant, format_bytes, format_duration,
    terminal,
};

use log::debug;

fn build_request(common: &CommonArgs, variant: Variant, target: u64, no_audio: bool) -> EncodeRequest {
    let mut request = EncodeRequest::new(common.input_path.clone(), variant);
    request.scale_height = common.scale.clone();
    request.target_size_kb = target;
    request.audio_suppressed = no_audio;
    request.output_dir = common.output_dir.clone();
    request.overwrite = common.overwrite;
    request
}

fn build_settings(common: &CommonArgs) -> EncoderSettings {
    EncoderSettings {
        threads: common.threads,
        ..Default::default()
    }
}

/// Builds the request for `vidfit mp4`.
pub fn mp4_request(args: &Mp4Args) -> EncodeRequest {
    build_request(&args.common, Variant::Mp4, args.target, false)
}

/// Builds the request for `vidfit webm`.
pub fn webm_request(args: &WebmArgs) -> EncodeRequest {
    build_request(&args.common, Variant::Webm, args.target, args.no_audio)
}

pub fn run_mp4(args: &Mp4Args) -> CliResult<EncodeResult> {
    run_encode(&mp4_request(args), &build_settings(&args.common))
}

pub fn run_webm(args: &WebmArgs) -> CliResult<EncodeResult> {
    run_encode(&webm_request(args), &build_settings(&args.common))
}

/// Runs a full encode with the real ffmpeg and ffprobe.
pub fn run_encode(request: &EncodeRequest, settings: &EncoderSettings) -> CliResult<EncodeResult> {
    request.validate()?;
    settings.validate()?;
    check_paths(request)?;

    check_dependency("ffprobe")?;
    check_dependency("ffmpeg")?;

    run_encode_with(&SidecarSpawner, &CrateFfprobeExecutor::new(), request, settings)
}

/// Runs an encode against the given spawner and prober and prints the summary.
pub fn run_encode_with<S: FfmpegSpawner, P: FfprobeExecutor>(
    spawner: &S,
    prober: &P,
    request: &EncodeRequest,
    settings: &EncoderSettings,
) -> CliResult<EncodeResult> {
    terminal::print_section("Initialization");
    terminal::print_status("Input file", &request.input_path.display().to_string(), false);
    terminal::print_status("Output file", &request.output_path()?.display().to_string(), false);
    terminal::print_status("Format", &request.variant.to_string(), false);
    terminal::print_status("Target size", &format!("{} KB", request.target_size_kb), false);
    terminal::print_status("Scale", &format!("{}p", request.scale_height), false);

    let plan = plan_encode(prober, request, settings)?;
    debug!("Encode plan: {:?}", plan.job);

    if let Some(duration) = plan.stream_info.video.as_ref().and_then(|v| v.duration_secs) {
        terminal::print_status("Duration", &format_duration(duration), false);
    }
    terminal::print_status("Audio", if plan.has_audio { "kept" } else { "none" }, false);

    // Stdout carries the one machine-readable line; everything else is logged.
    println!("Calculated bitrate: {} kbps", plan.bitrate_kbps);

    terminal::print_section("Encoding");
    let result = execute_plan(spawner, plan)?;

    print_summary(request, &result);
    Ok(result)
}

/// Signed percentage by which `output_size` bytes miss a target given in
/// kilobytes of 1000 bytes, the unit the bitrate budget is computed in.
fn deviation_from_target(target_size_kb: u64, output_size: u64) -> f64 {
    vidfit_core::utils::size_deviation_percent(target_size_kb.saturating_mul(1000), output_size)
}

fn print_summary(request: &EncodeRequest, result: &EncodeResult) {
    terminal::print_section("Encoding complete");
    terminal::print_success(&format!("Wrote {}", result.output_path.display()));
    terminal::print_status("Bitrate", &format!("{} kbps", result.bitrate_kbps), false);
    terminal::print_status("Time", &format_duration(result.duration.as_secs_f64()), false);
    terminal::print_status("Input size", &format_bytes(result.input_size), false);
    terminal::print_status("Output size", &format_bytes(result.output_size), true);

    let deviation = deviation_from_target(request.target_size_kb, result.output_size);
    if deviation > 0.0 {
        terminal::print_warning(&format!("Output is {deviation:.1}% over the target size"));
    } else {
        terminal::print_status("Vs. target", &format!("{deviation:.1}%"), false);
    }
}
