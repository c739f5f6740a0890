//! Target bitrate calculation.
//!
//! The whole size budget is spread evenly over the video's duration:
//! `floor(target_kb * 8 / duration)` kbps. When an audio track is kept, its
//! fixed allocation is taken out of that total and the remainder goes to video.

use crate::config::EncoderSettings;
use crate::error::{CoreError, CoreResult};
use crate::media::StreamInfo;

/// Computes the video bitrate (kbps) for a known duration.
///
/// Fails with `InvalidDuration` unless `duration_secs` is finite and positive,
/// and with `BitrateTooLow` when nothing is left for video.
pub fn calculate_video_bitrate(
    duration_secs: f64,
    target_size_kb: u64,
    has_audio: bool,
    audio_bitrate_kbps: u32,
) -> CoreResult<u32> {
    if !duration_secs.is_finite() || duration_secs <= 0.0 {
        return Err(CoreError::InvalidDuration(format!(
            "{duration_secs} seconds (must be greater than zero)"
        )));
    }

    let total_kbps = (target_size_kb as f64 * 8.0 / duration_secs).floor() as i64;
    let audio_kbps = if has_audio { audio_bitrate_kbps } else { 0 };
    let video_kbps = total_kbps - i64::from(audio_kbps);

    log::debug!(
        "Bitrate budget: {target_size_kb} KB over {duration_secs:.3}s = {total_kbps} kbps total, \
         {audio_kbps} kbps audio, {video_kbps} kbps video"
    );

    if video_kbps <= 0 {
        return Err(CoreError::BitrateTooLow {
            total_kbps,
            audio_kbps,
        });
    }

    Ok(u32::try_from(video_kbps).unwrap_or(u32::MAX))
}

/// Computes the video bitrate (kbps) for probed streams.
///
/// Audio is budgeted only when the source has an audio stream and
/// `audio_suppressed` is false.
pub fn calculate(
    stream_info: &StreamInfo,
    target_size_kb: u64,
    audio_suppressed: bool,
    settings: &EncoderSettings,
) -> CoreResult<u32> {
    let video = stream_info
        .video
        .as_ref()
        .ok_or_else(|| CoreError::MissingVideoStream("probed streams".to_string()))?;

    let duration_secs = video.duration_secs.ok_or_else(|| {
        CoreError::InvalidDuration("video stream reports no duration".to_string())
    })?;

    calculate_video_bitrate(
        duration_secs,
        target_size_kb,
        stream_info.has_audio(audio_suppressed),
        settings.audio_bitrate_kbps,
    )
}
