//! Stream metadata extracted from a probe.
//!
//! `StreamInfo` keeps only what the pipeline needs: the first video stream
//! (for duration and dimensions) and the first audio stream (for deciding
//! whether an audio track is encoded and budgeted).

use ffprobe::{FfProbe, Stream};
use std::path::Path;

use crate::error::{CoreError, CoreResult};

/// The first video stream of a probed file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoStream {
    pub codec_name: Option<String>,
    /// Duration in seconds; the stream's own value, falling back to the container's.
    pub duration_secs: Option<f64>,
    pub width: Option<i64>,
    pub height: Option<i64>,
}

/// The first audio stream of a probed file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AudioStream {
    pub codec_name: Option<String>,
    pub channels: Option<i64>,
}

/// Video and audio streams selected from a probe result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StreamInfo {
    pub video: Option<VideoStream>,
    pub audio: Option<AudioStream>,
}

impl StreamInfo {
    /// True when the source has audio and the caller did not ask to drop it.
    #[must_use]
    pub fn has_audio(&self, audio_suppressed: bool) -> bool {
        self.audio.is_some() && !audio_suppressed
    }

    /// Returns the video stream or `MissingVideoStream` naming `source`.
    pub fn require_video(&self, source: &Path) -> CoreResult<&VideoStream> {
        self.video
            .as_ref()
            .ok_or_else(|| CoreError::MissingVideoStream(source.display().to_string()))
    }
}

fn parse_duration(value: Option<&str>) -> Option<f64> {
    value
        .and_then(|d| d.trim().parse::<f64>().ok())
        .filter(|d| d.is_finite())
}

fn is_codec_type(stream: &Stream, codec_type: &str) -> bool {
    stream.codec_type.as_deref() == Some(codec_type)
}

/// Selects the first video and first audio stream from ffprobe metadata.
///
/// Fails with `Probe` when the metadata lists no streams at all and with
/// `MissingVideoStream` when none of them is video.
pub fn stream_info_from_metadata(metadata: &FfProbe, source: &Path) -> CoreResult<StreamInfo> {
    if metadata.streams.is_empty() {
        return Err(CoreError::Probe(format!(
            "No streams found in {}",
            source.display()
        )));
    }

    let container_duration = parse_duration(metadata.format.duration.as_deref());

    let video = metadata
        .streams
        .iter()
        .find(|s| is_codec_type(s, "video"))
        .map(|s| {
            let duration_secs = parse_duration(s.duration.as_deref()).or_else(|| {
                log::debug!(
                    "Video stream in {} has no duration, using container duration {:?}",
                    source.display(),
                    container_duration
                );
                container_duration
            });
            VideoStream {
                codec_name: s.codec_name.clone(),
                duration_secs,
                width: s.width,
                height: s.height,
            }
        });

    if video.is_none() {
        return Err(CoreError::MissingVideoStream(source.display().to_string()));
    }

    let audio = metadata
        .streams
        .iter()
        .find(|s| is_codec_type(s, "audio"))
        .map(|s| AudioStream {
            codec_name: s.codec_name.clone(),
            channels: s.channels,
        });

    Ok(StreamInfo { video, audio })
}
