//! One listen/transcribe pass: record a voiced segment off the live capture
//! stream, run Whisper over it, and normalize the transcript.

use crate::audio::{CaptureStream, SegmentConfig, SegmentMetrics, SimpleThresholdVad, VadEngine};
use crate::config::{AppConfig, VadEngineKind, VoicePipelineConfig};
use crate::stt::Transcriber;
use anyhow::Result;
use regex::Regex;
use std::sync::atomic::AtomicBool;
use std::sync::OnceLock;
use std::time::Instant;
use tracing::debug;

/// Outcome of one capture pass.
#[derive(Debug, PartialEq, Eq)]
pub enum Utterance {
    Transcript {
        text: String,
        metrics: SegmentMetrics,
    },
    Empty {
        metrics: SegmentMetrics,
    },
}

/// Record one voiced segment and transcribe it.
///
/// An empty segment (nothing voiced before the timeout) returns
/// `Utterance::Empty`; a transcription failure propagates so the caller can
/// apologize and continue the loop.
pub fn listen_for_command(
    stream: &CaptureStream,
    transcriber: &Transcriber,
    config: &AppConfig,
    vad: &mut dyn VadEngine,
    interrupt: &AtomicBool,
) -> Result<Utterance> {
    let pipeline = config.voice_pipeline_config();
    let segment_cfg = SegmentConfig::from(&pipeline);

    let record_start = Instant::now();
    let capture = stream.record_voice_command(&segment_cfg, vad, Some(interrupt));
    let metrics = capture.metrics.clone();
    log_segment_metrics(&metrics);

    if capture.is_empty() {
        return Ok(Utterance::Empty { metrics });
    }
    let record_elapsed = record_start.elapsed().as_secs_f64();

    let stt_start = Instant::now();
    let transcript = transcriber.transcribe(&capture.audio, config)?;
    let stt_elapsed = stt_start.elapsed().as_secs_f64();
    debug!(
        "timing|record_s={record_elapsed:.3}|stt_s={stt_elapsed:.3}|samples={}",
        capture.audio.len()
    );

    let cleaned = normalize_transcript(&transcript);
    if cleaned.is_empty() {
        Ok(Utterance::Empty { metrics })
    } else {
        Ok(Utterance::Transcript {
            text: cleaned,
            metrics,
        })
    }
}

/// Lowercase, trim, strip bracketed non-speech markers, and collapse
/// whitespace. Whisper labels silence and noise with markers like
/// `[BLANK_AUDIO]` or `(wind blowing)` that must never reach the dispatcher.
pub fn normalize_transcript(text: &str) -> String {
    let lowered = text.to_lowercase();
    let trimmed = lowered.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    static NON_SPEECH_RE: OnceLock<Regex> = OnceLock::new();
    let re = NON_SPEECH_RE.get_or_init(|| {
        Regex::new(
            r"(?i)\[\s*\]|\(\s*\)|\[(?:\s*(?:silence|noise|inaudible|blank_audio|blank audio|music|laughter|applause|cough|breath(?:ing)?|wind|background)\s*)\]|\((?:\s*(?:silence|noise|inaudible|blank audio|music|laughter|applause|cough|breath(?:ing)?|wind|background|wind blowing)\s*)\)",
        )
        .expect("non-speech regex should compile")
    });
    let without_markers = re.replace_all(trimmed, " ");
    without_markers
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Build the configured voice activity detector.
pub fn create_vad_engine(cfg: &VoicePipelineConfig) -> Box<dyn VadEngine> {
    match cfg.vad_engine {
        VadEngineKind::Simple => Box::new(SimpleThresholdVad::new(cfg.vad_threshold_db)),
        VadEngineKind::Earshot => {
            #[cfg(feature = "vad_earshot")]
            {
                Box::new(crate::vad_earshot::EarshotVad::from_config(cfg))
            }
            #[cfg(not(feature = "vad_earshot"))]
            {
                unreachable!("earshot VAD requested without 'vad_earshot' feature")
            }
        }
    }
}

/// Emit structured metrics for log scraping.
/// Format: `segment_metrics|frames_kept=...|frames_discarded=...|frames_dropped=...|voiced=...|elapsed_ms=...|stop=...`
fn log_segment_metrics(metrics: &SegmentMetrics) {
    debug!(
        "segment_metrics|frames_kept={}|frames_discarded={}|frames_dropped={}|voiced={}|elapsed_ms={}|stop={}",
        metrics.frames_kept,
        metrics.frames_discarded,
        metrics.frames_dropped,
        metrics.voiced_frames,
        metrics.elapsed_ms,
        metrics.stop_reason.label()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_lowercases_and_trims() {
        assert_eq!(normalize_transcript("  Jarvis What TIME is it  "), "jarvis what time is it");
    }

    #[test]
    fn normalize_strips_non_speech_markers() {
        assert_eq!(normalize_transcript("[BLANK_AUDIO]"), "");
        assert_eq!(normalize_transcript("hello [noise] world"), "hello world");
        assert_eq!(normalize_transcript("(wind blowing) jarvis hello"), "jarvis hello");
    }

    #[test]
    fn normalize_collapses_whitespace() {
        assert_eq!(normalize_transcript("jarvis   search  \t rust"), "jarvis search rust");
    }

    #[test]
    fn normalize_keeps_ordinary_words() {
        assert_eq!(normalize_transcript("what is the weather"), "what is the weather");
    }

    fn test_pipeline(engine: VadEngineKind) -> VoicePipelineConfig {
        VoicePipelineConfig {
            sample_rate: 16_000,
            frame_ms: 30,
            command_timeout_ms: 10_000,
            min_voiced_frames: 5,
            silence_run_frames: 10,
            channel_capacity: 64,
            vad_threshold_db: -55.0,
            vad_engine: engine,
        }
    }

    #[test]
    fn create_vad_engine_uses_simple_when_requested() {
        let engine = create_vad_engine(&test_pipeline(VadEngineKind::Simple));
        assert_eq!(engine.name(), "simple_threshold_vad");
    }

    #[cfg(feature = "vad_earshot")]
    #[test]
    fn create_vad_engine_uses_earshot_when_requested() {
        let engine = create_vad_engine(&test_pipeline(VadEngineKind::Earshot));
        assert_eq!(engine.name(), "earshot_vad");
    }
}
