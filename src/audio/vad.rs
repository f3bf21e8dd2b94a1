//! Voice activity detection for speech/silence frame classification.
//!
//! Engines consume 16-bit PCM frames, the same representation the segmenter
//! retains, so a frame is converted exactly once per capture.

/// Voice activity detection engine that classifies one frame at a time.
///
/// # Frame Size Contract
/// Implementations may require specific frame sizes. Earshot expects frames
/// of 10 ms, 20 ms, or 30 ms duration at the configured sample rate.
///
/// Frame size in samples = (sample_rate * frame_duration_ms) / 1000
/// Example: 30 ms @ 16 kHz = 480 samples
///
/// Callers must hand `process_frame` exactly one full frame; short frames are
/// discarded upstream and never reach an engine.
pub trait VadEngine {
    fn process_frame(&mut self, pcm: &[i16]) -> VadDecision;
    fn reset(&mut self);
    fn name(&self) -> &'static str {
        "unknown_vad"
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum VadDecision {
    Speech,
    Silence,
    Uncertain,
}

/// Lightweight fallback detector operating on RMS energy. Used when earshot
/// is disabled or unavailable.
#[derive(Debug, Clone)]
pub struct SimpleThresholdVad {
    threshold_db: f32,
}

impl SimpleThresholdVad {
    pub fn new(threshold_db: f32) -> Self {
        Self { threshold_db }
    }
}

impl VadEngine for SimpleThresholdVad {
    fn process_frame(&mut self, pcm: &[i16]) -> VadDecision {
        if pcm.is_empty() {
            return VadDecision::Uncertain;
        }
        let energy: f32 = pcm
            .iter()
            .map(|&s| {
                let sample = f32::from(s) / 32_768.0;
                sample * sample
            })
            .sum::<f32>()
            / pcm.len() as f32;
        let rms = energy.sqrt().max(1e-6);
        let db = 20.0 * rms.log10();
        if db >= self.threshold_db {
            VadDecision::Speech
        } else {
            VadDecision::Silence
        }
    }

    fn reset(&mut self) {}

    fn name(&self) -> &'static str {
        "simple_threshold_vad"
    }
}
