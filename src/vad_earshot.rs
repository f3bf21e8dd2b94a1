//! Earshot-powered voice activity detector adapter implementing `VadEngine`.

use crate::audio::{VadDecision, VadEngine};
use crate::config::VoicePipelineConfig;
use earshot::{VoiceActivityDetector, VoiceActivityProfile};

/// Thin wrapper that adapts `earshot` to the crate's `VadEngine` trait.
///
/// The configured dB threshold selects an aggressiveness profile; earshot
/// itself has no continuous threshold.
pub struct EarshotVad {
    detector: VoiceActivityDetector,
    frame_samples: usize,
    scratch: Vec<i16>,
}

impl EarshotVad {
    pub fn from_config(cfg: &VoicePipelineConfig) -> Self {
        let profile = match cfg.vad_threshold_db {
            t if t <= -50.0 => VoiceActivityProfile::VERY_AGGRESSIVE,
            t if t <= -40.0 => VoiceActivityProfile::AGGRESSIVE,
            t if t <= -30.0 => VoiceActivityProfile::LBR,
            _ => VoiceActivityProfile::QUALITY,
        };
        let frame_samples = ((cfg.sample_rate as usize) * (cfg.frame_ms as usize)) / 1000;
        Self {
            detector: VoiceActivityDetector::new(profile),
            frame_samples: frame_samples.max(80),
            scratch: Vec::new(),
        }
    }
}

impl VadEngine for EarshotVad {
    fn process_frame(&mut self, pcm: &[i16]) -> VadDecision {
        if pcm.is_empty() {
            return VadDecision::Uncertain;
        }
        self.scratch.clear();
        self.scratch.extend_from_slice(pcm);
        // Earshot requires an exact 10/20/30 ms frame.
        if self.scratch.len() < self.frame_samples {
            self.scratch.resize(self.frame_samples, 0);
        } else if self.scratch.len() > self.frame_samples {
            self.scratch.truncate(self.frame_samples);
        }
        match self.detector.predict_16khz(&self.scratch) {
            Ok(true) => VadDecision::Speech,
            Ok(false) => VadDecision::Silence,
            Err(_) => VadDecision::Uncertain,
        }
    }

    fn reset(&mut self) {
        self.detector.reset();
    }

    fn name(&self) -> &'static str {
        "earshot_vad"
    }
}
