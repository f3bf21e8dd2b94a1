//! Voice-activity segmentation over the captured frame stream.
//!
//! Pulls frames off the queue, classifies each one, and accumulates a voiced
//! segment until one of the end conditions triggers: enough trailing silence
//! after speech, the hard command timeout, or queue starvation.

use super::resample::convert_frame_to_target;
use super::vad::{VadDecision, VadEngine};
use crate::config::VoicePipelineConfig;
use crossbeam_channel::{Receiver, RecvTimeoutError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Segmentation parameters for one capture pass.
#[derive(Debug, Clone)]
pub struct SegmentConfig {
    pub sample_rate: u32,
    pub frame_ms: u64,
    pub min_voiced_frames: usize,
    pub silence_run_frames: usize,
    pub command_timeout: Duration,
}

impl SegmentConfig {
    /// Samples per frame at the target rate.
    pub fn frame_samples(&self) -> usize {
        ((u64::from(self.sample_rate) * self.frame_ms) / 1000).max(1) as usize
    }
}

impl From<&VoicePipelineConfig> for SegmentConfig {
    fn from(cfg: &VoicePipelineConfig) -> Self {
        Self {
            sample_rate: cfg.sample_rate,
            frame_ms: cfg.frame_ms,
            min_voiced_frames: cfg.min_voiced_frames,
            silence_run_frames: cfg.silence_run_frames,
            command_timeout: Duration::from_millis(cfg.command_timeout_ms),
        }
    }
}

/// Explains why a capture stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    TrailingSilence { silent_run: usize },
    HardTimeout,
    QueueStarved,
    Interrupted,
    ChannelClosed,
}

impl StopReason {
    pub fn label(&self) -> &'static str {
        match self {
            StopReason::TrailingSilence { .. } => "trailing_silence",
            StopReason::HardTimeout => "hard_timeout",
            StopReason::QueueStarved => "queue_starved",
            StopReason::Interrupted => "interrupted",
            StopReason::ChannelClosed => "channel_closed",
        }
    }
}

/// Metrics collected during one capture pass for observability and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentMetrics {
    pub frames_kept: usize,
    pub frames_discarded: usize,
    pub frames_dropped: usize,
    pub voiced_frames: usize,
    pub elapsed_ms: u64,
    pub stop_reason: StopReason,
}

impl Default for SegmentMetrics {
    fn default() -> Self {
        Self {
            frames_kept: 0,
            frames_discarded: 0,
            frames_dropped: 0,
            voiced_frames: 0,
            elapsed_ms: 0,
            stop_reason: StopReason::HardTimeout,
        }
    }
}

/// One utterance attempt: normalized mono audio plus capture metrics.
///
/// `audio` is empty when no frame was retained or no voiced frame was
/// observed; callers treat that as "no voice detected" and loop again.
#[derive(Debug, Clone)]
pub struct CaptureResult {
    pub audio: Vec<f32>,
    pub metrics: SegmentMetrics,
}

impl CaptureResult {
    pub fn is_empty(&self) -> bool {
        self.audio.is_empty()
    }
}

/// Counters driving the end-condition arbitration. The voiced count is
/// cumulative for the segment; the silence run is consecutive and resets on
/// every voiced frame.
#[derive(Debug, Default)]
pub(super) struct SegmentState {
    pub(super) voiced_frames: usize,
    pub(super) silent_run: usize,
}

impl SegmentState {
    pub(super) fn observe(&mut self, decision: VadDecision) {
        match decision {
            VadDecision::Speech => {
                self.voiced_frames += 1;
                self.silent_run = 0;
            }
            VadDecision::Silence => {
                self.silent_run += 1;
            }
            VadDecision::Uncertain => {
                self.silent_run = 0;
            }
        }
    }

    /// Both thresholds are strict: 5/10 means the segment ends on the 11th
    /// consecutive silent frame once at least 6 voiced frames were heard.
    pub(super) fn trailing_silence(&self, cfg: &SegmentConfig) -> bool {
        self.voiced_frames > cfg.min_voiced_frames && self.silent_run > cfg.silence_run_frames
    }
}

/// Retains every classified frame of the segment as 16-bit PCM. Silence is
/// kept too; the returned audio may include leading/trailing non-speech.
#[derive(Debug, Default)]
pub(super) struct FrameAccumulator {
    frames: Vec<Vec<i16>>,
    total_samples: usize,
}

impl FrameAccumulator {
    pub(super) fn push_frame(&mut self, pcm: Vec<i16>) {
        self.total_samples += pcm.len();
        self.frames.push(pcm);
    }

    pub(super) fn is_empty(&self) -> bool {
        self.total_samples == 0
    }

    /// Concatenate the retained frames and convert fixed-point samples to
    /// normalized f32 amplitude in [-1, 1].
    pub(super) fn into_audio(self) -> Vec<f32> {
        let mut audio = Vec::with_capacity(self.total_samples);
        for frame in self.frames {
            audio.extend(frame.iter().map(|&s| f32::from(s) / 32_768.0));
        }
        audio
    }
}

fn frame_to_pcm(frame: &[f32]) -> Vec<i16> {
    frame
        .iter()
        .map(|&sample| (sample.clamp(-1.0, 1.0) * 32_768.0) as i16)
        .collect()
}

/// Run one segmentation pass against `frames`.
///
/// Every pull waits up to the full command timeout, so a quiet queue ends the
/// capture immediately (starvation) while a live queue is bounded by the
/// wall-clock check after each frame. Frames shorter than the device frame
/// size are discarded without touching any counter.
pub fn collect_segment(
    frames: &Receiver<Vec<f32>>,
    device_rate: u32,
    cfg: &SegmentConfig,
    vad: &mut dyn VadEngine,
    interrupt: Option<&AtomicBool>,
) -> CaptureResult {
    let device_frame_samples = ((u64::from(device_rate) * cfg.frame_ms) / 1000).max(1) as usize;
    let target_frame_samples = cfg.frame_samples();
    let started = Instant::now();
    let mut state = SegmentState::default();
    let mut accumulator = FrameAccumulator::default();
    let mut metrics = SegmentMetrics::default();
    vad.reset();

    let stop_reason = loop {
        if interrupt.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
            break StopReason::Interrupted;
        }
        match frames.recv_timeout(cfg.command_timeout) {
            Ok(frame) => {
                if frame.len() < device_frame_samples {
                    metrics.frames_discarded += 1;
                    continue;
                }
                let frame = convert_frame_to_target(
                    frame,
                    device_rate,
                    cfg.sample_rate,
                    target_frame_samples,
                );
                let pcm = frame_to_pcm(&frame);
                let decision = vad.process_frame(&pcm);
                state.observe(decision);
                accumulator.push_frame(pcm);
                metrics.frames_kept += 1;

                if state.trailing_silence(cfg) {
                    break StopReason::TrailingSilence {
                        silent_run: state.silent_run,
                    };
                }
                if started.elapsed() >= cfg.command_timeout {
                    break StopReason::HardTimeout;
                }
            }
            Err(RecvTimeoutError::Timeout) => break StopReason::QueueStarved,
            Err(RecvTimeoutError::Disconnected) => break StopReason::ChannelClosed,
        }
    };

    metrics.voiced_frames = state.voiced_frames;
    metrics.elapsed_ms = started.elapsed().as_millis() as u64;
    metrics.stop_reason = stop_reason;

    // A capture that never heard speech yields the empty sentinel even when
    // silent frames were retained.
    let audio = if state.voiced_frames == 0 || accumulator.is_empty() {
        Vec::new()
    } else {
        accumulator.into_audio()
    };

    CaptureResult { audio, metrics }
}
