//! Audio capture and voice activity segmentation pipeline.
//!
//! Microphone audio is captured via CPAL, downmixed to mono, sliced into
//! fixed-duration frames, and pushed through a bounded queue to the
//! segmenter, which classifies frames and decides when an utterance ends.

mod capture;
mod dispatch;
mod recorder;
mod resample;
mod vad;

pub use capture::{collect_segment, CaptureResult, SegmentConfig, SegmentMetrics, StopReason};
pub use recorder::{CaptureStream, Recorder};
pub use vad::{SimpleThresholdVad, VadDecision, VadEngine};
