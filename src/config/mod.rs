//! Command-line parsing and validation helpers.

mod defaults;
#[cfg(test)]
mod tests;
mod validation;

use clap::{ArgAction, Parser, ValueEnum};

pub use defaults::{
    default_speech_cmd, default_vad_engine, default_wake_words, DEFAULT_CHANNEL_CAPACITY,
    DEFAULT_COMMAND_TIMEOUT_MS, DEFAULT_FRAME_MS, DEFAULT_MIN_VOICED_FRAMES, DEFAULT_SAMPLE_RATE,
    DEFAULT_SILENCE_RUN_FRAMES, DEFAULT_SPEECH_RATE_WPM, DEFAULT_VAD_THRESHOLD_DB,
    DEFAULT_WHISPER_MODEL, MAX_COMMAND_TIMEOUT_MS, MIN_COMMAND_TIMEOUT_MS, SUPPORTED_FRAME_MS,
    SUPPORTED_SAMPLE_RATES,
};

/// CLI options for the voxassist voice assistant. Defaults reproduce the
/// stock behavior; every flag is validated before the audio device opens.
#[derive(Debug, Parser, Clone)]
#[command(about = "voxassist - a wake-word voice command assistant", author, version)]
pub struct AppConfig {
    /// Preferred audio input device name
    #[arg(long)]
    pub input_device: Option<String>,

    /// Print detected audio input devices and exit
    #[arg(long = "list-input-devices", default_value_t = false)]
    pub list_input_devices: bool,

    /// Wake word that must precede a command (repeatable)
    #[arg(long = "wake-word", action = ArgAction::Append, value_name = "WORD")]
    pub wake_words: Vec<String>,

    /// Capture sample rate in Hz (8000, 16000, 32000, or 48000)
    #[arg(long = "sample-rate", default_value_t = DEFAULT_SAMPLE_RATE)]
    pub sample_rate: u32,

    /// Frame duration handed to the voice activity detector (10, 20, or 30 ms)
    #[arg(long = "frame-ms", default_value_t = DEFAULT_FRAME_MS)]
    pub frame_ms: u64,

    /// Maximum time to wait for one spoken command (milliseconds)
    #[arg(long = "command-timeout-ms", default_value_t = DEFAULT_COMMAND_TIMEOUT_MS)]
    pub command_timeout_ms: u64,

    /// Voiced frames required before trailing silence can end a segment
    #[arg(long = "min-voiced-frames", default_value_t = DEFAULT_MIN_VOICED_FRAMES)]
    pub min_voiced_frames: usize,

    /// Consecutive silent frames that end a segment once speech was heard
    #[arg(long = "silence-run-frames", default_value_t = DEFAULT_SILENCE_RUN_FRAMES)]
    pub silence_run_frames: usize,

    /// Frame queue capacity between the capture callback and the segmenter
    #[arg(long = "channel-capacity", default_value_t = DEFAULT_CHANNEL_CAPACITY)]
    pub channel_capacity: usize,

    /// Voice activity detector implementation to use
    #[arg(long = "vad-engine", value_enum, default_value_t = default_vad_engine())]
    pub vad_engine: VadEngineKind,

    /// Voice activity detection threshold (decibels)
    #[arg(long = "vad-threshold-db", default_value_t = DEFAULT_VAD_THRESHOLD_DB)]
    pub vad_threshold_db: f32,

    /// Whisper model name used for model auto-discovery
    #[arg(long = "whisper-model", default_value = DEFAULT_WHISPER_MODEL)]
    pub whisper_model: String,

    /// Whisper GGML model path (auto-discovered under models/ when omitted)
    #[arg(long = "whisper-model-path")]
    pub whisper_model_path: Option<String>,

    /// Whisper beam size (>1 enables beam search)
    #[arg(long = "whisper-beam-size", default_value_t = 0)]
    pub whisper_beam_size: u32,

    /// Whisper sampling temperature
    #[arg(long = "whisper-temperature", default_value_t = 0.0)]
    pub whisper_temperature: f32,

    /// Language passed to Whisper ("auto" for detection)
    #[arg(long, default_value = "en")]
    pub lang: String,

    /// External speech synthesizer command
    #[arg(long = "speech-cmd", env = "VOXASSIST_SPEECH_CMD", default_value_t = default_speech_cmd())]
    pub speech_cmd: String,

    /// Speaking rate passed to the synthesizer (words per minute)
    #[arg(long = "speech-rate-wpm", default_value_t = DEFAULT_SPEECH_RATE_WPM)]
    pub speech_rate_wpm: u32,

    /// Print replies without invoking the synthesizer
    #[arg(long, default_value_t = false)]
    pub mute: bool,
}

/// Tunable parameters for the capture + segmentation pipeline.
#[derive(Debug, Clone)]
pub struct VoicePipelineConfig {
    pub sample_rate: u32,
    pub frame_ms: u64,
    pub command_timeout_ms: u64,
    pub min_voiced_frames: usize,
    pub silence_run_frames: usize,
    pub channel_capacity: usize,
    pub vad_threshold_db: f32,
    pub vad_engine: VadEngineKind,
}

/// Available runtime-selectable VAD implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VadEngineKind {
    Earshot,
    Simple,
}

impl VadEngineKind {
    pub fn label(self) -> &'static str {
        match self {
            VadEngineKind::Earshot => "earshot",
            VadEngineKind::Simple => "simple",
        }
    }
}
