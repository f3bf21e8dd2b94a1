//! Default values for the CLI surface.
//!
//! The voice defaults reproduce the assistant's fixed operating point: 16 kHz
//! mono capture, 30 ms frames, and the 5/10 frame thresholds used by the
//! segmenter.

use super::VadEngineKind;

pub const DEFAULT_SAMPLE_RATE: u32 = 16_000;
pub const DEFAULT_FRAME_MS: u64 = 30;
pub const DEFAULT_COMMAND_TIMEOUT_MS: u64 = 10_000;

/// A segment may end on trailing silence only after the voiced-frame count
/// exceeds this.
pub const DEFAULT_MIN_VOICED_FRAMES: usize = 5;

/// Consecutive silent frames that must be exceeded to end a segment.
pub const DEFAULT_SILENCE_RUN_FRAMES: usize = 10;

pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;
pub const DEFAULT_VAD_THRESHOLD_DB: f32 = -55.0;

pub const DEFAULT_WHISPER_MODEL: &str = "small";
pub const DEFAULT_SPEECH_RATE_WPM: u32 = 170;

pub const MAX_COMMAND_TIMEOUT_MS: u64 = 60_000;
pub const MIN_COMMAND_TIMEOUT_MS: u64 = 1_000;

/// Sample rates the frame classifier accepts.
pub const SUPPORTED_SAMPLE_RATES: [u32; 4] = [8_000, 16_000, 32_000, 48_000];

/// Frame durations the frame classifier accepts.
pub const SUPPORTED_FRAME_MS: [u64; 3] = [10, 20, 30];

pub fn default_wake_words() -> Vec<String> {
    vec!["jarvis".to_string(), "jervis".to_string()]
}

pub fn default_vad_engine() -> VadEngineKind {
    #[cfg(feature = "vad_earshot")]
    {
        VadEngineKind::Earshot
    }
    #[cfg(not(feature = "vad_earshot"))]
    {
        VadEngineKind::Simple
    }
}

pub fn default_speech_cmd() -> String {
    #[cfg(target_os = "macos")]
    {
        "say".to_string()
    }
    #[cfg(not(target_os = "macos"))]
    {
        "espeak".to_string()
    }
}

/// Common two-letter language codes accepted by the `--lang` flag. Whisper
/// understands more; this keeps obvious typos from reaching the model.
pub const ISO_639_1_CODES: &[&str] = &[
    "aa", "ab", "af", "am", "ar", "as", "az", "ba", "be", "bg", "bn", "bo", "br", "bs", "ca", "cs",
    "cy", "da", "de", "el", "en", "eo", "es", "et", "eu", "fa", "fi", "fo", "fr", "ga", "gl", "gu",
    "ha", "he", "hi", "hr", "ht", "hu", "hy", "id", "is", "it", "ja", "jv", "ka", "kk", "km", "kn",
    "ko", "ku", "ky", "la", "lb", "lo", "lt", "lv", "mg", "mi", "mk", "ml", "mn", "mr", "ms", "mt",
    "my", "ne", "nl", "no", "oc", "pa", "pl", "ps", "pt", "ro", "ru", "sa", "sd", "si", "sk", "sl",
    "sn", "so", "sq", "sr", "su", "sv", "sw", "ta", "te", "tg", "th", "tk", "tl", "tr", "tt", "uk",
    "ur", "uz", "vi", "yi", "yo", "zh",
];
