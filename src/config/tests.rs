use super::validation::sanitize_binary;
use super::{AppConfig, VadEngineKind};
use clap::Parser;

fn parse(args: &[&str]) -> AppConfig {
    let mut full = vec!["test-app"];
    full.extend_from_slice(args);
    AppConfig::parse_from(full)
}

#[test]
fn accepts_valid_defaults() {
    let mut cfg = parse(&[]);
    assert!(cfg.validate().is_ok());
}

#[test]
fn rejects_unsupported_sample_rate() {
    let mut cfg = parse(&["--sample-rate", "44100"]);
    assert!(cfg.validate().is_err());
}

#[test]
fn accepts_all_classifier_sample_rates() {
    for rate in ["8000", "16000", "32000", "48000"] {
        let mut cfg = parse(&["--sample-rate", rate]);
        assert!(cfg.validate().is_ok(), "rate {rate} should validate");
    }
}

#[test]
fn rejects_unsupported_frame_duration() {
    let mut cfg = parse(&["--frame-ms", "25"]);
    assert!(cfg.validate().is_err());
}

#[test]
fn rejects_command_timeout_out_of_bounds() {
    let mut cfg = parse(&["--command-timeout-ms", "500"]);
    assert!(cfg.validate().is_err());
    let mut cfg = parse(&["--command-timeout-ms", "60001"]);
    assert!(cfg.validate().is_err());
}

#[test]
fn rejects_zero_segmentation_thresholds() {
    let mut cfg = parse(&["--min-voiced-frames", "0"]);
    assert!(cfg.validate().is_err());
    let mut cfg = parse(&["--silence-run-frames", "0"]);
    assert!(cfg.validate().is_err());
}

#[test]
fn rejects_channel_capacity_out_of_bounds() {
    let mut cfg = parse(&["--channel-capacity", "4"]);
    assert!(cfg.validate().is_err());
    let mut cfg = parse(&["--channel-capacity", "2048"]);
    assert!(cfg.validate().is_err());
}

#[test]
fn rejects_vad_threshold_out_of_bounds() {
    let mut cfg = parse(&["--vad-threshold-db", "1.0"]);
    assert!(cfg.validate().is_err());
    let mut cfg = parse(&["--vad-threshold-db=-121.0"]);
    assert!(cfg.validate().is_err());
}

#[test]
fn rejects_speech_rate_out_of_bounds() {
    let mut cfg = parse(&["--speech-rate-wpm", "10"]);
    assert!(cfg.validate().is_err());
    let mut cfg = parse(&["--speech-rate-wpm", "500"]);
    assert!(cfg.validate().is_err());
}

#[test]
fn fills_default_wake_words_when_none_given() {
    let mut cfg = parse(&[]);
    cfg.validate().expect("defaults should be valid");
    assert_eq!(cfg.wake_words, vec!["jarvis", "jervis"]);
}

#[test]
fn lowercases_supplied_wake_words() {
    let mut cfg = parse(&["--wake-word", "Jarvis", "--wake-word", "Computer"]);
    cfg.validate().expect("wake words should be valid");
    assert_eq!(cfg.wake_words, vec!["jarvis", "computer"]);
}

#[test]
fn rejects_blank_wake_word() {
    let mut cfg = parse(&["--wake-word", "   "]);
    assert!(cfg.validate().is_err());
}

#[test]
fn rejects_wake_word_with_shell_metacharacters() {
    let mut cfg = parse(&["--wake-word", "jarvis;rm"]);
    assert!(cfg.validate().is_err());
}

#[test]
fn rejects_invalid_language_code() {
    let mut cfg = parse(&["--lang", "en$"]);
    assert!(cfg.validate().is_err());
}

#[test]
fn rejects_language_with_unknown_primary_code() {
    let mut cfg = parse(&["--lang", "zz-ZZ"]);
    assert!(cfg.validate().is_err());
}

#[test]
fn accepts_language_with_region_suffixes() {
    let mut cfg = parse(&["--lang", "en-US"]);
    assert!(cfg.validate().is_ok());
    let mut cfg = parse(&["--lang", "pt_BR"]);
    assert!(cfg.validate().is_ok());
}

#[test]
fn accepts_auto_language() {
    let mut cfg = parse(&["--lang", "auto"]);
    assert!(cfg.validate().is_ok());
}

#[test]
fn rejects_whisper_beam_size_out_of_bounds() {
    let mut cfg = parse(&["--whisper-beam-size", "11"]);
    assert!(cfg.validate().is_err());
}

#[test]
fn rejects_whisper_temperature_out_of_bounds() {
    let mut cfg = parse(&["--whisper-temperature=-1.0"]);
    assert!(cfg.validate().is_err());
    let mut cfg = parse(&["--whisper-temperature", "6.0"]);
    assert!(cfg.validate().is_err());
}

#[test]
fn rejects_missing_model_path() {
    let mut cfg = parse(&["--whisper-model-path", "/no/such/model.bin"]);
    assert!(cfg.validate().is_err());
}

#[test]
fn rejects_unknown_speech_cmd_name() {
    let mut cfg = parse(&["--speech-cmd", "not-a-synth"]);
    assert!(cfg.validate().is_err());
}

#[test]
fn sanitize_binary_accepts_allowlisted_names() {
    assert_eq!(
        sanitize_binary("espeak", "--speech-cmd", &["say", "espeak"]).unwrap(),
        "espeak"
    );
    assert_eq!(
        sanitize_binary("SAY", "--speech-cmd", &["say", "espeak"]).unwrap(),
        "say"
    );
}

#[test]
fn sanitize_binary_rejects_empty() {
    assert!(sanitize_binary("  ", "--speech-cmd", &["say"]).is_err());
}

#[test]
fn vad_engine_labels_are_stable() {
    assert_eq!(VadEngineKind::Earshot.label(), "earshot");
    assert_eq!(VadEngineKind::Simple.label(), "simple");
}

#[test]
fn pipeline_config_round_trips_flags() {
    let mut cfg = parse(&[
        "--sample-rate",
        "32000",
        "--frame-ms",
        "20",
        "--vad-engine",
        "simple",
    ]);
    cfg.validate().expect("flags should be valid");
    let pipeline = cfg.voice_pipeline_config();
    assert_eq!(pipeline.sample_rate, 32_000);
    assert_eq!(pipeline.frame_ms, 20);
    assert!(matches!(pipeline.vad_engine, VadEngineKind::Simple));
}

#[cfg(not(feature = "vad_earshot"))]
#[test]
fn rejects_earshot_engine_without_feature() {
    let mut cfg = parse(&["--vad-engine", "earshot"]);
    assert!(cfg.validate().is_err());
}
