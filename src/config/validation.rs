use super::defaults::{
    default_wake_words, ISO_639_1_CODES, MAX_COMMAND_TIMEOUT_MS, MIN_COMMAND_TIMEOUT_MS,
    SUPPORTED_FRAME_MS, SUPPORTED_SAMPLE_RATES,
};
use super::{AppConfig, VoicePipelineConfig};
use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use std::{
    fs,
    path::{Path, PathBuf},
};

impl AppConfig {
    /// Parse CLI arguments and validate them right away.
    pub fn parse_args() -> Result<Self> {
        let mut config = Self::parse();
        config.validate()?;
        Ok(config)
    }

    /// Check CLI values and normalize them for downstream consumers.
    pub fn validate(&mut self) -> Result<()> {
        if !SUPPORTED_SAMPLE_RATES.contains(&self.sample_rate) {
            bail!(
                "--sample-rate must be one of {SUPPORTED_SAMPLE_RATES:?} Hz, got {}",
                self.sample_rate
            );
        }
        if !SUPPORTED_FRAME_MS.contains(&self.frame_ms) {
            bail!(
                "--frame-ms must be one of {SUPPORTED_FRAME_MS:?}, got {}",
                self.frame_ms
            );
        }
        if !(MIN_COMMAND_TIMEOUT_MS..=MAX_COMMAND_TIMEOUT_MS).contains(&self.command_timeout_ms) {
            bail!(
                "--command-timeout-ms must be between {MIN_COMMAND_TIMEOUT_MS} and {MAX_COMMAND_TIMEOUT_MS}, got {}",
                self.command_timeout_ms
            );
        }
        if !(1..=100).contains(&self.min_voiced_frames) {
            bail!(
                "--min-voiced-frames must be between 1 and 100, got {}",
                self.min_voiced_frames
            );
        }
        if !(1..=200).contains(&self.silence_run_frames) {
            bail!(
                "--silence-run-frames must be between 1 and 200, got {}",
                self.silence_run_frames
            );
        }
        if !(8..=1024).contains(&self.channel_capacity) {
            bail!(
                "--channel-capacity must be between 8 and 1024, got {}",
                self.channel_capacity
            );
        }
        if !(-120.0..=0.0).contains(&self.vad_threshold_db) {
            bail!(
                "--vad-threshold-db must be between -120.0 and 0.0 dB, got {}",
                self.vad_threshold_db
            );
        }
        if !(80..=400).contains(&self.speech_rate_wpm) {
            bail!(
                "--speech-rate-wpm must be between 80 and 400, got {}",
                self.speech_rate_wpm
            );
        }

        #[cfg(not(feature = "vad_earshot"))]
        if matches!(self.vad_engine, super::VadEngineKind::Earshot) {
            bail!("--vad-engine earshot requires building with the 'vad_earshot' feature");
        }

        // Wake words are matched against lowercased transcripts.
        if self.wake_words.is_empty() {
            self.wake_words = default_wake_words();
        }
        for word in &mut self.wake_words {
            let normalized = word.trim().to_lowercase();
            if normalized.is_empty() {
                bail!("--wake-word must not be empty");
            }
            if !normalized.chars().all(|ch| ch.is_alphanumeric() || ch == ' ') {
                bail!("--wake-word '{word}' must contain only alphanumeric characters or spaces");
            }
            *word = normalized;
        }

        self.speech_cmd = sanitize_binary(
            &self.speech_cmd,
            "--speech-cmd",
            &["say", "espeak", "espeak-ng"],
        )?;

        if self.whisper_model_path.is_none() {
            if let Some(auto_model) = discover_default_whisper_model(&self.whisper_model) {
                self.whisper_model_path = Some(auto_model.to_string_lossy().to_string());
            }
        }

        // If a model path was supplied (explicitly or via auto-detect), make sure it exists.
        if let Some(model) = &self.whisper_model_path {
            let model_path = Path::new(model);
            if !model_path.exists() {
                bail!(
                    "whisper model path '{}' does not exist",
                    model_path.display()
                );
            }
        }

        if let Some(model) = &mut self.whisper_model_path {
            // Store a canonical absolute path so later chdirs cannot break it.
            let canonical = Path::new(model)
                .canonicalize()
                .with_context(|| format!("failed to canonicalize whisper model path '{model}'"))?;
            *model = canonical
                .to_str()
                .map(|s| s.to_string())
                .ok_or_else(|| anyhow!("whisper model path must be valid UTF-8"))?;
        }

        if self.lang.trim().is_empty() {
            bail!("--lang must not be empty");
        }
        if !self.lang.eq_ignore_ascii_case("auto") {
            if !self
                .lang
                .chars()
                .all(|ch| ch.is_ascii_alphabetic() || ch == '-' || ch == '_')
            {
                bail!("--lang must contain only alphabetic characters or '-'/'_' separators");
            }
            // Allow locale-style values but only check the leading ISO-639-1 code.
            let lang_primary = self
                .lang
                .split(['-', '_'])
                .next()
                .unwrap_or("")
                .to_ascii_lowercase();
            if !ISO_639_1_CODES.contains(&lang_primary.as_str()) {
                bail!(
                    "--lang must start with a valid ISO-639-1 code or be 'auto', got '{}'",
                    self.lang
                );
            }
        }

        if self.whisper_beam_size > 10 {
            bail!(
                "--whisper-beam-size must be between 0 and 10, got {}",
                self.whisper_beam_size
            );
        }
        if !(0.0..=5.0).contains(&self.whisper_temperature) {
            bail!(
                "--whisper-temperature must be between 0.0 and 5.0, got {}",
                self.whisper_temperature
            );
        }

        Ok(())
    }

    /// Snapshot the CLI-controlled capture settings for the audio layer.
    pub fn voice_pipeline_config(&self) -> VoicePipelineConfig {
        VoicePipelineConfig {
            sample_rate: self.sample_rate,
            frame_ms: self.frame_ms,
            command_timeout_ms: self.command_timeout_ms,
            min_voiced_frames: self.min_voiced_frames,
            silence_run_frames: self.silence_run_frames,
            channel_capacity: self.channel_capacity,
            vad_threshold_db: self.vad_threshold_db,
            vad_engine: self.vad_engine,
        }
    }
}

/// Try to locate a ggml model in the working directory's `models/` folder so
/// the assistant works out-of-the-box when users haven't provided
/// --whisper-model-path.
pub(super) fn discover_default_whisper_model(whisper_model: &str) -> Option<PathBuf> {
    let models_dir = Path::new("models");
    if !models_dir.exists() {
        return None;
    }

    let mut candidates = Vec::new();
    candidates.push(models_dir.join(format!("ggml-{whisper_model}.en.bin")));
    candidates.push(models_dir.join(format!("ggml-{whisper_model}.bin")));
    candidates.push(models_dir.join("ggml-base.en.bin"));
    candidates.push(models_dir.join("ggml-base.bin"));

    for candidate in candidates {
        if candidate.exists() {
            if let Ok(canonical) = candidate.canonicalize() {
                return Some(canonical);
            }
        }
    }

    None
}

/// Allow either a known synthesizer name or an explicit binary path.
pub(super) fn sanitize_binary(value: &str, flag: &str, allowlist: &[&str]) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        bail!("{flag} cannot be empty");
    }
    if let Some(allowed) = allowlist
        .iter()
        .find(|candidate| candidate.eq_ignore_ascii_case(trimmed))
    {
        return Ok((*allowed).to_string());
    }

    let path = Path::new(trimmed);
    if path.is_absolute() || trimmed.contains(std::path::MAIN_SEPARATOR) {
        let canonical = path
            .canonicalize()
            .with_context(|| format!("failed to canonicalize {flag} '{trimmed}'"))?;
        let metadata = fs::metadata(&canonical)
            .with_context(|| format!("failed to inspect {flag} '{}'", canonical.display()))?;
        if !metadata.is_file() {
            bail!("{flag} '{}' is not a file", canonical.display());
        }
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = metadata.permissions().mode();
            if mode & 0o111 == 0 {
                bail!(
                    "{flag} '{}' exists but is not executable (mode {:o})",
                    canonical.display(),
                    mode
                );
            }
        }
        return canonical
            .to_str()
            .map(|s| s.to_string())
            .ok_or_else(|| anyhow!("{flag} must be valid UTF-8"));
    }

    bail!("{flag} must be one of {allowlist:?} or an existing binary path");
}
