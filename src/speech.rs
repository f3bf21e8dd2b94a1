//! Spoken output via an external speech synthesizer.
//!
//! Replies are printed to stdout and handed to the synthesizer in one
//! blocking call; the main loop does not resume until playback finishes.

use crate::config::AppConfig;
use anyhow::{Context, Result};
use std::process::Command;
use tracing::warn;

/// Text-to-speech output handle. Constructed once at startup and passed by
/// reference wherever spoken output is needed.
pub struct Speaker {
    cmd: String,
    rate_wpm: u32,
    muted: bool,
}

impl Speaker {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            cmd: config.speech_cmd.clone(),
            rate_wpm: config.speech_rate_wpm,
            muted: config.mute,
        }
    }

    #[cfg(test)]
    pub(crate) fn muted_for_tests() -> Self {
        Self {
            cmd: "say".to_string(),
            rate_wpm: 170,
            muted: true,
        }
    }

    /// Print `text` and vocalize it, blocking until playback completes.
    pub fn say(&self, text: &str) -> Result<()> {
        println!("<< {text}");
        if self.muted {
            return Ok(());
        }

        let mut command = Command::new(&self.cmd);
        command.args(rate_args(&self.cmd, self.rate_wpm));
        command.arg(text);
        let status = command
            .status()
            .with_context(|| format!("failed to run speech synthesizer '{}'", self.cmd))?;
        if !status.success() {
            warn!("speech synthesizer '{}' exited with {status}", self.cmd);
        }
        Ok(())
    }

    /// Like `say`, but never fails the caller: synthesizer problems are
    /// logged and the reply still reaches stdout.
    pub fn say_or_log(&self, text: &str) {
        if let Err(err) = self.say(text) {
            warn!("speech output failed: {err:#}");
        }
    }
}

/// Map the speaking rate onto the synthesizer's CLI. `say` and `espeak`
/// disagree on the flag; unknown binaries get no rate argument.
fn rate_args(cmd: &str, rate_wpm: u32) -> Vec<String> {
    let binary = cmd.rsplit('/').next().unwrap_or(cmd);
    match binary {
        "say" => vec!["-r".to_string(), rate_wpm.to_string()],
        "espeak" | "espeak-ng" => vec!["-s".to_string(), rate_wpm.to_string()],
        _ => Vec::new(),
    }
}
