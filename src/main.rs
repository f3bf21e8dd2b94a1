//! voxassist: a wake-word voice command assistant.
//!
//! The loop is strictly sequential: record a voiced segment, transcribe it,
//! gate on the wake word, dispatch the command, speak the reply. It runs
//! until a shutdown phrase is recognized or the process is interrupted.

use anyhow::{anyhow, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, warn};
use voxassist::audio::{Recorder, SegmentConfig};
use voxassist::commands::{Action, Dispatcher};
use voxassist::config::AppConfig;
use voxassist::speech::Speaker;
use voxassist::stt::Transcriber;
use voxassist::telemetry;
use voxassist::voice::{self, Utterance};

static INTERRUPTED: AtomicBool = AtomicBool::new(false);

#[cfg(unix)]
extern "C" fn handle_interrupt(_signal: libc::c_int) {
    INTERRUPTED.store(true, Ordering::SeqCst);
}

fn install_interrupt_handler() {
    #[cfg(unix)]
    // SAFETY: the handler only stores to an atomic, which is async-signal-safe.
    unsafe {
        libc::signal(libc::SIGINT, handle_interrupt as libc::sighandler_t);
        libc::signal(libc::SIGTERM, handle_interrupt as libc::sighandler_t);
    }
}

fn main() -> Result<()> {
    let config = AppConfig::parse_args()?;
    telemetry::init_tracing();

    if config.list_input_devices {
        match Recorder::list_devices() {
            Ok(devices) if devices.is_empty() => println!("No audio input devices detected."),
            Ok(devices) => {
                println!("Detected audio input devices:");
                for device in devices {
                    println!("  {device}");
                }
            }
            Err(err) => println!("Failed to list audio input devices: {err:#}"),
        }
        return Ok(());
    }

    install_interrupt_handler();

    let model_path = config.whisper_model_path.clone().ok_or_else(|| {
        anyhow!(
            "no whisper model found; pass --whisper-model-path or place ggml-{}.bin under models/",
            config.whisper_model
        )
    })?;

    let speaker = Speaker::from_config(&config);

    info!("loading speech-to-text model from {model_path}");
    let transcriber = Transcriber::new(&model_path)?;
    info!("speech-to-text model loaded");

    let pipeline = config.voice_pipeline_config();
    let segment_cfg = SegmentConfig::from(&pipeline);
    let recorder = Recorder::new(config.input_device.as_deref())?;
    info!("capturing from '{}'", recorder.device_name());
    // The stream stays open for the life of the process; every capture pass
    // drains the same queue.
    let stream = recorder.open_stream(&segment_cfg, pipeline.channel_capacity)?;
    let mut vad = voice::create_vad_engine(&pipeline);
    let dispatcher = Dispatcher::new(config.wake_words.clone());

    let wake = config
        .wake_words
        .first()
        .cloned()
        .unwrap_or_else(|| "jarvis".to_string());
    speaker.say_or_log(&format!(
        "voxassist online. Say '{wake}' and then your command."
    ));

    loop {
        if INTERRUPTED.load(Ordering::SeqCst) {
            break;
        }
        speaker.say_or_log("Listening...");

        let utterance = match voice::listen_for_command(
            &stream,
            &transcriber,
            &config,
            vad.as_mut(),
            &INTERRUPTED,
        ) {
            Ok(utterance) => utterance,
            Err(err) => {
                warn!("transcription failed: {err:#}");
                speaker.say_or_log("Sorry, I could not understand.");
                continue;
            }
        };

        if INTERRUPTED.load(Ordering::SeqCst) {
            break;
        }

        let text = match utterance {
            Utterance::Transcript { text, .. } => text,
            Utterance::Empty { .. } => {
                info!("no voice detected");
                continue;
            }
        };

        println!(">> {text}");

        let Some(command) = dispatcher.normalize(&text) else {
            info!("wake word not detected, ignoring");
            continue;
        };

        let reply = dispatcher.dispatch(&command);
        speaker.say_or_log(&reply.text);
        if reply.action == Action::Shutdown {
            break;
        }
    }

    if INTERRUPTED.load(Ordering::SeqCst) {
        println!("Exiting voxassist.");
    }
    Ok(())
}
