//! System microphone capture via CPAL.
//!
//! Handles device enumeration and format conversion. The input stream is
//! opened once at startup and kept alive for the life of the process; every
//! capture pass drains the same bounded frame queue.

use super::capture::{collect_segment, CaptureResult, SegmentConfig, StopReason};
use super::dispatch::FrameSlicer;
use super::vad::VadEngine;
use anyhow::{anyhow, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, StreamConfig};
use crossbeam_channel::{bounded, Receiver};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

/// Audio input device wrapper.
pub struct Recorder {
    device: cpal::Device,
}

impl Recorder {
    /// List microphone names so the CLI can expose a human-friendly selector.
    pub fn list_devices() -> Result<Vec<String>> {
        let host = cpal::default_host();
        let devices = host.input_devices().context("no input devices available")?;
        let mut names = Vec::new();
        for device in devices {
            if let Ok(name) = device.name() {
                names.push(name);
            }
        }
        Ok(names)
    }

    /// Create a recorder, optionally forcing a specific device so users can
    /// pick the right microphone when a machine exposes multiple inputs.
    pub fn new(preferred_device: Option<&str>) -> Result<Self> {
        let host = cpal::default_host();
        let device = match preferred_device {
            Some(name) => {
                let mut devices = host.input_devices().context("no input devices available")?;
                devices
                    .find(|d| d.name().map(|n| n == name).unwrap_or(false))
                    .ok_or_else(|| anyhow!("input device '{name}' not found"))?
            }
            None => host
                .default_input_device()
                .context("no default input device available")?,
        };
        Ok(Self { device })
    }

    /// Get the name of the active recording device.
    pub fn device_name(&self) -> String {
        self.device
            .name()
            .unwrap_or_else(|_| "Unknown Device".to_string())
    }

    /// Open the input stream once and start delivering fixed-size frames into
    /// a bounded queue. The returned handle owns the stream; dropping it
    /// closes the device.
    pub fn open_stream(&self, cfg: &SegmentConfig, channel_capacity: usize) -> Result<CaptureStream> {
        let default_config = self.device.default_input_config()?;
        let format = default_config.sample_format();
        let device_config: StreamConfig = default_config.into();
        let device_rate = device_config.sample_rate.0;
        let channels = usize::from(device_config.channels.max(1));
        let device_frame_samples = ((u64::from(device_rate) * cfg.frame_ms) / 1000).max(1) as usize;
        let device_name = self.device_name();

        info!(
            "capture config: device='{device_name}' format={format:?} rate={device_rate}Hz channels={channels}"
        );

        let (sender, receiver) = bounded::<Vec<f32>>(channel_capacity.max(1));
        let dropped = Arc::new(AtomicUsize::new(0));
        let slicer = Arc::new(Mutex::new(FrameSlicer::new(
            device_frame_samples,
            sender,
            dropped.clone(),
        )));

        // Driver status flags surface here; they are logged and never fatal.
        let err_fn = |err| warn!("audio stream error: {err}");

        let stream = match format {
            SampleFormat::F32 => {
                let slicer = slicer.clone();
                let dropped = dropped.clone();
                self.device.build_input_stream(
                    &device_config,
                    move |data: &[f32], _| {
                        if let Ok(mut slicer) = slicer.try_lock() {
                            slicer.ingest(data, channels, |sample| sample);
                        } else {
                            dropped.fetch_add(1, Ordering::Relaxed);
                        }
                    },
                    err_fn,
                    None,
                )?
            }
            SampleFormat::I16 => {
                let slicer = slicer.clone();
                let dropped = dropped.clone();
                self.device.build_input_stream(
                    &device_config,
                    move |data: &[i16], _| {
                        if let Ok(mut slicer) = slicer.try_lock() {
                            slicer.ingest(data, channels, |sample| sample as f32 / 32_768.0);
                        } else {
                            dropped.fetch_add(1, Ordering::Relaxed);
                        }
                    },
                    err_fn,
                    None,
                )?
            }
            SampleFormat::U16 => {
                let slicer = slicer.clone();
                let dropped = dropped.clone();
                self.device.build_input_stream(
                    &device_config,
                    move |data: &[u16], _| {
                        if let Ok(mut slicer) = slicer.try_lock() {
                            slicer.ingest(data, channels, |sample| {
                                (sample as f32 - 32_768.0) / 32_768.0
                            });
                        } else {
                            dropped.fetch_add(1, Ordering::Relaxed);
                        }
                    },
                    err_fn,
                    None,
                )?
            }
            other => return Err(anyhow!("unsupported sample format: {other:?}")),
        };

        stream.play()?;

        Ok(CaptureStream {
            _stream: stream,
            frames: receiver,
            overflow_dropped: dropped,
            device_rate,
            device_name,
        })
    }
}

/// Long-lived capture pipeline: the CPAL stream plus the frame queue the
/// segmenter drains.
pub struct CaptureStream {
    _stream: cpal::Stream,
    frames: Receiver<Vec<f32>>,
    overflow_dropped: Arc<AtomicUsize>,
    device_rate: u32,
    device_name: String,
}

impl CaptureStream {
    pub fn device_rate(&self) -> u32 {
        self.device_rate
    }

    /// Run one voice-activity segmentation pass against the live queue.
    pub fn record_voice_command(
        &self,
        cfg: &SegmentConfig,
        vad: &mut dyn VadEngine,
        interrupt: Option<&AtomicBool>,
    ) -> CaptureResult {
        let mut result = collect_segment(&self.frames, self.device_rate, cfg, vad, interrupt);
        result.metrics.frames_dropped = self.overflow_dropped.swap(0, Ordering::Relaxed);

        if result.metrics.frames_kept == 0
            && matches!(result.metrics.stop_reason, StopReason::QueueStarved)
        {
            warn!(
                "no frames arrived from '{}'; check microphone permissions and availability. {}",
                self.device_name,
                mic_permission_hint()
            );
        }

        result
    }
}

fn mic_permission_hint() -> &'static str {
    #[cfg(target_os = "macos")]
    {
        "macOS: System Settings > Privacy & Security > Microphone (enable your terminal)."
    }
    #[cfg(target_os = "linux")]
    {
        "Linux: check PipeWire/PulseAudio permissions and ensure the device is not muted."
    }
    #[cfg(target_os = "windows")]
    {
        "Windows: Settings > Privacy & Security > Microphone (allow access for your terminal)."
    }
    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    {
        "Check OS microphone permissions."
    }
}
