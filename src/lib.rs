pub mod audio;
pub mod commands;
pub mod config;
pub mod speech;
pub mod stt;
pub mod telemetry;
#[cfg(feature = "vad_earshot")]
pub mod vad_earshot;
pub mod voice;

pub use commands::{Action, Dispatcher, Reply};
pub use voice::{create_vad_engine, listen_for_command, Utterance};
