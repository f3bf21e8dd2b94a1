use std::process::Command;

fn combined_output(output: &std::process::Output) -> String {
    let mut combined = String::new();
    combined.push_str(&String::from_utf8_lossy(&output.stdout));
    combined.push_str(&String::from_utf8_lossy(&output.stderr));
    combined
}

fn voxassist_bin() -> &'static str {
    option_env!("CARGO_BIN_EXE_voxassist").expect("voxassist test binary not built")
}

#[test]
fn help_mentions_name_and_key_flags() {
    let output = Command::new(voxassist_bin())
        .arg("--help")
        .output()
        .expect("run voxassist --help");
    assert!(output.status.success());
    let combined = combined_output(&output);
    assert!(combined.contains("voxassist"));
    assert!(combined.contains("--wake-word"));
    assert!(combined.contains("--command-timeout-ms"));
}

#[test]
fn list_input_devices_prints_message() {
    let output = Command::new(voxassist_bin())
        .arg("--list-input-devices")
        .output()
        .expect("run voxassist --list-input-devices");
    assert!(output.status.success());
    let combined = combined_output(&output);
    assert!(
        combined.contains("audio input devices")
            || combined.contains("Failed to list audio input devices")
    );
}

#[test]
fn rejects_invalid_sample_rate() {
    let output = Command::new(voxassist_bin())
        .args(["--sample-rate", "44100", "--mute"])
        .output()
        .expect("run voxassist with bad sample rate");
    assert!(!output.status.success());
    let combined = combined_output(&output);
    assert!(combined.contains("--sample-rate"));
}

#[test]
fn missing_model_is_reported_before_audio_opens() {
    let output = Command::new(voxassist_bin())
        .args(["--mute"])
        .current_dir(std::env::temp_dir())
        .output()
        .expect("run voxassist without a model");
    assert!(!output.status.success());
    let combined = combined_output(&output);
    assert!(combined.contains("whisper model"), "got: {combined}");
}
