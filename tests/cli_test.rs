use std::fs;
use std::path::PathBuf;

use assert_cmd::prelude::*;
use std::process::Command;

fn write_image(name: &str, bytes: &[u8]) -> PathBuf {
    let path = std::env::temp_dir().join(format!("step6502-cli-{}-{}.bin", name, std::process::id()));
    fs::write(&path, bytes).unwrap();
    path
}

#[test]
fn runs_program_from_start_address() {
    // LDA #$2A / TAX / INX
    let image = write_image("start", &[0xA9, 0x2A, 0xAA, 0xE8]);

    let output = Command::cargo_bin("step6502")
        .unwrap()
        .arg("--load")
        .arg(format!("{}@0200", image.display()))
        .args(["--start", "0x0200", "--max-instructions", "3"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("PC: 0x0204"), "{stdout}");
    assert!(stdout.contains("A: 0x2A, X: 0x2B"), "{stdout}");
    assert!(stdout.contains("3 instructions executed"), "{stdout}");
    fs::remove_file(image).unwrap();
}

#[test]
fn runs_from_reset_vector() {
    let program = write_image("program", &[0xA2, 0x07]); // LDX #$07
    let vectors = write_image("vectors", &[0x00, 0x00, 0x00, 0x03, 0x00, 0x00]);

    let output = Command::cargo_bin("step6502")
        .unwrap()
        .arg("--load")
        .arg(format!("{}@0300", program.display()))
        .arg("--load")
        .arg(format!("{}@FFFA:FFFF", vectors.display()))
        .args(["-n", "1"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("PC: 0x0302"), "{stdout}");
    assert!(stdout.contains("X: 0x07"), "{stdout}");
    fs::remove_file(program).unwrap();
    fs::remove_file(vectors).unwrap();
}

#[test]
fn debug_output_reports_each_instruction() {
    let image = write_image("debug", &[0xA9, 0x01, 0xEA]);

    let output = Command::cargo_bin("step6502")
        .unwrap()
        .arg("--load")
        .arg(format!("{}@0400", image.display()))
        .args(["--start", "0400", "-n", "2", "--debug", "--show-zero-page"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Result of instruction 0xA9 (LDA, Immediate)"));
    assert!(stdout.contains("Result of instruction 0xEA (NOP, Implicit)"));
    assert!(stdout.contains("Zeropage:"));
    fs::remove_file(image).unwrap();
}

#[test]
fn fails_on_undocumented_opcode() {
    let image = write_image("bad", &[0xE8, 0x02]);

    let output = Command::cargo_bin("step6502")
        .unwrap()
        .arg("--load")
        .arg(format!("{}@0200", image.display()))
        .args(["--start", "0200"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("opcode 0x02 at 0x0201 does not exist"), "{stderr}");
    fs::remove_file(image).unwrap();
}

#[test]
fn fails_on_missing_image() {
    let mut cmd = Command::cargo_bin("step6502").unwrap();
    cmd.args(["--load", "/nonexistent/step6502.bin@0200", "--start", "0200"]);
    cmd.assert().failure();
}

#[test]
fn requires_an_image() {
    let mut cmd = Command::cargo_bin("step6502").unwrap();
    cmd.assert().failure();
}

#[test]
fn rejects_zero_instruction_limit() {
    let image = write_image("limit0", &[0xE8, 0xE8, 0xE8]);

    let mut cmd = Command::cargo_bin("step6502").unwrap();
    cmd.arg("--load")
        .arg(format!("{}@0200", image.display()))
        .args(["--start", "0200", "-n", "0"]);
    cmd.assert().failure();
    fs::remove_file(image).unwrap();
}

#[test]
fn slow_down_runs_without_debug() {
    let image = write_image("throttle", &[0xE8, 0xE8]); // INX / INX

    let output = Command::cargo_bin("step6502")
        .unwrap()
        .arg("--load")
        .arg(format!("{}@0200", image.display()))
        .args(["--start", "0200", "-n", "2", "--slow-down-ms", "1"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("X: 0x02"), "{stdout}");
    assert!(!stdout.contains("Result of instruction"), "{stdout}");
    fs::remove_file(image).unwrap();
}
