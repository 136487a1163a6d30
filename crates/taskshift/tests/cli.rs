use std::process::Command;

#[test]
fn help_exits_successfully() {
    // Arrange
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_taskshift"));
    cmd.arg("--help");

    // Act
    let output = cmd.output().expect("failed to execute taskshift");

    // Assert
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("secondary monitor"));
}

#[test]
fn version_exits_successfully() {
    // Arrange
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_taskshift"));
    cmd.arg("--version");

    // Act
    let output = cmd.output().expect("failed to execute taskshift");

    // Assert
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("taskshift"));
}

#[test]
fn debug_help_lists_subcommands() {
    // Arrange
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_taskshift"));
    cmd.args(["debug", "--help"]);

    // Act
    let output = cmd.output().expect("failed to execute taskshift");

    // Assert
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("monitors"));
    assert!(stdout.contains("probe"));
    assert!(stdout.contains("watch"));
}

#[test]
fn probe_rejects_non_numeric_delay() {
    // Arrange
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_taskshift"));
    cmd.args(["debug", "probe", "--delay", "soon"]);

    // Act
    let output = cmd.output().expect("failed to execute taskshift");

    // Assert
    assert!(!output.status.success());
}

#[test]
fn unknown_subcommand_fails() {
    // Arrange
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_taskshift"));
    cmd.arg("start");

    // Act
    let output = cmd.output().expect("failed to execute taskshift");

    // Assert
    assert!(!output.status.success());
}
