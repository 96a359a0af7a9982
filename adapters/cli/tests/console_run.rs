use std::{fs, process::Command};

fn dodge() -> Command {
    Command::new(env!("CARGO_BIN_EXE_dodge"))
}

#[test]
fn scripted_game_prints_the_board() {
    let output = dodge()
        .args([
            "--rows", "16", "--cols", "24", "--enemies", "3", "--obstacles", "2", "--seed", "4",
            "--ticks", "20", "--moves", "wwaadd",
        ])
        .output()
        .expect("failed to run dodge");

    assert!(output.status.success(), "dodge exited with {}", output.status);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let grid: Vec<&str> = stdout.lines().take(16).collect();
    assert_eq!(grid.len(), 16);
    assert!(grid.iter().all(|line| line.chars().count() == 24));
    assert!(stdout.contains("player life"));
}

#[test]
fn saved_game_can_be_resumed() {
    let path = std::env::temp_dir().join(format!("dodge-save-{}.txt", std::process::id()));

    let status = dodge()
        .args(["--rows", "16", "--cols", "24", "--enemies", "2", "--obstacles", "1"])
        .args(["--ticks", "10", "--save"])
        .arg(&path)
        .status()
        .expect("failed to run dodge");
    assert!(status.success());

    let saved = fs::read_to_string(&path).expect("saved game");
    assert!(saved.starts_with("dodge:v1:16x24:"));

    let output = dodge()
        .args(["--ticks", "0", "--load"])
        .arg(&path)
        .output()
        .expect("failed to run dodge");
    let _ = fs::remove_file(&path);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().take_while(|line| !line.starts_with("time")).count(), 16);
}

#[test]
fn unreadable_save_is_reported() {
    let output = dodge()
        .args(["--load", "/nonexistent/dodge-save.txt"])
        .output()
        .expect("failed to run dodge");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read saved game"));
}
