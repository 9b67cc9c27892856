use std::process::{Command, Output};

fn run(args: &[&str]) -> Output {
    Command::new("cargo")
        .args(["run", "--quiet", "--"])
        .args(args)
        .output()
        .expect("Failed to execute command")
}

fn tile_lines(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .filter(|line| {
            line.split_once(',').is_some_and(|(a, b)| {
                a.parse::<u32>().is_ok() && b.parse::<u32>().is_ok()
            })
        })
        .map(str::to_string)
        .collect()
}

#[test]
fn test_help_flag() {
    let output = run(&["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("tile-fill"));
    assert!(stdout.contains("--tile-size"));
    assert!(stdout.contains("--move"));
}

#[test]
fn test_invalid_move() {
    let output = run(&["--move", "oops"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid move format"));
}

#[test]
fn test_vertex_out_of_range() {
    let output = run(&["--sides", "3", "--move", "5:10,10"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("out of range"));
}

#[test]
fn test_default_shape_prints_grid() {
    let output = run(&[
        "--width",
        "100",
        "--height",
        "60",
        "--tile-size",
        "20",
        "--sides",
        "4",
        "--move",
        "0:0,0",
        "--move",
        "1:0,60",
        "--move",
        "2:100,60",
        "--move",
        "3:100,0",
    ]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    // the viewport-sized rectangle covers every tile center
    assert!(stdout.contains("#####\n#####\n#####\n"));
}

#[test]
fn test_state_dir_round_trip() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let state_dir = temp_dir.path().to_str().unwrap();

    let output = run(&[
        "--state-dir",
        state_dir,
        "--sides",
        "4",
        "--move",
        "0:100,100",
        "--move",
        "1:200,100",
        "--move",
        "2:200,200",
        "--move",
        "3:100,200",
    ]);
    if !output.status.success() {
        eprintln!("stderr: {}", String::from_utf8_lossy(&output.stderr));
    }
    assert!(output.status.success());

    let state_file = temp_dir.path().join("tile-fill.shape.json");
    assert!(state_file.exists());

    // a second run restores the square without any moves
    let output = run(&["--state-dir", state_dir, "--list"]);
    assert!(output.status.success());
    let tiles = tile_lines(&String::from_utf8_lossy(&output.stdout));
    assert_eq!(tiles.len(), 25);
    assert!(tiles.contains(&"5,5".to_string()));
    assert!(tiles.contains(&"9,9".to_string()));
    assert!(!tiles.contains(&"10,10".to_string()));
}

#[test]
fn test_png_output() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let png = temp_dir.path().join("grid.png");

    let output = run(&[
        "--quiet",
        "--pixels-per-tile",
        "4",
        "--png",
        png.to_str().unwrap(),
    ]);
    if !output.status.success() {
        eprintln!("stderr: {}", String::from_utf8_lossy(&output.stderr));
    }
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), png.to_str().unwrap());
    assert!(std::fs::metadata(&png).unwrap().len() > 0);
}
