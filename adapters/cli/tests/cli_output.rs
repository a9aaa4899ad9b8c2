use std::{fs, process::Command};

fn manifold_net(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_manifold-net"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to launch manifold-net")
}

#[test]
fn default_run_prints_six_piece_net() {
    let output = manifold_net(&[]);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).expect("utf-8 output");
    assert!(stdout.starts_with("seed 1234 (effective 1234, 0 reseeds)\n"));
    assert!(stdout.contains("hinges rooted at (-1, 2)\n"));
    assert!(stdout.contains("  F #6 U5 #8b5cf6 (5 cells)\n"));
}

#[test]
fn json_output_is_a_single_document() {
    let output = manifold_net(&["--seed", "1234", "--pieces", "2", "--format", "json"]);
    assert!(output.status.success());

    let document: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is one json document");
    assert_eq!(document["inventory"][1]["name"], "T4");
}

#[test]
fn config_file_supplies_defaults() {
    let path = std::env::temp_dir().join(format!("manifold-net-{}.toml", std::process::id()));
    fs::write(
        &path,
        "version = 1\n\n[generation]\nseed = 42\npieces = 10\n\n[fold]\nfactor = 0.5\n",
    )
    .expect("config written");

    let output = manifold_net(&["--config", path.to_str().expect("utf-8 path")]);
    let _ = fs::remove_file(&path);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).expect("utf-8 output");
    assert!(stdout.starts_with("seed 42 "));
    assert!(stdout.contains("hinges rooted at (-1, 0)\n"));
    assert!(stdout.contains("fold In: 50%\n"));
}

#[test]
fn exhausted_generation_fails_with_message() {
    let output = manifold_net(&[
        "--seed",
        "0",
        "--placement-trials",
        "1",
        "--max-reseeds",
        "4",
    ]);

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).expect("utf-8 output");
    assert!(stderr.contains("failed to generate a net"), "{stderr}");
}
