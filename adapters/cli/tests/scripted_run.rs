use std::process::Command;

fn crawl(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_crawl"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run the crawl binary")
}

#[test]
fn scripted_run_prints_the_map_twice() {
    let output = crawl(&["--seed", "3", "--moves", "RRDL"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.matches("floor ").count(), 2);
    assert!(stdout.contains('@'));
}

#[test]
fn same_seed_prints_the_same_dungeon() {
    let first = crawl(&["--seed", "8", "--moves", "UURRDDLL"]);
    let second = crawl(&["--seed", "8", "--moves", "UURRDDLL"]);
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn bad_moves_fail_cleanly() {
    let output = crawl(&["--moves", "RQ"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown move"));
}

#[test]
fn missing_config_file_is_reported() {
    let output = crawl(&["--config", "/nonexistent/crawl.toml"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to read config file"));
}
