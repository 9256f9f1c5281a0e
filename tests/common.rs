#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use dailytap::core::roster::RosterEditor;
use dailytap::db::pool::DbPool;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Nothing listens on the discard port, so deliveries fail fast.
pub const DEAD_URL: &str = "http://127.0.0.1:9/exec";
pub const SHEET: &str = "https://docs.google.com/spreadsheets/d/test";

pub fn dt() -> Command {
    cargo_bin_cmd!("dailytap")
}

/// `dailytap --db <db_path> --test`, ready for a subcommand
pub fn dt_db(db_path: &str) -> Command {
    let mut cmd = dt();
    cmd.args(["--db", db_path, "--test"]);
    cmd
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_dailytap.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// init + setup with the given events, pointing at an unreachable webhook
pub fn init_with_events(db_path: &str, events: &[&str]) {
    dt_db(db_path).arg("init").assert().success();

    let mut args = vec!["setup", "--sheet", SHEET, "--url", DEAD_URL];
    for ev in events {
        args.push("--event");
        args.push(ev);
    }
    dt_db(db_path).args(&args).assert().success();
}

/// In-memory store holding a saved roster
pub fn pool_with_roster(names: &[&str]) -> DbPool {
    let mut pool = DbPool::in_memory().expect("in-memory db");
    let mut roster = RosterEditor::new();
    for name in names {
        roster.add(name, "⭐").expect("add event");
    }
    roster.save(&mut pool).expect("save roster");
    pool
}
