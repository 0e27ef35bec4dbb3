//! Scenario test runner CLI
//!
//! Usage:
//!   cargo run --bin test-scenarios                       # every scenario
//!   cargo run --bin test-scenarios -- sling/             # one category
//!   cargo run --bin test-scenarios -- world/reset        # one file
//!   cargo run --bin test-scenarios -- --verbose          # expected/actual on failure

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::{env, fs};

use slingshot::testing::{SCENARIOS_DIR, TestResult, parse_test_file, run_test};

#[derive(Default)]
struct Tally {
    passed: usize,
    failed: Vec<String>,
    errored: Vec<String>,
}

fn main() -> ExitCode {
    let mut verbose = false;
    let mut filter = None;
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--verbose" | "-v" => verbose = true,
            other if !other.starts_with('-') => filter = Some(arg),
            other => eprintln!("ignoring unknown flag {}", other),
        }
    }

    let root = Path::new(SCENARIOS_DIR);
    let mut files = Vec::new();
    collect_scenarios(root, &mut files);
    files.retain(|path| {
        let rel = path.strip_prefix(root).unwrap_or(path).to_string_lossy();
        filter.as_deref().is_none_or(|f| rel.contains(f))
    });
    files.sort();

    if files.is_empty() {
        println!("No scenarios under {}", SCENARIOS_DIR);
        if let Some(f) = filter {
            println!("Filter: {}", f);
        }
        return ExitCode::FAILURE;
    }

    println!("Sling scenarios ({})", files.len());
    println!("================\n");

    let mut tally = Tally::default();
    let mut category = None;

    for path in &files {
        let rel = path.strip_prefix(root).unwrap_or(path);
        let dir = rel.parent().map(|p| p.display().to_string());
        if dir != category {
            if let Some(dir) = dir.as_deref().filter(|d| !d.is_empty()) {
                println!("{}/", dir);
            }
            category = dir;
        }
        let label = rel.with_extension("").display().to_string();
        let name = rel
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let result = match parse_test_file(path) {
            Ok(def) => run_test(&def),
            Err(e) => TestResult::Error {
                message: e.to_string(),
            },
        };
        report(&name, &result, verbose);

        match result {
            TestResult::Pass { .. } => tally.passed += 1,
            TestResult::Fail { .. } => tally.failed.push(label),
            TestResult::Error { .. } => tally.errored.push(label),
        }
    }

    println!("\n================");
    println!(
        "{} passed, {} failed, {} errors",
        tally.passed,
        tally.failed.len(),
        tally.errored.len()
    );
    for label in tally.failed.iter().chain(&tally.errored) {
        println!("  rerun: cargo run --bin test-scenarios -- {} -v", label);
    }

    if tally.failed.is_empty() && tally.errored.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn collect_scenarios(dir: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for path in entries.flatten().map(|e| e.path()) {
        if path.is_dir() {
            collect_scenarios(&path, out);
        } else if path.extension().is_some_and(|e| e == "toml") {
            out.push(path);
        }
    }
}

fn report(name: &str, result: &TestResult, verbose: bool) {
    let width = 36;
    match result {
        TestResult::Pass { frames } => {
            println!("  {:.<width$} ok ({} frames)", name, frames);
        }
        TestResult::Fail { error } => {
            println!("  {:.<width$} FAIL", name);
            if verbose {
                println!("    {}", error);
            } else {
                println!("    {}", error.message);
            }
        }
        TestResult::Error { message } => {
            println!("  {:.<width$} ERROR", name);
            println!("    {}", message);
        }
    }
}
