//! Question bank validation utility.
//!
//! Checks a JSON question bank against the same rules the engine enforces at
//! construction and prints a per-question summary.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin validate_bank -- <bank.json> [--json]
//! ```
//!
//! Exits with status 1 if the bank is invalid, 2 on usage errors.

use std::path::PathBuf;

use lantern::adapters::bank::load_bank;
use lantern::domain::QuestionBank;

fn usage() -> ! {
    eprintln!("Usage: validate_bank <bank.json> [--json]");
    std::process::exit(2);
}

fn print_summary(bank: &QuestionBank) {
    println!("{} questions", bank.len());
    for q in bank.questions() {
        println!(
            "  #{:<3} {:<6} {} light(s)  {}",
            q.id,
            q.difficulty.to_string(),
            q.stimuli.len(),
            q.correct_sequence
        );
    }

    let palette: Vec<String> = bank.answer_palette().iter().map(ToString::to_string).collect();
    println!("Palette: {}", palette.join(", "));
}

fn main() {
    let mut path: Option<PathBuf> = None;
    let mut json = false;

    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--json" => json = true,
            "-h" | "--help" => usage(),
            other if other.starts_with('-') => {
                eprintln!("Unknown flag: {other}");
                usage();
            }
            other => {
                if path.replace(PathBuf::from(other)).is_some() {
                    usage();
                }
            }
        }
    }

    let Some(path) = path else { usage() };

    match load_bank(&path) {
        Ok(bank) => {
            if json {
                match serde_json::to_string_pretty(bank.questions()) {
                    Ok(out) => println!("{out}"),
                    Err(e) => {
                        eprintln!("Failed to serialize bank: {e}");
                        std::process::exit(1);
                    }
                }
            } else {
                print_summary(&bank);
            }
        }
        Err(e) => {
            eprintln!("{}: {e}", path.display());
            std::process::exit(1);
        }
    }
}
