// Copyright 2024-2026 Wordshield Contributors
// SPDX-License-Identifier: Apache-2.0

//! Words CLI subcommands: list, count, export.
//!
//! The configured words file is read-only; `export` writes a normalized
//! snapshot (trimmed, deduplicated, sorted) to another path.

use std::path::Path;

use super::{load_service, EXIT_IO, EXIT_OK, EXIT_USAGE};
use crate::config;
use crate::vocabulary::{export_flat_file, Word};

/// Run a `words` subcommand with the arguments following it.
pub async fn run(subcommand: &str, args: &[String]) -> i32 {
    let env = match config::load() {
        Ok(env) => env,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return EXIT_USAGE;
        }
    };
    let service = match load_service(&env).await {
        Ok(service) => service,
        Err(e) => {
            eprintln!("Failed to load words from {}: {}", env.words_file.display(), e);
            return EXIT_IO;
        }
    };

    match subcommand {
        "list" => {
            let paging = match parse_paging(args) {
                Ok(paging) => paging,
                Err(e) => {
                    eprintln!("{}", e);
                    return EXIT_USAGE;
                }
            };
            let json = args.iter().any(|a| a == "--json");
            if let Some((page, limit)) = paging {
                let page = service.words_page(page, limit);
                if json {
                    match serde_json::to_string_pretty(&page) {
                        Ok(json) => println!("{}", json),
                        Err(e) => {
                            eprintln!("Failed to serialize words: {}", e);
                            return EXIT_IO;
                        }
                    }
                } else {
                    print_words(&page.items);
                    println!("page {} ({} per page), {} word(s) total", page.page, page.limit, page.total);
                }
                return EXIT_OK;
            }

            let words = service.words();
            if json {
                match serde_json::to_string_pretty(&words) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Failed to serialize words: {}", e);
                        return EXIT_IO;
                    }
                }
            } else {
                print_words(&words);
            }
            EXIT_OK
        }
        "count" => {
            println!("{}", service.store().len());
            EXIT_OK
        }
        "export" => {
            let Some(path) = args.first() else {
                eprintln!("Usage: wordshield-cli words export <PATH>");
                return EXIT_USAGE;
            };
            let snapshot = service.store().snapshot();
            match export_flat_file(Path::new(path), snapshot.vocabulary()) {
                Ok(written) => {
                    println!("Exported {} word(s) to {}", written, path);
                    EXIT_OK
                }
                Err(e) => {
                    eprintln!("Export failed: {}", e);
                    EXIT_IO
                }
            }
        }
        other => {
            eprintln!("Unknown words subcommand: {}", other);
            EXIT_USAGE
        }
    }
}

/// Default page size for `words list --page`.
pub const DEFAULT_PAGE_LIMIT: usize = 20;

/// Read `--page N` and `--limit L`. `None` when neither is given.
fn parse_paging(args: &[String]) -> Result<Option<(usize, usize)>, String> {
    let mut page = None;
    let mut limit = None;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let slot = match arg.as_str() {
            "--page" => &mut page,
            "--limit" => &mut limit,
            _ => continue,
        };
        let value = iter
            .next()
            .ok_or_else(|| format!("{} requires a value", arg))?;
        let parsed = value
            .parse::<usize>()
            .map_err(|_| format!("{} expects a number, got '{}'", arg, value))?;
        *slot = Some(parsed);
    }
    if page.is_none() && limit.is_none() {
        return Ok(None);
    }
    Ok(Some((page.unwrap_or(1), limit.unwrap_or(DEFAULT_PAGE_LIMIT))))
}

/// Print words as a table to stdout.
pub fn print_words(words: &[Word]) {
    if words.is_empty() {
        println!("No sensitive words configured.");
        return;
    }

    println!("{:<32} {:<16} {:<36}", "WORD", "CATEGORY", "ID");
    println!("{}", "-".repeat(86));
    for word in words {
        println!(
            "{:<32} {:<16} {:<36}",
            truncate(&word.literal, 31),
            truncate(word.category.as_deref().unwrap_or("-"), 15),
            word.id,
        );
    }
    println!("{}", "-".repeat(86));
    println!("{} word(s)", words.len());
}

/// Cut `s` to at most `max` characters, on a char boundary.
fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
