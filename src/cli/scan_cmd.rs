// Copyright 2024-2026 Wordshield Contributors
// SPDX-License-Identifier: Apache-2.0

//! Text CLI subcommands: check, filter, scan.

use serde::Serialize;

use super::{
    load_service, parse_text_args, read_input, TextArgs, EXIT_FLAGGED, EXIT_IO, EXIT_OK,
    EXIT_USAGE,
};
use crate::config;
use crate::engine::Match;
use crate::service::SensitiveWordService;

/// Which text command to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextCommand {
    Check,
    Filter,
    Scan,
}

#[derive(Serialize)]
struct ScanReport<'a> {
    generation: u64,
    matches: &'a [Match],
}

/// Run a text command with the arguments following the command name.
///
/// Returns 0 when the text is clean (or after filtering), 1 when `check` or
/// `scan` found sensitive words, 2 on usage errors and 3 on I/O failure.
pub async fn run(command: TextCommand, args: &[String]) -> i32 {
    let parsed = match parse_text_args(args) {
        Ok(parsed) => parsed,
        Err(msg) => {
            eprintln!("{}", msg);
            return EXIT_USAGE;
        }
    };
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
    let text = match read_input(parsed.text.as_deref()) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Failed to read input: {}", e);
            return EXIT_IO;
        }
    };

    execute(&service, command, &parsed, &text)
}

/// Run `command` against an already loaded service and print the result.
pub fn execute(
    service: &SensitiveWordService,
    command: TextCommand,
    args: &TextArgs,
    text: &str,
) -> i32 {
    match command {
        TextCommand::Check => {
            let result = service.check_text(text);
            if args.json {
                print_json(&result);
            } else if result.contains_sensitive_words {
                println!("FLAGGED: {}", result.sensitive_words.join(", "));
            } else {
                println!("CLEAN");
            }
            flagged_code(result.contains_sensitive_words)
        }
        TextCommand::Filter => {
            let result = service.filter_text(text, args.replacement.as_deref());
            if args.json {
                print_json(&result);
            } else {
                println!("{}", result.filtered);
            }
            EXIT_OK
        }
        TextCommand::Scan => {
            let snapshot = service.store().snapshot();
            let matches: Vec<Match> = snapshot.scan(text).collect();
            if args.json {
                print_json(&ScanReport {
                    generation: snapshot.generation(),
                    matches: &matches,
                });
            } else {
                print_matches(&matches);
            }
            flagged_code(!matches.is_empty())
        }
    }
}

fn flagged_code(flagged: bool) -> i32 {
    if flagged {
        EXIT_FLAGGED
    } else {
        EXIT_OK
    }
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize output: {}", e),
    }
}

fn print_matches(matches: &[Match]) {
    if matches.is_empty() {
        println!("No sensitive words found.");
        return;
    }
    println!("{:>8} {:>8}  {}", "START", "LENGTH", "WORD");
    println!("{}", "-".repeat(40));
    for m in matches {
        println!("{:>8} {:>8}  {}", m.start, m.length, m.word);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service_with(words: &[&str]) -> SensitiveWordService {
        let service = SensitiveWordService::default();
        service.bulk_add(words.iter().copied()).unwrap();
        service
    }

    #[test]
    fn test_check_exit_codes() {
        let service = service_with(&["bad"]);
        let args = TextArgs::default();
        assert_eq!(execute(&service, TextCommand::Check, &args, "a bad day"), EXIT_FLAGGED);
        assert_eq!(execute(&service, TextCommand::Check, &args, "a good day"), EXIT_OK);
    }

    #[test]
    fn test_filter_always_succeeds() {
        let service = service_with(&["bad"]);
        let args = TextArgs {
            replacement: Some("#".to_string()),
            ..Default::default()
        };
        assert_eq!(execute(&service, TextCommand::Filter, &args, "bad"), EXIT_OK);
        assert_eq!(service.hits().pending("bad"), 1);
    }

    #[test]
    fn test_scan_json() {
        let service = service_with(&["ab"]);
        let args = TextArgs {
            json: true,
            ..Default::default()
        };
        assert_eq!(execute(&service, TextCommand::Scan, &args, "xab"), EXIT_FLAGGED);
    }
}
