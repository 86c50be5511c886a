//! Wordshield command-line entry point.
//!
//! Loads configuration and the flat word file, then runs one command:
//!
//! - `wordshield-cli check <TEXT|->` - Report whether text contains sensitive words
//! - `wordshield-cli filter <TEXT|->` - Print text with sensitive words redacted
//! - `wordshield-cli scan <TEXT|->` - List every match with its offsets
//! - `wordshield-cli words list|count|export` - Inspect the vocabulary
//! - `wordshield-cli config show|defaults|validate` - Inspect configuration

use std::process::ExitCode;

use wordshield::cli::scan_cmd::{self, TextCommand};
use wordshield::cli::{config_cmd, words_cmd, EXIT_USAGE};
use wordshield::config;
use wordshield::telemetry::{init_logging, LogConfig};

#[tokio::main]
async fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("help");
    let rest = args.get(2..).unwrap_or(&[]);

    if matches!(command, "check" | "filter" | "scan" | "words") {
        init_cli_logging();
    }

    let code = match command {
        "check" => scan_cmd::run(TextCommand::Check, rest).await,
        "filter" => scan_cmd::run(TextCommand::Filter, rest).await,
        "scan" => scan_cmd::run(TextCommand::Scan, rest).await,
        "words" => {
            let subcommand = rest.first().map(|s| s.as_str()).unwrap_or("list");
            words_cmd::run(subcommand, rest.get(1..).unwrap_or(&[])).await
        }
        "config" => {
            let subcommand = rest.first().map(|s| s.as_str()).unwrap_or("show");
            match subcommand {
                "show" => config_cmd::run_show(),
                "defaults" => {
                    config_cmd::run_defaults();
                    0
                }
                "validate" => config_cmd::run_validate(),
                _ => {
                    eprintln!("Unknown config subcommand: {}", subcommand);
                    print_command_help("config");
                    EXIT_USAGE
                }
            }
        }
        "help" | "--help" | "-h" => {
            if let Some(subcommand) = rest.first() {
                print_command_help(subcommand);
            } else {
                print_usage();
            }
            0
        }
        "version" | "--version" | "-V" => {
            println!("wordshield {}", env!("CARGO_PKG_VERSION"));
            0
        }
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            EXIT_USAGE
        }
    };

    ExitCode::from(code as u8)
}

/// Logging for one-shot commands goes to stderr at `warn` unless configured.
fn init_cli_logging() {
    let log = match config::load() {
        Ok(env) => env.log,
        Err(_) => LogConfig {
            level: "warn".to_string(),
            ..Default::default()
        },
    };
    if let Err(e) = init_logging(&log) {
        eprintln!("Logging disabled: {}", e);
    }
}

fn print_usage() {
    let version = env!("CARGO_PKG_VERSION");
    eprintln!(
        "wordshield - Sensitive word detection and redaction v{}

USAGE:
    wordshield-cli <COMMAND> [OPTIONS]

COMMANDS:
    check      Report whether text contains sensitive words
    filter     Print text with sensitive words replaced
    scan       List every match with code point offsets
    words      Inspect the vocabulary (list, count, export)
    config     Inspect configuration (show, defaults, validate)
    version    Show version information
    help       Show this help message

EXAMPLES:
    wordshield-cli check \"is this ok\"
    echo \"some text\" | wordshield-cli filter - --replacement \"#\"
    wordshield-cli scan \"some text\" --json
    wordshield-cli words export /tmp/words.txt

ENVIRONMENT:
    WORDSHIELD_CONFIG       Optional TOML config file
    WORDSHIELD_WORDS_FILE   Flat word file (default: config/sensitive-words.txt)
    WORDSHIELD_REPLACEMENT  Default replacement (default: *)
    WORDSHIELD_LOG_LEVEL    Log filter (debug, info, warn, error)

EXIT CODES:
    0  Success / clean text
    1  Sensitive words found / configuration warnings
    2  Usage or configuration error
    3  I/O error
",
        version
    );
}

/// Print detailed help for a specific command.
fn print_command_help(command: &str) {
    match command {
        "check" | "scan" => {
            eprintln!(
                "wordshield-cli {} - Scan text

USAGE:
    wordshield-cli {} [TEXT|-] [--json]

DESCRIPTION:
    Reads TEXT, or stdin when TEXT is '-' or omitted, and scans it against
    the configured words. Every start position is reported, so overlapping
    words are all found.

EXIT CODES:
    0  No sensitive words
    1  Sensitive words found
",
                command, command
            );
        }
        "filter" => {
            eprintln!(
                "wordshield-cli filter - Redact text

USAGE:
    wordshield-cli filter [TEXT|-] [--replacement R] [--json]

DESCRIPTION:
    Replaces each sensitive word with one copy of the replacement. Text
    produced by a replacement is never scanned again. An empty replacement
    falls back to WORDSHIELD_REPLACEMENT (default: *).
"
            );
        }
        "words" => {
            eprintln!(
                "wordshield-cli words - Inspect the vocabulary

USAGE:
    wordshield-cli words <SUBCOMMAND>

SUBCOMMANDS:
    list [--json] [--page N] [--limit L]
                    List words loaded from the words file; with --page or
                    --limit, list one page newest first (default limit 20)
    count           Print the number of words
    export <PATH>   Write a sorted, deduplicated snapshot to PATH
"
            );
        }
        "config" => {
            eprintln!(
                "wordshield-cli config - Inspect configuration

USAGE:
    wordshield-cli config <SUBCOMMAND>

SUBCOMMANDS:
    show           Show effective configuration
    validate       Warn about suspicious settings
    defaults       Show default configuration
"
            );
        }
        _ => {
            eprintln!(
                "No detailed help available for '{}'. Use 'wordshield-cli help' for general usage.",
                command
            );
        }
    }
}
