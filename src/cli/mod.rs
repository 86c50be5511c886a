// Copyright 2024-2026 Wordshield Contributors
// SPDX-License-Identifier: Apache-2.0

//! CLI module for Wordshield commands.
//!
//! Every command builds a service from the configured flat word file, runs
//! once and exits. No server process is involved.
//!
//! ## Usage
//!
//! ```bash
//! wordshield-cli check "some text"    # exits 1 when sensitive words are found
//! echo "some text" | wordshield-cli filter - --replacement "#"
//! wordshield-cli scan "some text" --json
//! wordshield-cli words list
//! ```

pub mod config_cmd;
pub mod scan_cmd;
pub mod words_cmd;

use std::io::Read;

use crate::config::EnvConfig;
use crate::service::{SensitiveWordService, ServiceError};
use crate::vocabulary::FlatFileSource;

/// Exit code: success / clean text.
pub const EXIT_OK: i32 = 0;
/// Exit code: sensitive words found, or validation warnings.
pub const EXIT_FLAGGED: i32 = 1;
/// Exit code: configuration or usage error.
pub const EXIT_USAGE: i32 = 2;
/// Exit code: word file or I/O failure.
pub const EXIT_IO: i32 = 3;

/// Build a service seeded from the configured words file.
pub async fn load_service(config: &EnvConfig) -> Result<SensitiveWordService, ServiceError> {
    let service = SensitiveWordService::new(config.service_config());
    let source = FlatFileSource::new(&config.words_file);
    service.initialize(&source).await?;
    Ok(service)
}

/// Resolve the text argument. `-` or a missing argument reads stdin.
pub fn read_input(arg: Option<&str>) -> std::io::Result<String> {
    match arg {
        Some(text) if text != "-" => Ok(text.to_string()),
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

/// Options shared by the text commands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextArgs {
    pub text: Option<String>,
    pub replacement: Option<String>,
    pub json: bool,
}

/// Parse `[TEXT|-] [--replacement R] [--json]`.
pub fn parse_text_args(args: &[String]) -> Result<TextArgs, String> {
    let mut parsed = TextArgs::default();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--json" => {
                parsed.json = true;
                i += 1;
            }
            "--replacement" | "-r" => {
                let value = args
                    .get(i + 1)
                    .ok_or_else(|| "Missing value for --replacement".to_string())?;
                parsed.replacement = Some(value.clone());
                i += 2;
            }
            other if other.starts_with("--") => {
                return Err(format!("Unknown argument: {}", other));
            }
            other => {
                if parsed.text.is_some() {
                    return Err(format!("Unexpected extra argument: {}", other));
                }
                parsed.text = Some(other.to_string());
                i += 1;
            }
        }
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_text_and_flags() {
        let parsed = parse_text_args(&args(&["hello", "--json", "-r", "#"])).unwrap();
        assert_eq!(parsed.text.as_deref(), Some("hello"));
        assert_eq!(parsed.replacement.as_deref(), Some("#"));
        assert!(parsed.json);
    }

    #[test]
    fn test_parse_stdin_marker() {
        let parsed = parse_text_args(&args(&["-"])).unwrap();
        assert_eq!(parsed.text.as_deref(), Some("-"));
        assert!(!parsed.json);
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_text_args(&args(&["--replacement"])).is_err());
        assert!(parse_text_args(&args(&["--verbose"])).is_err());
        assert!(parse_text_args(&args(&["a", "b"])).is_err());
    }

    #[test]
    fn test_read_input_literal() {
        assert_eq!(read_input(Some("abc")).unwrap(), "abc");
    }
}
