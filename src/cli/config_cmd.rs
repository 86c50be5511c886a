// Copyright 2024-2026 Wordshield Contributors
// SPDX-License-Identifier: Apache-2.0

//! Config CLI subcommands: show, defaults, validate.
//!
//! These commands read configuration from the environment and the optional
//! config file without loading any words.

use crate::config::{
    self, EffectiveConfig, EnvConfig, DEFAULT_HIT_FLUSH_SECS, DEFAULT_RECONCILE_SECS,
    DEFAULT_REPLACEMENT, DEFAULT_WORDS_FILE,
};
use crate::vocabulary::DEFAULT_MAX_WORD_CHARS;

use super::{EXIT_FLAGGED, EXIT_OK, EXIT_USAGE};

/// Print effective config as key-value pairs to stdout.
pub fn run_show() -> i32 {
    match config::load() {
        Ok(env) => {
            print_config(&env.effective_config());
            EXIT_OK
        }
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            EXIT_USAGE
        }
    }
}

/// Print default config values (no env overrides) to stdout.
pub fn run_defaults() {
    println!("WORDSHIELD_REPLACEMENT={}", DEFAULT_REPLACEMENT);
    println!("WORDSHIELD_MAX_WORD_CHARS={}", DEFAULT_MAX_WORD_CHARS);
    println!("WORDSHIELD_WORDS_FILE={}", DEFAULT_WORDS_FILE);
    println!("WORDSHIELD_RECONCILE_INTERVAL={}", DEFAULT_RECONCILE_SECS);
    println!("WORDSHIELD_HIT_FLUSH_INTERVAL={}", DEFAULT_HIT_FLUSH_SECS);
    println!("WORDSHIELD_LOG_LEVEL=info");
    println!("WORDSHIELD_LOG_FORMAT=json");
}

/// Validate configuration for obvious misconfigurations.
///
/// Returns 0 if valid, 1 if any warnings are found, 2 if the config file
/// cannot be read.
pub fn run_validate() -> i32 {
    match config::load() {
        Ok(env) => validate(&env),
        Err(e) => {
            eprintln!("ERROR: {}", e);
            EXIT_USAGE
        }
    }
}

/// Print warnings for `env` and return the exit code.
pub fn validate(env: &EnvConfig) -> i32 {
    let warnings = env.warnings();
    for warning in &warnings {
        eprintln!("WARNING: {}", warning);
    }
    if warnings.is_empty() {
        println!("Configuration is valid.");
        EXIT_OK
    } else {
        EXIT_FLAGGED
    }
}

fn print_config(cfg: &EffectiveConfig) {
    if let Some(path) = &cfg.config_file {
        println!("WORDSHIELD_CONFIG={}", path);
    }
    println!("WORDSHIELD_REPLACEMENT={}", cfg.replacement);
    println!("WORDSHIELD_MAX_WORD_CHARS={}", cfg.max_word_chars);
    println!("WORDSHIELD_WORDS_FILE={}", cfg.words_file);
    println!("WORDSHIELD_RECONCILE_INTERVAL={}", cfg.reconcile_interval_secs);
    println!("WORDSHIELD_HIT_FLUSH_INTERVAL={}", cfg.hit_flush_interval_secs);
    println!("WORDSHIELD_LOG_LEVEL={}", cfg.log_level);
    println!("WORDSHIELD_LOG_FORMAT={}", cfg.log_format);
    if let Some(path) = &cfg.log_file {
        println!("WORDSHIELD_LOG_FILE={}", path);
    }
}
