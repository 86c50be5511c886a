//! Wordshield
//!
//! Sensitive word detection and redaction over a vocabulary that changes at
//! runtime. Administrators add and remove words while moderation traffic
//! keeps scanning; every scan sees exactly one consistent vocabulary.
//!
//! # Matching Semantics
//!
//! - **Leftmost-shortest**: from each start position the shortest word wins.
//! - **Overlapping starts**: scanning reports a match at every start position.
//! - **Case-sensitive**: literals are compared code point for code point.
//! - **Redaction never rescans**: text produced by a replacement is skipped.
//!
//! # Concurrency
//!
//! - Readers load the installed matcher without taking a lock.
//! - Writers are serialized and publish a freshly compiled matcher with a
//!   single atomic swap.
//! - A snapshot taken before a swap stays valid until its last reader drops it.

pub mod cli;
pub mod config;
pub mod engine;
pub mod hits;
pub mod service;
pub mod telemetry;
pub mod vocabulary;

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub use engine::{compile, redact, CompileError, CompiledMatcher, Match};
pub use hits::{HitCounter, HitSink};
pub use service::{
    spawn_hit_flusher, spawn_reconciler, CheckResult, FilterResult, SensitiveWordService,
    ServiceConfig, ServiceError,
};
pub use vocabulary::{
    Vocabulary, VocabularyError, VocabularyStore, Word, WordId, WordRecord, WordRepository,
    WordSource,
};

use config::EnvConfig;

/// A running service with its background tasks.
pub struct Runtime {
    pub service: Arc<SensitiveWordService>,
    shutdown: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
}

impl Runtime {
    /// Build the service, seed it from `source` and start the periodic
    /// reconciler and hit flusher configured in `config`.
    ///
    /// The hit flusher only runs when a `sink` is supplied.
    pub async fn start(
        config: &EnvConfig,
        source: Arc<dyn WordSource>,
        sink: Option<Arc<dyn HitSink>>,
    ) -> Result<Self, ServiceError> {
        let service = Arc::new(SensitiveWordService::new(config.service_config()));
        service.initialize(source.as_ref()).await?;

        let shutdown = CancellationToken::new();
        let mut tasks = Vec::new();

        if let Some(period) = config.reconcile_interval {
            tasks.push(spawn_reconciler(
                service.clone(),
                source,
                period,
                shutdown.clone(),
            ));
        }
        if let (Some(period), Some(sink)) = (config.hit_flush_interval, sink) {
            tasks.push(spawn_hit_flusher(service.clone(), sink, period, shutdown.clone()));
        }

        Ok(Self {
            service,
            shutdown,
            tasks,
        })
    }

    /// Number of background tasks running.
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Cancel background tasks and wait for them to finish.
    pub async fn shutdown(self) {
        self.shutdown.cancel();
        for task in self.tasks {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "background task ended abnormally");
            }
        }
    }
}
