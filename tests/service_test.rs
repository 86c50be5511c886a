//! Service object: moderation calls, persistence helpers, background tasks.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use wordshield::config;
use wordshield::hits::HitSink;
use wordshield::service::{spawn_hit_flusher, spawn_reconciler, ServiceConfig};
use wordshield::vocabulary::{SourceError, StoreState, Word, WordRecord, WordRepository, WordSource};
use wordshield::{Runtime, SensitiveWordService, ServiceError, VocabularyError};

#[derive(Default)]
struct MockStorage {
    words: Mutex<Vec<String>>,
    fail: AtomicBool,
    loads: AtomicUsize,
}

impl MockStorage {
    fn with_words(words: &[&str]) -> Self {
        let storage = Self::default();
        *storage.words.lock() = words.iter().map(|w| w.to_string()).collect();
        storage
    }

    fn fail_next(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), SourceError> {
        if self.fail.load(Ordering::SeqCst) {
            Err(SourceError::Backend("database unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl WordSource for MockStorage {
    async fn load_active_words(&self) -> Result<Vec<WordRecord>, SourceError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self.words.lock().iter().map(|w| WordRecord::new(w.as_str())).collect())
    }
}

#[async_trait]
impl WordRepository for MockStorage {
    async fn insert_word(&self, word: &Word) -> Result<(), SourceError> {
        self.check()?;
        self.words.lock().push(word.literal.clone());
        Ok(())
    }

    async fn delete_word(&self, word: &Word) -> Result<(), SourceError> {
        self.check()?;
        self.words.lock().retain(|w| w != &word.literal);
        Ok(())
    }
}

#[derive(Default)]
struct MockSink {
    received: Mutex<Vec<(String, u64)>>,
    fail: AtomicBool,
}

#[async_trait]
impl HitSink for MockSink {
    async fn increment_hits(&self, batch: &[(String, u64)]) -> Result<(), SourceError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(SourceError::Backend("hit table locked".to_string()));
        }
        self.received.lock().extend_from_slice(batch);
        Ok(())
    }
}

async fn service_with(words: &[&str]) -> SensitiveWordService {
    let service = SensitiveWordService::default();
    service
        .initialize(&MockStorage::with_words(words))
        .await
        .unwrap();
    service
}

#[tokio::test]
async fn initialize_seeds_vocabulary() {
    let service = SensitiveWordService::default();
    assert_eq!(service.state(), StoreState::Uninitialized);

    let report = service
        .initialize(&MockStorage::with_words(&["bad", "evil", " "]))
        .await
        .unwrap();
    assert_eq!(report.loaded, 2);
    assert_eq!(report.skipped, 1);
    assert_eq!(service.state(), StoreState::Ready);
    assert!(service.contains_sensitive_words("so bad"));
}

#[tokio::test]
async fn initialize_failure_leaves_store_uninitialized() {
    let service = SensitiveWordService::default();
    let storage = MockStorage::with_words(&["bad"]);
    storage.fail_next(true);
    assert!(matches!(
        service.initialize(&storage).await,
        Err(ServiceError::Source(_))
    ));
    assert_eq!(service.state(), StoreState::Uninitialized);
    assert_eq!(service.filter("bad", None), "bad");
}

#[tokio::test]
async fn check_text_reports_every_occurrence() {
    let service = service_with(&["bad"]).await;
    let result = service.check_text("bad, bad, good");
    assert!(result.contains_sensitive_words);
    assert_eq!(result.sensitive_words, vec!["bad", "bad"]);
    assert_eq!(service.hits().pending("bad"), 2);

    let clean = service.check_text("all good");
    assert!(!clean.contains_sensitive_words);
    assert!(clean.sensitive_words.is_empty());
    assert_eq!(service.hits().total_recorded(), 2);
}

#[tokio::test]
async fn filter_text_uses_default_or_given_replacement() {
    let service = SensitiveWordService::new(ServiceConfig {
        default_replacement: "***".to_string(),
        ..Default::default()
    });
    service.add_word("bad").unwrap();

    let result = service.filter_text("a bad day", None);
    assert_eq!(result.filtered, "a *** day");
    assert_eq!(result.sensitive_words, vec!["bad"]);

    let result = service.filter_text("a bad day", Some("#"));
    assert_eq!(result.filtered, "a # day");
    assert_eq!(service.hits().pending("bad"), 2);
}

#[tokio::test]
async fn empty_replacement_uses_default() {
    let service = service_with(&["bad"]).await;
    assert_eq!(service.filter("a bad day", Some("")), "a * day");

    let result = service.filter_text("a bad day", Some(""));
    assert_eq!(result.filtered, "a * day");
    assert_eq!(result.sensitive_words, vec!["bad"]);
}

#[tokio::test]
async fn empty_configured_default_uses_builtin_default() {
    let service = SensitiveWordService::new(ServiceConfig {
        default_replacement: String::new(),
        ..Default::default()
    });
    service.add_word("bad").unwrap();
    assert_eq!(service.default_replacement(), "*");
    assert_eq!(service.filter("a bad day", None), "a * day");
}

#[tokio::test]
async fn filter_text_reports_words_from_input_text() {
    let service = service_with(&["ab", "ba"]).await;
    let result = service.filter_text("aba", Some("#"));
    assert_eq!(result.filtered, "#a");
    assert_eq!(result.sensitive_words, vec!["ab", "ba"]);
}

#[tokio::test]
async fn admin_mutations_surface_errors() {
    let service = service_with(&["bad"]).await;
    assert!(matches!(service.add_word("bad"), Err(VocabularyError::Conflict(_))));
    assert!(matches!(service.add_word("   "), Err(VocabularyError::Validation(_))));
    assert!(matches!(service.remove_word("nope"), Err(VocabularyError::NotFound(_))));

    let outcome = service.bulk_add(["x", "y", "bad"]).unwrap();
    assert_eq!(outcome.count(), 2);
    let outcome = service.bulk_remove(["x", "bad"]).unwrap();
    assert_eq!(outcome.count(), 2);
    assert_eq!(service.words().len(), 1);
}

#[tokio::test]
async fn persisted_add_writes_through() {
    let storage = MockStorage::with_words(&[]);
    let service = service_with(&[]).await;

    let word = service
        .add_word_persisted(WordRecord::new("spam").with_category("ads"), &storage)
        .await
        .unwrap();
    assert_eq!(word.category.as_deref(), Some("ads"));
    assert_eq!(*storage.words.lock(), vec!["spam".to_string()]);

    service.remove_word_persisted("spam", &storage).await.unwrap();
    assert!(storage.words.lock().is_empty());
    assert!(!service.contains_sensitive_words("spam"));
}

#[tokio::test]
async fn persisted_add_conflict_skips_storage() {
    let storage = MockStorage::with_words(&[]);
    let service = service_with(&["spam"]).await;
    let result = service.add_word_persisted("spam", &storage).await;
    assert!(matches!(
        result,
        Err(ServiceError::Vocabulary(VocabularyError::Conflict(_)))
    ));
    assert!(storage.words.lock().is_empty());
}

#[tokio::test]
async fn failed_storage_write_is_not_rolled_back() {
    let storage = MockStorage::with_words(&[]);
    storage.fail_next(true);
    let service = service_with(&[]).await;

    let result = service.add_word_persisted("spam", &storage).await;
    assert!(matches!(result, Err(ServiceError::Source(_))));
    // In-memory change stays until the next reconciliation.
    assert!(service.contains_sensitive_words("spam"));

    storage.fail_next(false);
    service.reconcile(&storage).await.unwrap();
    assert!(!service.contains_sensitive_words("spam"));
}

#[tokio::test]
async fn reconcile_failure_keeps_installed_vocabulary() {
    let storage = MockStorage::with_words(&["bad"]);
    let service = service_with(&["bad"]).await;
    let generation = service.store().generation();

    storage.fail_next(true);
    assert!(service.reconcile(&storage).await.is_err());
    assert_eq!(service.store().generation(), generation);
    assert!(service.contains_sensitive_words("bad"));
}

#[tokio::test]
async fn flush_hits_requeues_on_failure() {
    let service = service_with(&["bad"]).await;
    let sink = MockSink::default();
    service.check_text("bad bad");

    sink.fail.store(true, Ordering::SeqCst);
    assert_eq!(service.flush_hits(&sink).await, 0);
    assert_eq!(service.hits().pending("bad"), 2);

    sink.fail.store(false, Ordering::SeqCst);
    assert_eq!(service.flush_hits(&sink).await, 1);
    assert_eq!(*sink.received.lock(), vec![("bad".to_string(), 2)]);
    assert_eq!(service.hits().pending_words(), 0);
}

#[tokio::test]
async fn reconciler_reloads_until_cancelled() {
    let storage = Arc::new(MockStorage::with_words(&["old"]));
    let service = Arc::new(service_with(&["old"]).await);
    let shutdown = CancellationToken::new();

    let handle = spawn_reconciler(
        service.clone(),
        storage.clone(),
        Duration::from_millis(10),
        shutdown.clone(),
    );

    *storage.words.lock() = vec!["new".to_string()];
    tokio::time::sleep(Duration::from_millis(80)).await;
    shutdown.cancel();
    handle.await.unwrap();

    assert!(storage.loads.load(Ordering::SeqCst) >= 1);
    assert!(service.contains_sensitive_words("new"));
    assert!(!service.contains_sensitive_words("old"));
}

#[tokio::test]
async fn hit_flusher_flushes_on_shutdown() {
    let service = Arc::new(service_with(&["bad"]).await);
    let sink = Arc::new(MockSink::default());
    let shutdown = CancellationToken::new();

    let handle = spawn_hit_flusher(
        service.clone(),
        sink.clone(),
        Duration::from_secs(3600),
        shutdown.clone(),
    );
    service.check_text("bad");
    shutdown.cancel();
    handle.await.unwrap();

    assert_eq!(*sink.received.lock(), vec![("bad".to_string(), 1)]);
}

#[tokio::test]
async fn runtime_starts_configured_tasks() {
    let dir = tempfile::tempdir().unwrap();
    let words_file = dir.path().join("words.txt");
    std::fs::write(&words_file, "bad\n").unwrap();
    let words_path = words_file.to_string_lossy().to_string();

    let env = config::load_with(|key| match key {
        "WORDSHIELD_WORDS_FILE" => Some(words_path.clone()),
        "WORDSHIELD_RECONCILE_INTERVAL" => Some("60".to_string()),
        _ => None,
    })
    .unwrap();

    let source = Arc::new(wordshield::vocabulary::FlatFileSource::new(&env.words_file));
    let runtime = Runtime::start(&env, source, None).await.unwrap();
    assert_eq!(runtime.task_count(), 1);
    assert!(runtime.service.contains_sensitive_words("too bad"));
    runtime.shutdown().await;
}

#[test]
fn service_can_be_driven_from_sync_code() {
    let service = tokio_test::block_on(service_with(&["bad"]));
    assert_eq!(service.filter("bad", Some("?")), "?");
    assert_eq!(service.default_replacement(), "*");
}
