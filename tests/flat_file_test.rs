//! Flat word file source and export.

use wordshield::vocabulary::{export_flat_file, FlatFileSource, VocabularyStore, WordSource};

#[tokio::test]
async fn loads_trimmed_non_blank_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("words.txt");
    std::fs::write(&path, "bad\n\n  evil  \r\n敏感\n").unwrap();

    let records = FlatFileSource::new(&path).load_active_words().await.unwrap();
    let literals: Vec<_> = records.iter().map(|r| r.literal.as_str()).collect();
    assert_eq!(literals, vec!["bad", "evil", "敏感"]);
}

#[tokio::test]
async fn missing_file_yields_no_words() {
    let dir = tempfile::tempdir().unwrap();
    let source = FlatFileSource::new(dir.path().join("absent.txt"));
    assert!(source.load_active_words().await.unwrap().is_empty());
}

#[tokio::test]
async fn export_then_reload_round_trips_vocabulary() {
    let dir = tempfile::tempdir().unwrap();
    let store = VocabularyStore::default();
    store.bulk_add(["zeta", "alpha", "敏感"]).unwrap();

    let path = dir.path().join("nested").join("export.txt");
    let snapshot = store.snapshot();
    let written = export_flat_file(&path, snapshot.vocabulary()).unwrap();
    assert_eq!(written, 3);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "alpha\nzeta\n敏感\n");

    let reloaded = VocabularyStore::default();
    let records = FlatFileSource::new(&path).load_active_words().await.unwrap();
    let report = reloaded.load(records).unwrap();
    assert_eq!(report.loaded, 3);
    assert_eq!(reloaded.words().len(), store.words().len());
}

#[test]
fn export_of_empty_vocabulary_is_empty_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.txt");
    let store = VocabularyStore::default();
    assert_eq!(export_flat_file(&path, store.snapshot().vocabulary()).unwrap(), 0);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
}
