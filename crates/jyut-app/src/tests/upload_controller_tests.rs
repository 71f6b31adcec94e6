use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use jyut_config::upload::UploadConfig;
use jyut_rag::{Backoff, RagError, UploadProgress};
use jyut_types::UploadEvent;
use tokio_util::sync::CancellationToken;

use crate::controller::{EntryUploader, UploadController, checkpoint_loop, upload_with_backoff};

/// Plays back a queue of results per entry, then succeeds
#[derive(Default)]
struct ScriptedUploader {
    script: Mutex<HashMap<String, Vec<Result<(), RagError>>>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedUploader {
    fn with(entry_id: &str, results: Vec<Result<(), RagError>>) -> Self {
        let uploader = Self::default();
        uploader
            .script
            .lock()
            .unwrap()
            .insert(entry_id.to_string(), results);
        uploader
    }

    fn calls_for(&self, entry_id: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|id| id.as_str() == entry_id)
            .count()
    }
}

#[async_trait]
impl EntryUploader for ScriptedUploader {
    async fn upload(&self, entry_id: &str, _path: &Path) -> Result<(), RagError> {
        self.calls.lock().unwrap().push(entry_id.to_string());

        let mut script = self.script.lock().unwrap();
        match script.get_mut(entry_id) {
            Some(queue) if !queue.is_empty() => queue.remove(0),
            _ => Ok(()),
        }
    }
}

fn fast_backoff(max_retries: u32) -> Backoff {
    Backoff {
        base: Duration::from_millis(1),
        max: Duration::from_millis(4),
        max_retries,
    }
}

fn config(workers: usize, flush_every: usize) -> UploadConfig {
    UploadConfig {
        workers,
        flush_every,
        ..UploadConfig::default()
    }
}

fn files(ids: &[&str]) -> Vec<(String, PathBuf)> {
    ids.iter()
        .map(|id| (id.to_string(), PathBuf::from(format!("entry_{id}.txt"))))
        .collect()
}

#[tokio::test]
async fn test_uploads_everything_and_flushes_checkpoint() {
    let dir = tempfile::tempdir().unwrap();
    let progress_path = dir.path().join("upload_progress.json");
    let progress = UploadProgress::load(&progress_path).unwrap();

    let controller = UploadController::new(&config(3, 2)).with_backoff(fast_backoff(3));
    let uploader = Arc::new(ScriptedUploader::default());

    let (progress, report) = controller
        .run(uploader.clone(), files(&["1", "2", "3", "4", "5"]), progress)
        .await
        .unwrap();

    assert_eq!(report.uploaded, 5);
    assert_eq!(report.failed, 0);
    assert!(!report.cancelled);
    assert_eq!(progress.len(), 5);

    let reloaded = UploadProgress::load_existing(&progress_path).unwrap();
    assert_eq!(reloaded.len(), 5);
    assert!(reloaded.contains("3"));
}

#[tokio::test]
async fn test_skips_entries_already_in_progress() {
    let dir = tempfile::tempdir().unwrap();
    let mut progress = UploadProgress::load(dir.path().join("p.json")).unwrap();
    progress.insert("1");
    progress.insert("2");

    let controller = UploadController::new(&config(2, 10)).with_backoff(fast_backoff(3));
    let uploader = Arc::new(ScriptedUploader::default());

    let (progress, report) = controller
        .run(uploader.clone(), files(&["1", "2", "3"]), progress)
        .await
        .unwrap();

    assert_eq!(report.skipped, 2);
    assert_eq!(report.uploaded, 1);
    assert_eq!(uploader.calls_for("1"), 0);
    assert_eq!(uploader.calls_for("3"), 1);
    assert_eq!(progress.len(), 3);
}

#[tokio::test]
async fn test_rate_limited_entry_is_retried() {
    let dir = tempfile::tempdir().unwrap();
    let progress = UploadProgress::load(dir.path().join("p.json")).unwrap();

    let controller = UploadController::new(&config(1, 1)).with_backoff(fast_backoff(5));
    let uploader = Arc::new(ScriptedUploader::with(
        "42",
        vec![Err(RagError::RateLimited), Err(RagError::RateLimited)],
    ));

    let (progress, report) = controller
        .run(uploader.clone(), files(&["42"]), progress)
        .await
        .unwrap();

    assert_eq!(report.uploaded, 1);
    assert_eq!(uploader.calls_for("42"), 3);
    assert!(progress.contains("42"));
}

#[tokio::test]
async fn test_permanent_failure_is_not_checkpointed() {
    let dir = tempfile::tempdir().unwrap();
    let progress = UploadProgress::load(dir.path().join("p.json")).unwrap();

    let controller = UploadController::new(&config(2, 1)).with_backoff(fast_backoff(5));
    let uploader = Arc::new(ScriptedUploader::with(
        "7",
        vec![Err(RagError::Api {
            status: 400,
            message: "bad file".to_string(),
        })],
    ));

    let (progress, report) = controller
        .run(uploader.clone(), files(&["7", "8"]), progress)
        .await
        .unwrap();

    assert_eq!(report.failed, 1);
    assert_eq!(report.uploaded, 1);
    assert_eq!(uploader.calls_for("7"), 1);
    assert!(!progress.contains("7"));
    assert!(progress.contains("8"));
}

#[tokio::test]
async fn test_retries_give_up_after_max_attempts() {
    let uploader = ScriptedUploader::with(
        "9",
        vec![
            Err(RagError::RateLimited),
            Err(RagError::RateLimited),
            Err(RagError::RateLimited),
        ],
    );

    let result = upload_with_backoff(
        &uploader,
        "9",
        Path::new("entry_9.txt"),
        fast_backoff(2),
        &CancellationToken::new(),
    )
    .await;

    assert!(matches!(result, Err(RagError::RateLimited)));
    assert_eq!(uploader.calls_for("9"), 3);
}

#[tokio::test]
async fn test_cancelled_before_start_uploads_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let progress = UploadProgress::load(dir.path().join("p.json")).unwrap();

    let controller = UploadController::new(&config(2, 1)).with_backoff(fast_backoff(3));
    controller.shutdown();
    let uploader = Arc::new(ScriptedUploader::default());

    let (progress, report) = controller
        .run(uploader.clone(), files(&["1", "2"]), progress)
        .await
        .unwrap();

    assert!(report.cancelled);
    assert_eq!(report.uploaded, 0);
    assert!(progress.is_empty());
    assert!(uploader.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_unwritable_checkpoint_still_lets_every_upload_run() {
    let dir = tempfile::tempdir().unwrap();
    let progress_path = dir.path().join("missing").join("upload_progress.json");
    let progress = UploadProgress::load(&progress_path).unwrap();

    let controller = UploadController::new(&config(2, 1)).with_backoff(fast_backoff(3));
    let uploader = Arc::new(ScriptedUploader::default());

    let result = controller
        .run(uploader.clone(), files(&["1", "2", "3", "4"]), progress)
        .await;

    assert!(result.is_err());
    for id in ["1", "2", "3", "4"] {
        assert_eq!(uploader.calls_for(id), 1);
    }
}

#[tokio::test]
async fn test_checkpoint_recovers_after_failed_flush() {
    let dir = tempfile::tempdir().unwrap();
    let progress_dir = dir.path().join("state");
    let progress_path = progress_dir.join("upload_progress.json");
    let progress = UploadProgress::load(&progress_path).unwrap();

    let (tx, rx) = kanal::bounded_async::<UploadEvent>(16);
    let checkpoint = tokio::spawn(checkpoint_loop(progress, rx, 1));

    for id in ["1", "2"] {
        tx.send(UploadEvent::Uploaded {
            entry_id: id.to_string(),
            file_name: format!("entry_{id}.txt"),
        })
        .await
        .unwrap();
    }
    tokio::time::sleep(Duration::from_millis(50)).await;

    std::fs::create_dir_all(&progress_dir).unwrap();
    tx.send(UploadEvent::Uploaded {
        entry_id: "3".to_string(),
        file_name: "entry_3.txt".to_string(),
    })
    .await
    .unwrap();
    drop(tx);

    let (progress, report) = checkpoint.await.unwrap().unwrap();
    assert_eq!(report.uploaded, 3);
    assert_eq!(progress.len(), 3);

    let reloaded = UploadProgress::load_existing(&progress_path).unwrap();
    assert_eq!(reloaded.len(), 3);
    assert!(reloaded.contains("1"));
}
