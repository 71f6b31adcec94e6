use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use jyut_config::upload::UploadConfig;
use jyut_rag::{Backoff, RagClient, RagError, UploadProgress};
use jyut_types::UploadEvent;
use kanal::{AsyncReceiver, AsyncSender};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Sends one entry file to the corpus
#[async_trait]
pub trait EntryUploader: Send + Sync {
    async fn upload(&self, entry_id: &str, path: &Path) -> Result<(), RagError>;
}

pub struct CorpusUploader {
    client: RagClient,
    corpus: String,
}

impl CorpusUploader {
    pub fn new(client: RagClient, corpus: String) -> Self {
        Self { client, corpus }
    }
}

#[async_trait]
impl EntryUploader for CorpusUploader {
    async fn upload(&self, entry_id: &str, path: &Path) -> Result<(), RagError> {
        let display_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("entry_{entry_id}.txt"));
        let description = format!("Words.hk dictionary entry {entry_id}");

        let file = self
            .client
            .upload_file(&self.corpus, path, &display_name, &description)
            .await?;
        tracing::debug!("Uploaded {} as {}", display_name, file.name);
        Ok(())
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UploadReport {
    pub uploaded: usize,
    pub skipped: usize,
    pub failed: usize,
    pub cancelled: bool,
}

/// Bounded worker pool for corpus uploads with a single checkpoint writer
pub struct UploadController {
    workers: usize,
    flush_every: usize,
    backoff: Backoff,
    cancel_token: CancellationToken,
}

impl UploadController {
    pub fn new(config: &UploadConfig) -> Self {
        Self {
            workers: config.workers.max(1),
            flush_every: config.flush_every.max(1),
            backoff: Backoff::from_config(config),
            cancel_token: CancellationToken::new(),
        }
    }

    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }

    /// Upload every file not yet in `progress`. Returns the final checkpoint and counts.
    pub async fn run(
        &self,
        uploader: Arc<dyn EntryUploader>,
        files: Vec<(String, PathBuf)>,
        progress: UploadProgress,
    ) -> anyhow::Result<(UploadProgress, UploadReport)> {
        let (event_tx, event_rx) = kanal::bounded_async::<UploadEvent>(256);

        let (pending, done): (Vec<_>, Vec<_>) = files
            .into_iter()
            .partition(|(id, _)| !progress.contains(id));
        tracing::info!(
            "{} entries to upload, {} already done, {} workers",
            pending.len(),
            done.len(),
            self.workers
        );

        let checkpoint = tokio::spawn(checkpoint_loop(progress, event_rx, self.flush_every));

        for (entry_id, _) in done {
            event_tx.send(UploadEvent::Skipped { entry_id }).await?;
        }

        let semaphore = Arc::new(Semaphore::new(self.workers));
        let mut tasks = JoinSet::new();
        let mut cancelled = false;

        for (entry_id, path) in pending {
            let permit = tokio::select! {
                biased;
                _ = self.cancel_token.cancelled() => {
                    cancelled = true;
                    break;
                }
                permit = semaphore.clone().acquire_owned() => permit?,
            };

            tasks.spawn(upload_task(
                uploader.clone(),
                entry_id,
                path,
                self.backoff,
                self.cancel_token.child_token(),
                event_tx.clone(),
                permit,
            ));
        }

        drop(event_tx);

        while let Some(result) = tasks.join_next().await {
            if let Err(e) = result {
                tracing::error!("upload task panicked: {e}");
            }
        }

        let (progress, mut report) = checkpoint.await??;
        report.cancelled = cancelled || self.cancel_token.is_cancelled();
        Ok((progress, report))
    }
}

async fn upload_task(
    uploader: Arc<dyn EntryUploader>,
    entry_id: String,
    path: PathBuf,
    backoff: Backoff,
    cancel: CancellationToken,
    event_tx: AsyncSender<UploadEvent>,
    _permit: tokio::sync::OwnedSemaphorePermit,
) {
    let event = match upload_with_backoff(uploader.as_ref(), &entry_id, &path, backoff, &cancel).await {
        Ok(()) => UploadEvent::Uploaded {
            entry_id,
            file_name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        },
        Err(e) => UploadEvent::Failed {
            entry_id,
            reason: e.to_string(),
        },
    };

    if let Err(e) = event_tx.send(event).await {
        tracing::error!("Failed to report upload result: {}", e);
    }
}

/// Retry rate limits and server errors with exponential backoff; give up on anything else
pub async fn upload_with_backoff(
    uploader: &dyn EntryUploader,
    entry_id: &str,
    path: &Path,
    backoff: Backoff,
    cancel: &CancellationToken,
) -> Result<(), RagError> {
    let mut attempt = 0;

    loop {
        let error = match uploader.upload(entry_id, path).await {
            Ok(()) => return Ok(()),
            Err(e) if e.is_retryable() => e,
            Err(e) => return Err(e),
        };

        let Some(delay) = backoff.delay(attempt) else {
            return Err(error);
        };

        tracing::warn!(
            "Entry {} failed ({}), retrying in {:?} (attempt {})",
            entry_id,
            error,
            delay,
            attempt + 1
        );

        tokio::select! {
            _ = cancel.cancelled() => return Err(error),
            _ = tokio::time::sleep(delay) => {}
        }
        attempt += 1;
    }
}

/// Sole owner of the checkpoint: inserts IDs as uploads finish and flushes periodically.
/// A failed periodic flush is retried on the next one; only the final flush can fail the run.
pub(crate) async fn checkpoint_loop(
    mut progress: UploadProgress,
    event_rx: AsyncReceiver<UploadEvent>,
    flush_every: usize,
) -> Result<(UploadProgress, UploadReport), RagError> {
    let mut report = UploadReport::default();
    let mut since_flush = 0;

    while let Ok(event) = event_rx.recv().await {
        match event {
            UploadEvent::Uploaded { entry_id, file_name } => {
                progress.insert(entry_id);
                report.uploaded += 1;
                since_flush += 1;
                tracing::info!("Uploaded {} ({} total)", file_name, progress.len());

                if since_flush >= flush_every {
                    match progress.flush() {
                        Ok(()) => since_flush = 0,
                        Err(e) => tracing::error!(
                            "Failed to save progress to {}: {}",
                            progress.path().display(),
                            e
                        ),
                    }
                }
            }
            UploadEvent::Skipped { .. } => report.skipped += 1,
            UploadEvent::Failed { entry_id, reason } => {
                report.failed += 1;
                tracing::warn!("Entry {} failed: {}", entry_id, reason);
            }
        }
    }

    progress.flush()?;
    Ok((progress, report))
}
