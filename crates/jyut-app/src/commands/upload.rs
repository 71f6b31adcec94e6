use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use jyut_lang_cantonese::loader::list_entry_files;
use jyut_rag::UploadProgress;

use crate::controller::{CorpusUploader, UploadController};
use crate::state::AppState;

pub async fn handle_upload(
    state: Arc<AppState>,
    entries_dir: &Path,
    progress_file: &Path,
) -> anyhow::Result<()> {
    let files = list_entry_files(entries_dir)
        .with_context(|| format!("Failed to scan {}", entries_dir.display()))?;
    let progress = UploadProgress::load(progress_file)?;
    tracing::info!(
        "Found {} entry files, {} already uploaded",
        files.len(),
        progress.len()
    );

    let corpus = state.corpus().await?;
    let uploader = CorpusUploader::new(state.rag_client(), corpus);
    let controller = UploadController::new(&state.config.upload);

    let cancel = controller.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown requested, finishing in-flight uploads");
            cancel.cancel();
        }
    });

    let (progress, report) = controller.run(Arc::new(uploader), files, progress).await?;

    tracing::info!(
        "Upload finished: {} uploaded, {} skipped, {} failed{}. Progress saved to {} ({} entries)",
        report.uploaded,
        report.skipped,
        report.failed,
        if report.cancelled { " (cancelled)" } else { "" },
        progress.path().display(),
        progress.len()
    );

    Ok(())
}
