use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use jyut_lang_cantonese::loader::list_entry_files;
use jyut_rag::UploadProgress;

pub const DONE_DIR: &str = "done";

/// `(source, target)` pairs for every uploaded entry still in `entries_dir`
pub fn plan_moves(
    entries_dir: &Path,
    progress: &UploadProgress,
) -> anyhow::Result<Vec<(PathBuf, PathBuf)>> {
    let done_dir = entries_dir.join(DONE_DIR);

    let moves = list_entry_files(entries_dir)?
        .into_iter()
        .filter(|(id, _)| progress.contains(id))
        .filter_map(|(_, source)| {
            let target = done_dir.join(source.file_name()?);
            Some((source, target))
        })
        .collect();

    Ok(moves)
}

pub fn handle_move_processed(
    entries_dir: &Path,
    progress_file: &Path,
    dry_run: bool,
) -> anyhow::Result<usize> {
    if dry_run {
        tracing::info!("DRY RUN MODE - No files will be moved");
    }

    let progress = UploadProgress::load_existing(progress_file)
        .context("Could not read progress file")?;
    tracing::info!(
        "Found {} processed entries in progress file",
        progress.len()
    );

    let moves = plan_moves(entries_dir, &progress)?;
    let done_dir = entries_dir.join(DONE_DIR);

    if dry_run {
        tracing::info!("Would move {} files to {}", moves.len(), done_dir.display());
        for (source, target) in moves.iter().take(10) {
            tracing::info!("  {} -> {}", source.display(), target.display());
        }
        if moves.len() > 10 {
            tracing::info!("  ... and {} more files", moves.len() - 10);
        }
        return Ok(moves.len());
    }

    fs::create_dir_all(&done_dir)?;
    tracing::info!("Moving {} files to {}", moves.len(), done_dir.display());

    for (i, (source, target)) in moves.iter().enumerate() {
        fs::rename(source, target)
            .with_context(|| format!("Failed to move {}", source.display()))?;
        if (i + 1) % 100 == 0 {
            tracing::info!("Moved {} files...", i + 1);
        }
    }

    tracing::info!("Move completed successfully");
    Ok(moves.len())
}
