use std::path::Path;

use anyhow::Context;
use jyut_lang_cantonese::DictionarySplitter;

pub fn handle_split(input: &Path, output: &Path) -> anyhow::Result<()> {
    let summary = DictionarySplitter::new(output)
        .split_file(input)
        .with_context(|| format!("Failed to split {}", input.display()))?;

    if summary.lines_skipped > 0 {
        tracing::warn!(
            "Ignored {} lines before the first entry header",
            summary.lines_skipped
        );
    }

    tracing::info!(
        "Created {} dictionary entries in {}",
        summary.entries_written,
        output.display()
    );
    Ok(())
}
