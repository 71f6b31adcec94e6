use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Prefix and extension of per-entry files, `entry_<id>.txt`
const ENTRY_PREFIX: &str = "entry_";
const ENTRY_EXTENSION: &str = "txt";

#[derive(Debug, thiserror::Error)]
pub enum SplitError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitSummary {
    pub entries_written: usize,
    /// Lines seen before the first entry header
    pub lines_skipped: usize,
}

/// Splits a Words.hk dictionary dump into one file per entry
pub struct DictionarySplitter {
    output_dir: PathBuf,
}

impl DictionarySplitter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn split_file(&self, input: &Path) -> Result<SplitSummary, SplitError> {
        if !input.exists() {
            return Err(SplitError::FileNotFound(input.display().to_string()));
        }

        tracing::info!("Splitting dictionary: {}", input.display());
        let reader = BufReader::new(File::open(input)?);
        self.split(reader)
    }

    /// A trimmed line starting with an ASCII digit and containing a comma opens
    /// a new entry; every other non-empty line belongs to the open entry.
    pub fn split(&self, reader: impl BufRead) -> Result<SplitSummary, SplitError> {
        fs::create_dir_all(&self.output_dir)?;

        let mut summary = SplitSummary::default();
        let mut current: Vec<String> = Vec::new();

        for line in reader.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if is_entry_header(line) {
                if !current.is_empty() {
                    self.save_entry(&current)?;
                    summary.entries_written += 1;
                    if summary.entries_written % 1000 == 0 {
                        tracing::info!("Created {} dictionary entries", summary.entries_written);
                    }
                }
                current = vec![line.to_string()];
            } else if current.is_empty() {
                summary.lines_skipped += 1;
            } else {
                current.push(line.to_string());
            }
        }

        if !current.is_empty() {
            self.save_entry(&current)?;
            summary.entries_written += 1;
        }

        tracing::info!(
            "Finished creating {} dictionary entries in {}",
            summary.entries_written,
            self.output_dir.display()
        );
        Ok(summary)
    }

    fn save_entry(&self, lines: &[String]) -> Result<(), SplitError> {
        let id = lines[0].split(',').next().unwrap_or_default();
        let path = self.output_dir.join(entry_file_name(id));

        let mut writer = BufWriter::new(File::create(path)?);
        writer.write_all(lines.join("\n").as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}

fn is_entry_header(line: &str) -> bool {
    line.starts_with(|c: char| c.is_ascii_digit()) && line.contains(',')
}

pub fn entry_file_name(id: &str) -> String {
    format!("{ENTRY_PREFIX}{id}.{ENTRY_EXTENSION}")
}

/// `entry_123.txt` -> `123`
pub fn entry_id_from_path(path: &Path) -> Option<&str> {
    if path.extension()? != ENTRY_EXTENSION {
        return None;
    }
    path.file_stem()?
        .to_str()?
        .strip_prefix(ENTRY_PREFIX)
        .filter(|id| !id.is_empty())
}

/// Entry files directly inside `dir` (no recursion), sorted by file name
pub fn list_entry_files(dir: &Path) -> Result<Vec<(String, PathBuf)>, SplitError> {
    let mut files = Vec::new();

    for dir_entry in fs::read_dir(dir)? {
        let path = dir_entry?.path();
        if !path.is_file() {
            continue;
        }
        if let Some(id) = entry_id_from_path(&path) {
            files.push((id.to_string(), path.clone()));
        }
    }

    files.sort_by(|a, b| a.1.cmp(&b.1));
    Ok(files)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    const DUMP: &str = "\
Words.hk export header
67817,出路:ceot1 lou6,\"(pos:名詞)
<explanation>
yue:解決辦法

eng:solution\",,OK,未公開
  88550,徵聘:zing1 ping3,\"(pos:動詞)(label:書面語)
eng:to invite applications for jobs\",,OK,未公開
";

    #[test]
    fn splits_on_numbered_headers() {
        let dir = tempfile::tempdir().unwrap();
        let summary = DictionarySplitter::new(dir.path())
            .split(Cursor::new(DUMP))
            .unwrap();

        assert_eq!(summary.entries_written, 2);
        assert_eq!(summary.lines_skipped, 1);

        let first = fs::read_to_string(dir.path().join("entry_67817.txt")).unwrap();
        assert_eq!(
            first,
            "67817,出路:ceot1 lou6,\"(pos:名詞)\n<explanation>\nyue:解決辦法\neng:solution\",,OK,未公開"
        );

        let second = fs::read_to_string(dir.path().join("entry_88550.txt")).unwrap();
        assert!(second.starts_with("88550,徵聘"));
        assert!(!second.ends_with('\n'));
    }

    #[test]
    fn creates_missing_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("entries");

        DictionarySplitter::new(&out)
            .split(Cursor::new("1,a:b\n"))
            .unwrap();

        assert!(out.join("entry_1.txt").exists());
    }

    #[test]
    fn missing_input_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = DictionarySplitter::new(dir.path()).split_file(&dir.path().join("nope.txt"));
        assert!(matches!(result, Err(SplitError::FileNotFound(_))));
    }

    #[test]
    fn digit_line_without_comma_continues_entry() {
        let dir = tempfile::tempdir().unwrap();
        let summary = DictionarySplitter::new(dir.path())
            .split(Cursor::new("1,a:b\n2024 was a year\n"))
            .unwrap();

        assert_eq!(summary.entries_written, 1);
        let text = fs::read_to_string(dir.path().join("entry_1.txt")).unwrap();
        assert_eq!(text, "1,a:b\n2024 was a year");
    }

    #[test]
    fn entry_ids_from_paths() {
        assert_eq!(entry_id_from_path(Path::new("d/entry_67817.txt")), Some("67817"));
        assert_eq!(entry_id_from_path(Path::new("d/entry_.txt")), None);
        assert_eq!(entry_id_from_path(Path::new("d/notes.txt")), None);
        assert_eq!(entry_id_from_path(Path::new("d/entry_1.json")), None);
    }

    #[test]
    fn lists_only_top_level_entry_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("entry_2.txt"), "2,b:c").unwrap();
        fs::write(dir.path().join("entry_1.txt"), "1,a:b").unwrap();
        fs::write(dir.path().join("readme.md"), "").unwrap();
        fs::create_dir(dir.path().join("done")).unwrap();
        fs::write(dir.path().join("done").join("entry_3.txt"), "3,c:d").unwrap();

        let ids: Vec<String> = list_entry_files(dir.path())
            .unwrap()
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        assert_eq!(ids, vec!["1", "2"]);
    }
}
