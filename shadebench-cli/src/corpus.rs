//! Corpus Loading
//!
//! The corpus is a directory of image files. Iteration order is
//! lexicographic file-name order so timings line up run to run, and an
//! optional regex narrows the set by name. Entries are loaded as raw
//! bytes; decoding happens inside the batch runner where a failure can
//! be logged and skipped per image.

use anyhow::Context as _;
use std::path::{Path, PathBuf};

/// One named corpus image, bytes still encoded.
#[derive(Debug, Clone)]
pub struct CorpusImage {
    /// File name within the corpus directory.
    pub name: String,
    /// Encoded image bytes.
    pub bytes: Vec<u8>,
}

/// File extensions recognized as corpus images.
const IMAGE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "webp", "bmp", "ico", "tif", "tiff",
];

/// Load the corpus in deterministic order, optionally filtering names by
/// regex. Unreadable files are logged and skipped, matching the batch
/// runner's best-effort policy; only an unreadable directory is fatal.
pub fn load_corpus(dir: &Path, filter: Option<&regex::Regex>) -> anyhow::Result<Vec<CorpusImage>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read corpus directory {}", dir.display()))?;

    let mut files: Vec<(String, PathBuf)> = Vec::new();
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() || !has_image_extension(&path) {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        files.push((name.to_string(), path));
    }

    // Lexicographic name order: the ordering guarantee the runner and
    // the report rely on.
    files.sort_by(|a, b| a.0.cmp(&b.0));

    let mut corpus = Vec::with_capacity(files.len());
    for (name, path) in files {
        if let Some(re) = filter {
            if !re.is_match(&name) {
                continue;
            }
        }
        match std::fs::read(&path) {
            Ok(bytes) => corpus.push(CorpusImage { name, bytes }),
            Err(e) => {
                tracing::warn!(image = %name, error = %e, "skipping unreadable corpus file");
            }
        }
    }

    Ok(corpus)
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let e = e.to_lowercase();
            IMAGE_EXTENSIONS.contains(&e.as_str())
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("shadebench-corpus-{}-{}", tag, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_order_and_extension_filter() {
        let dir = scratch_dir("order");
        std::fs::write(dir.join("zebra.png"), b"zzz").unwrap();
        std::fs::write(dir.join("apple.jpg"), b"aaa").unwrap();
        std::fs::write(dir.join("notes.txt"), b"not an image").unwrap();

        let corpus = load_corpus(&dir, None).unwrap();
        let names: Vec<&str> = corpus.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["apple.jpg", "zebra.png"]);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_regex_filter() {
        let dir = scratch_dir("filter");
        std::fs::write(dir.join("cat.png"), b"c").unwrap();
        std::fs::write(dir.join("dog.png"), b"d").unwrap();

        let re = regex::Regex::new("^cat").unwrap();
        let corpus = load_corpus(&dir, Some(&re)).unwrap();
        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus[0].name, "cat.png");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = std::env::temp_dir().join("shadebench-no-such-corpus");
        assert!(load_corpus(&dir, None).is_err());
    }
}
