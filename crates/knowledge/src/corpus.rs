//! Corpus discovery and loading.
//!
//! A corpus is a flat directory of plain-text files. Subdirectories are not
//! walked, and listing order is always sorted by filename so every consumer
//! sees the same order regardless of platform.

use crate::chunker::Chunker;
use crate::error::{KnowledgeError, KnowledgeResult};
use crate::types::{CorpusStats, Document, FileStats};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A corpus file: its filename and full path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusFile {
    pub name: String,
    pub path: PathBuf,
}

/// List accepted corpus files, sorted lexicographically by filename bytes.
pub fn list_corpus_files(dir: &Path, extensions: &[String]) -> KnowledgeResult<Vec<CorpusFile>> {
    if !dir.is_dir() {
        return Err(KnowledgeError::CorpusUnavailable {
            path: dir.to_path_buf(),
            reason: "not a directory".to_string(),
        });
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| KnowledgeError::CorpusUnavailable {
            path: dir.to_path_buf(),
            reason: e.to_string(),
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let Some(name) = entry.file_name().to_str() else {
            tracing::warn!("Skipping corpus file with non UTF-8 name: {:?}", entry.path());
            continue;
        };

        if has_accepted_extension(name, extensions) {
            files.push(CorpusFile {
                name: name.to_string(),
                path: entry.path().to_path_buf(),
            });
        }
    }

    files.sort_by(|a, b| a.name.as_bytes().cmp(b.name.as_bytes()));

    tracing::debug!("Found {} corpus files in {:?}", files.len(), dir);
    Ok(files)
}

fn has_accepted_extension(name: &str, extensions: &[String]) -> bool {
    let lower = name.to_lowercase();
    extensions.iter().any(|ext| {
        let ext = ext.trim_start_matches('.').to_lowercase();
        lower.ends_with(&format!(".{}", ext))
    })
}

/// Read a corpus file's raw bytes.
pub fn read_file(file: &CorpusFile) -> KnowledgeResult<Vec<u8>> {
    fs::read(&file.path).map_err(|e| KnowledgeError::CorpusUnavailable {
        path: file.path.clone(),
        reason: e.to_string(),
    })
}

/// Load every accepted file as a document.
///
/// Invalid UTF-8 sequences are replaced rather than dropping the file.
pub fn load_documents(dir: &Path, extensions: &[String]) -> KnowledgeResult<Vec<Document>> {
    let files = list_corpus_files(dir, extensions)?;
    let mut documents = Vec::with_capacity(files.len());

    for file in &files {
        let bytes = read_file(file)?;
        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("{} is not valid UTF-8; decoding lossily", file.name);
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }
        };

        tracing::debug!("Loaded {} ({} bytes)", file.name, text.len());
        documents.push(Document::new(file.name.clone(), text));
    }

    Ok(documents)
}

/// Per-file character, word and chunk counts, plus totals.
pub fn corpus_stats(
    dir: &Path,
    extensions: &[String],
    chunker: &Chunker,
) -> KnowledgeResult<CorpusStats> {
    let documents = load_documents(dir, extensions)?;
    let mut stats = CorpusStats::default();

    for document in &documents {
        let file = FileStats {
            source: document.source.clone(),
            chars: document.text.chars().count(),
            words: document.text.split_whitespace().count(),
            chunks: chunker.split_document(document).len(),
        };

        stats.total_chars += file.chars;
        stats.total_words += file.words;
        stats.total_chunks += file.chunks;
        stats.files.push(file);
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn txt() -> Vec<String> {
        vec!["txt".to_string()]
    }

    #[test]
    fn test_lists_only_accepted_files_sorted() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("b.txt"), "b").unwrap();
        fs::write(temp.path().join("a.TXT"), "a").unwrap();
        fs::write(temp.path().join("notes.md"), "m").unwrap();
        fs::create_dir(temp.path().join("nested.txt")).unwrap();
        fs::write(temp.path().join("nested.txt").join("inner.txt"), "x").unwrap();

        let files = list_corpus_files(temp.path(), &txt()).unwrap();
        let names: Vec<_> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a.TXT", "b.txt"]);
    }

    #[test]
    fn test_extension_with_leading_dot() {
        assert!(has_accepted_extension("guide.md", &[".md".to_string()]));
        assert!(!has_accepted_extension("guidemd", &["md".to_string()]));
    }

    #[test]
    fn test_missing_directory_is_corpus_unavailable() {
        let temp = TempDir::new().unwrap();
        let result = list_corpus_files(&temp.path().join("missing"), &txt());
        assert!(matches!(result, Err(KnowledgeError::CorpusUnavailable { .. })));
    }

    #[test]
    fn test_load_documents_tags_source() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("guide.txt"), "Breathe slowly.").unwrap();

        let docs = load_documents(temp.path(), &txt()).unwrap();
        assert_eq!(docs, vec![Document::new("guide.txt", "Breathe slowly.")]);
    }

    #[test]
    fn test_invalid_utf8_is_decoded_lossily() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("bad.txt"), [b'o', b'k', 0xff, b'!']).unwrap();

        let docs = load_documents(temp.path(), &txt()).unwrap();
        assert_eq!(docs.len(), 1);
        assert!(docs[0].text.starts_with("ok"));
        assert!(docs[0].text.ends_with('!'));
    }

    #[test]
    fn test_empty_directory_yields_no_documents() {
        let temp = TempDir::new().unwrap();
        assert!(load_documents(temp.path(), &txt()).unwrap().is_empty());
    }

    #[test]
    fn test_corpus_stats_totals() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.txt"), "one two three").unwrap();
        fs::write(temp.path().join("b.txt"), "four five").unwrap();

        let chunker = Chunker::new(800, 150).unwrap();
        let stats = corpus_stats(temp.path(), &txt(), &chunker).unwrap();

        assert_eq!(stats.files.len(), 2);
        assert_eq!(stats.total_words, 5);
        assert_eq!(stats.total_chars, 22);
        assert_eq!(stats.total_chunks, 2);
    }
}
