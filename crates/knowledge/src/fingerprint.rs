//! Content fingerprint of a corpus directory.
//!
//! The digest depends only on filenames and bytes, never on timestamps or
//! other metadata, and files are fed in sorted order so the listing order of
//! the filesystem cannot leak into the result.

use crate::corpus::{list_corpus_files, read_file};
use crate::error::KnowledgeResult;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Compute the hex SHA-256 fingerprint of the accepted files in `dir`.
///
/// For each file in filename order the hasher is fed the filename bytes and
/// then the full file content.
pub fn compute_fingerprint(dir: &Path, extensions: &[String]) -> KnowledgeResult<String> {
    let files = list_corpus_files(dir, extensions)?;
    let mut hasher = Sha256::new();

    for file in &files {
        hasher.update(file.name.as_bytes());
        hasher.update(read_file(file)?);
    }

    let digest = format!("{:x}", hasher.finalize());
    tracing::debug!("Fingerprint of {:?} over {} files: {}", dir, files.len(), digest);
    Ok(digest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KnowledgeError;
    use std::fs;
    use tempfile::TempDir;

    fn txt() -> Vec<String> {
        vec!["txt".to_string()]
    }

    fn corpus(files: &[(&str, &str)]) -> TempDir {
        let temp = TempDir::new().unwrap();
        for (name, content) in files {
            fs::write(temp.path().join(name), content).unwrap();
        }
        temp
    }

    #[test]
    fn test_fingerprint_is_stable() {
        let dir = corpus(&[("a.txt", "alpha"), ("b.txt", "beta")]);
        let first = compute_fingerprint(dir.path(), &txt()).unwrap();
        let second = compute_fingerprint(dir.path(), &txt()).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.len(), 64);
    }

    #[test]
    fn test_creation_order_does_not_matter() {
        let forward = corpus(&[("a.txt", "alpha"), ("b.txt", "beta"), ("c.txt", "gamma")]);
        let backward = corpus(&[("c.txt", "gamma"), ("b.txt", "beta"), ("a.txt", "alpha")]);

        assert_eq!(
            compute_fingerprint(forward.path(), &txt()).unwrap(),
            compute_fingerprint(backward.path(), &txt()).unwrap()
        );
    }

    #[test]
    fn test_single_byte_change_is_detected() {
        let dir = corpus(&[("a.txt", "alpha"), ("b.txt", "beta")]);
        let before = compute_fingerprint(dir.path(), &txt()).unwrap();

        fs::write(dir.path().join("b.txt"), "betb").unwrap();
        let after = compute_fingerprint(dir.path(), &txt()).unwrap();

        assert_ne!(before, after);
    }

    #[test]
    fn test_add_remove_and_rename_are_detected() {
        let dir = corpus(&[("a.txt", "alpha")]);
        let base = compute_fingerprint(dir.path(), &txt()).unwrap();

        fs::write(dir.path().join("b.txt"), "beta").unwrap();
        let added = compute_fingerprint(dir.path(), &txt()).unwrap();
        assert_ne!(base, added);

        fs::remove_file(dir.path().join("b.txt")).unwrap();
        assert_eq!(compute_fingerprint(dir.path(), &txt()).unwrap(), base);

        fs::rename(dir.path().join("a.txt"), dir.path().join("z.txt")).unwrap();
        assert_ne!(compute_fingerprint(dir.path(), &txt()).unwrap(), base);
    }

    #[test]
    fn test_ignored_files_do_not_affect_fingerprint() {
        let dir = corpus(&[("a.txt", "alpha")]);
        let base = compute_fingerprint(dir.path(), &txt()).unwrap();

        fs::write(dir.path().join("notes.md"), "ignored").unwrap();
        assert_eq!(compute_fingerprint(dir.path(), &txt()).unwrap(), base);
    }

    #[test]
    fn test_empty_corpus_has_digest_of_nothing() {
        let dir = corpus(&[]);
        assert_eq!(
            compute_fingerprint(dir.path(), &txt()).unwrap(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_missing_corpus_fails() {
        let temp = TempDir::new().unwrap();
        assert!(matches!(
            compute_fingerprint(&temp.path().join("gone"), &txt()),
            Err(KnowledgeError::CorpusUnavailable { .. })
        ));
    }
}
