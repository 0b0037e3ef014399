//! Text chunking with configurable size and overlap.
//!
//! Sizes are counted in characters (Unicode scalar values). Each chunk is a
//! raw slice of its document, so the chunks of a document, with overlapped
//! regions removed, concatenate back to the exact original text.

use crate::config::ChunkingConfig;
use crate::error::KnowledgeResult;
use crate::types::{Chunk, Document};
use std::collections::HashSet;
use unicode_segmentation::UnicodeSegmentation;

/// Splits documents into overlapping, boundary-aware chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl Chunker {
    /// Fails with `InvalidChunkConfig` unless `0 <= chunk_overlap < chunk_size`.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> KnowledgeResult<Self> {
        Self::from_config(&ChunkingConfig {
            chunk_size,
            chunk_overlap,
        })
    }

    pub fn from_config(config: &ChunkingConfig) -> KnowledgeResult<Self> {
        config.validate()?;
        Ok(Self {
            chunk_size: config.chunk_size,
            chunk_overlap: config.chunk_overlap,
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// Split every document, keeping document order.
    pub fn split(&self, documents: &[Document]) -> Vec<Chunk> {
        let chunks: Vec<Chunk> = documents
            .iter()
            .flat_map(|doc| self.split_document(doc))
            .collect();

        tracing::debug!(
            "Split {} documents into {} chunks (size={}, overlap={})",
            documents.len(),
            chunks.len(),
            self.chunk_size,
            self.chunk_overlap
        );

        chunks
    }

    /// Split one document. Empty or whitespace-only text yields no chunks.
    pub fn split_document(&self, document: &Document) -> Vec<Chunk> {
        let text = document.text.as_str();
        if text.trim().is_empty() {
            return Vec::new();
        }

        let doc = CharText::new(text);
        let mut chunks = Vec::new();
        let mut start = 0;

        loop {
            let hard_end = (start + self.chunk_size).min(doc.len());
            let end = if hard_end == doc.len() {
                hard_end
            } else {
                self.find_break(&doc, start, hard_end)
            };

            chunks.push(Chunk {
                text: doc.slice(start, end).to_string(),
                source: document.source.clone(),
                sequence_index: chunks.len() as u32,
                span: (doc.byte(start), doc.byte(end)),
            });

            if end == doc.len() {
                break;
            }
            start = self.next_start(&doc, end);
        }

        chunks
    }

    /// Pick the chunk end in `[start + overlap + 1, hard_end]`, preferring a
    /// paragraph break, then a line break, a sentence boundary, whitespace,
    /// and finally a hard cut.
    ///
    /// Structural breaks only count once the chunk is at least half full.
    fn find_break(&self, doc: &CharText, start: usize, hard_end: usize) -> usize {
        let lo = start + self.chunk_overlap + 1;
        let filled = lo.max(start + self.chunk_size / 2);

        let last_from = |from: usize, accept: &dyn Fn(usize) -> bool| {
            (from..=hard_end).rev().find(|&e| accept(e))
        };
        let last = |accept: &dyn Fn(usize) -> bool| last_from(filled, accept);

        let paragraph = |e: usize| e >= start + 2 && doc.at(e - 1) == '\n' && doc.at(e - 2) == '\n';
        let line = |e: usize| doc.at(e - 1) == '\n';
        let sentences = doc.sentence_starts(start, hard_end);
        let sentence = |e: usize| sentences.contains(&e);
        let space = |e: usize| doc.at(e - 1).is_whitespace();

        last(&paragraph)
            .or_else(|| last(&line))
            .or_else(|| last(&sentence))
            .or_else(|| last_from(lo, &space))
            .unwrap_or(hard_end)
    }

    /// Start of the chunk following one that ends at `end`.
    ///
    /// Steps back `chunk_overlap` chars, then moves forward to the next word
    /// start if that lands mid-word and a word start exists before `end`.
    fn next_start(&self, doc: &CharText, end: usize) -> usize {
        let next = end - self.chunk_overlap;
        if next == end || doc.is_word_start(next) {
            return next;
        }
        (next + 1..end)
            .find(|&p| doc.is_word_start(p))
            .unwrap_or(next)
    }
}

/// Split documents with the given size and overlap.
pub fn split(
    documents: &[Document],
    chunk_size: usize,
    chunk_overlap: usize,
) -> KnowledgeResult<Vec<Chunk>> {
    Ok(Chunker::new(chunk_size, chunk_overlap)?.split(documents))
}

/// Char-indexed view of a string that maps back to byte offsets.
struct CharText<'a> {
    text: &'a str,
    chars: Vec<char>,
    offsets: Vec<usize>,
}

impl<'a> CharText<'a> {
    fn new(text: &'a str) -> Self {
        let (offsets, chars) = text.char_indices().unzip();
        Self {
            text,
            chars,
            offsets,
        }
    }

    fn len(&self) -> usize {
        self.chars.len()
    }

    fn at(&self, idx: usize) -> char {
        self.chars[idx]
    }

    fn byte(&self, idx: usize) -> usize {
        self.offsets.get(idx).copied().unwrap_or(self.text.len())
    }

    fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.text[self.byte(start)..self.byte(end)]
    }

    fn is_word_start(&self, idx: usize) -> bool {
        !self.chars[idx].is_whitespace() && (idx == 0 || self.chars[idx - 1].is_whitespace())
    }

    /// Char positions inside `(start, end)` where a new sentence begins.
    fn sentence_starts(&self, start: usize, end: usize) -> HashSet<usize> {
        let base = self.byte(start);
        self.slice(start, end)
            .split_sentence_bound_indices()
            .filter(|(offset, _)| *offset > 0)
            .filter_map(|(offset, _)| self.offsets.binary_search(&(base + offset)).ok())
            .collect()
    }
}
