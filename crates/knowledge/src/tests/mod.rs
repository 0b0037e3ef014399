//! Cross-module scenarios over real temporary corpora.

mod retrieval;
