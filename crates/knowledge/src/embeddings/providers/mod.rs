pub mod hash;
pub mod trigram;

pub use hash::HashEmbedder;
pub use trigram::TrigramEmbedder;
