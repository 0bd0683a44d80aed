//! Error types for huff-tree

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HuffError {
    #[error("invalid magic number {found:#010x}")]
    BadMagic { found: u32 },

    #[error("bit reading failed: stream ended inside {context}")]
    Truncated { context: &'static str },

    #[error("tree header holds out-of-range symbol {0}")]
    InvalidSymbol(u32),

    #[error("malformed tree header: {0}")]
    MalformedTree(String),

    #[error("no code assigned to symbol {0}")]
    MissingCode(u16),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
