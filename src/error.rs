use std::string::FromUtf8Error;

/// Errors surfaced by the facade. Everything the metrics engine rejects is
/// passed through untouched; we don't retry or repair anything.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Registration, name validation, label cardinality or label name
    /// mismatches reported by the prometheus engine.
    #[error(transparent)]
    Engine(#[from] prometheus::Error),

    /// The text exposition produced by the engine was not valid UTF-8.
    #[error("metrics exposition is not valid utf-8: {0}")]
    Encoding(#[from] FromUtf8Error),
}

pub type Result<T> = std::result::Result<T, Error>;
