/// Shared error type used across all Skerry crates.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// An operation was issued through a session handle that has already
    /// ended.  Never retried; the caller must stop using the handle.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    #[error("config: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
