//! File exchange: profile photos and medical reports in object storage.

mod keys;
mod store;

pub use keys::*;
pub use store::*;

use thiserror::Error;

/// File exchange errors.
#[derive(Error, Debug)]
pub enum FileError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid storage key: {0}")]
    InvalidKey(String),
}

pub type FileResult<T> = Result<T, FileError>;
