//! CLI-specific error types

use mediadex_core::Field;
use mediadex_storage::StorageError;
use thiserror::Error;

/// Any failure that ends a CLI invocation.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Core(#[from] mediadex_core::Error),

    #[error("the hash index covers titles only, cannot search {0}")]
    HashFieldUnsupported(Field),

    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}
