//! Engine error types.

use thiserror::Error;

/// Errors surfaced by the asset registry and the revisioner.
///
/// Each error concerns a single asset; none of them abort a run that is
/// already in progress.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RevError {
    #[error("asset path is empty")]
    EmptyPath,

    #[error("asset `{0}` is already registered")]
    Duplicate(String),

    #[error("asset `{0}` is not registered")]
    NotFound(String),
}

pub type Result<T, E = RevError> = std::result::Result<T, E>;
