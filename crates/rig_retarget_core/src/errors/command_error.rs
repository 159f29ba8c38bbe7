use thiserror::Error;

use super::{ConfigurationError, PreconditionError};

/// Failure of a user-triggered command. Either variant means nothing was changed.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Precondition(#[from] PreconditionError),
}
