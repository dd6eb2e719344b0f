//! Error types for send-pack operations.

use bstr::BString;
use gix_sync_core::Kind;

/// Result type alias for send-pack operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for send-pack sessions and push.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A shared protocol or storage failure.
    #[error(transparent)]
    Core(#[from] gix_sync_core::Error),
    /// The remote does not advertise the branch the push targets.
    #[error("remote branch not found: {name}")]
    RemoteBranchNotFound {
        /// Full path of the missing remote ref.
        name: BString,
    },
    /// The local source branch does not exist.
    #[error("source branch not found: {name}")]
    SourceBranchNotFound {
        /// Full path of the missing local ref.
        name: BString,
    },
    /// The differ found nothing the remote is missing; the push is refused
    /// rather than silently accepted.
    #[error("nothing to update")]
    NothingToUpdate,
}

impl Error {
    /// Fast classification helper returning a stable error kind.
    pub fn kind(&self) -> Kind {
        match self {
            Error::Core(err) => err.kind(),
            Error::RemoteBranchNotFound { .. } | Error::SourceBranchNotFound { .. } => {
                Kind::BranchNotFound
            }
            Error::NothingToUpdate => Kind::NothingToUpdate,
        }
    }
}
