//! Error and classification types shared by the synchronization crates.

use bstr::BString;
use gix_hash::ObjectId;

/// Result type alias for operations in this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Stable high-level error classification for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// A protocol line that could not be parsed.
    Malformed,
    /// The peer reported an error of its own.
    Remote,
    /// A ref or object was not found.
    NotFound,
    /// An object was loaded under the wrong expected type.
    TypeMismatch,
    /// The transport ended in the middle of an exchange.
    Disconnected,
    /// A push computed an empty object set.
    NothingToUpdate,
    /// A source or target branch is missing.
    BranchNotFound,
    /// The repository collaborator failed.
    Storage,
    /// Any other protocol-level violation.
    Protocol,
}

/// Error type for the shared synchronization primitives.
///
/// The session crates wrap this and add their own operation-specific
/// variants; every error ends up in the operation's returned `Result`, never
/// silently recovered and never retried at this layer.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An advertisement line that is neither a ref line nor a remote error
    /// line.
    #[error("invalid advertisement line: {line:?}")]
    MalformedLine {
        /// The offending line, verbatim.
        line: BString,
    },
    /// The remote reported an error; its message is surfaced verbatim.
    #[error("{message}")]
    Remote {
        /// The remote's error line, verbatim.
        message: BString,
    },
    /// The transport disconnected in the middle of an exchange.
    #[error("transport disconnected")]
    Disconnected,
    /// The peer sent a frame the current protocol phase does not allow.
    #[error("protocol error: {0}")]
    Protocol(String),
    /// An object was not present in the object database.
    #[error("object not found: {oid}")]
    ObjectNotFound {
        /// Hash of the missing object.
        oid: ObjectId,
    },
    /// An object was loaded under a type it does not have.
    #[error("object {oid} is a {actual:?}, expected a {expected:?}")]
    TypeMismatch {
        /// Hash of the object.
        oid: ObjectId,
        /// The type the caller asked for.
        expected: gix_object::Kind,
        /// The type actually stored.
        actual: gix_object::Kind,
    },
    /// A ref was not present in ref storage.
    #[error("ref not found: {name}")]
    RefNotFound {
        /// Full path of the missing ref.
        name: BString,
    },
    /// The repository collaborator failed for a reason of its own.
    #[error("storage error: {0}")]
    Storage(String),
}

impl Error {
    /// Fast classification helper returning a stable error kind.
    pub fn kind(&self) -> Kind {
        match self {
            Error::MalformedLine { .. } => Kind::Malformed,
            Error::Remote { .. } => Kind::Remote,
            Error::Disconnected => Kind::Disconnected,
            Error::Protocol(_) => Kind::Protocol,
            Error::ObjectNotFound { .. } | Error::RefNotFound { .. } => Kind::NotFound,
            Error::TypeMismatch { .. } => Kind::TypeMismatch,
            Error::Storage(_) => Kind::Storage,
        }
    }
}
