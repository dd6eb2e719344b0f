//! Error types for fetch-pack operations.

use gix_sync_core::Kind;

/// Result type alias for fetch-pack operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for fetch-pack sessions and clone.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A shared protocol or storage failure.
    #[error(transparent)]
    Core(#[from] gix_sync_core::Error),
    /// The post-negotiation handshake did not produce the channel pair.
    #[error("protocol error: expected pack and progress channels, got {got}")]
    Handshake {
        /// Description of the frame actually received.
        got: String,
    },
}

impl Error {
    /// Fast classification helper returning a stable error kind.
    pub fn kind(&self) -> Kind {
        match self {
            Error::Core(err) => err.kind(),
            Error::Handshake { .. } => Kind::Protocol,
        }
    }
}
