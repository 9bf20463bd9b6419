//! Error types for herald-dispatch.

use thiserror::Error;

use herald_core::Recipient;

/// Failures reported by an [`AlertBackend`](crate::AlertBackend).
#[derive(Debug, Error)]
pub enum BackendError {
    /// The backend answered with a non-success status.
    #[error("alert backend rejected request with status {status}: {body}")]
    Status { status: u16, body: String },

    /// The request never got a response (DNS, connect, TLS, timeout, ...).
    #[error("alert backend transport error: {0}")]
    Transport(#[from] Box<ureq::Transport>),

    /// The request body could not be encoded.
    #[error("failed to encode alert request: {0}")]
    Encode(#[from] serde_json::Error),

    /// The response body could not be read or decoded.
    #[error("failed to read alert backend response: {0}")]
    Decode(#[source] std::io::Error),
}

/// All errors that can arise from [`Dispatcher::send`](crate::Dispatcher::send).
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No credential is configured for the destination's recipient. No call
    /// was made.
    #[error("no API key configured for recipient {recipient}")]
    MissingCredential { recipient: Recipient },

    /// The backend call failed; surfaced as-is.
    #[error(transparent)]
    Backend(#[from] BackendError),
}
