//! The control-channel error type.

use thiserror::Error;

/// Errors a command handler or the control loop can produce.
///
/// Only transport-level failures tear the session down; everything else is
/// logged with the session id and the loop keeps serving commands.
#[derive(Debug, Error)]
pub enum ControlChanError {
    /// I/O failure on the control stream.
    #[error("control channel i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The TLS handshake on the control channel failed.
    #[error("TLS negotiation failed: {0}")]
    Tls(#[source] std::io::Error),

    /// A storage operation failed; already answered on the wire, kept for
    /// the session log.
    #[error(transparent)]
    Storage(#[from] crate::storage::Error),

    /// Setting up or using a data connection failed. The control channel
    /// is unaffected.
    #[error("data channel error: {0}")]
    Data(#[source] std::io::Error),

    /// The session reached a state the protocol rules out.
    #[error("control channel in illegal state: {0}")]
    IllegalState(&'static str),
}

impl ControlChanError {
    /// Whether the session must be closed.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ControlChanError::Io(_) | ControlChanError::Tls(_))
    }
}
