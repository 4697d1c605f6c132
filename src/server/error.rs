use thiserror::Error;

/// Errors surfaced to the embedder by [`Server`](crate::Server).
#[derive(Debug, Error)]
pub enum ServerError {
    /// The configured driver kind has no bundled factory. `Custom` needs
    /// one injected through `Server::with_driver_factory`.
    #[error("no driver factory for the configured driver kind")]
    MissingDriverFactory,

    /// The filesystem back-end root could not be prepared.
    #[error("failed to prepare storage root: {0}")]
    StorageSetup(#[source] crate::storage::Error),

    /// The TLS certificate or key could not be loaded.
    #[error("failed to load TLS material: {0}")]
    Tls(#[source] std::io::Error),

    /// Binding or accepting on the control port failed.
    #[error("control listener error: {0}")]
    Bind(#[source] std::io::Error),
}
