use derive_more::Display;
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The error returned by storage drivers.
#[derive(Debug, Error)]
#[error("storage error: {kind}")]
pub struct Error {
    kind: ErrorKind,
    #[source]
    source: Option<BoxError>,
}

impl Error {
    /// Creates a new storage error wrapping an underlying cause.
    pub fn new<E>(kind: ErrorKind, error: E) -> Error
    where
        E: Into<BoxError>,
    {
        Error {
            kind,
            source: Some(error.into()),
        }
    }

    /// What went wrong, in terms the protocol engine can map to a reply.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error { kind, source: None }
    }
}

/// The `ErrorKind` variants storage drivers can produce.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Display)]
pub enum ErrorKind {
    /// The path does not exist in the back-end.
    #[display(fmt = "not found")]
    NotFound,
    /// The back-end denied access to the path.
    #[display(fmt = "permission denied")]
    PermissionDenied,
    /// The operation needs a directory but the path is a file.
    #[display(fmt = "not a directory")]
    NotADirectory,
    /// The operation needs a file but the path is a directory.
    #[display(fmt = "is a directory")]
    IsADirectory,
    /// The back-end cannot perform the operation at all.
    #[display(fmt = "not supported")]
    Unsupported,
    /// The back-end ran out of space.
    #[display(fmt = "insufficient storage")]
    InsufficientStorage,
    /// Any other I/O or transport failure; the original message is kept as
    /// the error source.
    #[display(fmt = "i/o error")]
    Io,
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied,
            _ => ErrorKind::Io,
        };
        Error::new(kind, err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_mapping() {
        let err: Error = std::io::Error::from(std::io::ErrorKind::NotFound).into();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err: Error = std::io::Error::from(std::io::ErrorKind::PermissionDenied).into();
        assert_eq!(err.kind(), ErrorKind::PermissionDenied);

        let err: Error = std::io::Error::from(std::io::ErrorKind::BrokenPipe).into();
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn keeps_source_message() {
        let cause = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        let err = Error::new(ErrorKind::Io, cause);
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "disk on fire");
    }
}
