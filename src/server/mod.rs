//! The FTP server: accept loop, per-session control loop, data channel.

pub(crate) mod controlchan;
pub(crate) mod datachan;
mod error;
mod ftpserver;
pub(crate) mod session;
pub(crate) mod tls;

pub use error::ServerError;
pub use ftpserver::Server;
