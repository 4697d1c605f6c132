#![forbid(unsafe_code)]
//! An FTP(S) server library for Rust
//!
//! kftpd is an embeddable FTP server with pluggable storage back-ends. It
//! speaks RFC 959 plus the usual extensions (AUTH TLS, EPSV, MLSD/MLST,
//! MDTM/MFMT, FEAT, UTF8) and serves a per-user virtual filesystem from
//! either local disk or an object store with directory-marker emulation.
//!
//! # Quick Start
//!
//! ```no_run
//! use kftpd::{Config, Server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut config = Config::default();
//!     config.bind = "127.0.0.1:2121".to_string();
//!     config.disk.root_path = std::env::temp_dir().display().to_string();
//!
//!     Server::new(config).unwrap().listen().await.unwrap();
//! }
//! ```
//!
//! Configuration loading, logging sinks and process packaging are the
//! embedder's business: the server receives a fully materialized [`Config`],
//! an optional [`slog::Logger`] and an optional set of [`Hooks`].

pub mod config;
pub mod hooks;
pub mod server;
pub mod storage;

pub use crate::config::Config;
pub use crate::hooks::Hooks;
pub use crate::server::Server;
