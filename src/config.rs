//! The materialized server configuration.
//!
//! kftpd does not load configuration itself; the embedding application
//! builds a [`Config`] (from YAML, environment, flags, whatever) and hands
//! it to [`Server::new`](crate::Server::new).

use std::collections::HashMap;

/// Selects the storage back-end that serves authenticated users.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverKind {
    /// Local filesystem rooted at [`DiskConfig::root_path`].
    Disk,
    /// Object store addressed by [`ObjectConfig`].
    Object,
    /// A [`DriverFactory`](crate::storage::DriverFactory) injected by the
    /// embedder via [`Server::with_driver_factory`](crate::Server::with_driver_factory).
    Custom,
}

/// Passive-mode settings.
#[derive(Debug, Clone)]
pub struct PasvConfig {
    /// Whether PASV/EPSV is accepted at all.
    pub enable: bool,
    /// The IP advertised in the 227 reply. Empty means: use the local
    /// address of the control connection.
    pub ip: String,
    /// First port of the ephemeral listener range (inclusive).
    pub port_start: u16,
    /// Last port of the ephemeral listener range (inclusive).
    pub port_end: u16,
    /// Seconds the passive listener waits for the client to connect.
    pub listen_timeout: u64,
}

/// Active-mode (PORT) settings.
#[derive(Debug, Clone)]
pub struct PortConfig {
    /// Whether PORT is accepted at all.
    pub enable: bool,
    /// Seconds allowed for the outbound dial to the client's address.
    pub connect_timeout: u64,
}

/// Settings for the local-filesystem back-end.
#[derive(Debug, Clone)]
pub struct DiskConfig {
    /// Directory under which all user homes live.
    pub root_path: String,
}

/// Settings for the object-store back-end.
#[derive(Debug, Clone)]
pub struct ObjectConfig {
    /// Store endpoint, `host:port`.
    pub endpoint: String,
    /// Access key identifying the credential pair.
    pub access_key: String,
    /// Secret key used to sign requests.
    pub secret_key: String,
    /// Bucket all keys live in.
    pub bucket: String,
    /// Talk https to the endpoint.
    pub tls: bool,
}

/// Explicit-TLS (AUTH TLS) settings for the control channel.
#[derive(Debug, Clone)]
pub struct TlsConfig {
    /// Whether AUTH TLS is offered.
    pub enable: bool,
    /// PEM file with the certificate chain.
    pub cert_path: String,
    /// PEM file with the private key.
    pub key_path: String,
}

/// The full server configuration. Immutable once the server is running.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the control-channel listener binds, `host:port`.
    pub bind: String,
    /// Which storage back-end serves logged-in users.
    pub driver: DriverKind,
    /// Give every user a private home directory named after the user. When
    /// false all users share the back-end root.
    pub home_dir: bool,
    /// Emit debug-level send/recv logging for every session.
    pub debug: bool,
    /// Passive-mode block.
    pub pasv: PasvConfig,
    /// Active-mode block.
    pub port: PortConfig,
    /// Filesystem back-end block.
    pub disk: DiskConfig,
    /// Object-store back-end block.
    pub object: ObjectConfig,
    /// Control-channel TLS block.
    pub tls: TlsConfig,
    /// Static user -> password map consulted by PASS when no login hook is
    /// registered.
    pub users: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        let mut users = HashMap::new();
        users.insert("kftpd".to_string(), "kftpd".to_string());

        Config {
            bind: "0.0.0.0:2121".to_string(),
            driver: DriverKind::Disk,
            home_dir: true,
            debug: false,
            pasv: PasvConfig {
                enable: true,
                ip: String::new(),
                port_start: 21000,
                port_end: 21100,
                listen_timeout: 10,
            },
            port: PortConfig {
                enable: true,
                connect_timeout: 10,
            },
            disk: DiskConfig {
                root_path: "kftpd-data".to_string(),
            },
            object: ObjectConfig {
                endpoint: "127.0.0.1:9000".to_string(),
                access_key: String::new(),
                secret_key: String::new(),
                bucket: "kftpd-data".to_string(),
                tls: false,
            },
            tls: TlsConfig {
                enable: false,
                cert_path: String::new(),
                key_path: String::new(),
            },
            users,
        }
    }
}
