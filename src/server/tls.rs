//! TLS material loading for the AUTH TLS control-channel upgrade.

use rustls::{Certificate, PrivateKey, ServerConfig};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;
use std::sync::Arc;
use tokio_rustls::TlsAcceptor;

/// Builds the acceptor used to wrap control streams after `AUTH TLS`.
pub(crate) fn new_acceptor<P: AsRef<Path>>(certs_file: P, key_file: P) -> io::Result<TlsAcceptor> {
    let certs = load_certs(certs_file)?;
    let key = load_private_key(key_file)?;

    let config = ServerConfig::builder()
        .with_safe_defaults()
        .with_no_client_auth()
        .with_single_cert(certs, key)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    Ok(TlsAcceptor::from(Arc::new(config)))
}

fn load_certs<P: AsRef<Path>>(filename: P) -> io::Result<Vec<Certificate>> {
    let certfile = File::open(filename)?;
    let mut reader = BufReader::new(certfile);
    let certs = rustls_pemfile::certs(&mut reader)?;
    if certs.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "no certificates found in PEM file",
        ));
    }
    Ok(certs.into_iter().map(Certificate).collect())
}

fn load_private_key<P: AsRef<Path>>(filename: P) -> io::Result<PrivateKey> {
    let pkcs8_keys = {
        let keyfile = File::open(&filename)?;
        let mut reader = BufReader::new(keyfile);
        rustls_pemfile::pkcs8_private_keys(&mut reader)?
    };

    let rsa_keys = {
        let keyfile = File::open(&filename)?;
        let mut reader = BufReader::new(keyfile);
        rustls_pemfile::rsa_private_keys(&mut reader)?
    };

    // Prefer pkcs8 keys.
    let key = pkcs8_keys
        .into_iter()
        .next()
        .or_else(|| rsa_keys.into_iter().next())
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "no private key found in PEM file"))?;

    Ok(PrivateKey(key))
}
