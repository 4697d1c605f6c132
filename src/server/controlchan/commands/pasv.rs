//! The RFC 959 Passive (`PASV`) command, also serving EPSV requests.
//
// Reserves a random ephemeral listener in the configured range and tells
// the client where to connect. The accept runs in a task of its own: the
// reply must go out before the client will ever dial in. Whatever the
// accept's outcome, the task signals the session rendezvous so a
// following transfer command can proceed deterministically.

use super::CmdResult;
use crate::server::controlchan::{ControlChanError, ReplyCode};
use crate::server::datachan;
use crate::server::session::Session;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use tokio::time::{Duration, Instant};

pub(super) async fn handle(session: &mut Session, _arg: &str) -> CmdResult {
    if !session.config.pasv.enable {
        return session
            .reply(ReplyCode::ServiceNotAvailable, "PASV command is disabled.")
            .await;
    }

    if !session.hooks.allow_pasv(&session.user) {
        return session.reply(ReplyCode::FileError, "Not Allowed.").await;
    }

    let Some(ip) = advertised_ip(session) else {
        return session
            .reply(ReplyCode::ServiceNotAvailable, "PASV requires an IPv4 control connection.")
            .await;
    };

    let pasv = &session.config.pasv;
    let (listener, port) = datachan::acquire_listener(pasv.port_start, pasv.port_end)
        .await
        .map_err(ControlChanError::Data)?;
    session.data.set_pasv_port(port).await;

    // The accept deadline runs from now, not from the transfer command
    // that eventually consumes the connection.
    let deadline = Instant::now() + Duration::from_secs(pasv.listen_timeout);
    datachan::spawn_accept(
        listener,
        deadline,
        Arc::clone(&session.data),
        session.data_ready_tx.clone(),
        session.logger.clone(),
    );

    let octets = ip.octets();
    let p1 = port >> 8;
    let p2 = port & 0xff;
    session
        .reply(
            ReplyCode::EnteringPassiveMode,
            format!(
                "Entering Passive Mode ({},{},{},{},{},{}).",
                octets[0], octets[1], octets[2], octets[3], p1, p2
            ),
        )
        .await
}

/// The address put in the 227 reply: the configured passive IP, or the
/// control connection's local address.
fn advertised_ip(session: &Session) -> Option<Ipv4Addr> {
    let configured = &session.config.pasv.ip;
    if !configured.is_empty() {
        if let Ok(ip) = configured.parse() {
            return Some(ip);
        }
    }
    match session.local_addr.ip() {
        IpAddr::V4(ip) => Some(ip),
        IpAddr::V6(_) => None,
    }
}
