//! The RFC 4217 Authentication Mechanism (`AUTH`) command.
//
// Upgrades the control channel to TLS. The 234 goes out in plaintext,
// then the handshake runs and the framed stream is swapped for its
// TLS-wrapped self. A failed handshake is fatal to the session.

use super::CmdResult;
use crate::server::controlchan::ReplyCode;
use crate::server::session::Session;

pub(super) async fn handle(session: &mut Session, arg: &str) -> CmdResult {
    if !session.config.tls.enable {
        return session.reply(ReplyCode::FileError, "Auth not enable.").await;
    }

    if !session.tls_active && (arg == "TLS" || arg == "SSL") {
        session
            .reply(ReplyCode::AuthOkayNoDataNeeded, "Proceed with negotiation.")
            .await?;
        session.upgrade_tls().await?;
        return Ok(());
    }

    session
        .reply(ReplyCode::CommandNotImplementedForParameter, "Unknown AUTH type.")
        .await
}
