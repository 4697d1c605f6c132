//! The RFC 2228 Data Channel Protection Level (`PROT`) command.

use super::CmdResult;
use crate::server::controlchan::ReplyCode;
use crate::server::session::Session;

pub(super) async fn handle(session: &mut Session, arg: &str) -> CmdResult {
    if !session.tls_active {
        return session.reply(ReplyCode::FileError, "Permission denied.").await;
    }
    if arg == "P" {
        session.reply(ReplyCode::CommandOkay, "OK").await
    } else {
        session
            .reply(ReplyCode::ProtLevelNotSupported, "Only P level is supported.")
            .await
    }
}
