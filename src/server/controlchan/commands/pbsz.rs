//! The RFC 2228 Protection Buffer Size (`PBSZ`) command.
//
// Only meaningful inside TLS, and only with size 0: TLS does its own
// buffering.

use super::CmdResult;
use crate::server::controlchan::ReplyCode;
use crate::server::session::Session;

pub(super) async fn handle(session: &mut Session, arg: &str) -> CmdResult {
    if session.tls_active && arg == "0" {
        return session.reply(ReplyCode::CommandOkay, "OK").await;
    }
    session.reply(ReplyCode::FileError, "Permission denied.").await
}
