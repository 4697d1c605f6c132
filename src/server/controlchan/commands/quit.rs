//! The RFC 959 Logout (`QUIT`) command.

use super::CmdResult;
use crate::server::controlchan::ReplyCode;
use crate::server::session::Session;

pub(super) async fn handle(session: &mut Session, _arg: &str) -> CmdResult {
    session.reply(ReplyCode::ClosingControlConnection, "Goodbye.").await?;
    session.quitting = true;
    Ok(())
}
