//! The RFC 959 System (`SYST`) command.

use super::CmdResult;
use crate::server::controlchan::ReplyCode;
use crate::server::session::Session;

pub(super) async fn handle(session: &mut Session, _arg: &str) -> CmdResult {
    session.reply(ReplyCode::SystemType, "UNIX Type: L8").await
}
