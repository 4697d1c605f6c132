//! The RFC 959 Site Parameters (`SITE`) command. No vendor extensions.

use super::CmdResult;
use crate::server::controlchan::ReplyCode;
use crate::server::session::Session;

pub(super) async fn handle(session: &mut Session, _arg: &str) -> CmdResult {
    session.reply(ReplyCode::CommandOkayNotImplemented, "kftpd").await
}
