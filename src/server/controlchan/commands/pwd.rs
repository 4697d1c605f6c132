//! The RFC 959 Print Working Directory (`PWD`) command.

use super::CmdResult;
use crate::server::controlchan::ReplyCode;
use crate::server::session::Session;

pub(super) async fn handle(session: &mut Session, _arg: &str) -> CmdResult {
    let reply = format!("\"{}\"", session.current_path);
    session.reply(ReplyCode::DirCreated, reply).await
}
