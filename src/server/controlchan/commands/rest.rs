//! The RFC 3659 Restart (`REST`) command: sets the byte offset the next
//! RETR/STOR/APPE starts from.

use super::CmdResult;
use crate::server::controlchan::ReplyCode;
use crate::server::session::Session;

pub(super) async fn handle(session: &mut Session, arg: &str) -> CmdResult {
    session.restart_offset = arg.trim().parse().unwrap_or(0);
    session
        .reply(
            ReplyCode::FileActionPending,
            format!("Restart position accepted ({}).", session.restart_offset),
        )
        .await
}
