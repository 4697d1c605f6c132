//! The `CLNT` command: records the client's self-identification.

use super::CmdResult;
use crate::server::controlchan::ReplyCode;
use crate::server::session::Session;

pub(super) async fn handle(session: &mut Session, arg: &str) -> CmdResult {
    session.client_ident = arg.to_string();
    session.reply(ReplyCode::CommandOkay, "Noted.").await
}
