//! The RFC 2389 Options (`OPTS`) command. Only `UTF8 ON` is understood;
//! the server is always in UTF8 mode anyway.

use super::CmdResult;
use crate::server::controlchan::ReplyCode;
use crate::server::session::Session;

pub(super) async fn handle(session: &mut Session, arg: &str) -> CmdResult {
    if arg.to_ascii_uppercase() == "UTF8 ON" {
        return session.reply(ReplyCode::CommandOkay, "Always in UTF8 mode.").await;
    }
    session
        .reply(ReplyCode::ParameterSyntaxError, "Option not understood.")
        .await
}
