//! The RFC 959 User Name (`USER`) command.

use super::CmdResult;
use crate::server::controlchan::ReplyCode;
use crate::server::session::Session;

pub(super) async fn handle(session: &mut Session, arg: &str) -> CmdResult {
    // A fresh USER drops any prior login; PASS must follow.
    session.authenticated = false;
    session.user = arg.to_string();
    session
        .reply(ReplyCode::NeedPassword, "Please specify the password.")
        .await
}
