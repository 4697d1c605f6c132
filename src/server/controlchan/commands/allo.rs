//! The RFC 959 Allocate (`ALLO`) command. Nothing to pre-allocate.

use super::CmdResult;
use crate::server::controlchan::ReplyCode;
use crate::server::session::Session;

pub(super) async fn handle(session: &mut Session, _arg: &str) -> CmdResult {
    session
        .reply(ReplyCode::CommandOkayNotImplemented, "Obsolete.")
        .await
}
