//! The RFC 959 Change To Parent Directory (`CDUP`) command.

use super::{cwd, CmdResult};
use crate::server::session::Session;

pub(super) async fn handle(session: &mut Session, _arg: &str) -> CmdResult {
    cwd::handle(session, "..").await
}
