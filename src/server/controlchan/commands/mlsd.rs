//! The RFC 3659 Machine-Readable Directory Listing (`MLSD`) command.

use super::listing::{self, ListFormat};
use super::CmdResult;
use crate::server::session::Session;

pub(super) async fn handle(session: &mut Session, arg: &str) -> CmdResult {
    listing::handle(session, arg, ListFormat::Facts).await
}
