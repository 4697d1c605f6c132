//! The RFC 959 Rename From (`RNFR`) command.

use super::CmdResult;
use crate::server::controlchan::ReplyCode;
use crate::server::session::Session;

pub(super) async fn handle(session: &mut Session, arg: &str) -> CmdResult {
    let path = session.resolve(arg);

    let stat = session.driver()?.stat(&path).await;
    if let Err(e) = stat {
        session.reply(ReplyCode::FileError, "RNFR command failed.").await?;
        return Err(e.into());
    }

    session.rename_from = path;
    session
        .reply(ReplyCode::FileActionPending, "Ready for RNTO.")
        .await
}
