//! The RFC 959 Remove Directory (`RMD`/`XRMD`) command.

use super::CmdResult;
use crate::server::controlchan::ReplyCode;
use crate::server::session::Session;

pub(super) async fn handle(session: &mut Session, arg: &str) -> CmdResult {
    let path = session.resolve(arg);

    let removed = session.driver()?.delete_dir(&path).await;
    if let Err(e) = removed {
        session
            .reply(ReplyCode::FileError, "Remove directory operation failed.")
            .await?;
        return Err(e.into());
    }

    session
        .reply(ReplyCode::FileActionOkay, "Remove directory operation successful.")
        .await
}
