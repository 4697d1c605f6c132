//! The RFC 959 Delete (`DELE`) command.

use super::CmdResult;
use crate::server::controlchan::ReplyCode;
use crate::server::session::Session;

pub(super) async fn handle(session: &mut Session, arg: &str) -> CmdResult {
    let path = session.resolve(arg);

    if !session.hooks.allow_delete(&session.user, &path) {
        return session.reply(ReplyCode::FileError, "Not Allowed.").await;
    }

    let deleted = session.driver()?.delete_file(&path).await;
    if let Err(e) = deleted {
        session
            .reply(ReplyCode::FileError, "Delete operation failed.")
            .await?;
        return Err(e.into());
    }

    session
        .reply(ReplyCode::FileActionOkay, "Delete operation successful.")
        .await?;
    session.hooks.after_delete(&session.user, &path);
    Ok(())
}
