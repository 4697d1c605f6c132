//! The RFC 959 Rename To (`RNTO`) command.
//
// Completes the RNFR/RNTO pair. The pending source path is consumed up
// front: whatever happens, a follow-up RNTO needs a fresh RNFR.

use super::CmdResult;
use crate::server::controlchan::ReplyCode;
use crate::server::session::Session;

pub(super) async fn handle(session: &mut Session, arg: &str) -> CmdResult {
    if session.rename_from.is_empty() {
        return session
            .reply(ReplyCode::BadCommandSequence, "RNFR required first.")
            .await;
    }
    let from = std::mem::take(&mut session.rename_from);
    let to = session.resolve(arg);

    if !session.hooks.allow_rename(&session.user, &from, &to) {
        return session.reply(ReplyCode::FileError, "Not Allowed.").await;
    }

    let renamed = session.driver()?.rename(&from, &to).await;
    if let Err(e) = renamed {
        session.reply(ReplyCode::FileError, "Rename failed.").await?;
        return Err(e.into());
    }

    session
        .reply(ReplyCode::FileActionOkay, "Rename successful.")
        .await?;
    session.hooks.after_rename(&session.user, &from, &to);
    Ok(())
}
