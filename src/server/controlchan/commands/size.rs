//! The RFC 3659 File Size (`SIZE`) command.

use super::CmdResult;
use crate::server::controlchan::ReplyCode;
use crate::server::session::Session;

pub(super) async fn handle(session: &mut Session, arg: &str) -> CmdResult {
    let path = session.resolve(arg);
    let stat = session.driver()?.stat(&path).await;
    match stat {
        Ok(fi) => {
            session
                .reply(ReplyCode::FileStatus, format!("{}", fi.size))
                .await
        }
        Err(e) => {
            session
                .reply(ReplyCode::FileError, "Could not get file size.")
                .await?;
            Err(e.into())
        }
    }
}
