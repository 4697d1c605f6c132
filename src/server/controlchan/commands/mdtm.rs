//! The RFC 3659 Modification Time (`MDTM`) command.

use super::CmdResult;
use crate::server::controlchan::ReplyCode;
use crate::server::session::Session;

pub(super) async fn handle(session: &mut Session, arg: &str) -> CmdResult {
    let path = session.resolve(arg);
    let stat = session.driver()?.stat(&path).await;
    match stat {
        Ok(fi) => {
            session
                .reply(
                    ReplyCode::FileStatus,
                    fi.modified.format("%Y%m%d%H%M%S").to_string(),
                )
                .await
        }
        Err(e) => {
            session
                .reply(ReplyCode::FileError, "Could not get file modification time.")
                .await?;
            Err(e.into())
        }
    }
}
