//! The RFC 959 Change Working Directory (`CWD`) command.

use super::CmdResult;
use crate::server::controlchan::ReplyCode;
use crate::server::session::Session;

pub(super) async fn handle(session: &mut Session, arg: &str) -> CmdResult {
    let path = session.resolve(arg);

    let stat = session.driver()?.stat(&path).await;
    match stat {
        Ok(fi) if fi.is_dir => {
            session.current_path = path;
            session
                .reply(ReplyCode::FileActionOkay, "Directory successfully changed.")
                .await
        }
        Ok(_) => {
            session
                .reply(ReplyCode::FileError, "Failed to change directory.")
                .await
        }
        Err(e) => {
            session
                .reply(ReplyCode::FileError, "Failed to change directory.")
                .await?;
            Err(e.into())
        }
    }
}
