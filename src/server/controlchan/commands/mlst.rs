//! The RFC 3659 Machine-Readable Listing (`MLST`) command: facts for a
//! single entry, over the control channel.

use super::CmdResult;
use crate::server::controlchan::ReplyCode;
use crate::server::session::Session;

pub(super) async fn handle(session: &mut Session, arg: &str) -> CmdResult {
    let path = session.resolve(arg);
    let stat = session.driver()?.stat(&path).await;
    match stat {
        Ok(fi) => {
            // The entry line is indented per RFC 3659.
            let line = format!(" {}", Session::facts_row(&fi));
            session
                .reply_multi(ReplyCode::FileActionOkay, "File details:", vec![line], "End")
                .await
        }
        Err(e) => {
            session
                .reply(ReplyCode::FileError, "Could not get file information.")
                .await?;
            Err(e.into())
        }
    }
}
