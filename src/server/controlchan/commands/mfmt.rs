//! The Modify Fact (`MFMT`) command: sets a file's modification time.

use super::CmdResult;
use crate::server::controlchan::ReplyCode;
use crate::server::session::Session;
use chrono::NaiveDateTime;

pub(super) async fn handle(session: &mut Session, arg: &str) -> CmdResult {
    let Some((stamp, path_arg)) = arg.split_once(' ') else {
        return session
            .reply(ReplyCode::CommandSyntaxError, "Illegal MFMT command.")
            .await;
    };

    let mtime = match NaiveDateTime::parse_from_str(stamp, "%Y%m%d%H%M%S") {
        Ok(t) => t.and_utc(),
        Err(_) => {
            return session
                .reply(ReplyCode::CommandSyntaxError, "Illegal MFMT command.")
                .await;
        }
    };

    let path = session.resolve(path_arg);
    let changed = session.driver()?.chtimes(&path, mtime, mtime).await;
    match changed {
        Ok(()) => {
            session
                .reply(
                    ReplyCode::FileStatus,
                    format!("Modify={}; {}", stamp, path_arg),
                )
                .await
        }
        Err(e) => {
            session
                .reply(ReplyCode::FileError, "Could not change file modification time.")
                .await?;
            Err(e.into())
        }
    }
}
