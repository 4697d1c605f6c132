//! The RFC 959 Status (`STAT`) command.
//
// Without an argument: a session status block over the control channel.
// With a path: the listing rows for the directory, or the single row for
// a file, again over the control channel.

use super::CmdResult;
use crate::server::controlchan::ReplyCode;
use crate::server::session::Session;

pub(super) async fn handle(session: &mut Session, arg: &str) -> CmdResult {
    if arg.is_empty() {
        let status = vec![
            format!("     Connected to {}", session.local_addr.ip()),
            format!("     Logged in as {}", session.user),
            format!("     TYPE: {}", session.mode),
            "     KFtpd".to_string(),
        ];
        return session
            .reply_multi(ReplyCode::SystemStatus, "FTP server status:", status, "End of status")
            .await;
    }

    let path = session.resolve(arg);
    let mut rows = Vec::new();
    {
        let driver = session.driver()?;
        if let Ok(fi) = driver.stat(&path).await {
            if fi.is_dir {
                let _ = driver
                    .list_dir(&path, &mut |entry| {
                        rows.push(session.list_row(entry));
                        Ok(())
                    })
                    .await;
            } else {
                rows.push(session.list_row(&fi));
            }
        }
    }

    session
        .reply_multi(ReplyCode::FileStatus, "Status follows:", rows, "End of status")
        .await
}
