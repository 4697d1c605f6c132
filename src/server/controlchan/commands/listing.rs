//! Shared plumbing for the listing family (LIST, NLST, MLSD): collect the
//! rows, rendezvous with the data connection, ship the joined lines.

use super::CmdResult;
use crate::server::controlchan::ReplyCode;
use crate::server::session::Session;
use slog::warn;
use tokio::io::AsyncWriteExt;

/// What each row of the listing carries.
pub(super) enum ListFormat {
    /// `ls -l` style rows.
    Long,
    /// Bare entry names.
    NamesOnly,
    /// RFC 3659 fact rows.
    Facts,
}

pub(super) async fn handle(session: &mut Session, arg: &str, format: ListFormat) -> CmdResult {
    let result = transfer(session, arg, format).await;
    session.finish_transfer().await;
    result
}

async fn transfer(session: &mut Session, arg: &str, format: ListFormat) -> CmdResult {
    let path = session.resolve(arg);

    session
        .reply(ReplyCode::FileStatusOkay, "Here comes the directory listing.")
        .await?;

    let mut rows: Vec<String> = Vec::new();
    let listed = {
        let driver = session.driver()?;
        driver
            .list_dir(&path, &mut |fi| {
                rows.push(match format {
                    ListFormat::Long => session.list_row(fi),
                    ListFormat::NamesOnly => fi.name.clone(),
                    ListFormat::Facts => Session::facts_row(fi),
                });
                Ok(())
            })
            .await
    };

    if let Err(e) = listed {
        session
            .reply(
                ReplyCode::ClosingDataConnection,
                "Transfer done (but failed to open directory).",
            )
            .await?;
        session.await_data_ready().await;
        return Err(e.into());
    }

    session.await_data_ready().await;
    let Some(mut conn) = session.data.take().await else {
        return session.reply(ReplyCode::FileError, "Failed to open transfer.").await;
    };

    let payload = rows.join("\r\n");
    if let Err(e) = conn.write_all(payload.as_bytes()).await {
        warn!(session.logger, "data stream failed during listing"; "error" => %e);
        return session
            .reply(ReplyCode::ConnectionClosed, "Failure writing network stream.")
            .await;
    }
    let _ = conn.shutdown().await;

    session
        .reply(ReplyCode::ClosingDataConnection, "Directory send OK.")
        .await
}
