//! The RFC 959 Retrieve (`RETR`) command.
//
// Streams a file to the client over the data connection. The hook check
// and the storage open both happen before the 150, so a denied or failed
// retrieve never unblocks the client; both failure paths still drain the
// rendezvous token so the next transfer cannot deadlock.

use super::CmdResult;
use crate::server::controlchan::ReplyCode;
use crate::server::session::Session;
use slog::warn;
use tokio::io::AsyncWriteExt;

pub(super) async fn handle(session: &mut Session, arg: &str) -> CmdResult {
    let result = transfer(session, arg).await;
    session.finish_transfer().await;
    result
}

async fn transfer(session: &mut Session, arg: &str) -> CmdResult {
    let path = session.resolve(arg);

    if !session.hooks.allow_get(&session.user, &path) {
        session.reply(ReplyCode::FileError, "Not Allowed.").await?;
        session.await_data_ready().await;
        return Ok(());
    }

    let offset = session.restart_offset;
    let opened = session.driver()?.get_file(&path, offset).await;
    let (size, mut reader) = match opened {
        Ok(opened) => opened,
        Err(e) => {
            session.reply(ReplyCode::FileError, "Failed to open file.").await?;
            session.await_data_ready().await;
            return Err(e.into());
        }
    };

    session
        .reply(
            ReplyCode::FileStatusOkay,
            format!(
                "Opening {} mode data connection for {} ({} bytes).",
                session.mode, arg, size
            ),
        )
        .await?;

    session.await_data_ready().await;
    let Some(mut conn) = session.data.take().await else {
        return session.reply(ReplyCode::FileError, "Failed to open transfer.").await;
    };

    if let Err(e) = tokio::io::copy(&mut reader, &mut conn).await {
        warn!(session.logger, "data stream failed during RETR"; "error" => %e);
        return session
            .reply(ReplyCode::ConnectionClosed, "Failure writing network stream.")
            .await;
    }
    let _ = conn.shutdown().await;

    session
        .reply(ReplyCode::ClosingDataConnection, "Transfer complete.")
        .await?;
    session.hooks.after_get(&session.user, &path);
    Ok(())
}
