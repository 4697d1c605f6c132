//! The RFC 959 Store (`STOR`) command.

use super::CmdResult;
use crate::server::controlchan::ReplyCode;
use crate::server::session::Session;

pub(super) async fn handle(session: &mut Session, arg: &str) -> CmdResult {
    let result = transfer(session, arg).await;
    session.finish_transfer().await;
    result
}

async fn transfer(session: &mut Session, arg: &str) -> CmdResult {
    let path = session.resolve(arg);

    if !session.hooks.allow_put(&session.user, &path) {
        session.reply(ReplyCode::FileError, "Not Allowed.").await?;
        session.await_data_ready().await;
        return Ok(());
    }

    session.reply(ReplyCode::FileStatusOkay, "Ok to send data.").await?;

    session.await_data_ready().await;
    let Some(conn) = session.data.take().await else {
        return session.reply(ReplyCode::FileError, "Failed to open transfer.").await;
    };

    let offset = session.restart_offset;
    let stored = session.driver()?.put_file(&path, offset, Box::new(conn)).await;
    if let Err(e) = stored {
        session
            .reply(ReplyCode::ConnectionClosed, "Failure reading network stream.")
            .await?;
        return Err(e.into());
    }

    session
        .reply(ReplyCode::ClosingDataConnection, "Transfer complete.")
        .await?;
    session.hooks.after_put(&session.user, &path);
    Ok(())
}
