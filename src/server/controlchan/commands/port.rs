//! The RFC 959 Data Port (`PORT`) command.
//
// The client advertises `h1,h2,h3,h4,p1,p2`; the server dials out and
// deposits the rendezvous token right away, mirroring what the passive
// accept task does.

use super::CmdResult;
use crate::server::controlchan::{ControlChanError, ReplyCode};
use crate::server::datachan;
use crate::server::session::Session;
use tokio::time::Duration;

pub(super) async fn handle(session: &mut Session, arg: &str) -> CmdResult {
    if !session.config.port.enable {
        return session
            .reply(ReplyCode::ServiceNotAvailable, "PORT command is disabled.")
            .await;
    }

    if !session.hooks.allow_port(&session.user) {
        return session.reply(ReplyCode::FileError, "Not Allowed.").await;
    }

    let fields: Vec<&str> = arg.split(',').collect();
    if fields.len() < 6 {
        return session
            .reply(ReplyCode::CommandSyntaxError, "Illegal PORT command.")
            .await;
    }
    let p1: u8 = fields[4].trim().parse().unwrap_or(0);
    let p2: u8 = fields[5].trim().parse().unwrap_or(0);
    let port = u16::from(p1) * 256 + u16::from(p2);
    let ip = fields[..4].join(".");

    let timeout = Duration::from_secs(session.config.port.connect_timeout);
    match datachan::dial((ip, port), timeout).await {
        Ok(conn) => {
            session.data.open(conn).await;
            let _ = session.data_ready_tx.send(()).await;
            session
                .reply(ReplyCode::CommandOkay, "PORT command successful.")
                .await
        }
        Err(e) => {
            session
                .reply(ReplyCode::CommandSyntaxError, "Illegal PORT command.")
                .await?;
            Err(ControlChanError::Data(e))
        }
    }
}
