//! The per-session command loop.

use super::commands;
use super::ReplyCode;
use crate::server::session::Session;
use slog::{info, warn};

/// Banner sent in the 220 greeting and the STAT status block.
pub(crate) const GREETING: &str = "KFtpd";

/// Serves one control connection to completion: greet, then read, dispatch
/// and reply until EOF, a fatal transport error, or QUIT. A single failing
/// command is logged and the loop keeps going.
pub(crate) async fn run(mut session: Session) {
    let logger = session.logger.clone();

    if session.reply(ReplyCode::ServiceReady, GREETING).await.is_err() {
        return;
    }

    loop {
        let cmd = match session.next_command().await {
            None => break,
            Some(Err(e)) => {
                info!(logger, "control channel closed"; "error" => %e);
                break;
            }
            Some(Ok(cmd)) => cmd,
        };

        if cmd.name == "HELP" {
            let lines = commands::names().iter().map(|n| format!(" {}", n)).collect();
            let sent = session
                .reply_multi(
                    ReplyCode::HelpMessage,
                    "The following commands are recognized.",
                    lines,
                    "Help OK.",
                )
                .await;
            if sent.is_err() {
                break;
            }
            continue;
        }

        let Some(entry) = commands::lookup(&cmd.name) else {
            if session
                .reply(ReplyCode::CommandSyntaxError, "Unknown command.")
                .await
                .is_err()
            {
                break;
            }
            continue;
        };

        if entry.auth_required && !session.authenticated {
            if session
                .reply(ReplyCode::NotLoggedIn, "Please login with USER and PASS.")
                .await
                .is_err()
            {
                break;
            }
            continue;
        }

        if let Err(err) = (entry.handler)(&mut session, &cmd.arg).await {
            if err.is_fatal() {
                warn!(logger, "session terminated"; "command" => &cmd.name, "error" => %err);
                break;
            }
            warn!(logger, "command failed"; "command" => &cmd.name, "error" => %err);
        }

        if session.quitting {
            break;
        }
    }

    // Dropping the session closes the control stream, the driver and any
    // data-channel state with it.
}
