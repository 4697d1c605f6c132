//! The RFC 959 Representation Type (`TYPE`) command.
//
// The selection is recorded and echoed in replies; transfers are
// byte-exact in both modes.

use super::CmdResult;
use crate::server::controlchan::ReplyCode;
use crate::server::session::{Session, TransferMode};

pub(super) async fn handle(session: &mut Session, arg: &str) -> CmdResult {
    match arg {
        "A" | "a" => {
            session.mode = TransferMode::Ascii;
            session.reply(ReplyCode::CommandOkay, "Switching to ASCII mode.").await
        }
        "I" | "i" => {
            session.mode = TransferMode::Binary;
            session.reply(ReplyCode::CommandOkay, "Switching to Binary mode.").await
        }
        _ => {
            session.mode = TransferMode::Unset;
            session
                .reply(ReplyCode::CommandSyntaxError, "Unrecognised TYPE command.")
                .await
        }
    }
}
