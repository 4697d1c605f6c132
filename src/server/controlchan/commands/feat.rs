//! The RFC 2389 Feature (`FEAT`) command.

use super::CmdResult;
use crate::server::controlchan::ReplyCode;
use crate::server::session::Session;

const FEATURES: &[&str] = &[
    "CLNT",
    "EPSV",
    "MDTM",
    "MFMT",
    "MLSD",
    "MLST",
    "PASV",
    "PBSZ",
    "PROT",
    "REST STREAM",
    "SIZE",
    "TVFS",
    "UTF8",
];

pub(super) async fn handle(session: &mut Session, _arg: &str) -> CmdResult {
    let mut feats: Vec<&str> = Vec::with_capacity(FEATURES.len() + 1);
    if session.config.tls.enable {
        feats.push("AUTH TLS");
    }
    feats.extend_from_slice(FEATURES);

    // Each feature line must be indented by a space.
    let lines = feats.iter().map(|f| format!(" {}", f)).collect();
    session
        .reply_multi(ReplyCode::SystemStatus, "Features:", lines, "End")
        .await
}
