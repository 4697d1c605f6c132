//! The RFC 959 Make Directory (`MKD`/`XMKD`) command.

use super::CmdResult;
use crate::server::controlchan::ReplyCode;
use crate::server::session::Session;

pub(super) async fn handle(session: &mut Session, arg: &str) -> CmdResult {
    let path = session.resolve(arg);

    let made = session.driver()?.make_dir(&path).await;
    if let Err(e) = made {
        session
            .reply(ReplyCode::FileError, "Create directory operation failed.")
            .await?;
        return Err(e.into());
    }

    session
        .reply(ReplyCode::DirCreated, format!("\"{}\" created", quote(&path)))
        .await
}

// RFC 959: double-quotes inside the quoted path are doubled.
fn quote(path: &str) -> String {
    if !path.contains('"') {
        return path.to_string();
    }
    path.replace('"', "\"\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn quoting() {
        assert_eq!(quote("/plain"), "/plain");
        assert_eq!(quote("/has\"quote"), "/has\"\"quote");
    }
}
