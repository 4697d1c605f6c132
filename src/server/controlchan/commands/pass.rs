//! The RFC 959 Password (`PASS`) command.
//
// Completes the login the preceding USER began. The credential source is
// the registered login hook when present, otherwise the static user map.
// A successful login binds the storage driver to the session.

use super::CmdResult;
use crate::server::controlchan::ReplyCode;
use crate::server::session::Session;

pub(super) async fn handle(session: &mut Session, arg: &str) -> CmdResult {
    let login_ok = match session.hooks.check_login(&session.user, arg) {
        Some(decision) => decision,
        None => session
            .config
            .users
            .get(&session.user)
            .map_or(false, |password| password == arg),
    };

    if !login_ok {
        return session.reply(ReplyCode::NotLoggedIn, "Login incorrect.").await;
    }

    let home = if session.config.home_dir {
        session.user.clone()
    } else {
        String::new()
    };

    let driver = match session.factory.new_driver(&home).await {
        Ok(driver) => driver,
        Err(e) => {
            // Credentials were fine but storage is not: infrastructure
            // error, the session ends without a further reply.
            session.quitting = true;
            return Err(e.into());
        }
    };

    session.driver = Some(driver);
    session.authenticated = true;
    session.reply(ReplyCode::UserLoggedIn, "Login successful.").await?;
    session.hooks.after_login(&session.user);
    Ok(())
}
