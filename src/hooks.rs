//! Callback hooks invoked at the protocol's contract points.
//!
//! Every hook is optional; an absent "before" hook allows the operation and
//! an absent "after" hook is a no-op. A "before" hook returning `false`
//! makes the command reply `550 Not Allowed.`.

/// A predicate hook over `(user, password)` or `(user, path)` style inputs.
type Check1 = Box<dyn Fn(&str) -> bool + Send + Sync>;
type Check2 = Box<dyn Fn(&str, &str) -> bool + Send + Sync>;
type Check3 = Box<dyn Fn(&str, &str, &str) -> bool + Send + Sync>;
type Notify1 = Box<dyn Fn(&str) + Send + Sync>;
type Notify2 = Box<dyn Fn(&str, &str) + Send + Sync>;
type Notify3 = Box<dyn Fn(&str, &str, &str) + Send + Sync>;

/// The set of optional callbacks a server instance carries.
///
/// When `user_before_login` is present it *replaces* the static credential
/// map as the credential source.
#[derive(Default)]
pub struct Hooks {
    /// Called with `(user, password)` on PASS; returning true grants login.
    pub user_before_login: Option<Check2>,
    /// Called with the user name after a successful login.
    pub user_after_login: Option<Notify1>,

    /// Called with the user name before a passive listener is opened.
    pub client_before_pasv: Option<Check1>,
    /// Called with the user name before an active-mode dial.
    pub client_before_port: Option<Check1>,

    /// Called with `(user, path)` before STOR writes.
    pub file_before_put: Option<Check2>,
    /// Called with `(user, path)` after STOR completes.
    pub file_after_put: Option<Notify2>,

    /// Called with `(user, path)` before RETR reads.
    pub file_before_get: Option<Check2>,
    /// Called with `(user, path)` after RETR completes.
    pub file_after_get: Option<Notify2>,

    /// Called with `(user, path)` before DELE removes a file.
    pub file_before_delete: Option<Check2>,
    /// Called with `(user, path)` after DELE removes a file.
    pub file_after_delete: Option<Notify2>,

    /// Called with `(user, from, to)` before RNTO renames.
    pub file_before_rename: Option<Check3>,
    /// Called with `(user, from, to)` after RNTO renames.
    pub file_after_rename: Option<Notify3>,
}

impl Hooks {
    /// Consults the login hook. `None` means no hook is registered and the
    /// static credential map decides.
    pub(crate) fn check_login(&self, user: &str, password: &str) -> Option<bool> {
        self.user_before_login.as_ref().map(|f| f(user, password))
    }

    pub(crate) fn after_login(&self, user: &str) {
        if let Some(f) = &self.user_after_login {
            f(user);
        }
    }

    pub(crate) fn allow_pasv(&self, user: &str) -> bool {
        self.client_before_pasv.as_ref().map_or(true, |f| f(user))
    }

    pub(crate) fn allow_port(&self, user: &str) -> bool {
        self.client_before_port.as_ref().map_or(true, |f| f(user))
    }

    pub(crate) fn allow_put(&self, user: &str, path: &str) -> bool {
        self.file_before_put.as_ref().map_or(true, |f| f(user, path))
    }

    pub(crate) fn after_put(&self, user: &str, path: &str) {
        if let Some(f) = &self.file_after_put {
            f(user, path);
        }
    }

    pub(crate) fn allow_get(&self, user: &str, path: &str) -> bool {
        self.file_before_get.as_ref().map_or(true, |f| f(user, path))
    }

    pub(crate) fn after_get(&self, user: &str, path: &str) {
        if let Some(f) = &self.file_after_get {
            f(user, path);
        }
    }

    pub(crate) fn allow_delete(&self, user: &str, path: &str) -> bool {
        self.file_before_delete.as_ref().map_or(true, |f| f(user, path))
    }

    pub(crate) fn after_delete(&self, user: &str, path: &str) {
        if let Some(f) = &self.file_after_delete {
            f(user, path);
        }
    }

    pub(crate) fn allow_rename(&self, user: &str, from: &str, to: &str) -> bool {
        self.file_before_rename.as_ref().map_or(true, |f| f(user, from, to))
    }

    pub(crate) fn after_rename(&self, user: &str, from: &str, to: &str) {
        if let Some(f) = &self.file_after_rename {
            f(user, from, to);
        }
    }
}

impl std::fmt::Debug for Hooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Hooks")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_hooks_allow() {
        let hooks = Hooks::default();
        assert_eq!(hooks.check_login("u", "p"), None);
        assert!(hooks.allow_pasv("u"));
        assert!(hooks.allow_put("u", "/f"));
        assert!(hooks.allow_rename("u", "/a", "/b"));
        hooks.after_login("u");
        hooks.after_delete("u", "/f");
    }

    #[test]
    fn registered_hooks_decide() {
        let hooks = Hooks {
            user_before_login: Some(Box::new(|user, pass| user == "alice" && pass == "secret")),
            file_before_get: Some(Box::new(|_, path| !path.starts_with("/private"))),
            ..Hooks::default()
        };
        assert_eq!(hooks.check_login("alice", "secret"), Some(true));
        assert_eq!(hooks.check_login("alice", "nope"), Some(false));
        assert!(hooks.allow_get("alice", "/pub/x"));
        assert!(!hooks.allow_get("alice", "/private/x"));
    }
}
