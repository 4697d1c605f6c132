//! The command dispatch table.
//!
//! Each entry pairs a handler with its auth-required flag. Handlers are
//! plain async functions taking the session by exclusive reference; the
//! table is consulted per request line, after the HELP short-circuit and
//! before the auth gate.

mod allo;
mod appe;
mod auth;
mod cdup;
mod clnt;
mod cwd;
mod dele;
mod feat;
mod list;
mod listing;
mod mdtm;
mod mfmt;
mod mkd;
mod mlsd;
mod mlst;
mod nlst;
mod noop;
mod opts;
mod pass;
mod pasv;
mod pbsz;
mod port;
mod prot;
mod pwd;
mod quit;
mod rest;
mod retr;
mod rmd;
mod rnfr;
mod rnto;
mod site;
mod size;
mod stat;
mod stor;
mod syst;
mod type_;
mod user;

use super::ControlChanError;
use crate::server::session::Session;
use futures::future::BoxFuture;
use lazy_static::lazy_static;
use std::collections::HashMap;

pub(crate) type CmdResult = Result<(), ControlChanError>;

/// A first-class command handler.
pub(crate) type CmdHandler = for<'a> fn(&'a mut Session, &'a str) -> BoxFuture<'a, CmdResult>;

/// One row of the dispatch table.
pub(crate) struct CmdEntry {
    pub handler: CmdHandler,
    pub auth_required: bool,
}

macro_rules! cmd {
    ($module:ident, $auth:expr) => {{
        fn call<'a>(session: &'a mut Session, arg: &'a str) -> BoxFuture<'a, CmdResult> {
            Box::pin($module::handle(session, arg))
        }
        CmdEntry {
            handler: call,
            auth_required: $auth,
        }
    }};
}

lazy_static! {
    static ref COMMANDS: HashMap<&'static str, CmdEntry> = {
        let mut m = HashMap::new();

        // Authentication
        m.insert("USER", cmd!(user, false));
        m.insert("PASS", cmd!(pass, false));

        // TLS handling
        m.insert("AUTH", cmd!(auth, false));
        m.insert("PROT", cmd!(prot, false));
        m.insert("PBSZ", cmd!(pbsz, false));

        // Misc
        m.insert("CLNT", cmd!(clnt, false));
        m.insert("FEAT", cmd!(feat, false));
        m.insert("SYST", cmd!(syst, false));
        m.insert("NOOP", cmd!(noop, false));
        m.insert("OPTS", cmd!(opts, false));
        m.insert("QUIT", cmd!(quit, false));

        // File access
        m.insert("SIZE", cmd!(size, true));
        m.insert("STAT", cmd!(stat, true));
        m.insert("MDTM", cmd!(mdtm, true));
        m.insert("MFMT", cmd!(mfmt, true));
        m.insert("RETR", cmd!(retr, true));
        m.insert("STOR", cmd!(stor, true));
        m.insert("APPE", cmd!(appe, true));
        m.insert("DELE", cmd!(dele, true));
        m.insert("RNFR", cmd!(rnfr, true));
        m.insert("RNTO", cmd!(rnto, true));
        m.insert("ALLO", cmd!(allo, true));
        m.insert("REST", cmd!(rest, true));
        m.insert("SITE", cmd!(site, true));

        // Directory handling
        m.insert("CWD", cmd!(cwd, true));
        m.insert("PWD", cmd!(pwd, true));
        m.insert("CDUP", cmd!(cdup, true));
        m.insert("NLST", cmd!(nlst, true));
        m.insert("LIST", cmd!(list, true));
        m.insert("MLSD", cmd!(mlsd, true));
        m.insert("MLST", cmd!(mlst, true));
        m.insert("MKD", cmd!(mkd, true));
        m.insert("XMKD", cmd!(mkd, true));
        m.insert("RMD", cmd!(rmd, true));
        m.insert("XRMD", cmd!(rmd, true));

        // Connection handling
        m.insert("TYPE", cmd!(type_, true));
        m.insert("PASV", cmd!(pasv, true));
        m.insert("EPSV", cmd!(pasv, true));
        m.insert("PORT", cmd!(port, true));

        m
    };
    static ref NAMES: Vec<&'static str> = {
        let mut names: Vec<&'static str> = COMMANDS.keys().copied().collect();
        names.sort_unstable();
        names
    };
}

/// Looks a verb up in the table.
pub(crate) fn lookup(name: &str) -> Option<&'static CmdEntry> {
    COMMANDS.get(name)
}

/// All recognized verbs, sorted; the HELP listing.
pub(crate) fn names() -> &'static [&'static str] {
    &NAMES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_gate_flags() {
        for open in ["USER", "PASS", "AUTH", "PBSZ", "PROT", "CLNT", "FEAT", "SYST", "NOOP", "OPTS", "QUIT"] {
            assert!(!lookup(open).unwrap().auth_required, "{} should not require auth", open);
        }
        for gated in ["SIZE", "RETR", "STOR", "LIST", "PASV", "PORT", "CWD", "MKD", "TYPE"] {
            assert!(lookup(gated).unwrap().auth_required, "{} should require auth", gated);
        }
    }

    #[test]
    fn aliases_present() {
        assert!(lookup("XMKD").is_some());
        assert!(lookup("XRMD").is_some());
        assert!(lookup("EPSV").is_some());
        assert!(lookup("HELP").is_none()); // handled before dispatch
        assert!(lookup("BOGUS").is_none());
    }

    #[test]
    fn names_are_sorted() {
        let names = names();
        let mut sorted = names.to_vec();
        sorted.sort_unstable();
        assert_eq!(names, sorted.as_slice());
        assert!(names.contains(&"RETR"));
    }
}
