//! Per-connection session state.

use crate::config::Config;
use crate::hooks::Hooks;
use crate::server::controlchan::codecs::FtpCodec;
use crate::server::controlchan::command::Command;
use crate::server::controlchan::{ControlChanError, Reply, ReplyCode};
use crate::server::datachan::DataChannel;
use crate::storage::{DriverFactory, FileInfo, StorageDriver};
use futures::{SinkExt, StreamExt};
use slog::{debug, o};
use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_rustls::TlsAcceptor;
use tokio_util::codec::Framed;

/// Object-safe alias for anything the control channel can run over: the
/// raw TCP stream before AUTH TLS, the TLS stream after.
pub(crate) trait ControlIo: AsyncRead + AsyncWrite + Send + Sync + Unpin {}

impl<T: AsyncRead + AsyncWrite + Send + Sync + Unpin> ControlIo for T {}

pub(crate) type CtrlStream = Box<dyn ControlIo>;

/// The transfer type selected with TYPE. No translation is performed in
/// either mode; the selection only shows up in replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TransferMode {
    Ascii,
    Binary,
    Unset,
}

impl fmt::Display for TransferMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferMode::Ascii => f.write_str("ASCII"),
            TransferMode::Binary => f.write_str("BINARY"),
            TransferMode::Unset => Ok(()),
        }
    }
}

/// Everything one control connection owns: protocol state, the framed
/// control stream, the storage driver bound at login, and the
/// data-channel slot plus its rendezvous.
pub(crate) struct Session {
    pub id: u64,
    pub config: Arc<Config>,
    pub hooks: Arc<Hooks>,
    pub factory: Arc<dyn DriverFactory>,
    pub tls_acceptor: Option<TlsAcceptor>,
    pub logger: slog::Logger,

    pub control: Option<Framed<CtrlStream, FtpCodec>>,
    pub local_addr: SocketAddr,

    pub user: String,
    pub client_ident: String,
    pub current_path: String,
    pub mode: TransferMode,
    pub restart_offset: u64,
    pub rename_from: String,
    pub authenticated: bool,
    pub tls_active: bool,
    pub quitting: bool,
    pub driver: Option<Box<dyn StorageDriver>>,

    pub data: Arc<DataChannel>,
    pub data_ready_tx: mpsc::Sender<()>,
    data_ready_rx: mpsc::Receiver<()>,
}

impl Session {
    pub fn new(
        id: u64,
        socket: TcpStream,
        config: Arc<Config>,
        hooks: Arc<Hooks>,
        factory: Arc<dyn DriverFactory>,
        tls_acceptor: Option<TlsAcceptor>,
        logger: &slog::Logger,
    ) -> std::io::Result<Session> {
        let local_addr = socket.local_addr()?;
        let logger = logger.new(o!("session" => id));
        let (data_ready_tx, data_ready_rx) = mpsc::channel(1);
        let data = Arc::new(DataChannel::new(logger.clone(), config.debug));

        Ok(Session {
            id,
            hooks,
            factory,
            tls_acceptor,
            control: Some(Framed::new(Box::new(socket) as CtrlStream, FtpCodec::new())),
            local_addr,
            user: String::new(),
            client_ident: String::new(),
            current_path: "/".to_string(),
            mode: TransferMode::Ascii,
            restart_offset: 0,
            rename_from: String::new(),
            authenticated: false,
            tls_active: false,
            quitting: false,
            driver: None,
            data,
            data_ready_tx,
            data_ready_rx,
            logger,
            config,
        })
    }

    /// The storage driver; present from the moment PASS succeeds until the
    /// session ends.
    pub fn driver(&self) -> Result<&dyn StorageDriver, ControlChanError> {
        self.driver
            .as_deref()
            .ok_or(ControlChanError::IllegalState("no storage driver bound"))
    }

    /// Resolves a client-supplied path against the current directory into
    /// a canonical, `/`-rooted virtual path. Pure string work: `..` never
    /// climbs past the root and nothing touches the back-end.
    pub fn resolve(&self, arg: &str) -> String {
        resolve_virtual(&self.current_path, arg)
    }

    /// Sends a single-line reply.
    pub async fn reply(
        &mut self,
        code: ReplyCode,
        msg: impl Into<String>,
    ) -> Result<(), ControlChanError> {
        self.send(Reply::new(code, msg)).await
    }

    /// Sends a `code-header ... code footer` block.
    pub async fn reply_multi(
        &mut self,
        code: ReplyCode,
        header: impl Into<String>,
        lines: Vec<String>,
        footer: impl Into<String>,
    ) -> Result<(), ControlChanError> {
        self.send(Reply::multi(code, header, lines, footer)).await
    }

    async fn send(&mut self, reply: Reply) -> Result<(), ControlChanError> {
        if self.config.debug {
            debug!(self.logger, "send"; "reply" => ?reply);
        }
        let framed = self
            .control
            .as_mut()
            .ok_or(ControlChanError::IllegalState("control stream detached"))?;
        framed.send(reply).await
    }

    /// Reads the next command line. `None` on EOF.
    pub async fn next_command(&mut self) -> Option<Result<Command, ControlChanError>> {
        let framed = self.control.as_mut()?;
        let incoming = framed.next().await;
        if self.config.debug {
            if let Some(Ok(cmd)) = &incoming {
                debug!(self.logger, "recv"; "command" => &cmd.name, "arg" => &cmd.arg);
            }
        }
        incoming
    }

    /// Swaps the control stream for its TLS-wrapped self. On handshake
    /// failure the stream is gone and the session must end.
    pub async fn upgrade_tls(&mut self) -> Result<(), ControlChanError> {
        let acceptor = self
            .tls_acceptor
            .clone()
            .ok_or(ControlChanError::IllegalState("TLS not configured"))?;
        let framed = self
            .control
            .take()
            .ok_or(ControlChanError::IllegalState("control stream detached"))?;
        let io = framed.into_inner();
        let stream = acceptor.accept(io).await.map_err(ControlChanError::Tls)?;
        self.control = Some(Framed::new(Box::new(stream) as CtrlStream, FtpCodec::new()));
        self.tls_active = true;
        Ok(())
    }

    /// Blocks until the data-connection setup (PASV accept or PORT dial)
    /// has deposited its token.
    pub async fn await_data_ready(&mut self) {
        let _ = self.data_ready_rx.recv().await;
    }

    /// Post-transfer cleanup shared by every transfer-family handler: the
    /// data socket is dropped, the passive port released and the restart
    /// offset cleared, success or not.
    pub async fn finish_transfer(&mut self) {
        self.data.close().await;
        self.restart_offset = 0;
    }

    /// One `LIST`/`STAT` output row for an entry.
    pub fn list_row(&self, fi: &FileInfo) -> String {
        format!(
            "{} 1 {} {} {:>12} {} {}",
            fi.mode_string(),
            self.user,
            self.user,
            fi.size,
            fi.modified.format("%b %e %H:%M"),
            fi.name
        )
    }

    /// One `MLSD`/`MLST` fact row for an entry.
    pub fn facts_row(fi: &FileInfo) -> String {
        format!(
            "Type={};Size={};Modify={}; {}",
            if fi.is_dir { "dir" } else { "file" },
            fi.size,
            fi.modified.format("%Y%m%d%H%M%S"),
            fi.name
        )
    }
}

/// Joins `arg` onto `current` (unless absolute) and canonicalizes the
/// result.
pub(crate) fn resolve_virtual(current: &str, arg: &str) -> String {
    if arg.starts_with('/') {
        clean_path(arg)
    } else {
        clean_path(&format!("{}/{}", current, arg))
    }
}

fn clean_path(path: &str) -> String {
    let mut stack: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                stack.pop();
            }
            name => stack.push(name),
        }
    }
    if stack.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", stack.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Permissions;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn clean_path_collapses() {
        assert_eq!(clean_path("/"), "/");
        assert_eq!(clean_path("/a/b/../c"), "/a/c");
        assert_eq!(clean_path("/a//b/./c/"), "/a/b/c");
        assert_eq!(clean_path("/../../x"), "/x");
        assert_eq!(clean_path("/a/.."), "/");
    }

    #[test]
    fn resolve_relative_and_absolute() {
        assert_eq!(resolve_virtual("/docs", "a.txt"), "/docs/a.txt");
        assert_eq!(resolve_virtual("/docs", "../a.txt"), "/a.txt");
        assert_eq!(resolve_virtual("/docs", ".."), "/");
        assert_eq!(resolve_virtual("/docs", "/abs/p"), "/abs/p");
        assert_eq!(resolve_virtual("/", ".."), "/");
        assert_eq!(resolve_virtual("/", "sub/../other"), "/other");
    }

    #[test]
    fn row_formats() {
        let fi = FileInfo {
            name: "hello.txt".to_string(),
            size: 4,
            mode: Permissions(0o644),
            modified: chrono::Utc.with_ymd_and_hms(2020, 5, 7, 10, 30, 0).unwrap(),
            is_dir: false,
        };

        assert_eq!(
            Session::facts_row(&fi),
            "Type=file;Size=4;Modify=20200507103000; hello.txt"
        );

        // The LIST row needs a session for the user columns; format the
        // parts that don't.
        let expected_time = "May  7 10:30";
        assert_eq!(fi.modified.format("%b %e %H:%M").to_string(), expected_time);
        assert_eq!(fi.mode_string(), "-rw-r--r--");
    }
}
