//! The server front: wires configuration, hooks, the driver factory and
//! the logger together and runs the accept loop.

use crate::config::{Config, DriverKind};
use crate::hooks::Hooks;
use crate::server::controlchan::control_loop;
use crate::server::error::ServerError;
use crate::server::session::Session;
use crate::server::tls;
use crate::storage::{DriverFactory, FilesystemFactory, ObjectStorageFactory};
use slog::{info, o, warn, Discard, Logger};
use std::sync::Arc;
use tokio::net::TcpListener;

/// An FTP server instance.
///
/// ```no_run
/// # use kftpd::{Config, Server};
/// # async fn run() -> Result<(), kftpd::server::ServerError> {
/// let server = Server::new(Config::default())?;
/// server.listen().await
/// # }
/// ```
pub struct Server {
    config: Arc<Config>,
    hooks: Arc<Hooks>,
    factory: Arc<dyn DriverFactory>,
    logger: Logger,
}

impl Server {
    /// Creates a server for the bundled back-end the configuration
    /// selects. `DriverKind::Custom` needs [`Server::with_driver_factory`]
    /// instead.
    pub fn new(config: Config) -> Result<Server, ServerError> {
        let factory: Arc<dyn DriverFactory> = match config.driver {
            DriverKind::Disk => Arc::new(
                FilesystemFactory::new(config.disk.root_path.as_str())
                    .map_err(ServerError::StorageSetup)?,
            ),
            DriverKind::Object => Arc::new(ObjectStorageFactory::new(config.object.clone())),
            DriverKind::Custom => return Err(ServerError::MissingDriverFactory),
        };
        Ok(Server::assemble(config, factory))
    }

    /// Creates a server around an injected driver factory.
    pub fn with_driver_factory(config: Config, factory: Arc<dyn DriverFactory>) -> Server {
        Server::assemble(config, factory)
    }

    fn assemble(config: Config, factory: Arc<dyn DriverFactory>) -> Server {
        Server {
            config: Arc::new(config),
            hooks: Arc::new(Hooks::default()),
            factory,
            logger: Logger::root(Discard, o!()),
        }
    }

    /// Installs the callback hooks. Set once, before [`Server::listen`].
    pub fn hooks(mut self, hooks: Hooks) -> Server {
        self.hooks = Arc::new(hooks);
        self
    }

    /// Routes the server's log events to the given sink.
    pub fn logger(mut self, logger: Logger) -> Server {
        self.logger = logger;
        self
    }

    /// Binds the control port and serves sessions until the task is
    /// dropped. Each accepted connection gets a task and a session id of
    /// its own.
    pub async fn listen(self) -> Result<(), ServerError> {
        let tls_acceptor = if self.config.tls.enable {
            let acceptor = tls::new_acceptor(&self.config.tls.cert_path, &self.config.tls.key_path)
                .map_err(ServerError::Tls)?;
            Some(acceptor)
        } else {
            None
        };

        let listener = TcpListener::bind(&self.config.bind)
            .await
            .map_err(ServerError::Bind)?;
        info!(self.logger, "listening"; "bind" => &self.config.bind);

        let mut next_id: u64 = 0;
        loop {
            let (socket, peer) = match listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    warn!(self.logger, "accept failed"; "error" => %e);
                    continue;
                }
            };

            let session = Session::new(
                next_id,
                socket,
                Arc::clone(&self.config),
                Arc::clone(&self.hooks),
                Arc::clone(&self.factory),
                tls_acceptor.clone(),
                &self.logger,
            );
            match session {
                Ok(session) => {
                    info!(self.logger, "session accepted"; "session" => next_id, "peer" => %peer);
                    tokio::spawn(control_loop::run(session));
                }
                Err(e) => warn!(self.logger, "session setup failed"; "error" => %e),
            }
            next_id += 1;
        }
    }
}
