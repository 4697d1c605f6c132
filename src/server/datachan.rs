//! The FTP data channel: passive listeners, active dials, and the
//! per-session connection slot shared between the accept task and the
//! transferring command handler.

use slog::{debug, warn};
use std::io;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, Mutex};
use tokio::time::{Duration, Instant};

/// The per-session data-connection slot. At most one connection is live;
/// opening a new one closes the prior. The passive port is tracked so the
/// session log can correlate open/close events and so teardown can tell
/// whether a listener reservation is outstanding.
#[derive(Debug)]
pub(crate) struct DataChannel {
    logger: slog::Logger,
    debug: bool,
    state: Mutex<DataState>,
}

#[derive(Debug, Default)]
struct DataState {
    conn: Option<TcpStream>,
    pasv_port: u16,
}

impl DataChannel {
    pub fn new(logger: slog::Logger, debug: bool) -> Self {
        DataChannel {
            logger,
            debug,
            state: Mutex::new(DataState::default()),
        }
    }

    /// Stores a freshly established data connection, closing any prior one.
    pub async fn open(&self, conn: TcpStream) {
        let mut state = self.state.lock().await;
        if self.debug {
            debug!(self.logger, "data connection open"; "pasv_port" => state.pasv_port);
        }
        state.conn = Some(conn);
    }

    /// Hands the connection to the transfer, leaving the slot empty.
    pub async fn take(&self) -> Option<TcpStream> {
        self.state.lock().await.conn.take()
    }

    /// Reserves (or clears, with 0) the passive port number.
    pub async fn set_pasv_port(&self, port: u16) {
        self.state.lock().await.pasv_port = port;
    }

    /// Drops the data connection and releases the passive port.
    pub async fn close(&self) {
        let mut state = self.state.lock().await;
        if state.conn.is_some() || state.pasv_port != 0 {
            if self.debug {
                debug!(self.logger, "data connection close"; "pasv_port" => state.pasv_port);
            }
            state.conn = None;
            state.pasv_port = 0;
        }
    }
}

/// Binds an ephemeral listener on a random port within the configured
/// passive range, retrying bind failures up to the size of the range.
pub(crate) async fn acquire_listener(port_start: u16, port_end: u16) -> io::Result<(TcpListener, u16)> {
    use rand::Rng;

    let attempts = u32::from(port_end) - u32::from(port_start) + 1;
    for _ in 0..attempts {
        let port = rand::thread_rng().gen_range(port_start..=port_end);
        if let Ok(listener) = TcpListener::bind(("0.0.0.0", port)).await {
            return Ok((listener, port));
        }
    }
    Err(io::Error::new(
        io::ErrorKind::AddrInUse,
        "no available listening port in passive range",
    ))
}

/// Runs the passive accept in a task of its own. Whatever happens --
/// accept, timeout, error -- the listener is closed and exactly one token
/// is deposited on the rendezvous channel so the transferring handler can
/// proceed (or fail) deterministically.
///
/// The deadline is measured from listener creation, not from the moment a
/// transfer command arrives.
pub(crate) fn spawn_accept(
    listener: TcpListener,
    deadline: Instant,
    data: Arc<DataChannel>,
    ready_tx: mpsc::Sender<()>,
    logger: slog::Logger,
) {
    tokio::spawn(async move {
        match tokio::time::timeout_at(deadline, listener.accept()).await {
            Ok(Ok((conn, _peer))) => data.open(conn).await,
            Ok(Err(e)) => warn!(logger, "passive accept failed"; "error" => %e),
            Err(_) => debug!(logger, "passive listener timed out before the client connected"),
        }
        drop(listener);
        let _ = ready_tx.send(()).await;
    });
}

/// Dials the address a PORT command advertised, bounded by the configured
/// connect timeout.
pub(crate) async fn dial(addr: (String, u16), connect_timeout: Duration) -> io::Result<TcpStream> {
    match tokio::time::timeout(connect_timeout, TcpStream::connect(addr)).await {
        Ok(result) => result,
        Err(_) => Err(io::Error::new(
            io::ErrorKind::TimedOut,
            "timed out connecting to the PORT address",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slog::o;

    fn quiet() -> slog::Logger {
        slog::Logger::root(slog::Discard, o!())
    }

    #[tokio::test]
    async fn acquire_listener_single_port_range() {
        let (first, port) = acquire_listener(21950, 21950).await.unwrap();
        assert_eq!(port, 21950);

        // The only port in the range is taken; retries must run out.
        let err = acquire_listener(21950, 21950).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AddrInUse);

        drop(first);
        let (_relisten, port) = acquire_listener(21950, 21950).await.unwrap();
        assert_eq!(port, 21950);
    }

    #[tokio::test]
    async fn open_take_close() {
        let data = DataChannel::new(quiet(), false);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (client, _server) = tokio::join!(TcpStream::connect(addr), listener.accept());

        data.open(client.unwrap()).await;
        assert!(data.take().await.is_some());
        assert!(data.take().await.is_none());

        data.set_pasv_port(21000).await;
        data.close().await;
        assert_eq!(data.state.lock().await.pasv_port, 0);
    }

    #[tokio::test]
    async fn accept_task_signals_on_timeout() {
        let (listener, _port) = acquire_listener(21951, 21960).await.unwrap();
        let data = Arc::new(DataChannel::new(quiet(), false));
        let (tx, mut rx) = mpsc::channel(1);

        spawn_accept(
            listener,
            Instant::now() + Duration::from_millis(50),
            Arc::clone(&data),
            tx,
            quiet(),
        );

        // Exactly one token arrives even though no client ever connects.
        rx.recv().await.unwrap();
        assert!(data.take().await.is_none());
    }

    #[tokio::test]
    async fn accept_task_stores_connection() {
        let (listener, port) = acquire_listener(21961, 21970).await.unwrap();
        let data = Arc::new(DataChannel::new(quiet(), false));
        let (tx, mut rx) = mpsc::channel(1);

        spawn_accept(
            listener,
            Instant::now() + Duration::from_secs(5),
            Arc::clone(&data),
            tx,
            quiet(),
        );

        let _client = TcpStream::connect(("127.0.0.1", port)).await.unwrap();
        rx.recv().await.unwrap();
        assert!(data.take().await.is_some());
    }

    #[tokio::test]
    async fn dial_failure_is_bounded() {
        // RFC 5737 TEST-NET address: never serves FTP. Depending on the
        // network this times out or is rejected outright; either way the
        // dial returns an error within the bound.
        let started = std::time::Instant::now();
        let result = dial(("192.0.2.1".to_string(), 21), Duration::from_millis(100)).await;
        assert!(result.is_err());
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
