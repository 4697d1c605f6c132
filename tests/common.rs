//! Test support: spin a real server on a loopback port and drive it with
//! a minimal blocking FTP client.

use kftpd::{Config, Server};
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpStream;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Starts a server for `root` on `addr` in a background thread and waits
/// until it accepts connections.
pub fn spawn_server(addr: &'static str, root: PathBuf) {
    spawn_server_with(addr, root, |_| {})
}

/// Like [`spawn_server`], with a configuration tweak applied first.
pub fn spawn_server_with(addr: &'static str, root: PathBuf, tweak: impl FnOnce(&mut Config)) {
    spawn_server_full(addr, root, kftpd::Hooks::default(), tweak)
}

/// Full control: configuration tweak plus callback hooks.
pub fn spawn_server_full(
    addr: &'static str,
    root: PathBuf,
    hooks: kftpd::Hooks,
    tweak: impl FnOnce(&mut Config),
) {
    let mut config = Config::default();
    config.bind = addr.to_string();
    config.disk.root_path = root.display().to_string();
    tweak(&mut config);

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            Server::new(config).unwrap().hooks(hooks).listen().await.unwrap();
        });
    });

    // Wait for the listener to come up.
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        match TcpStream::connect(addr) {
            Ok(_) => return,
            Err(_) if Instant::now() < deadline => {
                std::thread::sleep(Duration::from_millis(20))
            }
            Err(e) => panic!("server on {} did not come up: {}", addr, e),
        }
    }
}

/// A small blocking FTP control-channel client.
pub struct FtpClient {
    writer: TcpStream,
    reader: BufReader<TcpStream>,
}

impl FtpClient {
    /// Connects and consumes the greeting, which is returned.
    pub fn connect(addr: &str) -> FtpClient {
        let stream = TcpStream::connect(addr).expect("connect control channel");
        stream
            .set_read_timeout(Some(Duration::from_secs(10)))
            .unwrap();
        let reader = BufReader::new(stream.try_clone().unwrap());
        let mut client = FtpClient { writer: stream, reader };
        let greeting = client.read_reply();
        assert!(greeting.starts_with("220 "), "unexpected greeting: {}", greeting);
        client
    }

    /// Sends a command line and returns the full reply (multi-line replies
    /// come back joined with `\r\n`).
    pub fn cmd(&mut self, line: &str) -> String {
        self.send(line);
        self.read_reply()
    }

    /// Sends a command without waiting for the reply.
    pub fn send(&mut self, line: &str) {
        self.writer
            .write_all(format!("{}\r\n", line).as_bytes())
            .expect("write command");
    }

    /// Reads one (possibly multi-line) reply.
    pub fn read_reply(&mut self) -> String {
        let first = self.read_line();
        if first.len() < 4 || first.as_bytes()[3] != b'-' {
            return first;
        }
        // Multi-line: read until the `CODE ` footer.
        let code = first[..3].to_string();
        let mut lines = vec![first.clone()];
        loop {
            let line = self.read_line();
            let done = line.starts_with(&code) && line.as_bytes().get(3) == Some(&b' ');
            lines.push(line);
            if done {
                return lines.join("\r\n");
            }
        }
    }

    fn read_line(&mut self) -> String {
        let mut line = String::new();
        self.reader.read_line(&mut line).expect("read reply line");
        line.trim_end_matches(['\r', '\n']).to_string()
    }

    /// Logs in and asserts success.
    pub fn login(&mut self, user: &str, pass: &str) {
        let reply = self.cmd(&format!("USER {}", user));
        assert!(reply.starts_with("331 "), "USER reply: {}", reply);
        let reply = self.cmd(&format!("PASS {}", pass));
        assert!(reply.starts_with("230 "), "PASS reply: {}", reply);
    }

    /// Issues PASV and returns the advertised port.
    pub fn pasv(&mut self) -> u16 {
        let reply = self.cmd("PASV");
        assert!(reply.starts_with("227 "), "PASV reply: {}", reply);
        parse_pasv_port(&reply)
    }

    /// Runs an upload over a fresh passive connection.
    pub fn store(&mut self, path: &str, content: &[u8]) {
        let port = self.pasv();
        let mut data = data_connect(port);
        let reply = self.cmd(&format!("STOR {}", path));
        assert!(reply.starts_with("150 "), "STOR reply: {}", reply);
        data.write_all(content).unwrap();
        drop(data);
        let reply = self.read_reply();
        assert!(reply.starts_with("226 "), "STOR close reply: {}", reply);
    }

    /// Runs a download over a fresh passive connection.
    pub fn retrieve(&mut self, path: &str) -> Vec<u8> {
        let port = self.pasv();
        let mut data = data_connect(port);
        let reply = self.cmd(&format!("RETR {}", path));
        assert!(reply.starts_with("150 "), "RETR reply: {}", reply);
        let mut content = Vec::new();
        data.read_to_end(&mut content).unwrap();
        let reply = self.read_reply();
        assert!(reply.starts_with("226 "), "RETR close reply: {}", reply);
        content
    }

    /// Fetches listing output (LIST/NLST/MLSD) over a fresh passive
    /// connection.
    pub fn listing(&mut self, command: &str) -> String {
        let port = self.pasv();
        let mut data = data_connect(port);
        let reply = self.cmd(command);
        assert!(reply.starts_with("150 "), "{} reply: {}", command, reply);
        let mut content = String::new();
        data.read_to_string(&mut content).unwrap();
        let reply = self.read_reply();
        assert!(reply.starts_with("226 "), "{} close reply: {}", command, reply);
        content
    }
}

/// Opens the data connection for a PASV transfer.
pub fn data_connect(port: u16) -> TcpStream {
    let stream = TcpStream::connect(("127.0.0.1", port)).expect("connect data channel");
    stream
        .set_read_timeout(Some(Duration::from_secs(10)))
        .unwrap();
    stream
}

fn parse_pasv_port(reply: &str) -> u16 {
    let open = reply.find('(').expect("PASV reply without '('");
    let close = reply.find(')').expect("PASV reply without ')'");
    let fields: Vec<&str> = reply[open + 1..close].split(',').collect();
    assert_eq!(fields.len(), 6, "PASV reply fields: {}", reply);
    let p1: u16 = fields[4].parse().unwrap();
    let p2: u16 = fields[5].parse().unwrap();
    p1 * 256 + p2
}
