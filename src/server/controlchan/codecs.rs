//! Frames the control channel: decodes request lines into [`Command`]s and
//! encodes [`Reply`]s.

use super::command::Command;
use super::error::ControlChanError;
use super::reply::Reply;
use bytes::BytesMut;
use std::io::Write;
use tokio_util::codec::{Decoder, Encoder};

/// Codec for the control channel. Lines end in LF (an optional preceding
/// CR is stripped); replies always end in CRLF.
pub struct FtpCodec {
    // Index of the next byte to examine for a newline, so repeated decode
    // calls don't rescan the buffer from the start.
    next_index: usize,
}

impl FtpCodec {
    pub fn new() -> Self {
        FtpCodec { next_index: 0 }
    }
}

impl Decoder for FtpCodec {
    type Item = Command;
    type Error = ControlChanError;

    fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<Command>, Self::Error> {
        loop {
            let Some(newline_offset) = buf[self.next_index..].iter().position(|b| *b == b'\n') else {
                self.next_index = buf.len();
                return Ok(None);
            };
            let newline_index = newline_offset + self.next_index;
            let line = buf.split_to(newline_index + 1);
            self.next_index = 0;

            let mut line = &line[..line.len() - 1];
            if line.last() == Some(&b'\r') {
                line = &line[..line.len() - 1];
            }
            // Empty lines are ignored; scan on for the next one.
            if let Some(cmd) = Command::parse(line) {
                return Ok(Some(cmd));
            }
        }
    }
}

impl Encoder<Reply> for FtpCodec {
    type Error = ControlChanError;

    fn encode(&mut self, reply: Reply, buf: &mut BytesMut) -> Result<(), Self::Error> {
        let mut buffer = Vec::new();
        match reply {
            Reply::CodeAndMsg { code, msg } => {
                write!(buffer, "{} {}\r\n", code as u32, msg)?;
            }
            Reply::Multi {
                code,
                header,
                lines,
                footer,
            } => {
                write!(buffer, "{}-{}\r\n", code as u32, header)?;
                for line in lines {
                    write!(buffer, "{}\r\n", line)?;
                }
                write!(buffer, "{} {}\r\n", code as u32, footer)?;
            }
        }
        buf.extend(&buffer);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::reply::ReplyCode;
    use super::*;
    use pretty_assertions::assert_eq;

    fn decode_all(input: &[u8]) -> Vec<Command> {
        let mut codec = FtpCodec::new();
        let mut buf = BytesMut::from(input);
        let mut out = Vec::new();
        while let Some(cmd) = codec.decode(&mut buf).unwrap() {
            out.push(cmd);
        }
        out
    }

    fn encode(reply: Reply) -> String {
        let mut codec = FtpCodec::new();
        let mut buf = BytesMut::new();
        codec.encode(reply, &mut buf).unwrap();
        String::from_utf8(buf.to_vec()).unwrap()
    }

    #[test]
    fn decodes_crlf_and_lf_lines() {
        let cmds = decode_all(b"USER alice\r\nNOOP\n");
        assert_eq!(cmds.len(), 2);
        assert_eq!(cmds[0], Command { name: "USER".into(), arg: "alice".into() });
        assert_eq!(cmds[1], Command { name: "NOOP".into(), arg: "".into() });
    }

    #[test]
    fn skips_empty_lines() {
        let cmds = decode_all(b"\r\n\r\nNOOP\r\n");
        assert_eq!(cmds.len(), 1);
        assert_eq!(cmds[0].name, "NOOP");
    }

    #[test]
    fn waits_for_complete_line() {
        let mut codec = FtpCodec::new();
        let mut buf = BytesMut::from(&b"USE"[..]);
        assert!(codec.decode(&mut buf).unwrap().is_none());
        buf.extend_from_slice(b"R bob\r\n");
        let cmd = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(cmd.name, "USER");
        assert_eq!(cmd.arg, "bob");
    }

    #[test]
    fn encodes_single_line() {
        let out = encode(Reply::new(ReplyCode::CommandOkay, "NOOP ok."));
        assert_eq!(out, "200 NOOP ok.\r\n");
    }

    #[test]
    fn encodes_multi_line() {
        let out = encode(Reply::multi(
            ReplyCode::SystemStatus,
            "Features:",
            vec![" MDTM".to_string(), " SIZE".to_string()],
            "End",
        ));
        assert_eq!(out, "211-Features:\r\n MDTM\r\n SIZE\r\n211 End\r\n");
    }
}
