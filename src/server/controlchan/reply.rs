/// A reply to the FTP client.
#[derive(Debug, Clone)]
pub enum Reply {
    /// A single `CODE text` line.
    CodeAndMsg { code: ReplyCode, msg: String },
    /// A `CODE-header` block: body lines, then `CODE footer`.
    Multi {
        code: ReplyCode,
        header: String,
        lines: Vec<String>,
        footer: String,
    },
}

/// The reply codes the server emits, per RFC 959 and friends.
//
// Codes between 100 and 199 are marks, 200-399 acceptance, 400-599
// rejection. Clients are only guaranteed to interpret the first digit;
// the texts are for humans (exceptions: 227 and 257 carry structure).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ReplyCode {
    FileStatusOkay = 150,

    CommandOkay = 200,
    CommandOkayNotImplemented = 202,
    SystemStatus = 211,
    FileStatus = 213,
    HelpMessage = 214,
    SystemType = 215,
    ServiceReady = 220,
    ClosingControlConnection = 221,
    ClosingDataConnection = 226,
    EnteringPassiveMode = 227,
    UserLoggedIn = 230,
    AuthOkayNoDataNeeded = 234,
    FileActionOkay = 250,
    DirCreated = 257,

    NeedPassword = 331,
    FileActionPending = 350,

    ServiceNotAvailable = 421,
    ConnectionClosed = 426,

    CommandSyntaxError = 500,
    ParameterSyntaxError = 501,
    BadCommandSequence = 503,
    CommandNotImplementedForParameter = 504,
    NotLoggedIn = 530,
    ProtLevelNotSupported = 536,
    FileError = 550,
}

impl Reply {
    /// A single-line reply.
    pub fn new(code: ReplyCode, msg: impl Into<String>) -> Self {
        Reply::CodeAndMsg { code, msg: msg.into() }
    }

    /// A multi-line reply. Body lines are sent verbatim between the
    /// `CODE-header` and `CODE footer` lines; callers supply any leading
    /// indentation the format wants.
    pub fn multi(
        code: ReplyCode,
        header: impl Into<String>,
        lines: Vec<String>,
        footer: impl Into<String>,
    ) -> Self {
        Reply::Multi {
            code,
            header: header.into(),
            lines,
            footer: footer.into(),
        }
    }
}
