//! error system used around the crate.
use std::{error, fmt, io};

///Failure while decomposing a URL.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ParseErr {
    ///Neither `scheme://host/path` nor `scheme://host` matched.
    Malformed,
    ///A part of the URL is longer than the decomposer accepts.
    TooLong { part: UrlPart, max: usize },
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum UrlPart {
    Scheme,
    Host,
    Path,
}

impl fmt::Display for UrlPart {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use self::UrlPart::*;

        let part = match self {
            Scheme => "scheme",
            Host => "host",
            Path => "path",
        };
        f.write_str(part)
    }
}

impl error::Error for ParseErr {}

impl fmt::Display for ParseErr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use self::ParseErr::*;

        match self {
            Malformed => write!(f, "malformed URL, expected scheme://host[/path]"),
            TooLong { part, max } => write!(f, "URL {} longer than {} characters", part, max),
        }
    }
}

///Point of the pipeline where a blocking call ran out of time.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Stage {
    Connect,
    Send,
    Receive,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use self::Stage::*;

        let stage = match self {
            Connect => "connect",
            Send => "send",
            Receive => "receive",
        };
        f.write_str(stage)
    }
}

#[derive(Debug)]
pub enum Error {
    Usage(String),
    Parse(ParseErr),
    UnsupportedScheme(String),
    DnsResolution { host: String, source: Option<io::Error> },
    SocketCreation(io::Error),
    Connect(io::Error),
    Send(io::Error),
    Recv(io::Error),
    RequestTooLarge { len: usize, max: usize },
    Timeout(Stage),
    ///Writing to the local output failed.
    Output(io::Error),
}

impl Error {
    ///Returns the process exit status reported for this error.
    pub fn exit_code(&self) -> i32 {
        use self::Error::*;

        match self {
            Usage(_) => 1,
            Parse(_) => 2,
            UnsupportedScheme(_) => 3,
            DnsResolution { .. } => 4,
            SocketCreation(_) => 5,
            Connect(_) => 6,
            Recv(_) => 7,
            Send(_) => 8,
            RequestTooLarge { .. } => 9,
            Timeout(_) => 10,
            Output(_) => 11,
        }
    }

    ///Classifies an I/O failure raised at `stage`, turning expired deadlines into `Timeout`.
    pub(crate) fn io(stage: Stage, e: io::Error) -> Error {
        match e.kind() {
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => Error::Timeout(stage),
            _ => match stage {
                Stage::Connect => match e.kind() {
                    io::ErrorKind::Unsupported | io::ErrorKind::OutOfMemory => {
                        Error::SocketCreation(e)
                    }
                    _ => Error::Connect(e),
                },
                Stage::Send => Error::Send(e),
                Stage::Receive => Error::Recv(e),
            },
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        use self::Error::*;

        match self {
            Parse(e) => Some(e),
            DnsResolution { source, .. } => {
                source.as_ref().map(|e| e as &(dyn error::Error + 'static))
            }
            SocketCreation(e) | Connect(e) | Send(e) | Recv(e) | Output(e) => Some(e),
            Usage(_) | UnsupportedScheme(_) | RequestTooLarge { .. } | Timeout(_) => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use self::Error::*;

        match self {
            Usage(msg) => write!(f, "{}", msg),
            Parse(e) => e.fmt(f),
            UnsupportedScheme(scheme) => {
                write!(f, "{} is not supported in this version", scheme.to_uppercase())
            }
            DnsResolution {
                host,
                source: Some(e),
            } => write!(f, "cannot resolve {}: {}", host, e),
            DnsResolution { host, source: None } => {
                write!(f, "cannot resolve {}: no IPv4 address", host)
            }
            SocketCreation(e) => write!(f, "socket: {}", e),
            Connect(e) => write!(f, "connect: {}", e),
            Send(e) => write!(f, "send: {}", e),
            Recv(e) => write!(f, "recv: {}", e),
            RequestTooLarge { len, max } => {
                write!(f, "request is {} bytes, limit is {}", len, max)
            }
            Timeout(stage) => write!(f, "{} timed out", stage),
            Output(e) => write!(f, "output: {}", e),
        }
    }
}

impl From<ParseErr> for Error {
    fn from(e: ParseErr) -> Self {
        Error::Parse(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct() {
        let errors = [
            Error::Usage(String::new()),
            Error::Parse(ParseErr::Malformed),
            Error::UnsupportedScheme("https".to_string()),
            Error::DnsResolution {
                host: "h".to_string(),
                source: None,
            },
            Error::SocketCreation(io::ErrorKind::Unsupported.into()),
            Error::Connect(io::ErrorKind::ConnectionRefused.into()),
            Error::Recv(io::ErrorKind::ConnectionReset.into()),
            Error::Send(io::ErrorKind::BrokenPipe.into()),
            Error::RequestTooLarge { len: 2, max: 1 },
            Error::Timeout(Stage::Receive),
            Error::Output(io::ErrorKind::BrokenPipe.into()),
        ];

        let mut codes: Vec<_> = errors.iter().map(Error::exit_code).collect();
        assert_eq!(codes[..8], [1, 2, 3, 4, 5, 6, 7, 8]);

        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn io_timeouts_classified() {
        let e = Error::io(Stage::Receive, io::ErrorKind::WouldBlock.into());
        assert!(matches!(e, Error::Timeout(Stage::Receive)));

        let e = Error::io(Stage::Connect, io::ErrorKind::TimedOut.into());
        assert!(matches!(e, Error::Timeout(Stage::Connect)));
    }

    #[test]
    fn io_errors_keep_stage() {
        let e = Error::io(Stage::Connect, io::ErrorKind::ConnectionRefused.into());
        assert_eq!(e.exit_code(), 6);

        let e = Error::io(Stage::Connect, io::ErrorKind::Unsupported.into());
        assert_eq!(e.exit_code(), 5);

        let e = Error::io(Stage::Send, io::ErrorKind::BrokenPipe.into());
        assert_eq!(e.exit_code(), 8);

        let e = Error::io(Stage::Receive, io::ErrorKind::ConnectionReset.into());
        assert_eq!(e.exit_code(), 7);
    }

    #[test]
    fn unsupported_scheme_message() {
        let e = Error::UnsupportedScheme("https".to_string());
        assert_eq!(e.to_string(), "HTTPS is not supported in this version");
    }
}
