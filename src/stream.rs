//! connecting to the server and exchanging bytes with it
use crate::{
    config::ReadPolicy,
    error::{Error, Stage},
};
use log::{debug, warn};
use std::{
    io::{self, Read, Write},
    net::{SocketAddr, TcpStream, ToSocketAddrs},
    time::Duration,
};

///Source of connections. The connection is closed when `Conn` is dropped.
pub trait Connector {
    type Conn: Read + Write;

    ///Resolves `host` to IPv4 stream addresses.
    fn resolve(&mut self, host: &str, port: u16) -> Result<Vec<SocketAddr>, Error>;

    ///Opens a connection to the first address that accepts it.
    ///
    ///`timeout` bounds the connect and every later write and read on the
    ///connection; `None` blocks without limit.
    fn connect(
        &mut self,
        addrs: &[SocketAddr],
        timeout: Option<Duration>,
    ) -> Result<Self::Conn, Error>;
}

///Plain TCP connector.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpConnector;

impl Connector for TcpConnector {
    type Conn = TcpStream;

    fn resolve(&mut self, host: &str, port: u16) -> Result<Vec<SocketAddr>, Error> {
        let addrs: Vec<_> = (host, port)
            .to_socket_addrs()
            .map_err(|e| Error::DnsResolution {
                host: host.to_string(),
                source: Some(e),
            })?
            .filter(SocketAddr::is_ipv4)
            .collect();

        if addrs.is_empty() {
            return Err(Error::DnsResolution {
                host: host.to_string(),
                source: None,
            });
        }

        debug!("resolved {}:{} to {:?}", host, port, addrs);
        Ok(addrs)
    }

    fn connect(
        &mut self,
        addrs: &[SocketAddr],
        timeout: Option<Duration>,
    ) -> Result<TcpStream, Error> {
        let stream =
            connect_with_timeout(addrs, timeout).map_err(|e| Error::io(Stage::Connect, e))?;

        stream
            .set_read_timeout(timeout)
            .and_then(|_| stream.set_write_timeout(timeout))
            .map_err(|e| Error::io(Stage::Connect, e))?;

        debug!("connected to {:?}", stream.peer_addr().ok());
        Ok(stream)
    }
}

///Connects to the first reachable address, giving each attempt `timeout`.
///A timed out attempt ends the search.
pub fn connect_with_timeout(
    addrs: &[SocketAddr],
    timeout: Option<Duration>,
) -> io::Result<TcpStream> {
    let count = addrs.len();

    for (idx, addr) in addrs.iter().enumerate() {
        let res = match timeout {
            Some(t) => TcpStream::connect_timeout(addr, t),
            None => TcpStream::connect(addr),
        };

        match res {
            Ok(stream) => return Ok(stream),
            Err(err) => match err.kind() {
                io::ErrorKind::TimedOut => return Err(err),
                _ => {
                    debug!("connect to {} failed: {}", addr, err);
                    if idx + 1 == count {
                        return Err(err);
                    }
                }
            },
        };
    }

    Err(io::Error::new(
        io::ErrorKind::AddrNotAvailable,
        "no address to connect to",
    ))
}

///Writes the whole message to `stream` and flushes it.
pub fn send_all<T: Write + ?Sized>(stream: &mut T, msg: &[u8]) -> Result<(), Error> {
    stream
        .write_all(msg)
        .and_then(|_| stream.flush())
        .map_err(|e| Error::io(Stage::Send, e))?;

    debug!("sent {} bytes", msg.len());
    Ok(())
}

///Bytes received from the server, never more than its capacity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseBuffer {
    data: Vec<u8>,
    capacity: usize,
    truncated: bool,
}

impl ResponseBuffer {
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    ///Checks if the response may continue past what was kept.
    ///
    ///Reported whenever the buffer is full, without reading further, and when
    ///a drained read timed out after receiving some data.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    ///Returns the response as text, replacing invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.data).into_owned()
    }
}

///Reads the response from `stream` into a buffer of `max` bytes.
pub fn recv<T: Read + ?Sized>(
    stream: &mut T,
    policy: ReadPolicy,
    max: usize,
) -> Result<ResponseBuffer, Error> {
    let mut data = vec![0; max];

    let (filled, truncated) = match policy {
        ReadPolicy::Single => {
            let len =
                read_retrying(stream, &mut data).map_err(|e| Error::io(Stage::Receive, e))?;
            (len, len == max && max > 0)
        }
        ReadPolicy::UntilClose => read_until_close(stream, &mut data)?,
    };

    data.truncate(filled);
    debug!("received {} bytes", filled);

    if truncated {
        warn!("response cut at {} bytes", max);
    }

    Ok(ResponseBuffer {
        data,
        capacity: max,
        truncated,
    })
}

//Returns bytes read and whether the response may continue. A full buffer
//ends the loop without another read, so a server holding the connection
//open cannot stall it.
fn read_until_close<T: Read + ?Sized>(
    stream: &mut T,
    buf: &mut [u8],
) -> Result<(usize, bool), Error> {
    let mut filled = 0;

    while filled < buf.len() {
        match read_retrying(stream, &mut buf[filled..]) {
            Ok(0) => return Ok((filled, false)),
            Ok(len) => filled += len,
            Err(e) => {
                let err = Error::io(Stage::Receive, e);

                return match err {
                    Error::Timeout(_) if filled > 0 => {
                        warn!("server kept the connection open, keeping {} bytes", filled);
                        Ok((filled, true))
                    }
                    err => Err(err),
                };
            }
        }
    }

    Ok((filled, filled > 0))
}

fn read_retrying<T: Read + ?Sized>(stream: &mut T, buf: &mut [u8]) -> io::Result<usize> {
    loop {
        match stream.read(buf) {
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            res => return res,
        }
    }
}
