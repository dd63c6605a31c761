//! one-shot stub server shared by the integration tests
#![allow(dead_code)]

use std::{
    io::{Read, Write},
    net::{SocketAddr, TcpListener, TcpStream},
    thread::{self, JoinHandle},
    time::Duration,
};

pub const RESPONSE: &[u8] = b"HTTP/1.1 200 OK\r\n\r\nOK";

///Accepts a single connection, records the request and answers with scripted chunks.
pub struct Stub {
    pub addr: SocketAddr,
    handle: JoinHandle<Vec<u8>>,
}

impl Stub {
    ///Answers with `RESPONSE` in one write, then closes.
    pub fn ok() -> Stub {
        Stub::serve(vec![RESPONSE.to_vec()], Duration::ZERO)
    }

    ///Writes `chunks` one by one with `pause` in between, then closes.
    ///Stops early once the client has gone away.
    pub fn serve(chunks: Vec<Vec<u8>>, pause: Duration) -> Stub {
        Stub::spawn(move |stream| {
            for (idx, chunk) in chunks.iter().enumerate() {
                if idx > 0 {
                    thread::sleep(pause);
                }
                if stream.write_all(chunk).and_then(|_| stream.flush()).is_err() {
                    break;
                }
            }
        })
    }

    ///Reads the request and keeps the connection open for `hold` without answering.
    pub fn silent(hold: Duration) -> Stub {
        Stub::spawn(move |_| thread::sleep(hold))
    }

    fn spawn<F>(answer: F) -> Stub
    where
        F: FnOnce(&mut TcpStream) + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let request = read_request(&mut stream);
            answer(&mut stream);
            request
        });

        Stub { addr, handle }
    }

    ///Waits for the exchange to finish and returns the request the stub received.
    pub fn request(self) -> Vec<u8> {
        self.handle.join().unwrap()
    }
}

///Address nobody listens on.
pub fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap()
}

fn read_request(stream: &mut TcpStream) -> Vec<u8> {
    let mut req = Vec::new();
    let mut buf = [0; 1024];

    loop {
        if let Some(pos) = req.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&req[..pos]).into_owned();
            let len = head
                .lines()
                .find_map(|l| l.strip_prefix("Content-Length: "))
                .map_or(0, |v| v.trim().parse::<usize>().unwrap());

            if req.len() >= pos + 4 + len {
                return req;
            }
        }

        match stream.read(&mut buf) {
            Ok(0) | Err(_) => return req,
            Ok(len) => req.extend_from_slice(&buf[..len]),
        }
    }
}
