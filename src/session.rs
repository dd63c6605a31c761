//! driving a single request from URL to printed response
use crate::{
    config::{ClientConfig, RequestConfig},
    error::Error,
    request::{OutgoingRequest, RequestBuilder},
    stream::{self, Connector},
    url::ParsedUrl,
};
use log::{debug, info};
use std::{fmt, io::Write};

///States a run moves through, in order. A run never goes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    ParseUrl,
    CheckScheme,
    Resolve,
    Connect,
    BuildRequest,
    EchoRequest,
    Send,
    Receive,
    Print,
    Close,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

///Summary of a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub sent: usize,
    pub received: usize,
    pub truncated: bool,
}

///Runs requests through `connector`.
///
///Every run is independent: nothing from a previous run is kept, and the
///connection opened by a run is closed before `run` returns.
#[derive(Debug)]
pub struct Session<C> {
    connector: C,
    config: ClientConfig,
}

impl<C: Connector> Session<C> {
    pub fn new(connector: C, config: ClientConfig) -> Session<C> {
        Session { connector, config }
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    ///Sends the request described by `req` and writes the raw response to `out`.
    ///
    ///With `req.verbose` the request is written to `out` first, as
    ///`Sending request:\n<request>\n`.
    pub fn run<W: Write + ?Sized>(
        &mut self,
        req: &RequestConfig,
        out: &mut W,
    ) -> Result<Outcome, Error> {
        req.validate()?;

        enter(State::ParseUrl);
        let url = ParsedUrl::parse(&req.url)?;

        enter(State::CheckScheme);
        if url.is_https() {
            return Err(Error::UnsupportedScheme(url.scheme().to_string()));
        }

        enter(State::Resolve);
        let addrs = self.connector.resolve(url.host(), url.corr_port())?;

        enter(State::Connect);
        let mut conn = self.connector.connect(&addrs, self.config.timeout)?;
        info!("connected to {}", url.authority());

        let outcome = self.exchange(&url, req, &mut conn, out);

        enter(State::Close);
        drop(conn);

        outcome
    }

    fn exchange<W: Write + ?Sized>(
        &self,
        url: &ParsedUrl,
        req: &RequestConfig,
        conn: &mut C::Conn,
        out: &mut W,
    ) -> Result<Outcome, Error> {
        enter(State::BuildRequest);
        let msg = self.build(url, req)?;

        if req.verbose {
            enter(State::EchoRequest);
            echo(out, &msg).map_err(Error::Output)?;
        }

        enter(State::Send);
        stream::send_all(conn, msg.as_bytes())?;

        enter(State::Receive);
        let response = stream::recv(
            conn,
            self.config.read_policy,
            self.config.max_response_bytes,
        )?;

        enter(State::Print);
        out.write_all(response.as_bytes())
            .and_then(|_| out.flush())
            .map_err(Error::Output)?;

        Ok(Outcome {
            sent: msg.len(),
            received: response.len(),
            truncated: response.is_truncated(),
        })
    }

    fn build(&self, url: &ParsedUrl, req: &RequestConfig) -> Result<OutgoingRequest, Error> {
        let authority = url.authority();
        let mut builder = RequestBuilder::new(url.path(), &authority);

        builder
            .method(req.method.clone())
            .max_len(self.config.max_request_bytes);

        if let Some(body) = &req.body {
            builder.body(body.as_bytes());
        }

        if let Some(content_type) = &req.content_type {
            builder.content_type(content_type);
        }

        builder.build()
    }
}

fn enter(state: State) {
    debug!("-> {}", state);
}

fn echo<W: Write + ?Sized>(out: &mut W, msg: &OutgoingRequest) -> std::io::Result<()> {
    out.write_all(b"Sending request:\n")?;
    out.write_all(msg.as_bytes())?;
    out.write_all(b"\n")
}
