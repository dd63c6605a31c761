//! run configuration
use crate::{
    error::Error,
    request::{self, Method, MAX_REQUEST_BYTES},
};
use std::time::Duration;

///Default bound for the response buffer.
pub const MAX_RESPONSE_BYTES: usize = 9_999;
///Default limit for each blocking connect, write and read.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

///What to send, as given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestConfig {
    pub method: Method,
    pub url: String,
    pub body: Option<String>,
    pub content_type: Option<String>,
    pub verbose: bool,
}

impl RequestConfig {
    ///Creates new `RequestConfig` for a plain `GET` of `url`.
    pub fn new<T: Into<String>>(url: T) -> RequestConfig {
        RequestConfig {
            method: Method::GET,
            url: url.into(),
            body: None,
            content_type: None,
            verbose: false,
        }
    }

    ///Checks values that would corrupt the request line or header block.
    pub fn validate(&self) -> Result<(), Error> {
        if self.url.is_empty() {
            return Err(Error::Usage("missing URL".to_string()));
        }

        if let Method::Other(m) = &self.method {
            m.parse::<Method>()?;
        }

        match &self.content_type {
            Some(t) => request::check_content_type(t),
            None => Ok(()),
        }
    }
}

///How much of the response is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadPolicy {
    ///One bounded read; whatever the first read returns is the response.
    #[default]
    Single,
    ///Read until the server closes the connection or the buffer is full.
    UntilClose,
}

///Transport limits applied to every run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    ///`None` blocks without limit.
    pub timeout: Option<Duration>,
    pub max_request_bytes: usize,
    pub max_response_bytes: usize,
    pub read_policy: ReadPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            timeout: Some(DEFAULT_TIMEOUT),
            max_request_bytes: MAX_REQUEST_BYTES,
            max_response_bytes: MAX_RESPONSE_BYTES,
            read_policy: ReadPolicy::Single,
        }
    }
}
