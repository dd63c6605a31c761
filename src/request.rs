//! creating HTTP requests
use crate::error::Error;
use std::{convert, fmt, str};

const CR_LF: &str = "\r\n";
const HTTP_V: &str = "HTTP/1.1";

///Default bound for a whole request message, head and body together.
pub const MAX_REQUEST_BYTES: usize = 10_000;

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Method {
    GET,
    HEAD,
    POST,
    PUT,
    DELETE,
    OPTIONS,
    PATCH,
    Other(String),
}

impl Default for Method {
    fn default() -> Self {
        Method::GET
    }
}

impl convert::AsRef<str> for Method {
    fn as_ref(&self) -> &str {
        use self::Method::*;

        match self {
            GET => "GET",
            HEAD => "HEAD",
            POST => "POST",
            PUT => "PUT",
            DELETE => "DELETE",
            OPTIONS => "OPTIONS",
            PATCH => "PATCH",
            Other(m) => m,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl str::FromStr for Method {
    type Err = Error;

    ///Takes the method verbatim. Only the request-line delimiters are refused.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use self::Method::*;

        if s.is_empty() || s.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(Error::Usage(format!("invalid method {:?}", s)));
        }

        let method = match s {
            "GET" => GET,
            "HEAD" => HEAD,
            "POST" => POST,
            "PUT" => PUT,
            "DELETE" => DELETE,
            "OPTIONS" => OPTIONS,
            "PATCH" => PATCH,
            other => Other(other.to_string()),
        };

        Ok(method)
    }
}

///Complete request message, ready to be written to a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingRequest(Vec<u8>);

impl OutgoingRequest {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl convert::AsRef<[u8]> for OutgoingRequest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for OutgoingRequest {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

///Assembles a single HTTP/1.1 request message.
///
///The message always ends its head with `Connection: close`. A non-empty body
///adds `Content-Length` and, when a content type is set, `Content-Type`.
#[derive(Clone, Debug, PartialEq)]
pub struct RequestBuilder<'a> {
    method: Method,
    path: &'a str,
    host: &'a str,
    body: Option<&'a [u8]>,
    content_type: Option<&'a str>,
    max_len: usize,
}

impl<'a> RequestBuilder<'a> {
    ///Creates new `RequestBuilder` with default parameters
    pub fn new(path: &'a str, host: &'a str) -> RequestBuilder<'a> {
        RequestBuilder {
            method: Method::GET,
            path,
            host,
            body: None,
            content_type: None,
            max_len: MAX_REQUEST_BYTES,
        }
    }

    ///Sets request method
    pub fn method(&mut self, method: Method) -> &mut Self {
        self.method = method;
        self
    }

    ///Sets body for request
    pub fn body(&mut self, body: &'a [u8]) -> &mut Self {
        self.body = Some(body);
        self
    }

    ///Sets value of the `Content-Type` header. Ignored when there is no body.
    pub fn content_type(&mut self, content_type: &'a str) -> &mut Self {
        self.content_type = Some(content_type);
        self
    }

    ///Sets maximum size of the whole message
    pub fn max_len(&mut self, max_len: usize) -> &mut Self {
        self.max_len = max_len;
        self
    }

    ///Builds request message.
    ///
    ///Fails with `RequestTooLarge` when the message would exceed the bound,
    ///and with `Usage` when the content type would break the header block.
    pub fn build(&self) -> Result<OutgoingRequest, Error> {
        let body = self.body.filter(|b| !b.is_empty());
        let content_type = self.content_type.filter(|t| !t.is_empty());

        if let Some(t) = content_type {
            check_content_type(t)?;
        }

        let mut head = format!(
            "{} {} {}{}Host: {}{}",
            self.method, self.path, HTTP_V, CR_LF, self.host, CR_LF
        );

        if let Some(b) = body {
            head += &format!("Content-Length: {}{}", b.len(), CR_LF);

            if let Some(t) = content_type {
                head += &format!("Content-Type: {}{}", t, CR_LF);
            }
        }

        head += "Connection: close";
        head += CR_LF;
        head += CR_LF;

        let len = head.len() + body.map_or(0, |b| b.len());
        if len > self.max_len {
            return Err(Error::RequestTooLarge {
                len,
                max: self.max_len,
            });
        }

        let mut msg = Vec::with_capacity(len);
        msg.extend_from_slice(head.as_bytes());

        if let Some(b) = body {
            msg.extend_from_slice(b);
        }

        Ok(OutgoingRequest(msg))
    }
}

///Refuses content types that would end the header line early.
pub(crate) fn check_content_type(content_type: &str) -> Result<(), Error> {
    if content_type.contains(|c: char| c == '\r' || c == '\n') {
        return Err(Error::Usage("content type contains a line break".to_string()));
    }

    Ok(())
}

///Builds request message with the default size bound.
pub fn build(
    method: Method,
    path: &str,
    host: &str,
    body: Option<&[u8]>,
    content_type: Option<&str>,
) -> Result<OutgoingRequest, Error> {
    let mut builder = RequestBuilder::new(path, host);
    builder.method(method);

    if let Some(b) = body {
        builder.body(b);
    }

    if let Some(t) = content_type {
        builder.content_type(t);
    }

    builder.build()
}
