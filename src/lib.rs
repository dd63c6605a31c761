//!Minimal blocking HTTP/1.1 client.
//!
//!Sends exactly one request over plain TCP with `Connection: close` and hands
//!back the raw bytes of the response, unparsed. HTTPS is refused, not downgraded.
//!
//!## Example
//!```no_run
//!use minicurl::{
//!    config::{ClientConfig, RequestConfig},
//!    session::Session,
//!    stream::TcpConnector,
//!};
//!
//!let mut session = Session::new(TcpConnector, ClientConfig::default());
//!let mut out = Vec::new();
//!session.run(&RequestConfig::new("http://example.com/"), &mut out).unwrap();
//!
//!println!("{}", String::from_utf8_lossy(&out));
//!```
pub mod config;
pub mod error;
pub mod request;
pub mod session;
pub mod stream;
pub mod url;
