use clap::{error::ErrorKind, Parser};
use log::debug;
use minicurl::{
    config::{ClientConfig, ReadPolicy, RequestConfig, MAX_RESPONSE_BYTES},
    request::{Method, MAX_REQUEST_BYTES},
    session::Session,
    stream::TcpConnector,
};
use std::{
    io::{self, Write},
    process,
    time::Duration,
};

///Send one HTTP/1.1 request and print the raw response
#[derive(Debug, Parser)]
#[command(name = "minicurl", version)]
struct Cli {
    ///Target, as scheme://host[:port][/path]
    url: String,

    ///Request method
    #[arg(short = 'X', value_name = "METHOD", default_value = "GET")]
    method: Method,

    ///Request body
    #[arg(short = 'd', value_name = "DATA")]
    data: Option<String>,

    ///Value of the Content-Type header, sent along with a body
    #[arg(short = 'H', value_name = "CONTENT-TYPE")]
    content_type: Option<String>,

    ///Print the request before sending it
    #[arg(short = 'v')]
    verbose: bool,

    ///Limit in seconds for connecting, sending and receiving; 0 waits forever
    #[arg(long, value_name = "SECS", default_value_t = 30)]
    timeout: u64,

    ///Keep at most this many bytes of the response
    #[arg(
        long,
        value_name = "N",
        default_value_t = MAX_RESPONSE_BYTES,
        value_parser = positive
    )]
    max_response_bytes: usize,

    ///Refuse to send requests larger than this
    #[arg(long, value_name = "N", default_value_t = MAX_REQUEST_BYTES, value_parser = positive)]
    max_request_bytes: usize,

    ///Read until the server closes the connection instead of a single read
    #[arg(long)]
    drain: bool,
}

impl Cli {
    fn request_config(&self) -> RequestConfig {
        RequestConfig {
            method: self.method.clone(),
            url: self.url.clone(),
            body: self.data.clone(),
            content_type: self.content_type.clone(),
            verbose: self.verbose,
        }
    }

    fn client_config(&self) -> ClientConfig {
        ClientConfig {
            timeout: match self.timeout {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            },
            max_request_bytes: self.max_request_bytes,
            max_response_bytes: self.max_response_bytes,
            read_policy: if self.drain {
                ReadPolicy::UntilClose
            } else {
                ReadPolicy::Single
            },
        }
    }
}

fn positive(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("must be greater than 0".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            let _ = e.print();
            process::exit(code);
        }
    };
    debug!("{:?}", cli);

    let cnf = cli.client_config();
    let mut session = Session::new(TcpConnector, cnf);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let res = session.run(&cli.request_config(), &mut out);
    let _ = out.flush();

    match res {
        Ok(outcome) => debug!("done: {:?}", outcome),
        Err(e) => {
            eprintln!("minicurl: {}", e);
            process::exit(e.exit_code());
        }
    }
}
