//! url decomposition
use crate::error::{ParseErr, UrlPart};
use std::{fmt, str};
use unicase::UniCase;

pub const MAX_SCHEME_LEN: usize = 5;
pub const MAX_HOST_LEN: usize = 99;
pub const MAX_PATH_LEN: usize = 99;

const HTTP_PORT: u16 = 80;
const HTTPS_PORT: u16 = 443;

///URL split into the parts needed to address a request.
///
///Accepts `scheme://host/path` and `scheme://host`; in the second form the
///path is `/`. The host may carry an explicit port (`host:8080`).
///
///# Example
///```
///use minicurl::url::ParsedUrl;
///
///let url: ParsedUrl = "http://example.com/foo".parse().unwrap();
///assert_eq!(url.host(), "example.com");
///assert_eq!(url.path(), "/foo");
///```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedUrl {
    scheme: String,
    host: String,
    port: Option<u16>,
    path: String,
}

impl ParsedUrl {
    ///Decomposes `url`. Same as `url.parse::<ParsedUrl>()`.
    pub fn parse(url: &str) -> Result<ParsedUrl, ParseErr> {
        url.parse()
    }

    ///Returns scheme of this `ParsedUrl`.
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    ///Returns host of this `ParsedUrl`, without port.
    pub fn host(&self) -> &str {
        &self.host
    }

    ///Returns port set explicitly in the URL.
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    ///Returns path of this `ParsedUrl`. Always starts with `/`.
    pub fn path(&self) -> &str {
        &self.path
    }

    ///Returns port corresponding to this `ParsedUrl`.
    ///Returns default port if it hasn't been set in the url.
    pub fn corr_port(&self) -> u16 {
        let default_port = if self.is_https() {
            HTTPS_PORT
        } else {
            HTTP_PORT
        };

        self.port.unwrap_or(default_port)
    }

    ///Returns host (and explicit port, if any) to use in a header.
    pub fn authority(&self) -> String {
        match self.port {
            Some(p) => format!("{}:{}", self.host, p),
            None => self.host.clone(),
        }
    }

    ///Checks if scheme is `https`, ignoring case.
    pub fn is_https(&self) -> bool {
        UniCase::new(self.scheme.as_str()) == UniCase::new("https")
    }
}

impl fmt::Display for ParsedUrl {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}://{}{}", self.scheme, self.authority(), self.path)
    }
}

impl str::FromStr for ParsedUrl {
    type Err = ParseErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(ParseErr::Malformed);
        }

        let (scheme, url_part) = get_chunks(s, ":");
        let scheme = match scheme {
            Some(s) if !s.is_empty() => s,
            _ => return Err(ParseErr::Malformed),
        };

        let url_part = match url_part {
            Some(u) if u.starts_with("//") => &u[2..],
            _ => return Err(ParseErr::Malformed),
        };
        check_len(scheme, UrlPart::Scheme, MAX_SCHEME_LEN)?;

        let (authority, resource) = get_chunks(url_part, "/");
        let authority = match authority {
            Some(a) if !a.is_empty() => a,
            _ => return Err(ParseErr::Malformed),
        };
        check_len(authority, UrlPart::Host, MAX_HOST_LEN)?;

        let (host, port) = get_chunks(authority, ":");
        let host = match host {
            Some(h) if !h.is_empty() => h.to_string(),
            _ => return Err(ParseErr::Malformed),
        };
        let port = match port {
            Some(p) => Some(p.parse().map_err(|_| ParseErr::Malformed)?),
            None => None,
        };

        let path = match resource {
            Some(r) => {
                check_len(r, UrlPart::Path, MAX_PATH_LEN)?;
                format!("/{}", r)
            }
            None => "/".to_string(),
        };

        Ok(ParsedUrl {
            scheme: scheme.to_string(),
            host,
            port,
            path,
        })
    }
}

fn check_len(s: &str, part: UrlPart, max: usize) -> Result<(), ParseErr> {
    if s.chars().count() > max {
        Err(ParseErr::TooLong { part, max })
    } else {
        Ok(())
    }
}

//Splits `s` by `separator`. If `separator` is found inside `s`, it will return two `Some` values
//consisting parts of splitted `&str`. If `separator` is at the end of `s` or it's not found,
//it will return tuple consisting `Some` with `s` inside and None.
fn get_chunks<'a>(s: &'a str, separator: &str) -> (Option<&'a str>, Option<&'a str>) {
    match s.find(separator) {
        Some(i) => {
            let (chunk, rest) = s.split_at(i);
            let rest = &rest[separator.len()..];
            let rest = if rest.is_empty() { None } else { Some(rest) };

            (Some(chunk), rest)
        }
        None => {
            if !s.is_empty() {
                (Some(s), None)
            } else {
                (None, None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_URLS: [&str; 4] = [
        "http://example.com/foo",
        "http://example.com",
        "ftp://host/path/to/file.txt",
        "https://en.wikipedia.org/wiki/Hypertext_Transfer_Protocol?x=1",
    ];

    #[test]
    fn url_parse() {
        for url in TEST_URLS.iter() {
            url.parse::<ParsedUrl>().unwrap();
        }
    }

    #[test]
    fn url_full_parse() {
        let url = ParsedUrl::parse("http://example.com:8080/a/b?key=value").unwrap();

        assert_eq!(url.scheme(), "http");
        assert_eq!(url.host(), "example.com");
        assert_eq!(url.port(), Some(8080));
        assert_eq!(url.path(), "/a/b?key=value");
    }

    #[test]
    fn url_scheme() {
        let urls: Vec<_> = TEST_URLS
            .iter()
            .map(|url| url.parse::<ParsedUrl>().unwrap())
            .collect();

        assert_eq!(urls[0].scheme(), "http");
        assert_eq!(urls[1].scheme(), "http");
        assert_eq!(urls[2].scheme(), "ftp");
        assert_eq!(urls[3].scheme(), "https");
    }

    #[test]
    fn url_host() {
        let url: ParsedUrl = TEST_URLS[0].parse().unwrap();
        assert_eq!(url.host(), "example.com");
        assert_eq!(url.port(), None);

        let url: ParsedUrl = TEST_URLS[3].parse().unwrap();
        assert_eq!(url.host(), "en.wikipedia.org");
    }

    #[test]
    fn url_path() {
        let urls: Vec<_> = TEST_URLS
            .iter()
            .map(|url| url.parse::<ParsedUrl>().unwrap())
            .collect();

        assert_eq!(urls[0].path(), "/foo");
        assert_eq!(urls[1].path(), "/");
        assert_eq!(urls[2].path(), "/path/to/file.txt");
        assert_eq!(urls[3].path(), "/wiki/Hypertext_Transfer_Protocol?x=1");
    }

    #[test]
    fn url_trailing_slash() {
        let url: ParsedUrl = "http://example.com/".parse().unwrap();
        assert_eq!(url.path(), "/");
    }

    #[test]
    fn url_corr_port() {
        let url: ParsedUrl = "http://example.com/foo".parse().unwrap();
        assert_eq!(url.corr_port(), 80);

        let url: ParsedUrl = "https://example.com/foo".parse().unwrap();
        assert_eq!(url.corr_port(), 443);

        let url: ParsedUrl = "ftp://example.com/foo".parse().unwrap();
        assert_eq!(url.corr_port(), 80);

        let url: ParsedUrl = "http://example.com:8080".parse().unwrap();
        assert_eq!(url.corr_port(), 8080);
    }

    #[test]
    fn url_authority() {
        let url: ParsedUrl = "http://example.com/foo".parse().unwrap();
        assert_eq!(url.authority(), "example.com");

        let url: ParsedUrl = "http://127.0.0.1:8080/foo".parse().unwrap();
        assert_eq!(url.authority(), "127.0.0.1:8080");
    }

    #[test]
    fn url_is_https() {
        let url: ParsedUrl = "https://example.com".parse().unwrap();
        assert!(url.is_https());

        let url: ParsedUrl = "HTTPS://example.com".parse().unwrap();
        assert!(url.is_https());

        let url: ParsedUrl = "http://example.com".parse().unwrap();
        assert!(!url.is_https());
    }

    #[test]
    fn url_display() {
        let url: ParsedUrl = "http://example.com".parse().unwrap();
        assert_eq!(url.to_string(), "http://example.com/");

        let url: ParsedUrl = "http://example.com:81/x".parse().unwrap();
        assert_eq!(url.to_string(), "http://example.com:81/x");
    }

    #[test]
    fn url_malformed() {
        const MALFORMED: [&str; 13] = [
            "example.com/foo",
            "localhost",
            "http//host",
            "example.com:8080/foo",
            "http:/example.com",
            "http:example.com",
            "://example.com",
            "http://",
            "http:///foo",
            "http://:80/foo",
            "http://example.com:http/",
            "http://example.com/a b",
            "http://example.com/a\r\nX-Injected: 1",
        ];

        for url in MALFORMED.iter() {
            assert_eq!(
                url.parse::<ParsedUrl>(),
                Err(ParseErr::Malformed),
                "{:?}",
                url
            );
        }
    }

    #[test]
    fn url_too_long() {
        let scheme = "abcdef://example.com";
        assert_eq!(
            ParsedUrl::parse(scheme),
            Err(ParseErr::TooLong {
                part: UrlPart::Scheme,
                max: MAX_SCHEME_LEN
            })
        );

        let host = format!("http://{}/", "h".repeat(MAX_HOST_LEN + 1));
        assert_eq!(
            ParsedUrl::parse(&host),
            Err(ParseErr::TooLong {
                part: UrlPart::Host,
                max: MAX_HOST_LEN
            })
        );

        let path = format!("http://example.com/{}", "p".repeat(MAX_PATH_LEN + 1));
        assert_eq!(
            ParsedUrl::parse(&path),
            Err(ParseErr::TooLong {
                part: UrlPart::Path,
                max: MAX_PATH_LEN
            })
        );
    }

    #[test]
    fn url_without_separator_is_malformed() {
        let long = format!("{}/{}", "h".repeat(MAX_HOST_LEN + 1), "p".repeat(10));

        assert_eq!(ParsedUrl::parse("localhost"), Err(ParseErr::Malformed));
        assert_eq!(ParsedUrl::parse(&long), Err(ParseErr::Malformed));
        assert_eq!(ParsedUrl::parse("abcdefgh:/x"), Err(ParseErr::Malformed));
    }

    #[test]
    fn url_at_limits() {
        let url = format!(
            "https://{}/{}",
            "h".repeat(MAX_HOST_LEN),
            "p".repeat(MAX_PATH_LEN)
        );
        let url: ParsedUrl = url.parse().unwrap();

        assert_eq!(url.host().len(), MAX_HOST_LEN);
        assert_eq!(url.path().len(), MAX_PATH_LEN + 1);
    }

    #[test]
    fn chunks() {
        assert_eq!(get_chunks("a:b", ":"), (Some("a"), Some("b")));
        assert_eq!(get_chunks("a:", ":"), (Some("a"), None));
        assert_eq!(get_chunks("a", ":"), (Some("a"), None));
        assert_eq!(get_chunks("", ":"), (None, None));
    }
}
