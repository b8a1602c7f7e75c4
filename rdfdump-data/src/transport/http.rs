//! HTTP transport built on the blocking `reqwest` client.

use std::{
    io::{self, BufReader},
    time::Duration,
};

use log::debug;
use rdfdump_core::{DocumentStream, Locator, Transport, TransportError};
use reqwest::{
    blocking::{Client, Response},
    header::USER_AGENT,
};

/// User agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = concat!("rdfdump/", env!("CARGO_PKG_VERSION"));

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
const RESPONSE_BUFFER_BYTES: usize = 64 * 1024;

/// Error raised when the HTTP client cannot be built.
pub type ClientBuildError = reqwest::Error;

/// Fetches `http:` and `https:` locators.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    user_agent: String,
}

impl HttpTransport {
    /// Build a transport with the default user agent.
    ///
    /// # Errors
    /// Returns [`ClientBuildError`] when the TLS backend cannot be
    /// initialised.
    pub fn new() -> Result<Self, ClientBuildError> {
        let client = Client::builder().connect_timeout(CONNECT_TIMEOUT).build()?;
        Ok(Self {
            client,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        })
    }

    /// Override the default user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    fn call(&self, url: &str) -> Result<Response, TransportError> {
        self.client
            .get(url)
            .header(USER_AGENT, self.user_agent.as_str())
            .send()
            .map_err(|err| convert_reqwest_error(err, url))?
            .error_for_status()
            .map_err(|err| convert_reqwest_error(err, url))
    }
}

impl Transport for HttpTransport {
    fn open(&self, locator: &Locator) -> Result<DocumentStream, TransportError> {
        if !matches!(locator.scheme(), "http" | "https") {
            return Err(TransportError::UnsupportedScheme {
                scheme: locator.scheme().to_owned(),
                locator: locator.to_string(),
            });
        }
        let url = locator.as_str();
        let response = self.call(url)?;
        debug!("fetched {url} with status {}", response.status());
        Ok(Box::new(BufReader::with_capacity(
            RESPONSE_BUFFER_BYTES,
            response,
        )))
    }
}

fn convert_reqwest_error(error: reqwest::Error, url: &str) -> TransportError {
    if let Some(status) = error.status() {
        return TransportError::Http {
            url: url.to_owned(),
            status: status.as_u16(),
            message: status
                .canonical_reason()
                .map_or_else(|| error.to_string(), str::to_owned),
        };
    }

    let kind = if error.is_timeout() {
        io::ErrorKind::TimedOut
    } else {
        io::ErrorKind::Other
    };
    TransportError::Network {
        url: url.to_owned(),
        source: io::Error::new(kind, error),
    }
}

#[cfg(test)]
mod tests {
    use std::{
        io::{Read, Write},
        net::TcpListener,
        thread,
    };

    use super::*;
    use rstest::rstest;

    /// Serve one canned HTTP response on a loopback port.
    fn serve_once(response: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback listener");
        let address = listener.local_addr().expect("listener address");
        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut request = [0_u8; 1024];
                let _ = stream.read(&mut request);
                let _ = stream.write_all(response.as_bytes());
            }
        });
        format!("http://{address}/doc.rdf")
    }

    #[rstest]
    fn fetches_documents_over_http() {
        let url = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Length: 10\r\nConnection: close\r\n\r\n<rdf:RDF/>",
        );
        let locator = Locator::parse(&url).expect("valid locator");
        let transport = HttpTransport::new().expect("client builds");

        let mut body = String::new();
        transport
            .open(&locator)
            .expect("request succeeds")
            .read_to_string(&mut body)
            .expect("body reads");

        assert_eq!(body, "<rdf:RDF/>");
    }

    #[rstest]
    fn maps_error_statuses() {
        let url = serve_once("HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
        let locator = Locator::parse(&url).expect("valid locator");
        let transport = HttpTransport::new().expect("client builds");

        let Err(err) = transport.open(&locator) else {
            panic!("a 404 must fail");
        };

        match err {
            TransportError::Http { status, message, .. } => {
                assert_eq!(status, 404);
                assert_eq!(message, "Not Found");
            }
            other => panic!("expected an HTTP status error, got {other}"),
        }
    }

    #[rstest]
    fn rejects_non_http_locators() {
        let locator = Locator::parse("ftp://example.org/doc").expect("valid locator");
        let transport = HttpTransport::new().expect("client builds");

        let Err(err) = transport.open(&locator) else {
            panic!("ftp is not http");
        };

        assert!(matches!(err, TransportError::UnsupportedScheme { .. }));
    }
}
