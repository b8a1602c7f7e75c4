//! Transports that turn locators into byte streams.
//!
//! The caller picks a transport when building a parser; [`SchemeTransport`]
//! routes each locator to the file or HTTP transport by scheme.

mod file;
mod http;

use log::debug;
use rdfdump_core::{DocumentStream, Locator, Transport, TransportError};

pub use self::file::FileTransport;
pub use self::http::{ClientBuildError, DEFAULT_USER_AGENT, HttpTransport};

/// Dispatches on the locator's scheme.
#[derive(Debug, Clone)]
pub struct SchemeTransport {
    file: FileTransport,
    http: Option<HttpTransport>,
}

impl SchemeTransport {
    /// Route `file:` locators to disk and `http:`/`https:` to the network.
    ///
    /// # Errors
    /// Returns [`ClientBuildError`] when the HTTP client cannot be built.
    pub fn new() -> Result<Self, ClientBuildError> {
        Ok(Self {
            file: FileTransport,
            http: Some(HttpTransport::new()?),
        })
    }

    /// Serve `file:` locators only.
    #[must_use]
    pub const fn local() -> Self {
        Self {
            file: FileTransport,
            http: None,
        }
    }

    /// Use `http` for network locators.
    #[must_use]
    pub fn with_http(mut self, http: HttpTransport) -> Self {
        self.http = Some(http);
        self
    }
}

impl Transport for SchemeTransport {
    fn open(&self, locator: &Locator) -> Result<DocumentStream, TransportError> {
        debug!("opening {locator}");
        match (locator.scheme(), &self.http) {
            ("file", _) => self.file.open(locator),
            ("http" | "https", Some(http)) => http.open(locator),
            (scheme, _) => Err(TransportError::UnsupportedScheme {
                scheme: scheme.to_owned(),
                locator: locator.to_string(),
            }),
        }
    }
}
