//! The fetch collaborator seam.

use std::{
    collections::HashMap,
    io::{BufRead, Cursor},
    sync::Arc,
};

use crate::{Locator, TransportError};

/// A buffered byte stream for one document.
pub type DocumentStream = Box<dyn BufRead + Send>;

/// Turn a [`Locator`] into a byte stream.
///
/// Local files and network fetches are both valid implementations; the
/// caller chooses one when building a [`crate::Parser`].
pub trait Transport {
    /// Open the document named by `locator`.
    fn open(&self, locator: &Locator) -> Result<DocumentStream, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn open(&self, locator: &Locator) -> Result<DocumentStream, TransportError> {
        (**self).open(locator)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn open(&self, locator: &Locator) -> Result<DocumentStream, TransportError> {
        (**self).open(locator)
    }
}

/// Serves documents held in memory, keyed by locator.
///
/// Useful for parsing strings that never touched the filesystem and for
/// exercising grammars without I/O.
#[derive(Debug, Clone, Default)]
pub struct MemoryTransport {
    documents: HashMap<Locator, Arc<[u8]>>,
}

impl MemoryTransport {
    /// Create an empty transport.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `bytes` under `locator`, replacing any earlier document.
    #[must_use]
    pub fn with_document(mut self, locator: &Locator, bytes: impl AsRef<[u8]>) -> Self {
        self.insert(locator, bytes);
        self
    }

    /// Register `bytes` under `locator`, replacing any earlier document.
    pub fn insert(&mut self, locator: &Locator, bytes: impl AsRef<[u8]>) {
        self.documents
            .insert(locator.clone(), Arc::from(bytes.as_ref()));
    }
}

impl Transport for MemoryTransport {
    fn open(&self, locator: &Locator) -> Result<DocumentStream, TransportError> {
        let bytes = self
            .documents
            .get(locator)
            .ok_or_else(|| TransportError::NotFound {
                locator: locator.to_string(),
            })?;
        Ok(Box::new(Cursor::new(Arc::clone(bytes))))
    }
}
