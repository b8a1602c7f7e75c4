//! Local file transport.

use camino::Utf8Path;
use log::debug;
use rdfdump_core::{DocumentStream, Locator, Transport, TransportError};

/// Opens `file:` locators through capability-based filesystem access.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileTransport;

impl Transport for FileTransport {
    fn open(&self, locator: &Locator) -> Result<DocumentStream, TransportError> {
        let path = locator
            .to_file_path()
            .ok_or_else(|| TransportError::UnsupportedScheme {
                scheme: locator.scheme().to_owned(),
                locator: locator.to_string(),
            })?;
        let utf8: &Utf8Path =
            rdfdump_fs::utf8_path(&path).map_err(|source| TransportError::Open {
                path: path.clone(),
                source,
            })?;
        let reader = rdfdump_fs::open_document(utf8).map_err(|source| TransportError::Open {
            path: path.clone(),
            source,
        })?;
        debug!("opened local document {utf8}");
        Ok(Box::new(reader))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use super::*;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn workdir() -> TempDir {
        match TempDir::new() {
            Ok(dir) => dir,
            Err(err) => panic!("failed to create temporary directory: {err}"),
        }
    }

    #[rstest]
    fn opens_existing_files(workdir: TempDir) {
        let path = workdir.path().join("doc.rdf");
        std::fs::write(&path, "<rdf:RDF/>").expect("write fixture");
        let locator = Locator::from_file_path(&path).expect("file locator");

        let mut contents = String::new();
        FileTransport
            .open(&locator)
            .expect("file opens")
            .read_to_string(&mut contents)
            .expect("file reads");

        assert_eq!(contents, "<rdf:RDF/>");
    }

    #[rstest]
    fn missing_files_fail_to_open(workdir: TempDir) {
        let locator =
            Locator::from_file_path(&workdir.path().join("absent.rdf")).expect("file locator");

        let Err(err) = FileTransport.open(&locator) else {
            panic!("a missing file must not open");
        };

        assert!(matches!(err, TransportError::Open { .. }), "{err}");
    }

    #[rstest]
    fn other_schemes_are_unsupported() {
        let locator = Locator::parse("http://example.org/doc").expect("valid locator");

        let Err(err) = FileTransport.open(&locator) else {
            panic!("http locators are not files");
        };

        assert!(matches!(err, TransportError::UnsupportedScheme { .. }));
    }
}
