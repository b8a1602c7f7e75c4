//! Local document access built on `cap-std` and `camino`.
#![forbid(unsafe_code)]

use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8};
use std::io::{self, BufReader};
use std::path::Path;

/// Read buffer used for local documents.
pub const DOCUMENT_BUFFER_BYTES: usize = 64 * 1024;

/// Borrow `path` as UTF-8, failing for paths the capability layer cannot name.
pub fn utf8_path(path: &Path) -> io::Result<&Utf8Path> {
    Utf8Path::from_path(path).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("path {} is not valid UTF-8", path.display()),
        )
    })
}

/// Open a UTF-8 file path using ambient authority.
pub fn open_utf8_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    fs_utf8::File::open_ambient(path, ambient_authority())
}

/// Open a regular file for buffered streaming.
///
/// Directories and other special files are rejected up front so callers see
/// an open failure rather than a read failure part way through a parse.
pub fn open_document(path: &Utf8Path) -> io::Result<BufReader<fs_utf8::File>> {
    let file = open_utf8_file(path)?;
    if !file.metadata()?.is_file() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{path} is not a regular file"),
        ));
    }
    Ok(BufReader::with_capacity(DOCUMENT_BUFFER_BYTES, file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use std::io::Read;
    use tempfile::TempDir;

    #[fixture]
    fn workdir() -> TempDir {
        match TempDir::new() {
            Ok(dir) => dir,
            Err(err) => panic!("failed to create temporary directory: {err}"),
        }
    }

    #[rstest]
    fn open_document_streams_file_contents(workdir: TempDir) {
        let path = workdir.path().join("doc.rdf");
        std::fs::write(&path, "<rdf:RDF/>").expect("write fixture");
        let path = utf8_path(&path).expect("utf-8 path");

        let mut contents = String::new();
        open_document(path)
            .expect("open document")
            .read_to_string(&mut contents)
            .expect("read document");

        assert_eq!(contents, "<rdf:RDF/>");
    }

    #[rstest]
    fn open_document_rejects_directories(workdir: TempDir) {
        let path = utf8_path(workdir.path()).expect("utf-8 path");

        assert!(open_document(path).is_err());
    }
}
