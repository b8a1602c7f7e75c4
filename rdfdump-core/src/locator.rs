//! Immutable identifiers used both as fetch targets and resolution bases.

use std::{
    fmt,
    ops::Deref,
    path::{Path, PathBuf},
    str::FromStr,
};

use thiserror::Error;
use url::Url;

/// Errors raised when a reference cannot become a [`Locator`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum LocatorError {
    /// An absolute locator was requested from an empty string.
    #[error("locator must not be empty")]
    Empty,
    /// The reference is not valid URI reference syntax.
    #[error("invalid locator {reference:?}: {source}")]
    Malformed {
        /// The offending reference text.
        reference: String,
        /// Parser diagnostic from the `url` crate.
        #[source]
        source: url::ParseError,
    },
    /// A local path could not be expressed as a `file:` locator.
    #[error("path {path:?} cannot be expressed as a file locator")]
    UnrepresentablePath {
        /// The path that was rejected.
        path: PathBuf,
    },
}

/// An absolute, immutable document identifier.
///
/// Locators compare by their normalised serialisation, so
/// `HTTP://Example.org/a/../b` and `http://example.org/b` are equal.
///
/// # Examples
/// ```
/// use rdfdump_core::Locator;
///
/// let base = Locator::parse("http://example.org/dir/doc.rdf")?;
/// let resolved = Locator::resolve(Some(&base), "other.rdf#me")?;
/// assert_eq!(resolved.as_str(), "http://example.org/dir/other.rdf#me");
/// # Ok::<(), rdfdump_core::LocatorError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Locator(Url);

impl Locator {
    /// Parse an absolute reference.
    pub fn parse(reference: &str) -> Result<Self, LocatorError> {
        Self::resolve(None, reference)
    }

    /// Resolve `relative` against `base`, producing a new locator.
    ///
    /// Without a base the reference must already be absolute. With a base an
    /// empty reference denotes the base document itself (its fragment is
    /// dropped), following RFC 3986.
    pub fn resolve(base: Option<&Self>, relative: &str) -> Result<Self, LocatorError> {
        let parsed = match base {
            None if relative.trim().is_empty() => return Err(LocatorError::Empty),
            None => Url::parse(relative),
            Some(base) => base.0.join(relative),
        };
        parsed.map(Self).map_err(|source| LocatorError::Malformed {
            reference: relative.to_owned(),
            source,
        })
    }

    /// Build a `file:` locator for a local path, relative to the working
    /// directory when the path is not absolute.
    pub fn from_file_path(path: &Path) -> Result<Self, LocatorError> {
        let unrepresentable = || LocatorError::UnrepresentablePath {
            path: path.to_path_buf(),
        };
        let absolute = std::path::absolute(path).map_err(|_| unrepresentable())?;
        Url::from_file_path(&absolute)
            .map(Self)
            .map_err(|()| unrepresentable())
    }

    /// The normalised string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// The URI scheme, lower-cased.
    #[must_use]
    pub fn scheme(&self) -> &str {
        self.0.scheme()
    }

    /// Local filesystem path for `file:` locators.
    #[must_use]
    pub fn to_file_path(&self) -> Option<PathBuf> {
        if self.scheme() == "file" {
            self.0.to_file_path().ok()
        } else {
            None
        }
    }

    /// Borrow the underlying [`Url`].
    #[must_use]
    pub const fn as_url(&self) -> &Url {
        &self.0
    }
}

impl FromStr for Locator {
    type Err = LocatorError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl From<Url> for Locator {
    fn from(value: Url) -> Self {
        Self(value)
    }
}

impl AsRef<str> for Locator {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Deref for Locator {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn base() -> Locator {
        Locator::parse("http://example.org/dir/doc.rdf#frag").expect("valid base")
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("no-scheme")]
    #[case("1http://example.org/")]
    #[case("http://")]
    fn parse_rejects_invalid_absolute_references(#[case] reference: &str) {
        assert!(Locator::parse(reference).is_err());
    }

    #[rstest]
    fn empty_reference_without_base_is_reported_as_empty() {
        assert_eq!(Locator::parse(""), Err(LocatorError::Empty));
    }

    #[rstest]
    #[case("other.rdf", "http://example.org/dir/other.rdf")]
    #[case("#me", "http://example.org/dir/doc.rdf#me")]
    #[case("../up", "http://example.org/up")]
    #[case("", "http://example.org/dir/doc.rdf")]
    #[case("urn:isbn:0451450523", "urn:isbn:0451450523")]
    fn resolve_joins_against_base(base: Locator, #[case] reference: &str, #[case] expected: &str) {
        let resolved = Locator::resolve(Some(&base), reference).expect("resolvable");
        assert_eq!(resolved.as_str(), expected);
    }

    #[rstest]
    fn resolving_an_absolute_reference_is_idempotent(base: Locator) {
        let absolute = "http://other.example/x#y";
        let once = Locator::resolve(Some(&base), absolute).expect("resolvable");
        let twice = Locator::resolve(Some(&base), once.as_str()).expect("resolvable");
        assert_eq!(once, twice);
        assert_eq!(once.as_str(), absolute);
    }

    #[rstest]
    fn resolution_leaves_the_base_untouched(base: Locator) {
        let before = base.clone();
        let _resolved = Locator::resolve(Some(&base), "elsewhere").expect("resolvable");
        assert_eq!(base, before);
    }

    #[rstest]
    fn equality_uses_normalised_form() {
        let left = Locator::parse("HTTP://Example.org/a/../b").expect("valid");
        let right = Locator::parse("http://example.org/b").expect("valid");
        assert_eq!(left, right);
    }

    #[rstest]
    fn file_paths_round_trip() {
        let path = std::env::temp_dir().join("rdfdump-locator.rdf");
        let locator = Locator::from_file_path(&path).expect("representable");
        assert_eq!(locator.scheme(), "file");
        assert_eq!(locator.to_file_path(), Some(path));
    }

    #[rstest]
    fn http_locators_have_no_file_path() {
        let locator = Locator::parse("http://example.org/doc").expect("valid");
        assert_eq!(locator.to_file_path(), None);
    }
}
