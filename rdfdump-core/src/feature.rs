//! Named parser toggles.
//!
//! The set of recognised names is closed: an unknown name is a caller error
//! and is reported rather than ignored, so a typo never yields a silently
//! different parse.

use std::{fmt, str::FromStr};

use thiserror::Error;

/// A recognised parser feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[non_exhaustive]
pub enum Feature {
    /// Skip leading bytes until the start of the statement-bearing root
    /// element, tolerating prose or markup before it.
    Scanning,
    /// Accept unprefixed `about`, `resource`, `ID`, `nodeID`, `parseType` and
    /// `datatype` attributes as if they carried the RDF namespace.
    AllowNonNsAttributes,
    /// Treat unknown `rdf:parseType` values as `Literal` rather than failing.
    AllowOtherParseTypes,
}

impl Feature {
    /// Every recognised feature, in declaration order.
    pub const ALL: [Self; 3] = [
        Self::Scanning,
        Self::AllowNonNsAttributes,
        Self::AllowOtherParseTypes,
    ];

    /// The feature's external name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Scanning => "scanning",
            Self::AllowNonNsAttributes => "allow-non-ns-attributes",
            Self::AllowOtherParseTypes => "allow-other-parse-types",
        }
    }

    const fn default_value(self) -> bool {
        match self {
            Self::Scanning | Self::AllowNonNsAttributes => false,
            Self::AllowOtherParseTypes => true,
        }
    }
}

impl FromStr for Feature {
    type Err = UnknownFeatureError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|feature| feature.name() == name)
            .ok_or_else(|| UnknownFeatureError {
                name: name.to_owned(),
            })
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A feature name outside the recognised set.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown parser feature {name:?}")]
pub struct UnknownFeatureError {
    name: String,
}

impl UnknownFeatureError {
    /// The rejected name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Values for every recognised [`Feature`].
///
/// # Examples
/// ```
/// use rdfdump_core::{Feature, FeatureSet};
///
/// let mut features = FeatureSet::default();
/// features.set("scanning", true)?;
/// assert!(features.get(Feature::Scanning));
/// assert!(features.set("scaning", true).is_err());
/// # Ok::<(), rdfdump_core::UnknownFeatureError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureSet {
    scanning: bool,
    allow_non_ns_attributes: bool,
    allow_other_parse_types: bool,
}

impl FeatureSet {
    /// A feature set holding every default value.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            scanning: Feature::Scanning.default_value(),
            allow_non_ns_attributes: Feature::AllowNonNsAttributes.default_value(),
            allow_other_parse_types: Feature::AllowOtherParseTypes.default_value(),
        }
    }

    /// Set a feature by its external name.
    pub fn set(&mut self, name: &str, value: bool) -> Result<(), UnknownFeatureError> {
        let feature = name.parse::<Feature>()?;
        self.enable(feature, value);
        Ok(())
    }

    /// Set a feature.
    pub const fn enable(&mut self, feature: Feature, value: bool) {
        *self.slot(feature) = value;
    }

    /// Builder form of [`FeatureSet::enable`].
    #[must_use]
    pub const fn with(mut self, feature: Feature, value: bool) -> Self {
        self.enable(feature, value);
        self
    }

    /// Current value of a feature.
    #[must_use]
    pub const fn get(&self, feature: Feature) -> bool {
        match feature {
            Feature::Scanning => self.scanning,
            Feature::AllowNonNsAttributes => self.allow_non_ns_attributes,
            Feature::AllowOtherParseTypes => self.allow_other_parse_types,
        }
    }

    /// Iterate over every feature and its value.
    pub fn iter(&self) -> impl Iterator<Item = (Feature, bool)> + '_ {
        Feature::ALL
            .into_iter()
            .map(move |feature| (feature, self.get(feature)))
    }

    const fn slot(&mut self, feature: Feature) -> &mut bool {
        match feature {
            Feature::Scanning => &mut self.scanning,
            Feature::AllowNonNsAttributes => &mut self.allow_non_ns_attributes,
            Feature::AllowOtherParseTypes => &mut self.allow_other_parse_types,
        }
    }
}

impl Default for FeatureSet {
    fn default() -> Self {
        Self::new()
    }
}
