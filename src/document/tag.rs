use std::{fmt, ops::Deref, str::FromStr};

use non_empty_string::NonEmptyString;

/// A validated markup tag name.
///
/// Tag names must be non-empty and contain no whitespace. Beyond direct
/// construction there are two canonical forms derived from data keys:
/// [`TagName::category`] for root segments and [`TagName::camelized`] for
/// everything below them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagName(NonEmptyString);

impl TagName {
    /// Create a new validated tag name.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTagError`] if the string is empty or contains
    /// whitespace.
    pub fn new(s: String) -> Result<Self, InvalidTagError> {
        if s.chars().any(char::is_whitespace) {
            return Err(InvalidTagError(s));
        }
        let inner = NonEmptyString::new(s.clone()).map_err(|_| InvalidTagError(s))?;
        Ok(Self(inner))
    }

    /// The upper-cased category form of a data key, used for the root
    /// segment of a serialized subtree: `ce` becomes `CE`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTagError`] if `key` does not upper-case to a valid
    /// tag name.
    pub fn category(key: &str) -> Result<Self, InvalidTagError> {
        Self::new(key.to_uppercase()).map_err(|_| InvalidTagError(key.to_string()))
    }

    /// The upper camel case form of a data key: `cableLength` becomes
    /// `CableLength`, and `unit_of_measure` becomes `UnitOfMeasure`.
    ///
    /// Underscore- and hyphen-separated parts are joined with their initials
    /// capitalized; the remainder of each part is preserved as written.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTagError`] if nothing remains once separators are
    /// stripped, or if `key` contains whitespace.
    pub fn camelized(key: &str) -> Result<Self, InvalidTagError> {
        let mut tag = String::with_capacity(key.len());
        for part in key.split(['_', '-']).filter(|part| !part.is_empty()) {
            let mut chars = part.chars();
            if let Some(first) = chars.next() {
                tag.extend(first.to_uppercase());
                tag.push_str(chars.as_str());
            }
        }
        Self::new(tag).map_err(|_| InvalidTagError(key.to_string()))
    }

    /// The tag name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl FromStr for TagName {
    type Err = InvalidTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl TryFrom<&str> for TagName {
    type Error = InvalidTagError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<String> for TagName {
    type Error = InvalidTagError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl AsRef<str> for TagName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Deref for TagName {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The error returned when a string is not a valid tag name.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Invalid tag name '{0}': must be non-empty and contain no whitespace")]
pub struct InvalidTagError(String);
