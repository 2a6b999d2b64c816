//! Closed sets of named variants with bidirectional lookup.
//!
//! An [`Enum`] maps symbolic names to raw document values and back: `pounds`
//! and `LB` both resolve to the same [`Variant`]. Enumerations back
//! restricted-choice fields and double as attribute registries for
//! schema-checked builders.

use std::collections::HashMap;

/// One member of an [`Enum`]: a symbolic name paired with the raw value that
/// appears in serialized documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    name: String,
    value: String,
}

impl Variant {
    /// The symbolic name, e.g. `pounds`.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }

    /// The raw document value, e.g. `LB`.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.value.as_str()
    }
}

/// An immutable enumeration of [`Variant`]s, addressable by symbolic name or
/// raw value.
///
/// The family name identifies the enumeration in diagnostics, so a rejected
/// value produces an error like `not a valid weight unit: 'stone'`.
#[derive(Debug, Clone)]
pub struct Enum {
    family: String,
    variants: Vec<Variant>,
    by_name: HashMap<String, usize>,
    by_value: HashMap<String, usize>,
}

impl Enum {
    /// Define an enumeration named `family` from `(name, value)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError`] if two pairs share a name or share a
    /// value. Lookup must be unambiguous in both directions.
    pub fn new(family: impl Into<String>, pairs: &[(&str, &str)]) -> Result<Self, DefinitionError> {
        let family = family.into();
        let mut variants = Vec::with_capacity(pairs.len());
        let mut by_name = HashMap::with_capacity(pairs.len());
        let mut by_value = HashMap::with_capacity(pairs.len());
        for (index, (name, value)) in pairs.iter().enumerate() {
            if by_name.insert((*name).to_string(), index).is_some() {
                return Err(DefinitionError::DuplicateName {
                    family,
                    name: (*name).to_string(),
                });
            }
            if by_value.insert((*value).to_string(), index).is_some() {
                return Err(DefinitionError::DuplicateValue {
                    family,
                    value: (*value).to_string(),
                });
            }
            variants.push(Variant {
                name: (*name).to_string(),
                value: (*value).to_string(),
            });
        }
        Ok(Self {
            family,
            variants,
            by_name,
            by_value,
        })
    }

    /// Define an enumeration whose names and values coincide.
    ///
    /// Useful for attribute registries, where only the set of legal names
    /// matters.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError`] if `names` contains a duplicate.
    pub fn of_names(family: impl Into<String>, names: &[&str]) -> Result<Self, DefinitionError> {
        let pairs: Vec<(&str, &str)> = names.iter().map(|name| (*name, *name)).collect();
        Self::new(family, &pairs)
    }

    /// The variant whose symbolic name or raw value equals `key`.
    ///
    /// Names are consulted first, then values. Returns [`None`] when neither
    /// direction matches.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<&Variant> {
        self.by_name
            .get(key)
            .or_else(|| self.by_value.get(key))
            .map(|&index| &self.variants[index])
    }

    /// Like [`Enum::lookup`], but a miss is an error.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidVariantError`] naming both the rejected value and
    /// this enumeration's family.
    pub fn require(&self, key: &str) -> Result<&Variant, InvalidVariantError> {
        self.lookup(key).ok_or_else(|| InvalidVariantError {
            family: self.family.clone(),
            value: key.to_string(),
        })
    }

    /// The family name used in diagnostics.
    #[must_use]
    pub const fn family(&self) -> &str {
        self.family.as_str()
    }

    /// Variants in definition order.
    pub fn variants(&self) -> impl Iterator<Item = &Variant> {
        self.variants.iter()
    }

    /// Number of variants.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.variants.len()
    }

    /// Whether the enumeration has no variants.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}

/// Errors raised while defining an [`Enum`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DefinitionError {
    /// Two variants share a symbolic name.
    #[error("duplicate name '{name}' in the {family} enumeration")]
    DuplicateName {
        /// Family of the enumeration being defined.
        family: String,
        /// The repeated name.
        name: String,
    },
    /// Two variants share a raw value.
    #[error("duplicate value '{value}' in the {family} enumeration")]
    DuplicateValue {
        /// Family of the enumeration being defined.
        family: String,
        /// The repeated value.
        value: String,
    },
}

/// A value failed validation against an [`Enum`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("not a valid {family}: '{value}'")]
pub struct InvalidVariantError {
    /// Family of the enumeration that rejected the value.
    pub family: String,
    /// The rejected value.
    pub value: String,
}
