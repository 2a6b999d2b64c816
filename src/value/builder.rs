use crate::enumeration::{Enum, InvalidVariantError};

use super::{Map, Value};

/// A scoped builder over a [`Map`].
///
/// An open builder accepts any field name and grows the mapping on demand;
/// [`MapBuilder::with_schema`] produces a checked builder that rejects names
/// absent from an attribute registry. Nested scopes are entered with
/// [`MapBuilder::nested`], and re-entering an existing scope merges into it
/// rather than replacing it.
#[derive(Debug)]
pub struct MapBuilder<'a> {
    target: &'a mut Map,
    schema: Option<&'a Enum>,
}

impl<'a> MapBuilder<'a> {
    /// An open builder over `target`: any field name is accepted.
    #[must_use]
    pub const fn new(target: &'a mut Map) -> Self {
        Self {
            target,
            schema: None,
        }
    }

    /// A checked builder over `target`: every field name must be a member of
    /// `schema` (by name or raw value).
    #[must_use]
    pub const fn with_schema(target: &'a mut Map, schema: &'a Enum) -> Self {
        Self {
            target,
            schema: Some(schema),
        }
    }

    /// Set `field` to `value`, overwriting any existing entry in place.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::UnknownAttribute`] if this builder is
    /// schema-checked and `field` is not a member of the registry.
    pub fn set(&mut self, field: &str, value: impl Into<Value>) -> Result<&mut Self, BuildError> {
        self.check(field)?;
        self.target.insert(field, value);
        Ok(self)
    }

    /// Descend into the sub-mapping at `field` and populate it with `body`.
    ///
    /// The child scope is open. A missing entry is created; an existing
    /// sub-mapping is re-entered so that repeated calls merge; an existing
    /// entry of any other shape is replaced by a fresh mapping.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::UnknownAttribute`] if this builder is
    /// schema-checked and `field` is not a member of the registry, or any
    /// error raised by `body`.
    pub fn nested(
        &mut self,
        field: &str,
        body: impl FnOnce(&mut MapBuilder<'_>) -> Result<(), BuildError>,
    ) -> Result<&mut Self, BuildError> {
        self.check(field)?;
        let mut child = MapBuilder::new(self.target.nested_mut(field));
        body(&mut child)?;
        Ok(self)
    }

    /// Like [`MapBuilder::nested`], but the child scope validates its field
    /// names against `schema`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::UnknownAttribute`] if `field` fails this
    /// builder's own check, or any error raised by `body`.
    pub fn nested_with(
        &mut self,
        field: &str,
        schema: &Enum,
        body: impl FnOnce(&mut MapBuilder<'_>) -> Result<(), BuildError>,
    ) -> Result<&mut Self, BuildError> {
        self.check(field)?;
        let mut child = MapBuilder::with_schema(self.target.nested_mut(field), schema);
        body(&mut child)?;
        Ok(self)
    }

    fn check(&self, field: &str) -> Result<(), BuildError> {
        match self.schema {
            Some(registry) if registry.lookup(field).is_none() => {
                Err(BuildError::UnknownAttribute {
                    attribute: field.to_string(),
                    registry: registry.family().to_string(),
                })
            }
            _ => Ok(()),
        }
    }
}

/// Errors raised while growing a detail tree through a builder.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BuildError {
    /// A schema-checked builder was given a field name outside its registry.
    #[error("unknown attribute '{attribute}' (not a member of the {registry} registry)")]
    UnknownAttribute {
        /// The rejected field name.
        attribute: String,
        /// Family name of the registry that rejected it.
        registry: String,
    },
    /// A restricted-choice value failed validation inside a builder scope.
    #[error(transparent)]
    InvalidValue(#[from] InvalidVariantError),
}
