//! Nested data values and the builders that grow them.
//!
//! A detail tree is a [`Value`]: scalar leaves, ordered lists, and
//! insertion-ordered mappings, nested to any depth. Trees are grown either
//! directly through [`Map`] or through the scoped [`MapBuilder`].

mod builder;
mod map;
mod scalar;

use serde::{Deserialize, Serialize};

pub use builder::{BuildError, MapBuilder};
pub use map::Map;
pub use scalar::Scalar;

/// A node in a detail tree.
///
/// Values deserialize untagged: a JSON scalar becomes [`Value::Scalar`], an
/// array becomes [`Value::List`], and an object becomes [`Value::Map`].
/// Explicit nulls are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// A leaf.
    Scalar(Scalar),
    /// An ordered sequence. Lists have no default document rendering; an
    /// override rule must describe how they serialize.
    List(Vec<Value>),
    /// A nested mapping.
    Map(Map),
}

impl Value {
    /// Short name for this value's shape, used in diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Scalar(scalar) => scalar.kind(),
            Self::List(_) => "list",
            Self::Map(_) => "map",
        }
    }

    /// Borrow the scalar, if this is a leaf.
    #[must_use]
    pub const fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Self::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    /// Borrow the mapping, if this is one.
    #[must_use]
    pub const fn as_map(&self) -> Option<&Map> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Borrow the items, if this is a list.
    #[must_use]
    pub const fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }
}

impl From<Scalar> for Value {
    fn from(value: Scalar) -> Self {
        Self::Scalar(value)
    }
}

impl From<Map> for Value {
    fn from(value: Map) -> Self {
        Self::Map(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Self>) -> Self {
        Self::List(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Scalar(value.into())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Scalar(value.into())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Scalar(value.into())
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Scalar(value.into())
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Scalar(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Scalar(value.into())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Scalar(value.into())
    }
}
