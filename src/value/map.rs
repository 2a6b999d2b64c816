use std::fmt;

use serde::{
    Deserialize, Serialize,
    de::{MapAccess, Visitor},
    ser::SerializeMap,
};

use super::Value;

/// A string-keyed mapping that remembers insertion order.
///
/// Maps are the interior nodes of a detail tree. Key order is significant:
/// serialization walks entries in the order they were first inserted, so the
/// output document reproduces the order the data was described in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Map {
    entries: Vec<(String, Value)>,
}

impl Map {
    /// An empty mapping.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Set `key` to `value`.
    ///
    /// A repeated key overwrites the existing entry in place, keeping its
    /// original position. Returns the value that was replaced, if any.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        if let Some((_, slot)) = self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some(std::mem::replace(slot, value))
        } else {
            self.entries.push((key, value));
            None
        }
    }

    /// The value stored at `key`, if any.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    /// Mutable access to the value stored at `key`, if any.
    #[must_use]
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries
            .iter_mut()
            .find(|(existing, _)| *existing == key)
            .map(|(_, value)| value)
    }

    /// Whether `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(existing, _)| existing == key)
    }

    /// The sub-mapping at `key`, created on demand.
    ///
    /// A missing entry is inserted as an empty mapping; an existing entry
    /// holding anything other than a mapping is replaced by an empty one.
    pub fn nested_mut(&mut self, key: &str) -> &mut Self {
        let index = self.ensure_map(key);
        Self::map_at(&mut self.entries, index)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value))
    }

    /// Number of entries.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the mapping has no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn ensure_map(&mut self, key: &str) -> usize {
        if let Some(index) = self
            .entries
            .iter()
            .position(|(existing, _)| existing == key)
        {
            if !matches!(self.entries[index].1, Value::Map(_)) {
                self.entries[index].1 = Value::Map(Self::new());
            }
            index
        } else {
            self.entries.push((key.to_string(), Value::Map(Self::new())));
            self.entries.len() - 1
        }
    }

    fn map_at(entries: &mut [(String, Value)], index: usize) -> &mut Self {
        match &mut entries[index].1 {
            Value::Map(map) => map,
            _ => unreachable!("ensure_map leaves a map at the index it returns"),
        }
    }
}

impl Serialize for Map {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Map {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct MapVisitor;

        impl<'de> Visitor<'de> for MapVisitor {
            type Value = Map;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a string-keyed mapping")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut map = Map::new();
                while let Some((key, value)) = access.next_entry::<String, Value>()? {
                    map.insert(key, value);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(MapVisitor)
    }
}
