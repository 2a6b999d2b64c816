//! Rule-driven composition of markup document trees from nested data.
//!
//! Detail trees are grown with schema-flexible builders, then serialized
//! into tag/attribute/content documents by a path-scoped rule engine:
//! default behavior handles the regular shape of the output, and override
//! rules registered against dotted paths rewrite exactly the subtrees that
//! deviate.
//!
//! ```
//! use composer::{Element, Map, MapBuilder, RuleSet, Scalar, Serializer, TagName};
//!
//! let mut details = Map::new();
//! MapBuilder::new(&mut details)
//!     .nested("cableLength", |cable| {
//!         cable.set("length", 5)?;
//!         cable.set("unitOfMeasure", "FT")?;
//!         Ok(())
//!     })
//!     .unwrap();
//!
//! let serializer = Serializer::new(RuleSet::default());
//! let mut feed = Element::new(TagName::new("Feed".to_string()).unwrap());
//! serializer.serialize("ce", &details.into(), &mut feed).unwrap();
//!
//! let cable = feed.child("CE").unwrap().child("CableLength").unwrap();
//! assert_eq!(cable.child("Length").unwrap().content(), Some(&Scalar::Int(5)));
//! ```

pub mod document;
pub mod enumeration;
pub mod rules;
pub mod serializer;
pub mod value;

pub use document::{Attributes, Element, TagName, ToDocument};
pub use enumeration::{Enum, Variant};
pub use rules::{Path, RuleSet, RuleSetBuilder};
pub use serializer::{Proceed, SerializeError, Serializer};
pub use value::{Map, MapBuilder, Scalar, Value};
