//! The path-scoped serialization engine.
//!
//! A [`Serializer`] walks nested data depth-first and emits document nodes.
//! Every visited value is looked up in the engine's [`RuleSet`] by its path:
//! a hit hands the subtree to the registered transform, a miss falls through
//! to default behavior. Default behavior upper-cases the root segment into a
//! category tag, camelizes deeper keys, turns mappings into trees and
//! scalars into leaves, and fails on anything else.

use tracing::instrument;

use crate::{
    document::{Element, InvalidTagError, TagName},
    enumeration::InvalidVariantError,
    rules::{ParsePathError, Path, RuleSet},
    value::Value,
};

/// Errors raised during serialization.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SerializeError {
    /// Default behavior reached a value it has no rendering for, such as a
    /// list.
    #[error("unsupported {kind} value at '{path}'")]
    UnsupportedValue {
        /// Where the value sits in the data.
        path: Path,
        /// The shape of the value.
        kind: &'static str,
    },
    /// A data key did not canonicalize to a valid tag name.
    #[error("no valid tag name at '{path}'")]
    Tag {
        /// Where the key sits in the data.
        path: Path,
        /// Why the derived name was rejected.
        #[source]
        source: InvalidTagError,
    },
    /// The root key or a data key was not a valid path segment.
    #[error("invalid path")]
    Path(#[from] ParsePathError),
    /// An override transform reported a failure.
    #[error("transform at '{path}' failed: {message}")]
    Transform {
        /// The path the transform was registered at.
        path: Path,
        /// The transform's description of the failure.
        message: String,
    },
    /// A restricted-choice value failed enumeration validation.
    #[error(transparent)]
    InvalidVariant(#[from] InvalidVariantError),
}

impl SerializeError {
    /// Convenience constructor for transforms reporting a domain failure at
    /// the path they were registered at.
    #[must_use]
    pub fn transform(path: &Path, message: impl Into<String>) -> Self {
        Self::Transform {
            path: path.clone(),
            message: message.into(),
        }
    }
}

/// The serialization engine.
///
/// A serializer owns its rule table and holds no per-run state, so one
/// instance can be shared freely, including across threads.
#[derive(Debug, Default)]
pub struct Serializer {
    rules: RuleSet,
}

impl Serializer {
    /// An engine applying `rules` on top of default behavior.
    #[must_use]
    pub const fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    /// The rule table in force.
    #[must_use]
    pub const fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Serialize `data` under the key `root`, appending the result to
    /// `target`.
    ///
    /// Output is staged and spliced in only on success: if any transform or
    /// default step fails, `target` is left exactly as it was.
    ///
    /// # Errors
    ///
    /// - [`SerializeError::Path`] if `root` or any data key is not a valid
    ///   path segment.
    /// - [`SerializeError::UnsupportedValue`] if default behavior reaches a
    ///   value with no structural rendering.
    /// - [`SerializeError::Tag`] if a data key cannot be canonicalized.
    /// - Whatever error an override transform returns.
    ///
    /// # Panics
    ///
    /// Panics if output nodes must be attached to a `target` that holds
    /// scalar content, or if a transform set scalar content on the staging
    /// node it was handed; output is attached as child nodes.
    #[instrument(skip(self, data, target))]
    pub fn serialize(
        &self,
        root: &str,
        data: &Value,
        target: &mut Element,
    ) -> Result<(), SerializeError> {
        let path = Path::new(root)?;
        let mut staging = Element::new(staging_name());
        self.emit(root, data, &mut staging, &path)?;
        target.adopt(staging);
        Ok(())
    }

    fn emit(
        &self,
        key: &str,
        value: &Value,
        target: &mut Element,
        path: &Path,
    ) -> Result<(), SerializeError> {
        if let Some(transform) = self.rules.transform_at(path) {
            tracing::debug!("applying the override registered at '{path}'");
            let proceed = Proceed {
                serializer: self,
                key,
                value,
                path,
            };
            return transform(key, value, target, path, proceed);
        }
        self.emit_default(key, value, target, path).map(|_| ())
    }

    fn emit_default<'t>(
        &self,
        key: &str,
        value: &Value,
        target: &'t mut Element,
        path: &Path,
    ) -> Result<&'t mut Element, SerializeError> {
        let name = canonical_tag(key, path)?;
        match value {
            Value::Map(map) => {
                let node = target.tree(name);
                for (child_key, child_value) in map.iter() {
                    let child_path = path.join(child_key)?;
                    self.emit(child_key, child_value, node, &child_path)?;
                }
                Ok(node)
            }
            Value::Scalar(scalar) => Ok(target.leaf(name, scalar.clone())),
            Value::List(_) => Err(SerializeError::UnsupportedValue {
                path: path.clone(),
                kind: value.kind(),
            }),
        }
    }
}

/// The continuation handed to override transforms.
///
/// Dropping it skips default behavior for the subtree entirely. Calling
/// [`Proceed::resume`] runs default behavior for the current key and value
/// into a target of the transform's choosing.
pub struct Proceed<'a> {
    serializer: &'a Serializer,
    key: &'a str,
    value: &'a Value,
    path: &'a Path,
}

impl Proceed<'_> {
    /// Run default behavior for the current value into `target`.
    ///
    /// Returns a handle to the node default behavior built, so the caller
    /// can decorate it before returning.
    ///
    /// # Errors
    ///
    /// The same errors default behavior raises when no rule intervenes.
    pub fn resume<'t>(self, target: &'t mut Element) -> Result<&'t mut Element, SerializeError> {
        self.serializer
            .emit_default(self.key, self.value, target, self.path)
    }
}

fn canonical_tag(key: &str, path: &Path) -> Result<TagName, SerializeError> {
    let name = if path.depth() == 1 {
        TagName::category(key)
    } else {
        TagName::camelized(key)
    };
    name.map_err(|source| SerializeError::Tag {
        path: path.clone(),
        source,
    })
}

fn staging_name() -> TagName {
    TagName::new("staging".to_string()).expect("the staging tag name is valid")
}

#[cfg(test)]
mod tests {
    use std::sync::LazyLock;

    use rayon::iter::{IntoParallelIterator, ParallelIterator};

    use crate::{
        document::{Attributes, Element, TagName, ToDocument},
        enumeration::{Enum, InvalidVariantError, Variant},
        rules::{Path, RuleSet},
        value::{Map, MapBuilder, Scalar, Value},
    };

    use super::{SerializeError, Serializer};

    fn tag(name: &str) -> TagName {
        name.parse().unwrap()
    }

    fn path(s: &str) -> Path {
        s.parse().unwrap()
    }

    fn cable_details() -> Value {
        let mut details = Map::new();
        MapBuilder::new(&mut details)
            .nested("cableOrAdapter", |cable| {
                cable.nested("cableLength", |length| {
                    length.set("length", 5)?;
                    length.set("unitOfMeasure", "FT")?;
                    Ok(())
                })?;
                Ok(())
            })
            .unwrap();
        Value::Map(details)
    }

    #[test]
    fn default_behavior_builds_category_trees_and_leaves() {
        let serializer = Serializer::default();
        let mut target = Element::new(tag("Feed"));
        serializer
            .serialize("ce", &cable_details(), &mut target)
            .unwrap();

        let category = target.child("CE").unwrap();
        let wrapper = category.child("CableOrAdapter").unwrap();
        let cable = wrapper.child("CableLength").unwrap();
        assert_eq!(
            cable.child("Length").unwrap().content(),
            Some(&Scalar::Int(5))
        );
        assert_eq!(
            cable.child("UnitOfMeasure").unwrap().content(),
            Some(&Scalar::Text("FT".to_string()))
        );
    }

    #[test]
    fn scalar_roots_become_category_leaves() {
        let serializer = Serializer::default();
        let mut target = Element::new(tag("Feed"));
        serializer
            .serialize("msrp", &Value::from(199), &mut target)
            .unwrap();

        assert_eq!(
            target.child("MSRP").unwrap().content(),
            Some(&Scalar::Int(199))
        );
    }

    #[test]
    fn output_preserves_data_order() {
        let mut details = Map::new();
        details.insert("zebra", 1);
        details.insert("apple", 2);

        let serializer = Serializer::default();
        let mut target = Element::new(tag("Feed"));
        serializer
            .serialize("product", &Value::Map(details), &mut target)
            .unwrap();

        let product = target.child("PRODUCT").unwrap();
        let names: Vec<&str> = product
            .children()
            .iter()
            .map(|child| child.name().as_str())
            .collect();
        assert_eq!(names, ["Zebra", "Apple"]);
    }

    #[test]
    fn overrides_and_defaults_compose_along_a_path() {
        let rules = RuleSet::builder()
            .at(&path("ce"), |_key, _value, target, _path, proceed| {
                proceed.resume(target)?;
                Ok(())
            })
            .at(
                &path("ce.cableOrAdapter.cableLength"),
                |key, value, target, at, _proceed| {
                    let map = value
                        .as_map()
                        .ok_or_else(|| SerializeError::transform(at, "expected a mapping"))?;
                    let length = map
                        .get("length")
                        .and_then(Value::as_scalar)
                        .ok_or_else(|| SerializeError::transform(at, "missing length"))?;
                    let unit = map
                        .get("unitOfMeasure")
                        .and_then(Value::as_scalar)
                        .ok_or_else(|| SerializeError::transform(at, "missing unitOfMeasure"))?;
                    let name = TagName::camelized(key).unwrap();
                    target.leaf_with(
                        name,
                        length.clone(),
                        Attributes::new().with("unitOfMeasure", unit.clone()),
                    );
                    Ok(())
                },
            )
            .build();
        let serializer = Serializer::new(rules);

        let mut target = Element::new(tag("Feed"));
        serializer
            .serialize("ce", &cable_details(), &mut target)
            .unwrap();

        let cable = target
            .child("CE")
            .unwrap()
            .child("CableOrAdapter")
            .unwrap()
            .child("CableLength")
            .unwrap();
        assert!(cable.is_leaf());
        assert_eq!(cable.content(), Some(&Scalar::Int(5)));
        assert_eq!(
            cable.attributes().get("unitOfMeasure"),
            Some(&Scalar::Text("FT".to_string()))
        );
    }

    #[test]
    fn resume_only_override_matches_default_output() {
        let with_rule = {
            let rules = RuleSet::builder()
                .at(&path("ce"), |_key, _value, target, _path, proceed| {
                    proceed.resume(target)?;
                    Ok(())
                })
                .build();
            let serializer = Serializer::new(rules);
            let mut target = Element::new(tag("Feed"));
            serializer
                .serialize("ce", &cable_details(), &mut target)
                .unwrap();
            target
        };

        let by_default = {
            let serializer = Serializer::default();
            let mut target = Element::new(tag("Feed"));
            serializer
                .serialize("ce", &cable_details(), &mut target)
                .unwrap();
            target
        };

        assert_eq!(with_rule, by_default);
    }

    #[test]
    fn overrides_can_decorate_the_default_output() {
        let rules = RuleSet::builder()
            .at(&path("ce"), |_key, _value, target, _path, proceed| {
                let node = proceed.resume(target)?;
                node.set_attribute("marketplace", "GB");
                Ok(())
            })
            .build();
        let serializer = Serializer::new(rules);
        let mut target = Element::new(tag("Feed"));
        serializer
            .serialize("ce", &cable_details(), &mut target)
            .unwrap();

        let category = target.child("CE").unwrap();
        assert_eq!(
            category.attributes().get("marketplace"),
            Some(&Scalar::from("GB"))
        );
        assert!(category.child("CableOrAdapter").is_some());
    }

    #[test]
    fn lists_have_no_default_rendering() {
        let mut details = Map::new();
        details.insert(
            "bulletPoints",
            vec![Value::from("fast"), Value::from("cheap")],
        );

        let serializer = Serializer::default();
        let mut target = Element::new(tag("Feed"));
        let error = serializer
            .serialize("product", &Value::Map(details), &mut target)
            .unwrap_err();

        assert_eq!(
            error,
            SerializeError::UnsupportedValue {
                path: path("product.bulletPoints"),
                kind: "list",
            }
        );
        assert_eq!(
            error.to_string(),
            "unsupported list value at 'product.bulletPoints'"
        );
        assert!(target.children().is_empty());
    }

    #[test]
    fn an_override_renders_each_list_item() {
        let mut details = Map::new();
        details.insert(
            "bulletPoints",
            vec![Value::from("fast"), Value::from("cheap")],
        );

        let rules = RuleSet::builder()
            .at(
                &path("product.bulletPoints"),
                |_key, value, target, at, _proceed| {
                    let items = value
                        .as_list()
                        .ok_or_else(|| SerializeError::transform(at, "expected a list"))?;
                    for item in items {
                        let point = item
                            .as_scalar()
                            .ok_or_else(|| SerializeError::transform(at, "expected scalar items"))?;
                        target.leaf(tag("BulletPoint"), point.clone());
                    }
                    Ok(())
                },
            )
            .build();
        let serializer = Serializer::new(rules);
        let mut target = Element::new(tag("Feed"));
        serializer
            .serialize("product", &Value::Map(details), &mut target)
            .unwrap();

        let product = target.child("PRODUCT").unwrap();
        let names: Vec<&str> = product
            .children()
            .iter()
            .map(|child| child.name().as_str())
            .collect();
        assert_eq!(names, ["BulletPoint", "BulletPoint"]);
        assert_eq!(
            product.children()[0].content(),
            Some(&Scalar::from("fast"))
        );
    }

    #[test]
    fn later_registrations_replace_earlier_ones() {
        let rules = RuleSet::builder()
            .at(&path("note"), |_key, _value, target, _path, _proceed| {
                target.leaf(tag("First"), 1);
                Ok(())
            })
            .at(&path("note"), |_key, _value, target, _path, _proceed| {
                target.leaf(tag("Second"), 2);
                Ok(())
            })
            .build();
        let serializer = Serializer::new(rules);
        let mut target = Element::new(tag("Feed"));
        serializer
            .serialize("note", &Value::from("text"), &mut target)
            .unwrap();

        assert!(target.child("Second").is_some());
        assert!(target.child("First").is_none());
    }

    #[test]
    fn transform_failures_leave_the_target_untouched() {
        let rules = RuleSet::builder()
            .at(&path("ce"), |_key, _value, _target, at, _proceed| {
                Err(SerializeError::transform(at, "refused"))
            })
            .build();
        let serializer = Serializer::new(rules);
        let mut target = Element::new(tag("Feed"));
        target.leaf(tag("Existing"), 1);

        let error = serializer
            .serialize("ce", &cable_details(), &mut target)
            .unwrap_err();

        assert_eq!(error.to_string(), "transform at 'ce' failed: refused");
        assert_eq!(target.children().len(), 1);
    }

    #[test]
    fn empty_output_leaves_a_leaf_target_alone() {
        let rules = RuleSet::builder()
            .at(&path("ce"), |_key, _value, _target, _path, _proceed| Ok(()))
            .build();
        let serializer = Serializer::new(rules);
        let mut target = Element::new(tag("Note"));
        target.set_content("approved");

        serializer
            .serialize("ce", &cable_details(), &mut target)
            .unwrap();

        assert_eq!(target.content(), Some(&Scalar::from("approved")));
        assert!(target.children().is_empty());
    }

    #[test]
    fn empty_root_key_is_rejected() {
        let serializer = Serializer::default();
        let mut target = Element::new(tag("Feed"));
        let error = serializer
            .serialize("", &cable_details(), &mut target)
            .unwrap_err();

        assert!(matches!(error, SerializeError::Path(_)));
    }

    #[test]
    fn unrepresentable_keys_fail_with_their_path() {
        let mut details = Map::new();
        details.insert("_", 5);

        let serializer = Serializer::default();
        let mut target = Element::new(tag("Feed"));
        let error = serializer
            .serialize("ce", &Value::Map(details), &mut target)
            .unwrap_err();

        assert!(matches!(
            error,
            SerializeError::Tag { ref path, .. } if path.to_string() == "ce._"
        ));
    }

    #[test]
    fn empty_data_keys_are_rejected() {
        let mut details = Map::new();
        details.insert("", 5);

        let serializer = Serializer::default();
        let mut target = Element::new(tag("Feed"));
        let error = serializer
            .serialize("ce", &Value::Map(details), &mut target)
            .unwrap_err();

        assert!(matches!(error, SerializeError::Path(_)));
        assert!(target.children().is_empty());
    }

    #[test]
    fn engines_are_shared_across_threads() {
        let rules = RuleSet::builder()
            .at(&path("ce"), |_key, _value, target, _path, proceed| {
                proceed.resume(target)?;
                Ok(())
            })
            .build();
        let serializer = Serializer::new(rules);
        let data = cable_details();

        let outputs: Vec<Element> = (0..16)
            .into_par_iter()
            .map(|_| {
                let mut target = Element::new(tag("Feed"));
                serializer.serialize("ce", &data, &mut target).unwrap();
                target
            })
            .collect();

        assert!(outputs.windows(2).all(|pair| pair[0] == pair[1]));
    }

    #[test]
    fn engines_expose_their_rule_table() {
        let rules = RuleSet::builder()
            .at(&path("ce"), |_key, _value, _target, _path, _proceed| Ok(()))
            .build();
        let serializer = Serializer::new(rules);

        assert!(serializer.rules().transform_at(&path("ce")).is_some());
        assert!(Serializer::default().rules().is_empty());
    }

    // Collaborator types modelled on a product feed: a validated weight
    // measurement that renders itself, composed with engine output in one
    // document.

    static WEIGHT_UNITS: LazyLock<Enum> = LazyLock::new(|| {
        Enum::new(
            "weight unit",
            &[
                ("grams", "GR"),
                ("kilograms", "KG"),
                ("ounces", "OZ"),
                ("pounds", "LB"),
                ("milligrams", "MG"),
            ],
        )
        .unwrap()
    });

    #[derive(Debug)]
    struct PackageWeight {
        amount: f64,
        unit: Variant,
    }

    impl PackageWeight {
        fn new(amount: f64, unit: &str) -> Result<Self, InvalidVariantError> {
            let unit = WEIGHT_UNITS.require(unit)?.clone();
            Ok(Self { amount, unit })
        }
    }

    impl ToDocument for PackageWeight {
        fn to_document(&self, name: TagName, parent: &mut Element) {
            parent.leaf_with(
                name,
                self.amount,
                Attributes::new().with("unitOfMeasure", self.unit.value()),
            );
        }
    }

    #[test]
    fn collaborators_and_the_engine_compose_one_document() {
        let weight = PackageWeight::new(2.5, "pounds").unwrap();

        let mut details = Map::new();
        MapBuilder::new(&mut details)
            .nested("cableOrAdapter", |cable| {
                cable.set("cableLength", 5)?;
                let unit = WEIGHT_UNITS.require("KG")?;
                cable.set("maximumWeightUnit", unit.name())?;
                Ok(())
            })
            .unwrap();

        let serializer = Serializer::default();
        let mut product = Element::new(tag("Product"));
        product.leaf(tag("SKU"), "CBL-0005");
        weight.to_document(tag("PackageWeight"), &mut product);
        serializer
            .serialize(
                "ce",
                &Value::Map(details),
                product.tree(tag("ProductData")),
            )
            .unwrap();

        let names: Vec<&str> = product
            .children()
            .iter()
            .map(|child| child.name().as_str())
            .collect();
        assert_eq!(names, ["SKU", "PackageWeight", "ProductData"]);

        let weight_node = product.child("PackageWeight").unwrap();
        assert_eq!(weight_node.content(), Some(&Scalar::Float(2.5)));
        assert_eq!(
            weight_node.attributes().get("unitOfMeasure"),
            Some(&Scalar::from("LB"))
        );

        let cable = product
            .child("ProductData")
            .unwrap()
            .child("CE")
            .unwrap()
            .child("CableOrAdapter")
            .unwrap();
        assert_eq!(
            cable.child("CableLength").unwrap().content(),
            Some(&Scalar::Int(5))
        );
        assert_eq!(
            cable.child("MaximumWeightUnit").unwrap().content(),
            Some(&Scalar::from("kilograms"))
        );
    }

    #[test]
    fn invalid_units_are_rejected_by_name() {
        let error = PackageWeight::new(2.5, "stone").unwrap_err();
        assert_eq!(error.to_string(), "not a valid weight unit: 'stone'");
        assert_eq!(error.value, "stone");
    }
}
