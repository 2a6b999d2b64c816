use std::{collections::HashMap, fmt};

use crate::{
    document::Element,
    serializer::{Proceed, SerializeError},
    value::Value,
};

use super::Path;

/// The signature of an override transform.
///
/// A transform receives the data key being serialized, its value, the node
/// to build under, the full path from the root, and a [`Proceed`]
/// continuation that resumes default behavior on demand.
pub type Transform = Box<
    dyn Fn(&str, &Value, &mut Element, &Path, Proceed<'_>) -> Result<(), SerializeError>
        + Send
        + Sync,
>;

/// One node of a [`RuleSet`]: an optional transform plus child rules keyed
/// by the next path segment.
#[derive(Default)]
pub struct Rule {
    transform: Option<Transform>,
    children: HashMap<String, Rule>,
}

impl Rule {
    /// The transform registered at this node, if any.
    #[must_use]
    pub const fn transform(&self) -> Option<&Transform> {
        self.transform.as_ref()
    }

    /// The child rule for `segment`, if any.
    #[must_use]
    pub fn child(&self, segment: &str) -> Option<&Self> {
        self.children.get(segment)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("transform", &self.transform.as_ref().map(|_| "<transform>"))
            .field("children", &self.children)
            .finish()
    }
}

/// An immutable table of override transforms addressed by [`Path`].
///
/// Rules apply at their exact path only. A rule at `ce` says nothing about
/// `ce.cableOrAdapter`; descendants are handled by their own rules or by
/// default behavior.
#[derive(Debug, Default)]
pub struct RuleSet {
    roots: HashMap<String, Rule>,
}

impl RuleSet {
    /// Start building a rule set.
    #[must_use]
    pub fn builder() -> RuleSetBuilder {
        RuleSetBuilder::default()
    }

    /// The rule node registered at exactly `path`, if any.
    #[must_use]
    pub fn rule_at(&self, path: &Path) -> Option<&Rule> {
        let mut rule = self.roots.get(path.root())?;
        for segment in path.segments().skip(1) {
            rule = rule.child(segment)?;
        }
        Some(rule)
    }

    /// The transform registered at exactly `path`, if any.
    ///
    /// Costs one map lookup per path segment, independent of table size.
    #[must_use]
    pub fn transform_at(&self, path: &Path) -> Option<&Transform> {
        self.rule_at(path).and_then(Rule::transform)
    }

    /// Whether the table holds no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

/// Builds a [`RuleSet`] from plain registration calls.
///
/// Dotted paths are expanded into the rule tree at registration time, so
/// lookups during serialization never re-parse them.
#[derive(Debug, Default)]
pub struct RuleSetBuilder {
    roots: HashMap<String, Rule>,
}

impl RuleSetBuilder {
    /// Register `transform` at `path`.
    ///
    /// Intermediate rule nodes are created as needed and carry no transform
    /// of their own. Registering twice at the same path replaces the earlier
    /// transform.
    #[must_use]
    pub fn at<F>(mut self, path: &Path, transform: F) -> Self
    where
        F: Fn(&str, &Value, &mut Element, &Path, Proceed<'_>) -> Result<(), SerializeError>
            + Send
            + Sync
            + 'static,
    {
        let mut rule = self.roots.entry(path.root().to_string()).or_default();
        for segment in path.segments().skip(1) {
            rule = rule.children.entry(segment.to_string()).or_default();
        }
        if rule.transform.replace(Box::new(transform)).is_some() {
            tracing::debug!("replaced the transform registered at '{path}'");
        }
        self
    }

    /// Finalize the table.
    #[must_use]
    pub fn build(self) -> RuleSet {
        RuleSet { roots: self.roots }
    }
}
