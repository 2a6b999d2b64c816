use crate::value::Scalar;

use super::tag::TagName;

/// An ordered set of named attributes on an [`Element`].
///
/// Names are unique; setting an existing name replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    entries: Vec<(String, Scalar)>,
}

impl Attributes {
    /// An empty attribute set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Chainable form of [`Attributes::set`].
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.set(name, value);
        self
    }

    /// Set `name` to `value`, replacing any existing value in place.
    ///
    /// Returns the value that was replaced, if any.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Scalar>) -> Option<Scalar> {
        let name = name.into();
        let value = value.into();
        if let Some((_, slot)) = self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(std::mem::replace(slot, value))
        } else {
            self.entries.push((name, value));
            None
        }
    }

    /// The value of the attribute `name`, if set.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Scalar> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    /// Attributes in the order they were first set.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Scalar)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    /// Number of attributes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set holds no attributes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Body {
    Empty,
    Content(Scalar),
    Children(Vec<Element>),
}

/// A node in a markup document tree.
///
/// An element has a validated [`TagName`], ordered attributes, and either
/// scalar content or ordered children. Content and children are mutually
/// exclusive: a node that holds one can never gain the other. Repeated tag
/// names among children are allowed and preserved in order.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    name: TagName,
    attributes: Attributes,
    body: Body,
}

impl Element {
    /// A standalone element with no attributes, content, or children.
    #[must_use]
    pub const fn new(name: TagName) -> Self {
        Self {
            name,
            attributes: Attributes::new(),
            body: Body::Empty,
        }
    }

    /// Append an empty child named `name` and return a handle to it, for
    /// attaching further children.
    ///
    /// # Panics
    ///
    /// Panics if this node holds scalar content.
    pub fn tree(&mut self, name: TagName) -> &mut Self {
        self.append(Self::new(name))
    }

    /// Append a leaf child named `name` holding `content`.
    ///
    /// # Panics
    ///
    /// Panics if this node holds scalar content.
    pub fn leaf(&mut self, name: TagName, content: impl Into<Scalar>) -> &mut Self {
        self.leaf_with(name, content, Attributes::new())
    }

    /// Append a leaf child with content and attributes in one step.
    ///
    /// # Panics
    ///
    /// Panics if this node holds scalar content.
    pub fn leaf_with(
        &mut self,
        name: TagName,
        content: impl Into<Scalar>,
        attributes: Attributes,
    ) -> &mut Self {
        let mut child = Self::new(name);
        child.attributes = attributes;
        child.body = Body::Content(content.into());
        self.append(child)
    }

    /// Append a pre-built child and return a handle to it.
    ///
    /// # Panics
    ///
    /// Panics if this node holds scalar content.
    pub fn append(&mut self, child: Self) -> &mut Self {
        let children = self.children_mut();
        children.push(child);
        children.last_mut().expect("a child was just pushed")
    }

    /// Set this node's scalar content, replacing any existing content.
    ///
    /// # Panics
    ///
    /// Panics if this node has children.
    pub fn set_content(&mut self, content: impl Into<Scalar>) {
        assert!(
            !matches!(self.body, Body::Children(_)),
            "node '{}' has children and cannot hold scalar content",
            self.name
        );
        self.body = Body::Content(content.into());
    }

    /// Set an attribute on this node, replacing any existing value.
    ///
    /// Returns the value that was replaced, if any.
    pub fn set_attribute(
        &mut self,
        name: impl Into<String>,
        value: impl Into<Scalar>,
    ) -> Option<Scalar> {
        self.attributes.set(name, value)
    }

    /// This node's tag name.
    #[must_use]
    pub const fn name(&self) -> &TagName {
        &self.name
    }

    /// This node's attributes.
    #[must_use]
    pub const fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// This node's scalar content, if it is a leaf.
    #[must_use]
    pub const fn content(&self) -> Option<&Scalar> {
        match &self.body {
            Body::Content(content) => Some(content),
            _ => None,
        }
    }

    /// This node's children, in order. Empty for leaves.
    #[must_use]
    pub const fn children(&self) -> &[Self] {
        match &self.body {
            Body::Children(children) => children.as_slice(),
            _ => &[],
        }
    }

    /// The first child whose tag name equals `name`.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Self> {
        self.children()
            .iter()
            .find(|child| child.name.as_str() == name)
    }

    /// Whether this node holds scalar content.
    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        matches!(self.body, Body::Content(_))
    }

    /// Move `donor`'s children and attributes onto this node.
    ///
    /// Panics if `donor` holds scalar content, or if this node does.
    pub(crate) fn adopt(&mut self, donor: Self) {
        for (name, value) in donor.attributes.entries {
            self.attributes.set(name, value);
        }
        match donor.body {
            Body::Children(children) => {
                self.children_mut().extend(children);
            }
            Body::Empty => {}
            Body::Content(_) => {
                panic!("serialized output must be appended as nodes, not set as content")
            }
        }
    }

    fn children_mut(&mut self) -> &mut Vec<Self> {
        assert!(
            !matches!(self.body, Body::Content(_)),
            "node '{}' holds scalar content and cannot gain children",
            self.name
        );
        if matches!(self.body, Body::Empty) {
            self.body = Body::Children(Vec::new());
        }
        match &mut self.body {
            Body::Children(children) => children,
            _ => unreachable!("body was just set to children"),
        }
    }
}

/// Implemented by domain values that know how to render themselves into a
/// document tree.
///
/// Collaborating types append whatever nodes represent them under `parent`,
/// letting composite documents be assembled from independently defined
/// parts.
pub trait ToDocument {
    /// Render `self` as a node (or nodes) named `name` under `parent`.
    fn to_document(&self, name: TagName, parent: &mut Element);
}
