//! The markup document tree and the vocabulary for naming its nodes.
//!
//! Documents are trees of [`Element`]s: named nodes carrying ordered
//! attributes and either scalar content or ordered children. [`TagName`]
//! enforces the naming rules and provides the canonical forms derived from
//! data keys.

mod element;
mod tag;

pub use element::{Attributes, Element, ToDocument};
pub use tag::{InvalidTagError, TagName};
