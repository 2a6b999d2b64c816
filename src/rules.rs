//! Path-addressed override rules for the serialization engine.
//!
//! A [`RuleSet`] maps [`Path`]s to transforms. During serialization every
//! visited value is looked up here first; a hit hands control to the
//! registered transform, a miss falls through to default behavior.

mod path;
mod table;

pub use path::{ParsePathError, Path};
pub use table::{Rule, RuleSet, RuleSetBuilder, Transform};
