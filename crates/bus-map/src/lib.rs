//! Column key resolution for bulk upload sheets.
//!
//! [`NodeIndex`] maps normalized column keys (including template aliases) to
//! schema nodes and carries the vocabularies of concept nodes.
//! [`ConceptResolver`] rewrites a nested sheet document so that keys become
//! node ids and concept labels become value ids.

pub mod index;
pub mod resolver;
pub mod score;

pub use index::{IndexedNode, NodeIndex, NodeListing};
pub use resolver::ConceptResolver;
pub use score::closest_label;
