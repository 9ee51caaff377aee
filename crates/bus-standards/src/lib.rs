#![deny(unsafe_code)]

//! Fixed, schema-specific knowledge about the bulk upload templates.
//!
//! Everything in here is a documented table: header aliases, concept label
//! aliases, the allow-list for duplicated node families and the placeholder
//! templates used when a referenced resource does not exist yet.

pub mod grid_square;
pub mod hash;
pub mod heritage_place;
pub mod placeholder;
pub mod profile;

pub use crate::hash::sha256_hex;
pub use crate::placeholder::{PlaceholderTemplate, placeholder_template};
pub use crate::profile::{ConceptAlias, RestrictedFamily, SheetProfile};
