// src/index/mod.rs

//! The script ↔ container relation.
//!
//! - [`extractor`] pulls script identifiers out of one container file.
//! - [`delta`] diffs a container's previous and new identifier sets.
//! - [`script_index`] keeps the forward and reverse maps consistent.
//!
//! Nothing here knows about build state or file watching; that lives in
//! `engine`.

pub mod delta;
pub mod extractor;
pub mod script_index;

pub use delta::{diff, Delta};
pub use extractor::Extractor;
pub use script_index::ScriptIndex;
