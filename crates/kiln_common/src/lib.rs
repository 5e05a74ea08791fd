//! Shared foundational types used across the Kiln compile-and-load service.
//!
//! This crate provides hierarchical type names and their filesystem mapping,
//! content digests for defined artifacts, and the interned keys that give
//! loaded types a cheap, stable identity.

#![warn(missing_docs)]

pub mod digest;
pub mod key;
pub mod name;

pub use digest::ContentDigest;
pub use key::{NameTable, TypeKey};
pub use name::{NameError, TypeName, HIERARCHY_SEPARATOR, NESTED_MARKER};
