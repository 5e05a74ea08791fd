//! Compiled-artifact discovery and type definition.
//!
//! After a compile, [`discover`] walks the output directory for the artifacts
//! belonging to a requested name (the type itself plus any nested or
//! companion types). [`define_artifacts`] then hands their bytes to a
//! [`TypeDefiner`], which turns them into shared [`LoadedType`]s.
//! [`TypeSpace`] is the in-process definer.

#![warn(missing_docs)]

pub mod artifact;
pub mod definer;
pub mod discover;
pub mod error;
pub mod loaded;
pub mod type_space;

pub use artifact::CompiledArtifact;
pub use definer::{define_artifacts, DefineReport, ReadPolicy, SkippedArtifact, TypeDefiner};
pub use discover::discover;
pub use error::{ArtifactError, DefineError};
pub use loaded::LoadedType;
pub use type_space::TypeSpace;
