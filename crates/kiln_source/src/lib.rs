//! Source-unit resolution and classpath assembly.
//!
//! This crate maps a requested [`TypeName`](kiln_common::TypeName) to the
//! [`SourceUnit`] backing it by probing an ordered list of [`SearchRoot`]s and
//! then the service's [`OutputDirectory`], and assembles the classpath string
//! handed to the external compiler.

#![warn(missing_docs)]

pub mod classpath;
pub mod error;
pub mod output_dir;
pub mod resolver;
pub mod search_root;
pub mod source_unit;

pub use classpath::build_classpath;
pub use error::SourceError;
pub use output_dir::OutputDirectory;
pub use resolver::SourceResolver;
pub use search_root::SearchRoot;
pub use source_unit::{SourceOrigin, SourceUnit};
