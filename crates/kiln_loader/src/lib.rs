//! Compile-on-demand type loading.
//!
//! A [`CompilerLoader`] answers "give me the type named `N`" by locating the
//! source unit for `N` on its search roots, running the external compiler
//! over it, discovering the artifacts the compile produced, and defining them
//! in its type space. Each name is compiled at most once per loader; later
//! requests are served from the type space.
//!
//! ```no_run
//! use kiln_loader::LoaderBuilder;
//!
//! let loader = LoaderBuilder::new("build/kiln")
//!     .search_root("src/main/java")
//!     .build();
//! let token = loader.load("org.example.Token")?;
//! println!("{} ({})", token.name(), token.digest());
//! # Ok::<(), kiln_loader::LoadError>(())
//! ```

#![warn(missing_docs)]

pub mod builder;
pub mod error;
pub mod loader;
pub mod lookup;
pub mod registry;
pub mod report;
pub mod stage;

pub use builder::LoaderBuilder;
pub use error::LoadError;
pub use loader::CompilerLoader;
pub use lookup::TypeLookup;
pub use registry::{resolve_and_load, shared_loader, LoaderRegistry};
pub use report::{LoadOrigin, LoadReport};
pub use stage::LoadStage;

pub use kiln_artifact::{LoadedType, ReadPolicy, TypeSpace};
pub use kiln_common::TypeName;
