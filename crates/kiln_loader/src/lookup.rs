//! Parent lookup for delegation.

use std::sync::Arc;

use kiln_artifact::{LoadedType, TypeDefiner, TypeSpace};
use kiln_common::TypeName;

use crate::error::LoadError;

/// A source of already-available types consulted before compiling.
///
/// `Ok(None)` means the parent does not know the name and the child should
/// go on to resolve and compile it.
pub trait TypeLookup: Send + Sync {
    /// Looks up `name`.
    fn lookup(&self, name: &TypeName) -> Result<Option<Arc<LoadedType>>, LoadError>;
}

impl TypeLookup for TypeSpace {
    fn lookup(&self, name: &TypeName) -> Result<Option<Arc<LoadedType>>, LoadError> {
        Ok(self.find_loaded(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_space_lookup() {
        let space = TypeSpace::new();
        let name = TypeName::new("p.Shared").unwrap();
        assert!(space.lookup(&name).unwrap().is_none());
        let defined = space.define(&name, b"shared", 0, 6).unwrap();
        let found = space.lookup(&name).unwrap().unwrap();
        assert!(Arc::ptr_eq(&defined, &found));
    }
}
