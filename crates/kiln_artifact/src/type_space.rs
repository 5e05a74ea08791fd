//! The in-process type space.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use kiln_common::{NameTable, TypeKey, TypeName};

use crate::definer::TypeDefiner;
use crate::error::DefineError;
use crate::loaded::LoadedType;

/// Registry of loaded types keyed by interned name.
///
/// Each name can be defined once; a second definition is rejected with
/// [`DefineError::Duplicate`] and the first definition stays in place.
#[derive(Default)]
pub struct TypeSpace {
    names: NameTable,
    types: Mutex<HashMap<TypeKey, Arc<LoadedType>>>,
}

impl TypeSpace {
    /// Creates an empty type space.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of types defined so far.
    pub fn len(&self) -> usize {
        self.types.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns `true` if nothing has been defined.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Looks up a type by its interned key.
    pub fn get(&self, key: TypeKey) -> Option<Arc<LoadedType>> {
        self.types
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned()
    }
}

impl std::fmt::Debug for TypeSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeSpace").field("len", &self.len()).finish()
    }
}

impl TypeDefiner for TypeSpace {
    fn define(
        &self,
        name: &TypeName,
        bytes: &[u8],
        offset: usize,
        len: usize,
    ) -> Result<Arc<LoadedType>, DefineError> {
        let slice = offset
            .checked_add(len)
            .and_then(|end| bytes.get(offset..end))
            .ok_or_else(|| DefineError::OutOfBounds {
                name: name.clone(),
                offset,
                len,
                available: bytes.len(),
            })?;
        if slice.is_empty() {
            return Err(DefineError::Rejected {
                name: name.clone(),
                reason: "empty definition".to_string(),
            });
        }

        let key = self.names.intern(name);
        let mut types = self.types.lock().unwrap_or_else(PoisonError::into_inner);
        if types.contains_key(&key) {
            return Err(DefineError::Duplicate { name: name.clone() });
        }
        let loaded = Arc::new(LoadedType::new(key, name.clone(), slice.to_vec()));
        types.insert(key, Arc::clone(&loaded));
        Ok(loaded)
    }

    fn find_loaded(&self, name: &TypeName) -> Option<Arc<LoadedType>> {
        let key = self.names.get(name)?;
        self.get(key)
    }
}
