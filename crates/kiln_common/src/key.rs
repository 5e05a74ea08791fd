//! Interned keys giving every defined type name a stable `u32` identity.

use lasso::ThreadedRodeo;
use serde::{Deserialize, Serialize};

use crate::name::TypeName;

/// The interned identity of a type name within one [`NameTable`].
///
/// Two loaded types with the same `TypeKey` were defined under the same name
/// in the same type space. Comparison and copying are O(1).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct TypeKey(u32);

// SAFETY: `TypeKey` wraps a `u32`, which always fits in `usize` on the 32-bit
// and 64-bit targets we build for. `try_from_usize` rejects values above `u32::MAX`.
unsafe impl lasso::Key for TypeKey {
    fn into_usize(self) -> usize {
        self.0 as usize
    }

    fn try_from_usize(int: usize) -> Option<Self> {
        u32::try_from(int).ok().map(TypeKey)
    }
}

/// Thread-safe interner mapping type names to [`TypeKey`]s.
pub struct NameTable {
    rodeo: ThreadedRodeo<TypeKey>,
}

impl NameTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self {
            rodeo: ThreadedRodeo::new(),
        }
    }

    /// Interns a name, returning the existing key if it was seen before.
    pub fn intern(&self, name: &TypeName) -> TypeKey {
        self.rodeo.get_or_intern(name.as_str())
    }

    /// Looks up a name without interning it.
    pub fn get(&self, name: &TypeName) -> Option<TypeKey> {
        self.rodeo.get(name.as_str())
    }
}

impl Default for NameTable {
    fn default() -> Self {
        Self::new()
    }
}
