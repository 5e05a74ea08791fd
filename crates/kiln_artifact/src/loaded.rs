//! Loaded types owned by a type space.

use kiln_common::{ContentDigest, TypeKey, TypeName};

/// A type defined from artifact bytes.
///
/// Loaded types are shared as `Arc<LoadedType>`; two handles refer to the
/// same definition exactly when they are pointer-equal.
#[derive(Debug)]
pub struct LoadedType {
    key: TypeKey,
    name: TypeName,
    digest: ContentDigest,
    bytes: Vec<u8>,
}

impl LoadedType {
    /// Creates a loaded type. The digest is computed from `bytes`.
    pub fn new(key: TypeKey, name: TypeName, bytes: Vec<u8>) -> Self {
        let digest = ContentDigest::of(&bytes);
        Self {
            key,
            name,
            digest,
            bytes,
        }
    }

    /// The interned key of this type's name.
    pub fn key(&self) -> TypeKey {
        self.key
    }

    /// The logical name.
    pub fn name(&self) -> &TypeName {
        &self.name
    }

    /// Digest of the defining bytes.
    pub fn digest(&self) -> ContentDigest {
        self.digest
    }

    /// The defining bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_tracks_bytes() {
        let names = kiln_common::NameTable::new();
        let name = TypeName::new("a.B").unwrap();
        let key = names.intern(&name);
        let a = LoadedType::new(key, name.clone(), b"one".to_vec());
        let b = LoadedType::new(names.intern(&TypeName::new("a.C").unwrap()), name, b"one".to_vec());
        assert_eq!(a.digest(), b.digest());
        assert_eq!(a.bytes(), b"one");
        assert_eq!(a.name().as_str(), "a.B");
        assert_eq!(a.key(), key);
        assert_ne!(a.key(), b.key());
    }
}
