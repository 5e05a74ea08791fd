//! Content digests identifying the exact bytes behind a loaded type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 128-bit XXH3 digest of an artifact's bytes.
///
/// Recorded on every loaded type so that callers can tell whether two
/// definitions came from identical compiler output, and so log lines can name
/// an artifact revision without dumping its contents.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentDigest([u8; 16]);

impl ContentDigest {
    /// Computes the digest of a byte slice.
    pub fn of(data: &[u8]) -> Self {
        Self(xxhash_rust::xxh3::xxh3_128(data).to_le_bytes())
    }

    /// Returns the first eight hex characters, enough to tell revisions apart
    /// in logs.
    pub fn short(&self) -> String {
        self.0[..4].iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentDigest({}..)", self.short())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_bytes_same_digest() {
        assert_eq!(ContentDigest::of(b"\xca\xfe\xba\xbe"), ContentDigest::of(b"\xca\xfe\xba\xbe"));
    }

    #[test]
    fn different_bytes_differ() {
        assert_ne!(ContentDigest::of(b"Outer"), ContentDigest::of(b"Outer$Inner"));
    }

    #[test]
    fn display_is_full_hex() {
        let s = ContentDigest::of(b"artifact").to_string();
        assert_eq!(s.len(), 32);
        assert!(s.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn short_is_display_prefix() {
        let d = ContentDigest::of(b"artifact");
        assert_eq!(d.short().len(), 8);
        assert!(d.to_string().starts_with(&d.short()));
        assert_eq!(format!("{d:?}"), format!("ContentDigest({}..)", d.short()));
    }

    #[test]
    fn serde_roundtrip() {
        let d = ContentDigest::of(b"serde");
        let json = serde_json::to_string(&d).unwrap();
        let back: ContentDigest = serde_json::from_str(&json).unwrap();
        assert_eq!(d, back);
    }
}
