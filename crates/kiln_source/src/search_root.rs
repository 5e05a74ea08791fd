//! Search roots: base locations consulted in order when resolving a name.

use std::path::{Path, PathBuf};

use kiln_config::is_url_location;
use tracing::debug;
use url::Url;

/// A base location for source resolution, given as a plain path or a
/// `file:` URL.
///
/// The filesystem path is decoded once at construction. URL locations are
/// percent-decoded; if that fails (unparseable URL, non-local host, non-file
/// scheme) the raw location with its scheme prefix removed is used instead, so
/// a malformed root degrades to a literal path rather than aborting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRoot {
    location: String,
    fs_path: PathBuf,
}

impl SearchRoot {
    /// Creates a search root from its location string.
    pub fn new(location: impl Into<String>) -> Self {
        let location = location.into();
        let fs_path = decode_location(&location);
        Self { location, fs_path }
    }

    /// Creates a search root from a filesystem path.
    pub fn from_path(path: &Path) -> Self {
        Self {
            location: path.to_string_lossy().into_owned(),
            fs_path: path.to_path_buf(),
        }
    }

    /// The location exactly as it was given.
    pub fn external_form(&self) -> &str {
        &self.location
    }

    /// Returns `true` if the location is URL-style.
    pub fn is_url(&self) -> bool {
        is_url_location(&self.location)
    }

    /// The external form with a leading `file://` or `file:` scheme removed.
    ///
    /// Percent-escapes are left as they are; this is the form placed on the
    /// compiler's classpath.
    pub fn bare_path(&self) -> &str {
        strip_file_scheme(&self.location)
    }

    /// The decoded filesystem path used for existence checks.
    pub fn fs_path(&self) -> &Path {
        &self.fs_path
    }
}

fn strip_file_scheme(location: &str) -> &str {
    for prefix in ["file://", "file:"] {
        if location.len() >= prefix.len()
            && location.is_char_boundary(prefix.len())
            && location[..prefix.len()].eq_ignore_ascii_case(prefix)
        {
            return &location[prefix.len()..];
        }
    }
    location
}

fn decode_location(location: &str) -> PathBuf {
    if !is_url_location(location) {
        return PathBuf::from(location);
    }
    match Url::parse(location).ok().and_then(|u| u.to_file_path().ok()) {
        Some(path) => path,
        None => {
            debug!(location, "search root is not a decodable file URL, using it verbatim");
            PathBuf::from(strip_file_scheme(location))
        }
    }
}
