//! Classpath assembly for the compiler invocation.

use kiln_config::HostFacts;

use crate::search_root::SearchRoot;

/// Builds the compiler classpath from the search roots and the host's ambient
/// search path.
///
/// Each root contributes its external form with any `file:` scheme removed.
/// Entries are joined with the host's path-list separator and the ambient
/// search path is appended last. An empty ambient path adds nothing, so the
/// result never ends in a dangling separator.
pub fn build_classpath(roots: &[SearchRoot], host: &dyn HostFacts) -> String {
    let separator = host.path_list_separator().to_string();
    let ambient = host.ambient_search_path();

    let mut entries: Vec<&str> = roots.iter().map(SearchRoot::bare_path).collect();
    if !ambient.is_empty() {
        entries.push(ambient);
    }
    entries.join(&separator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_config::StaticHost;

    #[test]
    fn strips_file_scheme_and_appends_ambient() {
        let roots = [SearchRoot::new("/a"), SearchRoot::new("file:/b")];
        let host = StaticHost::new("linux", "/usr/share/java/rt.jar");
        assert_eq!(
            build_classpath(&roots, &host),
            "/a:/b:/usr/share/java/rt.jar"
        );
    }

    #[test]
    fn windows_family_uses_semicolon() {
        let roots = [SearchRoot::new("C:\\src"), SearchRoot::new("file:/D:/gen")];
        let host = StaticHost::new("Windows 10", "C:\\jdk\\lib");
        assert_eq!(build_classpath(&roots, &host), "C:\\src;/D:/gen;C:\\jdk\\lib");
    }

    #[test]
    fn empty_ambient_has_no_trailing_separator() {
        let roots = [SearchRoot::new("/a"), SearchRoot::new("/b")];
        let host = StaticHost::new("linux", "");
        assert_eq!(build_classpath(&roots, &host), "/a:/b");
    }

    #[test]
    fn no_roots_is_just_ambient() {
        let host = StaticHost::new("linux", "/lib/a.jar:/lib/b.jar");
        assert_eq!(build_classpath(&[], &host), "/lib/a.jar:/lib/b.jar");
    }

    #[test]
    fn url_escapes_survive() {
        let roots = [SearchRoot::new("file:///opt/my%20src")];
        let host = StaticHost::new("linux", "");
        assert_eq!(build_classpath(&roots, &host), "/opt/my%20src");
    }
}
