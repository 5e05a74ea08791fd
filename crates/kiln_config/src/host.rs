//! Host facts: the only place host-dependent conventions are decided.

use crate::types::HostConfig;

/// Provider of the host conventions the loader depends on.
///
/// Everything that varies by operating system goes through this trait so the
/// rest of the pipeline never branches on the platform directly and tests can
/// substitute a [`StaticHost`].
pub trait HostFacts: Send + Sync {
    /// The host OS name, as configured (e.g. `"linux"`, `"Windows 10"`).
    fn os_name(&self) -> &str;

    /// The ambient default search path appended to every classpath.
    fn ambient_search_path(&self) -> &str;

    /// Returns `true` for Windows-family hosts.
    fn is_windows_family(&self) -> bool {
        self.os_name().to_ascii_lowercase().starts_with("windows")
    }

    /// Separator between entries of a path list: `;` on Windows-family hosts,
    /// `:` everywhere else.
    fn path_list_separator(&self) -> char {
        if self.is_windows_family() {
            ';'
        } else {
            ':'
        }
    }
}

/// Host facts taken from the `[host]` configuration section, falling back to
/// the build target OS and the process environment.
#[derive(Debug, Clone)]
pub struct ConfiguredHost {
    os_name: String,
    ambient_search_path: String,
}

impl ConfiguredHost {
    /// Builds host facts from configuration.
    ///
    /// An explicit `ambient_search_path` wins; otherwise the variable named by
    /// `ambient_env` is read, and an unset or non-UTF-8 variable yields an
    /// empty ambient path.
    pub fn from_config(config: &HostConfig) -> Self {
        let os_name = config
            .os_name
            .clone()
            .unwrap_or_else(|| std::env::consts::OS.to_string());
        let ambient_search_path = match &config.ambient_search_path {
            Some(path) => path.clone(),
            None => std::env::var(&config.ambient_env).unwrap_or_default(),
        };
        Self {
            os_name,
            ambient_search_path,
        }
    }

    /// Host facts for the current process with default configuration.
    pub fn from_env() -> Self {
        Self::from_config(&HostConfig::default())
    }
}

impl HostFacts for ConfiguredHost {
    fn os_name(&self) -> &str {
        &self.os_name
    }

    fn ambient_search_path(&self) -> &str {
        &self.ambient_search_path
    }
}

/// Fixed host facts, for tests and embedders that already know the answers.
#[derive(Debug, Clone)]
pub struct StaticHost {
    os_name: String,
    ambient_search_path: String,
}

impl StaticHost {
    /// Creates host facts with the given OS name and ambient search path.
    pub fn new(os_name: impl Into<String>, ambient_search_path: impl Into<String>) -> Self {
        Self {
            os_name: os_name.into(),
            ambient_search_path: ambient_search_path.into(),
        }
    }
}

impl HostFacts for StaticHost {
    fn os_name(&self) -> &str {
        &self.os_name
    }

    fn ambient_search_path(&self) -> &str {
        &self.ambient_search_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unix_like_separator() {
        for os in ["linux", "macos", "freebsd", "Mac OS X"] {
            assert_eq!(StaticHost::new(os, "").path_list_separator(), ':', "{os}");
        }
    }

    #[test]
    fn windows_family_separator() {
        for os in ["windows", "Windows 10", "WINDOWS SERVER 2022"] {
            let host = StaticHost::new(os, "");
            assert!(host.is_windows_family());
            assert_eq!(host.path_list_separator(), ';', "{os}");
        }
    }

    #[test]
    fn explicit_ambient_path_wins() {
        let config = HostConfig {
            os_name: Some("linux".to_string()),
            ambient_search_path: Some("/opt/lib/a.jar".to_string()),
            ambient_env: "PATH".to_string(),
        };
        let host = ConfiguredHost::from_config(&config);
        assert_eq!(host.os_name(), "linux");
        assert_eq!(host.ambient_search_path(), "/opt/lib/a.jar");
    }

    #[test]
    fn unset_env_gives_empty_ambient_path() {
        let config = HostConfig {
            os_name: None,
            ambient_search_path: None,
            ambient_env: "KILN_TEST_SURELY_UNSET_VARIABLE_7F3A".to_string(),
        };
        let host = ConfiguredHost::from_config(&config);
        assert_eq!(host.ambient_search_path(), "");
        assert_eq!(host.os_name(), std::env::consts::OS);
    }
}
