//! Configuration types deserialized from `kiln.toml`.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};

/// Default compiler program.
pub const DEFAULT_COMPILER: &str = "javac";

/// Default compile timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// The top-level configuration parsed from `kiln.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct KilnConfig {
    /// Where sources are looked up and where artifacts are written.
    pub loader: LoaderSection,
    /// How the external compiler is invoked.
    #[serde(default)]
    pub compiler: CompilerConfig,
    /// File extensions for source units and compiled artifacts.
    #[serde(default)]
    pub layout: LayoutConfig,
    /// Host overrides for the path-list separator and ambient search path.
    #[serde(default)]
    pub host: HostConfig,
}

/// The `[loader]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct LoaderSection {
    /// Ordered search roots: plain paths or `file:` URLs. First match wins.
    #[serde(default)]
    pub search_roots: Vec<String>,
    /// Scratch directory for compiled artifacts and generated sources.
    pub output_dir: String,
    /// Fail a request when a discovered artifact cannot be read, instead of
    /// skipping it with a warning.
    #[serde(default)]
    pub strict_artifacts: bool,
}

/// The `[compiler]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct CompilerConfig {
    /// Executable name or path, looked up on the host's execution path.
    #[serde(default = "default_program")]
    pub program: String,
    /// Flag preceding the output directory.
    #[serde(default = "default_output_flag")]
    pub output_flag: String,
    /// Flag preceding the assembled classpath.
    #[serde(default = "default_classpath_flag")]
    pub classpath_flag: String,
    /// Extra arguments placed before the source file.
    ///
    /// Accepts either a single string (split on whitespace) or a list.
    #[serde(default, deserialize_with = "deserialize_args")]
    pub extra_args: Vec<String>,
    /// Upper bound on a single compile. `0` disables the bound.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            output_flag: default_output_flag(),
            classpath_flag: default_classpath_flag(),
            extra_args: Vec::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_program() -> String {
    DEFAULT_COMPILER.to_string()
}

fn default_output_flag() -> String {
    "-d".to_string()
}

fn default_classpath_flag() -> String {
    "-cp".to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Deserializes compiler arguments given either as one string or as a list.
fn deserialize_args<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct ArgsVisitor;

    impl<'de> Visitor<'de> for ArgsVisitor {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(v.split_whitespace().map(str::to_string).collect())
        }

        fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut args = Vec::new();
            while let Some(arg) = seq.next_element::<String>()? {
                args.push(arg);
            }
            Ok(args)
        }
    }

    deserializer.deserialize_any(ArgsVisitor)
}

/// The `[layout]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct LayoutConfig {
    /// Extension of source units, without the dot.
    #[serde(default = "default_source_extension")]
    pub source_extension: String,
    /// Extension of compiled artifacts, without the dot.
    #[serde(default = "default_artifact_extension")]
    pub artifact_extension: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            source_extension: default_source_extension(),
            artifact_extension: default_artifact_extension(),
        }
    }
}

fn default_source_extension() -> String {
    "java".to_string()
}

fn default_artifact_extension() -> String {
    "class".to_string()
}

/// The `[host]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct HostConfig {
    /// Host OS name. Windows-family names select `;` as the path-list
    /// separator. Defaults to the OS this binary was built for.
    #[serde(default)]
    pub os_name: Option<String>,
    /// Ambient search path appended to every classpath. Overrides
    /// [`ambient_env`](Self::ambient_env) when set.
    #[serde(default)]
    pub ambient_search_path: Option<String>,
    /// Environment variable holding the ambient search path.
    #[serde(default = "default_ambient_env")]
    pub ambient_env: String,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            os_name: None,
            ambient_search_path: None,
            ambient_env: default_ambient_env(),
        }
    }
}

fn default_ambient_env() -> String {
    "CLASSPATH".to_string()
}
