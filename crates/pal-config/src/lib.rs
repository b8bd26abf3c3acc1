//! Configuration management for PAL.
//!
//! Parses `pal.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `loader.root`
//! - `loader.output_path`
//! - `resolve.out_dir`

mod expand;

use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;

use pal_directive::DEFAULT_FUNC_NAME;
use pal_resolve::{DEFAULT_HASH_LENGTH, DEFAULT_INLINE_LIMIT, MAX_HASH_LENGTH};
use regex::Regex;
use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "pal.toml";

static IDENTIFIER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("invalid identifier regex"));

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override contextual root.
    pub root: Option<PathBuf>,
    /// Override output path prefix.
    pub output_path: Option<String>,
    /// Override directive function name.
    pub func_name: Option<String>,
    /// Override output directory for relocated files.
    pub out_dir: Option<PathBuf>,
    /// Override unresolved directive policy.
    pub on_unresolved: Option<UnresolvedPolicy>,
}

/// What to do with directives whose resolution failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnresolvedPolicy {
    /// Fail the whole document, listing every failed directive.
    #[default]
    Error,
    /// Leave failed directives verbatim and log a warning for each.
    Keep,
}

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Loader configuration (paths are relative strings from TOML).
    loader: LoaderConfigRaw,
    /// Resolver configuration (paths are relative strings from TOML).
    resolve: ResolveConfigRaw,

    /// Resolved loader configuration (set after loading).
    #[serde(skip)]
    pub loader_resolved: LoaderConfig,
    /// Resolved resolver configuration (set after loading).
    #[serde(skip)]
    pub resolve_resolved: ResolveConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw loader configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct LoaderConfigRaw {
    root: Option<String>,
    output_path: Option<String>,
    func_name: Option<String>,
    on_unresolved: Option<UnresolvedPolicy>,
}

/// Resolved loader configuration.
#[derive(Debug)]
pub struct LoaderConfig {
    /// Contextual root that locators are relative to.
    pub root: Option<PathBuf>,
    /// Prefix prepended to relocated file names.
    pub output_path: Option<String>,
    /// Directive function name.
    pub func_name: String,
    /// Unresolved directive policy.
    pub on_unresolved: UnresolvedPolicy,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            root: None,
            output_path: None,
            func_name: DEFAULT_FUNC_NAME.to_owned(),
            on_unresolved: UnresolvedPolicy::default(),
        }
    }
}

/// Raw resolver configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ResolveConfigRaw {
    out_dir: Option<String>,
    inline_limit: Option<u64>,
    hash_length: Option<usize>,
    concurrency: Option<usize>,
    timeout_secs: Option<u64>,
}

/// Resolved resolver configuration with absolute paths.
#[derive(Debug)]
pub struct ResolveConfig {
    /// Directory relocated files are written to.
    pub out_dir: PathBuf,
    /// Images up to this many bytes become data URIs; 0 disables inlining.
    pub inline_limit: u64,
    /// Hex digits of the content hash in relocated names.
    pub hash_length: usize,
    /// Maximum requests in flight (unbounded when `None`).
    pub concurrency: Option<usize>,
    /// Per-request timeout.
    pub timeout: Option<Duration>,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("dist"),
            inline_limit: DEFAULT_INLINE_LIMIT,
            hash_length: DEFAULT_HASH_LENGTH,
            concurrency: None,
            timeout: None,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`loader.root`").
        field: String,
        /// Error message (e.g., "${`ASSETS_DIR`} not set").
        message: String,
    },
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `pal.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values. The merged result
    /// is validated.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails or
    /// the merged configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(root) = &settings.root {
            self.loader_resolved.root = Some(root.clone());
        }
        if let Some(output_path) = &settings.output_path {
            self.loader_resolved.output_path = Some(output_path.clone());
        }
        if let Some(func_name) = &settings.func_name {
            self.loader_resolved.func_name.clone_from(func_name);
        }
        if let Some(out_dir) = &settings.out_dir {
            self.resolve_resolved.out_dir.clone_from(out_dir);
        }
        if let Some(policy) = settings.on_unresolved {
            self.loader_resolved.on_unresolved = policy;
        }
    }

    /// Get the contextual root.
    ///
    /// Use this instead of accessing `loader_resolved.root` directly when the
    /// command needs to resolve assets.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if no root is configured.
    pub fn require_root(&self) -> Result<&Path, ConfigError> {
        self.loader_resolved.root.as_deref().ok_or_else(|| {
            ConfigError::Validation(
                "loader.root is required (set it in pal.toml or pass --root)".to_owned(),
            )
        })
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            loader: LoaderConfigRaw::default(),
            resolve: ResolveConfigRaw::default(),
            loader_resolved: LoaderConfig::default(),
            resolve_resolved: ResolveConfig {
                out_dir: base.join("dist"),
                ..ResolveConfig::default()
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically at the end of [`Config::load`]. The root is not
    /// checked here; commands that need it call [`Config::require_root`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_loader()?;
        self.validate_resolve()?;
        Ok(())
    }

    /// Validate loader configuration.
    fn validate_loader(&self) -> Result<(), ConfigError> {
        let func_name = &self.loader_resolved.func_name;
        if !IDENTIFIER_RE.is_match(func_name) {
            return Err(ConfigError::Validation(format!(
                "loader.func_name must be an identifier, got {func_name:?}"
            )));
        }
        Ok(())
    }

    /// Validate resolver configuration.
    fn validate_resolve(&self) -> Result<(), ConfigError> {
        let resolve = &self.resolve_resolved;

        if resolve.hash_length == 0 || resolve.hash_length > MAX_HASH_LENGTH {
            return Err(ConfigError::Validation(format!(
                "resolve.hash_length must be between 1 and {MAX_HASH_LENGTH}"
            )));
        }
        if resolve.concurrency == Some(0) {
            return Err(ConfigError::Validation(
                "resolve.concurrency must be greater than 0".to_owned(),
            ));
        }
        if resolve.timeout == Some(Duration::ZERO) {
            return Err(ConfigError::Validation(
                "resolve.timeout_secs must be greater than 0".to_owned(),
            ));
        }

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref root) = self.loader.root {
            self.loader.root = Some(expand::expand_env(root, "loader.root")?);
        }
        if let Some(ref output_path) = self.loader.output_path {
            self.loader.output_path = Some(expand::expand_env(output_path, "loader.output_path")?);
        }
        if let Some(ref out_dir) = self.resolve.out_dir {
            self.resolve.out_dir = Some(expand::expand_env(out_dir, "resolve.out_dir")?);
        }
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.loader_resolved = LoaderConfig {
            root: self.loader.root.as_deref().map(|r| config_dir.join(r)),
            output_path: self.loader.output_path.clone(),
            func_name: self
                .loader
                .func_name
                .clone()
                .unwrap_or_else(|| DEFAULT_FUNC_NAME.to_owned()),
            on_unresolved: self.loader.on_unresolved.unwrap_or_default(),
        };

        self.resolve_resolved = ResolveConfig {
            out_dir: config_dir.join(self.resolve.out_dir.as_deref().unwrap_or("dist")),
            inline_limit: self.resolve.inline_limit.unwrap_or(DEFAULT_INLINE_LIMIT),
            hash_length: self.resolve.hash_length.unwrap_or(DEFAULT_HASH_LENGTH),
            concurrency: self.resolve.concurrency,
            timeout: self.resolve.timeout_secs.map(Duration::from_secs),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.loader_resolved.root, None);
        assert_eq!(config.loader_resolved.func_name, "pal");
        assert_eq!(
            config.loader_resolved.on_unresolved,
            UnresolvedPolicy::Error
        );
        assert_eq!(config.resolve_resolved.out_dir, PathBuf::from("/test/dist"));
        assert_eq!(config.resolve_resolved.inline_limit, 8192);
        assert_eq!(config.resolve_resolved.hash_length, 8);
        assert!(config.resolve_resolved.concurrency.is_none());
        assert!(config.resolve_resolved.timeout.is_none());
        config.validate().unwrap();
    }

    #[test]
    fn test_defaults_shared_with_scanner_and_resolver() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.loader_resolved.func_name, pal_directive::DEFAULT_FUNC_NAME);
        assert_eq!(
            config.resolve_resolved.inline_limit,
            pal_resolve::DEFAULT_INLINE_LIMIT
        );
        assert_eq!(
            config.resolve_resolved.hash_length,
            pal_resolve::DEFAULT_HASH_LENGTH
        );
    }

    #[test]
    fn test_parse_minimal_config() {
        let mut config: Config = toml::from_str("").unwrap();
        config.resolve_paths(Path::new("/project"));
        assert_eq!(config.loader_resolved.func_name, "pal");
        assert_eq!(
            config.resolve_resolved.out_dir,
            PathBuf::from("/project/dist")
        );
    }

    #[test]
    fn test_resolve_paths() {
        let toml = r#"
[loader]
root = "assets"
output_path = "/static"
func_name = "asset"
on_unresolved = "keep"

[resolve]
out_dir = "public/assets"
inline_limit = 0
hash_length = 12
concurrency = 4
timeout_secs = 30
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(
            config.loader_resolved.root,
            Some(PathBuf::from("/project/assets"))
        );
        assert_eq!(config.loader_resolved.output_path.as_deref(), Some("/static"));
        assert_eq!(config.loader_resolved.func_name, "asset");
        assert_eq!(config.loader_resolved.on_unresolved, UnresolvedPolicy::Keep);
        assert_eq!(
            config.resolve_resolved.out_dir,
            PathBuf::from("/project/public/assets")
        );
        assert_eq!(config.resolve_resolved.inline_limit, 0);
        assert_eq!(config.resolve_resolved.hash_length, 12);
        assert_eq!(config.resolve_resolved.concurrency, Some(4));
        assert_eq!(
            config.resolve_resolved.timeout,
            Some(Duration::from_secs(30))
        );
    }

    #[test]
    fn test_unknown_policy_rejected() {
        let toml = r#"
[loader]
on_unresolved = "ignore"
"#;
        let result: Result<Config, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_func_name() {
        let mut config = Config::default_with_base(Path::new("/test"));
        for valid in ["pal", "_asset", "$img", "load2"] {
            valid.clone_into(&mut config.loader_resolved.func_name);
            config.validate().unwrap();
        }
        for invalid in ["", "2pal", "pal-asset", "pal("] {
            invalid.clone_into(&mut config.loader_resolved.func_name);
            let err = config.validate().unwrap_err();
            assert!(
                matches!(err, ConfigError::Validation(_)),
                "Expected ConfigError::Validation, got {err:?}"
            );
            assert!(err.to_string().contains("func_name"));
        }
    }

    #[test]
    fn test_validate_hash_length() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.resolve_resolved.hash_length = 0;
        assert!(config.validate().is_err());
        config.resolve_resolved.hash_length = 65;
        assert!(config.validate().is_err());
        config.resolve_resolved.hash_length = 64;
        config.validate().unwrap();
    }

    #[test]
    fn test_validate_concurrency_and_timeout() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.resolve_resolved.concurrency = Some(0);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("concurrency"));

        config.resolve_resolved.concurrency = Some(1);
        config.resolve_resolved.timeout = Some(Duration::ZERO);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("timeout_secs"));
    }

    #[test]
    fn test_require_root() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let err = config.require_root().unwrap_err();
        assert!(err.to_string().contains("loader.root"));

        config.loader_resolved.root = Some(PathBuf::from("/test/assets"));
        assert_eq!(config.require_root().unwrap(), Path::new("/test/assets"));
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            root: Some(PathBuf::from("/custom/assets")),
            func_name: Some("asset".to_owned()),
            on_unresolved: Some(UnresolvedPolicy::Keep),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(
            config.loader_resolved.root,
            Some(PathBuf::from("/custom/assets"))
        );
        assert_eq!(config.loader_resolved.func_name, "asset");
        assert_eq!(config.loader_resolved.on_unresolved, UnresolvedPolicy::Keep);
        assert_eq!(config.loader_resolved.output_path, None); // Unchanged
        assert_eq!(config.resolve_resolved.out_dir, PathBuf::from("/test/dist")); // Unchanged
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pal.toml");
        std::fs::write(
            &path,
            "[loader]\nroot = \"src/assets\"\n\n[resolve]\nout_dir = \"build\"\n",
        )
        .unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.config_path, Some(path.clone()));
        assert_eq!(
            config.require_root().unwrap(),
            dir.path().join("src/assets")
        );
        assert_eq!(config.resolve_resolved.out_dir, dir.path().join("build"));
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let err = Config::load(Some(Path::new("/nonexistent/pal.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_validates_cli_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pal.toml");
        std::fs::write(&path, "[loader]\nroot = \"assets\"\n").unwrap();
        let overrides = CliSettings {
            func_name: Some("not valid".to_owned()),
            ..Default::default()
        };

        let err = Config::load(Some(&path), Some(&overrides)).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_load_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pal.toml");
        std::fs::write(&path, "[loader\nroot = ").unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_env_var_expansion() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("PAL_TEST_ASSET_ROOT", "shared/assets");
            std::env::remove_var("PAL_TEST_OUTPUT_PATH");
        }
        let toml = r#"
[loader]
root = "${PAL_TEST_ASSET_ROOT}"
output_path = "${PAL_TEST_OUTPUT_PATH:-/cdn/}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(
            config.loader_resolved.root,
            Some(PathBuf::from("/project/shared/assets"))
        );
        assert_eq!(config.loader_resolved.output_path.as_deref(), Some("/cdn/"));

        unsafe {
            std::env::remove_var("PAL_TEST_ASSET_ROOT");
        }
    }

    #[test]
    fn test_env_var_missing() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("PAL_TEST_MISSING_OUT_DIR");
        }
        let toml = r#"
[resolve]
out_dir = "${PAL_TEST_MISSING_OUT_DIR}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        let err = config.expand_env_vars().unwrap_err();
        assert!(
            matches!(err, ConfigError::EnvVar { ref field, .. } if field == "resolve.out_dir"),
            "Expected ConfigError::EnvVar, got {err:?}"
        );
    }
}
