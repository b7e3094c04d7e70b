//! Generator configuration.
//!
//! Settings resolve in three layers, later layers winning:
//!
//! 1. [`GeneratorConfig::default`]
//! 2. a TOML file (`restgen.toml` next to the crate, or `--config`)
//! 3. CLI flags / [`Builder`](crate::builder::Builder) calls
//!
//! ```toml
//! client_suffix = "Http"
//! runtime_crate = "restgen"
//!
//! [query]
//! scalars = "omit_null"
//! composite_fields = "always"
//!
//! [debug]
//! dump_dir = "target/restgen-debug"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use restgen_define::QueryPolicy;
use serde::{Deserialize, Serialize};

use crate::errors::GeneratorError;

/// File name looked up by [`GeneratorConfig::discover`].
pub const CONFIG_FILE_NAME: &str = "restgen.toml";

/// Default suffix appended to a trait name to form the client name.
pub const DEFAULT_CLIENT_SUFFIX: &str = "Client";

/// Default path generated code uses to reach the runtime crate.
pub const DEFAULT_RUNTIME_CRATE: &str = "restgen";

/// Settings that shape generated code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Suffix for client names when `#[api_client]` has no `name`.
    pub client_suffix: String,
    /// Crate name generated code uses for runtime items (`::restgen::...`).
    pub runtime_crate: String,
    /// When query values are written or omitted.
    pub query: QueryPolicy,
    /// Debug side channel settings.
    pub debug: DebugConfig,
}

/// Debug side channel settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DebugConfig {
    /// Directory that receives a copy of every emitted unit.
    pub dump_dir: Option<PathBuf>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            client_suffix: DEFAULT_CLIENT_SUFFIX.to_string(),
            runtime_crate: DEFAULT_RUNTIME_CRATE.to_string(),
            query: QueryPolicy::default(),
            debug: DebugConfig::default(),
        }
    }
}

impl GeneratorConfig {
    /// Loads and validates a config file.
    ///
    /// ## Errors
    ///
    /// Returns an error if the file cannot be read, is not valid TOML for
    /// this schema, or fails [`validate`](Self::validate).
    pub fn load(path: &Path) -> Result<Self, GeneratorError> {
        let text = fs::read_to_string(path).map_err(|e| GeneratorError::ReadError {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Self = toml::from_str(&text).map_err(|e| GeneratorError::ConfigParseError {
            path: path.display().to_string(),
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `restgen.toml` from `dir` if present, defaults otherwise.
    ///
    /// ## Errors
    ///
    /// Returns an error if the file exists but cannot be loaded.
    pub fn discover(dir: &Path) -> Result<Self, GeneratorError> {
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    /// Checks that every setting yields valid Rust.
    ///
    /// ## Errors
    ///
    /// Returns `GeneratorError::ConfigError` if the client suffix is empty
    /// or not alphanumeric, or the runtime crate is not a valid identifier.
    pub fn validate(&self) -> Result<(), GeneratorError> {
        if self.client_suffix.is_empty() {
            return Err(GeneratorError::ConfigError(
                "client_suffix cannot be empty".to_string(),
            ));
        }
        if !self.client_suffix.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(GeneratorError::ConfigError(format!(
                "client_suffix '{}' must contain only letters and numbers",
                self.client_suffix
            )));
        }
        if syn::parse_str::<syn::Ident>(&self.runtime_crate).is_err() {
            return Err(GeneratorError::ConfigError(format!(
                "runtime_crate '{}' is not a valid crate name",
                self.runtime_crate
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use restgen_define::ValuePolicy;
    use tempfile::TempDir;

    #[test]
    fn defaults() {
        let config = GeneratorConfig::default();
        assert_eq!(config.client_suffix, "Client");
        assert_eq!(config.runtime_crate, "restgen");
        assert_eq!(config.query.scalars, ValuePolicy::OmitNullOrDefault);
        assert_eq!(config.query.composite_fields, ValuePolicy::Always);
        assert!(config.debug.dump_dir.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config: GeneratorConfig = toml::from_str(
            r#"
            client_suffix = "Http"

            [query]
            scalars = "always"
            "#,
        )
        .unwrap();
        assert_eq!(config.client_suffix, "Http");
        assert_eq!(config.runtime_crate, "restgen");
        assert_eq!(config.query.scalars, ValuePolicy::Always);
        assert_eq!(config.query.composite_fields, ValuePolicy::Always);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result: Result<GeneratorConfig, _> = toml::from_str("request_suffix = \"Req\"");
        assert!(result.is_err());
    }

    #[test]
    fn invalid_suffix_is_rejected() {
        let config = GeneratorConfig {
            client_suffix: "Client!".into(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(GeneratorError::ConfigError(_))
        ));
    }

    #[test]
    fn invalid_runtime_crate_is_rejected() {
        let config = GeneratorConfig {
            runtime_crate: "rest-gen".into(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn discover_reads_restgen_toml() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[debug]\ndump_dir = \"dump\"\n",
        )
        .unwrap();

        let config = GeneratorConfig::discover(dir.path()).unwrap();
        assert_eq!(config.debug.dump_dir, Some(PathBuf::from("dump")));
    }

    #[test]
    fn discover_without_file_is_default() {
        let dir = TempDir::new().unwrap();
        let config = GeneratorConfig::discover(dir.path()).unwrap();
        assert_eq!(config, GeneratorConfig::default());
    }

    #[test]
    fn load_reports_bad_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "client_suffix = 3").unwrap();
        assert!(matches!(
            GeneratorConfig::load(&path),
            Err(GeneratorError::ConfigParseError { .. })
        ));
    }
}
