//! Build-script entry point.
//!
//! ```rust,ignore
//! // build.rs
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     restgen_gen::Builder::new()
//!         .src_root("src")
//!         .file("src/github.rs")
//!         .compile()?;
//!     Ok(())
//! }
//! ```
//!
//! Units land in `$OUT_DIR/restgen/{hint}.rs`:
//!
//! ```rust,ignore
//! include!(concat!(env!("OUT_DIR"), "/restgen/github.GithubApi.client.rs"));
//! ```

use std::env;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::{CONFIG_FILE_NAME, GeneratorConfig};
use crate::errors::GeneratorError;
use crate::output::write_units;
use crate::pipeline::{GenerationReport, Generator};
use crate::source::SourceUnit;

/// Environment variable naming a directory for the debug dump.
pub const DEBUG_DUMP_ENV: &str = "RESTGEN_DEBUG_DUMP";

/// Subdirectory of `OUT_DIR` that receives generated units.
pub const OUT_SUBDIR: &str = "restgen";

/// Configures and runs generation from a build script.
#[derive(Debug, Clone)]
pub struct Builder {
    files: Vec<PathBuf>,
    src_root: Option<PathBuf>,
    config: Option<GeneratorConfig>,
    config_file: Option<PathBuf>,
    out_dir: Option<PathBuf>,
    cargo_directives: bool,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder {
    pub fn new() -> Self {
        Self {
            files: Vec::new(),
            src_root: None,
            config: None,
            config_file: None,
            out_dir: None,
            cargo_directives: true,
        }
    }

    /// Adds a source file to scan.
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.push(path.into());
        self
    }

    /// Adds several source files.
    pub fn files<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.files.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Directory that module paths are derived from, usually `src`.
    pub fn src_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.src_root = Some(path.into());
        self
    }

    /// Uses `config` instead of discovering `restgen.toml`.
    pub fn config(mut self, config: GeneratorConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Loads the config from `path` instead of discovering `restgen.toml`.
    pub fn config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Writes units here instead of `$OUT_DIR/restgen`.
    pub fn out_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.out_dir = Some(path.into());
        self
    }

    /// Whether to print `cargo:` directives (on by default).
    pub fn cargo_directives(mut self, enabled: bool) -> Self {
        self.cargo_directives = enabled;
        self
    }

    /// Runs the generator and writes every unit.
    ///
    /// ## Errors
    ///
    /// Returns an error if `OUT_DIR` is unset and no output directory was
    /// given, if the config is invalid, if an input cannot be read or
    /// parsed, or if writing fails. Diagnostics are not errors; they are
    /// printed as `cargo:warning=` lines and returned in the report.
    pub fn compile(self) -> Result<GenerationReport, GeneratorError> {
        let out_dir = match &self.out_dir {
            Some(dir) => dir.clone(),
            None => env::var_os("OUT_DIR")
                .map(|dir| PathBuf::from(dir).join(OUT_SUBDIR))
                .ok_or_else(|| {
                    GeneratorError::ConfigError(
                        "OUT_DIR is not set; call out_dir() outside build scripts".to_string(),
                    )
                })?,
        };

        let mut config = self.resolve_config()?;
        if let Some(dir) = env::var_os(DEBUG_DUMP_ENV).filter(|dir| !dir.is_empty()) {
            config.debug.dump_dir = Some(PathBuf::from(dir));
        }

        if self.cargo_directives {
            println!("cargo:rerun-if-env-changed={DEBUG_DUMP_ENV}");
            for file in &self.files {
                println!("cargo:rerun-if-changed={}", file.display());
            }
        }

        let units = self
            .files
            .iter()
            .map(|file| SourceUnit::load(file, self.src_root.as_deref()))
            .collect::<Result<Vec<_>, _>>()?;

        let report = Generator::new(config)?.generate(&units)?;
        write_units(&out_dir, &report.units)?;

        if self.cargo_directives {
            for diagnostic in &report.diagnostics {
                println!("cargo:warning=restgen: {diagnostic}");
            }
        }
        info!(
            out_dir = %out_dir.display(),
            units = report.units.len(),
            "build generation complete"
        );
        Ok(report)
    }

    fn resolve_config(&self) -> Result<GeneratorConfig, GeneratorError> {
        if let Some(config) = &self.config {
            config.validate()?;
            return Ok(config.clone());
        }
        if let Some(path) = &self.config_file {
            if self.cargo_directives {
                println!("cargo:rerun-if-changed={}", path.display());
            }
            return GeneratorConfig::load(path);
        }

        let dir = env::var_os("CARGO_MANIFEST_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        if self.cargo_directives {
            println!(
                "cargo:rerun-if-changed={}",
                Path::new(&dir).join(CONFIG_FILE_NAME).display()
            );
        }
        GeneratorConfig::discover(&dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const SOURCE: &str = r#"
        use restgen::prelude::*;

        #[api_client]
        pub trait PingApi {
            #[get("/ping")]
            fn ping(&self) -> Task<'_>;
        }
    "#;

    fn project() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src/ping.rs"), SOURCE).unwrap();
        dir
    }

    #[test]
    fn writes_units_named_by_module() {
        let dir = project();
        let out = dir.path().join("out");

        let report = Builder::new()
            .src_root(dir.path().join("src"))
            .file(dir.path().join("src/ping.rs"))
            .config(GeneratorConfig::default())
            .out_dir(&out)
            .cargo_directives(false)
            .compile()
            .unwrap();

        assert_eq!(report.units.len(), 1);
        let code = fs::read_to_string(out.join("ping.PingApi.client.rs")).unwrap();
        assert!(code.contains("pub struct PingApiClient"));
    }

    #[test]
    fn config_file_sets_the_suffix() {
        let dir = project();
        let config = dir.path().join("restgen.toml");
        fs::write(&config, "client_suffix = \"Http\"\n").unwrap();

        let report = Builder::new()
            .src_root(dir.path().join("src"))
            .file(dir.path().join("src/ping.rs"))
            .config_file(&config)
            .out_dir(dir.path().join("out"))
            .cargo_directives(false)
            .compile()
            .unwrap();

        assert!(report.units[0].code.contains("pub struct PingApiHttp"));
    }

    #[test]
    fn missing_input_is_a_read_error() {
        let dir = project();
        let err = Builder::new()
            .file(dir.path().join("src/missing.rs"))
            .config(GeneratorConfig::default())
            .out_dir(dir.path().join("out"))
            .cargo_directives(false)
            .compile()
            .unwrap_err();
        assert!(matches!(err, GeneratorError::ReadError { .. }));
    }
}
