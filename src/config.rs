//! Application configuration.
//!
//! Settings are layered, highest priority first:
//!
//! ```text
//! CLI flags          --db, --templates, --output
//! environment        DB_PATH, TEMPLATE_PATH, OUTPUT_PATH, FOLIO_PRUNE_STALE
//! folio.toml         optional; a missing file is not an error
//! built-in defaults
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! db_path = "blog.db"           # SQLite database file
//! template_path = "templates"   # theme templates; CSS lives in ../static/css
//! output_path = "html-outputs"  # generated site
//! prune_stale = false           # delete files the previous run wrote but this one didn't
//! ```
//!
//! Run `folio gen-config` for a commented template.
//!
//! Only `main` reads this; the generator receives a plain
//! [`GeneratorConfig`] and never looks at the environment itself.

use crate::generate::GeneratorConfig;
use confique::Config;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "folio.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] confique::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Config)]
pub struct AppConfig {
    /// Path of the SQLite content database. Created on first use.
    #[config(env = "DB_PATH", default = "blog.db")]
    pub db_path: PathBuf,

    /// Directory holding header.html, footer.html, post.html, posts.html,
    /// index.html, portfolio.html and page.html. Stylesheets are read from
    /// the sibling directory static/css.
    #[config(env = "TEMPLATE_PATH", default = "templates")]
    pub template_path: PathBuf,

    /// Directory the site is written into. Created if missing.
    #[config(env = "OUTPUT_PATH", default = "html-outputs")]
    pub output_path: PathBuf,

    /// Remove output files produced by the previous run that the current
    /// run no longer produces. Only files recorded in the output manifest
    /// are ever removed.
    #[config(env = "FOLIO_PRUNE_STALE", default = false)]
    pub prune_stale: bool,
}

/// Values given on the command line; `None` keeps the loaded value.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub db_path: Option<PathBuf>,
    pub template_path: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
}

impl AppConfig {
    /// Environment first, then `file`, then defaults.
    pub fn load(file: &Path) -> Result<Self, ConfigError> {
        let config = Self::builder().env().file(file).load()?;
        config.validate()?;
        Ok(config)
    }

    /// `file` and defaults only, ignoring the environment.
    #[cfg(test)]
    fn from_file(file: &Path) -> Result<Self, ConfigError> {
        let config = Self::builder().file(file).load()?;
        config.validate()?;
        Ok(config)
    }

    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(db) = overrides.db_path {
            self.db_path = db;
        }
        if let Some(templates) = overrides.template_path {
            self.template_path = templates;
        }
        if let Some(output) = overrides.output_path {
            self.output_path = output;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("db_path", &self.db_path),
            ("template_path", &self.template_path),
            ("output_path", &self.output_path),
        ] {
            if value.as_os_str().is_empty() {
                return Err(ConfigError::Validation(format!("{key} must not be empty")));
            }
        }
        if self.output_path == self.template_path {
            return Err(ConfigError::Validation(
                "output_path must differ from template_path".into(),
            ));
        }
        Ok(())
    }

    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            template_dir: self.template_path.clone(),
            output_dir: self.output_path.clone(),
            prune_stale: self.prune_stale,
        }
    }
}

/// A commented TOML file listing every option with its default.
pub fn template() -> String {
    confique::toml::template::<AppConfig>(confique::toml::FormatOptions::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_config(body: &str) -> (TempDir, PathBuf) {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(DEFAULT_CONFIG_FILE);
        fs::write(&path, body).unwrap();
        (tmp, path)
    }

    #[test]
    fn missing_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = AppConfig::from_file(&tmp.path().join("absent.toml")).unwrap();
        assert_eq!(config.db_path, PathBuf::from("blog.db"));
        assert_eq!(config.template_path, PathBuf::from("templates"));
        assert_eq!(config.output_path, PathBuf::from("html-outputs"));
        assert!(!config.prune_stale);
    }

    #[test]
    fn file_values_override_defaults() {
        let (_tmp, path) = write_config("output_path = \"public\"\nprune_stale = true\n");
        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.output_path, PathBuf::from("public"));
        assert!(config.prune_stale);
        assert_eq!(config.db_path, PathBuf::from("blog.db"));
    }

    #[test]
    fn malformed_file_is_a_load_error() {
        let (_tmp, path) = write_config("prune_stale = \"sometimes\"\n");
        assert!(matches!(
            AppConfig::from_file(&path),
            Err(ConfigError::Load(_))
        ));
    }

    #[test]
    fn environment_beats_file() {
        let (_tmp, path) = write_config(
            "db_path = \"from-file.db\"\ntemplate_path = \"file-theme\"\nprune_stale = false\n",
        );
        // SAFETY: no other test in this crate reads these variables
        unsafe {
            std::env::set_var("DB_PATH", "from-env.db");
            std::env::set_var("FOLIO_PRUNE_STALE", "true");
        }
        let loaded = AppConfig::load(&path);
        // SAFETY: as above
        unsafe {
            std::env::remove_var("DB_PATH");
            std::env::remove_var("FOLIO_PRUNE_STALE");
        }

        let config = loaded.unwrap();
        assert_eq!(config.db_path, PathBuf::from("from-env.db"));
        assert!(config.prune_stale);
        if std::env::var_os("TEMPLATE_PATH").is_none() {
            assert_eq!(config.template_path, PathBuf::from("file-theme"));
        }
    }

    #[test]
    fn overrides_win() {
        let tmp = TempDir::new().unwrap();
        let mut config = AppConfig::from_file(&tmp.path().join("absent.toml")).unwrap();
        config.apply(Overrides {
            db_path: Some("other.db".into()),
            template_path: None,
            output_path: Some("dist".into()),
        });
        assert_eq!(config.db_path, PathBuf::from("other.db"));
        assert_eq!(config.template_path, PathBuf::from("templates"));
        assert_eq!(config.output_path, PathBuf::from("dist"));
    }

    #[test]
    fn empty_and_clashing_paths_fail_validation() {
        let (_tmp, path) = write_config("db_path = \"\"\n");
        let err = AppConfig::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("db_path"));

        let (_tmp, path) = write_config("output_path = \"site\"\ntemplate_path = \"site\"\n");
        let err = AppConfig::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("output_path"));
    }

    #[test]
    fn generator_config_carries_paths() {
        let tmp = TempDir::new().unwrap();
        let config = AppConfig::from_file(&tmp.path().join("absent.toml")).unwrap();
        let generator = config.generator_config();
        assert_eq!(generator.template_dir, PathBuf::from("templates"));
        assert_eq!(generator.output_dir, PathBuf::from("html-outputs"));
        assert!(!generator.prune_stale);
    }

    #[test]
    fn template_documents_every_option() {
        let toml = template();
        for key in ["db_path", "template_path", "output_path", "prune_stale"] {
            assert!(toml.contains(key), "{key}");
        }
    }
}
