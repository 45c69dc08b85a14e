//! Corpus profiles for the atf toolchain.
//!
//! `defaults/atf.default.toml` is embedded into every binary, so the built-in profiles and
//! the documented ones never drift apart. Applications layer user files on top of those
//! defaults via [`Loader`] before deserializing into [`AtfConfig`].
//!
//! A profile names the dialect [`Extensions`] one source corpus is written in, and
//! optionally the language its lines default to.

use atf::{Extensions, Grammar};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/atf.default.toml");

/// Top-level configuration consumed by atf applications.
#[derive(Debug, Clone, Deserialize)]
pub struct AtfConfig {
    pub default_language: String,
    pub default_corpus: String,
    pub corpora: BTreeMap<String, CorpusProfile>,
}

/// The house style of one source corpus.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CorpusProfile {
    #[serde(default)]
    pub description: String,
    /// Language for lines that do not declare one; falls back to the global default.
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub extensions: Extensions,
}

impl CorpusProfile {
    pub fn grammar(&self) -> Grammar {
        Grammar::new(self.extensions)
    }
}

impl AtfConfig {
    /// Look up a profile by name.
    pub fn profile(&self, name: &str) -> Result<&CorpusProfile, ConfigError> {
        self.corpora
            .get(name)
            .ok_or_else(|| ConfigError::NotFound(format!("corpora.{name}")))
    }

    /// The profile named by `name`, or the configured default one.
    pub fn profile_or_default(&self, name: Option<&str>) -> Result<&CorpusProfile, ConfigError> {
        self.profile(name.unwrap_or(&self.default_corpus))
    }

    /// The language lines of `profile` start in.
    pub fn language_for<'a>(&'a self, profile: &'a CorpusProfile) -> &'a str {
        profile
            .language
            .as_deref()
            .unwrap_or(&self.default_language)
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file, ignored if absent.
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override, e.g. from a command-line flag.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<AtfConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<AtfConfig, ConfigError> {
    Loader::new().build()
}
