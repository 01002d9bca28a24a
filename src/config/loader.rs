// booster-rs: Booster Fleet Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Layered configuration loading.
//!
//! ```text
//! Config::default()               (serde defaults)
//!   < ./booster.toml              optional, skipped when absent
//!   < --config FILE ...           required, in command-line order
//!   < BOOSTER_<SECTION>__<KEY>    list keys split on ','
//!        |
//!        v
//!   build() --> Config::validate() --> Config
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File, FileFormat, FileSourceFile};

use super::Config;
use crate::error::{ConfigError, Result};

/// Keys whose environment values are comma-separated lists.
const LIST_KEYS: [&str; 4] = [
    "fleet.branches",
    "fleet.include",
    "fleet.exclude",
    "release.allowed_qualifiers",
];

/// One source that contributed to the configuration.
#[derive(Debug, Clone)]
enum Layer {
    /// `booster.toml` found next to the invocation.
    Local(PathBuf),
    /// A `--config` file.
    Explicit(PathBuf),
    Inline,
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local(path) => write!(f, "{} (local)", path.display()),
            Self::Explicit(path) => write!(f, "{}", path.display()),
            Self::Inline => f.write_str("<inline>"),
        }
    }
}

pub struct ConfigLoader {
    builder: ConfigBuilder<DefaultState>,
    layers: Vec<Layer>,
    env_prefix: Option<String>,
}

impl ConfigLoader {
    #[must_use]
    pub fn new() -> Self {
        Self {
            builder: config::Config::builder(),
            layers: Vec::new(),
            env_prefix: None,
        }
    }

    fn toml(mut self, source: File<FileSourceFile, FileFormat>, layer: Option<Layer>) -> Self {
        self.builder = self.builder.add_source(source.format(FileFormat::Toml));
        self.layers.extend(layer);
        self
    }

    /// A `--config` file; a missing file fails `build()`.
    #[must_use]
    pub fn add_toml_file(self, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        self.toml(
            File::from(path).required(true),
            Some(Layer::Explicit(path.to_path_buf())),
        )
    }

    /// A file that is read only when present.
    #[must_use]
    pub fn add_toml_file_optional(self, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let layer = path.exists().then(|| Layer::Local(path.to_path_buf()));
        self.toml(File::from(path).required(false), layer)
    }

    #[must_use]
    pub fn add_toml_str(mut self, content: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(content, FileFormat::Toml));
        self.layers.push(Layer::Inline);
        self
    }

    /// Reads `<PREFIX>_<SECTION>__<KEY>` variables on top of every file.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_string());
        self
    }

    /// Numbered list of the layers that were found, lowest precedence first.
    #[must_use]
    pub fn layers(&self) -> Vec<String> {
        self.layers
            .iter()
            .enumerate()
            .map(|(i, layer)| format!("{}. {layer}", i + 1))
            .collect()
    }

    /// Merges every layer and validates the result.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParseError`] naming the layers when a required
    /// file is missing, a file is not TOML, or a value has the wrong type;
    /// otherwise whatever [`Config::validate`] rejects.
    pub fn build(self) -> Result<Config> {
        let sources = self
            .layers
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");

        let mut builder = self.builder;
        if let Some(prefix) = &self.env_prefix {
            let env = Environment::with_prefix(prefix)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",");
            builder = builder.add_source(
                LIST_KEYS
                    .iter()
                    .fold(env, |env, key| env.with_list_parse_key(key)),
            );
        }

        let config = builder
            .build()
            .and_then(config::Config::try_deserialize::<Config>)
            .map_err(|e| ConfigError::ParseError {
                path: sources,
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
