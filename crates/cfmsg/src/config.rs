// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! YAML configuration.
//!
//! # Example YAML
//!
//! ```yaml
//! # cfmsg.yaml
//! limits:
//!   max_message_size: 1048576
//!   max_array_len: 4096
//! interface_dirs:
//!   - /opt/ros/noetic/share
//!   - ./interfaces
//! load_builtin: true
//! ```
//!
//! Environment variables override the file:
//!
//! | Variable | Field |
//! |----------|-------|
//! | `CFMSG_MAX_MESSAGE_SIZE` | `limits.max_message_size` |
//! | `CFMSG_MAX_ARRAY_LEN` | `limits.max_array_len` |
//! | `CFMSG_INTERFACE_PATH` | appended to `interface_dirs` (`:`-separated) |

use crate::catalog::{CatalogError, SchemaCatalog};
use crate::codec::{CodecLimits, DEFAULT_MAX_ARRAY_LEN, DEFAULT_MAX_MESSAGE_SIZE};
use crate::idl::{InterfaceSet, ParseError, RegisterError};
use crate::interfaces;
use crate::registry::TypeRegistry;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_MAX_MESSAGE_SIZE: &str = "CFMSG_MAX_MESSAGE_SIZE";
pub const ENV_MAX_ARRAY_LEN: &str = "CFMSG_MAX_ARRAY_LEN";
pub const ENV_INTERFACE_PATH: &str = "CFMSG_INTERFACE_PATH";

/// Configuration error.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Reading the config file failed.
    Io { path: PathBuf, message: String },
    /// The YAML document did not parse.
    Yaml(String),
    /// An environment variable held an unusable value.
    Env { var: &'static str, value: String },
    /// A value is out of range.
    Invalid(String),
    /// An interface directory failed to load.
    Interfaces(RegisterError),
    /// Building the registry failed.
    Catalog(CatalogError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, message } => {
                write!(f, "Failed to read config file {}: {}", path.display(), message)
            }
            Self::Yaml(msg) => write!(f, "Failed to parse YAML: {}", msg),
            Self::Env { var, value } => write!(f, "Invalid value for {}: {:?}", var, value),
            Self::Invalid(msg) => write!(f, "Invalid configuration: {}", msg),
            Self::Interfaces(e) => write!(f, "Failed to load interfaces: {}", e),
            Self::Catalog(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Interfaces(e) => Some(e),
            Self::Catalog(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RegisterError> for ConfigError {
    fn from(e: RegisterError) -> Self {
        Self::Interfaces(e)
    }
}

impl From<ParseError> for ConfigError {
    fn from(e: ParseError) -> Self {
        Self::Interfaces(RegisterError::Parse(e))
    }
}

impl From<CatalogError> for ConfigError {
    fn from(e: CatalogError) -> Self {
        Self::Catalog(e)
    }
}

/// Codec limits as they appear in YAML.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Largest accepted encoded message, in bytes.
    pub max_message_size: usize,
    /// Largest accepted array element count.
    pub max_array_len: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
            max_array_len: DEFAULT_MAX_ARRAY_LEN,
        }
    }
}

impl From<&LimitsConfig> for CodecLimits {
    fn from(limits: &LimitsConfig) -> Self {
        CodecLimits {
            max_message_size: limits.max_message_size,
            max_array_len: limits.max_array_len,
        }
    }
}

/// Root configuration document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Codec limits.
    pub limits: LimitsConfig,

    /// Directories laid out as `<dir>/<package>/msg/*.msg` and `srv/*.srv`.
    pub interface_dirs: Vec<PathBuf>,

    /// Register the built-in `crazyflie_driver` interfaces.
    pub load_builtin: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            limits: LimitsConfig::default(),
            interface_dirs: Vec::new(),
            load_builtin: true,
        }
    }
}

impl Config {
    /// Parse a YAML document. Missing keys take their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(yaml).map_err(|e| ConfigError::Yaml(e.to_string()))?
        };
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a YAML file. Relative interface directories are
    /// resolved against the file's directory.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let mut config = Self::from_yaml_str(&text)?;
        if let Some(base) = path.parent() {
            for dir in &mut config.interface_dirs {
                if dir.is_relative() {
                    *dir = base.join(&*dir);
                }
            }
        }
        log::debug!("config: loaded {}", path.display());
        Ok(config)
    }

    /// Apply the `CFMSG_*` environment variables.
    pub fn with_env(self) -> Result<Self, ConfigError> {
        self.with_env_from(|var| std::env::var(var).ok())
    }

    /// Apply overrides from an arbitrary variable source.
    pub fn with_env_from<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_MAX_MESSAGE_SIZE) {
            self.limits.max_message_size = parse_env(ENV_MAX_MESSAGE_SIZE, value)?;
        }
        if let Some(value) = lookup(ENV_MAX_ARRAY_LEN) {
            self.limits.max_array_len = parse_env(ENV_MAX_ARRAY_LEN, value)?;
        }
        if let Some(value) = lookup(ENV_INTERFACE_PATH) {
            self.interface_dirs.extend(
                value
                    .split(':')
                    .filter(|part| !part.is_empty())
                    .map(PathBuf::from),
            );
        }
        self.validate()?;
        Ok(self)
    }

    /// Codec limits for [`BinaryCodec`](crate::codec::BinaryCodec).
    pub fn codec_limits(&self) -> CodecLimits {
        CodecLimits::from(&self.limits)
    }

    /// Built-ins (if enabled) plus every configured interface directory.
    pub fn build_catalog(&self) -> Result<SchemaCatalog, ConfigError> {
        let mut set = InterfaceSet::new();
        if self.load_builtin {
            interfaces::add_builtin(&mut set)?;
        }
        for dir in &self.interface_dirs {
            let count = set.load_dir(dir)?;
            log::debug!("config: {} definitions from {}", count, dir.display());
        }
        let mut catalog = SchemaCatalog::new();
        set.register_into(&mut catalog)?;
        Ok(catalog)
    }

    /// [`build_catalog`](Self::build_catalog) frozen into a registry with
    /// the configured limits.
    pub fn build_registry(&self) -> Result<TypeRegistry, ConfigError> {
        let catalog = self.build_catalog()?;
        let registry = TypeRegistry::builder(&catalog)
            .limits(self.codec_limits())
            .build()?;
        Ok(registry)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.limits.max_message_size == 0 {
            return Err(ConfigError::Invalid(
                "limits.max_message_size must be greater than 0".to_string(),
            ));
        }
        if self.limits.max_array_len == 0 {
            return Err(ConfigError::Invalid(
                "limits.max_array_len must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_env(var: &'static str, value: String) -> Result<usize, ConfigError> {
    match value.trim().parse() {
        Ok(parsed) => Ok(parsed),
        Err(_) => Err(ConfigError::Env { var, value }),
    }
}
