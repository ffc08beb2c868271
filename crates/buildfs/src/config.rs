// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Construction-time configuration for a [`crate::FileSystem`].
//!
//! The digest function is read once at startup (environment or YAML) and
//! passed to every `FileSystem` built from it. Tests construct their own
//! `FsConfig` instead of mutating shared state.

use crate::digest::HashFunction;
use serde::{Deserialize, Serialize};

/// Environment variable selecting the digest function (`MD5` or `SHA1`).
pub const DIGEST_FUNCTION_ENV: &str = "BUILDFS_DIGEST_FUNCTION";

/// Environment variable overriding the mount table location.
pub const MOUNT_TABLE_ENV: &str = "BUILDFS_MOUNT_TABLE";

pub const DEFAULT_MOUNT_TABLE: &str = "/proc/mounts";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid digest function: {0}")]
    DigestFunction(String),

    #[error("invalid mount table path '{0}' (must be absolute)")]
    MountTable(String),

    #[error("invalid configuration: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FsConfig {
    /// Digest function for `digest`, `fast_digest` and `is_valid_digest`
    #[serde(default = "default_hash_function")]
    pub hash_function: HashFunction,

    /// Absolute path, inside the filesystem, of the mount table consulted
    /// by `file_system_type`
    #[serde(default = "default_mount_table")]
    pub mount_table: String,
}

fn default_hash_function() -> HashFunction {
    HashFunction::Md5
}

fn default_mount_table() -> String {
    DEFAULT_MOUNT_TABLE.to_string()
}

impl Default for FsConfig {
    fn default() -> Self {
        Self {
            hash_function: default_hash_function(),
            mount_table: default_mount_table(),
        }
    }
}

impl FsConfig {
    /// Reads the process environment. Call once at startup.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_values(
            std::env::var(DIGEST_FUNCTION_ENV).ok().as_deref(),
            std::env::var(MOUNT_TABLE_ENV).ok().as_deref(),
        )
    }

    /// Builds a config from optional raw setting values; unset values take
    /// their defaults and unrecognized values are rejected here.
    pub fn from_values(
        digest_function: Option<&str>,
        mount_table: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(value) = digest_function {
            config.hash_function = value.parse().map_err(ConfigError::DigestFunction)?;
        }
        if let Some(value) = mount_table {
            config.mount_table = value.to_string();
        }
        config.validate()
    }

    pub fn from_yaml_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml_ng::from_slice(bytes)?;
        config.validate()
    }

    pub fn to_yaml_bytes(&self) -> Result<Vec<u8>, ConfigError> {
        Ok(serde_yaml_ng::to_string(self)?.into_bytes())
    }

    #[must_use]
    pub fn with_hash_function(mut self, hash_function: HashFunction) -> Self {
        self.hash_function = hash_function;
        self
    }

    #[must_use]
    pub fn with_mount_table<S: Into<String>>(mut self, mount_table: S) -> Self {
        self.mount_table = mount_table.into();
        self
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if !self.mount_table.starts_with('/') {
            return Err(ConfigError::MountTable(self.mount_table));
        }
        Ok(self)
    }
}
