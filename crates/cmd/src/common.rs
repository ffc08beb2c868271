// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use anyhow::{Context, Result, anyhow};
use buildfs::{FileStatus, FileSystem, FsConfig, HashFunction, Path};
use diagnostics::*;
use std::path::PathBuf;

/// Everything a command needs to open the filesystem it works on.
#[derive(Debug, Clone)]
pub struct FsContext {
    /// Host directory mounted as `/`
    pub root: PathBuf,
    /// Overrides `BUILDFS_DIGEST_FUNCTION` when set
    pub digest_function: Option<HashFunction>,
    /// Overrides `BUILDFS_MOUNT_TABLE` when set
    pub mount_table: Option<String>,
}

impl FsContext {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, digest_function: Option<HashFunction>) -> Self {
        Self {
            root: root.into(),
            digest_function,
            mount_table: None,
        }
    }

    #[must_use]
    pub fn with_mount_table<S: Into<String>>(mut self, mount_table: S) -> Self {
        self.mount_table = Some(mount_table.into());
        self
    }

    /// Environment settings with the command-line overrides applied.
    pub fn config(&self) -> Result<FsConfig> {
        let mut config = FsConfig::from_env().context("Invalid buildfs environment")?;
        if let Some(hash_function) = self.digest_function {
            config = config.with_hash_function(hash_function);
        }
        if let Some(mount_table) = &self.mount_table {
            if !mount_table.starts_with('/') {
                return Err(anyhow!("Mount table '{}' must be absolute", mount_table));
            }
            config = config.with_mount_table(mount_table.as_str());
        }
        Ok(config)
    }

    pub fn open_fs(&self) -> Result<FileSystem> {
        let config = self.config()?;
        debug!(
            "opening {root} with {digest}",
            root: self.root.display().to_string(),
            digest: config.hash_function.as_str(),
        );
        buildfs::local::new_fs(&self.root, config)
            .with_context(|| format!("Failed to open root {}", self.root.display()))
    }
}

/// Parses a command-line path argument. Relative arguments are taken
/// from the root.
pub fn parse_path(fs: &FileSystem, arg: &str) -> Result<Path> {
    if arg.starts_with('/') {
        fs.path(arg).with_context(|| format!("Invalid path '{}'", arg))
    } else {
        fs.path(&format!("/{arg}"))
            .with_context(|| format!("Invalid path '{}'", arg))
    }
}

/// One-word kind of a status, the way `stat` prints it. A status that
/// follows links reports the kind of what the link points at.
#[must_use]
pub fn kind_name(status: &FileStatus) -> &'static str {
    if status.is_special_file() {
        "special"
    } else if !status.follows_symlinks() && status.is_symbolic_link() {
        "symlink"
    } else if status.is_directory() {
        "directory"
    } else if status.is_file() {
        "file"
    } else {
        "unknown"
    }
}

/// Parses a mode such as `755` or `0o644`.
pub fn parse_mode(arg: &str) -> Result<u32> {
    let digits = arg.strip_prefix("0o").unwrap_or(arg);
    let mode = u32::from_str_radix(digits, 8)
        .with_context(|| format!("Invalid octal mode '{}'", arg))?;
    if mode > 0o7777 {
        return Err(anyhow!("Mode '{}' is out of range", arg));
    }
    Ok(mode)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mode() {
        assert_eq!(parse_mode("755").unwrap(), 0o755);
        assert_eq!(parse_mode("0o644").unwrap(), 0o644);
        assert_eq!(parse_mode("0").unwrap(), 0);
        assert!(parse_mode("9").is_err());
        assert!(parse_mode("rwx").is_err());
        assert!(parse_mode("17777").is_err());
    }

    #[test]
    fn test_relative_mount_table_rejected() {
        let ctx = FsContext::new("/", None).with_mount_table("proc/mounts");
        assert!(ctx.config().is_err());
    }
}
