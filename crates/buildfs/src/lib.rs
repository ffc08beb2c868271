// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! A virtual filesystem layer for build tools.
//!
//! A [`FileSystem`] gives one UNIX-shaped view of files over any
//! [`FilesystemBackend`]. Backends implement a small set of primitives;
//! symlink canonicalization, lazy stat snapshots, content digests, typed
//! directory listings and the other algorithms are implemented once, on
//! top of those primitives.

mod backend;
mod config;
mod digest;
mod dirent;
mod error;
mod fs;
mod intern;
mod mount;
mod path;
mod status;

pub mod memory;
#[cfg(unix)]
pub mod local;
pub mod testing;

pub use backend::{FilesystemBackend, MTIME_NOW};
pub use config::{ConfigError, DEFAULT_MOUNT_TABLE, DIGEST_FUNCTION_ENV, FsConfig, MOUNT_TABLE_ENV};
pub use digest::HashFunction;
pub use dirent::{Dirent, DirentType};
pub use error::{Error, Result};
pub use fs::{FileSystem, MAX_SYMLINK_HOPS};
pub use mount::{MountEntry, UNKNOWN_FILE_SYSTEM, best_match, decode_latin1, parse_mount_table};
pub use path::{Path, PathFragment};
pub use status::FileStatus;

#[cfg(test)]
mod tests;
