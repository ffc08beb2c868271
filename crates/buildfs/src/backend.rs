// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Filesystem backend trait.
//!
//! A backend supplies the primitive operations; everything else
//! (canonicalization, stat snapshots, digests, readdir typing, chmod, hard
//! link preconditions) is built on top of them by [`crate::FileSystem`].
//!
//! Every primitive must be individually thread-safe. Primitives report a
//! missing path as [`Error::NotFound`] and any other OS-level failure as
//! [`Error::Io`].

use crate::digest::HashFunction;
use crate::error::{Error, Result};
use crate::path::{Path, PathFragment};
use std::io::{Read, Write};

/// Passed to `set_last_modified_time` to stamp the current time.
pub const MTIME_NOW: i64 = -1;

pub trait FilesystemBackend: Send + Sync {
    /// Whether `set_readable`, `set_writable` and `set_executable` work.
    /// Those mutators raise [`Error::Unsupported`] when this is false.
    fn supports_modifications(&self) -> bool;

    /// Whether `create_symbolic_link` works, and whether no-follow queries
    /// observe links rather than their targets.
    fn supports_symlinks_natively(&self) -> bool;

    /// Whether `create_fs_dependent_hard_link` works.
    fn supports_hard_links_natively(&self) -> bool;

    fn is_file_path_case_sensitive(&self) -> bool;

    /// Creates a directory. Returns false if a directory is already there.
    fn create_directory(&self, path: &Path) -> Result<bool>;

    fn file_size(&self, path: &Path, follow_symlinks: bool) -> Result<u64>;

    /// Deletes a file, symlink or empty directory. Returns false if nothing
    /// was there.
    fn delete(&self, path: &Path) -> Result<bool>;

    /// Milliseconds since the UNIX epoch.
    fn last_modified_time(&self, path: &Path, follow_symlinks: bool) -> Result<i64>;

    /// Follows symlinks. [`MTIME_NOW`] means the current time.
    fn set_last_modified_time(&self, path: &Path, millis: i64) -> Result<()>;

    /// Never follows the final link.
    fn is_symbolic_link(&self, path: &Path) -> bool;

    /// Regular file or special file.
    fn is_file(&self, path: &Path, follow_symlinks: bool) -> bool;

    fn is_directory(&self, path: &Path, follow_symlinks: bool) -> bool;

    /// Neither a regular file, nor a directory, nor a symlink.
    fn is_special_file(&self, path: &Path, follow_symlinks: bool) -> bool;

    fn exists(&self, path: &Path, follow_symlinks: bool) -> bool;

    fn create_symbolic_link(&self, link: &Path, target: &PathFragment) -> Result<()>;

    /// Returns [`Error::NotASymlink`] if `path` exists but is not a link.
    fn read_symbolic_link(&self, path: &Path) -> Result<PathFragment>;

    /// Names of the entries of a directory, without `.` and `..`.
    fn directory_entries(&self, path: &Path) -> Result<Vec<String>>;

    fn is_readable(&self, path: &Path) -> Result<bool>;

    fn set_readable(&self, path: &Path, readable: bool) -> Result<()>;

    fn is_writable(&self, path: &Path) -> Result<bool>;

    fn set_writable(&self, path: &Path, writable: bool) -> Result<()>;

    fn is_executable(&self, path: &Path) -> Result<bool>;

    fn set_executable(&self, path: &Path, executable: bool) -> Result<()>;

    fn input_stream(&self, path: &Path) -> Result<Box<dyn Read + Send>>;

    /// Opens for writing, creating the file if needed; truncates unless
    /// `append`.
    fn output_stream(&self, path: &Path, append: bool) -> Result<Box<dyn Write + Send>>;

    fn rename(&self, source: &Path, target: &Path) -> Result<()>;

    /// Backend-specific hard link creation, without precondition checks.
    fn create_fs_dependent_hard_link(&self, link: &Path, original: &Path) -> Result<()>;

    /// Extended attribute value, following symlinks. `None` when the
    /// attribute is absent or the backend has no extended attributes.
    fn xattr(&self, _path: &Path, _name: &str) -> Result<Option<Vec<u8>>> {
        Ok(None)
    }

    /// A digest that is cheaper than reading the whole file, if the backend
    /// has one. `None` means no fast path is available.
    fn fast_digest(&self, _path: &Path, _hash_function: HashFunction) -> Result<Option<Vec<u8>>> {
        Ok(None)
    }

    /// Reads a link the caller already knows to be a symlink.
    fn read_symbolic_link_unchecked(&self, path: &Path) -> Result<PathFragment> {
        self.read_symbolic_link(path)
    }

    /// One step of canonicalization. `path` has a canonical parent.
    ///
    /// Returns the link target if `path` is a symlink, `None` if it exists
    /// and is not a symlink, and [`Error::NotFound`] if it does not exist.
    /// Backends with a combined lstat may override this, keeping exactly
    /// these outcomes.
    fn resolve_one_link(&self, path: &Path) -> Result<Option<PathFragment>> {
        match self.read_symbolic_link(path) {
            Ok(target) => Ok(Some(target)),
            Err(Error::NotASymlink(_)) => {
                if self.exists(path, false) {
                    Ok(None)
                } else {
                    Err(Error::not_found(path))
                }
            }
            Err(e) => Err(e),
        }
    }
}
