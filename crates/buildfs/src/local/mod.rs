// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Local disk backend.
//!
//! Maps a host directory onto the filesystem root `/`. Every primitive is a
//! direct `std::fs` call on the mapped host path. Absolute symlink targets
//! are rebased under the host root when written and stripped of it when
//! read, so links stay inside the mount.
//!
//! Only the owner permission bits are read and written. Extended
//! attributes and fast digests are not available.

#[cfg(test)]
mod tests;

use crate::backend::{FilesystemBackend, MTIME_NOW};
use crate::config::FsConfig;
use crate::error::{Error, Result};
use crate::fs::FileSystem;
use crate::path::{Path, PathFragment};
use filetime::FileTime;
use std::fs::{self, Metadata, OpenOptions};
use std::io::{self, Read, Write};
use std::os::unix::fs::{FileTypeExt, PermissionsExt};
use std::path::PathBuf;
use std::sync::Arc;

/// Host filesystem backend rooted at a host directory.
pub struct LocalBackend {
    root: PathBuf,
}

/// Creates a filesystem over the host directory `root`.
///
/// # Errors
///
/// Returns an error if `root` does not exist or is not a directory.
pub fn new_fs(root: impl Into<PathBuf>, config: FsConfig) -> Result<FileSystem> {
    let backend = LocalBackend::new(root)?;
    Ok(FileSystem::new(Arc::new(backend), config))
}

fn is_special(meta: &Metadata) -> bool {
    let ft = meta.file_type();
    ft.is_fifo() || ft.is_socket() || ft.is_block_device() || ft.is_char_device()
}

fn to_millis(time: FileTime) -> i64 {
    time.unix_seconds() * 1000 + i64::from(time.nanoseconds() / 1_000_000)
}

fn from_millis(millis: i64) -> FileTime {
    let nanos = u32::try_from(millis.rem_euclid(1000) * 1_000_000).unwrap_or(0);
    FileTime::from_unix_time(millis.div_euclid(1000), nanos)
}

impl LocalBackend {
    /// The directory must exist and be a directory.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let canonical = root.canonicalize().map_err(|e| {
            Error::io(
                &Path::root(),
                io::Error::new(e.kind(), format!("{}: {e}", root.display())),
            )
        })?;
        if !canonical.is_dir() {
            return Err(Error::io(
                &Path::root(),
                io::Error::new(
                    io::ErrorKind::NotADirectory,
                    format!("{} is not a directory", canonical.display()),
                ),
            ));
        }
        Ok(Self { root: canonical })
    }

    #[must_use]
    pub fn host_root(&self) -> &std::path::Path {
        &self.root
    }

    /// The host path for `path`.
    #[must_use]
    pub fn host_path(&self, path: &Path) -> PathBuf {
        if path.is_root() {
            self.root.clone()
        } else {
            self.root.join(path.strip_root())
        }
    }

    fn metadata(&self, path: &Path, follow_symlinks: bool) -> Result<Metadata> {
        let host = self.host_path(path);
        let meta = if follow_symlinks {
            fs::metadata(host)
        } else {
            fs::symlink_metadata(host)
        };
        meta.map_err(|e| Error::from_io(path, e))
    }

    fn has_mode(&self, path: &Path, bit: u32) -> Result<bool> {
        Ok(self.metadata(path, true)?.permissions().mode() & bit != 0)
    }

    fn set_mode(&self, path: &Path, bit: u32, on: bool) -> Result<()> {
        let mut permissions = self.metadata(path, true)?.permissions();
        let mode = permissions.mode();
        permissions.set_mode(if on { mode | bit } else { mode & !bit });
        fs::set_permissions(self.host_path(path), permissions).map_err(|e| Error::from_io(path, e))
    }

    fn host_link_target(&self, target: &PathFragment) -> PathBuf {
        if target.is_absolute() {
            self.host_path(&Path::root().relative(target))
        } else {
            PathBuf::from(target.to_string())
        }
    }

    fn fragment_from_host(&self, path: &Path, host_target: PathBuf) -> Result<PathFragment> {
        let target = match host_target.strip_prefix(&self.root) {
            Ok(inside) => PathBuf::from("/").join(inside),
            Err(_) => host_target,
        };
        target
            .to_str()
            .map(PathFragment::new)
            .ok_or_else(|| Error::io(path, io::Error::from(io::ErrorKind::InvalidData)))
    }

    fn read_link(&self, path: &Path) -> Result<PathFragment> {
        match fs::read_link(self.host_path(path)) {
            Ok(target) => self.fragment_from_host(path, target),
            Err(e) if e.kind() == io::ErrorKind::InvalidInput => Err(Error::not_a_symlink(path)),
            Err(e) => Err(Error::from_io(path, e)),
        }
    }
}

impl FilesystemBackend for LocalBackend {
    fn supports_modifications(&self) -> bool {
        true
    }

    fn supports_symlinks_natively(&self) -> bool {
        true
    }

    fn supports_hard_links_natively(&self) -> bool {
        true
    }

    fn is_file_path_case_sensitive(&self) -> bool {
        true
    }

    fn create_directory(&self, path: &Path) -> Result<bool> {
        match fs::create_dir(self.host_path(path)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                if self.metadata(path, false)?.is_dir() {
                    Ok(false)
                } else {
                    Err(Error::already_exists(path))
                }
            }
            Err(e) => Err(Error::from_io(path, e)),
        }
    }

    fn file_size(&self, path: &Path, follow_symlinks: bool) -> Result<u64> {
        Ok(self.metadata(path, follow_symlinks)?.len())
    }

    fn delete(&self, path: &Path) -> Result<bool> {
        let meta = match self.metadata(path, false) {
            Ok(meta) => meta,
            Err(Error::NotFound(_)) => return Ok(false),
            Err(e) => return Err(e),
        };
        let host = self.host_path(path);
        let removed = if meta.is_dir() {
            fs::remove_dir(host)
        } else {
            fs::remove_file(host)
        };
        match removed {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(Error::from_io(path, e)),
        }
    }

    fn last_modified_time(&self, path: &Path, follow_symlinks: bool) -> Result<i64> {
        let meta = self.metadata(path, follow_symlinks)?;
        Ok(to_millis(FileTime::from_last_modification_time(&meta)))
    }

    fn set_last_modified_time(&self, path: &Path, millis: i64) -> Result<()> {
        let time = if millis == MTIME_NOW {
            FileTime::now()
        } else {
            from_millis(millis)
        };
        filetime::set_file_mtime(self.host_path(path), time).map_err(|e| Error::from_io(path, e))
    }

    fn is_symbolic_link(&self, path: &Path) -> bool {
        self.metadata(path, false)
            .is_ok_and(|meta| meta.file_type().is_symlink())
    }

    fn is_file(&self, path: &Path, follow_symlinks: bool) -> bool {
        self.metadata(path, follow_symlinks)
            .is_ok_and(|meta| meta.is_file() || is_special(&meta))
    }

    fn is_directory(&self, path: &Path, follow_symlinks: bool) -> bool {
        self.metadata(path, follow_symlinks)
            .is_ok_and(|meta| meta.is_dir())
    }

    fn is_special_file(&self, path: &Path, follow_symlinks: bool) -> bool {
        self.metadata(path, follow_symlinks)
            .is_ok_and(|meta| is_special(&meta))
    }

    fn exists(&self, path: &Path, follow_symlinks: bool) -> bool {
        self.metadata(path, follow_symlinks).is_ok()
    }

    fn create_symbolic_link(&self, link: &Path, target: &PathFragment) -> Result<()> {
        std::os::unix::fs::symlink(self.host_link_target(target), self.host_path(link))
            .map_err(|e| Error::from_io(link, e))
    }

    fn read_symbolic_link(&self, path: &Path) -> Result<PathFragment> {
        self.read_link(path)
    }

    fn directory_entries(&self, path: &Path) -> Result<Vec<String>> {
        let entries = fs::read_dir(self.host_path(path)).map_err(|e| match e.kind() {
            io::ErrorKind::NotADirectory => Error::io(path, e),
            _ => Error::from_io(path, e),
        })?;
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| Error::from_io(path, e))?;
            let name = entry
                .file_name()
                .into_string()
                .map_err(|_| Error::io(path, io::Error::from(io::ErrorKind::InvalidData)))?;
            names.push(name);
        }
        Ok(names)
    }

    fn is_readable(&self, path: &Path) -> Result<bool> {
        self.has_mode(path, 0o400)
    }

    fn set_readable(&self, path: &Path, readable: bool) -> Result<()> {
        self.set_mode(path, 0o400, readable)
    }

    fn is_writable(&self, path: &Path) -> Result<bool> {
        self.has_mode(path, 0o200)
    }

    fn set_writable(&self, path: &Path, writable: bool) -> Result<()> {
        self.set_mode(path, 0o200, writable)
    }

    fn is_executable(&self, path: &Path) -> Result<bool> {
        self.has_mode(path, 0o100)
    }

    fn set_executable(&self, path: &Path, executable: bool) -> Result<()> {
        self.set_mode(path, 0o100, executable)
    }

    fn input_stream(&self, path: &Path) -> Result<Box<dyn Read + Send>> {
        if self.metadata(path, true)?.is_dir() {
            return Err(Error::io(path, io::Error::from(io::ErrorKind::IsADirectory)));
        }
        let file = fs::File::open(self.host_path(path)).map_err(|e| Error::from_io(path, e))?;
        Ok(Box::new(file))
    }

    fn output_stream(&self, path: &Path, append: bool) -> Result<Box<dyn Write + Send>> {
        let mut options = OpenOptions::new();
        _ = options.create(true);
        if append {
            _ = options.append(true);
        } else {
            _ = options.write(true).truncate(true);
        }
        let file = options
            .open(self.host_path(path))
            .map_err(|e| Error::from_io(path, e))?;
        Ok(Box::new(file))
    }

    fn rename(&self, source: &Path, target: &Path) -> Result<()> {
        fs::rename(self.host_path(source), self.host_path(target))
            .map_err(|e| Error::from_io(source, e))
    }

    fn create_fs_dependent_hard_link(&self, link: &Path, original: &Path) -> Result<()> {
        fs::hard_link(self.host_path(original), self.host_path(link))
            .map_err(|e| Error::from_io(link, e))
    }

    /// A single lstat, then readlink only for actual links.
    fn resolve_one_link(&self, path: &Path) -> Result<Option<PathFragment>> {
        if self.metadata(path, false)?.file_type().is_symlink() {
            self.read_link(path).map(Some)
        } else {
            Ok(None)
        }
    }
}
