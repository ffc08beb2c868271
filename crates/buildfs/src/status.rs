// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::backend::FilesystemBackend;
use crate::error::Result;
use crate::path::Path;
use std::sync::{Arc, OnceLock};

/// A point-in-time view of one file, for one `(path, follow_symlinks)`
/// pair.
///
/// Each attribute is fetched from the backend on first access and then
/// kept for the life of the snapshot; request a new one to see changes.
/// Cells publish once, so concurrent readers agree on every value even if
/// two of them race to compute it.
pub struct FileStatus {
    backend: Arc<dyn FilesystemBackend>,
    path: Path,
    follow_symlinks: bool,
    is_file: OnceLock<bool>,
    is_directory: OnceLock<bool>,
    is_symbolic_link: OnceLock<bool>,
    is_special_file: OnceLock<bool>,
    size: OnceLock<u64>,
    last_modified_time: OnceLock<i64>,
}

impl FileStatus {
    /// Fails fast: the modification time is fetched here, so a stat of a
    /// missing path errors immediately.
    pub(crate) fn new(
        backend: Arc<dyn FilesystemBackend>,
        path: Path,
        follow_symlinks: bool,
    ) -> Result<Self> {
        let status = FileStatus {
            backend,
            path,
            follow_symlinks,
            is_file: OnceLock::new(),
            is_directory: OnceLock::new(),
            is_symbolic_link: OnceLock::new(),
            is_special_file: OnceLock::new(),
            size: OnceLock::new(),
            last_modified_time: OnceLock::new(),
        };
        _ = status.last_modified_time()?;
        Ok(status)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn follows_symlinks(&self) -> bool {
        self.follow_symlinks
    }

    #[must_use]
    pub fn is_file(&self) -> bool {
        *self
            .is_file
            .get_or_init(|| self.backend.is_file(&self.path, self.follow_symlinks))
    }

    #[must_use]
    pub fn is_directory(&self) -> bool {
        *self
            .is_directory
            .get_or_init(|| self.backend.is_directory(&self.path, self.follow_symlinks))
    }

    /// Never follows symlinks, whatever the snapshot was built with.
    #[must_use]
    pub fn is_symbolic_link(&self) -> bool {
        *self
            .is_symbolic_link
            .get_or_init(|| self.backend.is_symbolic_link(&self.path))
    }

    #[must_use]
    pub fn is_special_file(&self) -> bool {
        *self
            .is_special_file
            .get_or_init(|| self.backend.is_special_file(&self.path, self.follow_symlinks))
    }

    pub fn size(&self) -> Result<u64> {
        if let Some(size) = self.size.get() {
            return Ok(*size);
        }
        let size = self.backend.file_size(&self.path, self.follow_symlinks)?;
        Ok(*self.size.get_or_init(|| size))
    }

    /// Milliseconds since the UNIX epoch.
    pub fn last_modified_time(&self) -> Result<i64> {
        if let Some(mtime) = self.last_modified_time.get() {
            return Ok(*mtime);
        }
        let mtime = self
            .backend
            .last_modified_time(&self.path, self.follow_symlinks)?;
        Ok(*self.last_modified_time.get_or_init(|| mtime))
    }
}

impl std::fmt::Debug for FileStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileStatus")
            .field("path", &self.path)
            .field("follow_symlinks", &self.follow_symlinks)
            .field("last_modified_time", &self.last_modified_time.get())
            .finish_non_exhaustive()
    }
}
