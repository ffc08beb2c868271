// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::io::{Read, Write};
use std::sync::Arc;

use diagnostics::*;

use crate::backend::FilesystemBackend;
use crate::config::FsConfig;
use crate::digest::HashFunction;
use crate::dirent::{Dirent, DirentType};
use crate::error::{Error, Result};
use crate::intern::ChildInterner;
use crate::mount::{self, UNKNOWN_FILE_SYSTEM};
use crate::path::{Path, PathFragment, is_plain_segment};
use crate::status::FileStatus;

/// Maximum depth of nested symlink expansions below one path segment.
pub const MAX_SYMLINK_HOPS: u32 = 32;

/// A filesystem: one backend plus the algorithms layered over its
/// primitives. Cheap to clone; clones share the backend.
#[derive(Clone)]
pub struct FileSystem {
    backend: Arc<dyn FilesystemBackend>,
    root: Path,
    config: FsConfig,
    children: Arc<ChildInterner>,
}

impl FileSystem {
    pub fn new(backend: Arc<dyn FilesystemBackend>, config: FsConfig) -> Self {
        Self {
            backend,
            root: Path::root(),
            config,
            children: Arc::new(ChildInterner::default()),
        }
    }

    /// Builds a filesystem with the default configuration.
    pub fn with_backend<B: FilesystemBackend + 'static>(backend: B) -> Self {
        Self::new(Arc::new(backend), FsConfig::default())
    }

    #[must_use]
    pub fn backend(&self) -> &Arc<dyn FilesystemBackend> {
        &self.backend
    }

    #[must_use]
    pub fn config(&self) -> &FsConfig {
        &self.config
    }

    #[must_use]
    pub fn hash_function(&self) -> HashFunction {
        self.config.hash_function
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Parses an absolute path name.
    pub fn path(&self, name: &str) -> Result<Path> {
        Path::parse(name)
    }

    /// `parent/name`, shared with earlier requests for the same child.
    /// Fails with [`Error::InvalidSegment`] unless `name` is a single plain
    /// segment.
    pub fn child(&self, parent: &Path, name: &str) -> Result<Path> {
        if !is_plain_segment(name) {
            return Err(Error::invalid_segment(name));
        }
        Ok(self.children.child(parent, name))
    }

    #[cfg(test)]
    pub(crate) fn interner(&self) -> &ChildInterner {
        &self.children
    }

    pub fn supports_modifications(&self) -> bool {
        self.backend.supports_modifications()
    }

    pub fn supports_symlinks_natively(&self) -> bool {
        self.backend.supports_symlinks_natively()
    }

    pub fn supports_hard_links_natively(&self) -> bool {
        self.backend.supports_hard_links_natively()
    }

    pub fn is_file_path_case_sensitive(&self) -> bool {
        self.backend.is_file_path_case_sensitive()
    }

    /// Returns the canonical form of `path`: the same file, named without
    /// any symbolic link along the way.
    ///
    /// Fails with [`Error::NotFound`] if any prefix does not exist and with
    /// [`Error::TooManyLinks`] if a single segment needs more than
    /// [`MAX_SYMLINK_HOPS`] nested expansions. Nothing is cached between
    /// calls.
    pub fn resolve_symbolic_links(&self, path: &Path) -> Result<Path> {
        let mut dir = Path::root();
        for segment in path.segments() {
            dir = self.append_segment(&dir, segment, MAX_SYMLINK_HOPS)?;
        }
        Ok(dir)
    }

    /// Appends `child` to the canonical `dir`, expanding it if it is a
    /// link. Each segment of a link target is appended with the budget
    /// left after that link, so only nesting depth counts against it.
    fn append_segment(&self, dir: &Path, child: &str, budget: u32) -> Result<Path> {
        let naive = dir.child(child);
        let Some(target) = self.backend.resolve_one_link(&naive)? else {
            return Ok(naive);
        };

        if budget == 0 {
            debug!("symlink budget exhausted at {path}", path: naive.as_str());
            return Err(Error::too_many_links(&naive));
        }
        let budget = budget - 1;

        let mut current = if target.is_absolute() {
            Path::root()
        } else {
            dir.clone()
        };
        for segment in target.segments() {
            match segment.as_str() {
                "" | "." => {}
                ".." => current = current.parent().unwrap_or_else(Path::root),
                name => current = self.append_segment(&current, name, budget)?,
            }
        }
        Ok(current)
    }

    pub fn stat(&self, path: &Path, follow_symlinks: bool) -> Result<FileStatus> {
        FileStatus::new(self.backend.clone(), path.clone(), follow_symlinks)
    }

    /// Like [`FileSystem::stat`], but any failure yields `None`.
    pub fn stat_nullable(&self, path: &Path, follow_symlinks: bool) -> Option<FileStatus> {
        self.stat(path, follow_symlinks).ok()
    }

    /// Like [`FileSystem::stat`], but a missing path yields `None`. Other
    /// failures are returned.
    pub fn stat_if_found(&self, path: &Path, follow_symlinks: bool) -> Result<Option<FileStatus>> {
        match self.stat(path, follow_symlinks) {
            Ok(status) => Ok(Some(status)),
            Err(Error::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    #[must_use]
    pub fn is_valid_digest(&self, digest: &[u8]) -> bool {
        self.config.hash_function.is_valid_digest(digest)
    }

    /// Reads the whole file through `hash_function`.
    pub fn digest_with(&self, path: &Path, hash_function: HashFunction) -> Result<Vec<u8>> {
        let reader = self.backend.input_stream(path)?;
        hash_function
            .digest_reader(reader)
            .map_err(|e| Error::from_io(path, e))
    }

    pub fn digest(&self, path: &Path) -> Result<Vec<u8>> {
        self.digest_with(path, self.config.hash_function)
    }

    /// The backend's cheap digest for the configured function, if any.
    pub fn fast_digest(&self, path: &Path) -> Result<Option<Vec<u8>>> {
        self.backend.fast_digest(path, self.config.hash_function)
    }

    /// The fast digest when the backend has one, the streamed digest
    /// otherwise.
    pub fn content_digest(&self, path: &Path) -> Result<Vec<u8>> {
        if let Some(digest) = self.fast_digest(path)? {
            return Ok(digest);
        }
        debug!("no fast digest for {path}, reading contents", path: path.as_str());
        self.digest(path)
    }

    /// Lists a directory with the kind of each entry.
    ///
    /// Links are always followed to find the directory itself;
    /// `follow_symlinks` only controls how entries are typed. Entries that
    /// cannot be stat'ed are reported as [`DirentType::Unknown`].
    pub fn readdir(&self, path: &Path, follow_symlinks: bool) -> Result<Vec<Dirent>> {
        let dir = self.resolve_symbolic_links(path)?;
        let names = self.backend.directory_entries(&dir)?;
        Ok(names
            .into_iter()
            .map(|name| {
                let child = self.children.child(&dir, &name);
                let status = self.stat_nullable(&child, follow_symlinks);
                Dirent::new(name, DirentType::from_status(status.as_ref()))
            })
            .collect())
    }

    /// Entry paths of a directory, unresolved and untyped.
    pub fn directory_entries(&self, path: &Path) -> Result<Vec<Path>> {
        Ok(self
            .backend
            .directory_entries(path)?
            .iter()
            .map(|name| self.children.child(path, name))
            .collect())
    }

    /// Applies the owner bits of `mode`. Group and other bits are ignored.
    /// All three setters run; the first failure is returned.
    pub fn chmod(&self, path: &Path, mode: u32) -> Result<()> {
        let results = [
            self.set_readable(path, mode & 0o400 != 0),
            self.set_writable(path, mode & 0o200 != 0),
            self.set_executable(path, mode & 0o100 != 0),
        ];
        results.into_iter().collect()
    }

    /// Creates `link` as a hard link to `original`.
    ///
    /// `original` must exist and `link` must not, where a dangling symlink
    /// at `link` counts as existing. The checks and the creation are not
    /// atomic.
    pub fn create_hard_link(&self, link: &Path, original: &Path) -> Result<()> {
        if !self.backend.supports_hard_links_natively() {
            return Err(Error::unsupported("create_hard_link", link));
        }
        if !self.backend.exists(original, true) {
            return Err(Error::not_found(original));
        }
        if self.backend.exists(link, false) {
            return Err(Error::already_exists(link));
        }
        self.backend.create_fs_dependent_hard_link(link, original)
    }

    /// Best guess of the type of the filesystem holding `path`, from the
    /// configured mount table. `"unknown"` when anything goes wrong.
    #[must_use]
    pub fn file_system_type(&self, path: &Path) -> String {
        match self.probe_file_system_type(path) {
            Ok(Some(fs_type)) => fs_type,
            Ok(None) => UNKNOWN_FILE_SYSTEM.to_string(),
            Err(e) => {
                debug!(
                    "file system type of {path} unavailable: {error}",
                    path: path.as_str(),
                    error: e.to_string()
                );
                UNKNOWN_FILE_SYSTEM.to_string()
            }
        }
    }

    fn probe_file_system_type(&self, path: &Path) -> Result<Option<String>> {
        let canonical = self.resolve_symbolic_links(path)?;
        let table_path = Path::parse(&self.config.mount_table)?;
        let table = mount::decode_latin1(&self.read_to_vec(&table_path)?);
        let entries = mount::parse_mount_table(&table);
        Ok(mount::best_match(&entries, &canonical).map(|entry| entry.fs_type.clone()))
    }

    pub fn exists(&self, path: &Path, follow_symlinks: bool) -> bool {
        self.backend.exists(path, follow_symlinks)
    }

    pub fn is_file(&self, path: &Path, follow_symlinks: bool) -> bool {
        self.backend.is_file(path, follow_symlinks)
    }

    pub fn is_directory(&self, path: &Path, follow_symlinks: bool) -> bool {
        self.backend.is_directory(path, follow_symlinks)
    }

    pub fn is_special_file(&self, path: &Path, follow_symlinks: bool) -> bool {
        self.backend.is_special_file(path, follow_symlinks)
    }

    pub fn is_symbolic_link(&self, path: &Path) -> bool {
        self.backend.is_symbolic_link(path)
    }

    pub fn create_directory(&self, path: &Path) -> Result<bool> {
        self.backend.create_directory(path)
    }

    pub fn delete(&self, path: &Path) -> Result<bool> {
        self.backend.delete(path)
    }

    pub fn rename(&self, source: &Path, target: &Path) -> Result<()> {
        self.backend.rename(source, target)
    }

    pub fn file_size(&self, path: &Path, follow_symlinks: bool) -> Result<u64> {
        self.backend.file_size(path, follow_symlinks)
    }

    pub fn last_modified_time(&self, path: &Path, follow_symlinks: bool) -> Result<i64> {
        self.backend.last_modified_time(path, follow_symlinks)
    }

    pub fn set_last_modified_time(&self, path: &Path, millis: i64) -> Result<()> {
        self.backend.set_last_modified_time(path, millis)
    }

    pub fn create_symbolic_link(&self, link: &Path, target: &PathFragment) -> Result<()> {
        if !self.backend.supports_symlinks_natively() {
            return Err(Error::unsupported("create_symbolic_link", link));
        }
        self.backend.create_symbolic_link(link, target)
    }

    pub fn read_symbolic_link(&self, path: &Path) -> Result<PathFragment> {
        self.backend.read_symbolic_link(path)
    }

    /// For callers that already know `path` is a link.
    pub fn read_symbolic_link_unchecked(&self, path: &Path) -> Result<PathFragment> {
        self.backend.read_symbolic_link_unchecked(path)
    }

    pub fn is_readable(&self, path: &Path) -> Result<bool> {
        self.backend.is_readable(path)
    }

    pub fn is_writable(&self, path: &Path) -> Result<bool> {
        self.backend.is_writable(path)
    }

    pub fn is_executable(&self, path: &Path) -> Result<bool> {
        self.backend.is_executable(path)
    }

    pub fn set_readable(&self, path: &Path, readable: bool) -> Result<()> {
        self.check_modifiable("set_readable", path)?;
        self.backend.set_readable(path, readable)
    }

    pub fn set_writable(&self, path: &Path, writable: bool) -> Result<()> {
        self.check_modifiable("set_writable", path)?;
        self.backend.set_writable(path, writable)
    }

    pub fn set_executable(&self, path: &Path, executable: bool) -> Result<()> {
        self.check_modifiable("set_executable", path)?;
        self.backend.set_executable(path, executable)
    }

    fn check_modifiable(&self, operation: &'static str, path: &Path) -> Result<()> {
        if self.backend.supports_modifications() {
            Ok(())
        } else {
            Err(Error::unsupported(operation, path))
        }
    }

    pub fn input_stream(&self, path: &Path) -> Result<Box<dyn Read + Send>> {
        self.backend.input_stream(path)
    }

    /// Opens for writing, truncating any existing content.
    pub fn output_stream(&self, path: &Path) -> Result<Box<dyn Write + Send>> {
        self.backend.output_stream(path, false)
    }

    pub fn append_stream(&self, path: &Path) -> Result<Box<dyn Write + Send>> {
        self.backend.output_stream(path, true)
    }

    pub fn read_to_vec(&self, path: &Path) -> Result<Vec<u8>> {
        let mut reader = self.backend.input_stream(path)?;
        let mut buf = Vec::new();
        _ = reader
            .read_to_end(&mut buf)
            .map_err(|e| Error::from_io(path, e))?;
        Ok(buf)
    }

    /// Replaces the content of `path` with `data`.
    pub fn write_all(&self, path: &Path, data: &[u8]) -> Result<()> {
        let mut writer = self.output_stream(path)?;
        writer
            .write_all(data)
            .and_then(|()| writer.flush())
            .map_err(|e| Error::from_io(path, e))
    }

    pub fn xattr(&self, path: &Path, name: &str) -> Result<Option<Vec<u8>>> {
        self.backend.xattr(path, name)
    }
}

impl std::fmt::Debug for FileSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSystem")
            .field("root", &self.root)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
