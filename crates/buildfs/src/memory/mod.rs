// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! In-memory backend.
//!
//! An inode tree held entirely in memory: directories are `BTreeMap`s
//! behind an `RwLock`, file content is a `Vec<u8>`, and hard links share
//! one inode. Supports every capability, including special files (see
//! [`MemoryBackend::create_special_file`]) and extended attributes.
//!
//! Permission bits are the owner bits only. Reading requires the owner read
//! bit and writing the owner write bit; directory permissions are not
//! enforced.

mod file;
mod node;

use crate::backend::{FilesystemBackend, MTIME_NOW};
use crate::error::{Error, Result};
use crate::fs::{FileSystem, MAX_SYMLINK_HOPS};
use crate::path::{Path, PathFragment};
use file::MemoryWriter;
use node::{Inode, Kind, OWNER_EXECUTE, OWNER_READ, OWNER_WRITE};
use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::sync::Arc;

pub struct MemoryBackend {
    root: Arc<Inode>,
}

/// A filesystem over a fresh, empty in-memory backend.
#[must_use]
pub fn new_fs() -> FileSystem {
    FileSystem::with_backend(MemoryBackend::new())
}

fn io_error(path: &Path, kind: io::ErrorKind) -> Error {
    Error::io(path, io::Error::from(kind))
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: Inode::new_directory(),
        }
    }

    /// Creates a node that is neither a file, a directory nor a symlink,
    /// like a FIFO or a device.
    pub fn create_special_file(&self, path: &Path) -> Result<()> {
        self.insert_new(path, Inode::new_special())
    }

    /// Sets an extended attribute, following symlinks.
    pub fn set_xattr(&self, path: &Path, name: &str, value: &[u8]) -> Result<()> {
        let inode = self.lookup(path, true)?;
        _ = inode.meta().xattrs.insert(name.to_string(), value.to_vec());
        Ok(())
    }

    /// Walks `path` from the root. Intermediate links are always followed;
    /// the final one only if `follow_final`. Returns the inode.
    fn lookup(&self, path: &Path, follow_final: bool) -> Result<Arc<Inode>> {
        self.walk(path, follow_final).map(|(_, inode)| inode)
    }

    /// Like `lookup`, also returning the canonical path of the inode.
    fn walk(&self, path: &Path, follow_final: bool) -> Result<(Path, Arc<Inode>)> {
        let mut budget = MAX_SYMLINK_HOPS;
        let mut pending: VecDeque<String> = path.segments().map(str::to_string).collect();
        let mut stack: Vec<(Path, Arc<Inode>)> = vec![(Path::root(), self.root.clone())];

        while let Some(segment) = pending.pop_front() {
            match segment.as_str() {
                "" | "." => continue,
                ".." => {
                    if stack.len() > 1 {
                        _ = stack.pop();
                    }
                    continue;
                }
                _ => {}
            }
            let Some((dir_path, dir)) = stack.last() else {
                return Err(Error::not_found(path));
            };
            let child = dir
                .lookup(&segment)
                .ok_or_else(|| Error::not_found(path))?;

            if let Kind::Symlink(target) = &child.kind {
                if follow_final || !pending.is_empty() {
                    if budget == 0 {
                        return Err(Error::too_many_links(path));
                    }
                    budget -= 1;
                    if target.is_absolute() {
                        stack.truncate(1);
                    }
                    for seg in target.segments().iter().rev() {
                        pending.push_front(seg.clone());
                    }
                    continue;
                }
            }
            let child_path = dir_path.child(&segment);
            stack.push((child_path, child));
        }

        stack.pop().ok_or_else(|| Error::not_found(path))
    }

    /// The directory that will hold a new entry at `path`, and the entry's
    /// name. A dangling symlink at `path` redirects to its target.
    fn creation_site(&self, path: &Path) -> Result<(Arc<Inode>, String)> {
        let mut path = path.clone();
        for _ in 0..=MAX_SYMLINK_HOPS {
            let Some(parent) = path.parent() else {
                return Err(io_error(&path, io::ErrorKind::IsADirectory));
            };
            let (parent_path, dir) = self.walk(&parent, true)?;
            if !dir.is_directory() {
                return Err(Error::not_found(&path));
            }
            let name = path.base_name().to_string();
            match dir.lookup(&name).map(|existing| match &existing.kind {
                Kind::Symlink(target) => Some(target.clone()),
                _ => None,
            }) {
                Some(Some(target)) => path = parent_path.relative(&target),
                _ => return Ok((dir, name)),
            }
        }
        Err(Error::too_many_links(&path))
    }

    /// Adds a new entry under its parent. The name must be free.
    fn insert_new(&self, path: &Path, inode: Arc<Inode>) -> Result<()> {
        let parent = path.parent().ok_or_else(|| Error::already_exists(path))?;
        let dir = self.lookup(&parent, true)?;
        let mut entries = dir.entries_mut().ok_or_else(|| Error::not_found(path))?;
        if entries.contains_key(path.base_name()) {
            return Err(Error::already_exists(path));
        }
        _ = entries.insert(path.base_name().to_string(), inode);
        drop(entries);
        dir.touch();
        Ok(())
    }

    fn detach(&self, path: &Path) -> Result<(Arc<Inode>, Arc<Inode>)> {
        let parent = path
            .parent()
            .ok_or_else(|| io_error(path, io::ErrorKind::PermissionDenied))?;
        let dir = self.lookup(&parent, true)?;
        let mut entries = dir.entries_mut().ok_or_else(|| Error::not_found(path))?;
        let inode = entries
            .remove(path.base_name())
            .ok_or_else(|| Error::not_found(path))?;
        drop(entries);
        dir.touch();
        Ok((dir, inode))
    }
}

impl FilesystemBackend for MemoryBackend {
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
        if path.is_root() {
            return Ok(false);
        }
        let parent = path.parent().unwrap_or_else(Path::root);
        let dir = self.lookup(&parent, true)?;
        let mut entries = dir.entries_mut().ok_or_else(|| Error::not_found(path))?;
        if let Some(existing) = entries.get(path.base_name()) {
            return if existing.is_directory() {
                Ok(false)
            } else {
                Err(Error::already_exists(path))
            };
        }
        _ = entries.insert(path.base_name().to_string(), Inode::new_directory());
        drop(entries);
        dir.touch();
        Ok(true)
    }

    fn file_size(&self, path: &Path, follow_symlinks: bool) -> Result<u64> {
        Ok(self.lookup(path, follow_symlinks)?.size())
    }

    fn delete(&self, path: &Path) -> Result<bool> {
        let Some(parent) = path.parent() else {
            return Err(io_error(path, io::ErrorKind::PermissionDenied));
        };
        let dir = match self.lookup(&parent, true) {
            Ok(dir) => dir,
            Err(Error::NotFound(_)) => return Ok(false),
            Err(e) => return Err(e),
        };
        let Some(mut entries) = dir.entries_mut() else {
            return Ok(false);
        };
        let Some(existing) = entries.get(path.base_name()) else {
            return Ok(false);
        };
        if existing.entries().is_some_and(|children| !children.is_empty()) {
            return Err(io_error(path, io::ErrorKind::DirectoryNotEmpty));
        }
        _ = entries.remove(path.base_name());
        drop(entries);
        dir.touch();
        Ok(true)
    }

    fn last_modified_time(&self, path: &Path, follow_symlinks: bool) -> Result<i64> {
        Ok(self.lookup(path, follow_symlinks)?.meta().mtime)
    }

    fn set_last_modified_time(&self, path: &Path, millis: i64) -> Result<()> {
        let inode = self.lookup(path, true)?;
        if millis == MTIME_NOW {
            inode.touch();
        } else {
            inode.meta().mtime = millis;
        }
        Ok(())
    }

    fn is_symbolic_link(&self, path: &Path) -> bool {
        self.lookup(path, false)
            .is_ok_and(|inode| matches!(inode.kind, Kind::Symlink(_)))
    }

    fn is_file(&self, path: &Path, follow_symlinks: bool) -> bool {
        self.lookup(path, follow_symlinks)
            .is_ok_and(|inode| matches!(inode.kind, Kind::File(_) | Kind::Special))
    }

    fn is_directory(&self, path: &Path, follow_symlinks: bool) -> bool {
        self.lookup(path, follow_symlinks)
            .is_ok_and(|inode| inode.is_directory())
    }

    fn is_special_file(&self, path: &Path, follow_symlinks: bool) -> bool {
        self.lookup(path, follow_symlinks)
            .is_ok_and(|inode| matches!(inode.kind, Kind::Special))
    }

    fn exists(&self, path: &Path, follow_symlinks: bool) -> bool {
        self.lookup(path, follow_symlinks).is_ok()
    }

    fn create_symbolic_link(&self, link: &Path, target: &PathFragment) -> Result<()> {
        self.insert_new(link, Inode::new_symlink(target.clone()))
    }

    fn read_symbolic_link(&self, path: &Path) -> Result<PathFragment> {
        match &self.lookup(path, false)?.kind {
            Kind::Symlink(target) => Ok(target.clone()),
            _ => Err(Error::not_a_symlink(path)),
        }
    }

    fn directory_entries(&self, path: &Path) -> Result<Vec<String>> {
        let inode = self.lookup(path, true)?;
        let entries = inode
            .entries()
            .ok_or_else(|| io_error(path, io::ErrorKind::NotADirectory))?;
        Ok(entries.keys().cloned().collect())
    }

    fn is_readable(&self, path: &Path) -> Result<bool> {
        Ok(self.lookup(path, true)?.has_mode(OWNER_READ))
    }

    fn set_readable(&self, path: &Path, readable: bool) -> Result<()> {
        self.lookup(path, true)?.set_mode(OWNER_READ, readable);
        Ok(())
    }

    fn is_writable(&self, path: &Path) -> Result<bool> {
        Ok(self.lookup(path, true)?.has_mode(OWNER_WRITE))
    }

    fn set_writable(&self, path: &Path, writable: bool) -> Result<()> {
        self.lookup(path, true)?.set_mode(OWNER_WRITE, writable);
        Ok(())
    }

    fn is_executable(&self, path: &Path) -> Result<bool> {
        Ok(self.lookup(path, true)?.has_mode(OWNER_EXECUTE))
    }

    fn set_executable(&self, path: &Path, executable: bool) -> Result<()> {
        self.lookup(path, true)?.set_mode(OWNER_EXECUTE, executable);
        Ok(())
    }

    fn input_stream(&self, path: &Path) -> Result<Box<dyn Read + Send>> {
        let inode = self.lookup(path, true)?;
        if inode.is_directory() {
            return Err(io_error(path, io::ErrorKind::IsADirectory));
        }
        if !inode.has_mode(OWNER_READ) {
            return Err(io_error(path, io::ErrorKind::PermissionDenied));
        }
        Ok(file::reader(&inode))
    }

    fn output_stream(&self, path: &Path, append: bool) -> Result<Box<dyn Write + Send>> {
        let (dir, name) = self.creation_site(path)?;
        let mut entries = dir.entries_mut().ok_or_else(|| Error::not_found(path))?;
        let inode = match entries.get(&name) {
            Some(existing) => existing.clone(),
            None => {
                let created = Inode::new_file(Vec::new());
                _ = entries.insert(name, created.clone());
                dir.touch();
                created
            }
        };
        drop(entries);

        if inode.is_directory() {
            return Err(io_error(path, io::ErrorKind::IsADirectory));
        }
        if !inode.has_mode(OWNER_WRITE) {
            return Err(io_error(path, io::ErrorKind::PermissionDenied));
        }
        Ok(Box::new(MemoryWriter::open(inode, append)))
    }

    fn rename(&self, source: &Path, target: &Path) -> Result<()> {
        if source == target {
            return self.lookup(source, false).map(|_| ());
        }
        if target.starts_with(source) {
            return Err(io_error(target, io::ErrorKind::InvalidInput));
        }
        let moving = self.lookup(source, false)?;
        let target_parent = target
            .parent()
            .ok_or_else(|| io_error(target, io::ErrorKind::IsADirectory))?;
        let target_dir = self.lookup(&target_parent, true)?;
        if !target_dir.is_directory() {
            return Err(Error::not_found(target));
        }
        if let Some(existing) = target_dir.lookup(target.base_name()) {
            match (moving.is_directory(), existing.entries()) {
                (true, Some(children)) if !children.is_empty() => {
                    return Err(io_error(target, io::ErrorKind::DirectoryNotEmpty));
                }
                (true, None) => return Err(io_error(target, io::ErrorKind::NotADirectory)),
                (false, Some(_)) => return Err(io_error(target, io::ErrorKind::IsADirectory)),
                _ => {}
            }
        }

        let (_, inode) = self.detach(source)?;
        let mut entries = target_dir
            .entries_mut()
            .ok_or_else(|| Error::not_found(target))?;
        _ = entries.insert(target.base_name().to_string(), inode);
        drop(entries);
        target_dir.touch();
        Ok(())
    }

    fn create_fs_dependent_hard_link(&self, link: &Path, original: &Path) -> Result<()> {
        let inode = self.lookup(original, true)?;
        if inode.is_directory() {
            return Err(io_error(original, io::ErrorKind::PermissionDenied));
        }
        self.insert_new(link, inode)
    }

    fn xattr(&self, path: &Path, name: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.lookup(path, true)?.meta().xattrs.get(name).cloned())
    }

    /// One lstat-like lookup instead of a readlink and an exists probe.
    fn resolve_one_link(&self, path: &Path) -> Result<Option<PathFragment>> {
        match &self.lookup(path, false)?.kind {
            Kind::Symlink(target) => Ok(Some(target.clone())),
            _ => Ok(None),
        }
    }
}
