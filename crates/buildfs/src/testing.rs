// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Test utilities: a backend wrapper that counts primitive calls and can
//! serve a canned fast digest.

use crate::backend::FilesystemBackend;
use crate::digest::HashFunction;
use crate::error::Result;
use crate::path::{Path, PathFragment};
use std::collections::HashMap;
use std::io::{Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

/// Wraps a backend, recording how many times each primitive ran.
///
/// `resolve_one_link` keeps its default, so canonicalization shows up as
/// `read_symbolic_link` and `exists` calls even when the wrapped backend
/// overrides it.
pub struct InstrumentedBackend<B> {
    inner: B,
    calls: Mutex<HashMap<&'static str, usize>>,
    fast_digest: Mutex<Option<Vec<u8>>>,
    read_only: AtomicBool,
}

impl<B: FilesystemBackend> InstrumentedBackend<B> {
    pub fn new(inner: B) -> Self {
        Self {
            inner,
            calls: Mutex::new(HashMap::new()),
            fast_digest: Mutex::new(None),
            read_only: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn inner(&self) -> &B {
        &self.inner
    }

    /// How many times the primitive called `name` has run.
    #[must_use]
    pub fn calls(&self, name: &str) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .copied()
            .unwrap_or(0)
    }

    pub fn reset_calls(&self) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Makes `fast_digest` answer `digest` for every path, or fall back to
    /// the wrapped backend when `None`.
    pub fn set_fast_digest(&self, digest: Option<Vec<u8>>) {
        *self
            .fast_digest
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = digest;
    }

    /// Makes every capability query answer false.
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::Relaxed);
    }

    fn capable(&self) -> bool {
        !self.read_only.load(Ordering::Relaxed)
    }

    fn record(&self, name: &'static str) {
        *self
            .calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(name)
            .or_insert(0) += 1;
    }
}

impl<B: FilesystemBackend> FilesystemBackend for InstrumentedBackend<B> {
    fn supports_modifications(&self) -> bool {
        self.capable() && self.inner.supports_modifications()
    }

    fn supports_symlinks_natively(&self) -> bool {
        self.capable() && self.inner.supports_symlinks_natively()
    }

    fn supports_hard_links_natively(&self) -> bool {
        self.capable() && self.inner.supports_hard_links_natively()
    }

    fn is_file_path_case_sensitive(&self) -> bool {
        self.inner.is_file_path_case_sensitive()
    }

    fn create_directory(&self, path: &Path) -> Result<bool> {
        self.record("create_directory");
        self.inner.create_directory(path)
    }

    fn file_size(&self, path: &Path, follow_symlinks: bool) -> Result<u64> {
        self.record("file_size");
        self.inner.file_size(path, follow_symlinks)
    }

    fn delete(&self, path: &Path) -> Result<bool> {
        self.record("delete");
        self.inner.delete(path)
    }

    fn last_modified_time(&self, path: &Path, follow_symlinks: bool) -> Result<i64> {
        self.record("last_modified_time");
        self.inner.last_modified_time(path, follow_symlinks)
    }

    fn set_last_modified_time(&self, path: &Path, millis: i64) -> Result<()> {
        self.record("set_last_modified_time");
        self.inner.set_last_modified_time(path, millis)
    }

    fn is_symbolic_link(&self, path: &Path) -> bool {
        self.record("is_symbolic_link");
        self.inner.is_symbolic_link(path)
    }

    fn is_file(&self, path: &Path, follow_symlinks: bool) -> bool {
        self.record("is_file");
        self.inner.is_file(path, follow_symlinks)
    }

    fn is_directory(&self, path: &Path, follow_symlinks: bool) -> bool {
        self.record("is_directory");
        self.inner.is_directory(path, follow_symlinks)
    }

    fn is_special_file(&self, path: &Path, follow_symlinks: bool) -> bool {
        self.record("is_special_file");
        self.inner.is_special_file(path, follow_symlinks)
    }

    fn exists(&self, path: &Path, follow_symlinks: bool) -> bool {
        self.record("exists");
        self.inner.exists(path, follow_symlinks)
    }

    fn create_symbolic_link(&self, link: &Path, target: &PathFragment) -> Result<()> {
        self.record("create_symbolic_link");
        self.inner.create_symbolic_link(link, target)
    }

    fn read_symbolic_link(&self, path: &Path) -> Result<PathFragment> {
        self.record("read_symbolic_link");
        self.inner.read_symbolic_link(path)
    }

    fn directory_entries(&self, path: &Path) -> Result<Vec<String>> {
        self.record("directory_entries");
        self.inner.directory_entries(path)
    }

    fn is_readable(&self, path: &Path) -> Result<bool> {
        self.record("is_readable");
        self.inner.is_readable(path)
    }

    fn set_readable(&self, path: &Path, readable: bool) -> Result<()> {
        self.record("set_readable");
        self.inner.set_readable(path, readable)
    }

    fn is_writable(&self, path: &Path) -> Result<bool> {
        self.record("is_writable");
        self.inner.is_writable(path)
    }

    fn set_writable(&self, path: &Path, writable: bool) -> Result<()> {
        self.record("set_writable");
        self.inner.set_writable(path, writable)
    }

    fn is_executable(&self, path: &Path) -> Result<bool> {
        self.record("is_executable");
        self.inner.is_executable(path)
    }

    fn set_executable(&self, path: &Path, executable: bool) -> Result<()> {
        self.record("set_executable");
        self.inner.set_executable(path, executable)
    }

    fn input_stream(&self, path: &Path) -> Result<Box<dyn Read + Send>> {
        self.record("input_stream");
        self.inner.input_stream(path)
    }

    fn output_stream(&self, path: &Path, append: bool) -> Result<Box<dyn Write + Send>> {
        self.record("output_stream");
        self.inner.output_stream(path, append)
    }

    fn rename(&self, source: &Path, target: &Path) -> Result<()> {
        self.record("rename");
        self.inner.rename(source, target)
    }

    fn create_fs_dependent_hard_link(&self, link: &Path, original: &Path) -> Result<()> {
        self.record("create_fs_dependent_hard_link");
        self.inner.create_fs_dependent_hard_link(link, original)
    }

    fn xattr(&self, path: &Path, name: &str) -> Result<Option<Vec<u8>>> {
        self.record("xattr");
        self.inner.xattr(path, name)
    }

    fn fast_digest(&self, path: &Path, hash_function: HashFunction) -> Result<Option<Vec<u8>>> {
        self.record("fast_digest");
        let canned = self
            .fast_digest
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        match canned {
            Some(digest) => Ok(Some(digest)),
            None => self.inner.fast_digest(path, hash_function),
        }
    }
}
