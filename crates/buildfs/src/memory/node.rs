// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::path::PathFragment;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{SystemTime, UNIX_EPOCH};

pub(crate) const OWNER_READ: u32 = 0o400;
pub(crate) const OWNER_WRITE: u32 = 0o200;
pub(crate) const OWNER_EXECUTE: u32 = 0o100;

/// One in-memory inode. Hard links are several directory entries sharing
/// the same `Arc<Inode>`.
pub(crate) struct Inode {
    pub(crate) kind: Kind,
    meta: Mutex<Meta>,
}

pub(crate) enum Kind {
    File(RwLock<Vec<u8>>),
    Directory(RwLock<BTreeMap<String, Arc<Inode>>>),
    Symlink(PathFragment),
    Special,
}

#[derive(Debug, Clone)]
pub(crate) struct Meta {
    pub(crate) mtime: i64,
    pub(crate) mode: u32,
    pub(crate) xattrs: BTreeMap<String, Vec<u8>>,
}

pub(crate) fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

impl Inode {
    fn new(kind: Kind, mode: u32) -> Arc<Self> {
        Arc::new(Self {
            kind,
            meta: Mutex::new(Meta {
                mtime: now_millis(),
                mode,
                xattrs: BTreeMap::new(),
            }),
        })
    }

    pub(crate) fn new_file(content: Vec<u8>) -> Arc<Self> {
        Self::new(Kind::File(RwLock::new(content)), 0o644)
    }

    pub(crate) fn new_directory() -> Arc<Self> {
        Self::new(Kind::Directory(RwLock::new(BTreeMap::new())), 0o755)
    }

    pub(crate) fn new_symlink(target: PathFragment) -> Arc<Self> {
        Self::new(Kind::Symlink(target), 0o777)
    }

    pub(crate) fn new_special() -> Arc<Self> {
        Self::new(Kind::Special, 0o644)
    }

    pub(crate) fn meta(&self) -> MutexGuard<'_, Meta> {
        self.meta.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn touch(&self) {
        self.meta().mtime = now_millis();
    }

    pub(crate) fn is_directory(&self) -> bool {
        matches!(self.kind, Kind::Directory(_))
    }

    /// Directory entries for reading, or `None` if this is not a directory.
    pub(crate) fn entries(&self) -> Option<RwLockReadGuard<'_, BTreeMap<String, Arc<Inode>>>> {
        match &self.kind {
            Kind::Directory(entries) => {
                Some(entries.read().unwrap_or_else(PoisonError::into_inner))
            }
            _ => None,
        }
    }

    pub(crate) fn entries_mut(
        &self,
    ) -> Option<RwLockWriteGuard<'_, BTreeMap<String, Arc<Inode>>>> {
        match &self.kind {
            Kind::Directory(entries) => {
                Some(entries.write().unwrap_or_else(PoisonError::into_inner))
            }
            _ => None,
        }
    }

    pub(crate) fn lookup(&self, name: &str) -> Option<Arc<Inode>> {
        self.entries().and_then(|entries| entries.get(name).cloned())
    }

    pub(crate) fn size(&self) -> u64 {
        match &self.kind {
            Kind::File(content) => {
                content.read().unwrap_or_else(PoisonError::into_inner).len() as u64
            }
            Kind::Symlink(target) => target.to_string().len() as u64,
            Kind::Directory(_) | Kind::Special => 0,
        }
    }

    pub(crate) fn has_mode(&self, bit: u32) -> bool {
        self.meta().mode & bit != 0
    }

    pub(crate) fn set_mode(&self, bit: u32, on: bool) {
        let mut meta = self.meta();
        if on {
            meta.mode |= bit;
        } else {
            meta.mode &= !bit;
        }
    }
}
