// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Bounded `(parent, name) -> child` cache. Saves allocation when the same
//! children are produced over and over by directory listings; it is never
//! consulted for correctness.
//!
//! Each slot is published at most once and never replaced, so readers take
//! no lock. A key whose slot already holds another child is simply built
//! fresh.

use crate::path::Path;
use std::collections::hash_map::RandomState;
use std::hash::BuildHasher;
use std::sync::OnceLock;

const DEFAULT_CAPACITY: usize = 4096;

struct Entry {
    parent: Path,
    name: Box<str>,
    child: Path,
}

pub struct ChildInterner {
    hasher: RandomState,
    slots: Box<[OnceLock<Entry>]>,
}

impl ChildInterner {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            hasher: RandomState::new(),
            slots: (0..capacity).map(|_| OnceLock::new()).collect(),
        }
    }

    /// Returns `parent/name`, reusing a previously built value if present.
    /// `name` must be a plain segment.
    pub fn child(&self, parent: &Path, name: &str) -> Path {
        if self.slots.is_empty() {
            return parent.child(name);
        }
        let index = self.hasher.hash_one((parent, name)) as usize % self.slots.len();
        let slot = &self.slots[index];
        if let Some(entry) = slot.get() {
            if entry.parent == *parent && *entry.name == *name {
                return entry.child.clone();
            }
            return parent.child(name);
        }

        let child = parent.child(name);
        // A racing writer may win the slot; either value is correct.
        _ = slot.set(Entry {
            parent: parent.clone(),
            name: name.into(),
            child: child.clone(),
        });
        child
    }

    /// Number of published entries.
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.get().is_some()).count()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[cfg(test)]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}

impl Default for ChildInterner {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_reuses_child() {
        let interner = ChildInterner::new(8);
        let root = Path::root();
        let a = interner.child(&root, "a");
        let again = interner.child(&root, "a");
        assert_eq!(a, again);
        assert_eq!(interner.len(), 1);
        assert!(std::ptr::eq(a.as_str(), again.as_str()));
    }

    #[test]
    fn test_bounded() {
        let interner = ChildInterner::new(2);
        let root = Path::root();
        for i in 0..50 {
            let name = format!("n{i}");
            assert_eq!(interner.child(&root, &name).as_str(), format!("/{name}"));
        }
        assert!(interner.len() <= 2);
        assert_eq!(interner.capacity(), 2);
    }

    #[test]
    fn test_collisions_build_fresh_children() {
        let interner = ChildInterner::new(1);
        let root = Path::root();
        let a = interner.child(&root, "a");
        let b = interner.child(&root, "b");
        assert_eq!(b.as_str(), "/b");
        assert_eq!(interner.child(&root, "b"), b);
        assert!(std::ptr::eq(interner.child(&root, "a").as_str(), a.as_str()));
    }

    #[test]
    fn test_disabled() {
        let interner = ChildInterner::new(0);
        let a = interner.child(&Path::root(), "a");
        assert_eq!(a.as_str(), "/a");
        assert!(interner.is_empty());
    }

    #[test]
    fn test_concurrent_publication_agrees() {
        let interner = ChildInterner::new(16);
        let parent = Path::parse("/dir").unwrap();
        let children: Vec<Path> = thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| s.spawn(|| interner.child(&parent, "x")))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert!(children.iter().all(|c| c.as_str() == "/dir/x"));
        assert_eq!(interner.len(), 1);
    }
}
