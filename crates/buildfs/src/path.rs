// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Path values.
//!
//! A [`Path`] is an absolute, normalized, slash-separated name inside one
//! [`crate::FileSystem`]. It never performs I/O. A [`PathFragment`] is the
//! raw, possibly relative form used for symbolic link targets.

use crate::error::{Error, Result};
use std::fmt;
use std::sync::Arc;

const SEPARATOR: char = '/';

/// An absolute, normalized path. Cheap to clone.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Path(Arc<str>);

/// A sequence of raw path segments, absolute or relative.
///
/// Empty segments are dropped when parsing; `.` and `..` are kept so that
/// symlink resolution can interpret them.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PathFragment {
    absolute: bool,
    segments: Vec<String>,
}

impl Path {
    #[must_use]
    pub fn root() -> Self {
        Path(Arc::from("/"))
    }

    /// Parses an absolute path name, eliminating `.`, `..` and repeated
    /// slashes. Does no I/O, so symlinks are not resolved.
    pub fn parse(s: &str) -> Result<Self> {
        if !s.starts_with(SEPARATOR) {
            return Err(Error::not_absolute(s));
        }
        Ok(Self::root().relative(&PathFragment::new(s)))
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.len() == 1
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The path without its leading slash; empty for the root.
    #[must_use]
    pub fn strip_root(&self) -> &str {
        &self.0[1..]
    }

    /// The last segment, or "" for the root.
    #[must_use]
    pub fn base_name(&self) -> &str {
        match self.0.rfind(SEPARATOR) {
            Some(idx) => &self.0[idx + 1..],
            None => "",
        }
    }

    /// The parent directory, or `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<Path> {
        if self.is_root() {
            return None;
        }
        match self.0.rfind(SEPARATOR) {
            Some(0) => Some(Self::root()),
            Some(idx) => Some(Path(Arc::from(&self.0[..idx]))),
            None => None,
        }
    }

    /// Appends one segment, rejecting names that would leave the path
    /// unnormalized.
    pub fn try_child(&self, name: &str) -> Result<Path> {
        if !is_plain_segment(name) {
            return Err(Error::invalid_segment(name));
        }
        Ok(self.child(name))
    }

    /// Appends a segment already known to be plain: a directory entry name
    /// or a segment of a parsed path.
    #[must_use]
    pub(crate) fn child(&self, name: &str) -> Path {
        debug_assert!(
            is_plain_segment(name),
            "invalid path segment {name:?}"
        );
        let mut s = String::with_capacity(self.0.len() + name.len() + 1);
        s.push_str(&self.0);
        if !self.is_root() {
            s.push(SEPARATOR);
        }
        s.push_str(name);
        Path(Arc::from(s))
    }

    /// Applies a fragment lexically: an absolute fragment restarts at the
    /// root, `.` is skipped, and `..` pops a segment (root's parent is root).
    #[must_use]
    pub fn relative(&self, fragment: &PathFragment) -> Path {
        let mut segments: Vec<&str> = if fragment.is_absolute() {
            Vec::new()
        } else {
            self.segments().collect()
        };
        for seg in fragment.segments() {
            match seg.as_str() {
                "" | "." => {}
                ".." => {
                    _ = segments.pop();
                }
                name => segments.push(name),
            }
        }
        if segments.is_empty() {
            return Self::root();
        }
        let mut s = String::new();
        for seg in segments {
            s.push(SEPARATOR);
            s.push_str(seg);
        }
        Path(Arc::from(s))
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.strip_root().split(SEPARATOR).filter(|s| !s.is_empty())
    }

    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segments().count()
    }

    /// Segment-wise prefix test; `/ab` does not start with `/a`.
    #[must_use]
    pub fn starts_with(&self, prefix: &Path) -> bool {
        if prefix.is_root() {
            return true;
        }
        match self.0.strip_prefix(prefix.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with(SEPARATOR),
            None => false,
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Path({:?})", &*self.0)
    }
}

impl AsRef<str> for Path {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PathFragment {
    #[must_use]
    pub fn new(s: &str) -> Self {
        PathFragment {
            absolute: s.starts_with(SEPARATOR),
            segments: s
                .split(SEPARATOR)
                .filter(|seg| !seg.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    #[must_use]
    pub fn is_absolute(&self) -> bool {
        self.absolute
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl From<&str> for PathFragment {
    fn from(s: &str) -> Self {
        PathFragment::new(s)
    }
}

impl From<&Path> for PathFragment {
    fn from(path: &Path) -> Self {
        PathFragment::new(path.as_str())
    }
}

impl fmt::Display for PathFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.absolute {
            f.write_str("/")?;
        } else if self.segments.is_empty() {
            return f.write_str(".");
        }
        f.write_str(&self.segments.join("/"))
    }
}

pub(crate) fn is_plain_segment(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(SEPARATOR)
}
