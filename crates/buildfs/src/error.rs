// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::path::Path;
use std::io;

pub type Result<T> = std::result::Result<T, Error>;

/// Represents errors that can occur in filesystem operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The path, or one of its ancestors, does not exist.
    #[error("{0} (No such file or directory)")]
    NotFound(Path),

    /// The path exists but is not a symbolic link. Raised by
    /// `read_symbolic_link` and consumed by symlink resolution.
    #[error("{0} (Not a symbolic link)")]
    NotASymlink(Path),

    /// The symlink budget ran out while canonicalizing a path.
    #[error("{0} (Too many levels of symbolic links)")]
    TooManyLinks(Path),

    #[error("{0} (File exists)")]
    AlreadyExists(Path),

    /// The backend lacks the capability for this operation.
    #[error("{operation} is not supported: {path}")]
    Unsupported { operation: &'static str, path: Path },

    #[error("{0} (not an absolute path)")]
    NotAbsolute(String),

    /// A child name that is empty, `.`, `..`, or contains a separator.
    #[error("{0:?} (not a valid path segment)")]
    InvalidSegment(String),

    #[error("{path}: {source}")]
    Io {
        path: Path,
        #[source]
        source: io::Error,
    },
}

impl Error {
    pub fn not_found(path: &Path) -> Self {
        Error::NotFound(path.clone())
    }

    pub fn not_a_symlink(path: &Path) -> Self {
        Error::NotASymlink(path.clone())
    }

    pub fn too_many_links(path: &Path) -> Self {
        Error::TooManyLinks(path.clone())
    }

    pub fn already_exists(path: &Path) -> Self {
        Error::AlreadyExists(path.clone())
    }

    pub fn unsupported(operation: &'static str, path: &Path) -> Self {
        Error::Unsupported {
            operation,
            path: path.clone(),
        }
    }

    pub fn not_absolute<S: AsRef<str>>(s: S) -> Self {
        Error::NotAbsolute(s.as_ref().to_string())
    }

    pub fn invalid_segment<S: AsRef<str>>(s: S) -> Self {
        Error::InvalidSegment(s.as_ref().to_string())
    }

    /// Wraps an OS-level failure with path context.
    pub fn io(path: &Path, source: io::Error) -> Self {
        Error::Io {
            path: path.clone(),
            source,
        }
    }

    /// Classifies an `io::Error` from a backend call on `path`.
    pub fn from_io(path: &Path, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::NotADirectory => Error::not_found(path),
            io::ErrorKind::AlreadyExists => Error::already_exists(path),
            io::ErrorKind::Unsupported => Error::unsupported("operation", path),
            _ => Error::io(path, source),
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    /// True for the generic I/O failure class, which includes an exhausted
    /// symlink budget.
    #[must_use]
    pub fn is_io_failure(&self) -> bool {
        matches!(self, Error::Io { .. } | Error::TooManyLinks(_))
    }

    #[must_use]
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Error::Unsupported { .. })
    }

    /// The path this error is about, when it names one.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Error::NotFound(p)
            | Error::NotASymlink(p)
            | Error::TooManyLinks(p)
            | Error::AlreadyExists(p) => Some(p),
            Error::Unsupported { path, .. } | Error::Io { path, .. } => Some(path),
            Error::NotAbsolute(_) | Error::InvalidSegment(_) => None,
        }
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> io::Error {
        let kind = match &err {
            Error::NotFound(_) => io::ErrorKind::NotFound,
            Error::AlreadyExists(_) => io::ErrorKind::AlreadyExists,
            Error::Unsupported { .. } => io::ErrorKind::Unsupported,
            Error::NotAbsolute(_) | Error::InvalidSegment(_) => io::ErrorKind::InvalidInput,
            Error::NotASymlink(_) | Error::TooManyLinks(_) | Error::Io { .. } => {
                io::ErrorKind::Other
            }
        };
        io::Error::new(kind, err)
    }
}
