// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::status::FileStatus;

/// Kind of a directory entry, as reported by `readdir`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirentType {
    /// Regular file
    File,
    /// Directory
    Directory,
    /// Symbolic link (only when the listing does not follow links)
    Symlink,
    /// Special file, failed stat, or anything else
    Unknown,
}

/// One directory entry: the entry's base name plus its kind
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Dirent {
    name: String,
    kind: DirentType,
}

impl DirentType {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            DirentType::File => "file",
            DirentType::Directory => "directory",
            DirentType::Symlink => "symlink",
            DirentType::Unknown => "unknown",
        }
    }

    /// Classifies a stat result. Special files are checked first since
    /// backends may report them as files too.
    #[must_use]
    pub fn from_status(status: Option<&FileStatus>) -> Self {
        match status {
            None => DirentType::Unknown,
            Some(s) if s.is_special_file() => DirentType::Unknown,
            Some(s) if s.is_file() => DirentType::File,
            Some(s) if s.is_directory() => DirentType::Directory,
            Some(s) if s.is_symbolic_link() => DirentType::Symlink,
            Some(_) => DirentType::Unknown,
        }
    }
}

impl std::fmt::Display for DirentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DirentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "file" => Ok(DirentType::File),
            "directory" => Ok(DirentType::Directory),
            "symlink" => Ok(DirentType::Symlink),
            "unknown" => Ok(DirentType::Unknown),
            other => Err(format!("Unknown dirent type: {}", other)),
        }
    }
}

impl Dirent {
    pub fn new<S: Into<String>>(name: S, kind: DirentType) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn kind(&self) -> DirentType {
        self.kind
    }
}

impl std::fmt::Display for Dirent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.kind)
    }
}
