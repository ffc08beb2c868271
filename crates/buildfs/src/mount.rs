// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Mount table parsing for `FileSystem::file_system_type`.
//!
//! Lines have at least three whitespace-separated fields:
//! `device mountpoint fstype ...`, with the kernel's octal escapes
//! (`\040` for space) inside fields.

use crate::path::Path;

pub const UNKNOWN_FILE_SYSTEM: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountEntry {
    pub mount_point: Path,
    pub fs_type: String,
}

/// Decodes raw mount table bytes as ISO-8859-1, which never fails.
#[must_use]
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Parses every usable line; lines with fewer than three fields or a
/// relative mount point are skipped.
#[must_use]
pub fn parse_mount_table(text: &str) -> Vec<MountEntry> {
    text.lines()
        .filter_map(|line| {
            let words: Vec<&str> = line.split_whitespace().collect();
            if words.len() < 3 {
                return None;
            }
            let mount_point = Path::parse(&unescape(words[1])).ok()?;
            Some(MountEntry {
                mount_point,
                fs_type: words[2].to_string(),
            })
        })
        .collect()
}

/// The type of the most specific mount point containing `canonical`.
#[must_use]
pub fn best_match<'a>(entries: &'a [MountEntry], canonical: &Path) -> Option<&'a MountEntry> {
    let mut best: Option<&MountEntry> = None;
    for entry in entries {
        if !canonical.starts_with(&entry.mount_point) {
            continue;
        }
        let count = entry.mount_point.segment_count();
        if best.is_none_or(|b| count > b.mount_point.segment_count()) {
            best = Some(entry);
        }
    }
    best
}

fn unescape(field: &str) -> String {
    let chars: Vec<char> = field.chars().collect();
    let mut out = String::with_capacity(field.len());
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '\\' && i + 4 <= chars.len() {
            let digits: Option<Vec<u32>> = chars[i + 1..i + 4]
                .iter()
                .map(|c| c.to_digit(8))
                .collect();
            if let Some(code) = digits
                .map(|d| d[0] * 64 + d[1] * 8 + d[2])
                .and_then(char::from_u32)
            {
                out.push(code);
                i += 4;
                continue;
            }
        }
        out.push(chars[i]);
        i += 1;
    }
    out
}
