// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::common::{FsContext, parse_path};
use anyhow::{Context, Result};
use diagnostics::*;

/// List command - one line per entry, sorted by name, with the entry kind
/// in the first column. Entries are typed through their links when
/// `follow` is set; otherwise links show as `symlink`.
pub fn ls_command<F>(ctx: &FsContext, path: &str, follow: bool, mut handler: F) -> Result<()>
where
    F: FnMut(&str),
{
    debug!("ls_command called with {path} follow={follow}", path: path, follow: follow);

    let fs = ctx.open_fs()?;
    let path = parse_path(&fs, path)?;
    let mut entries = fs
        .readdir(&path, follow)
        .with_context(|| format!("Cannot list '{}'", path))?;
    entries.sort_by(|a, b| a.name().cmp(b.name()));

    for entry in &entries {
        handler(&format!("{:<9} {}", entry.kind().as_str(), entry.name()));
    }
    Ok(())
}
