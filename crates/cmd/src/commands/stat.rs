// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::common::{FsContext, kind_name, parse_path};
use anyhow::{Context, Result};
use diagnostics::*;

/// Stat command - prints the kind, size, modification time and owner
/// permissions of one path.
///
/// With `follow` the final symlink is followed, like `stat -L`.
pub fn stat_command<F>(ctx: &FsContext, path: &str, follow: bool, mut handler: F) -> Result<()>
where
    F: FnMut(&str),
{
    debug!("stat_command called with {path} follow={follow}", path: path, follow: follow);

    let fs = ctx.open_fs()?;
    let path = parse_path(&fs, path)?;
    let status = fs
        .stat(&path, follow)
        .with_context(|| format!("Cannot stat '{}'", path))?;

    handler(&format!("path: {}", status.path()));
    handler(&format!("kind: {}", kind_name(&status)));
    handler(&format!("size: {}", status.size()?));
    handler(&format!("mtime: {}", status.last_modified_time()?));

    if !follow && status.is_symbolic_link() {
        let target = fs
            .read_symbolic_link(&path)
            .with_context(|| format!("Cannot read link '{}'", path))?;
        handler(&format!("target: {}", target));
    } else {
        let flag = |set: bool, c: char| if set { c } else { '-' };
        handler(&format!(
            "owner: {}{}{}",
            flag(fs.is_readable(&path)?, 'r'),
            flag(fs.is_writable(&path)?, 'w'),
            flag(fs.is_executable(&path)?, 'x'),
        ));
    }
    Ok(())
}
