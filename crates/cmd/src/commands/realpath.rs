// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::common::{FsContext, parse_path};
use anyhow::{Context, Result};

/// Prints the canonical form of a path, with every symlink expanded.
pub fn realpath_command<F>(ctx: &FsContext, path: &str, mut handler: F) -> Result<()>
where
    F: FnMut(&str),
{
    let fs = ctx.open_fs()?;
    let path = parse_path(&fs, path)?;
    let canonical = fs
        .resolve_symbolic_links(&path)
        .with_context(|| format!("Cannot resolve '{}'", path))?;
    handler(canonical.as_str());
    Ok(())
}
