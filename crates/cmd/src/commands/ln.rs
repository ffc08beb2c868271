// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::common::{FsContext, parse_path};
use anyhow::{Context, Result};
use buildfs::PathFragment;
use diagnostics::*;

/// Link command. Creates a hard link by default. With `symbolic` the
/// original is stored verbatim as the link target, so it may be relative
/// or dangling.
pub fn ln_command(ctx: &FsContext, original: &str, link: &str, symbolic: bool) -> Result<()> {
    let fs = ctx.open_fs()?;
    let link = parse_path(&fs, link)?;

    if symbolic {
        fs.create_symbolic_link(&link, &PathFragment::new(original))
            .with_context(|| format!("Cannot create symlink '{}'", link))?;
        info!("linked {link} -> {target}", link: link.as_str(), target: original);
    } else {
        let original = parse_path(&fs, original)?;
        fs.create_hard_link(&link, &original)
            .with_context(|| format!("Cannot link '{}' to '{}'", link, original))?;
        info!("linked {link} to {original}", link: link.as_str(), original: original.as_str());
    }
    Ok(())
}
