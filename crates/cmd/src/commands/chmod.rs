// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::common::{FsContext, parse_mode, parse_path};
use anyhow::{Context, Result};
use diagnostics::*;

/// Applies the owner bits of an octal mode. Group and other bits are
/// accepted but have no effect.
pub fn chmod_command(ctx: &FsContext, mode: &str, path: &str) -> Result<()> {
    let mode = parse_mode(mode)?;
    let fs = ctx.open_fs()?;
    let path = parse_path(&fs, path)?;

    fs.chmod(&path, mode)
        .with_context(|| format!("Cannot change mode of '{}'", path))?;

    info!("changed mode of {path} to {mode}", path: path.as_str(), mode: format!("{mode:o}"));
    Ok(())
}
