// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::common::{FsContext, parse_path};
use anyhow::Result;

/// Prints the type of the filesystem holding a path, or `unknown`.
pub fn fstype_command<F>(ctx: &FsContext, path: &str, mut handler: F) -> Result<()>
where
    F: FnMut(&str),
{
    let fs = ctx.open_fs()?;
    let path = parse_path(&fs, path)?;
    handler(&fs.file_system_type(&path));
    Ok(())
}
