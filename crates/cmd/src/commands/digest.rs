// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::common::{FsContext, parse_path};
use anyhow::{Context, Result};
use diagnostics::*;

/// Digest command - prints `<hex>  <path>` like md5sum/sha1sum.
///
/// Uses the content digest, so a backend's fast digest wins when it has
/// one.
pub fn digest_command<F>(ctx: &FsContext, path: &str, mut handler: F) -> Result<()>
where
    F: FnMut(&str),
{
    let fs = ctx.open_fs()?;
    let path = parse_path(&fs, path)?;
    debug!(
        "digesting {path} with {function}",
        path: path.as_str(),
        function: fs.hash_function().as_str(),
    );

    let digest = fs
        .content_digest(&path)
        .with_context(|| format!("Cannot digest '{}'", path))?;
    handler(&format!("{}  {}", hex::encode(digest), path));
    Ok(())
}
