// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use super::node::{Inode, Kind};
use std::io::{self, Cursor, Read, Write};
use std::sync::{Arc, PoisonError};

/// Reads a snapshot of the file content taken when the stream was opened.
pub(crate) fn reader(inode: &Inode) -> Box<dyn Read + Send> {
    let content = match &inode.kind {
        Kind::File(content) => content
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone(),
        _ => Vec::new(),
    };
    Box::new(Cursor::new(content))
}

/// Writes straight into a shared inode, so every hard link sees the data.
pub(crate) struct MemoryWriter {
    inode: Arc<Inode>,
}

impl MemoryWriter {
    /// Truncates the content unless `append`.
    pub(crate) fn open(inode: Arc<Inode>, append: bool) -> Self {
        if !append {
            if let Kind::File(content) = &inode.kind {
                content.write().unwrap_or_else(PoisonError::into_inner).clear();
                inode.touch();
            }
        }
        Self { inode }
    }
}

impl Write for MemoryWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &self.inode.kind {
            Kind::File(content) => {
                content
                    .write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .extend_from_slice(buf);
                self.inode.touch();
                Ok(buf.len())
            }
            // Special files swallow writes.
            _ => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
