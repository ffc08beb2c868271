// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

mod digest;
mod resolve;

use crate::memory::MemoryBackend;
use crate::testing::InstrumentedBackend;
use crate::{FileSystem, FsConfig, Path, PathFragment};
use std::sync::Arc;

fn p(s: &str) -> Path {
    Path::parse(s).unwrap()
}

fn write_file(fs: &FileSystem, path: &str, data: &[u8]) {
    fs.write_all(&p(path), data).unwrap();
}

fn mkdir(fs: &FileSystem, path: &str) {
    assert!(fs.create_directory(&p(path)).unwrap());
}

fn symlink(fs: &FileSystem, link: &str, target: &str) {
    fs.create_symbolic_link(&p(link), &PathFragment::new(target))
        .unwrap();
}

/// A memory filesystem whose backend calls can be counted.
fn instrumented(config: FsConfig) -> (FileSystem, Arc<InstrumentedBackend<MemoryBackend>>) {
    let backend = Arc::new(InstrumentedBackend::new(MemoryBackend::new()));
    let fs = FileSystem::new(backend.clone(), config);
    (fs, backend)
}

/// `dir/l0 -> l1 -> ... -> l{n-1} -> target`, where `dir/target` is a file.
/// Resolving `dir/l0` takes exactly `n` expansions.
fn link_chain(fs: &FileSystem, dir: &str, n: usize) -> Path {
    mkdir(fs, dir);
    write_file(fs, &format!("{dir}/target"), b"end");
    for i in 0..n {
        let next = if i + 1 == n {
            "target".to_string()
        } else {
            format!("l{}", i + 1)
        };
        symlink(fs, &format!("{dir}/l{i}"), &next);
    }
    p(&format!("{dir}/l0"))
}
