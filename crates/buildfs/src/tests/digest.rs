// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use super::*;
use crate::HashFunction;
use crate::memory::MemoryBackend;

fn fs_with(hash_function: HashFunction) -> FileSystem {
    FileSystem::new(
        Arc::new(MemoryBackend::new()),
        FsConfig::default().with_hash_function(hash_function),
    )
}

#[test]
fn test_is_valid_digest_follows_configuration() {
    let md5 = fs_with(HashFunction::Md5);
    assert!(md5.is_valid_digest(&[0; 16]));
    assert!(!md5.is_valid_digest(&[0; 20]));
    assert!(!md5.is_valid_digest(&[]));

    let sha1 = fs_with(HashFunction::Sha1);
    assert!(sha1.is_valid_digest(&[0; 20]));
    assert!(!sha1.is_valid_digest(&[0; 16]));
}

#[test]
fn test_empty_file_digests() {
    let md5 = fs_with(HashFunction::Md5);
    write_file(&md5, "/empty", b"");
    assert_eq!(
        hex::encode(md5.digest(&p("/empty")).unwrap()),
        "d41d8cd98f00b204e9800998ecf8427e"
    );

    let sha1 = fs_with(HashFunction::Sha1);
    write_file(&sha1, "/empty", b"");
    assert_eq!(
        hex::encode(sha1.digest(&p("/empty")).unwrap()),
        "da39a3ee5e6b4b0d3255bfef95601890afd80709"
    );
}

#[test]
fn test_content_digests() {
    let fs = fs_with(HashFunction::Md5);
    write_file(&fs, "/hello", b"hello");

    assert_eq!(
        hex::encode(fs.digest(&p("/hello")).unwrap()),
        "5d41402abc4b2a76b9719d911017c592"
    );
    assert_eq!(
        hex::encode(fs.digest_with(&p("/hello"), HashFunction::Sha1).unwrap()),
        "aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d"
    );
}

#[test]
fn test_digest_follows_symlinks() {
    let fs = fs_with(HashFunction::Md5);
    write_file(&fs, "/hello", b"hello");
    symlink(&fs, "/link", "hello");
    assert_eq!(
        fs.digest(&p("/link")).unwrap(),
        fs.digest(&p("/hello")).unwrap()
    );
}

#[test]
fn test_large_file_digest_matches_one_shot() {
    let fs = fs_with(HashFunction::Sha1);
    let data: Vec<u8> = (0..200_000u32).map(|i| (i % 251) as u8).collect();
    write_file(&fs, "/big", &data);
    assert_eq!(
        fs.digest(&p("/big")).unwrap(),
        HashFunction::Sha1.digest_bytes(&data)
    );
}

#[test]
fn test_digest_of_missing_file() {
    let fs = fs_with(HashFunction::Md5);
    assert!(fs.digest(&p("/missing")).unwrap_err().is_not_found());
}

#[test]
fn test_fast_digest_is_preferred() {
    let (fs, backend) = instrumented(FsConfig::default());
    write_file(&fs, "/f", b"content");
    assert_eq!(fs.fast_digest(&p("/f")).unwrap(), None);

    backend.set_fast_digest(Some(vec![7; 16]));
    backend.reset_calls();
    assert_eq!(fs.content_digest(&p("/f")).unwrap(), vec![7; 16]);
    assert_eq!(backend.calls("fast_digest"), 1);
    assert_eq!(backend.calls("input_stream"), 0);
}

#[test]
fn test_content_digest_falls_back_to_reading() {
    let (fs, backend) = instrumented(FsConfig::default());
    write_file(&fs, "/f", b"hello");
    backend.reset_calls();

    assert_eq!(
        hex::encode(fs.content_digest(&p("/f")).unwrap()),
        "5d41402abc4b2a76b9719d911017c592"
    );
    assert_eq!(backend.calls("fast_digest"), 1);
    assert_eq!(backend.calls("input_stream"), 1);

    // Nothing is cached between calls.
    _ = fs.content_digest(&p("/f")).unwrap();
    assert_eq!(backend.calls("input_stream"), 2);
}
