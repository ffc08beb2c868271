// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use md5::Md5;
use sha1::{Digest, Sha1};
use std::io::{self, Read};

const BUFFER_SIZE: usize = 64 * 1024;

/// Type of hash function used for digesting files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum HashFunction {
    #[serde(rename = "MD5", alias = "md5")]
    Md5,
    #[serde(rename = "SHA1", alias = "sha1")]
    Sha1,
}

impl HashFunction {
    /// Digest length in bytes
    #[must_use]
    pub fn digest_size(self) -> usize {
        match self {
            HashFunction::Md5 => 16,
            HashFunction::Sha1 => 20,
        }
    }

    #[must_use]
    pub fn is_valid_digest(self, digest: &[u8]) -> bool {
        digest.len() == self.digest_size()
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            HashFunction::Md5 => "MD5",
            HashFunction::Sha1 => "SHA1",
        }
    }

    /// Streams `reader` to the end through this algorithm's hasher.
    pub fn digest_reader<R: Read>(self, reader: R) -> io::Result<Vec<u8>> {
        match self {
            HashFunction::Md5 => stream::<Md5, R>(reader),
            HashFunction::Sha1 => stream::<Sha1, R>(reader),
        }
    }

    #[must_use]
    pub fn digest_bytes(self, data: &[u8]) -> Vec<u8> {
        match self {
            HashFunction::Md5 => Md5::digest(data).to_vec(),
            HashFunction::Sha1 => Sha1::digest(data).to_vec(),
        }
    }
}

fn stream<D: Digest, R: Read>(mut reader: R) -> io::Result<Vec<u8>> {
    let mut hasher = D::new();
    let mut buf = vec![0u8; BUFFER_SIZE];
    loop {
        match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => hasher.update(&buf[..n]),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(hasher.finalize().to_vec())
}

impl std::fmt::Display for HashFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for HashFunction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "MD5" => Ok(HashFunction::Md5),
            "SHA1" => Ok(HashFunction::Sha1),
            _ => Err(format!(
                "Unknown hash function '{}' (expected MD5 or SHA1)",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_sizes() {
        assert_eq!(HashFunction::Md5.digest_size(), 16);
        assert_eq!(HashFunction::Sha1.digest_size(), 20);
    }

    #[test]
    fn test_is_valid_digest() {
        for hf in [HashFunction::Md5, HashFunction::Sha1] {
            let size = hf.digest_size();
            assert!(hf.is_valid_digest(&vec![0u8; size]));
            assert!(!hf.is_valid_digest(&[]));
            assert!(!hf.is_valid_digest(&vec![0u8; size - 1]));
            assert!(!hf.is_valid_digest(&vec![0u8; size + 1]));
        }
        assert!(!HashFunction::Md5.is_valid_digest(&[0u8; 20]));
        assert!(!HashFunction::Sha1.is_valid_digest(&[0u8; 16]));
    }

    #[test]
    fn test_empty_input_digests() {
        let md5 = HashFunction::Md5.digest_reader(std::io::empty()).unwrap();
        assert_eq!(hex::encode(md5), "d41d8cd98f00b204e9800998ecf8427e");
        let sha1 = HashFunction::Sha1.digest_reader(std::io::empty()).unwrap();
        assert_eq!(hex::encode(sha1), "da39a3ee5e6b4b0d3255bfef95601890afd80709");
    }

    #[test]
    fn test_streamed_matches_one_shot() {
        let data: Vec<u8> = (0..200_000u32).map(|i| (i % 251) as u8).collect();
        for hf in [HashFunction::Md5, HashFunction::Sha1] {
            let streamed = hf.digest_reader(&data[..]).unwrap();
            assert_eq!(streamed, hf.digest_bytes(&data));
            assert!(hf.is_valid_digest(&streamed));
        }
    }

    #[test]
    fn test_parsing() {
        assert_eq!("MD5".parse::<HashFunction>().unwrap(), HashFunction::Md5);
        assert_eq!("sha1".parse::<HashFunction>().unwrap(), HashFunction::Sha1);
        assert!("SHA256".parse::<HashFunction>().is_err());
        assert_eq!(HashFunction::Sha1.to_string(), "SHA1");
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&HashFunction::Md5).unwrap();
        assert_eq!(json, "\"MD5\"");
        let parsed: HashFunction = serde_json::from_str("\"sha1\"").unwrap();
        assert_eq!(parsed, HashFunction::Sha1);
    }
}
