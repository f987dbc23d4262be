//! Short digests used to keep derived identifiers unique.

use md5::Md5;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::ConfigError;

/// Produces the fixed-length digest spliced into `[hash]`.
///
/// Implementations must be pure: the same input always yields the same
/// digest, in every process.
pub trait HashDigest: Send + Sync {
    fn digest(&self, input: &[u8]) -> String;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Md5,
    Sha256,
}

impl HashAlgorithm {
    fn hash(self, input: &[u8]) -> Vec<u8> {
        match self {
            HashAlgorithm::Md5 => Md5::digest(input).to_vec(),
            HashAlgorithm::Sha256 => Sha256::digest(input).to_vec(),
        }
    }

    fn bits(self) -> u32 {
        match self {
            HashAlgorithm::Md5 => 128,
            HashAlgorithm::Sha256 => 256,
        }
    }
}

/// How raw hash bytes become text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestEncoding {
    Hex,
    Base26,
    Base32,
    Base36,
    Base49,
    Base52,
    Base58,
    Base62,
    #[default]
    Base64,
}

impl DigestEncoding {
    fn alphabet(self) -> &'static [u8] {
        match self {
            DigestEncoding::Hex => b"0123456789abcdef",
            DigestEncoding::Base26 => b"abcdefghijklmnopqrstuvwxyz",
            // no 0, l, i, o
            DigestEncoding::Base32 => b"123456789abcdefghjkmnpqrstuvwxyz",
            DigestEncoding::Base36 => b"0123456789abcdefghijklmnopqrstuvwxyz",
            // no l, I, O
            DigestEncoding::Base49 => b"abcdefghijkmnopqrstuvwxyzABCDEFGHJKLMNPQRSTUVWXYZ",
            DigestEncoding::Base52 => b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ",
            // no 0, l, I, O
            DigestEncoding::Base58 => b"123456789abcdefghijkmnopqrstuvwxyzABCDEFGHJKLMNPQRSTUVWXYZ",
            DigestEncoding::Base62 => {
                b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ"
            }
            DigestEncoding::Base64 => {
                b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ-_"
            }
        }
    }

    /// Most characters a digest of `bits` bits can fill in this alphabet.
    fn capacity(self, bits: u32) -> usize {
        let base = self.alphabet().len() as f64;
        (f64::from(bits) / base.log2()).ceil() as usize
    }
}

/// Digest settings: algorithm, alphabet, and output length.
///
/// The default is MD5 rendered in the URL-safe 64-character alphabet and cut
/// to five characters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DigestOptions {
    pub algorithm: HashAlgorithm,
    pub encoding: DigestEncoding,
    pub length: usize,
}

impl Default for DigestOptions {
    fn default() -> Self {
        Self {
            algorithm: HashAlgorithm::Md5,
            encoding: DigestEncoding::Base64,
            length: 5,
        }
    }
}

impl DigestOptions {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.length == 0 {
            return Err(ConfigError::ZeroDigestLength);
        }
        let max = self.encoding.capacity(self.algorithm.bits());
        if self.length > max {
            return Err(ConfigError::DigestTooLong {
                requested: self.length,
                max,
            });
        }
        Ok(())
    }
}

impl HashDigest for DigestOptions {
    fn digest(&self, input: &[u8]) -> String {
        let raw = self.algorithm.hash(input);
        let mut encoded = match self.encoding {
            DigestEncoding::Hex => raw.iter().map(|b| format!("{b:02x}")).collect(),
            other => encode_big_number(&raw, other.alphabet()),
        };
        encoded.truncate(self.length);
        encoded
    }
}

/// Render `bytes` as one little-endian number, most significant digit first.
fn encode_big_number(bytes: &[u8], alphabet: &[u8]) -> String {
    let base = alphabet.len() as u32;
    // Long division wants the most significant byte first.
    let mut number: Vec<u8> = bytes.iter().rev().copied().collect();
    let mut digits = Vec::new();

    while number.iter().any(|&b| b != 0) {
        let mut rem = 0u32;
        for byte in number.iter_mut() {
            let cur = (rem << 8) | u32::from(*byte);
            *byte = (cur / base) as u8;
            rem = cur % base;
        }
        digits.push(alphabet[rem as usize]);
    }

    digits.reverse();
    // Alphabet is ASCII
    digits.into_iter().map(char::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_digest_shape() {
        let d = DigestOptions::default().digest(b"src/a.cssfoo");
        assert_eq!(d.len(), 5);
        let alphabet = DigestEncoding::Base64.alphabet();
        assert!(d.bytes().all(|b| alphabet.contains(&b)), "{d}");
    }

    #[test]
    fn test_digest_is_stable() {
        let opts = DigestOptions::default();
        assert_eq!(opts.digest(b"x"), opts.digest(b"x"));
        assert_ne!(opts.digest(b"x"), opts.digest(b"y"));
    }

    #[test]
    fn test_hex_matches_md5() {
        let opts = DigestOptions {
            encoding: DigestEncoding::Hex,
            length: 32,
            ..DigestOptions::default()
        };
        assert_eq!(opts.digest(b""), "d41d8cd98f00b204e9800998ecf8427e");
    }

    #[test]
    fn test_big_number_encoding() {
        // 0x0100 little-endian is 1
        assert_eq!(encode_big_number(&[1, 0], b"0123456789"), "1");
        // 300 = 0x012c, stored little-endian
        assert_eq!(encode_big_number(&[0x2c, 0x01], b"0123456789"), "300");
        assert_eq!(encode_big_number(&[0, 0], b"0123456789"), "");
    }

    #[test]
    fn test_validate_length() {
        assert!(DigestOptions::default().validate().is_ok());
        let zero = DigestOptions {
            length: 0,
            ..DigestOptions::default()
        };
        assert!(matches!(zero.validate(), Err(ConfigError::ZeroDigestLength)));
        let long = DigestOptions {
            length: 23,
            ..DigestOptions::default()
        };
        assert!(matches!(
            long.validate(),
            Err(ConfigError::DigestTooLong { max: 22, .. })
        ));
    }
}
