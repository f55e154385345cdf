//! Typed identifiers for chains, contract addresses and 32-byte hashes
//!
//! Addresses are stored as raw bytes so ordering matches the lower-cased hex ordering
//! the pool contracts use to sort their two tokens. Rendering is always EIP-55
//! checksummed.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha3::{Digest, Keccak256};
use std::fmt;
use std::str::FromStr;

use crate::errors::TypesError;

/// Keccak-256 digest as used by the EVM (not the NIST SHA3-256 padding)
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

const fn hex_nibble(c: u8) -> u8 {
    match c {
        b'0'..=b'9' => c - b'0',
        b'a'..=b'f' => c - b'a' + 10,
        b'A'..=b'F' => c - b'A' + 10,
        _ => panic!("invalid hex digit"),
    }
}

/// Decode a hex literal at compile time; checksum casing is not verified
const fn decode_hex_const<const N: usize>(s: &str) -> [u8; N] {
    let bytes = s.as_bytes();
    let start = if bytes.len() >= 2 && bytes[0] == b'0' && (bytes[1] == b'x' || bytes[1] == b'X') {
        2
    } else {
        0
    };
    assert!(bytes.len() - start == N * 2, "hex literal has the wrong length");

    let mut out = [0u8; N];
    let mut i = 0;
    while i < N {
        out[i] = (hex_nibble(bytes[start + 2 * i]) << 4) | hex_nibble(bytes[start + 2 * i + 1]);
        i += 1;
    }
    out
}

/// EVM chain identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(pub u64);

impl ChainId {
    pub const ETHEREUM: Self = Self(1);
    pub const BSC: Self = Self(56);
    pub const BSC_TESTNET: Self = Self(97);
    pub const SEPOLIA: Self = Self(11_155_111);

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ChainId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// 20-byte EVM account or contract address
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; 20]);

impl Address {
    pub const ZERO: Self = Self([0u8; 20]);

    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Address from a hex literal, for constants
    pub const fn from_hex_const(s: &str) -> Self {
        Self(decode_hex_const::<20>(s))
    }

    /// Take the low 20 bytes of a 32-byte word (CREATE2 and ABI layouts)
    pub fn from_word(word: &[u8; 32]) -> Self {
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&word[12..]);
        Self(bytes)
    }

    /// EIP-55 mixed-case checksum encoding with `0x` prefix
    pub fn to_checksum(&self) -> String {
        let lower = hex::encode(self.0);
        let hash = keccak256(lower.as_bytes());

        let mut out = String::with_capacity(42);
        out.push_str("0x");
        for (i, c) in lower.chars().enumerate() {
            let nibble = if i % 2 == 0 {
                hash[i / 2] >> 4
            } else {
                hash[i / 2] & 0x0f
            };
            if c.is_ascii_alphabetic() && nibble >= 8 {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
        }
        out
    }
}

impl FromStr for Address {
    type Err = TypesError;

    /// Accepts `0x`-prefixed or bare hex. All-lower or all-upper input is taken as-is;
    /// mixed case must match the EIP-55 checksum.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        if body.len() != 40 {
            return Err(TypesError::InvalidAddress(s.to_string()));
        }

        let mut bytes = [0u8; 20];
        hex::decode_to_slice(body, &mut bytes)
            .map_err(|_| TypesError::InvalidAddress(s.to_string()))?;
        let address = Self(bytes);

        let has_lower = body.chars().any(|c| c.is_ascii_lowercase());
        let has_upper = body.chars().any(|c| c.is_ascii_uppercase());
        if has_lower && has_upper && address.to_checksum()[2..] != *body {
            return Err(TypesError::InvalidChecksum(s.to_string()));
        }

        Ok(address)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_checksum())
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_checksum())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// 32-byte hash (init-code hashes, salts)
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hash256([u8; 32]);

impl Hash256 {
    pub const ZERO: Self = Self([0u8; 32]);

    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub const fn from_hex_const(s: &str) -> Self {
        Self(decode_hex_const::<32>(s))
    }
}

impl FromStr for Hash256 {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = s.strip_prefix("0x").unwrap_or(s);
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(body, &mut bytes).map_err(|_| TypesError::InvalidHash(s.to_string()))?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash256({self})")
    }
}

impl Serialize for Hash256 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Hash256 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keccak_empty_input() {
        assert_eq!(
            hex::encode(keccak256(b"")),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn test_checksum_roundtrip() {
        let weth: Address = "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2".parse().unwrap();
        assert_eq!(weth.to_string(), "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2");

        let reparsed: Address = weth.to_string().parse().unwrap();
        assert_eq!(reparsed, weth);
    }

    #[test]
    fn test_bad_checksum_rejected() {
        let result = "0xC02aaA39b223FE8D0A0E5C4F27eAD9083C756cc2".parse::<Address>();
        assert!(matches!(result, Err(TypesError::InvalidChecksum(_))));
        // a single miscased letter is enough
        let result = "0xC02aaA39b223FE8D0A0E5C4F27eAD9083C756Cc2".parse::<Address>();
        assert!(matches!(result, Err(TypesError::InvalidChecksum(_))));
    }

    #[test]
    fn test_invalid_length_rejected() {
        assert!(matches!(
            "0x1234".parse::<Address>(),
            Err(TypesError::InvalidAddress(_))
        ));
        assert!(matches!(
            "0xzz00000000000000000000000000000000000001".parse::<Address>(),
            Err(TypesError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_ordering_matches_lowercase_hex() {
        let a: Address = "0x6B175474E89094C44Da98b954EedeAC495271d0F".parse().unwrap();
        let b: Address = "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48".parse().unwrap();
        assert!(a < b);
        assert!(a.to_string().to_lowercase() < b.to_string().to_lowercase());
    }

    #[test]
    fn test_hash_parse_and_display() {
        let s = "0x96e8ac4277198ff8b6f785478aa9a39f403cb768dd02cbee326c3e7da348845f";
        let hash: Hash256 = s.parse().unwrap();
        assert_eq!(hash.to_string(), s);
        assert!("0x1234".parse::<Hash256>().is_err());
    }

    #[test]
    fn test_const_literals_match_parser() {
        const WETH: Address = Address::from_hex_const("0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2");
        assert_eq!(WETH, "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2".parse().unwrap());

        const HASH: Hash256 =
            Hash256::from_hex_const("96e8ac4277198ff8b6f785478aa9a39f403cb768dd02cbee326c3e7da348845f");
        assert_eq!(
            HASH.to_string(),
            "0x96e8ac4277198ff8b6f785478aa9a39f403cb768dd02cbee326c3e7da348845f"
        );
    }

    #[test]
    fn test_serde_uses_checksum_string() {
        let addr: Address = "0x0000000000000000000000000000000000000001".parse().unwrap();
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, "\"0x0000000000000000000000000000000000000001\"");
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);
    }
}
