//! Canonical encodings for BN254 scalar field elements.
//!
//! The canonical byte encoding is 32 bytes big-endian, reduced modulo the
//! field order. JSON and other wire representations use decimal strings.

use ark_bn254::Fr;
use ark_ff::{BigInteger, PrimeField};

/// Encode a field element as its canonical 32-byte big-endian form.
pub fn fr_to_be_bytes(value: &Fr) -> [u8; 32] {
    let mut bytes = [0u8; 32];
    let repr = value.into_bigint().to_bytes_be();
    bytes[32 - repr.len()..].copy_from_slice(&repr);
    bytes
}

/// Decode a big-endian byte string into a field element, reducing mod q.
pub fn fr_from_be_bytes(bytes: &[u8]) -> Fr {
    Fr::from_be_bytes_mod_order(bytes)
}

/// Serde adapter serializing an `Fr` as a decimal string.
pub mod decimal {
    use std::str::FromStr;

    use ark_bn254::Fr;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Fr, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Fr, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Fr::from_str(&s).map_err(|_| de::Error::custom("invalid decimal field element"))
    }
}

/// Serde adapter serializing a `Vec<Fr>` as decimal strings.
pub mod decimal_seq {
    use std::str::FromStr;

    use ark_bn254::Fr;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(values: &[Fr], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(values.iter().map(|v| v.to_string()))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Fr>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let strings: Vec<String> = Vec::deserialize(deserializer)?;
        strings
            .iter()
            .map(|s| {
                Fr::from_str(s).map_err(|_| de::Error::custom("invalid decimal field element"))
            })
            .collect()
    }
}
