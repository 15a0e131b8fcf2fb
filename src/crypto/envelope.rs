//! The `Envelope` type: everything needed to decrypt one payload
//! except the passphrase.
//!
//! Serialized as a JSON object with four base64 string fields:
//!
//! ```text
//! {"salt": "...", "nonce": "...", "ciphertext": "...", "tag": "..."}
//! ```

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// One encrypted payload.
///
/// Field lengths are not checked at deserialization time; `decrypt`
/// rejects anything malformed with the same error as a wrong passphrase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// PBKDF2 salt (16 bytes).
    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    pub salt: Vec<u8>,

    /// AES-GCM nonce (12 bytes).
    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    pub nonce: Vec<u8>,

    /// Ciphertext, same length as the plaintext.
    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    pub ciphertext: Vec<u8>,

    /// AES-GCM authentication tag (16 bytes).
    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    pub tag: Vec<u8>,
}

// ---------------------------------------------------------------------------
// Serde helpers for base64-encoded Vec<u8> fields
// ---------------------------------------------------------------------------

fn base64_encode<S>(data: &[u8], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let encoded = BASE64.encode(data);
    serializer.serialize_str(&encoded)
}

fn base64_decode<'de, D>(deserializer: D) -> std::result::Result<Vec<u8>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    BASE64.decode(&s).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Envelope {
        Envelope {
            salt: vec![1u8; 16],
            nonce: vec![2u8; 12],
            ciphertext: b"hello".to_vec(),
            tag: vec![3u8; 16],
        }
    }

    #[test]
    fn serializes_as_four_base64_strings() {
        let json: serde_json::Value = serde_json::to_value(sample()).unwrap();
        let obj = json.as_object().unwrap();

        assert_eq!(obj.len(), 4);
        assert_eq!(obj["ciphertext"], "aGVsbG8=");
        assert_eq!(obj["salt"], BASE64.encode([1u8; 16]));
        assert!(obj["nonce"].is_string());
        assert!(obj["tag"].is_string());
    }

    #[test]
    fn rejects_invalid_base64() {
        let json = r#"{"salt":"!!","nonce":"AA==","ciphertext":"AA==","tag":"AA=="}"#;
        assert!(serde_json::from_str::<Envelope>(json).is_err());
    }

    #[test]
    fn rejects_missing_field() {
        let json = r#"{"salt":"AA==","nonce":"AA==","ciphertext":"AA=="}"#;
        assert!(serde_json::from_str::<Envelope>(json).is_err());
    }
}
