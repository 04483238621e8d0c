//! Row models for the hosted wallet store

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// One wallet row, as stored by the backend.
///
/// The `private_key` column may arrive either as a JSON array of byte
/// values or as a JSON-encoded string wrapping such an array; both forms
/// normalize to raw bytes at deserialization time, so nothing downstream
/// branches on representation.
#[derive(Clone, Serialize, Deserialize)]
pub struct WalletRecord {
    pub user_id: String,
    #[serde(default)]
    pub email: Option<String>,
    pub public_key: String,
    #[serde(rename = "private_key", deserialize_with = "deserialize_secret_key")]
    pub secret_key: Vec<u8>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

// Manual Debug: secret key material must never end up in logs.
impl fmt::Debug for WalletRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletRecord")
            .field("user_id", &self.user_id)
            .field("email", &self.email)
            .field("public_key", &self.public_key)
            .field("secret_key", &format!("[redacted; {} bytes]", self.secret_key.len()))
            .field("created_at", &self.created_at)
            .finish()
    }
}

fn deserialize_secret_key<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum SecretKeyField {
        Bytes(Vec<u8>),
        Encoded(String),
    }

    match SecretKeyField::deserialize(deserializer)? {
        SecretKeyField::Bytes(bytes) => Ok(bytes),
        SecretKeyField::Encoded(text) => serde_json::from_str(&text).map_err(|e| {
            serde::de::Error::custom(format!("string-wrapped secret key is not a byte array: {}", e))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_key_as_byte_array() {
        let row: WalletRecord = serde_json::from_value(serde_json::json!({
            "user_id": "u1",
            "public_key": "Addr1",
            "private_key": [1, 2, 3],
        }))
        .expect("array form");
        assert_eq!(row.secret_key, vec![1, 2, 3]);
        assert_eq!(row.email, None);
    }

    #[test]
    fn test_secret_key_as_json_string() {
        let row: WalletRecord = serde_json::from_value(serde_json::json!({
            "user_id": "u1",
            "public_key": "Addr1",
            "private_key": "[4, 5, 6]",
        }))
        .expect("string form");
        assert_eq!(row.secret_key, vec![4, 5, 6]);
    }

    #[test]
    fn test_secret_key_bad_string_rejected() {
        let result: Result<WalletRecord, _> = serde_json::from_value(serde_json::json!({
            "user_id": "u1",
            "public_key": "Addr1",
            "private_key": "not json",
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_debug_redacts_secret_key() {
        let row: WalletRecord = serde_json::from_value(serde_json::json!({
            "user_id": "u1",
            "public_key": "Addr1",
            "private_key": [9, 9, 9],
        }))
        .expect("row");
        let debug = format!("{:?}", row);
        assert!(debug.contains("redacted"));
        assert!(!debug.contains("9, 9, 9"));
    }
}
