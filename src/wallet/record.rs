//! Persisted wallet record
//!
//! The record is a JSON object `{ "privateKey": ..., "smartWalletAddress": ... }`.
//! It is read at startup and fully overwritten at the end of every successful
//! bootstrap. Stores do no locking: two overlapping bootstraps against the same
//! location can lose an update.

use crate::{Error, Result};
use alloy::primitives::B256;
use async_trait::async_trait;
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, STANDARD};
use base64::engine::{DecodePaddingMode, GeneralPurposeConfig};
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Accepts unpadded input and non-canonical trailing bits. The alphabet is
/// strict: URL-safe `-`/`_` and stray characters are errors, not skipped.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Decoded bytes `[KEY_OFFSET, KEY_OFFSET + 32)` hold the secret.
const KEY_OFFSET: usize = 1;
const KEY_LEN: usize = 32;

/// Encode a secret for the `privateKey` field.
pub fn encode_private_key(secret: &B256) -> String {
    let mut bytes = Vec::with_capacity(KEY_OFFSET + KEY_LEN);
    bytes.resize(KEY_OFFSET, 0u8);
    bytes.extend_from_slice(secret.as_slice());
    STANDARD.encode(bytes)
}

/// Decode the `privateKey` field back into raw secret bytes.
///
/// The first decoded byte is skipped and the next 32 are the key. Anything
/// after that is ignored. Records written in plain `0x`-hex by older tooling
/// still decode here, to a different key than the one they spell out.
pub fn decode_private_key(encoded: &str) -> Result<B256> {
    let bytes = LENIENT_BASE64
        .decode(encoded.trim())
        .map_err(|e| Error::MalformedRecord(format!("privateKey is not valid base64: {}", e)))?;

    if bytes.len() < KEY_OFFSET + KEY_LEN {
        return Err(Error::MalformedRecord(format!(
            "privateKey decodes to {} bytes, expected at least {}",
            bytes.len(),
            KEY_OFFSET + KEY_LEN
        )));
    }

    Ok(B256::from_slice(&bytes[KEY_OFFSET..KEY_OFFSET + KEY_LEN]))
}

/// Wallet key and address as stored between runs
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smart_wallet_address: Option<String>,
}

impl WalletRecord {
    pub fn new(private_key: impl Into<String>, smart_wallet_address: impl Into<String>) -> Self {
        Self {
            private_key: Some(private_key.into()),
            smart_wallet_address: Some(smart_wallet_address.into()),
        }
    }

    /// Parse raw record contents; `location` only feeds the error message
    pub fn from_json(raw: &str, location: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| {
            Error::MalformedRecord(format!("Invalid JSON format in {}: {}", location, e))
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// The stored key, or `None` when the field is absent or blank
    pub fn decode_key(&self) -> Result<Option<B256>> {
        match self.private_key.as_deref().map(str::trim) {
            Some(encoded) if !encoded.is_empty() => decode_private_key(encoded).map(Some),
            _ => Ok(None),
        }
    }

    pub fn address(&self) -> Option<&str> {
        self.smart_wallet_address
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
    }
}

impl std::fmt::Debug for WalletRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletRecord")
            .field("private_key", &self.private_key.as_ref().map(|_| "[REDACTED]"))
            .field("smart_wallet_address", &self.smart_wallet_address)
            .finish()
    }
}

/// Storage for the wallet record
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Human-readable location, used in log lines and error messages
    fn location(&self) -> String;

    /// Read the record; `Ok(None)` when nothing has been stored yet
    async fn load(&self) -> Result<Option<WalletRecord>>;

    /// Replace the stored record
    async fn save(&self, record: &WalletRecord) -> Result<()>;
}

/// Record kept in a file on disk
#[derive(Debug, Clone)]
pub struct FileRecordStore {
    path: PathBuf,
}

impl FileRecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RecordStore for FileRecordStore {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    async fn load(&self) -> Result<Option<WalletRecord>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        WalletRecord::from_json(&raw, &self.location()).map(Some)
    }

    async fn save(&self, record: &WalletRecord) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, record.to_json()?).await?;
        Ok(())
    }
}

/// Record kept in memory, for embedding and tests
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    contents: Mutex<Option<String>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed raw contents, which need not be valid JSON
    pub fn with_contents(raw: impl Into<String>) -> Self {
        Self {
            contents: Mutex::new(Some(raw.into())),
        }
    }

    /// Raw contents as last written
    pub async fn contents(&self) -> Option<String> {
        self.contents.lock().await.clone()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    fn location(&self) -> String {
        "<memory>".to_string()
    }

    async fn load(&self) -> Result<Option<WalletRecord>> {
        let contents = self.contents.lock().await;
        contents
            .as_deref()
            .map(|raw| WalletRecord::from_json(raw, &self.location()))
            .transpose()
    }

    async fn save(&self, record: &WalletRecord) -> Result<()> {
        let json = record.to_json()?;
        *self.contents.lock().await = Some(json);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::b256;
    use tempfile::TempDir;

    const SECRET: B256 = b256!("ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80");

    #[test]
    fn decoded_key_is_byte_identical() {
        let encoded = encode_private_key(&SECRET);
        assert_eq!(decode_private_key(&encoded).unwrap(), SECRET);
    }

    #[test]
    fn decode_skips_first_byte_and_ignores_tail() {
        let mut bytes = vec![0xffu8];
        bytes.extend_from_slice(SECRET.as_slice());
        bytes.extend_from_slice(&[1, 2, 3]);
        let encoded = STANDARD.encode(&bytes);

        assert_eq!(decode_private_key(&encoded).unwrap(), SECRET);
    }

    #[test]
    fn decode_trims_surrounding_whitespace() {
        let encoded = format!("  {}\n", encode_private_key(&SECRET));
        assert_eq!(decode_private_key(&encoded).unwrap(), SECRET);
    }

    #[test]
    fn decode_keeps_offsets_for_hex_records() {
        // A plain hex key is read as base64 too; the result is not the hex key.
        let hex_form = format!("{}", SECRET);
        let decoded = decode_private_key(&hex_form).unwrap();
        assert_ne!(decoded, SECRET);
    }

    #[test]
    fn decode_rejects_short_or_invalid_input() {
        assert!(matches!(
            decode_private_key("AAAA"),
            Err(Error::MalformedRecord(_))
        ));
        assert!(matches!(
            decode_private_key("not base64!"),
            Err(Error::MalformedRecord(_))
        ));
    }

    #[test]
    fn decode_rejects_url_safe_and_stray_characters() {
        let url_safe = "_".repeat(48);
        assert!(matches!(
            decode_private_key(&url_safe),
            Err(Error::MalformedRecord(_))
        ));
        assert!(matches!(
            decode_private_key("AAAA-AAAA"),
            Err(Error::MalformedRecord(_))
        ));

        // Same bytes in the standard alphabet decode fine
        let standard = "/".repeat(48);
        assert_eq!(decode_private_key(&standard).unwrap(), B256::repeat_byte(0xff));
    }

    #[test]
    fn record_uses_camel_case_keys() {
        let record = WalletRecord::new("key", "0xabc");
        let json: serde_json::Value = serde_json::from_str(&record.to_json().unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "privateKey": "key", "smartWalletAddress": "0xabc" })
        );
    }

    #[test]
    fn blank_key_reads_as_missing() {
        let record = WalletRecord::from_json(
            r#"{"privateKey": "  ", "smartWalletAddress": "0xabc"}"#,
            "test",
        )
        .unwrap();
        assert!(record.decode_key().unwrap().is_none());
        assert_eq!(record.address(), Some("0xabc"));

        let empty = WalletRecord::from_json("{}", "test").unwrap();
        assert!(empty.decode_key().unwrap().is_none());
        assert!(empty.address().is_none());
    }

    #[test]
    fn malformed_json_names_location() {
        let err = WalletRecord::from_json("{ not json", "wallet_data.txt").unwrap_err();
        assert!(matches!(err, Error::MalformedRecord(ref msg) if msg.contains("wallet_data.txt")));
    }

    #[test]
    fn debug_redacts_key() {
        let record = WalletRecord::new(encode_private_key(&SECRET), "0xabc");
        let debug = format!("{:?}", record);
        assert!(!debug.contains(&encode_private_key(&SECRET)));
        assert!(debug.contains("[REDACTED]"));
    }

    #[tokio::test]
    async fn file_store_missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("wallet_data.txt");
        let store = FileRecordStore::new(&path);
        assert_eq!(store.path(), path.as_path());
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn file_store_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = FileRecordStore::new(dir.path().join("nested/agent/wallet_data.txt"));
        let record = WalletRecord::new(
            encode_private_key(&SECRET),
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266",
        );

        store.save(&record).await.unwrap();
        let loaded = store.load().await.unwrap().unwrap();

        assert_eq!(loaded, record);
        assert_eq!(loaded.decode_key().unwrap(), Some(SECRET));
    }

    #[tokio::test]
    async fn file_store_overwrites_previous_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("wallet_data.txt");
        std::fs::write(&path, r#"{"privateKey":"old","smartWalletAddress":"0xold","extra":1}"#)
            .unwrap();

        let store = FileRecordStore::new(&path);
        store.save(&WalletRecord::new("new", "0xnew")).await.unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert_eq!(raw, r#"{"privateKey":"new","smartWalletAddress":"0xnew"}"#);
    }

    #[tokio::test]
    async fn memory_store_reports_malformed_contents() {
        let store = MemoryRecordStore::with_contents("[1, 2");
        let err = store.load().await.unwrap_err();
        assert!(matches!(err, Error::MalformedRecord(_)));
    }
}
