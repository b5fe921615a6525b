//! Built-in wallet actions
//!
//! SECURITY NOTE:
//! - Signing goes through the wallet provider only; no private key exposure.
//! - Returns addresses, hashes and signatures, never raw key material.

use super::{Action, ActionProvider};
use crate::provider::WalletProvider;
use crate::{Error, Result};
use alloy::primitives::{eip191_hash_message, hex, keccak256, B256};
use async_trait::async_trait;
use schemars::{schema_for, JsonSchema};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct EmptyArgs {}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SignMessageInput {
    /// UTF-8 message to sign
    pub message: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SignHashInput {
    /// 0x-prefixed 32-byte digest to sign as-is
    pub hash: Option<String>,
    /// 0x-prefixed bytes, hashed with keccak256 before signing
    pub data: Option<String>,
}

fn decode_hex(value: &str) -> Result<Vec<u8>> {
    hex::decode(value.trim()).map_err(|e| Error::InvalidArgument(format!("Invalid hex: {}", e)))
}

/// Report provider, network, address and native balance
pub struct GetWalletDetailsAction;

#[async_trait]
impl Action for GetWalletDetailsAction {
    fn name(&self) -> &'static str {
        "get_wallet_details"
    }

    fn description(&self) -> &'static str {
        "Get the wallet address, network and native balance (read-only)."
    }

    fn parameters(&self) -> Value {
        schema_for!(EmptyArgs).into()
    }

    async fn invoke(&self, provider: &dyn WalletProvider, _args: Value) -> Result<Value> {
        let address = provider.address().await?;
        let balance = provider.balance().await?;
        let network = provider.network();

        Ok(json!({
            "provider": provider.name(),
            "network": network.name(),
            "chain_id": network.chain_id(),
            "address": address.to_checksum(None),
            "balance_wei": balance.to_string(),
        }))
    }
}

/// EIP-191 personal message signing
pub struct SignMessageAction;

#[async_trait]
impl Action for SignMessageAction {
    fn name(&self) -> &'static str {
        "sign_message"
    }

    fn description(&self) -> &'static str {
        "Sign an EIP-191 message. Returns signature and message hash."
    }

    fn parameters(&self) -> Value {
        schema_for!(SignMessageInput).into()
    }

    async fn invoke(&self, provider: &dyn WalletProvider, args: Value) -> Result<Value> {
        let input: SignMessageInput = serde_json::from_value(args)
            .map_err(|e| Error::InvalidArgument(format!("sign_message: {}", e)))?;

        let hash = eip191_hash_message(input.message.as_bytes());
        let signature = provider.sign_message(input.message.as_bytes()).await?;
        let address = provider.address().await?;

        Ok(json!({
            "address": address.to_checksum(None),
            "message_hash": hex::encode_prefixed(hash),
            "signature": hex::encode_prefixed(signature.as_bytes()),
        }))
    }
}

/// Raw digest signing, for transaction hashes and other prehashed payloads
pub struct SignHashAction;

#[async_trait]
impl Action for SignHashAction {
    fn name(&self) -> &'static str {
        "sign_hash"
    }

    fn description(&self) -> &'static str {
        "Sign a 32-byte hash, or the keccak256 of raw bytes. Returns signature and hash."
    }

    fn parameters(&self) -> Value {
        schema_for!(SignHashInput).into()
    }

    async fn invoke(&self, provider: &dyn WalletProvider, args: Value) -> Result<Value> {
        let input: SignHashInput = serde_json::from_value(args)
            .map_err(|e| Error::InvalidArgument(format!("sign_hash: {}", e)))?;

        let (hash, source) = match (input.hash, input.data) {
            (Some(hash), _) => {
                let bytes = decode_hex(&hash)?;
                if bytes.len() != 32 {
                    return Err(Error::InvalidArgument("hash must be 32 bytes".to_string()));
                }
                (B256::from_slice(&bytes), "hash")
            }
            (None, Some(data)) => (keccak256(decode_hex(&data)?), "data"),
            (None, None) => {
                return Err(Error::InvalidArgument("Missing hash or data".to_string()));
            }
        };

        let signature = provider.sign_hash(&hash).await?;
        let address = provider.address().await?;

        Ok(json!({
            "address": address.to_checksum(None),
            "hash": hex::encode_prefixed(hash),
            "source": source,
            "signature": hex::encode_prefixed(signature.as_bytes()),
        }))
    }
}

/// Wallet actions; not registered unless asked for
#[derive(Debug, Default, Clone, Copy)]
pub struct WalletActionProvider;

impl ActionProvider for WalletActionProvider {
    fn name(&self) -> &'static str {
        "wallet"
    }

    fn actions(&self) -> Vec<Arc<dyn Action>> {
        vec![
            Arc::new(GetWalletDetailsAction),
            Arc::new(SignMessageAction),
            Arc::new(SignHashAction),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toolkit::tests::StaticProvider;
    use crate::toolkit::AgentToolkit;
    use crate::wallet::SecureWallet;
    use alloy::signers::Signature;

    const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn toolkit() -> AgentToolkit {
        let provider = Arc::new(StaticProvider {
            signer: SecureWallet::from_hex(TEST_KEY).unwrap(),
        });
        AgentToolkit::from_providers(provider, vec![Box::new(WalletActionProvider)]).unwrap()
    }

    #[tokio::test]
    async fn wallet_details_report_address_and_balance() {
        let out = toolkit()
            .invoke("get_wallet_details", json!({}))
            .await
            .unwrap();

        assert_eq!(
            out["address"].as_str().unwrap().to_lowercase(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
        assert_eq!(out["network"], "base-sepolia");
        assert_eq!(out["chain_id"], 84532);
        assert_eq!(out["balance_wei"], "1000000000000000");
    }

    #[tokio::test]
    async fn sign_message_signature_recovers_to_wallet() {
        let out = toolkit()
            .invoke("sign_message", json!({ "message": "hello" }))
            .await
            .unwrap();

        let sig_bytes = hex::decode(out["signature"].as_str().unwrap()).unwrap();
        let signature = Signature::from_raw(&sig_bytes).unwrap();
        let recovered = signature.recover_address_from_msg("hello").unwrap();

        assert_eq!(
            recovered.to_checksum(None),
            out["address"].as_str().unwrap()
        );
        assert!(!out.to_string().contains("ac0974bec"));
    }

    #[tokio::test]
    async fn sign_message_requires_message() {
        let err = toolkit()
            .invoke("sign_message", json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn sign_hash_signature_recovers_from_prehash() {
        let hash = keccak256("transfer");
        let out = toolkit()
            .invoke("sign_hash", json!({ "hash": hex::encode_prefixed(hash) }))
            .await
            .unwrap();

        let sig_bytes = hex::decode(out["signature"].as_str().unwrap()).unwrap();
        let signature = Signature::from_raw(&sig_bytes).unwrap();
        let recovered = signature.recover_address_from_prehash(&hash).unwrap();

        assert_eq!(
            recovered.to_checksum(None),
            out["address"].as_str().unwrap()
        );
        assert_eq!(out["source"], "hash");
    }

    #[tokio::test]
    async fn sign_hash_hashes_raw_data() {
        let out = toolkit()
            .invoke("sign_hash", json!({ "data": "0xdeadbeef" }))
            .await
            .unwrap();

        let expected = keccak256([0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(out["hash"], hex::encode_prefixed(expected));
        assert_eq!(out["source"], "data");
    }

    #[tokio::test]
    async fn sign_hash_rejects_bad_input() {
        let toolkit = toolkit();
        let short = toolkit.invoke("sign_hash", json!({ "hash": "0x1234" })).await;
        assert!(matches!(short, Err(Error::InvalidArgument(ref m)) if m.contains("32 bytes")));

        let missing = toolkit.invoke("sign_hash", json!({})).await;
        assert!(matches!(missing, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn parameters_are_object_schemas() {
        let info = toolkit().actions();
        let names: Vec<_> = info.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["get_wallet_details", "sign_hash", "sign_message"]);
        for action in info {
            assert_eq!(action.parameters["type"], "object");
            assert_eq!(action.provider, "wallet");
        }
    }
}
