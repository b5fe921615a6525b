//! Secure wallet implementation
//!
//! SECURITY: This is the ONLY place where private keys exist in decoded form.
//! - Keys are held in alloy's PrivateKeySigner
//! - The only export is the encoded form written to the wallet record
//! - Keys are never logged

use crate::{Error, Result};
use alloy::network::EthereumWallet;
use alloy::primitives::{Address, B256};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::{Signature, SignerSync};

/// Signer identity derived from a private key
///
/// The private key is:
/// - Stored in alloy's PrivateKeySigner
/// - Never serialized (no Serialize impl)
/// - Only accessible via signing operations and [`SecureWallet::encoded_key`]
pub struct SecureWallet {
    signer: PrivateKeySigner,
    /// Public address (safe to expose)
    address: Address,
    /// Ethereum wallet for alloy integration
    wallet: EthereumWallet,
}

impl SecureWallet {
    fn from_signer(signer: PrivateKeySigner) -> Self {
        let address = signer.address();
        let wallet = EthereumWallet::from(signer.clone());

        Self {
            signer,
            address,
            wallet,
        }
    }

    /// Create a wallet from a hex-encoded private key, with or without 0x prefix
    pub fn from_hex(key_hex: &str) -> Result<Self> {
        let key_hex = key_hex.trim();
        let key_hex = key_hex.strip_prefix("0x").unwrap_or(key_hex);

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| Error::Wallet(format!("Invalid private key: {}", e)))?;

        Ok(Self::from_signer(signer))
    }

    /// Create a wallet from raw 32-byte secret material
    pub fn from_bytes(secret: &B256) -> Result<Self> {
        let signer = PrivateKeySigner::from_bytes(secret)
            .map_err(|e| Error::Wallet(format!("Invalid private key: {}", e)))?;

        Ok(Self::from_signer(signer))
    }

    /// Generate a fresh random key
    pub fn random() -> Self {
        Self::from_signer(PrivateKeySigner::random())
    }

    /// Get the public address (safe to share)
    pub fn address(&self) -> Address {
        self.address
    }

    /// Get the address as a checksummed string
    pub fn address_string(&self) -> String {
        self.address.to_checksum(None)
    }

    /// Get a reference to the EthereumWallet for use with alloy providers
    pub fn wallet(&self) -> &EthereumWallet {
        &self.wallet
    }

    /// The private key in the encoding used by the wallet record
    pub fn encoded_key(&self) -> String {
        super::record::encode_private_key(&self.signer.to_bytes())
    }

    /// Sign a message hash
    pub async fn sign_hash(&self, hash: &B256) -> Result<Signature> {
        self.signer
            .sign_hash_sync(hash)
            .map_err(|e| Error::Wallet(format!("Signing failed: {}", e)))
    }

    /// Sign an EIP-191 personal message
    pub async fn sign_message(&self, message: &[u8]) -> Result<Signature> {
        self.signer
            .sign_message_sync(message)
            .map_err(|e| Error::Wallet(format!("Signing failed: {}", e)))
    }

    #[cfg(test)]
    pub(crate) fn secret_bytes(&self) -> B256 {
        self.signer.to_bytes()
    }
}

// Implement Debug manually to avoid exposing the signer
impl std::fmt::Debug for SecureWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecureWallet")
            .field("address", &self.address)
            .field("signer", &"[REDACTED]")
            .finish()
    }
}
