//! Wallet provider boundary
//!
//! A [`WalletService`] turns credentials, a network and a signer into a live
//! [`WalletProvider`]. The bootstrapper only talks to these traits, so the
//! hosted service can be swapped for the local alloy-backed one or a test
//! double.

mod evm;

pub use evm::{EvmWalletProvider, EvmWalletService};

use crate::config::{Network, ServiceCredentials};
use crate::wallet::SecureWallet;
use crate::Result;
use alloy::primitives::{Address, B256, U256};
use alloy::signers::Signature;
use async_trait::async_trait;
use std::sync::Arc;

/// Shared handle to a live wallet provider
pub type WalletProviderHandle = Arc<dyn WalletProvider>;

/// Blockchain account operations exposed by a configured wallet
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Provider implementation name, for logs and wallet details
    fn name(&self) -> &'static str;

    fn network(&self) -> Network;

    /// Address of the wallet this provider operates
    async fn address(&self) -> Result<Address>;

    /// Native token balance in wei
    async fn balance(&self) -> Result<U256>;

    /// EIP-191 personal message signature
    async fn sign_message(&self, message: &[u8]) -> Result<Signature>;

    /// Raw signature over a 32-byte digest, no prefixing
    async fn sign_hash(&self, hash: &B256) -> Result<Signature>;
}

/// Everything a wallet service needs to hand out a provider
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    pub network: Network,
    pub credentials: ServiceCredentials,
    pub signer: Arc<SecureWallet>,
}

/// External service that provisions wallet providers
#[async_trait]
pub trait WalletService: Send + Sync {
    async fn configure(&self, request: ProviderRequest) -> Result<WalletProviderHandle>;
}
