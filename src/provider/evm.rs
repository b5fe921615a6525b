//! Wallet provider backed by a local signer and a JSON-RPC endpoint

use super::{ProviderRequest, WalletProvider, WalletProviderHandle, WalletService};
use crate::config::{Network, RpcConfig};
use crate::wallet::SecureWallet;
use crate::{Error, Result};
use alloy::primitives::{Address, B256, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::signers::Signature;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

/// Builds [`EvmWalletProvider`]s from the configured RPC endpoints
#[derive(Debug, Clone)]
pub struct EvmWalletService {
    rpc: RpcConfig,
}

impl EvmWalletService {
    pub fn new(rpc: RpcConfig) -> Self {
        Self { rpc }
    }

    fn rpc_url(&self, network: Network) -> Result<url::Url> {
        let raw = self.rpc.get(network).ok_or_else(|| {
            Error::Config(format!("RPC URL not configured for network {}", network))
        })?;

        raw.parse()
            .map_err(|e| Error::Config(format!("Invalid RPC URL for {}: {}", network, e)))
    }
}

#[async_trait]
impl WalletService for EvmWalletService {
    async fn configure(&self, request: ProviderRequest) -> Result<WalletProviderHandle> {
        let ProviderRequest {
            network,
            credentials,
            signer,
        } = request;

        if self.rpc.is_public_fallback(network) {
            warn!(network = %network, "Using public RPC (rate limited)");
        }
        let url = self.rpc_url(network)?;

        let provider = ProviderBuilder::new()
            .wallet(signer.wallet().clone())
            .connect_http(url)
            .erased();

        let chain_id = provider
            .get_chain_id()
            .await
            .map_err(|e| Error::Provider(format!("Failed to get chain ID: {}", e)))?;

        if chain_id != network.chain_id() {
            return Err(Error::Provider(format!(
                "RPC endpoint reports chain {} but {} is chain {}",
                chain_id,
                network,
                network.chain_id()
            )));
        }

        info!(
            network = %network,
            chain_id = chain_id,
            api_key_name = %credentials.api_key_name,
            address = %signer.address(),
            "EVM wallet provider configured"
        );

        Ok(Arc::new(EvmWalletProvider {
            network,
            signer,
            provider,
        }))
    }
}

/// Wallet provider whose address is the signer's own address
pub struct EvmWalletProvider {
    network: Network,
    signer: Arc<SecureWallet>,
    provider: DynProvider,
}

#[async_trait]
impl WalletProvider for EvmWalletProvider {
    fn name(&self) -> &'static str {
        "evm_wallet_provider"
    }

    fn network(&self) -> Network {
        self.network
    }

    async fn address(&self) -> Result<Address> {
        Ok(self.signer.address())
    }

    async fn balance(&self) -> Result<U256> {
        self.provider
            .get_balance(self.signer.address())
            .await
            .map_err(|e| Error::Provider(format!("Failed to get balance: {}", e)))
    }

    async fn sign_message(&self, message: &[u8]) -> Result<Signature> {
        self.signer.sign_message(message).await
    }

    async fn sign_hash(&self, hash: &B256) -> Result<Signature> {
        self.signer.sign_hash(hash).await
    }
}

impl std::fmt::Debug for EvmWalletProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvmWalletProvider")
            .field("network", &self.network)
            .field("address", &self.signer.address())
            .finish()
    }
}
