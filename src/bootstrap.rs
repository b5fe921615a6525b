//! Wallet bootstrapper
//!
//! Sequences the whole setup: read the persisted wallet record, settle on a
//! private key, ask the wallet service for a provider, build the agent
//! toolkit, and write the record back.
//!
//! Nothing here retries. Any failure aborts the run and is returned to the
//! caller; the record is only written once the provider has reported its
//! address.

use crate::config::{BootstrapConfig, RpcConfig};
use crate::provider::{EvmWalletService, ProviderRequest, WalletProviderHandle, WalletService};
use crate::toolkit::{ActionProvider, AgentToolkit};
use crate::wallet::{FileRecordStore, RecordStore, SecureWallet, WalletRecord};
use crate::{Error, Result};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tracing::{debug, info};

/// Where the signing key came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    /// Decoded from the wallet record
    Stored,
    /// Taken from the fallback key in the configuration
    Environment,
    /// Freshly generated for this run
    Generated,
}

impl KeySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeySource::Stored => "stored",
            KeySource::Environment => "environment",
            KeySource::Generated => "generated",
        }
    }
}

/// Signer plus the source of its key
#[derive(Debug)]
pub struct ResolvedKey {
    pub wallet: SecureWallet,
    pub source: KeySource,
}

/// Pick the key for this run
///
/// A key in the record always wins. With no usable stored key, a record that
/// still names a wallet address is refused: the address cannot be tied back to
/// any other key. Otherwise the fallback key is used, or a new one generated.
pub fn resolve_key(
    record: Option<&WalletRecord>,
    fallback: Option<&SecretString>,
    location: &str,
) -> Result<ResolvedKey> {
    if let Some(record) = record {
        if let Some(secret) = record.decode_key()? {
            return Ok(ResolvedKey {
                wallet: SecureWallet::from_bytes(&secret)?,
                source: KeySource::Stored,
            });
        }

        if record.address().is_some() {
            return Err(Error::AmbiguousRecord(format!(
                "Smart wallet found but no private key provided. Either provide the private key, or delete {} and try again.",
                location
            )));
        }
    }

    if let Some(key) = fallback {
        return Ok(ResolvedKey {
            wallet: SecureWallet::from_hex(key.expose_secret())?,
            source: KeySource::Environment,
        });
    }

    Ok(ResolvedKey {
        wallet: SecureWallet::random(),
        source: KeySource::Generated,
    })
}

/// Prepares the agent toolkit and wallet provider
pub struct WalletBootstrapper {
    config: BootstrapConfig,
    store: Arc<dyn RecordStore>,
    service: Arc<dyn WalletService>,
    action_providers: Vec<Box<dyn ActionProvider>>,
}

impl WalletBootstrapper {
    pub fn new(
        config: BootstrapConfig,
        store: Arc<dyn RecordStore>,
        service: Arc<dyn WalletService>,
    ) -> Self {
        Self {
            config,
            store,
            service,
            action_providers: Vec::new(),
        }
    }

    /// File-backed record at the configured path, alloy-backed provider
    pub fn from_config(config: BootstrapConfig, rpc: RpcConfig) -> Self {
        let store = Arc::new(FileRecordStore::new(config.wallet_data_path.clone()));
        let service = Arc::new(EvmWalletService::new(rpc));
        Self::new(config, store, service)
    }

    /// Actions to register on the toolkit (none by default)
    pub fn with_action_providers(mut self, providers: Vec<Box<dyn ActionProvider>>) -> Self {
        self.action_providers = providers;
        self
    }

    /// Run the setup and hand back the toolkit and provider
    pub async fn prepare(self) -> Result<(AgentToolkit, WalletProviderHandle)> {
        let Self {
            config,
            store,
            service,
            action_providers,
        } = self;
        let location = store.location();

        info!(
            network = %config.network,
            testnet = config.network.is_testnet(),
            api_key_name = %config.credentials.api_key_name,
            wallet_data = %location,
            "Preparing agent toolkit"
        );

        let record = store.load().await?;
        debug!(found = record.is_some(), "Loaded wallet record");

        let ResolvedKey { wallet, source } = resolve_key(
            record.as_ref(),
            config.fallback_private_key.as_ref(),
            &location,
        )?;
        info!(
            key_source = source.as_str(),
            signer = %wallet.address(),
            "Resolved signer"
        );

        let signer = Arc::new(wallet);
        let provider = service
            .configure(ProviderRequest {
                network: config.network,
                credentials: config.credentials.clone(),
                signer: Arc::clone(&signer),
            })
            .await?;
        info!(provider = provider.name(), network = %provider.network(), "Wallet provider ready");

        let toolkit = AgentToolkit::from_providers(Arc::clone(&provider), action_providers)?;

        let smart_wallet_address = provider.address().await?;
        info!(address = %smart_wallet_address, "Smart wallet address");

        store
            .save(&WalletRecord::new(
                signer.encoded_key(),
                smart_wallet_address.to_checksum(None),
            ))
            .await?;
        debug!(wallet_data = %location, "Saved wallet record");

        Ok((toolkit, provider))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::encode_private_key;
    use alloy::primitives::b256;

    const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn stored_key_wins_over_fallback() {
        let secret = b256!("59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d");
        let record = WalletRecord::new(encode_private_key(&secret), "0xabc");
        let fallback = SecretString::from(TEST_KEY.to_string());

        let resolved = resolve_key(Some(&record), Some(&fallback), "wallet_data.txt").unwrap();

        assert_eq!(resolved.source, KeySource::Stored);
        assert_eq!(resolved.wallet.secret_bytes(), secret);
    }

    #[test]
    fn fallback_used_without_record() {
        let fallback = SecretString::from(TEST_KEY.to_string());
        let resolved = resolve_key(None, Some(&fallback), "wallet_data.txt").unwrap();

        assert_eq!(resolved.source, KeySource::Environment);
        assert_eq!(
            resolved.wallet.address_string().to_lowercase(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }

    #[test]
    fn empty_record_generates_key() {
        let record = WalletRecord::default();
        let resolved = resolve_key(Some(&record), None, "wallet_data.txt").unwrap();
        assert_eq!(resolved.source, KeySource::Generated);
    }

    #[test]
    fn address_without_key_is_ambiguous() {
        let record = WalletRecord {
            private_key: None,
            smart_wallet_address: Some("0xabc".to_string()),
        };
        let fallback = SecretString::from(TEST_KEY.to_string());

        let err = resolve_key(Some(&record), Some(&fallback), "wallet_data.txt").unwrap_err();
        assert!(
            matches!(err, Error::AmbiguousRecord(ref msg) if msg.contains("delete wallet_data.txt"))
        );
    }

    #[test]
    fn undecodable_key_is_malformed() {
        let record = WalletRecord::new("AAAA", "0xabc");
        let err = resolve_key(Some(&record), None, "wallet_data.txt").unwrap_err();
        assert!(matches!(err, Error::MalformedRecord(_)));
    }

    #[test]
    fn invalid_fallback_is_wallet_error() {
        let fallback = SecretString::from("0x1234".to_string());
        let err = resolve_key(None, Some(&fallback), "wallet_data.txt").unwrap_err();
        assert!(matches!(err, Error::Wallet(_)));
    }
}
