//! Configuration for the wallet bootstrapper
//!
//! Everything the bootstrapper needs from the environment is gathered into a
//! [`BootstrapConfig`] up front and handed to it explicitly.

pub mod rpc;

use crate::{Error, Result};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub use rpc::RpcConfig;

/// Network identifier environment variable name
pub const NETWORK_ID_ENV: &str = "NEXT_NETWORK_ID";
/// Wallet service API key name
pub const API_KEY_NAME_ENV: &str = "NEXT_CDP_API_KEY_NAME";
/// Wallet service API private key
pub const API_KEY_PRIVATE_KEY_ENV: &str = "NEXT_CDP_API_KEY_PRIVATE_KEY";
/// Optional fallback wallet key, used when no record exists
pub const PRIVATE_KEY_ENV: &str = "PRIVATE_KEY";
/// Optional override for the wallet record location
pub const WALLET_DATA_FILE_ENV: &str = "WALLET_DATA_FILE";

/// Default wallet record location, relative to the working directory
pub const DEFAULT_WALLET_DATA_FILE: &str = "wallet_data.txt";

/// Wallet record location from `WALLET_DATA_FILE`, else the default
pub fn wallet_data_path_from_env() -> PathBuf {
    wallet_data_path_from_lookup(|name| std::env::var(name).ok())
}

/// Wallet record location through an arbitrary variable lookup
///
/// A blank value counts as unset.
pub fn wallet_data_path_from_lookup<F>(lookup: F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    lookup(WALLET_DATA_FILE_ENV)
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_WALLET_DATA_FILE))
}

/// Supported networks, named the way the wallet service names them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Network {
    #[default]
    BaseSepolia,
    BaseMainnet,
    EthereumMainnet,
    EthereumSepolia,
    ArbitrumMainnet,
    OptimismMainnet,
    PolygonMainnet,
}

impl Network {
    pub const ALL: [Network; 7] = [
        Network::BaseSepolia,
        Network::BaseMainnet,
        Network::EthereumMainnet,
        Network::EthereumSepolia,
        Network::ArbitrumMainnet,
        Network::OptimismMainnet,
        Network::PolygonMainnet,
    ];

    pub fn chain_id(&self) -> u64 {
        match self {
            Network::BaseSepolia => 84532,
            Network::BaseMainnet => 8453,
            Network::EthereumMainnet => 1,
            Network::EthereumSepolia => 11155111,
            Network::ArbitrumMainnet => 42161,
            Network::OptimismMainnet => 10,
            Network::PolygonMainnet => 137,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Network::BaseSepolia => "base-sepolia",
            Network::BaseMainnet => "base-mainnet",
            Network::EthereumMainnet => "ethereum-mainnet",
            Network::EthereumSepolia => "ethereum-sepolia",
            Network::ArbitrumMainnet => "arbitrum-mainnet",
            Network::OptimismMainnet => "optimism-mainnet",
            Network::PolygonMainnet => "polygon-mainnet",
        }
    }

    pub fn is_testnet(&self) -> bool {
        matches!(self, Network::BaseSepolia | Network::EthereumSepolia)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Network {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        Network::ALL
            .into_iter()
            .find(|n| n.name() == wanted)
            .ok_or_else(|| Error::Config(format!("Unknown network id: {}", s)))
    }
}

/// Credentials for the external wallet service
#[derive(Clone)]
pub struct ServiceCredentials {
    pub api_key_name: String,
    pub api_key_private_key: SecretString,
}

impl ServiceCredentials {
    pub fn new(api_key_name: impl Into<String>, api_key_private_key: impl Into<String>) -> Self {
        Self {
            api_key_name: api_key_name.into(),
            api_key_private_key: SecretString::from(api_key_private_key.into()),
        }
    }
}

impl fmt::Debug for ServiceCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceCredentials")
            .field("api_key_name", &self.api_key_name)
            .field("api_key_private_key", &"[REDACTED]")
            .finish()
    }
}

/// Main configuration
#[derive(Clone)]
pub struct BootstrapConfig {
    /// Target network
    pub network: Network,
    /// Wallet service credentials
    pub credentials: ServiceCredentials,
    /// Key to use when no wallet record exists yet
    pub fallback_private_key: Option<SecretString>,
    /// Where the wallet record lives
    pub wallet_data_path: PathBuf,
}

impl BootstrapConfig {
    pub fn new(network: Network, credentials: ServiceCredentials) -> Self {
        Self {
            network,
            credentials,
            fallback_private_key: None,
            wallet_data_path: PathBuf::from(DEFAULT_WALLET_DATA_FILE),
        }
    }

    pub fn with_fallback_private_key(mut self, key: impl Into<String>) -> Self {
        self.fallback_private_key = Some(SecretString::from(key.into()));
        self
    }

    pub fn with_wallet_data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.wallet_data_path = path.into();
        self
    }

    /// Load configuration from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let network = match get(NETWORK_ID_ENV) {
            Some(id) => id.parse()?,
            None => {
                tracing::debug!("{} not set, defaulting to {}", NETWORK_ID_ENV, Network::default());
                Network::default()
            }
        };

        let api_key_name = get(API_KEY_NAME_ENV).ok_or_else(|| {
            Error::Config(format!("Environment variable {} not set", API_KEY_NAME_ENV))
        })?;
        let api_key_private_key = get(API_KEY_PRIVATE_KEY_ENV).ok_or_else(|| {
            Error::Config(format!(
                "Environment variable {} not set",
                API_KEY_PRIVATE_KEY_ENV
            ))
        })?;

        let mut config = Self::new(
            network,
            ServiceCredentials::new(api_key_name, api_key_private_key),
        );
        if let Some(key) = get(PRIVATE_KEY_ENV) {
            config = config.with_fallback_private_key(key);
        }

        Ok(config.with_wallet_data_path(wallet_data_path_from_lookup(&lookup)))
    }

    /// JSON view with secrets redacted
    pub fn redacted(&self) -> serde_json::Value {
        serde_json::json!({
            "network": self.network.name(),
            "chain_id": self.network.chain_id(),
            "api_key_name": self.credentials.api_key_name,
            "api_key_private_key": redact(&self.credentials.api_key_private_key),
            "fallback_private_key": self.fallback_private_key.as_ref().map(redact),
            "wallet_data_path": self.wallet_data_path.display().to_string(),
        })
    }
}

fn redact(secret: &SecretString) -> &'static str {
    if secret.expose_secret().is_empty() {
        ""
    } else {
        "[REDACTED]"
    }
}

impl fmt::Debug for BootstrapConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BootstrapConfig")
            .field("network", &self.network)
            .field("credentials", &self.credentials)
            .field(
                "fallback_private_key",
                &self.fallback_private_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("wallet_data_path", &self.wallet_data_path)
            .finish()
    }
}
