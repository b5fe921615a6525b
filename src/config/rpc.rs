//! RPC endpoint configuration
//!
//! Resolution order per network:
//! 1. Per-network env vars (BASE_SEPOLIA_RPC_URL, ETH_RPC_URL, etc.)
//! 2. Public RPC fallbacks - rate limited, for testing only
//!
//! ```bash
//! export BASE_SEPOLIA_RPC_URL="https://base-sepolia.g.alchemy.com/v2/YOUR_KEY"
//! ```

use super::Network;
use std::collections::HashMap;

/// Environment variable names
mod env_vars {
    pub const BASE_SEPOLIA_RPC_URL: &str = "BASE_SEPOLIA_RPC_URL";
    pub const BASE_RPC_URL: &str = "BASE_RPC_URL";
    pub const ETH_RPC_URL: &str = "ETH_RPC_URL";
    pub const ETH_SEPOLIA_RPC_URL: &str = "ETH_SEPOLIA_RPC_URL";
    pub const ARBITRUM_RPC_URL: &str = "ARBITRUM_RPC_URL";
    pub const OPTIMISM_RPC_URL: &str = "OPTIMISM_RPC_URL";
    pub const POLYGON_RPC_URL: &str = "POLYGON_RPC_URL";
}

/// Public RPC endpoints (rate limited, for testing only)
mod public_rpcs {
    pub const BASE_SEPOLIA: &str = "https://sepolia.base.org";
    pub const BASE: &str = "https://mainnet.base.org";
    pub const ETHEREUM: &str = "https://eth.llamarpc.com";
    pub const ETHEREUM_SEPOLIA: &str = "https://ethereum-sepolia-rpc.publicnode.com";
    pub const ARBITRUM: &str = "https://arb1.arbitrum.io/rpc";
    pub const OPTIMISM: &str = "https://mainnet.optimism.io";
    pub const POLYGON: &str = "https://polygon-rpc.com";
}

fn env_var_for(network: Network) -> &'static str {
    match network {
        Network::BaseSepolia => env_vars::BASE_SEPOLIA_RPC_URL,
        Network::BaseMainnet => env_vars::BASE_RPC_URL,
        Network::EthereumMainnet => env_vars::ETH_RPC_URL,
        Network::EthereumSepolia => env_vars::ETH_SEPOLIA_RPC_URL,
        Network::ArbitrumMainnet => env_vars::ARBITRUM_RPC_URL,
        Network::OptimismMainnet => env_vars::OPTIMISM_RPC_URL,
        Network::PolygonMainnet => env_vars::POLYGON_RPC_URL,
    }
}

fn public_rpc_for(network: Network) -> &'static str {
    match network {
        Network::BaseSepolia => public_rpcs::BASE_SEPOLIA,
        Network::BaseMainnet => public_rpcs::BASE,
        Network::EthereumMainnet => public_rpcs::ETHEREUM,
        Network::EthereumSepolia => public_rpcs::ETHEREUM_SEPOLIA,
        Network::ArbitrumMainnet => public_rpcs::ARBITRUM,
        Network::OptimismMainnet => public_rpcs::OPTIMISM,
        Network::PolygonMainnet => public_rpcs::POLYGON,
    }
}

/// RPC configuration for every supported network
#[derive(Debug, Clone)]
pub struct RpcConfig {
    urls: HashMap<Network, String>,
}

impl RpcConfig {
    /// Create RPC config from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Create RPC config through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut urls = HashMap::new();

        for network in Network::ALL {
            let var = env_var_for(network);
            match lookup(var).filter(|url| !url.trim().is_empty()) {
                Some(url) => {
                    tracing::debug!(network = %network, "Using {} for RPC", var);
                    urls.insert(network, url);
                }
                None => {
                    urls.insert(network, public_rpc_for(network).to_string());
                }
            }
        }

        Self { urls }
    }

    /// Create with explicit RPC URLs
    pub fn with_urls(urls: HashMap<Network, String>) -> Self {
        Self { urls }
    }

    /// Get RPC URL for a network
    pub fn get(&self, network: Network) -> Option<&str> {
        self.urls.get(&network).map(|s| s.as_str())
    }

    /// Whether the URL for this network is a rate-limited public fallback
    pub fn is_public_fallback(&self, network: Network) -> bool {
        self.get(network) == Some(public_rpc_for(network))
    }
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
