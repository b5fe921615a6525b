//! Agent toolkit bootstrapper
//!
//! Prepares a wallet provider and agent toolkit for an automated agent:
//! - Reads the persisted wallet record (key and smart wallet address)
//! - Resolves the signing key: stored, supplied through configuration, or generated
//! - Asks a wallet service for a live provider on the configured network
//! - Writes the key and provider-reported address back for the next run
//!
//! # Security Model
//!
//! - Private keys only exist decoded inside the wallet module
//! - Service credentials and keys are held as secrets and never logged
//! - Actions return addresses and signatures, never key material

pub mod bootstrap;
pub mod config;
pub mod provider;
pub mod toolkit;
pub mod wallet;

mod error;

// Re-export commonly used types
pub use bootstrap::{resolve_key, KeySource, ResolvedKey, WalletBootstrapper};
pub use config::{BootstrapConfig, Network, RpcConfig, ServiceCredentials};
pub use error::{Error, Result};
pub use provider::{ProviderRequest, WalletProvider, WalletProviderHandle, WalletService};
pub use toolkit::{Action, ActionProvider, AgentToolkit, WalletActionProvider};
pub use wallet::{FileRecordStore, MemoryRecordStore, RecordStore, SecureWallet, WalletRecord};
