//! Agent toolkit
//!
//! An [`AgentToolkit`] bundles a wallet provider with the actions an agent may
//! call. Actions are grouped by [`ActionProvider`]s and addressed by name.

mod wallet_actions;

pub use wallet_actions::{GetWalletDetailsAction, SignMessageAction, WalletActionProvider};

use crate::provider::{WalletProvider, WalletProviderHandle};
use crate::{Error, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// A single capability exposed to an agent
#[async_trait]
pub trait Action: Send + Sync {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// JSON schema of the accepted arguments
    fn parameters(&self) -> Value;

    async fn invoke(&self, provider: &dyn WalletProvider, args: Value) -> Result<Value>;
}

/// A named group of actions
pub trait ActionProvider: Send + Sync {
    fn name(&self) -> &'static str;

    fn actions(&self) -> Vec<Arc<dyn Action>>;
}

/// Description of a registered action, for handing to an agent
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ActionInfo {
    pub name: String,
    pub provider: String,
    pub description: String,
    pub parameters: Value,
}

struct Registered {
    provider: &'static str,
    action: Arc<dyn Action>,
}

/// Wallet provider plus the actions registered against it
pub struct AgentToolkit {
    wallet_provider: WalletProviderHandle,
    actions: BTreeMap<&'static str, Registered>,
}

impl AgentToolkit {
    /// Build a toolkit from action providers
    ///
    /// Two actions with the same name are rejected.
    pub fn from_providers(
        wallet_provider: WalletProviderHandle,
        action_providers: Vec<Box<dyn ActionProvider>>,
    ) -> Result<Self> {
        let mut actions: BTreeMap<&'static str, Registered> = BTreeMap::new();

        for action_provider in &action_providers {
            for action in action_provider.actions() {
                let name = action.name();
                if let Some(existing) = actions.get(name) {
                    return Err(Error::Config(format!(
                        "Action {} registered by both {} and {}",
                        name,
                        existing.provider,
                        action_provider.name()
                    )));
                }
                actions.insert(
                    name,
                    Registered {
                        provider: action_provider.name(),
                        action,
                    },
                );
            }
            tracing::debug!(provider = action_provider.name(), "Registered action provider");
        }

        Ok(Self {
            wallet_provider,
            actions,
        })
    }

    pub fn wallet_provider(&self) -> &WalletProviderHandle {
        &self.wallet_provider
    }

    /// Registered actions, sorted by name
    pub fn actions(&self) -> Vec<ActionInfo> {
        self.actions
            .values()
            .map(|r| ActionInfo {
                name: r.action.name().to_string(),
                provider: r.provider.to_string(),
                description: r.action.description().to_string(),
                parameters: r.action.parameters(),
            })
            .collect()
    }

    pub fn action(&self, name: &str) -> Option<Arc<dyn Action>> {
        self.actions.get(name).map(|r| Arc::clone(&r.action))
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Run an action against this toolkit's wallet provider
    pub async fn invoke(&self, name: &str, args: Value) -> Result<Value> {
        let action = self
            .action(name)
            .ok_or_else(|| Error::InvalidArgument(format!("Unknown action: {}", name)))?;

        tracing::debug!(action = name, "Invoking action");
        action.invoke(self.wallet_provider.as_ref(), args).await
    }
}

impl std::fmt::Debug for AgentToolkit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentToolkit")
            .field("wallet_provider", &self.wallet_provider.name())
            .field("actions", &self.actions.keys().collect::<Vec<_>>())
            .finish()
    }
}
