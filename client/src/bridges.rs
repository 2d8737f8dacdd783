//! Bridge registry
//!
//! Bridge metadata (address ids, contract addresses) comes from an on-chain
//! data provider. The registry caches it by bridge name.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use shade_account::EthAddress;
use std::collections::HashMap;
use tracing::info;

/// Metadata of one DeFi bridge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeData {
    /// Id used in `BridgeCallData`
    pub bridge_address_id: u32,
    /// L1 contract address
    pub address: EthAddress,
    #[serde(default)]
    pub description: String,
}

/// Source of bridge metadata, keyed by bridge name
#[allow(async_fn_in_trait)]
pub trait BridgeDataProvider {
    async fn bridges(&self) -> Result<HashMap<String, BridgeData>>;
}

/// In-memory bridge metadata (local runs, tests)
#[derive(Debug, Clone, Default)]
pub struct StaticBridgeData(pub HashMap<String, BridgeData>);

impl BridgeDataProvider for StaticBridgeData {
    async fn bridges(&self) -> Result<HashMap<String, BridgeData>> {
        Ok(self.0.clone())
    }
}

/// Cached bridge metadata
#[derive(Debug, Clone, Default)]
pub struct BridgeRegistry {
    bridges: HashMap<String, BridgeData>,
}

impl BridgeRegistry {
    pub fn new(bridges: HashMap<String, BridgeData>) -> Self {
        Self { bridges }
    }

    /// Load all bridges from `provider`.
    pub async fn fetch<P: BridgeDataProvider>(provider: &P) -> Result<Self> {
        let bridges = provider.bridges().await?;
        info!("loaded {} bridges", bridges.len());
        Ok(Self { bridges })
    }

    pub fn get(&self, name: &str) -> Option<&BridgeData> {
        self.bridges.get(name)
    }

    pub fn address_id(&self, name: &str) -> Option<u32> {
        self.get(name).map(|b| b.bridge_address_id)
    }

    /// Bridge names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.bridges.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.bridges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bridges.is_empty()
    }
}
