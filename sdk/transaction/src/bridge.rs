use serde::{Deserialize, Serialize};

use crate::AssetId;

/// Parameters of a DeFi interaction routed through a bridge contract.
///
/// The second input and output legs are optional: most bridges swap one
/// asset for one asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeCallData {
    pub bridge_address_id: u32,
    pub input_asset_a: AssetId,
    pub output_asset_a: AssetId,
    pub input_asset_b: Option<AssetId>,
    pub output_asset_b: Option<AssetId>,
    pub aux_data: u64,
}

impl BridgeCallData {
    pub fn new(
        bridge_address_id: u32,
        input_asset_a: AssetId,
        output_asset_a: AssetId,
        input_asset_b: Option<AssetId>,
        output_asset_b: Option<AssetId>,
        aux_data: u64,
    ) -> Self {
        Self {
            bridge_address_id,
            input_asset_a,
            output_asset_a,
            input_asset_b,
            output_asset_b,
            aux_data,
        }
    }

    /// Number of input assets consumed by the interaction.
    pub fn num_input_assets(&self) -> usize {
        1 + usize::from(self.input_asset_b.is_some())
    }

    /// Number of output assets produced by the interaction.
    pub fn num_output_assets(&self) -> usize {
        1 + usize::from(self.output_asset_b.is_some())
    }
}
