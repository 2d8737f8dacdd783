//! Shade Configuration
//!
//! Shared configuration crate for the Shade client and CLI.
//!
//! Handles loading configuration from:
//! 1. SHADE_CONFIG env var (explicit path)
//! 2. ./config.toml (current directory)
//! 3. ~/.shade/config.toml (user home)
//!
//! Environment variables take precedence over TOML config.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::{env, fs};

/// Global config instance for convenience access
pub static GLOBAL_CONFIG: OnceLock<ShadeConfig> = OnceLock::new();

const CONFIG_FILE_NAME: &str = "config.toml";
const CONFIG_DIR_NAME: &str = ".shade";

// ============================================================================
// Default Constants
// ============================================================================

const DEFAULT_SWAP_BRIDGE: &str = "CurveStEthBridge";
const DEFAULT_SWAP_MIN_OUTPUT: u64 = 1_000_000_000_000_000_000;
const DEFAULT_PROVER_URL: &str = "http://127.0.0.1:8090";
const DEFAULT_CIRCUIT_ID: &str = "note_membership";
const DEFAULT_PROVING_KEY_BUDGET: u32 = 1 << 19;
const DEFAULT_PROOF_TIMEOUT_SECS: u64 = 300;
const DEFAULT_TREE_DEPTH: usize = 32;
const DEFAULT_EXPLORER_URL: &str = "http://127.0.0.1:3000";

// ============================================================================
// Config Structs
// ============================================================================

/// Root configuration structure (matches TOML layout)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShadeConfig {
    #[serde(default)]
    pub rollup: RollupConfig,
    #[serde(default)]
    pub bridges: BridgesConfig,
    #[serde(default)]
    pub prover: ProverConfig,
    #[serde(default)]
    pub tree: TreeConfig,
    #[serde(default)]
    pub explorer: ExplorerConfig,
}

/// Settlement speed requested for user transactions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementToml {
    #[default]
    NextRollup,
    InstantRollup,
}

/// Rollup transaction settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RollupConfig {
    #[serde(default)]
    pub settlement_time: SettlementToml,
}

/// Swap bridge used by the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgesConfig {
    /// Registry name of the ETH -> wstETH bridge
    #[serde(default = "default_swap_bridge")]
    pub swap_bridge: String,
    /// Used when the registry does not know `swap_bridge`
    #[serde(default)]
    pub swap_bridge_address_id: Option<u32>,
    /// Minimum output per input unit passed as aux data
    #[serde(default = "default_swap_min_output")]
    pub swap_min_output: u64,
}

impl Default for BridgesConfig {
    fn default() -> Self {
        Self {
            swap_bridge: DEFAULT_SWAP_BRIDGE.into(),
            swap_bridge_address_id: None,
            swap_min_output: DEFAULT_SWAP_MIN_OUTPUT,
        }
    }
}

fn default_swap_bridge() -> String {
    DEFAULT_SWAP_BRIDGE.into()
}
fn default_swap_min_output() -> u64 {
    DEFAULT_SWAP_MIN_OUTPUT
}

/// External prover coordinator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProverConfig {
    #[serde(default = "default_prover_url")]
    pub coordinator_url: String,
    #[serde(default = "default_circuit_id")]
    pub circuit_id: String,
    #[serde(default = "default_proving_key_budget")]
    pub proving_key_budget: u32,
    #[serde(default = "default_proof_timeout")]
    pub proof_timeout_secs: u64,
    /// Use the in-process mock prover instead of the coordinator
    #[serde(default)]
    pub mock: bool,
}

impl Default for ProverConfig {
    fn default() -> Self {
        Self {
            coordinator_url: DEFAULT_PROVER_URL.into(),
            circuit_id: DEFAULT_CIRCUIT_ID.into(),
            proving_key_budget: DEFAULT_PROVING_KEY_BUDGET,
            proof_timeout_secs: DEFAULT_PROOF_TIMEOUT_SECS,
            mock: false,
        }
    }
}

fn default_prover_url() -> String {
    DEFAULT_PROVER_URL.into()
}
fn default_circuit_id() -> String {
    DEFAULT_CIRCUIT_ID.into()
}
fn default_proving_key_budget() -> u32 {
    DEFAULT_PROVING_KEY_BUDGET
}
fn default_proof_timeout() -> u64 {
    DEFAULT_PROOF_TIMEOUT_SECS
}

/// Commitment tree shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeConfig {
    #[serde(default = "default_tree_depth")]
    pub depth: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_TREE_DEPTH,
        }
    }
}

fn default_tree_depth() -> usize {
    DEFAULT_TREE_DEPTH
}

/// Block explorer used for transaction links
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplorerConfig {
    #[serde(default = "default_explorer_url")]
    pub url: String,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_EXPLORER_URL.into(),
        }
    }
}

fn default_explorer_url() -> String {
    DEFAULT_EXPLORER_URL.into()
}

// ============================================================================
// Override Helpers
// ============================================================================

/// Set field from override if present
fn set_string(value: Option<String>, field: &mut String) {
    if let Some(v) = value {
        *field = v;
    }
}

/// Set field from override if present and parseable
fn set_parse<T: std::str::FromStr>(value: Option<String>, field: &mut T) {
    if let Some(parsed) = value.and_then(|v| v.parse().ok()) {
        *field = parsed;
    }
}

/// Set Option<T> from override if present and parseable
fn set_parse_option<T: std::str::FromStr>(value: Option<String>, field: &mut Option<T>) {
    if let Some(parsed) = value.and_then(|v| v.parse().ok()) {
        *field = Some(parsed);
    }
}

/// Truthy override ("1" or "true")
fn as_bool(value: Option<String>) -> Option<bool> {
    value.map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

// ============================================================================
// Implementation
// ============================================================================

impl ShadeConfig {
    /// Load configuration from config file with env var overrides
    pub fn load() -> Result<Self> {
        let mut config = match Self::find_config_file() {
            Some(path) => {
                log::info!("Loading config from: {}", path.display());
                Self::parse_file(&path)?
            }
            None => {
                log::info!("No config file found, using defaults and environment variables");
                Self::default()
            }
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from a specific file path
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = Self::parse_file(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    fn parse_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Find the config file path
    fn find_config_file() -> Option<PathBuf> {
        if let Ok(path) = env::var("SHADE_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
            log::warn!("SHADE_CONFIG points to missing file: {}", path.display());
        }

        let local_path = PathBuf::from(CONFIG_FILE_NAME);
        if local_path.exists() {
            return Some(local_path);
        }

        Self::default_config_path().filter(|p| p.exists())
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    /// Apply overrides from any key lookup (the process environment in practice)
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // Rollup
        if let Some(v) = lookup("SHADE_SETTLEMENT") {
            self.rollup.settlement_time = match v.to_ascii_lowercase().as_str() {
                "instant" | "instant_rollup" => SettlementToml::InstantRollup,
                _ => SettlementToml::NextRollup,
            };
        }

        // Bridges
        set_string(lookup("SHADE_SWAP_BRIDGE"), &mut self.bridges.swap_bridge);
        set_parse_option(
            lookup("SHADE_SWAP_BRIDGE_ID"),
            &mut self.bridges.swap_bridge_address_id,
        );

        // Prover
        set_string(lookup("SHADE_PROVER_URL"), &mut self.prover.coordinator_url);
        set_string(lookup("SHADE_CIRCUIT_ID"), &mut self.prover.circuit_id);
        set_parse(
            lookup("SHADE_PROVING_KEY_BUDGET"),
            &mut self.prover.proving_key_budget,
        );
        set_parse(
            lookup("SHADE_PROOF_TIMEOUT_SECS"),
            &mut self.prover.proof_timeout_secs,
        );
        if let Some(v) = as_bool(lookup("SHADE_MOCK_PROVER")) {
            self.prover.mock = v;
        }

        // Tree
        set_parse(lookup("SHADE_TREE_DEPTH"), &mut self.tree.depth);

        // Explorer
        set_string(lookup("SHADE_EXPLORER_URL"), &mut self.explorer.url);
    }

    /// Get the default config file path
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Generate a sample config file
    pub fn generate_sample() -> String {
        let mut sample = Self::default();
        sample.prover.mock = true;
        toml::to_string_pretty(&sample).unwrap_or_default()
    }

    /// Explorer link for a transaction id
    pub fn explorer_tx_url(&self, tx_id: &str) -> String {
        format!("{}/tx/{}", self.explorer.url.trim_end_matches('/'), tx_id)
    }

    /// Get the global config instance, initializing it if necessary.
    ///
    /// Falls back to defaults if loading fails.
    pub fn global() -> &'static ShadeConfig {
        GLOBAL_CONFIG.get_or_init(|| {
            Self::load().unwrap_or_else(|e| {
                log::warn!("Failed to load config: {}, using defaults", e);
                Self::default()
            })
        })
    }

    /// Initialize the global config with a specific instance.
    ///
    /// Returns `Err(config)` if already initialized.
    pub fn set_global(config: ShadeConfig) -> Result<(), ShadeConfig> {
        GLOBAL_CONFIG.set(config)
    }
}

/// Shorthand for `ShadeConfig::global()`.
#[inline]
pub fn global_config() -> &'static ShadeConfig {
    ShadeConfig::global()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = ShadeConfig::default();
        assert_eq!(config.rollup.settlement_time, SettlementToml::NextRollup);
        assert_eq!(config.tree.depth, 32);
        assert_eq!(config.prover.proving_key_budget, 524_288);
        assert!(!config.prover.mock);
        assert_eq!(config.bridges.swap_bridge_address_id, None);
    }

    #[test]
    fn test_generate_sample() {
        let sample = ShadeConfig::generate_sample();
        assert!(sample.contains("[rollup]"));
        assert!(sample.contains("[prover]"));
        assert!(sample.contains("[tree]"));
        assert!(sample.contains("[explorer]"));
    }

    #[test]
    fn test_parse_sample() {
        let sample = ShadeConfig::generate_sample();
        let parsed: ShadeConfig = toml::from_str(&sample).unwrap();
        assert_eq!(parsed.bridges.swap_bridge, DEFAULT_SWAP_BRIDGE);
        assert!(parsed.prover.mock);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let parsed: ShadeConfig = toml::from_str(
            r#"
            [tree]
            depth = 20

            [rollup]
            settlement_time = "instant_rollup"
            "#,
        )
        .unwrap();
        assert_eq!(parsed.tree.depth, 20);
        assert_eq!(parsed.rollup.settlement_time, SettlementToml::InstantRollup);
        assert_eq!(parsed.bridges.swap_min_output, DEFAULT_SWAP_MIN_OUTPUT);
        assert_eq!(parsed.prover.circuit_id, DEFAULT_CIRCUIT_ID);
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("SHADE_PROVER_URL", "http://prover:9000"),
            ("SHADE_TREE_DEPTH", "16"),
            ("SHADE_MOCK_PROVER", "true"),
            ("SHADE_SWAP_BRIDGE_ID", "7"),
            ("SHADE_SETTLEMENT", "instant"),
            ("SHADE_PROVING_KEY_BUDGET", "not-a-number"),
        ]);
        let mut config = ShadeConfig::default();
        config.apply_overrides(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.prover.coordinator_url, "http://prover:9000");
        assert_eq!(config.tree.depth, 16);
        assert!(config.prover.mock);
        assert_eq!(config.bridges.swap_bridge_address_id, Some(7));
        assert_eq!(config.rollup.settlement_time, SettlementToml::InstantRollup);
        // unparseable values leave the field alone
        assert_eq!(config.prover.proving_key_budget, DEFAULT_PROVING_KEY_BUDGET);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[prover]\ncircuit_id = \"membership_v2\"").unwrap();

        let config = ShadeConfig::parse_file(file.path()).unwrap();
        assert_eq!(config.prover.circuit_id, "membership_v2");
        assert_eq!(config.tree.depth, DEFAULT_TREE_DEPTH);
    }

    #[test]
    fn test_unused_keys_are_ignored() {
        let parsed: ShadeConfig = toml::from_str(
            r#"
            [rollup]
            server_url = "http://127.0.0.1:8081"
            settlement_time = "instant_rollup"

            [ethereum]
            host_url = "http://127.0.0.1:8545"
            "#,
        )
        .unwrap();
        assert_eq!(parsed.rollup.settlement_time, SettlementToml::InstantRollup);
        assert!(!ShadeConfig::generate_sample().contains("server_url"));
    }

    #[test]
    fn test_load_from_bad_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[tree\ndepth = ").unwrap();
        assert!(ShadeConfig::parse_file(file.path()).is_err());
    }

    #[test]
    fn test_explorer_url() {
        let mut config = ShadeConfig::default();
        config.explorer.url = "https://explorer.example/".into();
        assert_eq!(
            config.explorer_tx_url("0xabc"),
            "https://explorer.example/tx/0xabc"
        );
    }
}
