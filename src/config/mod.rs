//! Configuration
//!
//! `EngineConfig` is assembled by `ConfigLoader` from built-in defaults, the
//! global config file, an optional explicit file and `WARROOM__*` environment
//! variables, in increasing precedence.

pub mod facade;
pub mod merge;
pub mod paths;
pub mod sources;

pub use facade::ConfigLoader;
pub use paths::xdg_root as xdg;

use crate::agent::DEFAULT_AGENTS_KEY;
use crate::error::ApiError;
use crate::logging::LoggingConfig;
use crate::nft::{NftSettings, DEFAULT_CONTRACT_ADDRESS, DEFAULT_IMAGE_BASE_URL, DEFAULT_MOCK_ADDRESS};
use crate::progression::{
    CatalogSettings, DEFAULT_ATTEMPTS_KEY, DEFAULT_CHALLENGES_KEY, DEFAULT_EVENTS_KEY,
    DEFAULT_SUCCESS_PROBABILITY,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub challenges: ChallengesConfig,
    #[serde(default)]
    pub decisions: DecisionsConfig,
    #[serde(default)]
    pub wallet: WalletConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ApiError> {
        let p = self.challenges.success_probability;
        if !(0.0..=1.0).contains(&p) {
            return Err(ApiError::ConfigError(format!(
                "challenges.success_probability must be within 0..=1, got {}",
                p
            )));
        }
        let keys = &self.storage.keys;
        let mut names = vec![&keys.agents, &keys.challenges, &keys.attempts, &keys.events];
        if names.iter().any(|k| k.trim().is_empty()) {
            return Err(ApiError::ConfigError("storage keys must not be empty".to_string()));
        }
        names.sort();
        names.dedup();
        if names.len() != 4 {
            return Err(ApiError::ConfigError("storage keys must be distinct".to_string()));
        }
        Ok(())
    }

    pub fn catalog_settings(&self) -> CatalogSettings {
        CatalogSettings {
            challenges_key: self.storage.keys.challenges.clone(),
            attempts_key: self.storage.keys.attempts.clone(),
            success_probability: self.challenges.success_probability,
            seed_defaults: self.challenges.seed_defaults,
        }
    }

    pub fn nft_settings(&self) -> NftSettings {
        NftSettings {
            contract_address: self.wallet.contract_address.clone(),
            image_base_url: self.wallet.image_base_url.clone(),
            seed_owner: self
                .wallet
                .seed_mock_tokens
                .then(|| self.wallet.mock_address.clone()),
        }
    }
}

/// Where persisted collections live
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    File,
    Sled,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Directory for the file and sled backends; None means `$XDG_DATA_HOME/warroom`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    #[serde(default)]
    pub keys: StorageKeys,
}

impl StorageConfig {
    /// Directory used by the on-disk backends.
    pub fn resolve_path(&self) -> Result<PathBuf, ApiError> {
        match &self.path {
            Some(path) => Ok(path.clone()),
            None => xdg::warroom_data_dir(),
        }
    }
}

/// Storage key for each persisted collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageKeys {
    #[serde(default = "default_agents_key")]
    pub agents: String,
    #[serde(default = "default_challenges_key")]
    pub challenges: String,
    #[serde(default = "default_attempts_key")]
    pub attempts: String,
    #[serde(default = "default_events_key")]
    pub events: String,
}

fn default_agents_key() -> String {
    DEFAULT_AGENTS_KEY.to_string()
}

fn default_challenges_key() -> String {
    DEFAULT_CHALLENGES_KEY.to_string()
}

fn default_attempts_key() -> String {
    DEFAULT_ATTEMPTS_KEY.to_string()
}

fn default_events_key() -> String {
    DEFAULT_EVENTS_KEY.to_string()
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            agents: default_agents_key(),
            challenges: default_challenges_key(),
            attempts: default_attempts_key(),
            events: default_events_key(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengesConfig {
    /// Probability that an attempt is graded successful
    #[serde(default = "default_success_probability")]
    pub success_probability: f64,

    /// Seed the default challenges into an empty catalog
    #[serde(default = "default_true")]
    pub seed_defaults: bool,
}

fn default_success_probability() -> f64 {
    DEFAULT_SUCCESS_PROBABILITY
}

fn default_true() -> bool {
    true
}

impl Default for ChallengesConfig {
    fn default() -> Self {
        Self {
            success_probability: default_success_probability(),
            seed_defaults: default_true(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionsConfig {
    /// Seed for reproducible draws; None draws from the thread RNG
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletConfig {
    #[serde(default = "default_mock_address")]
    pub mock_address: String,
    #[serde(default = "default_contract_address")]
    pub contract_address: String,
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
    #[serde(default = "default_true")]
    pub seed_mock_tokens: bool,
}

fn default_mock_address() -> String {
    DEFAULT_MOCK_ADDRESS.to_string()
}

fn default_contract_address() -> String {
    DEFAULT_CONTRACT_ADDRESS.to_string()
}

fn default_image_base_url() -> String {
    DEFAULT_IMAGE_BASE_URL.to_string()
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            mock_address: default_mock_address(),
            contract_address: default_contract_address(),
            image_base_url: default_image_base_url(),
            seed_mock_tokens: default_true(),
        }
    }
}
