//! Composition root: one instance of each service, wired by constructor injection.

use crate::agent::AgentRegistry;
use crate::behaviors::{CodeReviewBehavior, OptimizationBehavior, SecurityBehavior};
use crate::config::{EngineConfig, StorageBackend};
use crate::decision::{DecisionSource, RandomDecisions, SeededDecisions};
use crate::error::ApiError;
use crate::nft::{MockWallet, NftWrapper, WalletConnector};
use crate::progression::{ChallengeCatalog, ExperienceLedger};
use crate::store::{FileStore, KeyValueStore, MemoryStore, SledStore};
use std::sync::Arc;

/// The assembled engine
pub struct WarRoom {
    config: EngineConfig,
    store: Arc<dyn KeyValueStore>,
    registry: Arc<AgentRegistry>,
    ledger: Arc<ExperienceLedger>,
    catalog: Arc<ChallengeCatalog>,
    nft: Arc<NftWrapper>,
    code_review: CodeReviewBehavior,
    security: SecurityBehavior,
    optimization: OptimizationBehavior,
}

impl WarRoom {
    /// Open the store named by the config and load every persisted collection.
    pub fn open(config: EngineConfig) -> Result<Self, ApiError> {
        config.validate()?;
        let store = open_store(&config)?;
        let decisions: Arc<dyn DecisionSource> = match config.decisions.seed {
            Some(seed) => Arc::new(SeededDecisions::new(seed)),
            None => Arc::new(RandomDecisions),
        };
        let wallet: Arc<dyn WalletConnector> =
            Arc::new(MockWallet::new(config.wallet.mock_address.clone()));
        Self::with_parts(config, store, decisions, wallet)
    }

    /// In-memory engine with default settings
    pub fn in_memory() -> Result<Self, ApiError> {
        Self::open(EngineConfig::default())
    }

    /// Assemble the services over caller-supplied collaborators.
    pub fn with_parts(
        config: EngineConfig,
        store: Arc<dyn KeyValueStore>,
        decisions: Arc<dyn DecisionSource>,
        wallet: Arc<dyn WalletConnector>,
    ) -> Result<Self, ApiError> {
        let keys = &config.storage.keys;

        let registry = Arc::new(AgentRegistry::new(store.clone(), keys.agents.clone()));
        let loaded = registry.load_agents()?;

        let ledger = Arc::new(ExperienceLedger::open(
            registry.clone(),
            store.clone(),
            keys.events.clone(),
        )?);
        let catalog = Arc::new(ChallengeCatalog::open(
            ledger.clone(),
            store.clone(),
            decisions.clone(),
            config.catalog_settings(),
        )?);
        let nft = Arc::new(NftWrapper::new(wallet, config.nft_settings()));

        tracing::info!(
            backend = ?config.storage.backend,
            agents = loaded,
            challenges = catalog.all_challenges().len(),
            "War room opened"
        );

        Ok(Self {
            code_review: CodeReviewBehavior::new(decisions.clone()),
            security: SecurityBehavior::new(decisions),
            optimization: OptimizationBehavior::new(),
            config,
            store,
            registry,
            ledger,
            catalog,
            nft,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    pub fn registry(&self) -> &Arc<AgentRegistry> {
        &self.registry
    }

    pub fn ledger(&self) -> &Arc<ExperienceLedger> {
        &self.ledger
    }

    pub fn catalog(&self) -> &Arc<ChallengeCatalog> {
        &self.catalog
    }

    pub fn nft(&self) -> &Arc<NftWrapper> {
        &self.nft
    }

    pub fn code_review(&self) -> &CodeReviewBehavior {
        &self.code_review
    }

    pub fn security(&self) -> &SecurityBehavior {
        &self.security
    }

    pub fn optimization(&self) -> &OptimizationBehavior {
        &self.optimization
    }
}

fn open_store(config: &EngineConfig) -> Result<Arc<dyn KeyValueStore>, ApiError> {
    let store: Arc<dyn KeyValueStore> = match config.storage.backend {
        StorageBackend::Memory => Arc::new(MemoryStore::new()),
        StorageBackend::File => Arc::new(FileStore::open(config.storage.resolve_path()?)?),
        StorageBackend::Sled => {
            let path = config.storage.resolve_path()?.join("sled");
            Arc::new(SledStore::open(&path)?)
        }
    };
    Ok(store)
}
