use std::path::Path;
use std::sync::Arc;

use warroom::config::{EngineConfig, StorageBackend};
use warroom::decision::FixedDecisions;
use warroom::nft::MockWallet;
use warroom::store::MemoryStore;
use warroom::WarRoom;

/// Engine over a fresh memory store with pinned outcomes.
pub fn memory_engine(decisions: FixedDecisions) -> WarRoom {
    let config = EngineConfig::default();
    let wallet = Arc::new(MockWallet::new(config.wallet.mock_address.clone()));
    WarRoom::with_parts(config, Arc::new(MemoryStore::new()), Arc::new(decisions), wallet).unwrap()
}

pub fn disk_config(dir: &Path, backend: StorageBackend) -> EngineConfig {
    let mut config = EngineConfig::default();
    config.storage.backend = backend;
    config.storage.path = Some(dir.to_path_buf());
    config.decisions.seed = Some(7);
    config
}
