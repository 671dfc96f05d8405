use tempfile::TempDir;
use warroom::config::StorageBackend;
use warroom::store::{FileStore, KeyValueStore};
use warroom::{AgentDraft, AgentUpdate, WarRoom};

use crate::integration::support::disk_config;

fn reopen_preserves_agents(backend: StorageBackend) {
    let temp_dir = TempDir::new().unwrap();

    let (kept, updated_at) = {
        let engine = WarRoom::open(disk_config(temp_dir.path(), backend)).unwrap();
        let registry = engine.registry();
        let kept = registry.create_agent(AgentDraft::new("Kept", "stays").with_avatar("kept.png"));
        let dropped = registry.create_agent(AgentDraft::new("Dropped", "goes"));
        let renamed = registry
            .update_agent(
                kept.id(),
                AgentUpdate {
                    name: Some("Kept Renamed".to_string()),
                    ..AgentUpdate::default()
                },
            )
            .unwrap();
        assert!(registry.delete_agent(dropped.id()));
        registry.save_agents().unwrap();
        (kept, renamed.updated_at())
    };

    let engine = WarRoom::open(disk_config(temp_dir.path(), backend)).unwrap();
    let agents = engine.registry().get_all_agents();
    assert_eq!(agents.len(), 1);
    let restored = &agents[0];
    assert_eq!(restored.id(), kept.id());
    assert_eq!(restored.name(), "Kept Renamed");
    assert_eq!(restored.avatar(), Some("kept.png"));
    assert_eq!(restored.created_at(), kept.created_at());
    assert_eq!(restored.updated_at(), updated_at);
    assert!(restored.updated_at() > restored.created_at());
}

#[test]
fn file_backend_round_trips_agents() {
    reopen_preserves_agents(StorageBackend::File);
}

#[test]
fn sled_backend_round_trips_agents() {
    reopen_preserves_agents(StorageBackend::Sled);
}

#[test]
fn non_utf8_collections_start_empty() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let store = FileStore::open(temp_dir.path())?;
    let garbage = [0xff, 0xfe, b'[', b']'];
    std::fs::write(store.path_for("ai-warroom-agents"), garbage)?;
    std::fs::write(store.path_for("ai-warroom-experience-events"), garbage)?;

    let engine = WarRoom::open(disk_config(temp_dir.path(), StorageBackend::File))?;
    assert!(engine.registry().is_empty());
    assert!(engine.ledger().all_events().is_empty());
    assert_eq!(engine.catalog().all_challenges().len(), 3);
    Ok(())
}

#[test]
fn malformed_agent_file_starts_empty() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let store = FileStore::open(temp_dir.path())?;
    store.put("ai-warroom-agents", "{\"not\": \"an array\"}")?;

    let engine = WarRoom::open(disk_config(temp_dir.path(), StorageBackend::File))?;
    assert!(engine.registry().is_empty());

    engine.registry().create_agent(AgentDraft::new("Fresh", "after reset"));
    engine.registry().save_agents()?;
    let raw = store
        .get("ai-warroom-agents")?
        .ok_or_else(|| anyhow::anyhow!("agents were not written"))?;
    let parsed: serde_json::Value = serde_json::from_str(&raw)?;
    assert_eq!(parsed.as_array().map(Vec::len), Some(1));
    Ok(())
}

#[test]
fn persisted_agent_json_uses_camel_case_fields() {
    let temp_dir = TempDir::new().unwrap();
    let engine = WarRoom::open(disk_config(temp_dir.path(), StorageBackend::File)).unwrap();
    engine.registry().create_agent(
        warroom::behaviors::SecurityBehavior::default_profile("Sentinel", "scanner"),
    );
    engine.registry().save_agents().unwrap();

    let raw = engine.store().get("ai-warroom-agents").unwrap().unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let agent = &parsed[0];
    assert!(agent.get("createdAt").and_then(|v| v.as_str()).is_some());
    assert!(agent.get("updatedAt").and_then(|v| v.as_str()).is_some());
    assert_eq!(agent["level"], 1);
    assert_eq!(agent["modules"][0]["capability"], "security_analysis");
    assert_eq!(agent["modules"][0]["isActive"], true);
}
