use warroom::behaviors::SecurityBehavior;
use warroom::decision::FixedDecisions;
use warroom::nft::{AttributeValue, NftInfo};
use warroom::progression::ExperienceKind;
use warroom::{AgentDraft, ApiError};

use crate::integration::support::memory_engine;

fn attribute<'a>(info: &'a NftInfo, trait_type: &str) -> &'a AttributeValue {
    &info
        .metadata
        .attributes
        .iter()
        .find(|a| a.trait_type == trait_type)
        .unwrap()
        .value
}

#[tokio::test]
async fn minted_agent_imports_as_independent_copy() {
    let engine = memory_engine(FixedDecisions::never());
    let original = engine.registry().create_agent(
        SecurityBehavior::default_profile("Security Guardian", "watches the gates"),
    );
    let original = engine
        .ledger()
        .add_experience(original.id(), ExperienceKind::SecurityScan, 320, None)
        .unwrap()
        .unwrap();

    let nft = engine.nft();
    nft.connect_wallet().await.unwrap();
    let minted = nft.mint_agent_nft(&original).await.unwrap();
    assert_eq!(attribute(&minted, "Type"), &AttributeValue::Text("Security".to_string()));
    assert_eq!(attribute(&minted, "Rarity"), &AttributeValue::Text("Rare".to_string()));
    assert_eq!(attribute(&minted, "Level"), &AttributeValue::Number(3));
    assert_eq!(attribute(&minted, "Modules"), &AttributeValue::Number(4));

    // Progress after minting does not leak into the snapshot.
    engine
        .ledger()
        .add_experience(original.id(), ExperienceKind::SecurityScan, 500, None)
        .unwrap();

    let imported = nft
        .import_agent_from_nft(&minted.token_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(imported.name(), original.name());
    assert_eq!(imported.level(), original.level());
    assert_eq!(imported.experience(), 320);
    assert_eq!(imported.modules().len(), original.modules().len());
    assert_eq!(engine.registry().len(), 1);

    let registered = engine.registry().create_agent(AgentDraft::from(&imported));
    assert_ne!(registered.id(), original.id());
    assert_eq!(registered.level(), imported.level());
    assert_eq!(engine.registry().len(), 2);
}

#[tokio::test]
async fn envelope_survives_json_round_trip() {
    let engine = memory_engine(FixedDecisions::never());
    engine.nft().connect_wallet().await.unwrap();
    let owned = engine.nft().owned_nfts().await.unwrap();
    assert_eq!(owned.len(), 2);

    let json = serde_json::to_string(&owned[0]).unwrap();
    assert!(json.contains("\"tokenId\":\"1\""));
    assert!(json.contains("\"agentData\""));
    assert!(json.contains("\"trait_type\":\"Rarity\""));
    let restored: NftInfo = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, owned[0]);
}

#[tokio::test]
async fn disconnecting_blocks_token_operations() {
    let engine = memory_engine(FixedDecisions::never());
    let nft = engine.nft();
    nft.connect_wallet().await.unwrap();
    assert!(nft.import_agent_from_nft("2").await.unwrap().is_some());

    nft.disconnect_wallet().await.unwrap();
    assert!(!nft.is_connected());
    assert!(matches!(
        nft.import_agent_from_nft("2").await,
        Err(ApiError::WalletNotConnected)
    ));
    assert!(matches!(nft.owned_nfts().await, Err(ApiError::WalletNotConnected)));
}
