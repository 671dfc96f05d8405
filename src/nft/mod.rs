//! NFT Wrapper
//!
//! Snapshots agents into NFT envelopes and restores them, against an
//! in-memory token table. Wallet connection goes through a `WalletConnector`;
//! every token operation requires a connected wallet.

pub mod metadata;
pub mod wallet;

pub use metadata::{
    agent_attributes, AgentType, AttributeValue, NftAttribute, NftInfo, NftMetadata, Rarity,
};
pub use wallet::{MockWallet, WalletConnector};

use crate::agent::{Agent, AgentDraft, AgentModule, Capability};
use crate::error::ApiError;
use crate::types::{now, Timestamp};
use chrono::{TimeZone, Utc};
use parking_lot::RwLock;
use std::sync::Arc;

pub const DEFAULT_MOCK_ADDRESS: &str = "0xabcdef1234567890abcdef1234567890abcdef12";
pub const DEFAULT_CONTRACT_ADDRESS: &str = "0x1234567890123456789012345678901234567890";
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://example.com/nft-images";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletState {
    Disconnected,
    Connected { address: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NftSettings {
    pub contract_address: String,
    pub image_base_url: String,
    /// Owner of the pre-seeded tokens; `None` starts with an empty table
    pub seed_owner: Option<String>,
}

impl Default for NftSettings {
    fn default() -> Self {
        Self {
            contract_address: DEFAULT_CONTRACT_ADDRESS.to_string(),
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
            seed_owner: Some(DEFAULT_MOCK_ADDRESS.to_string()),
        }
    }
}

pub struct NftWrapper {
    wallet: Arc<dyn WalletConnector>,
    state: RwLock<WalletState>,
    tokens: RwLock<Vec<NftInfo>>,
    settings: NftSettings,
}

impl NftWrapper {
    pub fn new(wallet: Arc<dyn WalletConnector>, settings: NftSettings) -> Self {
        let tokens = match &settings.seed_owner {
            Some(owner) => seeded_tokens(&settings, owner),
            None => Vec::new(),
        };
        Self {
            wallet,
            state: RwLock::new(WalletState::Disconnected),
            tokens: RwLock::new(tokens),
            settings,
        }
    }

    /// Wrapper over a `MockWallet` at the default address with seeded tokens
    pub fn mock() -> Self {
        Self::new(
            Arc::new(MockWallet::new(DEFAULT_MOCK_ADDRESS)),
            NftSettings::default(),
        )
    }

    pub async fn connect_wallet(&self) -> Result<bool, ApiError> {
        let address = self.wallet.connect().await?;
        tracing::info!(address = %address, "Wallet connected");
        *self.state.write() = WalletState::Connected { address };
        Ok(true)
    }

    pub async fn disconnect_wallet(&self) -> Result<bool, ApiError> {
        self.wallet.disconnect().await?;
        *self.state.write() = WalletState::Disconnected;
        tracing::info!("Wallet disconnected");
        Ok(true)
    }

    pub fn is_connected(&self) -> bool {
        matches!(*self.state.read(), WalletState::Connected { .. })
    }

    pub fn wallet_address(&self) -> Option<String> {
        match &*self.state.read() {
            WalletState::Connected { address } => Some(address.clone()),
            WalletState::Disconnected => None,
        }
    }

    fn connected_address(&self) -> Result<String, ApiError> {
        self.wallet_address().ok_or(ApiError::WalletNotConnected)
    }

    /// Snapshot `agent` into a new token owned by the connected wallet.
    pub async fn mint_agent_nft(&self, agent: &Agent) -> Result<NftInfo, ApiError> {
        let owner = self.connected_address()?;
        let minted_at = now();

        let mut tokens = self.tokens.write();
        let token_id = (tokens.len() + 1).to_string();
        let info = NftInfo {
            contract_address: self.settings.contract_address.clone(),
            owner,
            metadata: NftMetadata {
                name: agent.name().to_string(),
                description: agent.description().to_string(),
                image: format!("{}/agent-{}.png", self.settings.image_base_url, token_id),
                attributes: agent_attributes(agent),
                agent_data: agent.clone(),
            },
            created_at: minted_at,
            last_transferred_at: minted_at,
            token_id,
        };
        tokens.push(info.clone());

        tracing::info!(token_id = %info.token_id, agent_id = agent.id(), "Agent minted");
        Ok(info)
    }

    pub async fn owned_nfts(&self) -> Result<Vec<NftInfo>, ApiError> {
        let address = self.connected_address()?;
        Ok(self
            .tokens
            .read()
            .iter()
            .filter(|token| token.owner == address)
            .cloned()
            .collect())
    }

    /// Rebuild the agent carried by a token the wallet owns.
    ///
    /// Returns `Ok(None)` for unknown tokens and tokens owned elsewhere. The
    /// agent is not registered anywhere.
    pub async fn import_agent_from_nft(&self, token_id: &str) -> Result<Option<Agent>, ApiError> {
        let address = self.connected_address()?;
        let tokens = self.tokens.read();
        Ok(tokens
            .iter()
            .find(|token| token.token_id == token_id && token.owner == address)
            .map(|token| token.metadata.agent_data.clone()))
    }
}

fn date(year: i32, month: u32, day: u32) -> Timestamp {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .unwrap_or_else(now)
}

fn seeded_tokens(settings: &NftSettings, owner: &str) -> Vec<NftInfo> {
    let reviewer_minted = date(2023, 1, 15);
    let reviewer = Agent::restored(
        "mock-agent-1".to_string(),
        AgentDraft::new(
            "Elite Code Reviewer",
            "A high-level code review agent with advanced capabilities",
        )
        .with_experience(750)
        .with_modules(vec![AgentModule::new(
            "1",
            "Advanced Pattern Recognition",
            "Identifies complex code patterns and anti-patterns",
            Capability::CodeReview,
            4,
            true,
        )]),
        reviewer_minted,
        reviewer_minted,
    );

    let guardian_minted = date(2023, 2, 10);
    let guardian = Agent::restored(
        "mock-agent-2".to_string(),
        AgentDraft::new(
            "Security Guardian Elite",
            "A specialized security agent with vulnerability detection",
        )
        .with_experience(450)
        .with_modules(vec![AgentModule::new(
            "1",
            "Vulnerability Scanner",
            "Detects common security vulnerabilities",
            Capability::SecurityAnalysis,
            3,
            true,
        )]),
        guardian_minted,
        guardian_minted,
    );

    vec![
        seeded_token(settings, owner, "1", "code-reviewer.png", ("Rare", 8), reviewer, date(2023, 3, 22)),
        seeded_token(settings, owner, "2", "security-guardian.png", ("Epic", 6), guardian, date(2023, 4, 5)),
    ]
}

/// Seeded tokens keep their listed rarity and module count traits.
fn seeded_token(
    settings: &NftSettings,
    owner: &str,
    token_id: &str,
    image: &str,
    (rarity, modules): (&str, i64),
    agent: Agent,
    transferred: Timestamp,
) -> NftInfo {
    NftInfo {
        token_id: token_id.to_string(),
        contract_address: settings.contract_address.clone(),
        owner: owner.to_string(),
        metadata: NftMetadata {
            name: agent.name().to_string(),
            description: agent.description().to_string(),
            image: format!("{}/{}", settings.image_base_url, image),
            attributes: vec![
                NftAttribute::new("Level", i64::from(agent.level().get())),
                NftAttribute::new("Type", AgentType::classify(&agent).as_str()),
                NftAttribute::new("Rarity", rarity),
                NftAttribute::new("Modules", modules),
            ],
            agent_data: agent.clone(),
        },
        created_at: agent.created_at(),
        last_transferred_at: transferred,
    }
}
