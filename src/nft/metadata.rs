//! NFT envelope records and the classification rules used when minting.

use crate::agent::Agent;
use crate::types::{Timestamp, TokenId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Trait value, either numeric or text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Number(i64),
    Text(String),
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Number(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftAttribute {
    pub trait_type: String,
    pub value: AttributeValue,
}

impl NftAttribute {
    pub fn new(trait_type: &str, value: impl Into<AttributeValue>) -> Self {
        Self {
            trait_type: trait_type.to_string(),
            value: value.into(),
        }
    }
}

/// Metadata envelope embedding a full agent snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NftMetadata {
    pub name: String,
    pub description: String,
    pub image: String,
    pub attributes: Vec<NftAttribute>,
    pub agent_data: Agent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NftInfo {
    pub token_id: TokenId,
    pub contract_address: String,
    pub owner: String,
    pub metadata: NftMetadata,
    pub created_at: Timestamp,
    pub last_transferred_at: Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentType {
    CodeReview,
    Security,
    Optimization,
    General,
}

impl AgentType {
    /// Classify an agent by keywords in its name.
    pub fn classify(agent: &Agent) -> Self {
        let name = agent.name().to_lowercase();
        if name.contains("code") || name.contains("review") {
            AgentType::CodeReview
        } else if name.contains("security") || name.contains("guardian") {
            AgentType::Security
        } else if name.contains("performance") || name.contains("optimi") {
            AgentType::Optimization
        } else {
            AgentType::General
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentType::CodeReview => "Code Review",
            AgentType::Security => "Security",
            AgentType::Optimization => "Optimization",
            AgentType::General => "General",
        }
    }
}

impl fmt::Display for AgentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    /// Tier from level and total module count.
    pub fn of(agent: &Agent) -> Self {
        let level = agent.level().get();
        let modules = agent.modules().len();
        match (level, modules) {
            (4.., 6..) => Rarity::Legendary,
            (3.., 5..) => Rarity::Epic,
            (2.., 4..) => Rarity::Rare,
            _ => Rarity::Common,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Rarity::Common => "Common",
            Rarity::Rare => "Rare",
            Rarity::Epic => "Epic",
            Rarity::Legendary => "Legendary",
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Level, Type, Rarity and Modules traits for a freshly minted agent
pub fn agent_attributes(agent: &Agent) -> Vec<NftAttribute> {
    vec![
        NftAttribute::new("Level", i64::from(agent.level().get())),
        NftAttribute::new("Type", AgentType::classify(agent).as_str()),
        NftAttribute::new("Rarity", Rarity::of(agent).as_str()),
        NftAttribute::new("Modules", agent.modules().len() as i64),
    ]
}
