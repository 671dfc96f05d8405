//! War Room: Agent Progression and Persistence Engine
//!
//! Agents carry togglable capability modules and level up from experience.
//! Three heuristic analyzers review, scan and optimize code on an agent's
//! behalf; an experience ledger and a challenge catalog drive progression;
//! an NFT wrapper snapshots agents into mock tokens and restores them.
//! Every collection persists as a JSON array through a key-value store port.
//!
//! `engine::WarRoom` wires one instance of each service together.

pub mod agent;
pub mod behaviors;
pub mod config;
pub mod decision;
pub mod engine;
pub mod error;
pub mod logging;
pub mod nft;
pub mod progression;
pub mod store;
pub mod types;

pub use agent::{Agent, AgentDraft, AgentLevel, AgentModule, AgentRegistry, AgentUpdate, Capability};
pub use engine::WarRoom;
pub use error::{ApiError, StorageError};
