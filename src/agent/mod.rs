//! Agent Model
//!
//! Agents are leveled entities with experience and an ordered module list.
//! The registry owns the live collection and is the only place agent ids are
//! assigned.

pub mod entity;
pub mod registry;

pub use entity::{
    Agent, AgentDraft, AgentLevel, AgentModule, AgentUpdate, Capability, EXPERIENCE_THRESHOLDS,
};
pub use registry::{AgentRegistry, DEFAULT_AGENTS_KEY};
