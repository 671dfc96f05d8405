//! Integration tests for the war room engine

mod analyzers;
mod nft_roundtrip;
mod progression_flow;
mod registry_persistence;
mod support;
