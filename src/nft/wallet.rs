//! Wallet connector port and the mock wallet used in place of a real chain.

use crate::error::ApiError;
use async_trait::async_trait;

/// Connection to a wallet provider.
///
/// Async because a real provider would prompt the user or reach a node.
#[async_trait]
pub trait WalletConnector: Send + Sync {
    /// Connect and return the wallet address.
    async fn connect(&self) -> Result<String, ApiError>;

    async fn disconnect(&self) -> Result<(), ApiError>;
}

/// Wallet that always connects to one fixed address
#[derive(Debug, Clone)]
pub struct MockWallet {
    address: String,
}

impl MockWallet {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}

#[async_trait]
impl WalletConnector for MockWallet {
    async fn connect(&self) -> Result<String, ApiError> {
        if self.address.is_empty() {
            return Err(ApiError::Wallet("mock wallet has no address".to_string()));
        }
        Ok(self.address.clone())
    }

    async fn disconnect(&self) -> Result<(), ApiError> {
        Ok(())
    }
}
