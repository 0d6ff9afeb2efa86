//! Remote ledger seam
//!
//! The backend that actually moves the token balance is an external
//! collaborator; this trait is the whole contract the orchestrator needs.

use async_trait::async_trait;

/// Server-provided content for the success notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StealReceipt {
    /// Optional notification title
    pub title: Option<String>,
    /// Notification body
    pub message: String,
}

/// Remote/business rejection (insufficient funds, self-target, server
/// refusal). The message is surfaced to the user verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct LedgerError {
    /// Server-provided error message
    pub message: String,
}

impl LedgerError {
    /// Create an error carrying the server's message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Client for the remote ledger's steal operation
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Attempt to steal one token from the given account.
    ///
    /// Resolves with notification content on success; fails with the
    /// server's rejection message otherwise.
    async fn steal_token(&self, account_id: &str) -> Result<StealReceipt, LedgerError>;
}
