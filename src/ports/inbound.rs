//! Inbound port. UI (adapter) calls into the application.

use crate::domain::DomainError;

/// Input port: the terminal UI drives the application session.
#[async_trait::async_trait]
pub trait InputPort: Send + Sync {
    /// Run the interactive admin session until the operator quits.
    async fn run(&self) -> Result<(), DomainError>;
}
