//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    /// Network/transport failure before any HTTP status arrived.
    #[error("network error: {0}")]
    Transport(String),

    /// Non-success HTTP status, carrying the server-provided (or generic) message.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Response arrived but could not be decoded into the expected shape.
    #[error("unexpected response shape: {0}")]
    Decode(String),

    /// 401 from any endpoint. Global signal: clear local session, back to login.
    #[error("authentication required")]
    Unauthorized,

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("session storage error: {0}")]
    Session(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("input error: {0}")]
    Input(String),
}
