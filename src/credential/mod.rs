//! Session credential acquisition
//!
//! A call needs a short-lived credential minted by an external issuing
//! service. This module provides:
//! - `ChannelId` and `SessionCredential` value types
//! - the `CredentialFetcher` seam used by the session coordinator
//! - `HttpCredentialFetcher`, the reqwest-backed implementation

mod fetcher;
mod http;

pub use fetcher::{ChannelId, CredentialFetcher, SessionCredential};
pub use http::{HttpCredentialFetcher, TokenResponse};
