//! Async Rust client for the Ufanet intercom and CCTV API (`dom.ufanet.ru`).
//!
//! The heart of the crate is [`UfanetClient`], which owns the token
//! lifecycle: password login by contract number, transparent access-token
//! refresh before expiry, fallback to a fresh login when the refresh token
//! itself has expired, and a synchronous [`TokenSink`] callback so the host
//! can persist every token change. On top of that sit thin endpoint
//! surfaces for intercoms (door relays) and CCTV cameras (RTSP stream and
//! snapshot URLs).
//!
//! The client is built for sequential use: each operation runs to
//! completion before the next starts, and callers are expected to
//! serialize access to one client instance.

pub mod cctv;
pub mod client;
pub mod error;
pub mod intercoms;
pub mod token;
pub mod transport;

pub use cctv::Camera;
pub use client::UfanetClient;
pub use error::Error;
pub use intercoms::Intercom;
pub use token::{Credentials, TokenSink, TokenUpdate};
pub use transport::TransportConfig;

/// Production API root.
pub const DEFAULT_BASE_URL: &str = "https://dom.ufanet.ru/";
