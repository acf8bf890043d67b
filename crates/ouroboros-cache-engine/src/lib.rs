//! In-process reference engine for the ouroboros cache client
//!
//! # Features
//! - Sharded keyspace per cache with lazy TTL expiry
//! - Scalars, dictionaries, lists, sets and sorted sets with collection TTL
//! - Leaderboards, typed stores, vector indexes and webhooks
//! - [`LocalTransport`] plugging the engine into a `CacheClient`, with one-shot
//!   fault injection

mod commands;
pub mod engine;
pub mod error;
pub mod item;
pub mod keyspace;
pub mod leaderboard;
pub mod ranking;
pub mod store;
pub mod transport;
pub mod vector;
pub mod webhook;

pub use engine::{CacheEngine, CacheState};
pub use error::EngineError;
pub use keyspace::Keyspace;
pub use transport::LocalTransport;
