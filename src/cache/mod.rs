//! Local persistent key-value cache
//!
//! This module provides a small file-backed store that persists serialized
//! values to the filesystem, one JSON document per key. It carries no
//! freshness policy of its own; callers that cache remote data decide for
//! themselves how old is too old.

mod store;

pub use store::CacheStore;
