//! Durable client-local storage.
//!
//! A small key-value abstraction that survives restarts. The conversation
//! history is its only tenant today. [`SqliteStore`] backs the binary;
//! [`MemoryStore`] is the in-process substitute used by tests.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use async_trait::async_trait;

use crate::error::StorageResult;

/// Persistent string key-value store.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    async fn get(&self, key: &str) -> StorageResult<Option<String>>;
    /// Insert or replace the value stored under `key`.
    async fn set(&self, key: &str, value: &str) -> StorageResult<()>;
    /// Delete `key`. Deleting a missing key succeeds.
    async fn remove(&self, key: &str) -> StorageResult<()>;
}
