//! Key-value storage boundary.
//!
//! The posts keeper persists everything through the [`KvStore`] trait so any
//! ordered key-value backend can sit underneath it. Values are encoded with
//! bincode, the same encoding used for content hashing.
//!
//! ## Modules
//!
//! - `memory`: `BTreeMap` backed store with deterministic iteration order

pub mod memory;

pub use memory::MemoryStore;

use crate::error::{PostsError, Result};
use serde::{de::DeserializeOwned, Serialize};
use tracing::trace;

// =============================================================================
// Key Generation Utilities
// =============================================================================

/// Creates a store key by appending `suffix` to `prefix`.
///
/// Prefixes carry their own separator (`post:`), so the result is
/// `{prefix}{suffix}`.
pub fn prefixed_key(prefix: &[u8], suffix: &[u8]) -> Vec<u8> {
    let mut key = Vec::with_capacity(prefix.len() + suffix.len());
    key.extend_from_slice(prefix);
    key.extend_from_slice(suffix);
    key
}

/// Serializes a value for storage.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    bincode::serialize(value)
        .map_err(|e| PostsError::serialization(format!("Failed to serialize: {}", e)))
}

/// Deserializes a stored value.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    bincode::deserialize(bytes)
        .map_err(|e| PostsError::serialization(format!("Failed to deserialize: {}", e)))
}

// =============================================================================
// Store Trait
// =============================================================================

/// An ordered key-value store.
pub trait KvStore {
    /// Loads raw bytes from the given key.
    fn get_raw(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;

    /// Stores raw bytes at the given key.
    fn put_raw(&mut self, key: &[u8], value: &[u8]) -> Result<()>;

    /// Deletes a key. Deleting a missing key is not an error.
    fn delete(&mut self, key: &[u8]) -> Result<()>;

    /// Iterates over all entries with the given prefix in key order.
    ///
    /// The callback receives (key, value) pairs and should return true to
    /// continue or false to stop iteration.
    fn prefix_iterate(
        &self,
        prefix: &[u8],
        callback: &mut dyn FnMut(&[u8], &[u8]) -> bool,
    ) -> Result<()>;

    /// Checks if a key exists.
    fn exists(&self, key: &[u8]) -> Result<bool> {
        Ok(self.get_raw(key)?.is_some())
    }

    /// Stores a serializable value at the given key.
    fn put<T: Serialize>(&mut self, key: &[u8], value: &T) -> Result<()>
    where
        Self: Sized,
    {
        let bytes = encode(value)?;
        trace!(
            key_len = key.len(),
            value_bytes = bytes.len(),
            "store_put: storing serialized value"
        );
        self.put_raw(key, &bytes)
    }

    /// Loads and deserializes a value from the given key.
    fn get<T: DeserializeOwned>(&self, key: &[u8]) -> Result<Option<T>>
    where
        Self: Sized,
    {
        match self.get_raw(key)? {
            Some(bytes) => Ok(Some(decode(&bytes)?)),
            None => {
                trace!(key_len = key.len(), "store_get: key not found");
                Ok(None)
            }
        }
    }

    /// Collects all values with the given prefix, deserializing each.
    ///
    /// Fails on the first value that cannot be decoded.
    fn prefix_collect<T: DeserializeOwned>(&self, prefix: &[u8]) -> Result<Vec<T>>
    where
        Self: Sized,
    {
        let mut values = Vec::new();
        let mut failure = None;
        self.prefix_iterate(prefix, &mut |_, value| match decode(value) {
            Ok(decoded) => {
                values.push(decoded);
                true
            }
            Err(e) => {
                failure = Some(e);
                false
            }
        })?;
        match failure {
            Some(e) => Err(e),
            None => Ok(values),
        }
    }
}
