//! Key/value persistence for allocated subnets.
//!
//! The allocator core never touches storage directly; the service drives a
//! [`Storage`] implementation through this contract. Keys are
//! slash-separated paths.

pub mod memory;

pub use memory::MemoryStorage;

use crate::error::Result;

/// Key/value storage contract.
///
/// Implementations are expected to be safe to share across threads; any
/// serialization of concurrent callers is their responsibility.
pub trait Storage: Send + Sync {
    /// Store `value` under `key`, overwriting any previous value.
    fn put(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Deleting a key that does not exist is a no-op.
    fn delete(&self, key: &str) -> Result<()>;

    /// Whether `key` currently holds a value.
    fn exists(&self, key: &str) -> Result<bool>;

    /// The value stored under `key`, or `NotFound`.
    fn search(&self, key: &str) -> Result<String>;

    /// For every key beginning with `prefix` followed by a slash, the
    /// remainder of the key after that slash.
    ///
    /// A prefix that matches no key fails with `NotFound`, never an empty
    /// list; callers treat `NotFound` as equivalent to empty.
    fn list(&self, prefix: &str) -> Result<Vec<String>>;
}
