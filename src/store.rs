//! Storage contracts and built-in store implementations for cached access tokens.
//!
//! Stores are keyed by the external cache key format (see
//! [`Credential::cache_key`](crate::auth::Credential::cache_key)) so an out-of-process cache can
//! share entries with this crate.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{_prelude::*, auth::CachedToken};

/// Boxed future returned by [`TokenStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Storage backend contract implemented by token stores.
///
/// Implementations must replace values wholesale so concurrent readers observe either the old
/// token or the new one, never a mix.
pub trait TokenStore
where
	Self: Send + Sync,
{
	/// Persists or replaces the token stored under `key`.
	fn save<'a>(&'a self, key: &'a str, token: CachedToken) -> StoreFuture<'a, ()>;

	/// Fetches the token stored under `key`, if present.
	fn fetch<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<CachedToken>>;

	/// Removes and returns the token stored under `key`.
	fn remove<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<CachedToken>>;
}

/// Error type produced by [`TokenStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::error::Error;

	#[test]
	fn store_error_converts_into_sdk_error_with_source() {
		let store_error = StoreError::Backend { message: "redis unreachable".into() };
		let sdk_error: Error = store_error.clone().into();

		assert!(matches!(sdk_error, Error::Storage(_)));
		assert!(sdk_error.to_string().contains("redis unreachable"));

		let source = StdError::source(&sdk_error)
			.expect("SDK error should expose the original store error as its source.");

		assert_eq!(source.to_string(), store_error.to_string());
	}
}
