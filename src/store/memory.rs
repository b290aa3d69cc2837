//! Thread-safe in-memory [`TokenStore`] implementation.

// self
use crate::{
	_prelude::*,
	auth::CachedToken,
	store::{StoreError, StoreFuture, TokenStore},
};

type StoreMap = Arc<RwLock<HashMap<String, CachedToken>>>;

/// Process-local store; the default backing for [`TokenCache`](crate::cache::TokenCache).
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(StoreMap);
impl MemoryStore {
	/// Number of cached entries.
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// Returns true when nothing is cached.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}

	fn save_now(map: StoreMap, key: String, token: CachedToken) -> Result<(), StoreError> {
		map.write().insert(key, token);

		Ok(())
	}

	fn fetch_now(map: StoreMap, key: &str) -> Option<CachedToken> {
		map.read().get(key).cloned()
	}

	fn remove_now(map: StoreMap, key: &str) -> Option<CachedToken> {
		map.write().remove(key)
	}
}
impl TokenStore for MemoryStore {
	fn save<'a>(&'a self, key: &'a str, token: CachedToken) -> StoreFuture<'a, ()> {
		let map = self.0.clone();
		let key = key.to_owned();

		Box::pin(async move { Self::save_now(map, key, token) })
	}

	fn fetch<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<CachedToken>> {
		let map = self.0.clone();

		Box::pin(async move { Ok(Self::fetch_now(map, key)) })
	}

	fn remove<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<CachedToken>> {
		let map = self.0.clone();

		Box::pin(async move { Ok(Self::remove_now(map, key)) })
	}
}
