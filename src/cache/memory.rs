//! Thread-safe in-memory [`TokenCache`] implementation for local development and tests.

// self
use crate::{
	_prelude::*,
	auth::TokenResult,
	cache::{CacheError, CacheFuture, CacheKey, TokenCache},
};

type CacheMap = Arc<RwLock<HashMap<CacheKey, TokenResult>>>;

/// Keeps validated results in-process.
#[derive(Clone, Debug, Default)]
pub struct MemoryCache(CacheMap);
impl MemoryCache {
	/// Number of cached results.
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// Returns `true` when nothing is cached.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}

	fn save_now(map: CacheMap, key: CacheKey, result: TokenResult) -> Result<(), CacheError> {
		map.write().insert(key, result);

		Ok(())
	}

	fn fetch_now(map: CacheMap, key: CacheKey) -> Option<TokenResult> {
		map.read().get(&key).cloned()
	}
}
impl TokenCache for MemoryCache {
	fn save(&self, key: CacheKey, result: TokenResult) -> CacheFuture<'_, ()> {
		let map = self.0.clone();

		Box::pin(async move { Self::save_now(map, key, result) })
	}

	fn fetch<'a>(&'a self, key: &'a CacheKey) -> CacheFuture<'a, Option<TokenResult>> {
		let map = self.0.clone();
		let key = key.to_owned();

		Box::pin(async move { Ok(Self::fetch_now(map, key)) })
	}
}
