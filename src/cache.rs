//! Token cache contract fed with validated results, plus an in-memory implementation.

pub mod memory;

pub use memory::MemoryCache;

// self
use crate::{
	_prelude::*,
	auth::{ScopeSet, TokenResult},
};

/// Future returned by [`TokenCache`] operations.
pub type CacheFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, CacheError>> + 'a + Send>>;

/// Write path for validated token results.
///
/// Only successful results reach the cache; failures and fallback signals never do.
pub trait TokenCache
where
	Self: Send + Sync,
{
	/// Persists or replaces the result stored under `key`.
	fn save(&self, key: CacheKey, result: TokenResult) -> CacheFuture<'_, ()>;

	/// Fetches the result stored under `key`, if any.
	fn fetch<'a>(&'a self, key: &'a CacheKey) -> CacheFuture<'a, Option<TokenResult>>;
}

/// Error type produced by [`TokenCache`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum CacheError {
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

/// Cache partition: account, client and scope fingerprint.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
	/// Home account identifier (`uid.utid`); `None` when the broker returned no client info.
	pub home_account_id: Option<String>,
	/// Client identifier the token was issued to.
	pub client_id: String,
	/// Authority host and tenant the token was issued by.
	pub environment: String,
	/// Scope fingerprint used for partitioning.
	pub scope_fingerprint: String,
}
impl CacheKey {
	/// Builds a key from its components.
	pub fn new(
		home_account_id: Option<String>,
		client_id: impl Into<String>,
		environment: impl Into<String>,
		scope: &ScopeSet,
	) -> Self {
		Self {
			home_account_id,
			client_id: client_id.into(),
			environment: environment.into(),
			scope_fingerprint: scope.fingerprint(),
		}
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::error::Error as StdError;
	// self
	use super::*;
	use crate::error::Error;

	#[test]
	fn cache_error_converts_into_crate_error_with_source() {
		let cache_error = CacheError::Backend { message: "keychain locked".into() };
		let error: Error = cache_error.clone().into();

		assert!(matches!(error, Error::Cache(_)));
		assert!(error.to_string().contains("keychain locked"));

		let source =
			StdError::source(&error).expect("Crate error should expose the cache error as source.");

		assert_eq!(source.to_string(), cache_error.to_string());
	}

	#[test]
	fn key_ignores_scope_order() {
		let a = ScopeSet::new(["profile", "email"]).expect("First scope fixture should be valid.");
		let b = ScopeSet::new(["email", "profile"]).expect("Second scope fixture should be valid.");
		let key_a = CacheKey::new(Some("uid.utid".into()), "app", "login.example.com/home", &a);
		let key_b = CacheKey::new(Some("uid.utid".into()), "app", "login.example.com/home", &b);

		assert_eq!(key_a, key_b);
		assert_ne!(key_a, CacheKey::new(None, "app", "login.example.com/home", &a));
	}
}
