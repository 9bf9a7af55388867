//! Broker capability providers and the factory that picks one per host.
//!
//! [`BrokerCapability`] is the seam between flows and whatever talks to the platform broker.
//! `can_invoke` is a cheap, infallible probe; `invoke` hands a [`BrokerPayload`] to the
//! broker and suspends until it answers, fails, or the caller cancels. [`BrokerFactory`]
//! resolves the provider once from an explicit [`Platform`] tag and falls back to
//! [`NullBroker`] when nothing is registered, so flows never special-case "no broker".

pub mod channel;
pub mod factory;
pub mod null;
pub mod payload;
pub mod response;

pub use channel::*;
pub use factory::*;
pub use null::*;
pub use payload::*;
pub use response::*;

// self
use crate::{_prelude::*, request::BrokerEnvironment};

/// Boxed future returned by [`BrokerCapability::invoke`].
pub type BrokerFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

/// Platform-specific access to a token broker.
///
/// Implementations are shared across concurrent requests. If the underlying broker
/// connection is exclusive, the implementation serializes `invoke` calls itself.
pub trait BrokerCapability
where
	Self: Send + Sync,
{
	/// Reports whether the broker can serve a request in `env`.
	///
	/// Must return `false`, never panic, when `env` is `None`, when broker use is disabled,
	/// or when the host has no broker integration.
	fn can_invoke(&self, env: Option<&BrokerEnvironment>) -> bool;

	/// Hands `payload` to the broker and waits for its raw response.
	///
	/// Implementations should stop waiting once `cancel` fires and resolve to
	/// [`Error::Cancelled`]. Dropping the returned future also abandons the call.
	fn invoke(
		&self,
		payload: BrokerPayload,
		cancel: CancellationToken,
	) -> BrokerFuture<'_, RawTokenResponse>;
}

/// Host platform tag used to select a broker integration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
	/// Android (account manager / authenticator app).
	Android,
	/// iOS (authenticator app via URL schemes).
	Ios,
	/// macOS (enterprise SSO extension).
	#[serde(rename = "macos")]
	MacOs,
	/// Windows (web account manager).
	Windows,
	/// Linux (identity broker service over D-Bus).
	Linux,
	/// Anything else.
	Other,
}
impl Platform {
	/// Platform of the compile target.
	pub const fn current() -> Self {
		if cfg!(target_os = "android") {
			Platform::Android
		} else if cfg!(target_os = "ios") {
			Platform::Ios
		} else if cfg!(target_os = "macos") {
			Platform::MacOs
		} else if cfg!(target_os = "windows") {
			Platform::Windows
		} else if cfg!(target_os = "linux") {
			Platform::Linux
		} else {
			Platform::Other
		}
	}

	/// Returns a stable label.
	pub const fn as_str(self) -> &'static str {
		match self {
			Platform::Android => "android",
			Platform::Ios => "ios",
			Platform::MacOs => "macos",
			Platform::Windows => "windows",
			Platform::Linux => "linux",
			Platform::Other => "other",
		}
	}
}
impl Display for Platform {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
