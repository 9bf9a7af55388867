//! Provider used when the host has no broker integration.

// self
use crate::{
	_prelude::*,
	broker::{BrokerCapability, BrokerFuture, BrokerPayload, Platform, RawTokenResponse},
	request::BrokerEnvironment,
};

/// Neutral provider: never capable, and every invocation fails with
/// [`Error::PlatformNotSupported`].
///
/// Reaching `invoke` means a caller skipped `can_invoke`; the error surfaces that contract
/// violation instead of hanging or returning a default response.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NullBroker {
	platform: Platform,
}
impl NullBroker {
	/// Creates the provider for `platform`.
	pub const fn new(platform: Platform) -> Self {
		Self { platform }
	}

	/// Platform this provider stands in for.
	pub const fn platform(&self) -> Platform {
		self.platform
	}
}
impl Default for NullBroker {
	fn default() -> Self {
		Self::new(Platform::current())
	}
}
impl BrokerCapability for NullBroker {
	fn can_invoke(&self, _env: Option<&BrokerEnvironment>) -> bool {
		false
	}

	fn invoke(
		&self,
		_payload: BrokerPayload,
		_cancel: CancellationToken,
	) -> BrokerFuture<'_, RawTokenResponse> {
		let platform = self.platform;

		Box::pin(async move { Err(Error::PlatformNotSupported { platform }) })
	}
}
