//! Error taxonomy shared by the broker subsystem, its flows, and its collaborators.

// self
use crate::{_prelude::*, broker::Platform};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Fixed (code, message) pairs attached to classified outcomes that carry no upstream text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FixedError {
	/// Broker answered with neither a token nor an error.
	BrokerResponseReturnedError,
	/// No broker integration exists for the host platform.
	PlatformNotSupported,
}
impl FixedError {
	/// Prefix prepended to broker-reported error descriptions.
	pub const BROKER_RESPONSE_ERROR_PREFIX: &'static str = "Broker response returned error: ";

	/// Stable error code.
	pub const fn code(self) -> &'static str {
		match self {
			FixedError::BrokerResponseReturnedError => "broker_response_returned_error",
			FixedError::PlatformNotSupported => "platform_not_supported",
		}
	}

	/// Stable human-readable message.
	pub const fn message(self) -> &'static str {
		match self {
			FixedError::BrokerResponseReturnedError =>
				"Broker response returned an error which does not contain an error or error description.",
			FixedError::PlatformNotSupported => "Broker is not supported on this platform.",
		}
	}
}

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// The broker cannot serve this request; retry through the interactive flow.
	///
	/// This is a control signal, not a failure.
	#[error(transparent)]
	Fallback(FallbackSignal),
	/// The broker or authority reported an explicit, named error.
	#[error(transparent)]
	Service(#[from] ServiceError),
	/// The broker returned neither a usable token nor an error.
	#[error("{message}")]
	UnknownBroker {
		/// Fixed error code.
		code: &'static str,
		/// Fixed error message.
		message: &'static str,
	},
	/// A provider without a concrete broker was invoked.
	///
	/// Displays the fixed message; the platform tag is kept for diagnostics.
	#[error("{}", FixedError::PlatformNotSupported.message())]
	PlatformNotSupported {
		/// Host platform tag.
		platform: Platform,
	},
	/// The caller cancelled the request before the broker answered.
	#[error("Broker request was cancelled.")]
	Cancelled,

	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Broker channel failure.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Token cache failure.
	#[error("{0}")]
	Cache(
		#[from]
		#[source]
		crate::cache::CacheError,
	),
}
impl Error {
	/// Builds the indeterminate broker failure from the fixed table.
	pub const fn unknown_broker() -> Self {
		let fixed = FixedError::BrokerResponseReturnedError;

		Self::UnknownBroker { code: fixed.code(), message: fixed.message() }
	}

	/// Returns `true` when the caller should fall back to the interactive flow.
	pub fn is_fallback(&self) -> bool {
		matches!(self, Self::Fallback(_))
	}

	/// Returns `true` when the request was cancelled by the caller.
	pub fn is_cancelled(&self) -> bool {
		matches!(self, Self::Cancelled)
	}

	/// Error code for classified outcomes, when one exists.
	pub fn error_code(&self) -> Option<&str> {
		match self {
			Self::Service(err) => Some(&err.code),
			Self::UnknownBroker { code, .. } => Some(code),
			Self::PlatformNotSupported { .. } => Some(FixedError::PlatformNotSupported.code()),
			_ => None,
		}
	}
}

/// Explicit error reported by the broker or the authority.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("{message}")]
pub struct ServiceError {
	/// Error code, propagated verbatim.
	pub code: String,
	/// Annotated error message.
	pub message: String,
}
impl ServiceError {
	/// Creates a service error from a code and message.
	pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
		Self { code: code.into(), message: message.into() }
	}

	/// Builds the error for a broker-reported failure, prefixing the description so the
	/// origin stays distinguishable from a token-endpoint error.
	pub fn from_broker(code: impl Into<String>, description: Option<&str>) -> Self {
		let message =
			format!("{}{}", FixedError::BROKER_RESPONSE_ERROR_PREFIX, description.unwrap_or_default());

		Self::new(code, message)
	}
}

/// Why the broker path was declined.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FallbackReason {
	/// Broker use is disabled for the request.
	BrokerDisabled,
	/// The provider reported it cannot serve the request here.
	BrokerUnavailable,
}
impl FallbackReason {
	/// Returns a stable label.
	pub const fn as_str(self) -> &'static str {
		match self {
			FallbackReason::BrokerDisabled => "broker_disabled",
			FallbackReason::BrokerUnavailable => "broker_unavailable",
		}
	}
}
impl Display for FallbackReason {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Control outcome instructing the caller to use the interactive flow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ThisError)]
#[error("Broker cannot serve this request ({reason}); use the interactive flow.")]
pub struct FallbackSignal {
	/// Why the broker path was declined.
	pub reason: FallbackReason,
}
impl FallbackSignal {
	/// Creates a new signal.
	pub const fn new(reason: FallbackReason) -> Self {
		Self { reason }
	}
}
impl From<FallbackSignal> for Error {
	fn from(signal: FallbackSignal) -> Self {
		Self::Fallback(signal)
	}
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Authority is not a valid absolute URI.
	#[error("Authority is not a valid URI.")]
	InvalidAuthority {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Authority uses a scheme other than HTTPS.
	#[error("Authority must use HTTPS: {url}.")]
	InsecureAuthority {
		/// Offending authority.
		url: String,
	},
	/// Authority has no tenant path segment.
	#[error("Authority is missing a tenant segment: {url}.")]
	MissingTenant {
		/// Offending authority.
		url: String,
	},
	/// Redirect URI cannot be parsed.
	#[error("Redirect URI is invalid.")]
	InvalidRedirect {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Request scopes cannot be normalized.
	#[error("Requested scopes are invalid.")]
	InvalidScope(#[from] crate::auth::ScopeValidationError),
	/// Requests must carry at least one scope.
	#[error("Request must include at least one scope.")]
	EmptyScope,
	/// Identifier validation failed.
	#[error(transparent)]
	InvalidIdentifier(#[from] crate::auth::IdentifierError),
	/// An orchestrator was asked to run more than once.
	#[error("Broker request has already been started.")]
	RequestReused,
}

/// Failures on the channel between this process and the broker.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// The broker side of the channel went away before answering.
	#[error("Broker disconnected before answering.")]
	BrokerDisconnected,
	/// The broker answered with a payload that is not a token response.
	#[error("Broker returned a malformed response.")]
	MalformedResponse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn broker_service_error_prefixes_description() {
		let err = ServiceError::from_broker("invalid_grant", Some("AADSTS70000"));

		assert_eq!(err.code, "invalid_grant");
		assert_eq!(err.message, "Broker response returned error: AADSTS70000");

		let bare = ServiceError::from_broker("invalid_grant", None);

		assert_eq!(bare.message, FixedError::BROKER_RESPONSE_ERROR_PREFIX);
	}

	#[test]
	fn classified_errors_expose_codes() {
		let unknown = Error::unknown_broker();

		assert_eq!(unknown.error_code(), Some("broker_response_returned_error"));
		assert_eq!(unknown.to_string(), FixedError::BrokerResponseReturnedError.message());

		let unsupported = Error::PlatformNotSupported { platform: Platform::Linux };

		assert_eq!(unsupported.error_code(), Some("platform_not_supported"));
		assert_eq!(unsupported.to_string(), FixedError::PlatformNotSupported.message());

		let service: Error = ServiceError::new("access_denied", "denied").into();

		assert_eq!(service.error_code(), Some("access_denied"));
		assert!(Error::Cancelled.error_code().is_none());
	}

	#[test]
	fn fallback_is_distinguishable_from_failures() {
		let fallback: Error = FallbackSignal::new(FallbackReason::BrokerUnavailable).into();

		assert!(fallback.is_fallback());
		assert!(!fallback.is_cancelled());
		assert!(fallback.error_code().is_none());
		assert!(!Error::unknown_broker().is_fallback());
		assert!(Error::Cancelled.is_cancelled());
	}
}
