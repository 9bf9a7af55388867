//! Classification of raw broker responses into token results or errors.

// self
use crate::{
	_prelude::*,
	auth::TokenResult,
	broker::RawTokenResponse,
	error::ServiceError,
};

/// Error code some brokers emit instead of an official one; passed through unchanged.
pub const UNOFFICIAL_ERROR_CODE: &str = "MSALErrorDomain";

/// Turns a raw broker response into a [`TokenResult`] or a classified error.
///
/// Classification is evaluated in order, first match wins:
///
/// 1. A non-empty `error` yields [`Error::Service`] with the code verbatim and the message
///    `"Broker response returned error: "` followed by the description (possibly empty).
/// 2. No access, id or refresh token yields [`Error::UnknownBroker`] with fixed code and
///    message, regardless of any other field. A description without a code lands here.
/// 3. Otherwise every present field is copied into the result. A response carrying only a
///    refresh token passes; callers decide whether such a result is usable.
///
/// Empty strings count as absent. Pure: no I/O, no retries, no shared state.
pub fn validate_broker_response(raw: RawTokenResponse) -> Result<TokenResult> {
	if let Some(code) = raw.error_code() {
		#[cfg(feature = "tracing")]
		if code == UNOFFICIAL_ERROR_CODE {
			tracing::warn!(code, "Broker returned an unofficial error code.");
		}

		return Err(ServiceError::from_broker(code, raw.description()).into());
	}
	if !raw.has_token() {
		#[cfg(feature = "tracing")]
		tracing::warn!(
			has_description = raw.description().is_some(),
			"Broker response carries neither a token nor an error code."
		);

		return Err(Error::unknown_broker());
	}
	#[cfg(feature = "tracing")]
	if raw.access_token().is_none() && raw.id_token().is_none() {
		tracing::warn!("Broker response has no access or id token; passing it through.");
	}

	Ok(into_token_result(raw))
}

fn into_token_result(raw: RawTokenResponse) -> TokenResult {
	let mut builder = TokenResult::builder();

	if let Some(token) = raw.access_token() {
		builder = builder.access_token(token);
	}
	if let Some(token) = raw.id_token() {
		builder = builder.id_token(token);
	}
	if let Some(token) = raw.refresh_token() {
		builder = builder.refresh_token(token);
	}
	if let Some(blob) = present(raw.client_info) {
		builder = builder.client_info(blob);
	}
	if let Some(secs) = raw.expires_in {
		builder = builder.expires_in(secs);
	}
	if let Some(id) = present(raw.correlation_id) {
		builder = builder.correlation_id(id);
	}
	if let Some(scope) = present(raw.scope) {
		builder = builder.scope(scope);
	}
	if let Some(token_type) = present(raw.token_type) {
		builder = builder.token_type(token_type);
	}

	builder.build()
}

fn present(value: Option<String>) -> Option<String> {
	value.filter(|v| !v.is_empty())
}
