//! Raw token response returned by a broker (or a token endpoint) before validation.

// crates.io
use serde::{Deserializer, de::Error as DeError};
// self
use crate::{_prelude::*, error::TransportError};

/// Unvalidated response; every field is optional because brokers are not trusted to fill any
/// of them.
///
/// Turn it into a [`TokenResult`](crate::auth::TokenResult) only through
/// [`validate_broker_response`](crate::flows::validate_broker_response).
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawTokenResponse {
	/// Identity token.
	pub id_token: Option<String>,
	/// Access token.
	pub access_token: Option<String>,
	/// Base64url client-info blob.
	pub client_info: Option<String>,
	/// Access token lifetime in seconds; brokers send it as a number or a numeric string.
	#[serde(deserialize_with = "de_expires_in")]
	pub expires_in: Option<u64>,
	/// Echoed correlation identifier.
	pub correlation_id: Option<String>,
	/// Refresh token.
	pub refresh_token: Option<String>,
	/// Space-delimited granted scopes.
	pub scope: Option<String>,
	/// Token type.
	pub token_type: Option<String>,
	/// Error code.
	pub error: Option<String>,
	/// Error description.
	pub error_description: Option<String>,
}
impl RawTokenResponse {
	/// Parses a broker's JSON answer.
	pub fn from_json(json: &str) -> Result<Self, TransportError> {
		let de = &mut serde_json::Deserializer::from_str(json);

		serde_path_to_error::deserialize(de)
			.map_err(|source| TransportError::MalformedResponse { source })
	}

	/// Error code, treating an empty string as absent.
	pub fn error_code(&self) -> Option<&str> {
		non_empty(self.error.as_deref())
	}

	/// Error description, treating an empty string as absent.
	pub fn description(&self) -> Option<&str> {
		non_empty(self.error_description.as_deref())
	}

	/// Access token, treating an empty string as absent.
	pub fn access_token(&self) -> Option<&str> {
		non_empty(self.access_token.as_deref())
	}

	/// Identity token, treating an empty string as absent.
	pub fn id_token(&self) -> Option<&str> {
		non_empty(self.id_token.as_deref())
	}

	/// Refresh token, treating an empty string as absent.
	pub fn refresh_token(&self) -> Option<&str> {
		non_empty(self.refresh_token.as_deref())
	}

	/// Returns `true` when any access, id or refresh token is present.
	pub fn has_token(&self) -> bool {
		self.access_token().is_some() || self.id_token().is_some() || self.refresh_token().is_some()
	}
}
impl Debug for RawTokenResponse {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		fn redact(value: &Option<String>) -> Option<&'static str> {
			value.as_ref().map(|_| "<redacted>")
		}

		f.debug_struct("RawTokenResponse")
			.field("id_token", &redact(&self.id_token))
			.field("access_token", &redact(&self.access_token))
			.field("client_info", &self.client_info)
			.field("expires_in", &self.expires_in)
			.field("correlation_id", &self.correlation_id)
			.field("refresh_token", &redact(&self.refresh_token))
			.field("scope", &self.scope)
			.field("token_type", &self.token_type)
			.field("error", &self.error)
			.field("error_description", &self.error_description)
			.finish()
	}
}

fn non_empty(value: Option<&str>) -> Option<&str> {
	value.filter(|v| !v.is_empty())
}

fn de_expires_in<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
	D: Deserializer<'de>,
{
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum Lifetime {
		Number(u64),
		Text(String),
	}

	match <Option<Lifetime>>::deserialize(deserializer)? {
		None => Ok(None),
		Some(Lifetime::Number(secs)) => Ok(Some(secs)),
		Some(Lifetime::Text(raw)) if raw.trim().is_empty() => Ok(None),
		Some(Lifetime::Text(raw)) => raw
			.trim()
			.parse()
			.map(Some)
			.map_err(|_| DeError::custom(format!("expires_in is not a number: {raw}"))),
	}
}
