//! Invocation payload handed to the broker.

// crates.io
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	request::{InteractiveParameters, RequestParameters, ServiceContext},
};

/// Keys understood by broker integrations.
pub mod keys {
	/// Canonical authority URI.
	pub const AUTHORITY: &str = "authority";
	/// Space-joined requested scopes.
	pub const SCOPE: &str = "scope";
	/// Space-joined scopes to consent to up front.
	pub const EXTRA_CONSENT_SCOPES: &str = "extra_consent_scopes";
	/// Application client identifier.
	pub const CLIENT_ID: &str = "client_id";
	/// Request correlation identifier.
	pub const CORRELATION_ID: &str = "correlation_id";
	/// Extra query parameters, form-urlencoded.
	pub const EXTRA_QP: &str = "extra_qp";
	/// Claims challenge.
	pub const CLAIMS: &str = "claims";
	/// Redirect URI.
	pub const REDIRECT_URI: &str = "redirect_uri";
	/// Login hint.
	pub const USERNAME: &str = "username";
	/// Prompt behaviour.
	pub const PROMPT: &str = "prompt";
	/// Client library name.
	pub const CLIENT_NAME: &str = "client_name";
	/// Client library version.
	pub const CLIENT_VERSION: &str = "client_version";
}

/// String map handed to [`BrokerCapability::invoke`](crate::broker::BrokerCapability::invoke).
///
/// Optional keys are omitted rather than sent empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BrokerPayload(BTreeMap<String, String>);
impl BrokerPayload {
	/// Builds the payload for one request.
	pub fn from_request(
		params: &RequestParameters,
		interactive: Option<&InteractiveParameters>,
		service: &ServiceContext,
	) -> Self {
		let mut payload = Self::default();

		payload.insert(keys::AUTHORITY, params.authority().as_str());
		payload.insert(keys::SCOPE, params.scope().normalized());
		payload.insert(keys::CLIENT_ID, service.client_id.to_string());
		payload.insert(keys::CORRELATION_ID, params.correlation_id().to_string());
		payload.insert(keys::CLIENT_NAME, service.client_name.as_str());
		payload.insert(keys::CLIENT_VERSION, service.client_version.as_str());

		if !params.extra_query_parameters().is_empty() {
			let encoded = form_urlencoded::Serializer::new(String::new())
				.extend_pairs(params.extra_query_parameters())
				.finish();

			payload.insert(keys::EXTRA_QP, encoded);
		}
		if let Some(claims) = params.claims() {
			payload.insert(keys::CLAIMS, claims);
		}
		if let Some(redirect) = params.redirect_uri().or(service.redirect_uri.as_ref()) {
			payload.insert(keys::REDIRECT_URI, redirect.as_str());
		}

		let login_hint =
			interactive.and_then(|options| options.login_hint.as_deref()).or(params.login_hint());

		if let Some(hint) = login_hint {
			payload.insert(keys::USERNAME, hint);
		}
		if let Some(options) = interactive {
			payload.insert(keys::PROMPT, options.prompt.as_str());

			if !options.extra_scopes_to_consent.is_empty() {
				payload.insert(
					keys::EXTRA_CONSENT_SCOPES,
					options.extra_scopes_to_consent.normalized(),
				);
			}
		}

		payload
	}

	/// Inserts or replaces a value.
	pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
		self.0.insert(key.into(), value.into());
	}

	/// Looks up a value.
	pub fn get(&self, key: &str) -> Option<&str> {
		self.0.get(key).map(String::as_str)
	}

	/// Number of entries.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns `true` when the payload has no entries.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Iterates over entries in key order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	/// Unwraps the underlying map.
	pub fn into_inner(self) -> BTreeMap<String, String> {
		self.0
	}
}
impl<K, V> FromIterator<(K, V)> for BrokerPayload
where
	K: Into<String>,
	V: Into<String>,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
	}
}
