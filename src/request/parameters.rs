//! Immutable per-request parameters consumed by broker flows.

// self
use crate::{
	_prelude::*,
	auth::{CorrelationId, ScopeSet},
	error::ConfigError,
	request::Authority,
};

/// Parameters of one token request, assembled by the caller and borrowed by the flow.
///
/// Extra query parameters are kept sorted by key, not in insertion order, so equal maps
/// always encode to the same `extra_qp` string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestParameters {
	authority: Authority,
	scope: ScopeSet,
	correlation_id: CorrelationId,
	extra_query_parameters: BTreeMap<String, String>,
	claims: Option<String>,
	redirect_uri: Option<Url>,
	login_hint: Option<String>,
	broker_enabled: bool,
}
impl RequestParameters {
	/// Creates a builder for the provided authority and scopes.
	pub fn builder(authority: Authority, scope: ScopeSet) -> RequestParametersBuilder {
		RequestParametersBuilder::new(authority, scope)
	}

	/// Canonical authority.
	pub fn authority(&self) -> &Authority {
		&self.authority
	}

	/// Requested scopes; never empty.
	pub fn scope(&self) -> &ScopeSet {
		&self.scope
	}

	/// Correlation identifier for this request.
	pub fn correlation_id(&self) -> &CorrelationId {
		&self.correlation_id
	}

	/// Extra query parameters, ordered by key.
	pub fn extra_query_parameters(&self) -> &BTreeMap<String, String> {
		&self.extra_query_parameters
	}

	/// Claims challenge, if any.
	pub fn claims(&self) -> Option<&str> {
		self.claims.as_deref()
	}

	/// Redirect URI override for this request.
	pub fn redirect_uri(&self) -> Option<&Url> {
		self.redirect_uri.as_ref()
	}

	/// Login hint (username) for this request.
	pub fn login_hint(&self) -> Option<&str> {
		self.login_hint.as_deref()
	}

	/// Whether the caller allows broker use for this request.
	pub fn is_broker_enabled(&self) -> bool {
		self.broker_enabled
	}
}

/// Builder for [`RequestParameters`].
#[derive(Debug)]
pub struct RequestParametersBuilder {
	authority: Authority,
	scope: ScopeSet,
	correlation_id: Option<CorrelationId>,
	extra_query_parameters: BTreeMap<String, String>,
	claims: Option<String>,
	redirect_uri: Option<Url>,
	login_hint: Option<String>,
	broker_enabled: bool,
}
impl RequestParametersBuilder {
	fn new(authority: Authority, scope: ScopeSet) -> Self {
		Self {
			authority,
			scope,
			correlation_id: None,
			extra_query_parameters: BTreeMap::new(),
			claims: None,
			redirect_uri: None,
			login_hint: None,
			broker_enabled: false,
		}
	}

	/// Uses a caller-supplied correlation identifier instead of generating one.
	pub fn correlation_id(mut self, id: CorrelationId) -> Self {
		self.correlation_id = Some(id);

		self
	}

	/// Adds (or replaces) an extra query parameter; iteration order is by key.
	pub fn extra_query_parameter(
		mut self,
		key: impl Into<String>,
		value: impl Into<String>,
	) -> Self {
		self.extra_query_parameters.insert(key.into(), value.into());

		self
	}

	/// Adds every extra query parameter from an iterator; later duplicates win.
	pub fn extra_query_parameters<I, K, V>(mut self, params: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		for (key, value) in params {
			self.extra_query_parameters.insert(key.into(), value.into());
		}

		self
	}

	/// Sets the claims challenge; blank values are ignored.
	pub fn claims(mut self, claims: impl Into<String>) -> Self {
		let claims = claims.into();

		self.claims = if claims.trim().is_empty() { None } else { Some(claims) };

		self
	}

	/// Sets the redirect URI for this request.
	pub fn redirect_uri(mut self, uri: Url) -> Self {
		self.redirect_uri = Some(uri);

		self
	}

	/// Sets the login hint.
	pub fn login_hint(mut self, hint: impl Into<String>) -> Self {
		self.login_hint = Some(hint.into());

		self
	}

	/// Allows or forbids broker use for this request (default: forbidden).
	pub fn broker_enabled(mut self, enabled: bool) -> Self {
		self.broker_enabled = enabled;

		self
	}

	/// Validates and freezes the parameters.
	pub fn build(self) -> Result<RequestParameters, ConfigError> {
		if self.scope.is_empty() {
			return Err(ConfigError::EmptyScope);
		}

		Ok(RequestParameters {
			authority: self.authority,
			scope: self.scope,
			correlation_id: self.correlation_id.unwrap_or_else(CorrelationId::generate),
			extra_query_parameters: self.extra_query_parameters,
			claims: self.claims,
			redirect_uri: self.redirect_uri,
			login_hint: self.login_hint,
			broker_enabled: self.broker_enabled,
		})
	}
}
