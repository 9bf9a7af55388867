//! Normalized token result produced by a successful broker response validation.

// self
use crate::{
	_prelude::*,
	auth::{ClientInfo, ClientInfoError, ScopeSet, ScopeValidationError, TokenSecret},
};

/// Validated token bundle handed to the caller and the cache layer.
///
/// Every field is copied verbatim from the broker response; nothing here re-checks token
/// signatures or expiry sanity. Construction goes through
/// [`validate_broker_response`](crate::flows::validate_broker_response) or
/// [`TokenResult::builder`], and the value is immutable afterwards.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResult {
	access_token: Option<TokenSecret>,
	id_token: Option<TokenSecret>,
	refresh_token: Option<TokenSecret>,
	client_info: Option<String>,
	expires_in: Option<u64>,
	correlation_id: Option<String>,
	scope: Option<String>,
	token_type: Option<String>,
}
impl TokenResult {
	/// Returns an empty builder.
	pub fn builder() -> TokenResultBuilder {
		TokenResultBuilder::default()
	}

	/// Access token, if the broker issued one.
	pub fn access_token(&self) -> Option<&TokenSecret> {
		self.access_token.as_ref()
	}

	/// Identity token, if the broker issued one.
	pub fn id_token(&self) -> Option<&TokenSecret> {
		self.id_token.as_ref()
	}

	/// Refresh token, if the broker issued one.
	pub fn refresh_token(&self) -> Option<&TokenSecret> {
		self.refresh_token.as_ref()
	}

	/// Raw client-info blob.
	pub fn client_info(&self) -> Option<&str> {
		self.client_info.as_deref()
	}

	/// Lifetime of the access token in seconds, as reported.
	pub fn expires_in(&self) -> Option<u64> {
		self.expires_in
	}

	/// Correlation identifier echoed by the broker.
	pub fn correlation_id(&self) -> Option<&str> {
		self.correlation_id.as_deref()
	}

	/// Raw scope string granted by the authority.
	pub fn scope(&self) -> Option<&str> {
		self.scope.as_deref()
	}

	/// Token type (usually `Bearer`).
	pub fn token_type(&self) -> Option<&str> {
		self.token_type.as_deref()
	}

	/// Returns `true` when an access, id or refresh token is present.
	pub fn has_token(&self) -> bool {
		self.access_token.is_some() || self.id_token.is_some() || self.refresh_token.is_some()
	}

	/// Granted scopes as a normalized set; empty when the broker omitted them.
	pub fn scopes(&self) -> Result<ScopeSet, ScopeValidationError> {
		self.scope.as_deref().map(ScopeSet::from_str).unwrap_or_else(|| Ok(ScopeSet::default()))
	}

	/// Decodes the client-info blob.
	pub fn decoded_client_info(&self) -> Option<Result<ClientInfo, ClientInfoError>> {
		self.client_info.as_deref().map(ClientInfo::decode)
	}

	/// Absolute expiry relative to the instant the result was received.
	pub fn expires_at(&self, received_at: OffsetDateTime) -> Option<OffsetDateTime> {
		let secs = i64::try_from(self.expires_in?).ok()?;

		received_at.checked_add(Duration::seconds(secs))
	}
}
impl Debug for TokenResult {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenResult")
			.field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
			.field("id_token", &self.id_token.as_ref().map(|_| "<redacted>"))
			.field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
			.field("client_info", &self.client_info)
			.field("expires_in", &self.expires_in)
			.field("correlation_id", &self.correlation_id)
			.field("scope", &self.scope)
			.field("token_type", &self.token_type)
			.finish()
	}
}

/// Builder for [`TokenResult`].
#[derive(Clone, Debug, Default)]
pub struct TokenResultBuilder(TokenResult);
impl TokenResultBuilder {
	/// Sets the access token.
	pub fn access_token(mut self, token: impl Into<String>) -> Self {
		self.0.access_token = Some(TokenSecret::new(token));

		self
	}

	/// Sets the identity token.
	pub fn id_token(mut self, token: impl Into<String>) -> Self {
		self.0.id_token = Some(TokenSecret::new(token));

		self
	}

	/// Sets the refresh token.
	pub fn refresh_token(mut self, token: impl Into<String>) -> Self {
		self.0.refresh_token = Some(TokenSecret::new(token));

		self
	}

	/// Sets the raw client-info blob.
	pub fn client_info(mut self, blob: impl Into<String>) -> Self {
		self.0.client_info = Some(blob.into());

		self
	}

	/// Sets the reported lifetime in seconds.
	pub fn expires_in(mut self, secs: u64) -> Self {
		self.0.expires_in = Some(secs);

		self
	}

	/// Sets the echoed correlation identifier.
	pub fn correlation_id(mut self, id: impl Into<String>) -> Self {
		self.0.correlation_id = Some(id.into());

		self
	}

	/// Sets the raw scope string.
	pub fn scope(mut self, scope: impl Into<String>) -> Self {
		self.0.scope = Some(scope.into());

		self
	}

	/// Sets the token type.
	pub fn token_type(mut self, token_type: impl Into<String>) -> Self {
		self.0.token_type = Some(token_type.into());

		self
	}

	/// Finishes the result.
	pub fn build(self) -> TokenResult {
		self.0
	}
}
