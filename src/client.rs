//! Public-client facade: broker first, interactive flow on fallback, cache on success.

// self
use crate::{
	_prelude::*,
	auth::{ClientInfo, TokenResult},
	broker::{BrokerCapability, BrokerFactory},
	cache::{CacheKey, TokenCache},
	flows::BrokerInteractiveRequest,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	request::{InteractiveParameters, RequestParameters, ServiceContext, UiParent},
};

/// Future returned by [`InteractiveFlow::acquire`].
pub type InteractiveFuture<'a> = Pin<Box<dyn Future<Output = Result<TokenResult>> + 'a + Send>>;

/// Browser-based interactive acquisition used when the broker declines a request.
pub trait InteractiveFlow
where
	Self: Send + Sync,
{
	/// Acquires a token without the broker.
	fn acquire<'a>(
		&'a self,
		params: &'a RequestParameters,
		interactive: Option<&'a InteractiveParameters>,
		cancel: CancellationToken,
	) -> InteractiveFuture<'a>;
}

/// Application-facing entry point for interactive token acquisition.
#[derive(Clone)]
pub struct PublicClient {
	service: ServiceContext,
	broker: Arc<dyn BrokerCapability>,
	cache: Arc<dyn TokenCache>,
	interactive: Arc<dyn InteractiveFlow>,
}
impl PublicClient {
	/// Resolves the broker once through `factory` and wires the collaborators.
	pub fn new(
		service: ServiceContext,
		factory: &BrokerFactory,
		cache: Arc<dyn TokenCache>,
		interactive: Arc<dyn InteractiveFlow>,
	) -> Self {
		let broker = factory.create(&service);

		Self { service, broker, cache, interactive }
	}

	/// Service configuration.
	pub fn service(&self) -> &ServiceContext {
		&self.service
	}

	/// Provider selected for this client.
	pub fn broker(&self) -> &Arc<dyn BrokerCapability> {
		&self.broker
	}

	/// Acquires a token interactively.
	///
	/// Tries the broker first. A fallback signal hands the request to the interactive flow;
	/// every other error propagates unchanged. Results carrying at least one token are
	/// written to the cache before they are returned; token-less results never are.
	pub async fn acquire_token_interactive(
		&self,
		params: &RequestParameters,
		interactive: Option<&InteractiveParameters>,
		ui_parent: Option<&UiParent>,
		cancel: CancellationToken,
	) -> Result<TokenResult> {
		let mut request = BrokerInteractiveRequest::new(params, &self.service, self.broker.clone());

		if let Some(interactive) = interactive {
			request = request.with_interactive(interactive);
		}
		if let Some(ui_parent) = ui_parent {
			request = request.with_ui_parent(ui_parent);
		}

		let result = match request.acquire(cancel.clone()).await {
			Err(Error::Fallback(_signal)) => {
				#[cfg(feature = "tracing")]
				tracing::debug!(
					reason = _signal.reason.as_str(),
					"Broker declined; running the interactive flow."
				);

				self.run_interactive(params, interactive, cancel).await?
			},
			other => other?,
		};

		if result.has_token() {
			let key = self.cache_key(params, &result);

			self.cache.save(key, result.clone()).await?;
		} else {
			#[cfg(feature = "tracing")]
			tracing::warn!("Token acquisition returned no token; skipping the cache.");
		}

		Ok(result)
	}

	async fn run_interactive(
		&self,
		params: &RequestParameters,
		interactive: Option<&InteractiveParameters>,
		cancel: CancellationToken,
	) -> Result<TokenResult> {
		const KIND: FlowKind = FlowKind::Interactive;

		let span = FlowSpan::new(KIND, "acquire_token_interactive");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async {
				tokio::select! {
					biased;
					_ = cancel.cancelled() => Err(Error::Cancelled),
					result = self.interactive.acquire(params, interactive, cancel.child_token()) =>
						result,
				}
			})
			.await;

		obs::record_flow_outcome(KIND, FlowOutcome::of(&result));

		result
	}

	fn cache_key(&self, params: &RequestParameters, result: &TokenResult) -> CacheKey {
		let home_account_id = result
			.decoded_client_info()
			.and_then(Result::ok)
			.as_ref()
			.map(ClientInfo::home_account_id);
		let scope = result.scopes().ok().filter(|granted| !granted.is_empty());
		let authority = params.authority();
		let environment = format!("{}/{}", authority.host(), authority.tenant().unwrap_or_default());

		CacheKey::new(
			home_account_id,
			self.service.client_id.to_string(),
			environment,
			scope.as_ref().unwrap_or(params.scope()),
		)
	}
}
impl Debug for PublicClient {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("PublicClient")
			.field("client_id", &self.service.client_id)
			.field("platform", &self.service.platform)
			.field("broker_enabled", &self.service.broker.enabled)
			.finish()
	}
}
