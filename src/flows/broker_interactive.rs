//! Broker-backed interactive request orchestrator.
//!
//! One [`BrokerInteractiveRequest`] serves exactly one logical token request. It probes the
//! provider, builds the invocation payload, suspends once on the provider's `invoke`, and
//! pipes the answer through [`validate_broker_response`]. When the broker cannot serve the
//! request it resolves to [`Error::Fallback`] so the caller can run the interactive flow.

// self
use crate::{
	_prelude::*,
	auth::TokenResult,
	broker::{BrokerCapability, BrokerPayload},
	error::{ConfigError, FallbackReason, FallbackSignal},
	flows::validate_broker_response,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	request::{InteractiveParameters, RequestParameters, ServiceContext, UiParent},
};

/// Lifecycle of a [`BrokerInteractiveRequest`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RequestState {
	/// `acquire` has not been called.
	#[default]
	NotStarted,
	/// The provider is holding the request.
	AwaitingBrokerResponse,
	/// The request finished with a result, an error, or a fallback signal.
	Completed,
}

/// Orchestrates a single broker-delegated token request.
pub struct BrokerInteractiveRequest<'a> {
	params: &'a RequestParameters,
	interactive: Option<&'a InteractiveParameters>,
	service: &'a ServiceContext,
	ui_parent: Option<&'a UiParent>,
	broker: Arc<dyn BrokerCapability>,
	state: RequestState,
}
impl<'a> BrokerInteractiveRequest<'a> {
	/// Creates the orchestrator; performs no I/O.
	pub fn new(
		params: &'a RequestParameters,
		service: &'a ServiceContext,
		broker: Arc<dyn BrokerCapability>,
	) -> Self {
		Self {
			params,
			interactive: None,
			service,
			ui_parent: None,
			broker,
			state: RequestState::NotStarted,
		}
	}

	/// Attaches interactive options (prompt, extra consent scopes, login hint).
	pub fn with_interactive(mut self, interactive: &'a InteractiveParameters) -> Self {
		self.interactive = Some(interactive);

		self
	}

	/// Attaches the UI surface the broker may parent its windows to.
	pub fn with_ui_parent(mut self, ui_parent: &'a UiParent) -> Self {
		self.ui_parent = Some(ui_parent);

		self
	}

	/// Current lifecycle state.
	pub fn state(&self) -> RequestState {
		self.state
	}

	/// Runs the request once.
	///
	/// Resolves to [`Error::Fallback`] when broker use is disabled or the provider cannot
	/// serve this environment, and to [`Error::Cancelled`] when `cancel` fires before the
	/// broker answers; a cancelled response is never validated. Calling this again fails
	/// with [`ConfigError::RequestReused`].
	pub async fn acquire(&mut self, cancel: CancellationToken) -> Result<TokenResult> {
		const KIND: FlowKind = FlowKind::BrokerInteractive;

		if self.state != RequestState::NotStarted {
			return Err(ConfigError::RequestReused.into());
		}

		let span = FlowSpan::new(KIND, "acquire");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span.instrument(self.run(cancel)).await;

		self.state = RequestState::Completed;

		obs::record_flow_outcome(KIND, FlowOutcome::of(&result));

		result
	}

	async fn run(&mut self, cancel: CancellationToken) -> Result<TokenResult> {
		if !self.params.is_broker_enabled() {
			return Err(FallbackSignal::new(FallbackReason::BrokerDisabled).into());
		}

		let env = self.service.environment(self.params, self.ui_parent);

		if !self.broker.can_invoke(Some(&env)) {
			return Err(FallbackSignal::new(FallbackReason::BrokerUnavailable).into());
		}

		let payload = BrokerPayload::from_request(self.params, self.interactive, self.service);

		self.state = RequestState::AwaitingBrokerResponse;

		let raw = tokio::select! {
			biased;
			_ = cancel.cancelled() => return Err(Error::Cancelled),
			raw = self.broker.invoke(payload, cancel.child_token()) => raw?,
		};

		validate_broker_response(raw)
	}
}
impl Debug for BrokerInteractiveRequest<'_> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("BrokerInteractiveRequest")
			.field("authority", self.params.authority())
			.field("correlation_id", self.params.correlation_id())
			.field("interactive", &self.interactive)
			.field("ui_parent", &self.ui_parent)
			.field("state", &self.state)
			.finish()
	}
}
