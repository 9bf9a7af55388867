// std
use std::sync::Arc;
// self
use platform_broker::{
	CancellationToken,
	auth::{ClientId, ClientInfo, CorrelationId, ScopeSet, TokenResult},
	broker::{
		BrokerCapability, BrokerFactory, BrokerPayload, ChannelBroker, NullBroker, Platform,
		RawTokenResponse, keys,
	},
	error::{ConfigError, Error, FallbackReason, FixedError, TransportError},
	flows::{BrokerInteractiveRequest, RequestState, UNOFFICIAL_ERROR_CODE},
	request::{
		Authority, InteractiveParameters, Prompt, RequestParameters, ServiceContext, UiParent,
	},
};

const AUTHORITY: &str = "https://login.microsoftonline.com/home/";

fn service(platform: Platform) -> ServiceContext {
	ServiceContext::builder(
		ClientId::new("d3adb33f-c0de-ed0c-c0de-deadb33fc0d3")
			.expect("Client identifier fixture should be valid."),
	)
	.platform(platform)
	.broker_enabled(true)
	.build()
	.expect("Service context fixture should build.")
}

fn params() -> RequestParameters {
	RequestParameters::builder(
		Authority::parse(AUTHORITY).expect("Authority fixture should parse."),
		ScopeSet::new(["r1/scope1", "r1/scope2"]).expect("Scope fixture should be valid."),
	)
	.correlation_id(
		CorrelationId::new("test-correlation-id")
			.expect("Correlation identifier fixture should be valid."),
	)
	.extra_query_parameter("extra", "qp")
	.claims(r#"{"access_token":{"nbf":{"essential":true}}}"#)
	.broker_enabled(true)
	.build()
	.expect("Request parameters fixture should build.")
}

/// Runs one brokered request against a bridge that answers with `json`.
async fn acquire_with_bridge(json: impl Into<String>) -> (Result<TokenResult, Error>, BrokerPayload) {
	let json = json.into();
	let (broker, mut inbox) = ChannelBroker::new(1);
	let bridge = tokio::spawn(async move {
		let envelope = inbox.recv().await.expect("Bridge should receive the request.");
		let payload = envelope.payload().clone();

		envelope.respond_json(&json);

		payload
	});
	let params = params();
	let service = service(Platform::Linux);
	let result = BrokerInteractiveRequest::new(&params, &service, Arc::new(broker))
		.acquire(CancellationToken::new())
		.await;
	let payload = bridge.await.expect("Bridge task should finish.");

	(result, payload)
}

#[tokio::test]
async fn access_token_response_succeeds() {
	let client_info = ClientInfo { uid: "uid".into(), utid: "utid".into() }.encode();
	let json = format!(
		r#"{{"access_token":"access-token","client_info":"{client_info}","expires_in":"3599"}}"#
	);
	let (result, payload) = acquire_with_bridge(json).await;
	let result = result.expect("An access token response should succeed.");

	assert_eq!(result.access_token().map(|t| t.expose()), Some("access-token"));
	assert_eq!(result.client_info(), Some(client_info.as_str()));
	assert_eq!(result.expires_in(), Some(3599));
	assert_eq!(
		result
			.decoded_client_info()
			.expect("Client info should be present.")
			.expect("Client info should decode.")
			.home_account_id(),
		"uid.utid"
	);
	assert_eq!(payload.get(keys::AUTHORITY), Some(AUTHORITY));
	assert_eq!(payload.get(keys::SCOPE), Some("r1/scope1 r1/scope2"));
	assert_eq!(payload.get(keys::CORRELATION_ID), Some("test-correlation-id"));
	assert_eq!(payload.get(keys::EXTRA_QP), Some("extra=qp"));
	assert!(payload.get(keys::CLAIMS).is_some());
}

#[tokio::test]
async fn unofficial_error_code_is_a_service_error() {
	let (result, _) = acquire_with_bridge(
		r#"{"error":"MSALErrorDomain","error_description":"Server returned less scopes than requested"}"#,
	)
	.await;
	let err = result.expect_err("Error responses must not succeed.");

	assert_eq!(err.error_code(), Some(UNOFFICIAL_ERROR_CODE));
	assert!(err.to_string().contains("Server returned less scopes than requested"));
	assert!(err.to_string().starts_with(FixedError::BROKER_RESPONSE_ERROR_PREFIX));
}

#[tokio::test]
async fn empty_response_is_an_unknown_broker_error() {
	let (result, _) = acquire_with_bridge(r#"{"error":null,"error_description":null}"#).await;
	let err = result.expect_err("Empty responses must not succeed.");

	assert!(matches!(err, Error::UnknownBroker { .. }));
	assert_eq!(err.error_code(), Some(FixedError::BrokerResponseReturnedError.code()));
	assert_eq!(err.to_string(), FixedError::BrokerResponseReturnedError.message());
}

#[tokio::test]
async fn malformed_response_is_a_transport_error() {
	let (result, _) = acquire_with_bridge(r#"{"expires_in":true}"#).await;

	assert!(matches!(
		result,
		Err(Error::Transport(TransportError::MalformedResponse { .. }))
	));
}

#[tokio::test]
async fn platform_without_broker_is_never_invoked() {
	let service = service(Platform::Other);
	let broker = BrokerFactory::new().create(&service);

	assert!(!broker.can_invoke(None));

	let err = broker
		.invoke(BrokerPayload::default(), CancellationToken::new())
		.await
		.expect_err("The null broker must fail every invocation.");

	assert!(matches!(err, Error::PlatformNotSupported { platform: Platform::Other }));
	assert_eq!(err.error_code(), Some(FixedError::PlatformNotSupported.code()));

	let params = params();
	let mut request = BrokerInteractiveRequest::new(&params, &service, broker);
	let err = request
		.acquire(CancellationToken::new())
		.await
		.expect_err("Requests without a broker must fall back.");

	match err {
		Error::Fallback(signal) => assert_eq!(signal.reason, FallbackReason::BrokerUnavailable),
		other => panic!("Unexpected error: {other:?}"),
	}
	assert!(!NullBroker::default().can_invoke(None));
}

#[tokio::test]
async fn interactive_options_and_ui_parent_reach_the_broker() {
	let (broker, mut inbox) = ChannelBroker::new(1);
	let bridge = tokio::spawn(async move {
		let envelope = inbox.recv().await.expect("Bridge should receive the request.");
		let payload = envelope.payload().clone();

		envelope.respond(RawTokenResponse { id_token: Some("idT".into()), ..Default::default() });

		payload
	});
	let params = params();
	let service = service(Platform::Windows);
	let interactive = InteractiveParameters::default()
		.with_prompt(Prompt::Login)
		.with_login_hint("user@contoso.com");
	let ui = UiParent::new(0x2a);
	let result = BrokerInteractiveRequest::new(&params, &service, Arc::new(broker))
		.with_interactive(&interactive)
		.with_ui_parent(&ui)
		.acquire(CancellationToken::new())
		.await
		.expect("An id token response should succeed.");
	let payload = bridge.await.expect("Bridge task should finish.");

	assert_eq!(result.id_token().map(|t| t.expose()), Some("idT"));
	assert_eq!(payload.get(keys::PROMPT), Some("login"));
	assert_eq!(payload.get(keys::USERNAME), Some("user@contoso.com"));
}

#[tokio::test]
async fn cancellation_stops_the_request_and_reaches_the_bridge() {
	let (broker, mut inbox) = ChannelBroker::new(1);
	let cancel = CancellationToken::new();
	let trigger = cancel.clone();
	let bridge = tokio::spawn(async move {
		let envelope = inbox.recv().await.expect("Bridge should receive the request.");

		trigger.cancel();
		envelope.cancellation().cancelled().await;

		envelope.cancellation().is_cancelled()
	});
	let params = params();
	let service = service(Platform::Linux);
	let mut request = BrokerInteractiveRequest::new(&params, &service, Arc::new(broker));
	let err = request.acquire(cancel).await.expect_err("Cancelled requests must not succeed.");

	assert!(err.is_cancelled());
	assert_eq!(request.state(), RequestState::Completed);
	assert!(bridge.await.expect("Bridge task should finish."));
}

#[tokio::test]
async fn disconnected_bridge_surfaces_as_transport_error() {
	let (broker, mut inbox) = ChannelBroker::new(1);
	let bridge = tokio::spawn(async move {
		drop(inbox.recv().await);
	});
	let params = params();
	let service = service(Platform::Linux);
	let err = BrokerInteractiveRequest::new(&params, &service, Arc::new(broker))
		.acquire(CancellationToken::new())
		.await
		.expect_err("A bridge that drops the request must not succeed.");

	bridge.await.expect("Bridge task should finish.");

	assert!(matches!(err, Error::Transport(TransportError::BrokerDisconnected)));
}

#[tokio::test]
async fn orchestrator_runs_once() {
	let params = params();
	let service = service(Platform::Other);
	let mut request =
		BrokerInteractiveRequest::new(&params, &service, BrokerFactory::new().create(&service));

	assert!(request.acquire(CancellationToken::new()).await.is_err());
	assert!(matches!(
		request.acquire(CancellationToken::new()).await,
		Err(Error::Config(ConfigError::RequestReused))
	));
}
