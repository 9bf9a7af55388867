// std
use std::sync::{
	Arc,
	atomic::{AtomicUsize, Ordering},
};
// self
use platform_broker::{
	CancellationToken,
	auth::{ClientId, ClientInfo, ScopeSet, TokenResult},
	broker::{BrokerFactory, ChannelBroker, Platform, RawTokenResponse},
	cache::{CacheKey, MemoryCache, TokenCache},
	client::{InteractiveFlow, InteractiveFuture, PublicClient},
	error::Error,
	request::{Authority, InteractiveParameters, RequestParameters, ServiceContext},
};

#[derive(Default)]
struct CountingInteractive {
	calls: AtomicUsize,
}
impl InteractiveFlow for CountingInteractive {
	fn acquire<'a>(
		&'a self,
		_params: &'a RequestParameters,
		_interactive: Option<&'a InteractiveParameters>,
		_cancel: CancellationToken,
	) -> InteractiveFuture<'a> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		Box::pin(async { Ok(TokenResult::builder().access_token("browser-at").build()) })
	}
}

fn service(broker_enabled: bool) -> ServiceContext {
	ServiceContext::builder(ClientId::new("app-1").expect("Client fixture should be valid."))
		.platform(Platform::Android)
		.broker_enabled(broker_enabled)
		.build()
		.expect("Service context fixture should build.")
}

fn params(broker_enabled: bool) -> RequestParameters {
	RequestParameters::builder(
		Authority::parse("https://login.microsoftonline.com/contoso/")
			.expect("Authority fixture should parse."),
		ScopeSet::new(["user.read"]).expect("Scope fixture should be valid."),
	)
	.broker_enabled(broker_enabled)
	.build()
	.expect("Request parameters fixture should build.")
}

#[tokio::test]
async fn brokered_result_is_cached_under_the_home_account() {
	let (channel, inbox) = ChannelBroker::new(1);
	let factory = BrokerFactory::new().register_instance(Platform::Android, Arc::new(channel));
	let cache = Arc::new(MemoryCache::default());
	let interactive = Arc::new(CountingInteractive::default());
	let client = PublicClient::new(service(true), &factory, cache.clone(), interactive.clone());
	let client_info = ClientInfo { uid: "uid".into(), utid: "utid".into() }.encode();
	let blob = client_info.clone();
	let bridge = tokio::spawn(inbox.serve(move |_| {
		let blob = blob.clone();

		async move {
			RawTokenResponse {
				access_token: Some("broker-at".into()),
				client_info: Some(blob),
				scope: Some("user.read".into()),
				..Default::default()
			}
		}
	}));
	let result = client
		.acquire_token_interactive(&params(true), None, None, CancellationToken::new())
		.await
		.expect("Brokered request should succeed.");

	assert_eq!(result.access_token().map(|t| t.expose()), Some("broker-at"));
	assert_eq!(interactive.calls.load(Ordering::SeqCst), 0);

	let key = CacheKey::new(
		Some("uid.utid".into()),
		"app-1",
		"login.microsoftonline.com/contoso",
		&ScopeSet::new(["user.read"]).expect("Scope fixture should be valid."),
	);
	let cached = cache
		.fetch(&key)
		.await
		.expect("Cache fetch should not fail.")
		.expect("Successful results should be cached.");

	assert_eq!(cached, result);

	drop((client, factory));
	bridge.await.expect("Bridge should stop once every provider handle is dropped.");
}

#[tokio::test]
async fn disabled_broker_falls_back_to_the_interactive_flow() {
	for (service_enabled, request_enabled) in [(false, true), (true, false)] {
		let cache = Arc::new(MemoryCache::default());
		let interactive = Arc::new(CountingInteractive::default());
		let (channel, _inbox) = ChannelBroker::new(1);
		let factory =
			BrokerFactory::new().register_instance(Platform::Android, Arc::new(channel));
		let client =
			PublicClient::new(service(service_enabled), &factory, cache.clone(), interactive.clone());
		let result = client
			.acquire_token_interactive(
				&params(request_enabled),
				None,
				None,
				CancellationToken::new(),
			)
			.await
			.expect("Fallback should produce the interactive result.");

		assert_eq!(result.access_token().map(|t| t.expose()), Some("browser-at"));
		assert_eq!(interactive.calls.load(Ordering::SeqCst), 1);
		assert_eq!(cache.len(), 1);
	}
}

#[tokio::test]
async fn cancelled_fallback_is_not_cached() {
	let cache = Arc::new(MemoryCache::default());
	let client = PublicClient::new(
		service(false),
		&BrokerFactory::new(),
		cache.clone(),
		Arc::new(CountingInteractive::default()),
	);
	let cancel = CancellationToken::new();

	cancel.cancel();

	let err = client
		.acquire_token_interactive(&params(true), None, None, cancel)
		.await
		.expect_err("Cancelled requests must not succeed.");

	assert!(matches!(err, Error::Cancelled));
	assert!(cache.is_empty());
}

#[tokio::test]
async fn description_only_response_is_an_error_and_not_cached() {
	let (channel, inbox) = ChannelBroker::new(1);
	let factory = BrokerFactory::new().register_instance(Platform::Android, Arc::new(channel));
	let cache = Arc::new(MemoryCache::default());
	let interactive = Arc::new(CountingInteractive::default());
	let client = PublicClient::new(service(true), &factory, cache.clone(), interactive.clone());
	let bridge = tokio::spawn(inbox.serve(|_| async {
		RawTokenResponse {
			error_description: Some("AADSTS50076: MFA required".into()),
			..Default::default()
		}
	}));
	let err = client
		.acquire_token_interactive(&params(true), None, None, CancellationToken::new())
		.await
		.expect_err("A description without tokens must not become a success.");

	assert!(matches!(err, Error::UnknownBroker { .. }));
	assert_eq!(interactive.calls.load(Ordering::SeqCst), 0);
	assert!(cache.is_empty());

	drop((client, factory));
	bridge.await.expect("Bridge should stop once every provider handle is dropped.");
}
