//! Platform-keyed registry that resolves one broker provider per service configuration.

// self
use crate::{
	_prelude::*,
	broker::{BrokerCapability, NullBroker, Platform},
	request::ServiceContext,
};

/// Constructor registered for a platform.
pub type BrokerConstructor =
	Arc<dyn Fn(&ServiceContext) -> Arc<dyn BrokerCapability> + Send + Sync>;

/// Resolves the broker provider for a [`ServiceContext`].
///
/// Resolution is keyed on the explicit [`Platform`] tag of the configuration, never on
/// runtime probing. Unregistered platforms and configurations with broker use disabled get
/// a [`NullBroker`].
#[derive(Clone, Default)]
pub struct BrokerFactory {
	constructors: HashMap<Platform, BrokerConstructor>,
}
impl BrokerFactory {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers (or replaces) the constructor for `platform`.
	pub fn register<F>(mut self, platform: Platform, constructor: F) -> Self
	where
		F: 'static + Fn(&ServiceContext) -> Arc<dyn BrokerCapability> + Send + Sync,
	{
		self.constructors.insert(platform, Arc::new(constructor));

		self
	}

	/// Registers a shared provider instance for `platform`.
	pub fn register_instance(self, platform: Platform, broker: Arc<dyn BrokerCapability>) -> Self {
		self.register(platform, move |_| broker.clone())
	}

	/// Returns `true` when a constructor exists for `platform`.
	pub fn supports(&self, platform: Platform) -> bool {
		self.constructors.contains_key(&platform)
	}

	/// Produces the provider for `service`.
	pub fn create(&self, service: &ServiceContext) -> Arc<dyn BrokerCapability> {
		if !service.broker.enabled {
			return Arc::new(NullBroker::new(service.platform));
		}

		match self.constructors.get(&service.platform) {
			Some(constructor) => constructor(service),
			None => {
				#[cfg(feature = "tracing")]
				tracing::debug!(
					platform = service.platform.as_str(),
					"No broker registered for platform; using the null broker."
				);

				Arc::new(NullBroker::new(service.platform))
			},
		}
	}
}
impl Debug for BrokerFactory {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let mut platforms = self.constructors.keys().map(|p| p.as_str()).collect::<Vec<_>>();

		platforms.sort_unstable();

		f.debug_struct("BrokerFactory").field("platforms", &platforms).finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{_preludet::*, broker::ChannelBroker};

	#[test]
	fn unregistered_platform_yields_null_broker() {
		let service = test_service_context();
		let broker = BrokerFactory::new().create(&service);
		let env = service.environment(&test_request_parameters(), None);

		assert!(!broker.can_invoke(None));
		assert!(!broker.can_invoke(Some(&env)));
	}

	#[tokio::test]
	async fn registered_platform_yields_its_provider() {
		let (channel, _inbox) = ChannelBroker::new(1);
		let service = test_service_context();
		let factory = BrokerFactory::new().register_instance(service.platform, Arc::new(channel));
		let env = service.environment(&test_request_parameters(), None);

		assert!(factory.supports(service.platform));
		assert!(factory.create(&service).can_invoke(Some(&env)));

		let disabled = ServiceContext { broker: Default::default(), ..service };

		assert!(!factory.create(&disabled).can_invoke(Some(&env)));
	}

	#[test]
	fn debug_lists_registered_platforms() {
		let factory = BrokerFactory::new()
			.register(Platform::Windows, |ctx| Arc::new(NullBroker::new(ctx.platform)))
			.register(Platform::Android, |ctx| Arc::new(NullBroker::new(ctx.platform)));

		assert_eq!(format!("{factory:?}"), r#"BrokerFactory { platforms: ["android", "windows"] }"#);
	}
}
