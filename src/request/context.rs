//! Service configuration and the environment context probed during capability negotiation.

// self
use crate::{
	_prelude::*,
	auth::ClientId,
	broker::Platform,
	error::ConfigError,
	request::{Authority, RequestParameters},
};

/// Broker-related switches of the service configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrokerOptions {
	/// Whether the application opted into broker use at all.
	pub enabled: bool,
}

/// Application-wide configuration shared by every request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceContext {
	/// Client identifier registered with the authority.
	pub client_id: ClientId,
	/// Host platform tag; defaults to the compile target.
	#[serde(default = "Platform::current")]
	pub platform: Platform,
	/// Default redirect URI.
	#[serde(default)]
	pub redirect_uri: Option<Url>,
	/// Client library name reported to the broker.
	#[serde(default = "default_client_name")]
	pub client_name: String,
	/// Client library version reported to the broker.
	#[serde(default = "default_client_version")]
	pub client_version: String,
	/// Broker switches.
	#[serde(default)]
	pub broker: BrokerOptions,
}
impl ServiceContext {
	/// Creates a builder for the provided client identifier.
	pub fn builder(client_id: ClientId) -> ServiceContextBuilder {
		ServiceContextBuilder::new(client_id)
	}

	/// Parses a JSON configuration document.
	pub fn from_json(json: &str) -> Result<Self, serde_path_to_error::Error<serde_json::Error>> {
		let de = &mut serde_json::Deserializer::from_str(json);

		serde_path_to_error::deserialize(de)
	}

	/// Environment context for a request served under this configuration.
	pub fn environment(
		&self,
		params: &RequestParameters,
		ui_parent: Option<&UiParent>,
	) -> BrokerEnvironment {
		BrokerEnvironment {
			authority: params.authority().clone(),
			client_id: self.client_id.clone(),
			platform: self.platform,
			broker_enabled: self.broker.enabled && params.is_broker_enabled(),
			ui_parent: ui_parent.cloned(),
		}
	}
}

/// Builder for [`ServiceContext`].
#[derive(Debug)]
pub struct ServiceContextBuilder {
	client_id: ClientId,
	platform: Platform,
	redirect_uri: Option<String>,
	client_name: String,
	client_version: String,
	broker: BrokerOptions,
}
impl ServiceContextBuilder {
	fn new(client_id: ClientId) -> Self {
		Self {
			client_id,
			platform: Platform::current(),
			redirect_uri: None,
			client_name: default_client_name(),
			client_version: default_client_version(),
			broker: BrokerOptions::default(),
		}
	}

	/// Overrides the platform tag.
	pub fn platform(mut self, platform: Platform) -> Self {
		self.platform = platform;

		self
	}

	/// Sets the default redirect URI; validated by [`build`](Self::build).
	pub fn redirect_uri(mut self, uri: impl Into<String>) -> Self {
		self.redirect_uri = Some(uri.into());

		self
	}

	/// Overrides the reported client name and version.
	pub fn client(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
		self.client_name = name.into();
		self.client_version = version.into();

		self
	}

	/// Opts in or out of broker use.
	pub fn broker_enabled(mut self, enabled: bool) -> Self {
		self.broker.enabled = enabled;

		self
	}

	/// Validates and freezes the configuration.
	pub fn build(self) -> Result<ServiceContext, ConfigError> {
		let redirect_uri = self
			.redirect_uri
			.map(|raw| Url::parse(&raw))
			.transpose()
			.map_err(|source| ConfigError::InvalidRedirect { source })?;

		Ok(ServiceContext {
			client_id: self.client_id,
			platform: self.platform,
			redirect_uri,
			client_name: self.client_name,
			client_version: self.client_version,
			broker: self.broker,
		})
	}
}

/// Opaque handle of the UI surface the broker may parent its windows to.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct UiParent {
	handle: u64,
	label: Option<String>,
}
impl UiParent {
	/// Wraps a native handle (window handle, view-controller id).
	pub fn new(handle: u64) -> Self {
		Self { handle, label: None }
	}

	/// Attaches a caller label for diagnostics.
	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());

		self
	}

	/// Native handle value.
	pub fn handle(&self) -> u64 {
		self.handle
	}

	/// Caller label, if any.
	pub fn label(&self) -> Option<&str> {
		self.label.as_deref()
	}
}
impl Debug for UiParent {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "UiParent({:#x})", self.handle)
	}
}

/// Environment context handed to
/// [`BrokerCapability::can_invoke`](crate::broker::BrokerCapability::can_invoke).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BrokerEnvironment {
	/// Canonical authority of the request.
	pub authority: Authority,
	/// Client identifier of the application.
	pub client_id: ClientId,
	/// Host platform tag.
	pub platform: Platform,
	/// `true` only when both the application and the request allow broker use.
	pub broker_enabled: bool,
	/// UI surface available to the broker.
	pub ui_parent: Option<UiParent>,
}

fn default_client_name() -> String {
	env!("CARGO_PKG_NAME").into()
}

fn default_client_version() -> String {
	env!("CARGO_PKG_VERSION").into()
}
