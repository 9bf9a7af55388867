//! Broker delegation for identity token acquisition: decide whether a platform broker can
//! serve a request, invoke it out of process with cancellation, and turn whatever comes back
//! into a validated token result or a classified error.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod broker;
pub mod cache;
pub mod client;
pub mod error;
pub mod flows;
pub mod obs;
pub mod request;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and fixtures for tests; enabled via `cfg(test)` or the `test`
	//! crate feature.

	pub use parking_lot::Mutex;

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::{ClientId, CorrelationId, ScopeSet},
		request::{Authority, RequestParameters, ServiceContext},
	};

	/// Authority used across request fixtures.
	pub const TEST_AUTHORITY: &str = "https://login.microsoftonline.com/home/";
	/// Client identifier used across request fixtures.
	pub const TEST_CLIENT_ID: &str = "d3adb33f-c0de-ed0c-c0de-deadb33fc0d3";
	/// Correlation identifier used across request fixtures.
	pub const TEST_CORRELATION_ID: &str = "c0ffee00-0000-4000-8000-000000000042";

	/// Builds a broker-enabled service context for the current platform.
	pub fn test_service_context() -> ServiceContext {
		ServiceContext::builder(
			ClientId::new(TEST_CLIENT_ID).expect("Client identifier fixture should be valid."),
		)
		.broker_enabled(true)
		.build()
		.expect("Service context fixture should build successfully.")
	}

	/// Builds broker-enabled request parameters with a claims challenge and extra query
	/// parameters.
	pub fn test_request_parameters() -> RequestParameters {
		let authority =
			Authority::parse(TEST_AUTHORITY).expect("Authority fixture should be valid.");
		let scope = ScopeSet::new(["r1/scope1", "r1/scope2"])
			.expect("Scope fixture should be valid for request parameters.");

		RequestParameters::builder(authority, scope)
			.correlation_id(
				CorrelationId::new(TEST_CORRELATION_ID)
					.expect("Correlation identifier fixture should be valid."),
			)
			.extra_query_parameter("extra", "qp")
			.extra_query_parameter("dc", "prod-wst-test1")
			.claims(r#"{"access_token":{"nbf":{"essential":true}}}"#)
			.broker_enabled(true)
			.build()
			.expect("Request parameters fixture should build successfully.")
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::RwLock;
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use tokio_util::sync::CancellationToken;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use tokio_util::sync::CancellationToken;
pub use url;
