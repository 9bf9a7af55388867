//! Canonicalized authority URIs.

// self
use crate::{_prelude::*, error::ConfigError};

/// Absolute, canonical HTTPS authority (e.g. `https://login.example.com/tenant/`).
///
/// Canonical form is lower-case, has no query or fragment, and always ends with `/`, so
/// two spellings of the same authority compare equal and serialize identically in the
/// broker payload.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Authority(Url);
impl Authority {
	/// Parses and canonicalizes an authority URI.
	pub fn parse(raw: &str) -> Result<Self, ConfigError> {
		let lowered = raw.trim().to_ascii_lowercase();
		let mut url =
			Url::parse(&lowered).map_err(|source| ConfigError::InvalidAuthority { source })?;

		if url.scheme() != "https" {
			return Err(ConfigError::InsecureAuthority { url: url.to_string() });
		}

		url.set_query(None);
		url.set_fragment(None);

		if !url.path().ends_with('/') {
			let path = format!("{}/", url.path());

			url.set_path(&path);
		}

		let authority = Self(url);

		if authority.tenant().is_none() {
			return Err(ConfigError::MissingTenant { url: authority.0.to_string() });
		}

		Ok(authority)
	}

	/// Tenant segment (first path segment).
	pub fn tenant(&self) -> Option<&str> {
		self.0.path_segments()?.find(|segment| !segment.is_empty())
	}

	/// Host of the authority.
	pub fn host(&self) -> &str {
		self.0.host_str().unwrap_or_default()
	}

	/// Canonical string form.
	pub fn as_str(&self) -> &str {
		self.0.as_str()
	}

	/// Underlying URL.
	pub fn as_url(&self) -> &Url {
		&self.0
	}
}
impl Debug for Authority {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "Authority({})", self.0)
	}
}
impl Display for Authority {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for Authority {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}
impl TryFrom<String> for Authority {
	type Error = ConfigError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::parse(&value)
	}
}
impl From<Authority> for String {
	fn from(value: Authority) -> Self {
		value.0.into()
	}
}
