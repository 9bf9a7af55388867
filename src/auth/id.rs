//! Strongly typed identifiers carried through broker requests.

// std
use std::{borrow::Borrow, ops::Deref};
// crates.io
use rand::Rng;
// self
use crate::_prelude::*;

macro_rules! def_id {
	($name:ident, $doc:literal, $kind:literal) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Creates a new identifier after validation.
			pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
				let view = value.as_ref();

				validate_view($kind, view)?;

				Ok(Self(view.to_owned()))
			}
		}
		impl Deref for $name {
			type Target = str;

			fn deref(&self) -> &Self::Target {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl TryFrom<String> for $name {
			type Error = IdentifierError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				validate_view($kind, &value)?;

				Ok(Self(value))
			}
		}
		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, concat!($kind, "({})"), self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
		impl FromStr for $name {
			type Err = IdentifierError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
	};
}

const IDENTIFIER_MAX_LEN: usize = 128;

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty or whitespace.
	#[error("{kind} identifier cannot be empty.")]
	Empty {
		/// Kind of identifier (client, correlation).
		kind: &'static str,
	},
	/// The identifier contains whitespace characters.
	#[error("{kind} identifier contains whitespace.")]
	ContainsWhitespace {
		/// Kind of identifier (client, correlation).
		kind: &'static str,
	},
	/// The identifier exceeded the allowed character count.
	#[error("{kind} identifier exceeds {max} characters.")]
	TooLong {
		/// Kind of identifier (client, correlation).
		kind: &'static str,
		/// Maximum permitted character count.
		max: usize,
	},
}

def_id! { ClientId, "Application (client) identifier registered with the authority.", "Client" }
def_id! { CorrelationId, "Per-request identifier echoed by the broker.", "Correlation" }

impl CorrelationId {
	/// Generates a random GUID-formatted correlation identifier.
	pub fn generate() -> Self {
		let raw = rand::rng().random::<u128>();
		let hex = format!("{raw:032x}");

		Self(format!(
			"{}-{}-{}-{}-{}",
			&hex[..8],
			&hex[8..12],
			&hex[12..16],
			&hex[16..20],
			&hex[20..]
		))
	}
}

fn validate_view(kind: &'static str, view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty { kind });
	}
	if view.chars().any(char::is_whitespace) {
		return Err(IdentifierError::ContainsWhitespace { kind });
	}
	if view.len() > IDENTIFIER_MAX_LEN {
		return Err(IdentifierError::TooLong { kind, max: IDENTIFIER_MAX_LEN });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn identifiers_reject_whitespace_and_empty_values() {
		assert!(ClientId::new(" client").is_err(), "Leading whitespace must be rejected.");
		assert!(ClientId::new("client ").is_err(), "Trailing whitespace must be rejected.");
		assert!(CorrelationId::new("").is_err());

		let client =
			ClientId::new("client-123").expect("Client fixture should be considered valid.");

		assert_eq!(client.as_ref(), "client-123");
		assert_eq!(format!("{client:?}"), "Client(client-123)");
	}

	#[test]
	fn serde_round_trip_enforces_validation() {
		let client: ClientId = serde_json::from_str("\"client-42\"")
			.expect("Client should deserialize successfully.");

		assert_eq!(client.as_ref(), "client-42");
		assert!(serde_json::from_str::<ClientId>("\"with space\"").is_err());
	}

	#[test]
	fn length_limit_is_enforced() {
		let exact = "a".repeat(IDENTIFIER_MAX_LEN);

		ClientId::new(&exact).expect("Exact length should succeed.");

		assert!(ClientId::new("a".repeat(IDENTIFIER_MAX_LEN + 1)).is_err());
	}

	#[test]
	fn generated_correlation_ids_are_guid_shaped() {
		let first = CorrelationId::generate();
		let second = CorrelationId::generate();
		let groups = first.split('-').map(str::len).collect::<Vec<_>>();

		assert_eq!(groups, vec![8, 4, 4, 4, 12]);
		assert!(first.chars().all(|c| c == '-' || c.is_ascii_hexdigit()));
		assert_ne!(first, second);
		CorrelationId::new(first.as_ref()).expect("Generated identifiers should pass validation.");
	}
}
