//! Client-info blob returned alongside tokens.
//!
//! The authority encodes `{"uid": ..., "utid": ...}` as base64url JSON. Brokers pass the blob
//! through untouched, so token results keep the raw string and decode on demand.

// crates.io
use base64::{
	Engine as _,
	engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD},
};
// self
use crate::_prelude::*;

/// Errors raised while decoding a client-info blob.
#[derive(Debug, ThisError)]
pub enum ClientInfoError {
	/// The blob is not valid base64url.
	#[error("Client info is not valid base64url.")]
	Encoding(#[from] base64::DecodeError),
	/// The decoded bytes are not the expected JSON document.
	#[error("Client info is not a valid JSON document.")]
	Json(#[from] serde_json::Error),
}

/// Decoded client info.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
	/// Object identifier of the signed-in account.
	pub uid: String,
	/// Tenant identifier of the signed-in account's home tenant.
	pub utid: String,
}
impl ClientInfo {
	/// Decodes a raw blob, accepting both padded and unpadded base64url.
	pub fn decode(raw: &str) -> Result<Self, ClientInfoError> {
		let raw = raw.trim();
		let bytes =
			if raw.ends_with('=') { URL_SAFE.decode(raw)? } else { URL_SAFE_NO_PAD.decode(raw)? };

		Ok(serde_json::from_slice(&bytes)?)
	}

	/// Encodes the client info the way the authority does.
	pub fn encode(&self) -> String {
		let json = serde_json::json!({ "uid": self.uid, "utid": self.utid });

		URL_SAFE_NO_PAD.encode(json.to_string())
	}

	/// Home account identifier (`uid.utid`).
	pub fn home_account_id(&self) -> String {
		format!("{}.{}", self.uid, self.utid)
	}
}
