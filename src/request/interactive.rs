//! Options that only matter for interactive acquisition, whether brokered or browser-based.

// self
use crate::{_prelude::*, auth::ScopeSet};

/// Prompt behaviour requested from the user.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Prompt {
	/// Let the user pick an account.
	#[default]
	SelectAccount,
	/// Force credential entry.
	Login,
	/// Force the consent screen.
	Consent,
	/// Never show UI beyond what the broker requires.
	NoPrompt,
}
impl Prompt {
	/// Returns the wire value.
	pub const fn as_str(self) -> &'static str {
		match self {
			Prompt::SelectAccount => "select_account",
			Prompt::Login => "login",
			Prompt::Consent => "consent",
			Prompt::NoPrompt => "no_prompt",
		}
	}
}
impl Display for Prompt {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Interactive-only options, also used by the fallback flow.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InteractiveParameters {
	/// Prompt behaviour.
	pub prompt: Prompt,
	/// Additional scopes the user should consent to up front.
	pub extra_scopes_to_consent: ScopeSet,
	/// Login hint overriding the one in the request parameters.
	pub login_hint: Option<String>,
}
impl InteractiveParameters {
	/// Sets the prompt behaviour.
	pub fn with_prompt(mut self, prompt: Prompt) -> Self {
		self.prompt = prompt;

		self
	}

	/// Sets the additional consent scopes.
	pub fn with_extra_scopes_to_consent(mut self, scopes: ScopeSet) -> Self {
		self.extra_scopes_to_consent = scopes;

		self
	}

	/// Sets the login hint override.
	pub fn with_login_hint(mut self, hint: impl Into<String>) -> Self {
		self.login_hint = Some(hint.into());

		self
	}
}
