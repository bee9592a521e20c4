//! Redacting wrappers for API keys and refresh tokens.

// self
use crate::_prelude::*;

macro_rules! def_secret {
	($name:ident, $doc:literal) => {
		#[doc = $doc]
		///
		/// `Debug` and `Display` print `<redacted>`; use [`expose`](Self::expose) at the one call
		/// site that really needs the value.
		#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
		#[serde(transparent)]
		pub struct $name(String);
		impl $name {
			/// Wraps a new secret string.
			pub fn new(value: impl Into<String>) -> Self {
				Self(value.into())
			}

			/// Returns the inner value. Callers must avoid logging this string.
			pub fn expose(&self) -> &str {
				&self.0
			}

			/// Returns `true` when the secret holds no characters.
			pub fn is_empty(&self) -> bool {
				self.0.is_empty()
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.debug_tuple(stringify!($name)).field(&"<redacted>").finish()
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str("<redacted>")
			}
		}
	};
}

def_secret! { AccessToken, "Short-lived access token of an established API session." }
def_secret! { ApiKey, "API key identifying the integration against the pixx.io API." }
def_secret! { RefreshToken, "Long-lived refresh token exchanged for an API session." }
