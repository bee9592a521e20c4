//! Stored per-principal client secrets.

// self
use crate::{
	_prelude::*,
	auth::{PrincipalId, RefreshToken},
};

/// Refresh token stored for a single principal.
///
/// An empty refresh token is kept as-is but treated as absent by the resolver.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSecret {
	/// Principal the secret belongs to.
	pub principal: PrincipalId,
	/// Refresh token exchanged for an API session.
	pub refresh_token: RefreshToken,
}
impl ClientSecret {
	/// Creates a secret for the provided principal.
	pub fn new(principal: PrincipalId, refresh_token: impl Into<String>) -> Self {
		Self { principal, refresh_token: RefreshToken::new(refresh_token) }
	}

	/// Returns `true` if the secret carries a non-empty refresh token.
	pub fn is_usable(&self) -> bool {
		!self.refresh_token.is_empty()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn usability_tracks_refresh_token() {
		let principal = PrincipalId::new("editor").expect("Principal fixture should be valid.");

		assert!(ClientSecret::new(principal.clone(), "rt-editor").is_usable());
		assert!(!ClientSecret::new(principal, "").is_usable());
	}

	#[test]
	fn serde_keeps_token_but_debug_redacts() {
		let secret = ClientSecret::new(PrincipalId::shared(), "rt-shared");
		let payload = serde_json::to_string(&secret).expect("Secret should serialize to JSON.");

		assert_eq!(payload, "{\"principal\":\"shared\",\"refresh_token\":\"rt-shared\"}");
		assert!(!format!("{secret:?}").contains("rt-shared"));
	}
}
