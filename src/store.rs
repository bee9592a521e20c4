//! Secret lookup contract and built-in client secret stores.

pub mod file;
pub mod memory;

pub use file::FileSecretStore;
pub use memory::MemorySecretStore;

// self
use crate::{
	_prelude::*,
	auth::{ClientSecret, PrincipalId},
};

/// Boxed future returned by [`SecretStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Persistence contract for per-principal client secrets.
///
/// The resolver only ever calls [`find_by_principal`](Self::find_by_principal); `save` and
/// `remove` exist for the setup screens that collect refresh tokens from users.
pub trait SecretStore
where
	Self: Send + Sync,
{
	/// Fetches the secret stored for `principal`, if any.
	fn find_by_principal<'a>(
		&'a self,
		principal: &'a PrincipalId,
	) -> StoreFuture<'a, Option<ClientSecret>>;

	/// Persists or replaces the secret for its principal.
	fn save(&self, secret: ClientSecret) -> StoreFuture<'_, ()>;

	/// Deletes the secret stored for `principal`, returning it if one existed.
	fn remove<'a>(&'a self, principal: &'a PrincipalId) -> StoreFuture<'a, Option<ClientSecret>>;
}

/// Error type produced by [`SecretStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
