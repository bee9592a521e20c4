//! Thread-safe in-memory [`SecretStore`] for local development and tests.

// self
use crate::{
	_prelude::*,
	auth::{ClientSecret, PrincipalId},
	store::{SecretStore, StoreFuture},
};

type SecretMap = Arc<RwLock<HashMap<PrincipalId, ClientSecret>>>;

/// Storage backend that keeps client secrets in-process.
#[derive(Clone, Debug, Default)]
pub struct MemorySecretStore(SecretMap);
impl MemorySecretStore {
	/// Creates a store pre-populated with `secrets`.
	pub fn with_secrets(secrets: impl IntoIterator<Item = ClientSecret>) -> Self {
		let map = secrets.into_iter().map(|secret| (secret.principal.clone(), secret)).collect();

		Self(Arc::new(RwLock::new(map)))
	}

	/// Number of stored secrets.
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// Returns `true` if no secret is stored.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}
}
impl SecretStore for MemorySecretStore {
	fn find_by_principal<'a>(
		&'a self,
		principal: &'a PrincipalId,
	) -> StoreFuture<'a, Option<ClientSecret>> {
		let found = self.0.read().get(principal).cloned();

		Box::pin(async move { Ok(found) })
	}

	fn save(&self, secret: ClientSecret) -> StoreFuture<'_, ()> {
		let map = self.0.clone();

		Box::pin(async move {
			map.write().insert(secret.principal.clone(), secret);

			Ok(())
		})
	}

	fn remove<'a>(&'a self, principal: &'a PrincipalId) -> StoreFuture<'a, Option<ClientSecret>> {
		let map = self.0.clone();

		Box::pin(async move { Ok(map.write().remove(principal)) })
	}
}
