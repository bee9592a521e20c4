//! Credential resolution and the once-per-source authenticated client.
//!
//! [`AssetSource::client`] is the only entry point hosts need. The first successful call picks
//! the active principal, looks up its client secret, falls back to the source's shared refresh
//! token when the principal has none, builds a client through the [`ClientFactory`], and lets
//! the [`Authenticator`] exchange the token. The authenticated client is then committed to the
//! source and every later call returns that same instance, whoever asks.
//!
//! Resolution runs behind a per-source async mutex so concurrent first calls authenticate once;
//! the losers wake up to find the committed client. Failures leave the cache empty, so the next
//! call starts over.

mod metrics;

pub use metrics::ResolveMetrics;

// self
use crate::{
	_prelude::*,
	auth::{ClientSecret, PrincipalId, PrincipalSupplier, RefreshToken},
	client::{Authenticator, ClientFactory},
	obs::{self, ResolveOutcome, ResolveSpan},
	source::AssetSource,
	store::SecretStore,
};

/// Picks the client secret to authenticate with.
///
/// A stored secret with a non-empty refresh token always wins. Otherwise a non-empty
/// `shared_refresh_token` is bound to `principal` as a stand-in secret. With neither, the
/// result is [`Error::MissingCredential`].
pub fn resolve_secret(
	principal: PrincipalId,
	found: Option<ClientSecret>,
	shared_refresh_token: Option<&RefreshToken>,
) -> Result<ClientSecret> {
	let secret = match found {
		Some(secret) if secret.is_usable() => Some(secret),
		found => match shared_refresh_token.filter(|token| !token.is_empty()) {
			Some(token) => {
				obs::note_shared_fallback(&principal);

				Some(ClientSecret { principal: principal.clone(), refresh_token: token.clone() })
			},
			None => found,
		},
	};

	match secret {
		Some(secret) if secret.is_usable() => Ok(secret),
		_ => Err(Error::MissingCredential { principal }),
	}
}

/// Looks up the secret for whoever is acting and applies the shared-token fallback.
#[derive(Clone, Copy)]
pub struct CredentialResolver<'a> {
	/// Reports the active principal.
	pub principals: &'a dyn PrincipalSupplier,
	/// Secret lookup backend.
	pub secrets: &'a dyn SecretStore,
	/// Tenant-wide fallback token.
	pub shared_refresh_token: Option<&'a RefreshToken>,
}
impl CredentialResolver<'_> {
	/// Resolves the client secret for the active principal.
	pub async fn resolve(&self) -> Result<ClientSecret> {
		let principal = self.principals.active_principal();
		let found = self.secrets.find_by_principal(&principal).await?;

		resolve_secret(principal, found, self.shared_refresh_token)
	}
}
impl Debug for CredentialResolver<'_> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CredentialResolver")
			.field("shared_refresh_token_set", &self.shared_refresh_token.is_some())
			.finish()
	}
}

impl<F, A> AssetSource<F, A>
where
	F: ClientFactory,
	A: ?Sized + Authenticator<F::Client>,
{
	/// Returns the authenticated client, resolving and authenticating it on first use.
	///
	/// The principal comes from the supplier configured on the source.
	pub async fn client(&self) -> Result<Arc<F::Client>> {
		self.client_with(self.principals.as_ref()).await
	}

	/// Same as [`client`](Self::client) but reads the active principal from `principals`, for
	/// hosts that bind a supplier per request.
	///
	/// Once a client is cached the supplier is not consulted at all: the first principal to
	/// resolve a client determines the account every later caller uses.
	pub async fn client_with(&self, principals: &dyn PrincipalSupplier) -> Result<Arc<F::Client>> {
		obs::record_resolve_outcome(ResolveOutcome::Attempt);
		self.metrics.record_attempt();

		if let Some(client) = self.cached_client() {
			self.record_cache_hit();

			return Ok(client);
		}

		let span = ResolveSpan::new(self.identifier(), "client");
		let result = span
			.instrument(async move {
				let _singleflight = self.resolve_guard.lock().await;

				if let Some(client) = self.cached_client() {
					self.record_cache_hit();

					return Ok(client);
				}

				let resolver = CredentialResolver {
					principals,
					secrets: self.secrets.as_ref(),
					shared_refresh_token: self.config.shared_refresh_token(),
				};
				let secret = resolver.resolve().await?;
				let mut client = self.factory.create(
					&secret.principal,
					self.config.api_endpoint(),
					self.config.api_key(),
				);

				self.authenticator.authenticate(&mut client, &secret.refresh_token).await.map_err(
					|source| Error::AuthenticationFailed {
						principal: secret.principal.clone(),
						source,
					},
				)?;

				let client = Arc::new(client);

				*self.cached.write() = Some(client.clone());

				obs::record_resolve_outcome(ResolveOutcome::Success);
				self.metrics.record_success();

				Ok::<_, Error>(client)
			})
			.await;

		if let Err(err) = &result {
			obs::record_resolve_outcome(ResolveOutcome::Failure);
			obs::note_resolve_failure(err);
			self.metrics.record_failure();
		}

		result
	}

	fn record_cache_hit(&self) {
		obs::record_resolve_outcome(ResolveOutcome::CacheHit);
		self.metrics.record_cache_hit();
	}
}
