//! pixx.io asset sources: validated configuration plus the lazily authenticated client slot.

pub mod config;

pub use config::*;

// self
use crate::{
	_prelude::*,
	auth::{AnonymousPrincipal, PrincipalSupplier, SourceId},
	client::{Authenticator, ClientFactory, PixxioClient, PixxioClientFactory},
	error::ConfigError,
	media::MediaTypeRegistry,
	resolve::ResolveMetrics,
	store::SecretStore,
};

/// Human readable label shown for every pixx.io asset source.
pub const LABEL: &str = "pixx.io";

/// Asset source specialized for the crate's default [`PixxioClient`].
pub type PixxioSource = AssetSource<PixxioClientFactory, dyn Authenticator<PixxioClient>>;

/// One configured pixx.io asset source.
///
/// The source owns its collaborators and a single client slot. The slot starts empty, is
/// filled by the first successful [`client`](Self::client) call, and never changes afterwards.
/// Share the source behind an [`Arc`] rather than rebuilding it; every instance authenticates
/// on its own.
pub struct AssetSource<F, A>
where
	F: ClientFactory,
	A: ?Sized + Authenticator<F::Client>,
{
	pub(crate) config: AssetSourceConfig,
	pub(crate) principals: Arc<dyn PrincipalSupplier>,
	pub(crate) secrets: Arc<dyn SecretStore>,
	pub(crate) factory: Arc<F>,
	pub(crate) authenticator: Arc<A>,
	pub(crate) metrics: Arc<ResolveMetrics>,
	pub(crate) cached: RwLock<Option<Arc<F::Client>>>,
	pub(crate) resolve_guard: AsyncMutex<()>,
}
impl<F, A> AssetSource<F, A>
where
	F: ClientFactory,
	A: ?Sized + Authenticator<F::Client>,
{
	/// Creates a source from an already validated configuration.
	///
	/// The source starts out anonymous; use
	/// [`with_principal_supplier`](Self::with_principal_supplier) to bind it to a session.
	pub fn new(
		config: AssetSourceConfig,
		secrets: Arc<dyn SecretStore>,
		factory: impl Into<Arc<F>>,
		authenticator: impl Into<Arc<A>>,
	) -> Self {
		Self {
			config,
			principals: Arc::new(AnonymousPrincipal),
			secrets,
			factory: factory.into(),
			authenticator: authenticator.into(),
			metrics: Default::default(),
			cached: RwLock::new(None),
			resolve_guard: AsyncMutex::new(()),
		}
	}

	/// Validates `options` and creates the source in one step.
	pub fn from_options(
		identifier: &str,
		options: &JsonMap<String, JsonValue>,
		registry: &dyn MediaTypeRegistry,
		secrets: Arc<dyn SecretStore>,
		factory: impl Into<Arc<F>>,
		authenticator: impl Into<Arc<A>>,
	) -> Result<Self, ConfigError> {
		let config = AssetSourceConfig::from_options(identifier, options, registry)?;

		Ok(Self::new(config, secrets, factory, authenticator))
	}

	/// Replaces the supplier consulted by [`client`](Self::client).
	pub fn with_principal_supplier(mut self, principals: Arc<dyn PrincipalSupplier>) -> Self {
		self.principals = principals;

		self
	}

	/// Asset source identifier.
	pub fn identifier(&self) -> &SourceId {
		self.config.identifier()
	}

	/// Display label, always [`LABEL`].
	pub fn label(&self) -> &'static str {
		LABEL
	}

	/// pixx.io sources never accept uploads or edits.
	pub fn is_read_only(&self) -> bool {
		true
	}

	/// Raw option map the source was declared with.
	pub fn options(&self) -> &JsonMap<String, JsonValue> {
		self.config.options()
	}

	/// Validated media type filters.
	pub fn media_types(&self) -> &BTreeMap<String, MediaTypeOptions> {
		self.config.media_types()
	}

	/// Normalized API endpoint.
	pub fn api_endpoint(&self) -> &Url {
		self.config.api_endpoint()
	}

	/// Validated configuration.
	pub fn config(&self) -> &AssetSourceConfig {
		&self.config
	}

	/// Resolution counters for this source.
	pub fn metrics(&self) -> &ResolveMetrics {
		&self.metrics
	}

	/// Returns the committed client without resolving one.
	pub fn cached_client(&self) -> Option<Arc<F::Client>> {
		self.cached.read().clone()
	}
}
impl PixxioSource {
	/// Creates a source producing [`PixxioClient`] handles, authenticated by `authenticator`.
	pub fn pixxio(
		config: AssetSourceConfig,
		secrets: Arc<dyn SecretStore>,
		authenticator: Arc<dyn Authenticator<PixxioClient>>,
	) -> Self {
		Self::new(config, secrets, PixxioClientFactory, authenticator)
	}
}
impl<F, A> Debug for AssetSource<F, A>
where
	F: ClientFactory,
	A: ?Sized + Authenticator<F::Client>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AssetSource")
			.field("config", &self.config)
			.field("resolved", &self.cached.read().is_some())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;
	use crate::{
		auth::{ClientSecret, PrincipalId, RefreshToken, SessionPrincipal},
		client::{AuthFuture, AuthenticationError},
		media::DefaultMediaTypes,
		store::MemorySecretStore,
	};

	#[derive(Default)]
	struct FixedAuthenticator {
		calls: Mutex<Vec<String>>,
		reject: bool,
	}
	impl Authenticator<PixxioClient> for FixedAuthenticator {
		fn authenticate<'a>(
			&'a self,
			client: &'a mut PixxioClient,
			refresh_token: &'a RefreshToken,
		) -> AuthFuture<'a> {
			Box::pin(async move {
				self.calls.lock().push(refresh_token.expose().to_owned());

				if self.reject {
					return Err(AuthenticationError::rejected("expired"));
				}

				client.install_session(format!("access-for-{}", refresh_token.expose()));

				Ok(())
			})
		}
	}

	fn config(value: JsonValue) -> AssetSourceConfig {
		let JsonValue::Object(options) = value else {
			panic!("Options fixture must be an object.");
		};

		AssetSourceConfig::from_options("pixxio", &options, &DefaultMediaTypes)
			.expect("Options fixture should validate.")
	}

	fn shared_config() -> AssetSourceConfig {
		config(json!({
			"apiEndpointUri": "https://example.pixx.io/api",
			"apiKey": "k1",
			"sharedRefreshToken": "rt-shared",
		}))
	}

	#[test]
	fn descriptors_reflect_configuration() {
		let source = PixxioSource::pixxio(
			shared_config(),
			Arc::new(MemorySecretStore::default()),
			Arc::new(FixedAuthenticator::default()),
		);

		assert_eq!(source.identifier().as_ref(), "pixxio");
		assert_eq!(source.label(), "pixx.io");
		assert!(source.is_read_only());
		assert_eq!(source.options()["apiKey"], json!("k1"));
		assert_eq!(source.api_endpoint().as_str(), "https://example.pixx.io/api");
		assert!(source.cached_client().is_none());
		assert!(!format!("{source:?}").contains("rt-shared"));
	}

	#[tokio::test]
	async fn first_call_resolves_and_later_calls_hit_cache() {
		let authenticator = Arc::new(FixedAuthenticator::default());
		let source = PixxioSource::pixxio(
			shared_config(),
			Arc::new(MemorySecretStore::default()),
			authenticator.clone(),
		);
		let first = source.client().await.expect("Shared token should authenticate.");
		let second = source.client().await.expect("Cached client should be returned.");

		assert!(Arc::ptr_eq(&first, &second));
		assert!(first.principal().is_shared());
		assert!(first.is_authenticated());
		assert_eq!(authenticator.calls.lock().as_slice(), ["rt-shared"]);
		assert_eq!(source.metrics().attempts(), 2);
		assert_eq!(source.metrics().cache_hits(), 1);
		assert_eq!(source.metrics().successes(), 1);
		assert_eq!(source.metrics().failures(), 0);
	}

	#[tokio::test]
	async fn cached_client_ignores_later_principal_changes() {
		let editor = PrincipalId::new("editor").expect("Principal fixture should be valid.");
		let secrets =
			MemorySecretStore::with_secrets([ClientSecret::new(editor.clone(), "rt-editor")]);
		let session = SessionPrincipal::signed_in(editor);
		let source = PixxioSource::pixxio(
			shared_config(),
			Arc::new(secrets),
			Arc::new(FixedAuthenticator::default()),
		)
		.with_principal_supplier(Arc::new(session.clone()));
		let first = source.client().await.expect("Editor secret should authenticate.");

		session.sign_out();

		let second = source.client().await.expect("Cached client should be returned.");

		assert!(Arc::ptr_eq(&first, &second));
		assert_eq!(second.principal().as_ref(), "editor");
	}

	#[tokio::test]
	async fn rejected_authentication_is_not_sticky() {
		let source = PixxioSource::pixxio(
			shared_config(),
			Arc::new(MemorySecretStore::default()),
			Arc::new(FixedAuthenticator { reject: true, ..Default::default() }),
		);
		let err = source.client().await.expect_err("Rejected token should fail.");

		assert!(matches!(
			err,
			Error::AuthenticationFailed { ref principal, .. } if principal.is_shared()
		));
		assert!(source.cached_client().is_none());
		assert_eq!(source.metrics().failures(), 1);
	}
}
