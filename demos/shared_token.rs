//! Demonstrates a pixx.io asset source resolving its client from the tenant-wide shared refresh
//! token, then handing the same authenticated client to every later caller.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use serde_json::{Value as JsonValue, json};
// self
use pixxio_source::{
	auth::{ClientSecret, PrincipalId, RefreshToken, SessionPrincipal},
	client::{AuthFuture, AuthenticationError, Authenticator, PixxioClient},
	media::DefaultMediaTypes,
	source::{AssetSourceConfig, PixxioSource},
	store::{MemorySecretStore, SecretStore},
};

/// Pretends to exchange refresh tokens; a real host would call the pixx.io API here.
struct DemoAuthenticator;
impl Authenticator<PixxioClient> for DemoAuthenticator {
	fn authenticate<'a>(
		&'a self,
		client: &'a mut PixxioClient,
		refresh_token: &'a RefreshToken,
	) -> AuthFuture<'a> {
		Box::pin(async move {
			if refresh_token.expose().starts_with("rt-") {
				client.install_session(format!("demo-access-{}", client.principal()));

				Ok(())
			} else {
				Err(AuthenticationError::rejected("unknown refresh token"))
			}
		})
	}
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let JsonValue::Object(options) = json!({
		"apiEndpointUri": "https://example.pixx.io/api",
		"apiKey": "k1",
		"sharedRefreshToken": "rt-shared",
		"mediaTypes": { "image/jpeg": {}, "application/pdf": {} },
	}) else {
		unreachable!("Demo options are a JSON object.");
	};
	let config = AssetSourceConfig::from_options("pixxio", &options, &DefaultMediaTypes)?;
	let store = Arc::new(MemorySecretStore::default());

	store.save(ClientSecret::new(PrincipalId::new("editor")?, "rt-editor")).await?;

	let session = SessionPrincipal::default();
	let source = PixxioSource::pixxio(config, store, Arc::new(DemoAuthenticator))
		.with_principal_supplier(Arc::new(session.clone()));
	let first = source.client().await?;

	println!("Resolved client: {first:?}.");

	session.sign_in(PrincipalId::new("editor")?);

	let second = source.client().await?;

	println!(
		"Signed-in editor reuses the shared client: {} (principal {}).",
		Arc::ptr_eq(&first, &second),
		second.principal()
	);
	println!("Filtered media types: {:?}.", source.media_types().keys().collect::<Vec<_>>());

	Ok(())
}
