#![allow(dead_code)]

// std
use std::{
	sync::{
		Arc,
		atomic::{AtomicBool, AtomicUsize, Ordering},
	},
	time::Duration,
};
// crates.io
use parking_lot::Mutex;
use serde_json::{Map, Value};
// self
use pixxio_source::{
	auth::{ClientSecret, PrincipalId, RefreshToken},
	client::{AuthFuture, AuthenticationError, Authenticator, PixxioClient},
	media::DefaultMediaTypes,
	source::{AssetSourceConfig, PixxioSource},
	store::{MemorySecretStore, SecretStore, StoreError, StoreFuture},
};

pub const ENDPOINT: &str = "https://example.pixx.io/api";
pub const API_KEY: &str = "k1";
pub const SHARED_TOKEN: &str = "rt-shared";

/// Secret store wrapper counting lookups and optionally failing them.
#[derive(Default)]
pub struct CountingStore {
	pub inner: MemorySecretStore,
	lookups: AtomicUsize,
	failing: AtomicBool,
}
impl CountingStore {
	pub fn with_secrets(secrets: impl IntoIterator<Item = ClientSecret>) -> Self {
		Self { inner: MemorySecretStore::with_secrets(secrets), ..Default::default() }
	}

	pub fn lookups(&self) -> usize {
		self.lookups.load(Ordering::SeqCst)
	}

	pub fn set_failing(&self, failing: bool) {
		self.failing.store(failing, Ordering::SeqCst);
	}
}
impl SecretStore for CountingStore {
	fn find_by_principal<'a>(
		&'a self,
		principal: &'a PrincipalId,
	) -> StoreFuture<'a, Option<ClientSecret>> {
		self.lookups.fetch_add(1, Ordering::SeqCst);

		if self.failing.load(Ordering::SeqCst) {
			return Box::pin(async {
				Err(StoreError::Backend { message: "secret table unavailable".into() })
			});
		}

		self.inner.find_by_principal(principal)
	}

	fn save(&self, secret: ClientSecret) -> StoreFuture<'_, ()> {
		self.inner.save(secret)
	}

	fn remove<'a>(&'a self, principal: &'a PrincipalId) -> StoreFuture<'a, Option<ClientSecret>> {
		self.inner.remove(principal)
	}
}

/// Authenticator recording every exchanged refresh token.
#[derive(Default)]
pub struct RecordingAuthenticator {
	tokens: Mutex<Vec<String>>,
	successes: AtomicUsize,
	rejections_left: AtomicUsize,
	delay: Option<Duration>,
}
impl RecordingAuthenticator {
	/// Sleeps for `delay` inside every exchange.
	pub fn slow(delay: Duration) -> Self {
		Self { delay: Some(delay), ..Default::default() }
	}

	/// Rejects the first `count` exchanges.
	pub fn rejecting(count: usize) -> Self {
		Self { rejections_left: AtomicUsize::new(count), ..Default::default() }
	}

	pub fn tokens(&self) -> Vec<String> {
		self.tokens.lock().clone()
	}

	pub fn calls(&self) -> usize {
		self.tokens.lock().len()
	}

	pub fn successes(&self) -> usize {
		self.successes.load(Ordering::SeqCst)
	}
}
impl Authenticator<PixxioClient> for RecordingAuthenticator {
	fn authenticate<'a>(
		&'a self,
		client: &'a mut PixxioClient,
		refresh_token: &'a RefreshToken,
	) -> AuthFuture<'a> {
		Box::pin(async move {
			self.tokens.lock().push(refresh_token.expose().to_owned());

			if let Some(delay) = self.delay {
				tokio::time::sleep(delay).await;
			}

			let rejected = self
				.rejections_left
				.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
				.is_ok();

			if rejected {
				return Err(AuthenticationError::rejected("refresh token expired"));
			}

			client.install_session(format!("access-for-{}", refresh_token.expose()));
			self.successes.fetch_add(1, Ordering::SeqCst);

			Ok(())
		})
	}
}

pub fn options(value: Value) -> Map<String, Value> {
	match value {
		Value::Object(map) => map,
		other => panic!("Options fixture must be a JSON object, got {other}."),
	}
}

pub fn shared_options() -> Map<String, Value> {
	options(serde_json::json!({
		"apiEndpointUri": ENDPOINT,
		"apiKey": API_KEY,
		"sharedRefreshToken": SHARED_TOKEN,
	}))
}

pub fn private_options() -> Map<String, Value> {
	options(serde_json::json!({ "apiEndpointUri": ENDPOINT, "apiKey": API_KEY }))
}

pub fn build_source(
	options: &Map<String, Value>,
	store: Arc<CountingStore>,
	authenticator: Arc<RecordingAuthenticator>,
) -> PixxioSource {
	let config = AssetSourceConfig::from_options("pixxio", options, &DefaultMediaTypes)
		.expect("Options fixture should validate.");

	PixxioSource::pixxio(config, store, authenticator)
}

pub fn principal(value: &str) -> PrincipalId {
	PrincipalId::new(value).expect("Principal fixture should be valid.")
}
