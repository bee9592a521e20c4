//! Client construction and authentication contracts, plus the default pixx.io client handle.
//!
//! An asset source never talks to the pixx.io API itself. It asks a [`ClientFactory`] for an
//! unauthenticated handle, then hands that handle and a refresh token to an [`Authenticator`]
//! which performs the exchange however the host's transport sees fit. The default factory
//! produces [`PixxioClient`] values that carry the fixed field projection and image rendition
//! presets every asset query relies on.

// crates.io
use serde::{Serializer, ser::SerializeMap};
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, ApiKey, PrincipalId, RefreshToken},
};

/// Boxed future returned by [`Authenticator::authenticate`].
pub type AuthFuture<'a> =
	Pin<Box<dyn Future<Output = Result<(), AuthenticationError>> + 'a + Send>>;

/// Asset fields requested from the pixx.io API for every listing.
pub const ASSET_FIELDS: &[&str] = &[
	"id",
	"originalFilename",
	"fileType",
	"keywords",
	"createDate",
	"imageHeight",
	"imageWidth",
	"originalPath",
	"subject",
	"description",
	"modifyDate",
	"fileSize",
	"modifiedImagePaths",
	"imagePath",
];

/// Image renditions requested alongside every asset: two square thumbnails and one preview.
pub const IMAGE_OPTIONS: &[ImageOption] = &[
	ImageOption::Square { edge: 400, quality: 90 },
	ImageOption::Square { edge: 1500, quality: 90 },
	ImageOption::MaxDimension { size: 1920, quality: 90 },
];

/// Builds unauthenticated client handles. Must not perform I/O.
pub trait ClientFactory
where
	Self: Send + Sync,
{
	/// Handle type produced by the factory.
	type Client: 'static + Send + Sync;

	/// Creates a client for `principal` talking to `api_endpoint` with `api_key`.
	fn create(&self, principal: &PrincipalId, api_endpoint: &Url, api_key: &ApiKey)
	-> Self::Client;
}

/// Exchanges a refresh token for a working API session on a freshly built client.
///
/// Timeouts and cancellation belong to the implementation; callers await the future as-is.
pub trait Authenticator<C>
where
	Self: Send + Sync,
	C: ?Sized,
{
	/// Authenticates `client` with `refresh_token`, installing the resulting session on it.
	fn authenticate<'a>(&'a self, client: &'a mut C, refresh_token: &'a RefreshToken)
	-> AuthFuture<'a>;
}

/// Failure reported by an [`Authenticator`].
#[derive(Debug, ThisError)]
pub enum AuthenticationError {
	/// The remote side refused the refresh token.
	#[error("The refresh token was rejected: {reason}.")]
	Rejected {
		/// Remote or authenticator supplied reason.
		reason: String,
	},
	/// The exchange could not be completed (network, unexpected response).
	#[error("The token exchange could not be completed.")]
	Exchange {
		/// Underlying transport or decoding failure.
		#[source]
		source: Box<dyn StdError + Send + Sync>,
	},
}
impl AuthenticationError {
	/// Builds a [`AuthenticationError::Rejected`] with the provided reason.
	pub fn rejected(reason: impl Into<String>) -> Self {
		Self::Rejected { reason: reason.into() }
	}

	/// Wraps a transport-specific failure.
	pub fn exchange(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Exchange { source: Box::new(src) }
	}
}

/// Image rendition preset requested from the API.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageOption {
	/// Square rendition with the given edge length in pixels.
	Square {
		/// Edge length, sent as both `width` and `height`.
		edge: u32,
		/// JPEG quality.
		quality: u8,
	},
	/// Longest side capped at `size` pixels.
	MaxDimension {
		/// Maximum dimension, sent as `sizeMax`.
		size: u32,
		/// JPEG quality.
		quality: u8,
	},
}
impl ImageOption {
	/// Returns the `(width, height)` pair for square presets.
	pub const fn dimensions(self) -> Option<(u32, u32)> {
		match self {
			Self::Square { edge, .. } => Some((edge, edge)),
			Self::MaxDimension { .. } => None,
		}
	}

	/// Returns the requested quality.
	pub const fn quality(self) -> u8 {
		match self {
			Self::Square { quality, .. } | Self::MaxDimension { quality, .. } => quality,
		}
	}
}
impl Serialize for ImageOption {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		match *self {
			Self::Square { edge, quality } => {
				let mut map = serializer.serialize_map(Some(3))?;

				map.serialize_entry("width", &edge)?;
				map.serialize_entry("height", &edge)?;
				map.serialize_entry("quality", &quality)?;
				map.end()
			},
			Self::MaxDimension { size, quality } => {
				let mut map = serializer.serialize_map(Some(2))?;

				map.serialize_entry("sizeMax", &size)?;
				map.serialize_entry("quality", &quality)?;
				map.end()
			},
		}
	}
}

/// Access token issued for an authenticated pixx.io session.
#[derive(Clone, Debug)]
pub struct ApiSession {
	/// Access token; redacted in debug output.
	pub access_token: AccessToken,
	/// Instant the session was established.
	pub established_at: OffsetDateTime,
}

/// Handle for the pixx.io API bound to one principal.
pub struct PixxioClient {
	principal: PrincipalId,
	api_endpoint: Url,
	api_key: ApiKey,
	fields: &'static [&'static str],
	image_options: &'static [ImageOption],
	session: Option<ApiSession>,
}
impl PixxioClient {
	/// Principal the client acts for.
	pub fn principal(&self) -> &PrincipalId {
		&self.principal
	}

	/// API endpoint the client talks to.
	pub fn api_endpoint(&self) -> &Url {
		&self.api_endpoint
	}

	/// API key sent with every request.
	pub fn api_key(&self) -> &ApiKey {
		&self.api_key
	}

	/// Asset fields requested by listings.
	pub fn fields(&self) -> &'static [&'static str] {
		self.fields
	}

	/// Image rendition presets requested by listings.
	pub fn image_options(&self) -> &'static [ImageOption] {
		self.image_options
	}

	/// Current session, if an authenticator installed one.
	pub fn session(&self) -> Option<&ApiSession> {
		self.session.as_ref()
	}

	/// Returns `true` once a session has been installed.
	pub fn is_authenticated(&self) -> bool {
		self.session.is_some()
	}

	/// Installs the session produced by a successful token exchange.
	pub fn install_session(&mut self, access_token: impl Into<String>) {
		self.session = Some(ApiSession {
			access_token: AccessToken::new(access_token),
			established_at: OffsetDateTime::now_utc(),
		});
	}
}
impl Debug for PixxioClient {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("PixxioClient")
			.field("principal", &self.principal)
			.field("api_endpoint", &self.api_endpoint.as_str())
			.field("authenticated", &self.is_authenticated())
			.finish()
	}
}

/// Default factory producing [`PixxioClient`] handles with the fixed field and image presets.
#[derive(Clone, Copy, Debug, Default)]
pub struct PixxioClientFactory;
impl ClientFactory for PixxioClientFactory {
	type Client = PixxioClient;

	fn create(
		&self,
		principal: &PrincipalId,
		api_endpoint: &Url,
		api_key: &ApiKey,
	) -> PixxioClient {
		PixxioClient {
			principal: principal.clone(),
			api_endpoint: api_endpoint.clone(),
			api_key: api_key.clone(),
			fields: ASSET_FIELDS,
			image_options: IMAGE_OPTIONS,
			session: None,
		}
	}
}
