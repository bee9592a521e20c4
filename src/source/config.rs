//! Validation of the option map an asset source is declared with.

// self
use crate::{
	_prelude::*,
	auth::{ApiKey, RefreshToken, SourceId},
	error::ConfigError,
	media::MediaTypeRegistry,
};

/// Option key holding the pixx.io API endpoint.
pub const API_ENDPOINT_URI: &str = "apiEndpointUri";
/// Option key holding the tenant API key.
pub const API_KEY: &str = "apiKey";
/// Option key holding the tenant-wide fallback refresh token.
pub const SHARED_REFRESH_TOKEN: &str = "sharedRefreshToken";
/// Option key holding the media type filters.
pub const MEDIA_TYPES: &str = "mediaTypes";

/// Per media type filter options as supplied.
pub type MediaTypeOptions = JsonMap<String, JsonValue>;

/// Validated settings of one asset source.
///
/// A value of this type only exists once every option passed validation, so holders never see a
/// partially configured source.
#[derive(Clone)]
pub struct AssetSourceConfig {
	identifier: SourceId,
	api_endpoint: Url,
	api_key: ApiKey,
	shared_refresh_token: Option<RefreshToken>,
	media_types: BTreeMap<String, MediaTypeOptions>,
	options: JsonMap<String, JsonValue>,
}
impl AssetSourceConfig {
	/// Validates `identifier` and `options`.
	///
	/// Recognized keys are [`API_ENDPOINT_URI`], [`API_KEY`], [`SHARED_REFRESH_TOKEN`], and
	/// [`MEDIA_TYPES`]; anything else is rejected. `mediaTypes` keys are checked against
	/// `registry`. Nothing here performs I/O.
	pub fn from_options(
		identifier: &str,
		options: &JsonMap<String, JsonValue>,
		registry: &dyn MediaTypeRegistry,
	) -> Result<Self, ConfigError> {
		let identifier = SourceId::new(identifier)
			.map_err(|_| ConfigError::InvalidIdentifier { identifier: identifier.to_owned() })?;
		let mut api_endpoint = None;
		let mut api_key = None;
		let mut shared_refresh_token = None;
		let mut media_types = BTreeMap::new();

		for (name, value) in options {
			match name.as_str() {
				API_ENDPOINT_URI => api_endpoint = Some(parse_endpoint(&identifier, value)?),
				API_KEY => api_key = Some(ApiKey::new(non_empty_str(&identifier, API_KEY, value)?)),
				SHARED_REFRESH_TOKEN =>
					shared_refresh_token = Some(RefreshToken::new(non_empty_str(
						&identifier,
						SHARED_REFRESH_TOKEN,
						value,
					)?)),
				MEDIA_TYPES => media_types = parse_media_types(&identifier, value, registry)?,
				_ =>
					return Err(ConfigError::UnknownOption {
						source_id: identifier.to_string(),
						option: name.clone(),
					}),
			}
		}

		let api_endpoint = api_endpoint.ok_or_else(|| missing(&identifier, API_ENDPOINT_URI))?;
		let api_key = api_key.ok_or_else(|| missing(&identifier, API_KEY))?;

		Ok(Self {
			identifier,
			api_endpoint,
			api_key,
			shared_refresh_token,
			media_types,
			options: options.clone(),
		})
	}

	/// Asset source identifier.
	pub fn identifier(&self) -> &SourceId {
		&self.identifier
	}

	/// Normalized API endpoint.
	///
	/// Scheme and host are lowercased and a bare host gains a root path, so
	/// `https://Example.pixx.io` is stored as `https://example.pixx.io/`.
	pub fn api_endpoint(&self) -> &Url {
		&self.api_endpoint
	}

	/// Normalized API endpoint in string form.
	pub fn api_endpoint_uri(&self) -> &str {
		self.api_endpoint.as_str()
	}

	/// Tenant API key.
	pub fn api_key(&self) -> &ApiKey {
		&self.api_key
	}

	/// Fallback refresh token shared by every principal of the tenant.
	pub fn shared_refresh_token(&self) -> Option<&RefreshToken> {
		self.shared_refresh_token.as_ref()
	}

	/// Validated media type filters keyed by media type as supplied.
	pub fn media_types(&self) -> &BTreeMap<String, MediaTypeOptions> {
		&self.media_types
	}

	/// Raw option map the source was declared with.
	pub fn options(&self) -> &JsonMap<String, JsonValue> {
		&self.options
	}
}
impl Debug for AssetSourceConfig {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AssetSourceConfig")
			.field("identifier", &self.identifier)
			.field("api_endpoint", &self.api_endpoint.as_str())
			.field("api_key", &self.api_key)
			.field("shared_refresh_token_set", &self.shared_refresh_token.is_some())
			.field("media_types", &self.media_types.keys().collect::<Vec<_>>())
			.finish()
	}
}

fn missing(identifier: &SourceId, option: &'static str) -> ConfigError {
	ConfigError::MissingOption { source_id: identifier.to_string(), option }
}

fn invalid(identifier: &SourceId, option: &'static str) -> ConfigError {
	ConfigError::InvalidOption { source_id: identifier.to_string(), option }
}

fn non_empty_str<'a>(
	identifier: &SourceId,
	option: &'static str,
	value: &'a JsonValue,
) -> Result<&'a str, ConfigError> {
	match value.as_str() {
		Some(value) if !value.is_empty() => Ok(value),
		_ => Err(invalid(identifier, option)),
	}
}

fn parse_endpoint(identifier: &SourceId, value: &JsonValue) -> Result<Url, ConfigError> {
	let raw = value.as_str().ok_or_else(|| invalid(identifier, API_ENDPOINT_URI))?;

	Url::parse(raw).map_err(|_| invalid(identifier, API_ENDPOINT_URI))
}

fn parse_media_types(
	identifier: &SourceId,
	value: &JsonValue,
	registry: &dyn MediaTypeRegistry,
) -> Result<BTreeMap<String, MediaTypeOptions>, ConfigError> {
	let JsonValue::Object(entries) = value else {
		return Err(invalid(identifier, MEDIA_TYPES));
	};

	entries
		.iter()
		.map(|(media_type, options)| {
			if !registry.is_known(media_type) {
				return Err(ConfigError::UnknownMediaType {
					source_id: identifier.to_string(),
					media_type: media_type.clone(),
				});
			}

			let options = match options {
				JsonValue::Null => MediaTypeOptions::new(),
				JsonValue::Object(options) => options.clone(),
				_ => return Err(invalid(identifier, MEDIA_TYPES)),
			};

			Ok((media_type.clone(), options))
		})
		.collect()
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;
	use crate::media::DefaultMediaTypes;

	fn options(value: JsonValue) -> JsonMap<String, JsonValue> {
		match value {
			JsonValue::Object(map) => map,
			other => panic!("Options fixture must be an object, got {other}."),
		}
	}

	fn build(value: JsonValue) -> Result<AssetSourceConfig, ConfigError> {
		AssetSourceConfig::from_options("pixxio", &options(value), &DefaultMediaTypes)
	}

	#[test]
	fn minimal_options_validate() {
		let config = build(json!({
			"apiEndpointUri": "https://Example.pixx.io/api",
			"apiKey": "k1",
		}))
		.expect("Minimal options should validate.");

		assert_eq!(config.identifier().as_ref(), "pixxio");
		assert_eq!(config.api_endpoint_uri(), "https://example.pixx.io/api");
		assert_eq!(config.api_key().expose(), "k1");
		assert!(config.shared_refresh_token().is_none());
		assert!(config.media_types().is_empty());
		assert_eq!(config.options().len(), 2);
	}

	#[test]
	fn bare_host_endpoint_gains_root_path() {
		let config = build(json!({ "apiEndpointUri": "https://Example.pixx.io", "apiKey": "k1" }))
			.expect("Bare host endpoint should validate.");

		assert_eq!(config.api_endpoint_uri(), "https://example.pixx.io/");
		assert_eq!(config.api_endpoint().path(), "/");
	}

	#[test]
	fn required_options_must_be_present() {
		let err = build(json!({ "apiKey": "k1" })).expect_err("Endpoint is required.");

		assert_eq!(err.option(), Some(API_ENDPOINT_URI));
		assert!(matches!(err, ConfigError::MissingOption { .. }));

		let err = build(json!({ "apiEndpointUri": "https://example.pixx.io/api" }))
			.expect_err("API key is required.");

		assert!(matches!(err, ConfigError::MissingOption { option: API_KEY, .. }));
	}

	#[test]
	fn malformed_values_name_the_option() {
		let cases = [
			(json!({ "apiEndpointUri": "not a uri", "apiKey": "k1" }), API_ENDPOINT_URI),
			(json!({ "apiEndpointUri": "/relative/api", "apiKey": "k1" }), API_ENDPOINT_URI),
			(json!({ "apiEndpointUri": 42, "apiKey": "k1" }), API_ENDPOINT_URI),
			(json!({ "apiEndpointUri": "https://example.pixx.io/api", "apiKey": "" }), API_KEY),
			(
				json!({
					"apiEndpointUri": "https://example.pixx.io/api",
					"apiKey": "k1",
					"sharedRefreshToken": "",
				}),
				SHARED_REFRESH_TOKEN,
			),
			(
				json!({
					"apiEndpointUri": "https://example.pixx.io/api",
					"apiKey": "k1",
					"mediaTypes": ["image/jpeg"],
				}),
				MEDIA_TYPES,
			),
			(
				json!({
					"apiEndpointUri": "https://example.pixx.io/api",
					"apiKey": "k1",
					"mediaTypes": null,
				}),
				MEDIA_TYPES,
			),
			(
				json!({
					"apiEndpointUri": "https://example.pixx.io/api",
					"apiKey": "k1",
					"mediaTypes": { "image/jpeg": true },
				}),
				MEDIA_TYPES,
			),
		];

		for (value, option) in cases {
			let err = build(value).expect_err("Malformed option should be rejected.");

			assert!(
				matches!(err, ConfigError::InvalidOption { option: found, .. } if found == option),
				"Unexpected error for {option}: {err:?}."
			);
		}
	}

	#[test]
	fn media_types_are_checked_against_registry() {
		let config = build(json!({
			"apiEndpointUri": "https://example.pixx.io/api",
			"apiKey": "k1",
			"mediaTypes": { "image/jpeg": { "tags": ["hero"] }, "application/pdf": null },
		}))
		.expect("Known media types should validate.");

		assert_eq!(config.media_types().len(), 2);
		assert!(config.media_types()["application/pdf"].is_empty());
		assert_eq!(config.media_types()["image/jpeg"]["tags"], json!(["hero"]));

		let err = build(json!({
			"apiEndpointUri": "https://example.pixx.io/api",
			"apiKey": "k1",
			"mediaTypes": { "image/x-unheard-of": {} },
		}))
		.expect_err("Unknown media type should be rejected.");

		assert_eq!(err, ConfigError::UnknownMediaType {
			source_id: "pixxio".into(),
			media_type: "image/x-unheard-of".into(),
		});
	}

	#[test]
	fn debug_output_redacts_secrets() {
		let config = build(json!({
			"apiEndpointUri": "https://example.pixx.io/api",
			"apiKey": "k1-secret",
			"sharedRefreshToken": "rt-shared",
		}))
		.expect("Options should validate.");
		let rendered = format!("{config:?}");

		assert!(!rendered.contains("k1-secret"));
		assert!(!rendered.contains("rt-shared"));
	}
}
