//! Crate-level error types shared by asset source construction and client resolution.

// self
use crate::{_prelude::*, auth::PrincipalId};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Canonical error exposed by public APIs.
///
/// Construction failures arrive wrapped in [`Error::Config`]; everything else is raised while
/// resolving a client and leaves the asset source ready for another attempt.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Asset source options were rejected.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Secret lookup backend failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),

	/// No usable refresh token exists for the principal, even after the shared fallback.
	#[error(
		"No client secret found for account {principal}. Please set up the pixx.io plugin with the correct credentials."
	)]
	MissingCredential {
		/// Principal the lookup ran for (`shared` when nobody is signed in).
		principal: PrincipalId,
	},
	/// The authenticator rejected the refresh token exchange.
	#[error("Authentication against the pixx.io API failed for account {principal}.")]
	AuthenticationFailed {
		/// Principal the client was built for.
		principal: PrincipalId,
		/// Failure reported by the authenticator.
		#[source]
		source: crate::client::AuthenticationError,
	},
}

/// Asset source configuration failures raised at construction time.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ConfigError {
	/// Asset source identifier does not follow the naming rule.
	#[error(
		"Invalid asset source identifier \"{identifier}\". The identifier must match /^[a-z][a-z0-9-]{{0,62}}[a-z]$/."
	)]
	InvalidIdentifier {
		/// Identifier as supplied.
		identifier: String,
	},
	/// Option key outside the recognized set.
	#[error("Unknown asset source option \"{option}\" specified for asset source \"{source_id}\".")]
	UnknownOption {
		/// Asset source the option was given to.
		source_id: String,
		/// Offending option name.
		option: String,
	},
	/// Option value has the wrong shape or is empty.
	#[error("Invalid value for option \"{option}\" specified for asset source \"{source_id}\".")]
	InvalidOption {
		/// Asset source the option was given to.
		source_id: String,
		/// Offending option name.
		option: &'static str,
	},
	/// `mediaTypes` names a media type without any known file extension.
	#[error("Unknown media type \"{media_type}\" specified for asset source \"{source_id}\".")]
	UnknownMediaType {
		/// Asset source the option was given to.
		source_id: String,
		/// Media type that failed to resolve.
		media_type: String,
	},
	/// Required option was not supplied.
	#[error("Missing required option \"{option}\" for asset source \"{source_id}\".")]
	MissingOption {
		/// Asset source the option was missing from.
		source_id: String,
		/// Missing option name.
		option: &'static str,
	},
}
impl ConfigError {
	/// Name of the option this error concerns, if any.
	pub fn option(&self) -> Option<&str> {
		match self {
			Self::InvalidIdentifier { .. } => None,
			Self::UnknownOption { option, .. } => Some(option.as_str()),
			Self::InvalidOption { option, .. } | Self::MissingOption { option, .. } => Some(*option),
			Self::UnknownMediaType { .. } => Some("mediaTypes"),
		}
	}
}
