//! Strongly typed identifiers for asset sources and principals.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

macro_rules! def_id {
	($name:ident, $doc:literal, $kind:literal, $validate:path) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Creates a new identifier after validation.
			pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
				let view = value.as_ref();

				$validate($kind, view)?;

				Ok(Self(view.to_owned()))
			}
		}
		impl Deref for $name {
			type Target = str;

			fn deref(&self) -> &Self::Target {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl TryFrom<String> for $name {
			type Error = IdentifierError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				$validate($kind, &value)?;

				Ok(Self(value))
			}
		}
		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, concat!($kind, "({})"), self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
		impl FromStr for $name {
			type Err = IdentifierError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
	};
}

/// Principal identifier reserved for "nobody is signed in".
pub const SHARED_PRINCIPAL: &str = "shared";

const PRINCIPAL_MAX_LEN: usize = 255;
const SOURCE_MIN_LEN: usize = 2;
const SOURCE_MAX_LEN: usize = 64;

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("{kind} identifier cannot be empty.")]
	Empty {
		/// Kind of identifier (source, principal).
		kind: &'static str,
	},
	/// The identifier contains whitespace characters.
	#[error("{kind} identifier contains whitespace.")]
	ContainsWhitespace {
		/// Kind of identifier (source, principal).
		kind: &'static str,
	},
	/// The identifier exceeded the allowed character count.
	#[error("{kind} identifier exceeds {max} characters.")]
	TooLong {
		/// Kind of identifier (source, principal).
		kind: &'static str,
		/// Maximum permitted character count.
		max: usize,
	},
	/// The identifier does not follow the required pattern.
	#[error("{kind} identifier must match /^[a-z][a-z0-9-]{{0,62}}[a-z]$/.")]
	Malformed {
		/// Kind of identifier (source, principal).
		kind: &'static str,
	},
}

def_id! { SourceId, "Identifier of a configured asset source, unique per tenant.", "Source", validate_source }
def_id! { PrincipalId, "Identifier of the principal a client secret belongs to.", "Principal", validate_principal }
impl PrincipalId {
	/// Returns the reserved `shared` principal used when nobody is signed in.
	pub fn shared() -> Self {
		Self(SHARED_PRINCIPAL.to_owned())
	}

	/// Returns `true` for the reserved `shared` principal.
	pub fn is_shared(&self) -> bool {
		self.0 == SHARED_PRINCIPAL
	}
}

fn validate_principal(kind: &'static str, view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty { kind });
	}
	if view.chars().any(char::is_whitespace) {
		return Err(IdentifierError::ContainsWhitespace { kind });
	}
	if view.len() > PRINCIPAL_MAX_LEN {
		return Err(IdentifierError::TooLong { kind, max: PRINCIPAL_MAX_LEN });
	}

	Ok(())
}

// ^[a-z][a-z0-9-]{0,62}[a-z]$
fn validate_source(kind: &'static str, view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty { kind });
	}
	if view.len() > SOURCE_MAX_LEN {
		return Err(IdentifierError::TooLong { kind, max: SOURCE_MAX_LEN });
	}

	let bytes = view.as_bytes();
	let is_edge = |b: &u8| b.is_ascii_lowercase();
	let is_inner = |b: &u8| b.is_ascii_lowercase() || b.is_ascii_digit() || *b == b'-';
	let well_formed = bytes.len() >= SOURCE_MIN_LEN
		&& bytes.first().is_some_and(is_edge)
		&& bytes.last().is_some_and(is_edge)
		&& bytes.iter().all(is_inner);

	if !well_formed {
		return Err(IdentifierError::Malformed { kind });
	}

	Ok(())
}
