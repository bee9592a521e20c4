//! Credential resolution and lazily authenticated clients for pixx.io asset sources: validate a
//! tenant's options once, pick the right refresh token for whoever is acting, and authenticate
//! at most once per asset source.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod client;
pub mod error;
pub mod media;
pub mod obs;
pub mod resolve;
pub mod source;
pub mod store;

mod _prelude {
	pub use std::{
		collections::{BTreeMap, BTreeSet, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::{Map as JsonMap, Value as JsonValue};
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use url;
#[cfg(test)] use color_eyre as _;
