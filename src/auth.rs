//! Principal identifiers, redacted secrets, stored client secrets, and principal suppliers.

pub mod client_secret;
pub mod id;
pub mod principal;
pub mod secret;

pub use client_secret::*;
pub use id::*;
pub use principal::*;
pub use secret::*;
