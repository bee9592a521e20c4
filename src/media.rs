//! Media type registry used to validate `mediaTypes` filters.

// crates.io
use mime::Mime;
// self
use crate::_prelude::*;

/// Maps media types to the filename extensions they are stored under.
pub trait MediaTypeRegistry
where
	Self: Send + Sync,
{
	/// Returns every known extension for `media_type`; an empty set means the type is unknown.
	fn extensions_for(&self, media_type: &str) -> BTreeSet<String>;

	/// Returns `true` when `media_type` maps to at least one extension.
	fn is_known(&self, media_type: &str) -> bool {
		!self.extensions_for(media_type).is_empty()
	}
}

/// Registry backed by the `mime_guess` extension database.
///
/// The input is parsed as a [`Mime`], so case, surrounding whitespace, and parameters are
/// ignored: `"Image/JPEG; q=0.9"` resolves like `"image/jpeg"`.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultMediaTypes;
impl MediaTypeRegistry for DefaultMediaTypes {
	fn extensions_for(&self, media_type: &str) -> BTreeSet<String> {
		let Ok(mime) = media_type.trim().parse::<Mime>() else {
			return BTreeSet::new();
		};

		mime_guess::get_mime_extensions_str(mime.essence_str())
			.map(|extensions| extensions.iter().map(|ext| (*ext).to_owned()).collect())
			.unwrap_or_default()
	}
}
