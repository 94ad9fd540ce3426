//! URL handling for discovered course links
//!
//! Listing pages mix root-relative hrefs (`/postgraduate/taught/ma-x`) with
//! absolute ones. This module turns both into absolute URLs against the
//! configured base URL without otherwise rewriting them, so the exact string
//! can serve as the deduplication key.

mod normalize;

pub use normalize::{is_absolute, normalize_href, strip_trailing_slashes};
