//! Text utilities shared by the converters.
//!
//! - [`encoding`]: byte-to-string decoding with a fallback chain
//! - [`html`]: HTML/HWPML markup to plain text
//! - [`normalize`]: whitespace normalization applied to converter output

pub mod encoding;
pub mod html;
pub mod normalize;

pub use encoding::{DecodedText, TextDecoder, resolve_encoding};
pub use html::html_to_text;
pub use normalize::normalize_whitespace;
