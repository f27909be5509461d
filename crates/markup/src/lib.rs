mod document;
mod text;

pub use document::{select_in, Document};
pub use text::{decode_text, inner_text, strip_tags};
