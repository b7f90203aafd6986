pub mod classify;
pub mod docx;
pub mod lists;
pub mod markup;
mod manuscript;
pub mod text;
mod types;

pub use classify::{ClassifyOptions, StyleTag, classify};
pub use docx::read_docx;
pub use lists::group_lists;
pub use manuscript::{ExtractOptions, Manuscript, detect_title, exclude_first_match};
pub use markup::{StyledSpan, parse_markup, strip_markup};
pub use text::read_text;
pub use types::*;
