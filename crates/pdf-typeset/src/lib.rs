pub mod constants;
pub mod fonts;
mod front_matter;
pub mod geometry;
pub mod layout;
mod options;
mod render;
mod stats;
pub mod styles;
pub mod trim;
mod types;

pub use fonts::{FontRegistry, FontSource, RegisteredFont, font_name_from_file};
pub use front_matter::{FrontMatter, toc_flowables};
pub use geometry::{Frame, PageGeometry, PageSide, estimate_page_count, gutter_for_pages};
pub use options::*;
pub use render::{BookLayout, RenderedBook, layout_book, render_book, typeset};
pub use stats::TypesetStatistics;
pub use styles::{Alignment, StyleDescriptor, StyleSheet};
pub use trim::{DEFAULT_TRIM, TRIM_SIZES, TrimSize, normalize_trim_input, parse_trim, resolve_trim_size};
pub use types::*;
