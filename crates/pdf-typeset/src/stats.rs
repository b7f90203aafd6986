use crate::geometry::PageGeometry;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Figures reported after typesetting a book
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TypesetStatistics {
    pub word_count: usize,
    /// Page count assumed when the gutter was chosen
    pub estimated_pages: usize,
    /// Pages actually produced, front matter included
    pub page_count: usize,
    /// Pages left without a page number
    pub unnumbered_pages: usize,
    pub trim: String,
    pub gutter_in: f32,
    pub bleed: bool,
    /// Requested families drawn with an aliased face: (requested, drawn)
    pub substituted_fonts: Vec<(String, String)>,
}

impl TypesetStatistics {
    pub fn new(
        word_count: usize,
        estimated_pages: usize,
        page_count: usize,
        unnumbered_pages: usize,
        geometry: &PageGeometry,
    ) -> Self {
        Self {
            word_count,
            estimated_pages,
            page_count,
            unnumbered_pages: unnumbered_pages.min(page_count),
            trim: geometry.trim.label(),
            gutter_in: geometry.gutter_in,
            bleed: geometry.bleed,
            substituted_fonts: Vec::new(),
        }
    }
}
