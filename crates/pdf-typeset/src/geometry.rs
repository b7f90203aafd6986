use crate::constants::*;
use crate::trim::TrimSize;

/// Gutter width for a page count (inches).
///
/// | pages     | gutter |
/// |-----------|--------|
/// | ≤ 150     | 0.375  |
/// | 151–300   | 0.5    |
/// | 301–500   | 0.625  |
/// | 501–700   | 0.75   |
/// | > 700     | 0.875  |
pub fn gutter_for_pages(pages: usize) -> f32 {
    match pages {
        0..=150 => 0.375,
        151..=300 => 0.5,
        301..=500 => 0.625,
        501..=700 => 0.75,
        _ => 0.875,
    }
}

/// Rough page count used to pick a gutter bucket before layout has run
pub fn estimate_page_count(word_count: usize, trim: &TrimSize) -> usize {
    word_count / trim.words_per_page.max(1) + 1
}

/// Which side of the spread a page falls on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSide {
    /// Right-hand page, odd page numbers; spine on the left
    Recto,
    /// Left-hand page, even page numbers; spine on the right
    Verso,
}

impl PageSide {
    /// Side for a zero-based page index; the first page is a recto
    pub fn for_index(index: usize) -> Self {
        if index % 2 == 0 {
            PageSide::Recto
        } else {
            PageSide::Verso
        }
    }
}

/// Content area of a page in PDF points, origin bottom-left
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Frame {
    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

/// Resolved page size and margins (inches)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageGeometry {
    pub trim: TrimSize,
    pub top_in: f32,
    pub bottom_in: f32,
    pub outer_in: f32,
    /// Spine-side margin, always `outer_in + gutter_in`
    pub inner_in: f32,
    pub gutter_in: f32,
    pub bleed: bool,
}

impl PageGeometry {
    /// Resolve margins for a trim and estimated page count.
    ///
    /// Bleed widens top, bottom and outer margins by [`BLEED_IN`]; the gutter
    /// only depends on the page count or the explicit override.
    pub fn resolve(
        trim: TrimSize,
        bleed: bool,
        estimated_pages: usize,
        gutter_override: Option<f32>,
    ) -> Self {
        let base_outer = if trim.width_in < SMALL_TRIM_WIDTH_IN {
            SMALL_TRIM_OUTER_MARGIN_IN
        } else {
            BASE_OUTER_MARGIN_IN
        };
        let bleed_extra = if bleed { BLEED_IN } else { 0.0 };

        let gutter_in = gutter_override.unwrap_or_else(|| gutter_for_pages(estimated_pages));
        let outer_in = base_outer + bleed_extra;

        Self {
            trim,
            top_in: BASE_VERTICAL_MARGIN_IN + bleed_extra,
            bottom_in: BASE_VERTICAL_MARGIN_IN + bleed_extra,
            outer_in,
            inner_in: outer_in + gutter_in,
            gutter_in,
            bleed,
        }
    }

    /// `(left, right)` margins in inches for a page side
    pub fn horizontal_margins_in(&self, side: PageSide) -> (f32, f32) {
        match side {
            PageSide::Recto => (self.inner_in, self.outer_in),
            PageSide::Verso => (self.outer_in, self.inner_in),
        }
    }

    pub fn frame(&self, side: PageSide) -> Frame {
        let (left, right) = self.horizontal_margins_in(side);
        Frame {
            x: in_to_pt(left),
            y: in_to_pt(self.bottom_in),
            width: in_to_pt(self.trim.width_in - left - right),
            height: in_to_pt(self.trim.height_in - self.top_in - self.bottom_in),
        }
    }

    /// Text width is the same on both sides of the spread
    pub fn frame_width_pt(&self) -> f32 {
        self.frame(PageSide::Recto).width
    }

    pub fn page_width_pt(&self) -> f32 {
        self.trim.width_pt()
    }

    pub fn page_height_pt(&self) -> f32 {
        self.trim.height_pt()
    }
}
