//! Shared constants for book typesetting
//!
//! Page geometry values are in inches (the unit print-on-demand services
//! publish their rules in); layout values are in points.

// =============================================================================
// Unit Conversion
// =============================================================================

/// Points per inch
pub const POINTS_PER_INCH: f32 = 72.0;

/// Millimeters per inch
pub const MM_PER_INCH: f32 = 25.4;

/// Centimeters per inch
pub const CM_PER_INCH: f32 = 2.54;

/// Convert inches to points
#[inline]
pub fn in_to_pt(inches: f32) -> f32 {
    inches * POINTS_PER_INCH
}

/// Convert inches to millimeters
#[inline]
pub fn in_to_mm(inches: f32) -> f32 {
    inches * MM_PER_INCH
}

// =============================================================================
// Page Geometry
// =============================================================================

/// Extra margin added to top, bottom and outer edges of bleed books (inches)
pub const BLEED_IN: f32 = 0.125;

/// Default top and bottom margin (inches)
pub const BASE_VERTICAL_MARGIN_IN: f32 = 0.75;

/// Default outer margin (inches)
pub const BASE_OUTER_MARGIN_IN: f32 = 0.75;

/// Outer margin for trims narrower than [`SMALL_TRIM_WIDTH_IN`] (inches)
pub const SMALL_TRIM_OUTER_MARGIN_IN: f32 = 0.625;

/// Trims narrower than this use the small outer margin (inches)
pub const SMALL_TRIM_WIDTH_IN: f32 = 6.0;

/// Tolerance when matching a parsed trim against the table (inches)
pub const TRIM_TOLERANCE_IN: f32 = 0.02;

// =============================================================================
// Page Numbers
// =============================================================================

/// Builtin face used for page numbers
pub const PAGE_NUMBER_FONT: &str = "Helvetica";

/// Font size for page numbers (points)
pub const PAGE_NUMBER_FONT_SIZE: f32 = 10.0;

/// Distance of the page number baseline from the bottom edge (inches)
pub const PAGE_NUMBER_OFFSET_IN: f32 = 0.5;

// =============================================================================
// Block Spacing
// =============================================================================

/// Indent added per nesting level of lists and TOC entries (points)
pub const LEVEL_INDENT_PT: f32 = 12.0;

/// Width reserved for a list marker (points)
pub const LIST_MARKER_WIDTH_PT: f32 = 18.0;

/// Space after the "Table of Contents" heading (points)
pub const TOC_HEADING_SPACING_PT: f32 = 18.0;

/// Space after each TOC entry (points)
pub const TOC_ENTRY_SPACING_PT: f32 = 6.0;

/// Space above and below tables and images (points)
pub const FIGURE_SPACING_PT: f32 = 12.0;

/// Height of a blank-line spacer relative to body leading
pub const SPACER_LEADING_RATIO: f32 = 1.0;

// =============================================================================
// Tables
// =============================================================================

/// Grid line width (points)
pub const TABLE_GRID_WIDTH_PT: f32 = 1.0;

/// Cell padding on each side (points)
pub const TABLE_CELL_PADDING_PT: f32 = 4.0;

/// Extra padding under header cells (points)
pub const TABLE_HEADER_BOTTOM_PADDING_PT: f32 = 12.0;

/// Grey level of the header row background (#CCCCCC)
pub const TABLE_HEADER_GREY: f32 = 0.8;

// =============================================================================
// Drop Caps
// =============================================================================

/// Number of body lines a drop cap spans
pub const DROP_CAP_LINES: usize = 3;

/// Gap between the drop cap and the indented text (points)
pub const DROP_CAP_GAP_PT: f32 = 4.0;

// =============================================================================
// Text Metrics
// =============================================================================

/// Space advance of Helvetica faces (em)
pub const HELVETICA_SPACE_EM: f32 = 0.278;

/// Space advance of Times faces (em)
pub const TIMES_SPACE_EM: f32 = 0.25;

/// Space advance of Courier faces (em)
pub const COURIER_SPACE_EM: f32 = 0.6;

// =============================================================================
// Front Matter
// =============================================================================

/// Title page text when no title is supplied or detected
pub const UNTITLED_PLACEHOLDER: &str = "Untitled Manuscript";

/// Heading of the table of contents page
pub const TOC_TITLE: &str = "Table of Contents";
