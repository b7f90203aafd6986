//! Minimal flow layout: flowables are broken into lines and stacked into
//! page frames, producing positioned items for the PDF writer.

mod flow;
mod story;
mod table;
mod wrap;

pub use flow::{PageDecorator, PageNumberStamp, paginate};
pub use story::{Story, build_story};
pub use wrap::{Line, break_lines};

use crate::geometry::PageSide;
use crate::styles::StyleDescriptor;
use pdf_manuscript::StyledSpan;

/// Paragraph-like block: body text, headings, list items, front matter
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub spans: Vec<StyledSpan>,
    pub style: StyleDescriptor,
    /// Indent of every line from the frame's left edge (points)
    pub left_indent: f32,
    /// List marker drawn in the hanging indent
    pub marker: Option<String>,
    /// Enlarged initial spanning the first lines
    pub drop_cap: Option<String>,
    /// Move to a new page rather than leave this block last on a page
    pub keep_with_next: bool,
}

impl TextBlock {
    pub fn new(spans: Vec<StyledSpan>, style: StyleDescriptor) -> Self {
        Self {
            spans,
            style,
            left_indent: 0.0,
            marker: None,
            drop_cap: None,
            keep_with_next: false,
        }
    }

    pub fn plain(text: &str, style: StyleDescriptor) -> Self {
        Self::new(
            vec![StyledSpan {
                text: text.to_string(),
                ..Default::default()
            }],
            style,
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableFlow {
    pub rows: Vec<Vec<String>>,
    pub cell: StyleDescriptor,
    pub header: StyleDescriptor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageFlow {
    /// Index into the document's image list
    pub image: usize,
    pub width_px: u32,
    pub height_px: u32,
    pub max_width: f32,
    pub max_height: f32,
}

/// Unit of content handed to the paginator
#[derive(Debug, Clone, PartialEq)]
pub enum Flowable {
    Text(TextBlock),
    /// Vertical space dropped at the top of a page
    Spacer(f32),
    /// Vertical space kept even at the top of a page
    FixedSpace(f32),
    PageBreak,
    Table(TableFlow),
    Image(ImageFlow),
}

/// Something placed on a page, in PDF points with origin bottom-left
#[derive(Debug, Clone, PartialEq)]
pub enum PageItem {
    Text {
        x: f32,
        /// Baseline
        y: f32,
        /// Registered font name
        font: String,
        size: f32,
        text: String,
    },
    /// Filled rectangle; grey level 0.0 is black
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        grey: f32,
    },
    Image {
        image: usize,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct LaidOutPage {
    pub side: PageSide,
    pub items: Vec<PageItem>,
}

impl LaidOutPage {
    pub fn new(side: PageSide) -> Self {
        Self {
            side,
            items: Vec::new(),
        }
    }

    /// Text items in drawing order, for inspection
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.items.iter().filter_map(|item| match item {
            PageItem::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}
