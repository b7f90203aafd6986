use super::wrap::{Line, break_lines};
use super::{Flowable, ImageFlow, LaidOutPage, PageItem, TextBlock};
use crate::constants::*;
use crate::fonts::FontRegistry;
use crate::geometry::{Frame, PageGeometry, PageSide};
use crate::styles::Alignment;
use crate::types::*;

const UNDERLINE_OFFSET_PT: f32 = 1.5;
const UNDERLINE_THICKNESS_PT: f32 = 0.5;
pub(super) const OVERFLOW_EPSILON: f32 = 0.01;

/// Adds furniture (page numbers, running heads) to a finished page
pub trait PageDecorator {
    fn decorate(
        &self,
        index: usize,
        page: &mut LaidOutPage,
        geometry: &PageGeometry,
        fonts: &FontRegistry,
    ) -> Result<()>;
}

/// Centered page number in the bottom margin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageNumberStamp {
    /// Pages at the front of the book left unnumbered
    pub skip_first: usize,
}

impl PageDecorator for PageNumberStamp {
    fn decorate(
        &self,
        index: usize,
        page: &mut LaidOutPage,
        geometry: &PageGeometry,
        fonts: &FontRegistry,
    ) -> Result<()> {
        if index < self.skip_first {
            return Ok(());
        }
        let face = fonts.resolve(PAGE_NUMBER_FONT)?;
        let label = (index + 1).to_string();
        let width = face.measure(&label, PAGE_NUMBER_FONT_SIZE);

        let (left, right) = geometry.horizontal_margins_in(page.side);
        let left = in_to_pt(left);
        let usable = geometry.page_width_pt() - left - in_to_pt(right);
        page.items.push(PageItem::Text {
            x: left + (usable - width) / 2.0,
            y: in_to_pt(PAGE_NUMBER_OFFSET_IN),
            font: face.name.clone(),
            size: PAGE_NUMBER_FONT_SIZE,
            text: label,
        });
        Ok(())
    }
}

/// Stack flowables into pages.
///
/// Pages alternate recto/verso starting with a recto, so the frame shifts
/// with the gutter from one page to the next.
pub fn paginate(
    flowables: &[Flowable],
    geometry: &PageGeometry,
    fonts: &FontRegistry,
) -> Result<Vec<LaidOutPage>> {
    let mut paginator = Paginator::new(geometry, fonts);
    for (i, flowable) in flowables.iter().enumerate() {
        match flowable {
            Flowable::Text(block) => {
                let next_leading = if block.keep_with_next {
                    flowables[i + 1..]
                        .iter()
                        .find_map(|f| match f {
                            Flowable::Text(t) => Some(t.style.leading),
                            _ => None,
                        })
                        .unwrap_or(0.0)
                } else {
                    0.0
                };
                paginator.place_text(block, next_leading)?;
            }
            Flowable::Spacer(height) => paginator.place_spacer(*height),
            Flowable::FixedSpace(height) => paginator.place_fixed_space(*height),
            Flowable::PageBreak => {
                if !paginator.fresh {
                    paginator.new_page();
                }
            }
            Flowable::Table(table) => super::table::place_table(&mut paginator, table)?,
            Flowable::Image(image) => paginator.place_image(image),
        }
    }
    Ok(paginator.finish())
}

pub(super) struct Paginator<'a> {
    pub(super) fonts: &'a FontRegistry,
    geometry: &'a PageGeometry,
    pages: Vec<LaidOutPage>,
    pub(super) page: LaidOutPage,
    pub(super) frame: Frame,
    /// Top of the free space, moving down
    pub(super) cursor: f32,
    /// Nothing placed on the current page yet
    pub(super) fresh: bool,
}

impl<'a> Paginator<'a> {
    fn new(geometry: &'a PageGeometry, fonts: &'a FontRegistry) -> Self {
        let side = PageSide::for_index(0);
        let frame = geometry.frame(side);
        Self {
            fonts,
            geometry,
            pages: Vec::new(),
            page: LaidOutPage::new(side),
            frame,
            cursor: frame.top(),
            fresh: true,
        }
    }

    pub(super) fn new_page(&mut self) {
        let side = PageSide::for_index(self.pages.len() + 1);
        let done = std::mem::replace(&mut self.page, LaidOutPage::new(side));
        self.pages.push(done);
        self.frame = self.geometry.frame(side);
        self.cursor = self.frame.top();
        self.fresh = true;
    }

    /// Start a new page unless `height` still fits below the cursor
    pub(super) fn ensure_room(&mut self, height: f32) {
        if !self.fresh && self.cursor - height < self.frame.y - OVERFLOW_EPSILON {
            self.new_page();
        }
    }

    fn finish(mut self) -> Vec<LaidOutPage> {
        if !self.fresh || self.pages.is_empty() {
            self.pages.push(self.page);
        }
        self.pages
    }

    fn place_spacer(&mut self, height: f32) {
        if self.fresh {
            return;
        }
        if self.cursor - height < self.frame.y - OVERFLOW_EPSILON {
            self.new_page();
            return;
        }
        self.cursor -= height;
    }

    fn place_fixed_space(&mut self, height: f32) {
        self.ensure_room(height);
        self.cursor -= height;
        self.fresh = false;
    }

    fn place_text(&mut self, block: &TextBlock, next_leading: f32) -> Result<()> {
        let style = &block.style;
        let available = self.frame.width - block.left_indent;

        let cap_indent = match &block.drop_cap {
            Some(letter) => {
                let face = self.fonts.face(&style.font, true, style.italic)?;
                face.measure(letter, drop_cap_size(style.size)) + DROP_CAP_GAP_PT
            }
            None => 0.0,
        };
        let width_for = |n: usize| {
            if n < DROP_CAP_LINES {
                available - cap_indent
            } else {
                available
            }
        };

        let lines = break_lines(&block.spans, style, self.fonts, width_for)?;
        if lines.is_empty() && block.drop_cap.is_none() && block.marker.is_none() {
            return Ok(());
        }

        if !self.fresh {
            self.cursor -= style.space_before;
        }

        let line_count = lines.len().max(1);
        if block.keep_with_next {
            let needed = line_count as f32 * style.leading + style.space_after + 2.0 * next_leading;
            self.ensure_room(needed);
        }
        if block.drop_cap.is_some() {
            self.ensure_room(DROP_CAP_LINES as f32 * style.leading);
        }

        let start = self.cursor;
        let mut first_page = self.pages.len();
        let mut first_baseline = None;
        let empty = [Line::default()];
        let lines: &[Line] = if lines.is_empty() { &empty } else { &lines };
        for (i, line) in lines.iter().enumerate() {
            self.ensure_room(style.leading);
            let baseline = self.cursor - style.size;
            if i == 0 {
                first_page = self.pages.len();
                first_baseline = Some(baseline);
            }

            let indent = if i < DROP_CAP_LINES { cap_indent } else { 0.0 };
            let x = self.frame.x + block.left_indent + indent;
            let last = i + 1 == lines.len();
            self.emit_line(line, x, baseline, width_for(i), style.alignment, last, style.size);
            self.cursor -= style.leading;
            self.fresh = false;
        }

        if let Some(baseline) = first_baseline {
            if let Some(marker) = &block.marker {
                let face = self.fonts.face(&style.font, style.bold, style.italic)?;
                let item = PageItem::Text {
                    x: self.frame.x + block.left_indent - LIST_MARKER_WIDTH_PT,
                    y: baseline,
                    font: face.name.clone(),
                    size: style.size,
                    text: marker.clone(),
                };
                self.push_to_page(first_page, item);
            }
            if let Some(letter) = &block.drop_cap {
                let face = self.fonts.face(&style.font, true, style.italic)?;
                let item = PageItem::Text {
                    x: self.frame.x + block.left_indent,
                    y: baseline - (DROP_CAP_LINES - 1) as f32 * style.leading,
                    font: face.name.clone(),
                    size: drop_cap_size(style.size),
                    text: letter.clone(),
                };
                self.push_to_page(first_page, item);
                if self.pages.len() == first_page {
                    let cap_bottom = start - DROP_CAP_LINES as f32 * style.leading;
                    self.cursor = self.cursor.min(cap_bottom);
                }
            }
        }

        self.cursor -= style.space_after;
        Ok(())
    }

    fn push_to_page(&mut self, index: usize, item: PageItem) {
        match self.pages.get_mut(index) {
            Some(page) => page.items.push(item),
            None => self.page.items.push(item),
        }
    }

    /// Draw one broken line starting at `x`, aligned within `available`
    #[allow(clippy::too_many_arguments)]
    pub(super) fn emit_line(
        &mut self,
        line: &Line,
        x: f32,
        baseline: f32,
        available: f32,
        alignment: Alignment,
        last: bool,
        size: f32,
    ) {
        let slack = (available - line.width).max(0.0);
        let gaps = line.words.len().saturating_sub(1);
        let (offset, extra) = match alignment {
            Alignment::Left => (0.0, 0.0),
            Alignment::Center => (slack / 2.0, 0.0),
            Alignment::Right => (slack, 0.0),
            Alignment::Justify if !last && gaps > 0 => (0.0, slack / gaps as f32),
            Alignment::Justify => (0.0, 0.0),
        };

        let mut pen = x + offset;
        for (i, word) in line.words.iter().enumerate() {
            if i > 0 {
                pen += line.space + extra;
            }
            for piece in &word.pieces {
                self.page.items.push(PageItem::Text {
                    x: pen,
                    y: baseline,
                    font: piece.font.clone(),
                    size,
                    text: piece.text.clone(),
                });
                if piece.underline {
                    self.page.items.push(PageItem::Rect {
                        x: pen,
                        y: baseline - UNDERLINE_OFFSET_PT,
                        width: piece.width,
                        height: UNDERLINE_THICKNESS_PT,
                        grey: 0.0,
                    });
                }
                pen += piece.width;
            }
        }
    }

    /// Scale an image into its bounding box and the frame, then center it
    fn place_image(&mut self, image: &ImageFlow) {
        let width_px = image.width_px.max(1) as f32;
        let height_px = image.height_px.max(1) as f32;
        let scale = 1.0f32
            .min(image.max_width.min(self.frame.width) / width_px)
            .min(image.max_height.min(self.frame.height) / height_px);
        let width = width_px * scale;
        let height = height_px * scale;

        self.ensure_room(height);
        let y = self.cursor - height;
        self.page.items.push(PageItem::Image {
            image: image.image,
            x: self.frame.x + (self.frame.width - width) / 2.0,
            y,
            width,
            height,
        });
        self.cursor = y;
        self.fresh = false;
    }
}

fn drop_cap_size(body_size: f32) -> f32 {
    body_size * DROP_CAP_LINES as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::styles::StyleDescriptor;
    use crate::trim::TrimSize;
    use pdf_manuscript::StyledSpan;

    fn body() -> StyleDescriptor {
        StyleDescriptor {
            font: "Helvetica".to_string(),
            size: 12.0,
            leading: 14.0,
            alignment: Alignment::Justify,
            space_before: 6.0,
            space_after: 6.0,
            bold: false,
            italic: false,
        }
    }

    fn geometry() -> PageGeometry {
        PageGeometry::resolve(TrimSize::default(), false, 10, None)
    }

    #[test]
    fn test_spacer_dropped_at_page_top() {
        let fonts = FontRegistry::builtin();
        let flow = vec![
            Flowable::Spacer(100.0),
            Flowable::Text(TextBlock::plain("Hello", body())),
        ];
        let pages = paginate(&flow, &geometry(), &fonts).unwrap();
        assert_eq!(pages.len(), 1);
        let frame = geometry().frame(PageSide::Recto);
        match &pages[0].items[0] {
            PageItem::Text { y, .. } => assert!((*y - (frame.top() - 12.0)).abs() < 0.01),
            other => panic!("Expected text, got {:?}", other),
        }
    }

    #[test]
    fn test_page_break_skips_empty_page() {
        let fonts = FontRegistry::builtin();
        let flow = vec![
            Flowable::PageBreak,
            Flowable::Text(TextBlock::plain("One", body())),
            Flowable::PageBreak,
            Flowable::PageBreak,
            Flowable::Text(TextBlock::plain("Two", body())),
        ];
        let pages = paginate(&flow, &geometry(), &fonts).unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[1].side, PageSide::Verso);
        assert_eq!(pages[1].texts().collect::<Vec<_>>(), vec!["Two"]);
    }

    #[test]
    fn test_long_text_flows_onto_following_pages() {
        let fonts = FontRegistry::builtin();
        let paragraph = "word ".repeat(2000);
        let flow = vec![Flowable::Text(TextBlock::new(
            vec![StyledSpan {
                text: paragraph,
                ..Default::default()
            }],
            body(),
        ))];
        let geometry = geometry();
        let pages = paginate(&flow, &geometry, &fonts).unwrap();
        assert!(pages.len() > 1);

        for page in &pages {
            let frame = geometry.frame(page.side);
            for item in &page.items {
                if let PageItem::Text { x, y, .. } = item {
                    assert!(*x >= frame.x - 0.01);
                    assert!(*y >= frame.y - 0.01);
                }
            }
        }
    }

    #[test]
    fn test_justified_lines_stay_inside_frame() {
        let fonts = FontRegistry::builtin();
        let paragraph = "WWW illicit Mummy wavelength MMMM filigree Wow little ".repeat(40);
        let flow = vec![Flowable::Text(TextBlock::plain(&paragraph, body()))];
        let geometry = geometry();
        let pages = paginate(&flow, &geometry, &fonts).unwrap();

        let mut checked = 0;
        for page in &pages {
            let frame = geometry.frame(page.side);
            for item in &page.items {
                if let PageItem::Text {
                    x,
                    font,
                    size,
                    text,
                    ..
                } = item
                {
                    let right = x + fonts.resolve(font).unwrap().measure(text, *size);
                    assert!(
                        right <= frame.right() + 0.5,
                        "'{}' ends at {} past {}",
                        text,
                        right,
                        frame.right()
                    );
                    checked += 1;
                }
            }
        }
        assert!(checked > 300);
    }

    #[test]
    fn test_page_numbers_skip_front_pages() {
        let fonts = FontRegistry::builtin();
        let geometry = geometry();
        let stamp = PageNumberStamp { skip_first: 1 };

        let mut first = LaidOutPage::new(PageSide::Recto);
        stamp.decorate(0, &mut first, &geometry, &fonts).unwrap();
        assert!(first.items.is_empty());

        let mut second = LaidOutPage::new(PageSide::Verso);
        stamp.decorate(1, &mut second, &geometry, &fonts).unwrap();
        match &second.items[0] {
            PageItem::Text { text, y, font, .. } => {
                assert_eq!(text, "2");
                assert_eq!(font, "Helvetica");
                assert!((*y - 36.0).abs() < 0.01);
            }
            other => panic!("Expected page number, got {:?}", other),
        }
    }
}
