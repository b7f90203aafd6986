use super::flow::{OVERFLOW_EPSILON, Paginator};
use super::wrap::break_lines;
use super::{PageItem, TableFlow};
use crate::constants::*;
use crate::types::*;
use pdf_manuscript::StyledSpan;

/// Lay a table out row by row with equal column widths.
///
/// The first row is the header: bold, grey background and extra padding
/// underneath. A row that does not fit below the cursor moves to the next
/// page whole; a row taller than a full page is split between lines.
pub(super) fn place_table(paginator: &mut Paginator<'_>, table: &TableFlow) -> Result<()> {
    let columns = table.rows.iter().map(Vec::len).max().unwrap_or(0);
    if columns == 0 {
        return Ok(());
    }
    let column_width = paginator.frame.width / columns as f32;
    let text_width = (column_width - 2.0 * TABLE_CELL_PADDING_PT).max(1.0);

    for (row_index, row) in table.rows.iter().enumerate() {
        let header = row_index == 0;
        let style = if header { &table.header } else { &table.cell };
        let bottom_padding = if header {
            TABLE_HEADER_BOTTOM_PADDING_PT
        } else {
            TABLE_CELL_PADDING_PT
        };

        let mut cells = Vec::with_capacity(columns);
        for col in 0..columns {
            let text = row.get(col).cloned().unwrap_or_default();
            let spans = [StyledSpan {
                text,
                ..Default::default()
            }];
            cells.push(break_lines(&spans, style, paginator.fonts, |_| text_width)?);
        }
        let line_count = cells.iter().map(Vec::len).max().unwrap_or(0).max(1);
        let chrome = TABLE_CELL_PADDING_PT + bottom_padding;
        let page_lines = lines_that_fit(paginator.frame.height, chrome, style.leading).max(1);
        if line_count > page_lines {
            log::warn!(
                "Table row {} needs {} lines but a page holds {}, splitting it",
                row_index + 1,
                line_count,
                page_lines
            );
        }

        let mut from = 0;
        while from < line_count {
            let remaining = line_count - from;
            let take = if remaining <= page_lines {
                paginator.ensure_room(remaining as f32 * style.leading + chrome);
                remaining
            } else {
                let available = paginator.cursor - paginator.frame.y;
                if lines_that_fit(available, chrome, style.leading) == 0 {
                    paginator.ensure_room(page_lines as f32 * style.leading + chrome);
                }
                let available = paginator.cursor - paginator.frame.y;
                lines_that_fit(available, chrome, style.leading).clamp(1, remaining)
            };

            let row_height = take as f32 * style.leading + chrome;
            let top = paginator.cursor;
            let left = paginator.frame.x;
            let width = column_width * columns as f32;

            if header {
                paginator.page.items.push(PageItem::Rect {
                    x: left,
                    y: top - row_height,
                    width,
                    height: row_height,
                    grey: TABLE_HEADER_GREY,
                });
            }

            for (col, lines) in cells.iter().enumerate() {
                let x = left + col as f32 * column_width + TABLE_CELL_PADDING_PT;
                let mut baseline = top - TABLE_CELL_PADDING_PT - style.size;
                for (i, line) in lines.iter().enumerate().skip(from).take(take) {
                    paginator.emit_line(
                        line,
                        x,
                        baseline,
                        text_width,
                        style.alignment,
                        i + 1 == lines.len(),
                        style.size,
                    );
                    baseline -= style.leading;
                }
            }

            grid(paginator, left, top, width, row_height, column_width, columns);
            paginator.cursor = top - row_height;
            paginator.fresh = false;
            from += take;
        }
    }
    Ok(())
}

/// Whole lines of `leading` that fit in `height` after the cell padding
fn lines_that_fit(height: f32, chrome: f32, leading: f32) -> usize {
    ((height - chrome + OVERFLOW_EPSILON) / leading).floor().max(0.0) as usize
}

/// Cell borders for one row as thin filled rectangles
fn grid(
    paginator: &mut Paginator<'_>,
    left: f32,
    top: f32,
    width: f32,
    height: f32,
    column_width: f32,
    columns: usize,
) {
    let half = TABLE_GRID_WIDTH_PT / 2.0;
    let items = &mut paginator.page.items;
    for y in [top, top - height] {
        items.push(PageItem::Rect {
            x: left - half,
            y: y - half,
            width: width + TABLE_GRID_WIDTH_PT,
            height: TABLE_GRID_WIDTH_PT,
            grey: 0.0,
        });
    }
    for col in 0..=columns {
        items.push(PageItem::Rect {
            x: left + col as f32 * column_width - half,
            y: top - height,
            width: TABLE_GRID_WIDTH_PT,
            height,
            grey: 0.0,
        });
    }
}
