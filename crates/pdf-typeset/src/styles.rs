use crate::constants::*;
use crate::options::TypesetOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

/// Resolved paragraph style
#[derive(Debug, Clone, PartialEq)]
pub struct StyleDescriptor {
    pub font: String,
    pub size: f32,
    pub leading: f32,
    pub alignment: Alignment,
    pub space_before: f32,
    pub space_after: f32,
    /// Whole paragraph set in the bold face
    pub bold: bool,
    /// Whole paragraph set in the italic face
    pub italic: bool,
}

impl StyleDescriptor {
    /// Leading of `size + 2`, spacing of half the size on both sides
    fn standard(font: &str, size: f32, alignment: Alignment) -> Self {
        Self {
            font: font.to_string(),
            size,
            leading: size + 2.0,
            alignment,
            space_before: (size / 2.0).floor(),
            space_after: (size / 2.0).floor(),
            bold: false,
            italic: false,
        }
    }

    fn fixed(font: &str, size: f32, leading: f32, before: f32, after: f32) -> Self {
        Self {
            font: font.to_string(),
            size,
            leading,
            alignment: Alignment::Center,
            space_before: before,
            space_after: after,
            bold: false,
            italic: false,
        }
    }
}

/// Heading size relative to the requested heading size, by level
const HEADING_SCALE: [f32; 6] = [1.0, 0.85, 0.72, 0.64, 0.58, 0.52];

/// Every style the renderer needs, derived from the requested fonts and sizes
#[derive(Debug, Clone, PartialEq)]
pub struct StyleSheet {
    headings: Vec<StyleDescriptor>,
    pub body: StyleDescriptor,
    pub bullet: StyleDescriptor,
    pub table_cell: StyleDescriptor,
    pub table_header: StyleDescriptor,
    pub title: StyleDescriptor,
    pub subtitle: StyleDescriptor,
    pub author: StyleDescriptor,
    pub dedication: StyleDescriptor,
    pub copyright: StyleDescriptor,
    pub toc_heading: StyleDescriptor,
    pub toc_entry: StyleDescriptor,
}

impl StyleSheet {
    pub fn new(options: &TypesetOptions) -> Self {
        let heading_font = options.heading_font.as_str();
        let body_font = options.body_font.as_str();

        let headings = HEADING_SCALE
            .iter()
            .enumerate()
            .map(|(i, scale)| {
                let level = i + 1;
                let size = (options.heading_size * scale).max(options.body_size);
                let mut style = StyleDescriptor::standard(heading_font, size, Alignment::Center);
                if level > 1 {
                    style.alignment = Alignment::Left;
                }
                style.space_after = (18.0 - (level as f32 - 1.0) * 4.0).max(8.0);
                style
            })
            .collect();

        let body = StyleDescriptor::standard(body_font, options.body_size, Alignment::Justify);

        let bullet = StyleDescriptor {
            alignment: Alignment::Left,
            space_before: 0.0,
            space_after: (options.body_size / 4.0).floor(),
            ..body.clone()
        };

        let table_cell = StyleDescriptor {
            alignment: Alignment::Center,
            space_before: 0.0,
            space_after: 0.0,
            ..body.clone()
        };
        let table_header = StyleDescriptor {
            bold: true,
            ..table_cell.clone()
        };

        let mut dedication = StyleDescriptor::fixed(body_font, 18.0, 26.0, 180.0, 120.0);
        dedication.italic = true;

        let toc_heading = StyleDescriptor {
            space_after: TOC_HEADING_SPACING_PT,
            ..StyleDescriptor::standard(heading_font, options.heading_size, Alignment::Center)
        };
        let toc_entry = StyleDescriptor {
            alignment: Alignment::Left,
            space_before: 0.0,
            space_after: TOC_ENTRY_SPACING_PT,
            ..body.clone()
        };

        Self {
            headings,
            body,
            bullet,
            table_cell,
            table_header,
            title: StyleDescriptor::fixed(heading_font, 44.0, 52.0, 180.0, 40.0),
            subtitle: StyleDescriptor::fixed(heading_font, 24.0, 28.0, 5.0, 20.0),
            author: StyleDescriptor::fixed(heading_font, 22.0, 28.0, 30.0, 40.0),
            dedication,
            copyright: StyleDescriptor::fixed(body_font, 12.0, 18.0, 220.0, 100.0),
            toc_heading,
            toc_entry,
        }
    }

    /// Style for a heading level; levels past the table reuse the last entry
    pub fn heading(&self, level: usize) -> &StyleDescriptor {
        let index = level.clamp(1, self.headings.len()) - 1;
        &self.headings[index]
    }

    /// Every font family the sheet refers to
    pub fn font_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = vec![self.body.font.as_str(), self.title.font.as_str()];
        names.extend(self.headings.iter().map(|h| h.font.as_str()));
        names.sort_unstable();
        names.dedup();
        names
    }
}
