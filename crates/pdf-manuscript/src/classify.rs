//! Block classification.
//!
//! Every source style name goes through [`StyleTag::from_style_name`] once;
//! the rest of the crate matches on the tag instead of re-inspecting strings.

use crate::markup::compose_markup;
use crate::types::*;
use regex::Regex;
use std::io::Cursor;
use std::sync::LazyLock;

/// Largest width an embedded image may occupy, in points
pub const IMAGE_MAX_WIDTH_PT: f32 = 400.0;
/// Largest height an embedded image may occupy, in points
pub const IMAGE_MAX_HEIGHT_PT: f32 = 600.0;

static ORDERED_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+[.)]\s*").expect("ordered marker pattern"));
static LEVEL_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("level token pattern"));

const BULLET_GLYPHS: [char; 3] = ['•', '-', '*'];

/// Closed set of paragraph roles derived from a style name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleTag {
    Title,
    Heading(usize),
    List { level: Option<usize>, numbered: bool },
    DropCap,
    Body,
}

impl StyleTag {
    pub fn from_style_name(name: &str) -> Self {
        let lower = name.trim().to_lowercase();
        if lower.contains("heading") {
            return StyleTag::Heading(level_token(&lower).unwrap_or(1));
        }
        if lower.contains("list") || lower.contains("bullet") || lower.contains("number") {
            return StyleTag::List {
                level: level_token(&lower),
                numbered: lower.contains("number"),
            };
        }
        if lower.contains("drop cap") {
            return StyleTag::DropCap;
        }
        if lower.starts_with("title") {
            return StyleTag::Title;
        }
        StyleTag::Body
    }
}

/// Last integer token of a style name, e.g. 2 for "List Bullet 2"
fn level_token(lower: &str) -> Option<usize> {
    LEVEL_TOKEN
        .find_iter(lower)
        .last()
        .and_then(|m| m.as_str().parse::<usize>().ok())
        .map(|level| level.max(1))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassifyOptions {
    pub drop_caps: bool,
}

/// Classify one structural node. Returns `None` for nodes that carry nothing
/// renderable, such as an image in an unsupported format.
pub fn classify(node: &SourceNode, options: &ClassifyOptions) -> Option<ContentBlock> {
    match node {
        SourceNode::Table { rows } => Some(ContentBlock::Table { rows: rows.clone() }),
        SourceNode::Image(image) => decode_image(image).map(ContentBlock::Image),
        SourceNode::Paragraph {
            style_name,
            numbering,
            runs,
        } => Some(classify_paragraph(
            StyleTag::from_style_name(style_name),
            *numbering,
            runs,
            options,
        )),
    }
}

fn classify_paragraph(
    tag: StyleTag,
    numbering: Option<Numbering>,
    runs: &[TextRun],
    options: &ClassifyOptions,
) -> ContentBlock {
    let text: String = runs.iter().map(|r| r.text.as_str()).collect();
    let trimmed = text.trim();

    if let StyleTag::Heading(level) = tag {
        return ContentBlock::Heading {
            level,
            text: trimmed.to_string(),
        };
    }

    let bullet_glyph = trimmed.starts_with(BULLET_GLYPHS);
    let style_list = matches!(tag, StyleTag::List { .. });
    if style_list || numbering.is_some() || bullet_glyph {
        let (style_level, numbered_style) = match tag {
            StyleTag::List { level, numbered } => (level, numbered),
            _ => (None, false),
        };
        let leading_ws = text.len() - text.trim_start().len();
        let typed_marker = ORDERED_MARKER.find(trimmed).map(|m| m.end());
        let ordered = numbered_style || typed_marker.is_some();

        let marker_len = match typed_marker {
            Some(end) => end,
            None if bullet_glyph => {
                let glyph_len = trimmed.chars().next().map_or(0, char::len_utf8);
                glyph_len + (trimmed[glyph_len..].len() - trimmed[glyph_len..].trim_start().len())
            }
            None => 0,
        };
        let item_runs = drop_leading(runs, leading_ws + marker_len);
        let level = style_level
            .or(numbering.map(|n| n.ilvl + 1))
            .unwrap_or(1);

        return ContentBlock::ListItem {
            markup: compose_markup(&item_runs),
            level,
            ordered,
        };
    }

    if options.drop_caps && tag == StyleTag::DropCap {
        if let Some(first) = trimmed.chars().next() {
            let leading_ws = text.len() - text.trim_start().len();
            let rest = drop_leading(runs, leading_ws + first.len_utf8());
            return ContentBlock::DropCap {
                letter: first.to_string(),
                rest: compose_markup(&rest),
            };
        }
    }

    if trimmed.is_empty() {
        return ContentBlock::Spacer;
    }

    ContentBlock::Paragraph {
        markup: compose_markup(runs),
    }
}

/// Remove the first `count` bytes of visible text across runs
fn drop_leading(runs: &[TextRun], mut count: usize) -> Vec<TextRun> {
    let mut out = Vec::with_capacity(runs.len());
    for run in runs {
        if count == 0 {
            out.push(run.clone());
            continue;
        }
        if run.text.len() <= count {
            count -= run.text.len();
            continue;
        }
        let cut = (count..=run.text.len())
            .find(|&i| run.text.is_char_boundary(i))
            .unwrap_or(run.text.len());
        out.push(TextRun {
            text: run.text[cut..].to_string(),
            ..run.clone()
        });
        count = 0;
    }
    out
}

/// Decode an embedded image, normalizing it to PNG for the renderer.
pub fn decode_image(image: &SourceImage) -> Option<ImageBlock> {
    let format = image::guess_format(&image.bytes).ok();
    let decoded = match image::load_from_memory(&image.bytes) {
        Ok(decoded) => decoded,
        Err(e) => {
            log::warn!("Skipping image {}: {}", image.name, e);
            return None;
        }
    };

    let png = if format == Some(image::ImageFormat::Png) {
        image.bytes.clone()
    } else {
        let mut buf = Vec::new();
        if let Err(e) = decoded.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png) {
            log::warn!("Skipping image {}: re-encoding failed: {}", image.name, e);
            return None;
        }
        buf
    };

    Some(ImageBlock {
        name: image.name.clone(),
        png,
        width_px: decoded.width(),
        height_px: decoded.height(),
        max_width_pt: IMAGE_MAX_WIDTH_PT,
        max_height_pt: IMAGE_MAX_HEIGHT_PT,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_tags_cover_common_word_styles() {
        assert_eq!(StyleTag::from_style_name("heading 3"), StyleTag::Heading(3));
        assert_eq!(StyleTag::from_style_name("Heading"), StyleTag::Heading(1));
        assert_eq!(
            StyleTag::from_style_name("List Number 2"),
            StyleTag::List {
                level: Some(2),
                numbered: true
            }
        );
        assert_eq!(
            StyleTag::from_style_name("List Paragraph"),
            StyleTag::List {
                level: None,
                numbered: false
            }
        );
        assert_eq!(StyleTag::from_style_name("Drop Cap"), StyleTag::DropCap);
        assert_eq!(StyleTag::from_style_name("Title"), StyleTag::Title);
        assert_eq!(StyleTag::from_style_name("Subtitle"), StyleTag::Body);
    }

    #[test]
    fn drop_leading_spans_runs() {
        let runs = vec![TextRun::plain("1"), TextRun::plain(". item")];
        let out = drop_leading(&runs, 3);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].text, "item");
    }
}
