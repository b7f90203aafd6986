use super::{Flowable, ImageFlow, TableFlow, TextBlock};
use crate::constants::*;
use crate::fonts::FontRegistry;
use crate::styles::StyleSheet;
use crate::types::*;
use pdf_manuscript::{ContentBlock, ImageBlock, ListTree, parse_markup};

const BULLET: &str = "\u{2022}";
const BULLET_FALLBACK: &str = "-";

/// Body flowables plus the images they refer to by index
#[derive(Debug, Clone, Default)]
pub struct Story<'m> {
    pub flowables: Vec<Flowable>,
    pub images: Vec<&'m ImageBlock>,
}

/// Turn classified blocks into flowables
pub fn build_story<'m>(
    blocks: &'m [ContentBlock],
    styles: &StyleSheet,
    fonts: &FontRegistry,
) -> Result<Story<'m>> {
    let mut story = Story::default();
    for block in blocks {
        match block {
            ContentBlock::Heading { level, text } => {
                let mut heading = TextBlock::plain(text, styles.heading(*level).clone());
                heading.keep_with_next = true;
                story.flowables.push(Flowable::Text(heading));
            }
            ContentBlock::Paragraph { markup } => {
                story.flowables.push(Flowable::Text(TextBlock::new(
                    parse_markup(markup),
                    styles.body.clone(),
                )));
            }
            ContentBlock::ListItem {
                markup,
                level,
                ordered,
            } => {
                let marker = if *ordered {
                    "1.".to_string()
                } else {
                    bullet_for(styles, fonts)?.to_string()
                };
                story
                    .flowables
                    .push(Flowable::Text(list_item(styles, markup, *level, marker)));
            }
            ContentBlock::List(tree) => push_list(&mut story, tree, styles, fonts)?,
            ContentBlock::Table { rows } => {
                story.flowables.push(Flowable::Spacer(FIGURE_SPACING_PT));
                story.flowables.push(Flowable::Table(TableFlow {
                    rows: rows.clone(),
                    cell: styles.table_cell.clone(),
                    header: styles.table_header.clone(),
                }));
                story.flowables.push(Flowable::Spacer(FIGURE_SPACING_PT));
            }
            ContentBlock::Image(image) => {
                let index = story.images.len();
                story.images.push(image);
                story.flowables.push(Flowable::Spacer(FIGURE_SPACING_PT));
                story.flowables.push(Flowable::Image(ImageFlow {
                    image: index,
                    width_px: image.width_px,
                    height_px: image.height_px,
                    max_width: image.max_width_pt,
                    max_height: image.max_height_pt,
                }));
                story.flowables.push(Flowable::Spacer(FIGURE_SPACING_PT));
            }
            ContentBlock::DropCap { letter, rest } => {
                let mut paragraph = TextBlock::new(parse_markup(rest), styles.body.clone());
                paragraph.drop_cap = Some(letter.clone());
                story.flowables.push(Flowable::Text(paragraph));
            }
            ContentBlock::Spacer => {
                story
                    .flowables
                    .push(Flowable::Spacer(styles.body.leading * SPACER_LEADING_RATIO));
            }
        }
    }
    Ok(story)
}

fn push_list(
    story: &mut Story<'_>,
    tree: &ListTree,
    styles: &StyleSheet,
    fonts: &FontRegistry,
) -> Result<()> {
    let bullet = bullet_for(styles, fonts)?;
    for (node, position) in tree.walk() {
        let marker = if tree.ordered {
            format!("{}.", position + 1)
        } else {
            bullet.to_string()
        };
        story
            .flowables
            .push(Flowable::Text(list_item(styles, &node.markup, node.depth, marker)));
    }
    Ok(())
}

fn list_item(styles: &StyleSheet, markup: &str, depth: usize, marker: String) -> TextBlock {
    let mut item = TextBlock::new(parse_markup(markup), styles.bullet.clone());
    item.left_indent = LEVEL_INDENT_PT * depth.saturating_sub(1) as f32 + LIST_MARKER_WIDTH_PT;
    item.marker = Some(marker);
    item
}

/// Bullet glyph, or a hyphen when the list face cannot show one
fn bullet_for(styles: &StyleSheet, fonts: &FontRegistry) -> Result<&'static str> {
    let face = fonts.resolve(&styles.bullet.font)?;
    Ok(if face.supports('\u{2022}') {
        BULLET
    } else {
        BULLET_FALLBACK
    })
}
