//! Title, dedication and copyright pages, and the table of contents.

use crate::constants::*;
use crate::layout::{Flowable, TextBlock};
use crate::styles::{StyleDescriptor, StyleSheet};
use pdf_manuscript::TocEntry;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Book metadata supplied with the request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FrontMatter {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub author: Option<String>,
    pub dedication: Option<String>,
    pub copyright: Option<String>,
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl FrontMatter {
    /// Title shown on the title page: the supplied one, then the detected one
    pub fn resolved_title<'a>(&'a self, detected: Option<&'a str>) -> &'a str {
        present(&self.title)
            .or_else(|| detected.map(str::trim).filter(|s| !s.is_empty()))
            .unwrap_or(UNTITLED_PLACEHOLDER)
    }

    /// Pages produced by [`FrontMatter::flowables`]
    pub fn page_count(&self) -> usize {
        1 + usize::from(present(&self.dedication).is_some())
            + usize::from(present(&self.copyright).is_some())
    }

    /// Flowables for the front pages, each page closed by a page break.
    ///
    /// The title page is always produced; dedication and copyright pages
    /// only when their text is present.
    pub fn flowables(&self, detected_title: Option<&str>, styles: &StyleSheet) -> Vec<Flowable> {
        let mut out = Vec::new();

        opening(&mut out, self.resolved_title(detected_title), &styles.title);
        if let Some(subtitle) = present(&self.subtitle) {
            out.push(Flowable::Text(TextBlock::plain(subtitle, styles.subtitle.clone())));
        }
        if let Some(author) = present(&self.author) {
            out.push(Flowable::Text(TextBlock::plain(
                &format!("by {}", author),
                styles.author.clone(),
            )));
        }
        out.push(Flowable::PageBreak);

        if let Some(dedication) = present(&self.dedication) {
            opening(&mut out, dedication, &styles.dedication);
            out.push(Flowable::PageBreak);
        }

        if let Some(copyright) = present(&self.copyright) {
            let mut lines = copyright.lines().map(str::trim).filter(|l| !l.is_empty());
            if let Some(first) = lines.next() {
                opening(&mut out, first, &styles.copyright);
            }
            let following = StyleDescriptor {
                space_before: 0.0,
                ..styles.copyright.clone()
            };
            for line in lines {
                out.push(Flowable::Text(TextBlock::plain(line, following.clone())));
            }
            out.push(Flowable::PageBreak);
        }

        out
    }
}

/// First block of a front page; its space before survives the page top
fn opening(out: &mut Vec<Flowable>, text: &str, style: &StyleDescriptor) {
    out.push(Flowable::FixedSpace(style.space_before));
    out.push(Flowable::Text(TextBlock::plain(
        text,
        StyleDescriptor {
            space_before: 0.0,
            ..style.clone()
        },
    )));
}

/// Table of contents page, or nothing when there are no headings
pub fn toc_flowables(entries: &[TocEntry], styles: &StyleSheet) -> Vec<Flowable> {
    if entries.is_empty() {
        return Vec::new();
    }
    let mut out = vec![
        Flowable::PageBreak,
        Flowable::Text(TextBlock::plain(TOC_TITLE, styles.toc_heading.clone())),
    ];
    for entry in entries {
        let mut block = TextBlock::plain(&entry.text, styles.toc_entry.clone());
        block.left_indent = LEVEL_INDENT_PT * entry.level.saturating_sub(1) as f32;
        out.push(Flowable::Text(block));
    }
    out.push(Flowable::PageBreak);
    out
}
