use crate::classify::{ClassifyOptions, StyleTag, classify};
use crate::docx::read_docx;
use crate::lists::group_lists;
use crate::text::read_text;
use crate::types::*;

/// Options controlling extraction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Render paragraphs styled "Drop Cap" with an enlarged first letter
    pub drop_caps: bool,
}

/// Classified manuscript body ready for layout
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Manuscript {
    /// Title detected in a structured source
    pub title: Option<String>,
    /// Body blocks in document order, lists grouped, detected title removed
    pub blocks: Vec<ContentBlock>,
}

impl Manuscript {
    /// Extract on a blocking worker; DOCX parsing and image decoding are CPU-bound
    pub async fn extract(source: ManuscriptSource, options: ExtractOptions) -> Result<Self> {
        tokio::task::spawn_blocking(move || Self::from_source(&source, &options)).await?
    }

    pub fn from_source(source: &ManuscriptSource, options: &ExtractOptions) -> Result<Self> {
        let nodes = match source {
            ManuscriptSource::Text(text) => {
                if text.trim().is_empty() {
                    return Err(ManuscriptError::InvalidInput(
                        "Pasted text is empty".to_string(),
                    ));
                }
                read_text(text)
            }
            ManuscriptSource::Docx(bytes) => read_docx(bytes.clone())?,
        };

        let title = if source.is_structured() {
            detect_title(&nodes)
        } else {
            None
        };

        let classify_options = ClassifyOptions {
            drop_caps: options.drop_caps,
        };
        let mut blocks: Vec<ContentBlock> = nodes
            .iter()
            .filter_map(|node| classify(node, &classify_options))
            .collect();

        if source.is_structured() && blocks.iter().all(|b| matches!(b, ContentBlock::Spacer)) {
            return Err(ManuscriptError::Extraction(
                "Document contains no body content".to_string(),
            ));
        }

        if let Some(title) = title.as_deref() {
            if !exclude_first_match(&mut blocks, title) {
                log::debug!("Detected title '{}' has no matching body block", title);
            }
        }

        let blocks = group_lists(blocks);
        log::info!(
            "Extracted {} blocks ({} words), title: {:?}",
            blocks.len(),
            blocks.iter().map(ContentBlock::word_count).sum::<usize>(),
            title
        );

        Ok(Self { title, blocks })
    }

    /// Headings in document order, for the table of contents
    pub fn toc_entries(&self) -> Vec<TocEntry> {
        self.blocks
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Heading { level, text } if !text.is_empty() => Some(TocEntry {
                    text: text.clone(),
                    level: *level,
                }),
                _ => None,
            })
            .collect()
    }

    pub fn word_count(&self) -> usize {
        self.blocks.iter().map(ContentBlock::word_count).sum()
    }
}

/// First Title-styled paragraph, else the first Heading 1, else the first
/// non-empty paragraph.
///
/// Candidates are compared by their classified text, so a typed list marker
/// such as "- " is not part of the title.
pub fn detect_title(nodes: &[SourceNode]) -> Option<String> {
    let options = ClassifyOptions::default();
    let paragraphs = || {
        nodes.iter().filter_map(move |node| match node {
            SourceNode::Paragraph { style_name, .. } => {
                let text = classify(node, &options)?.visible_text().trim().to_string();
                (!text.is_empty()).then(|| (StyleTag::from_style_name(style_name), text))
            }
            _ => None,
        })
    };

    paragraphs()
        .find(|(tag, _)| *tag == StyleTag::Title)
        .or_else(|| paragraphs().find(|(tag, _)| *tag == StyleTag::Heading(1)))
        .or_else(|| paragraphs().next())
        .map(|(_, text)| text)
}

/// Remove the first block whose trimmed visible text equals `title`.
///
/// Fires at most once; later blocks with the same text stay in the body.
pub fn exclude_first_match(blocks: &mut Vec<ContentBlock>, title: &str) -> bool {
    let title = title.trim();
    let mut used_title = false;
    blocks.retain(|block| {
        if used_title {
            return true;
        }
        if block.visible_text().trim() == title {
            used_title = true;
            return false;
        }
        true
    });
    used_title
}
