use thiserror::Error;

#[derive(Error, Debug)]
pub enum ManuscriptError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("DOCX archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("DOCX XML error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Could not extract manuscript: {0}")]
    Extraction(String),
}

pub type Result<T> = std::result::Result<T, ManuscriptError>;

/// One styled run of text inside a paragraph
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl TextRun {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}

/// Numbering properties attached to a DOCX paragraph (`w:numPr`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Numbering {
    pub num_id: u32,
    /// Zero-based indentation level (`w:ilvl`)
    pub ilvl: usize,
}

/// Raw image payload as found in the source document
#[derive(Debug, Clone, PartialEq)]
pub struct SourceImage {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Structural node produced by a source reader, before classification.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceNode {
    Paragraph {
        /// Human-readable style name (e.g. "Heading 2", "List Bullet")
        style_name: String,
        numbering: Option<Numbering>,
        runs: Vec<TextRun>,
    },
    Table {
        rows: Vec<Vec<String>>,
    },
    Image(SourceImage),
}

impl SourceNode {
    pub fn paragraph(style_name: impl Into<String>, text: impl Into<String>) -> Self {
        SourceNode::Paragraph {
            style_name: style_name.into(),
            numbering: None,
            runs: vec![TextRun::plain(text)],
        }
    }

    /// Concatenated run text, without formatting
    pub fn plain_text(&self) -> String {
        match self {
            SourceNode::Paragraph { runs, .. } => runs.iter().map(|r| r.text.as_str()).collect(),
            _ => String::new(),
        }
    }
}

/// Image block after probing, with the layout bounds it must be scaled into
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBlock {
    pub name: String,
    /// PNG-encoded pixels
    pub png: Vec<u8>,
    pub width_px: u32,
    pub height_px: u32,
    pub max_width_pt: f32,
    pub max_height_pt: f32,
}

/// A single node of a grouped list
#[derive(Debug, Clone, PartialEq)]
pub struct ListNode {
    /// Inline markup of the item
    pub markup: String,
    /// Nesting depth, 1 for top-level items
    pub depth: usize,
    pub children: Vec<usize>,
}

/// Arena-backed tree for one contiguous run of list items.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListTree {
    pub ordered: bool,
    pub nodes: Vec<ListNode>,
    pub roots: Vec<usize>,
}

impl ListTree {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, index: usize) -> Option<&ListNode> {
        self.nodes.get(index)
    }

    /// Depth-first walk yielding `(node, position among its siblings)`
    pub fn walk(&self) -> Vec<(&ListNode, usize)> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<(usize, usize)> = self
            .roots
            .iter()
            .enumerate()
            .rev()
            .map(|(pos, &idx)| (idx, pos))
            .collect();
        while let Some((idx, pos)) = stack.pop() {
            let Some(node) = self.nodes.get(idx) else {
                continue;
            };
            out.push((node, pos));
            for (child_pos, &child) in node.children.iter().enumerate().rev() {
                stack.push((child, child_pos));
            }
        }
        out
    }
}

/// Classified content of the manuscript body, in document order.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentBlock {
    Heading {
        level: usize,
        text: String,
    },
    /// Body paragraph with inline markup (`<b>`, `<i>`, `<u>`)
    Paragraph {
        markup: String,
    },
    /// Ungrouped list item; the grouper turns contiguous runs into [`ContentBlock::List`]
    ListItem {
        markup: String,
        level: usize,
        ordered: bool,
    },
    List(ListTree),
    Table {
        rows: Vec<Vec<String>>,
    },
    Image(ImageBlock),
    DropCap {
        letter: String,
        rest: String,
    },
    Spacer,
}

impl ContentBlock {
    /// Visible text with markup removed, used for title matching and counting
    pub fn visible_text(&self) -> String {
        match self {
            ContentBlock::Heading { text, .. } => text.clone(),
            ContentBlock::Paragraph { markup } | ContentBlock::ListItem { markup, .. } => {
                crate::markup::strip_markup(markup)
            }
            ContentBlock::List(tree) => tree
                .nodes
                .iter()
                .map(|n| crate::markup::strip_markup(&n.markup))
                .collect::<Vec<_>>()
                .join("\n"),
            ContentBlock::Table { rows } => rows
                .iter()
                .map(|row| row.join(" "))
                .collect::<Vec<_>>()
                .join("\n"),
            ContentBlock::DropCap { letter, rest } => {
                format!("{}{}", letter, crate::markup::strip_markup(rest))
            }
            ContentBlock::Image(_) | ContentBlock::Spacer => String::new(),
        }
    }

    pub fn word_count(&self) -> usize {
        self.visible_text().split_whitespace().count()
    }
}

/// Heading collected for the table of contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    pub text: String,
    pub level: usize,
}

/// Where the manuscript came from
#[derive(Debug, Clone, PartialEq)]
pub enum ManuscriptSource {
    Text(String),
    Docx(Vec<u8>),
}

impl ManuscriptSource {
    /// Build a source from an uploaded file, accepting `.docx` only
    pub fn from_upload(file_name: &str, bytes: Vec<u8>) -> Result<Self> {
        let is_docx = std::path::Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("docx"));
        if !is_docx {
            return Err(ManuscriptError::InvalidInput(format!(
                "Unsupported file type '{}': only .docx uploads are accepted",
                file_name
            )));
        }
        Ok(ManuscriptSource::Docx(bytes))
    }

    /// Load a source from disk, picking the reader by extension
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        let bytes = tokio::fs::read(path).await?;
        if name.to_ascii_lowercase().ends_with(".txt") {
            let text = String::from_utf8(bytes).map_err(|e| {
                ManuscriptError::InvalidInput(format!("{} is not valid UTF-8: {}", name, e))
            })?;
            return Ok(ManuscriptSource::Text(text));
        }
        Self::from_upload(&name, bytes)
    }

    pub fn is_structured(&self) -> bool {
        matches!(self, ManuscriptSource::Docx(_))
    }
}
