//! Linear walk over `word/document.xml`.
//!
//! Paragraphs, tables and drawings are emitted as [`SourceNode`]s in the
//! order they appear in the body. Images carry their relationship target as
//! the name; bytes are filled in afterwards from the archive.

use super::archive::{get_attr, is_toggled_off};
use crate::types::*;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::collections::HashMap;

#[derive(Default)]
struct ParagraphState {
    style_id: Option<String>,
    num_id: Option<u32>,
    ilvl: Option<usize>,
    runs: Vec<TextRun>,
    images: Vec<String>,
}

#[derive(Default)]
struct TableState {
    rows: Vec<Vec<String>>,
    row: Vec<String>,
    cell: Vec<String>,
}

#[derive(Default)]
struct BodyWalk<'a> {
    styles: Option<&'a HashMap<String, String>>,
    relationships: Option<&'a HashMap<String, String>>,
    nodes: Vec<SourceNode>,
    in_body: bool,
    in_run_props: bool,
    in_text: bool,
    table_depth: usize,
    paragraph: Option<ParagraphState>,
    run: Option<TextRun>,
    table: Option<TableState>,
}

impl<'a> BodyWalk<'a> {
    fn start(&mut self, e: &BytesStart) {
        match e.name().as_ref() {
            b"w:body" => self.in_body = true,
            b"w:p" if self.in_body => self.paragraph = Some(ParagraphState::default()),
            b"w:r" if self.paragraph.is_some() => self.run = Some(TextRun::default()),
            b"w:rPr" if self.run.is_some() => self.in_run_props = true,
            b"w:t" if self.run.is_some() => self.in_text = true,
            b"w:tbl" if self.in_body => {
                self.table_depth += 1;
                if self.table_depth == 1 {
                    self.table = Some(TableState::default());
                }
            }
            b"w:tr" if self.table_depth == 1 => {
                if let Some(table) = self.table.as_mut() {
                    table.row.clear();
                }
            }
            b"w:tc" if self.table_depth == 1 => {
                if let Some(table) = self.table.as_mut() {
                    table.cell.clear();
                }
            }
            _ => self.property(e),
        }
    }

    /// Self-closing elements and the property side of start elements
    fn property(&mut self, e: &BytesStart) {
        match e.name().as_ref() {
            b"w:pStyle" => {
                if let Some(p) = self.paragraph.as_mut() {
                    p.style_id = get_attr(e, b"w:val");
                }
            }
            b"w:numId" => {
                if let Some(p) = self.paragraph.as_mut() {
                    p.num_id = get_attr(e, b"w:val").and_then(|v| v.parse().ok());
                }
            }
            b"w:ilvl" => {
                if let Some(p) = self.paragraph.as_mut() {
                    p.ilvl = get_attr(e, b"w:val").and_then(|v| v.parse().ok());
                }
            }
            b"w:b" if self.in_run_props => {
                if let Some(run) = self.run.as_mut() {
                    run.bold = !is_toggled_off(e);
                }
            }
            b"w:i" if self.in_run_props => {
                if let Some(run) = self.run.as_mut() {
                    run.italic = !is_toggled_off(e);
                }
            }
            b"w:u" if self.in_run_props => {
                if let Some(run) = self.run.as_mut() {
                    run.underline = !is_toggled_off(e);
                }
            }
            b"w:tab" | b"w:br" | b"w:cr" if !self.in_run_props => {
                if let Some(run) = self.run.as_mut() {
                    run.text.push(' ');
                }
            }
            b"a:blip" => {
                let target = get_attr(e, b"r:embed")
                    .and_then(|id| self.relationships.and_then(|rels| rels.get(&id)).cloned());
                match (target, self.paragraph.as_mut()) {
                    (Some(target), Some(p)) => p.images.push(target),
                    (None, _) => log::warn!("Drawing references an unknown relationship, skipping"),
                    _ => {}
                }
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if !self.in_text {
            return;
        }
        if let Some(run) = self.run.as_mut() {
            run.text.push_str(text);
        }
    }

    fn end(&mut self, name: &[u8]) {
        match name {
            b"w:body" => self.in_body = false,
            b"w:t" => self.in_text = false,
            b"w:rPr" => self.in_run_props = false,
            b"w:r" => {
                if let (Some(run), Some(p)) = (self.run.take(), self.paragraph.as_mut()) {
                    p.runs.push(run);
                }
            }
            b"w:p" => {
                if let Some(p) = self.paragraph.take() {
                    self.finish_paragraph(p);
                }
            }
            b"w:tc" if self.table_depth == 1 => {
                if let Some(table) = self.table.as_mut() {
                    let text = table.cell.join(" ").trim().to_string();
                    table.row.push(text);
                }
            }
            b"w:tr" if self.table_depth == 1 => {
                if let Some(table) = self.table.as_mut() {
                    let row = std::mem::take(&mut table.row);
                    table.rows.push(row);
                }
            }
            b"w:tbl" if self.table_depth > 0 => {
                self.table_depth -= 1;
                if self.table_depth == 0 {
                    if let Some(table) = self.table.take() {
                        if !table.rows.is_empty() {
                            self.nodes.push(SourceNode::Table { rows: table.rows });
                        }
                    }
                }
            }
            _ => {}
        }
    }

    fn finish_paragraph(&mut self, p: ParagraphState) {
        let text: String = p.runs.iter().map(|r| r.text.as_str()).collect();

        if self.table_depth > 0 {
            if let Some(table) = self.table.as_mut() {
                let text = text.trim();
                if !text.is_empty() {
                    table.cell.push(text.to_string());
                }
            }
            return;
        }

        let has_images = !p.images.is_empty();
        if !(has_images && text.trim().is_empty()) {
            let style_name = p
                .style_id
                .as_ref()
                .map(|id| {
                    self.styles
                        .and_then(|styles| styles.get(id))
                        .cloned()
                        .unwrap_or_else(|| id.clone())
                })
                .unwrap_or_else(|| "Normal".to_string());
            let numbering = p.num_id.filter(|&id| id != 0).map(|num_id| Numbering {
                num_id,
                ilvl: p.ilvl.unwrap_or(0),
            });
            self.nodes.push(SourceNode::Paragraph {
                style_name,
                numbering,
                runs: p.runs,
            });
        }
        for name in p.images {
            self.nodes.push(SourceNode::Image(SourceImage {
                name,
                bytes: Vec::new(),
            }));
        }
    }
}

pub(crate) fn walk(
    xml: &str,
    styles: &HashMap<String, String>,
    relationships: &HashMap<String, String>,
) -> Result<Vec<SourceNode>> {
    let mut walk = BodyWalk {
        styles: Some(styles),
        relationships: Some(relationships),
        ..Default::default()
    };

    let mut reader = Reader::from_str(xml);
    // w:t content relies on xml:space="preserve"; keep whitespace intact
    reader.trim_text(false);
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => walk.start(&e),
            Event::Empty(e) => walk.property(&e),
            Event::Text(e) => {
                let text = e.unescape()?;
                walk.text(&text);
            }
            Event::End(e) => walk.end(e.name().as_ref()),
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(walk.nodes)
}
