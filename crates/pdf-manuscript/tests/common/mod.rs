#![allow(dead_code)]

use std::io::{Cursor, Write};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

const STYLES: &[(&str, &str)] = &[
    ("Title", "Title"),
    ("Heading1", "heading 1"),
    ("Heading2", "heading 2"),
    ("ListBullet", "List Bullet"),
    ("ListBullet2", "List Bullet 2"),
    ("ListNumber", "List Number"),
    ("ListParagraph", "List Paragraph"),
    ("DropCap", "Drop Cap"),
];

/// Builds minimal WordprocessingML packages for tests
#[derive(Default)]
pub struct DocxBuilder {
    body: String,
    media: Vec<(String, Vec<u8>)>,
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn run_xml(text: &str, bold: bool, italic: bool) -> String {
    let mut props = String::new();
    if bold {
        props.push_str("<w:b/>");
    }
    if italic {
        props.push_str("<w:i/>");
    }
    let props = if props.is_empty() {
        String::new()
    } else {
        format!("<w:rPr>{}</w:rPr>", props)
    };
    format!(
        r#"<w:r>{}<w:t xml:space="preserve">{}</w:t></w:r>"#,
        props,
        escape(text)
    )
}

impl DocxBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paragraph(self, style_id: &str, text: &str) -> Self {
        self.runs(style_id, &[(text, false, false)])
    }

    pub fn runs(mut self, style_id: &str, runs: &[(&str, bool, bool)]) -> Self {
        let style = if style_id.is_empty() {
            String::new()
        } else {
            format!(r#"<w:pPr><w:pStyle w:val="{}"/></w:pPr>"#, style_id)
        };
        let runs: String = runs.iter().map(|(t, b, i)| run_xml(t, *b, *i)).collect();
        self.body.push_str(&format!("<w:p>{}{}</w:p>", style, runs));
        self
    }

    pub fn numbered(mut self, ilvl: usize, text: &str) -> Self {
        self.body.push_str(&format!(
            r#"<w:p><w:pPr><w:numPr><w:ilvl w:val="{}"/><w:numId w:val="1"/></w:numPr></w:pPr>{}</w:p>"#,
            ilvl,
            run_xml(text, false, false)
        ));
        self
    }

    pub fn table(mut self, rows: &[&[&str]]) -> Self {
        self.body.push_str("<w:tbl><w:tblPr/>");
        for row in rows {
            self.body.push_str("<w:tr>");
            for cell in row.iter() {
                self.body.push_str(&format!(
                    "<w:tc><w:tcPr/><w:p>{}</w:p></w:tc>",
                    run_xml(cell, false, false)
                ));
            }
            self.body.push_str("</w:tr>");
        }
        self.body.push_str("</w:tbl>");
        self
    }

    pub fn image(mut self, bytes: Vec<u8>) -> Self {
        let index = self.media.len() + 1;
        let rel_id = format!("rIdImg{}", index);
        self.body.push_str(&format!(
            r#"<w:p><w:r><w:drawing><wp:inline><a:graphic><a:graphicData><pic:pic><pic:blipFill><a:blip r:embed="{}"/></pic:blipFill></pic:pic></a:graphicData></a:graphic></wp:inline></w:drawing></w:r></w:p>"#,
            rel_id
        ));
        self.media.push((format!("media/image{}.png", index), bytes));
        self
    }

    pub fn build(self) -> Vec<u8> {
        let document = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture"><w:body>{}<w:sectPr/></w:body></w:document>"#,
            self.body
        );

        let styles: String = STYLES
            .iter()
            .map(|(id, name)| {
                format!(
                    r#"<w:style w:type="paragraph" w:styleId="{}"><w:name w:val="{}"/></w:style>"#,
                    id, name
                )
            })
            .collect();
        let styles = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">{}</w:styles>"#,
            styles
        );

        let rels: String = self
            .media
            .iter()
            .enumerate()
            .map(|(i, (target, _))| {
                format!(
                    r#"<Relationship Id="rIdImg{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="{}"/>"#,
                    i + 1,
                    target
                )
            })
            .collect();
        let rels = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{}</Relationships>"#,
            rels
        );

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        let mut add = |name: &str, bytes: &[u8]| {
            zip.start_file(name, options).unwrap();
            zip.write_all(bytes).unwrap();
        };
        add("word/document.xml", document.as_bytes());
        add("word/styles.xml", styles.as_bytes());
        add("word/_rels/document.xml.rels", rels.as_bytes());
        for (target, bytes) in &self.media {
            add(&format!("word/{}", target), bytes);
        }
        zip.finish().unwrap().into_inner()
    }
}

/// A small RGB PNG
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([200, 30, 30]));
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}
