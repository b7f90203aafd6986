use crate::types::*;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::collections::HashMap;
use std::io::{Cursor, Read};
use zip::ZipArchive;

pub(crate) type DocxArchive = ZipArchive<Cursor<Vec<u8>>>;

pub(crate) const DOCUMENT_PART: &str = "word/document.xml";
const STYLES_PART: &str = "word/styles.xml";
const RELATIONSHIPS_PART: &str = "word/_rels/document.xml.rels";

pub(crate) fn open(bytes: Vec<u8>) -> Result<DocxArchive> {
    ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ManuscriptError::Extraction(format!("Not a readable DOCX archive: {}", e)))
}

/// Read a text part, `None` if the archive has no such entry
pub(crate) fn read_part(archive: &mut DocxArchive, name: &str) -> Result<Option<String>> {
    let mut entry = match archive.by_name(name) {
        Ok(entry) => entry,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let mut content = String::new();
    entry.read_to_string(&mut content)?;
    Ok(Some(content))
}

pub(crate) fn read_binary_part(archive: &mut DocxArchive, name: &str) -> Result<Option<Vec<u8>>> {
    let mut entry = match archive.by_name(name) {
        Ok(entry) => entry,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let mut bytes = Vec::new();
    entry.read_to_end(&mut bytes)?;
    Ok(Some(bytes))
}

pub(crate) fn get_attr(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .find(|a| a.as_ref().ok().map(|x| x.key.as_ref()) == Some(key))
        .and_then(|a| a.ok())
        .map(|attr| String::from_utf8_lossy(&attr.value).to_string())
}

/// True when a toggle property such as `<w:b w:val="0"/>` switches formatting off
pub(crate) fn is_toggled_off(e: &BytesStart) -> bool {
    matches!(
        get_attr(e, b"w:val").as_deref(),
        Some("0") | Some("false") | Some("none")
    )
}

/// Relationship id (`rId7`) to target path (`media/image1.png`)
pub(crate) fn relationships(archive: &mut DocxArchive) -> Result<HashMap<String, String>> {
    let Some(xml) = read_part(archive, RELATIONSHIPS_PART)? else {
        return Ok(HashMap::new());
    };

    let mut map = HashMap::new();
    let mut reader = Reader::from_str(&xml);
    reader.trim_text(true);
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Empty(e) | Event::Start(e) if e.name().as_ref() == b"Relationship" => {
                if let (Some(id), Some(target)) = (get_attr(&e, b"Id"), get_attr(&e, b"Target")) {
                    map.insert(id, target);
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(map)
}

/// Style id (`Heading1`) to display name (`heading 1`)
pub(crate) fn style_names(archive: &mut DocxArchive) -> Result<HashMap<String, String>> {
    let Some(xml) = read_part(archive, STYLES_PART)? else {
        return Ok(HashMap::new());
    };

    let mut map = HashMap::new();
    let mut reader = Reader::from_str(&xml);
    reader.trim_text(true);
    let mut buf = Vec::new();
    let mut current_id: Option<String> = None;
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) if e.name().as_ref() == b"w:style" => {
                current_id = get_attr(&e, b"w:styleId");
            }
            Event::Empty(e) if e.name().as_ref() == b"w:name" => {
                if let (Some(id), Some(name)) = (current_id.as_ref(), get_attr(&e, b"w:val")) {
                    map.insert(id.clone(), name);
                }
            }
            Event::End(e) if e.name().as_ref() == b"w:style" => current_id = None,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(map)
}

/// Resolve a relationship target to its archive path
pub(crate) fn media_path(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("word/{}", target),
    }
}
