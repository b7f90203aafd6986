mod archive;
mod body;

use crate::types::*;

/// Read the body of a DOCX package into structural nodes, in document order.
pub fn read_docx(bytes: Vec<u8>) -> Result<Vec<SourceNode>> {
    let mut archive = archive::open(bytes)?;

    let Some(document) = archive::read_part(&mut archive, archive::DOCUMENT_PART)? else {
        return Err(ManuscriptError::Extraction(
            "DOCX package has no word/document.xml".to_string(),
        ));
    };
    let styles = archive::style_names(&mut archive)?;
    let relationships = archive::relationships(&mut archive)?;

    let nodes = body::walk(&document, &styles, &relationships)?;

    let mut resolved = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            SourceNode::Image(image) => {
                let path = archive::media_path(&image.name);
                match archive::read_binary_part(&mut archive, &path)? {
                    Some(bytes) => resolved.push(SourceNode::Image(SourceImage {
                        name: image.name,
                        bytes,
                    })),
                    None => log::warn!("Image part {} missing from package, skipping", path),
                }
            }
            other => resolved.push(other),
        }
    }

    log::debug!("Read {} structural nodes from DOCX", resolved.len());
    Ok(resolved)
}
