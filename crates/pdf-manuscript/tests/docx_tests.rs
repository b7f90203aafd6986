mod common;

use common::{DocxBuilder, png_bytes};
use pdf_manuscript::*;

#[test]
fn test_heading_bullets_and_table_come_out_in_order() {
    let bytes = DocxBuilder::new()
        .paragraph("Heading1", "Chapter One")
        .paragraph("ListBullet", "first")
        .paragraph("ListBullet", "second")
        .paragraph("ListBullet", "third")
        .table(&[&["a", "b"], &["c", "d"]])
        .build();

    let nodes = read_docx(bytes).unwrap();
    let options = ClassifyOptions::default();
    let blocks: Vec<_> = nodes
        .iter()
        .filter_map(|n| classify(n, &options))
        .collect();
    let blocks = group_lists(blocks);

    assert_eq!(blocks.len(), 3);
    assert_eq!(
        blocks[0],
        ContentBlock::Heading {
            level: 1,
            text: "Chapter One".to_string()
        }
    );
    match &blocks[1] {
        ContentBlock::List(tree) => {
            assert_eq!(tree.len(), 3);
            assert_eq!(tree.roots.len(), 3);
            assert!(!tree.ordered);
        }
        other => panic!("Expected a list, got {:?}", other),
    }
    match &blocks[2] {
        ContentBlock::Table { rows } => {
            assert_eq!(rows.len(), 2);
            assert!(rows.iter().all(|r| r.len() == 2));
            assert_eq!(rows[1][1], "d");
        }
        other => panic!("Expected a table, got {:?}", other),
    }
}

#[test]
fn test_first_heading_moves_to_title_page() {
    let bytes = DocxBuilder::new()
        .paragraph("Heading1", "Chapter One")
        .paragraph("", "Body text.")
        .build();

    let manuscript =
        Manuscript::from_source(&ManuscriptSource::Docx(bytes), &ExtractOptions::default())
            .unwrap();

    assert_eq!(manuscript.title.as_deref(), Some("Chapter One"));
    assert_eq!(manuscript.blocks.len(), 1);
    assert_eq!(manuscript.blocks[0].visible_text(), "Body text.");
}

#[test]
fn test_title_style_wins_over_heading() {
    let bytes = DocxBuilder::new()
        .paragraph("Heading1", "Part One")
        .paragraph("Title", "The Book")
        .paragraph("", "Opening line.")
        .build();

    let manuscript =
        Manuscript::from_source(&ManuscriptSource::Docx(bytes), &ExtractOptions::default())
            .unwrap();

    assert_eq!(manuscript.title.as_deref(), Some("The Book"));
    assert_eq!(manuscript.toc_entries().len(), 1);
}

#[test]
fn test_inline_runs_become_markup() {
    let bytes = DocxBuilder::new()
        .runs(
            "",
            &[("Plain ", false, false), ("bold", true, false), (" and ", false, false), ("both", true, true)],
        )
        .build();

    let nodes = read_docx(bytes).unwrap();
    let block = classify(&nodes[0], &ClassifyOptions::default()).unwrap();
    assert_eq!(
        block,
        ContentBlock::Paragraph {
            markup: "Plain <b>bold</b> and <b><i>both</i></b>".to_string()
        }
    );
}

#[test]
fn test_numbering_marker_makes_list_items_with_levels() {
    let bytes = DocxBuilder::new()
        .numbered(0, "top")
        .numbered(1, "nested")
        .build();

    let nodes = read_docx(bytes).unwrap();
    let blocks: Vec<_> = nodes
        .iter()
        .filter_map(|n| classify(n, &ClassifyOptions::default()))
        .collect();
    assert!(matches!(blocks[0], ContentBlock::ListItem { level: 1, .. }));
    assert!(matches!(blocks[1], ContentBlock::ListItem { level: 2, .. }));
}

#[test]
fn test_images_are_interleaved_at_their_position() {
    let bytes = DocxBuilder::new()
        .paragraph("", "Before")
        .image(png_bytes(8, 4))
        .paragraph("", "After")
        .build();

    let nodes = read_docx(bytes).unwrap();
    let blocks: Vec<_> = nodes
        .iter()
        .filter_map(|n| classify(n, &ClassifyOptions::default()))
        .collect();

    assert_eq!(blocks.len(), 3);
    match &blocks[1] {
        ContentBlock::Image(image) => {
            assert_eq!((image.width_px, image.height_px), (8, 4));
            assert_eq!(image.max_width_pt, 400.0);
            assert_eq!(image.max_height_pt, 600.0);
        }
        other => panic!("Expected an image, got {:?}", other),
    }
}

#[test]
fn test_corrupt_image_is_skipped() {
    let bytes = DocxBuilder::new()
        .paragraph("", "Text")
        .image(b"not an image".to_vec())
        .build();

    let nodes = read_docx(bytes).unwrap();
    let blocks: Vec<_> = nodes
        .iter()
        .filter_map(|n| classify(n, &ClassifyOptions::default()))
        .collect();
    assert_eq!(blocks.len(), 1);
}

#[test]
fn test_drop_cap_only_when_enabled() {
    let build = || DocxBuilder::new().paragraph("DropCap", "Once upon a time").build();

    let off = read_docx(build()).unwrap();
    assert!(matches!(
        classify(&off[0], &ClassifyOptions::default()),
        Some(ContentBlock::Paragraph { .. })
    ));

    let on = read_docx(build()).unwrap();
    let block = classify(&on[0], &ClassifyOptions { drop_caps: true }).unwrap();
    assert_eq!(
        block,
        ContentBlock::DropCap {
            letter: "O".to_string(),
            rest: "nce upon a time".to_string()
        }
    );
}

#[test]
fn test_garbage_bytes_are_an_extraction_failure() {
    let result = Manuscript::from_source(
        &ManuscriptSource::Docx(b"definitely not a zip".to_vec()),
        &ExtractOptions::default(),
    );
    match result {
        Err(ManuscriptError::Extraction(msg)) => assert!(msg.contains("DOCX")),
        other => panic!("Expected extraction failure, got {:?}", other),
    }
}

#[test]
fn test_empty_document_is_an_extraction_failure() {
    let bytes = DocxBuilder::new().paragraph("", "   ").build();
    let result =
        Manuscript::from_source(&ManuscriptSource::Docx(bytes), &ExtractOptions::default());
    assert!(matches!(result, Err(ManuscriptError::Extraction(_))));
}

#[tokio::test]
async fn test_extract_runs_off_the_async_thread() {
    let bytes = DocxBuilder::new()
        .paragraph("Heading1", "Title Here")
        .paragraph("Heading2", "Section")
        .paragraph("", "Words in the body")
        .build();

    let manuscript = Manuscript::extract(ManuscriptSource::Docx(bytes), ExtractOptions::default())
        .await
        .unwrap();
    assert_eq!(manuscript.word_count(), 5);
    assert_eq!(
        manuscript.toc_entries(),
        vec![TocEntry {
            text: "Section".to_string(),
            level: 2
        }]
    );
}
