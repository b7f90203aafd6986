//! Book assembly and PDF emission.
//!
//! Front matter, the optional table of contents and the body are laid out
//! as one flow, page numbers are stamped, then every positioned item is
//! written out as `printpdf` operations.

use crate::constants::*;
use crate::fonts::{FontRegistry, FontSource, RegisteredFont};
use crate::front_matter::toc_flowables;
use crate::geometry::{PageGeometry, estimate_page_count};
use crate::layout::{LaidOutPage, PageDecorator, PageItem, PageNumberStamp, build_story, paginate};
use crate::options::TypesetOptions;
use crate::stats::TypesetStatistics;
use crate::styles::StyleSheet;
use crate::trim::resolve_trim_size;
use crate::types::*;
use pdf_manuscript::{ImageBlock, Manuscript};
use printpdf::color::{Color, Rgb};
use printpdf::graphics::{LinePoint, PaintMode, Polygon, PolygonRing, WindingOrder};
use printpdf::image::RawImage;
use printpdf::xobject::{XObject, XObjectTransform};
use printpdf::{
    FontId, Mm, Op, ParsedFont, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Point, Pt,
    TextItem, TextMatrix, XObjectId,
};
use std::collections::HashMap;
use std::sync::Arc;

/// Pages laid out but not yet written
#[derive(Debug, Clone)]
pub struct BookLayout<'m> {
    pub geometry: PageGeometry,
    pub pages: Vec<LaidOutPage>,
    pub images: Vec<&'m ImageBlock>,
    pub title: String,
    pub statistics: TypesetStatistics,
}

/// Finished PDF
#[derive(Debug, Clone)]
pub struct RenderedBook {
    pub pdf: Vec<u8>,
    pub statistics: TypesetStatistics,
}

/// Typeset on a blocking worker
pub async fn typeset(
    manuscript: Manuscript,
    options: TypesetOptions,
    fonts: Arc<FontRegistry>,
) -> Result<RenderedBook> {
    tokio::task::spawn_blocking(move || render_book(&manuscript, &options, &fonts)).await?
}

/// Lay out a manuscript and produce PDF bytes
pub fn render_book(
    manuscript: &Manuscript,
    options: &TypesetOptions,
    fonts: &FontRegistry,
) -> Result<RenderedBook> {
    let layout = layout_book(manuscript, options, fonts)?;
    let pdf = write_pdf(&layout, fonts)?;
    log::info!(
        "Rendered {} pages ({} trim, gutter {} in, {} bytes)",
        layout.statistics.page_count,
        layout.statistics.trim,
        layout.statistics.gutter_in,
        pdf.len()
    );
    Ok(RenderedBook {
        pdf,
        statistics: layout.statistics,
    })
}

/// Resolve geometry and styles, then paginate front matter, TOC and body
pub fn layout_book<'m>(
    manuscript: &'m Manuscript,
    options: &TypesetOptions,
    fonts: &FontRegistry,
) -> Result<BookLayout<'m>> {
    options.validate()?;
    let mut substituted_fonts: Vec<(String, String)> = Vec::new();
    for requested in [&options.heading_font, &options.body_font] {
        fonts.resolve(requested)?;
        let Some(target) = fonts.alias_target(requested) else {
            continue;
        };
        if substituted_fonts.iter().any(|(name, _)| name == requested) {
            continue;
        }
        log::warn!("Font {} is not installed, drawing it with {}", requested, target);
        substituted_fonts.push((requested.clone(), target.to_string()));
    }

    let trim = resolve_trim_size(&options.trim_size, options.strict_trim_size)?;
    let word_count = manuscript.word_count();
    let estimated_pages = estimate_page_count(word_count, &trim);
    let geometry =
        PageGeometry::resolve(trim, options.bleed, estimated_pages, options.gutter_override_in);
    log::debug!(
        "Geometry for {} words: {:?} (estimated {} pages)",
        word_count,
        geometry,
        estimated_pages
    );

    let styles = StyleSheet::new(options);
    let front = &options.front_matter;
    let title = front.resolved_title(manuscript.title.as_deref()).to_string();

    let mut flowables = front.flowables(manuscript.title.as_deref(), &styles);
    if options.generate_toc {
        flowables.extend(toc_flowables(&manuscript.toc_entries(), &styles));
    }
    let story = build_story(&manuscript.blocks, &styles, fonts)?;
    flowables.extend(story.flowables);

    let mut pages = paginate(&flowables, &geometry, fonts)?;

    let skip = options
        .page_numbers
        .skip_first
        .unwrap_or_else(|| front.page_count());
    if options.page_numbers.enabled {
        let stamp = PageNumberStamp { skip_first: skip };
        for (index, page) in pages.iter_mut().enumerate() {
            stamp.decorate(index, page, &geometry, fonts)?;
        }
    }

    let unnumbered = if options.page_numbers.enabled {
        skip
    } else {
        pages.len()
    };
    let mut statistics =
        TypesetStatistics::new(word_count, estimated_pages, pages.len(), unnumbered, &geometry);
    statistics.substituted_fonts = substituted_fonts;

    Ok(BookLayout {
        geometry,
        pages,
        images: story.images,
        title,
        statistics,
    })
}

fn write_pdf(layout: &BookLayout<'_>, fonts: &FontRegistry) -> Result<Vec<u8>> {
    let mut doc = PdfDocument::new(&layout.title);

    let mut image_warnings = Vec::new();
    let mut image_ids = Vec::with_capacity(layout.images.len());
    for image in &layout.images {
        let raw = RawImage::decode_from_bytes(&image.png, &mut image_warnings).map_err(|e| {
            TypesetError::Layout(format!("Could not embed image {}: {}", image.name, e))
        })?;
        let id = XObjectId::new();
        doc.resources
            .xobjects
            .map
            .insert(id.clone(), XObject::Image(raw));
        image_ids.push(id);
    }

    let mut font_warnings = Vec::new();
    let mut embedded: HashMap<String, FontId> = HashMap::new();
    let width = Mm(in_to_mm(layout.geometry.trim.width_in));
    let height = Mm(in_to_mm(layout.geometry.trim.height_in));

    let mut pages = Vec::with_capacity(layout.pages.len());
    for page in &layout.pages {
        let mut ops = Vec::new();
        for item in &page.items {
            match item {
                PageItem::Text {
                    x,
                    y,
                    font,
                    size,
                    text,
                } => {
                    let face = fonts.resolve(font)?;
                    ops.push(Op::StartTextSection);
                    let builtin = match &face.source {
                        FontSource::Builtin(builtin) if text.is_ascii() => Some(*builtin),
                        _ => None,
                    };
                    if let Some(builtin) = builtin {
                        ops.push(Op::SetTextCursor {
                            pos: Point { x: Pt(*x), y: Pt(*y) },
                        });
                        ops.push(Op::SetFontSizeBuiltinFont {
                            font: builtin,
                            size: Pt(*size),
                        });
                        ops.push(Op::WriteTextBuiltinFont {
                            items: vec![TextItem::Text(text.clone())],
                            font: builtin,
                        });
                    } else {
                        let font_id = match embedded.get(&face.name) {
                            Some(id) => id.clone(),
                            None => {
                                let parsed = parse_program(face, &mut font_warnings)?;
                                let id = doc.add_font(&parsed);
                                embedded.insert(face.name.clone(), id.clone());
                                id
                            }
                        };
                        ops.push(Op::SetFontSize {
                            font: font_id.clone(),
                            size: Pt(*size),
                        });
                        ops.push(Op::SetTextMatrix {
                            matrix: TextMatrix::Translate(Pt(*x), Pt(*y)),
                        });
                        ops.push(Op::WriteText {
                            items: vec![TextItem::Text(text.clone())],
                            font: font_id,
                        });
                    }
                    ops.push(Op::EndTextSection);
                }
                PageItem::Rect {
                    x,
                    y,
                    width,
                    height,
                    grey,
                } => {
                    ops.push(Op::SetFillColor { col: grey_fill(*grey) });
                    ops.push(Op::DrawPolygon {
                        polygon: rectangle(*x, *y, *width, *height),
                    });
                    if *grey != 0.0 {
                        ops.push(Op::SetFillColor { col: grey_fill(0.0) });
                    }
                }
                PageItem::Image {
                    image,
                    x,
                    y,
                    width,
                    height,
                } => {
                    let (Some(id), Some(source)) = (image_ids.get(*image), layout.images.get(*image))
                    else {
                        return Err(TypesetError::Layout(format!(
                            "Image {} was never registered",
                            image
                        )));
                    };
                    ops.push(Op::UseXobject {
                        id: id.clone(),
                        transform: XObjectTransform {
                            translate_x: Some(Pt(*x)),
                            translate_y: Some(Pt(*y)),
                            scale_x: Some(*width / source.width_px.max(1) as f32),
                            scale_y: Some(*height / source.height_px.max(1) as f32),
                            rotate: None,
                            dpi: Some(POINTS_PER_INCH),
                        },
                    });
                }
            }
        }
        pages.push(PdfPage::new(width, height, ops));
    }

    log::debug!(
        "PDF assembled with {} image and {} font warnings",
        image_warnings.len(),
        font_warnings.len()
    );

    doc.pages = pages;
    let mut save_warnings = Vec::new();
    Ok(doc.save(&PdfSaveOptions::default(), &mut save_warnings))
}

/// Font program to embed for `face`.
///
/// Builtin faces only write ASCII correctly, so their other text is drawn
/// with the subset program printpdf ships for the same face.
fn parse_program(face: &RegisteredFont, warnings: &mut Vec<PdfWarnMsg>) -> Result<ParsedFont> {
    let parsed = match &face.source {
        FontSource::Builtin(builtin) => {
            ParsedFont::from_bytes(&builtin.get_subset_font().bytes, 0, warnings)
        }
        FontSource::Embedded { bytes, .. } => ParsedFont::from_bytes(bytes, 0, warnings),
    };
    parsed.ok_or_else(|| TypesetError::Font(format!("Failed to parse font '{}'", face.name)))
}

fn grey_fill(level: f32) -> Color {
    Color::Rgb(Rgb::new(level, level, level, None))
}

fn rectangle(x: f32, y: f32, width: f32, height: f32) -> Polygon {
    let corner = |px: f32, py: f32| LinePoint {
        p: Point { x: Pt(px), y: Pt(py) },
        bezier: false,
    };
    Polygon {
        rings: vec![PolygonRing {
            points: vec![
                corner(x, y),
                corner(x + width, y),
                corner(x + width, y + height),
                corner(x, y + height),
            ],
        }],
        mode: PaintMode::Fill,
        winding_order: WindingOrder::NonZero,
    }
}
