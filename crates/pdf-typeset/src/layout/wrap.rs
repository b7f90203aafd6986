use crate::fonts::FontRegistry;
use crate::styles::StyleDescriptor;
use crate::types::*;
use pdf_manuscript::StyledSpan;

const FIT_EPSILON: f32 = 0.01;

/// Run of a word set in one face
#[derive(Debug, Clone, PartialEq)]
pub struct Piece {
    pub text: String,
    /// Registered font name
    pub font: String,
    pub underline: bool,
    pub width: f32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Word {
    pub pieces: Vec<Piece>,
    pub width: f32,
}

impl Word {
    fn push(&mut self, piece: Piece) {
        self.width += piece.width;
        self.pieces.push(piece);
    }
}

/// One output line; `width` is the natural width with single spaces
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Line {
    pub words: Vec<Word>,
    pub width: f32,
    pub space: f32,
}

impl Line {
    fn new(space: f32) -> Self {
        Self {
            space,
            ..Default::default()
        }
    }

    fn fits(&self, word: &Word, limit: f32) -> bool {
        self.words.is_empty() || self.width + self.space + word.width <= limit + FIT_EPSILON
    }

    fn push(&mut self, word: Word) {
        if !self.words.is_empty() {
            self.width += self.space;
        }
        self.width += word.width;
        self.words.push(word);
    }

    pub fn text(&self) -> String {
        self.words
            .iter()
            .map(|w| w.pieces.iter().map(|p| p.text.as_str()).collect::<String>())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Greedy line breaking of styled spans.
///
/// `width_for(n)` gives the available width of line `n`, so callers can
/// narrow the first lines (drop caps). Words wider than a line are split
/// between characters.
pub fn break_lines(
    spans: &[StyledSpan],
    style: &StyleDescriptor,
    fonts: &FontRegistry,
    width_for: impl Fn(usize) -> f32,
) -> Result<Vec<Line>> {
    let regular = fonts.face(&style.font, style.bold, style.italic)?;
    let space = regular.measure(" ", style.size);

    let mut words: Vec<Word> = Vec::new();
    let mut current = Word::default();
    for span in spans {
        let face = fonts.face(&style.font, style.bold || span.bold, style.italic || span.italic)?;
        let mut buf = String::new();
        let mut flush = |buf: &mut String, word: &mut Word| {
            if buf.is_empty() {
                return;
            }
            let text = std::mem::take(buf);
            word.push(Piece {
                width: face.measure(&text, style.size),
                text,
                font: face.name.clone(),
                underline: span.underline,
            });
        };
        for ch in span.text.chars() {
            if ch.is_whitespace() {
                flush(&mut buf, &mut current);
                if !current.pieces.is_empty() {
                    words.push(std::mem::take(&mut current));
                }
            } else {
                buf.push(ch);
            }
        }
        flush(&mut buf, &mut current);
    }
    if !current.pieces.is_empty() {
        words.push(current);
    }

    let mut lines = Vec::new();
    let mut line = Line::new(space);
    for word in words {
        if !line.fits(&word, width_for(lines.len())) {
            lines.push(std::mem::replace(&mut line, Line::new(space)));
        }
        let limit = width_for(lines.len());
        if line.words.is_empty() && word.width > limit + FIT_EPSILON {
            let mut chunks = split_word(word, limit, style.size, fonts).into_iter().peekable();
            while let Some(chunk) = chunks.next() {
                line.push(chunk);
                if chunks.peek().is_some() {
                    lines.push(std::mem::replace(&mut line, Line::new(space)));
                }
            }
            continue;
        }
        line.push(word);
    }
    if !line.words.is_empty() {
        lines.push(line);
    }
    Ok(lines)
}

/// Break an overlong word into chunks no wider than `limit`
fn split_word(word: Word, limit: f32, size: f32, fonts: &FontRegistry) -> Vec<Word> {
    let mut chunks = Vec::new();
    let mut chunk = Word::default();
    for piece in word.pieces {
        let Some(face) = fonts.get(&piece.font) else {
            chunk.push(piece);
            continue;
        };
        let mut text = String::new();
        let mut width = 0.0;
        for ch in piece.text.chars() {
            let w = face.measure(ch.encode_utf8(&mut [0u8; 4]), size);
            if chunk.width + width + w > limit && (chunk.width + width) > 0.0 {
                if !text.is_empty() {
                    chunk.push(Piece {
                        text: std::mem::take(&mut text),
                        font: piece.font.clone(),
                        underline: piece.underline,
                        width,
                    });
                }
                chunks.push(std::mem::take(&mut chunk));
                width = 0.0;
            }
            text.push(ch);
            width += w;
        }
        if !text.is_empty() {
            chunk.push(Piece {
                text,
                font: piece.font.clone(),
                underline: piece.underline,
                width,
            });
        }
    }
    if !chunk.pieces.is_empty() {
        chunks.push(chunk);
    }
    chunks
}
