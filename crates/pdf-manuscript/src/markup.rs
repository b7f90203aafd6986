//! Inline markup for styled runs.
//!
//! Runs are serialized as `<b>`, `<i>` and `<u>` tags nested in that order,
//! with `&`, `<` and `>` escaped in the text. The same format is parsed back
//! into [`StyledSpan`]s by the layout engine.

use crate::types::TextRun;

/// A stretch of text sharing one inline style
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyledSpan {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Wrap one run: bold outermost, then italic, then underline.
pub fn run_markup(run: &TextRun) -> String {
    let mut out = escape(&run.text);
    if run.underline {
        out = format!("<u>{}</u>", out);
    }
    if run.italic {
        out = format!("<i>{}</i>", out);
    }
    if run.bold {
        out = format!("<b>{}</b>", out);
    }
    out
}

pub fn compose_markup(runs: &[TextRun]) -> String {
    runs.iter()
        .filter(|run| !run.text.is_empty())
        .map(run_markup)
        .collect()
}

/// Parse markup into spans. Unknown tags are kept as literal text.
pub fn parse_markup(markup: &str) -> Vec<StyledSpan> {
    let mut spans: Vec<StyledSpan> = Vec::new();
    let mut bold = 0usize;
    let mut italic = 0usize;
    let mut underline = 0usize;
    let mut current = String::new();
    let mut rest = markup;

    fn flush(
        spans: &mut Vec<StyledSpan>,
        current: &mut String,
        bold: usize,
        italic: usize,
        underline: usize,
    ) {
        if current.is_empty() {
            return;
        }
        let text = std::mem::take(current);
        let (b, i, u) = (bold > 0, italic > 0, underline > 0);
        if let Some(last) = spans.last_mut() {
            if last.bold == b && last.italic == i && last.underline == u {
                last.text.push_str(&text);
                return;
            }
        }
        spans.push(StyledSpan {
            text,
            bold: b,
            italic: i,
            underline: u,
        });
    }

    while let Some(ch) = rest.chars().next() {
        if ch == '<' {
            let tag = ["<b>", "</b>", "<i>", "</i>", "<u>", "</u>"]
                .into_iter()
                .find(|t| rest.starts_with(t));
            if let Some(tag) = tag {
                flush(&mut spans, &mut current, bold, italic, underline);
                match tag {
                    "<b>" => bold += 1,
                    "</b>" => bold = bold.saturating_sub(1),
                    "<i>" => italic += 1,
                    "</i>" => italic = italic.saturating_sub(1),
                    "<u>" => underline += 1,
                    _ => underline = underline.saturating_sub(1),
                }
                rest = &rest[tag.len()..];
                continue;
            }
        } else if ch == '&' {
            let entity = [("&amp;", '&'), ("&lt;", '<'), ("&gt;", '>')]
                .into_iter()
                .find(|(e, _)| rest.starts_with(e));
            if let Some((entity, decoded)) = entity {
                current.push(decoded);
                rest = &rest[entity.len()..];
                continue;
            }
        }
        current.push(ch);
        rest = &rest[ch.len_utf8()..];
    }
    flush(&mut spans, &mut current, bold, italic, underline);
    spans
}

pub fn strip_markup(markup: &str) -> String {
    parse_markup(markup).into_iter().map(|s| s.text).collect()
}
