use crate::types::SourceNode;

/// Style name given to every pasted line
pub const PASTED_STYLE: &str = "Normal";

/// Split pasted text into one paragraph node per line.
///
/// Blank lines are kept so the classifier turns them into spacers.
pub fn read_text(text: &str) -> Vec<SourceNode> {
    text.lines()
        .map(|line| SourceNode::paragraph(PASTED_STYLE, line.trim_end()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_blank_lines_and_handles_crlf() {
        let nodes = read_text("one\r\n\r\ntwo");
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[0].plain_text(), "one");
        assert_eq!(nodes[1].plain_text(), "");
        assert_eq!(nodes[2].plain_text(), "two");
    }
}
