use crate::types::*;

/// Group contiguous list items into [`ContentBlock::List`] trees.
///
/// Any other block ends the active list. Whether a group is ordered is taken
/// from its first item.
pub fn group_lists(blocks: Vec<ContentBlock>) -> Vec<ContentBlock> {
    let mut out = Vec::with_capacity(blocks.len());
    let mut builder: Option<ListBuilder> = None;

    for block in blocks {
        match block {
            ContentBlock::ListItem {
                markup,
                level,
                ordered,
            } => builder
                .get_or_insert_with(|| ListBuilder::new(ordered))
                .push(markup, level),
            other => {
                if let Some(done) = builder.take() {
                    out.push(ContentBlock::List(done.finish()));
                }
                out.push(other);
            }
        }
    }
    if let Some(done) = builder.take() {
        out.push(ContentBlock::List(done.finish()));
    }
    out
}

struct ListBuilder {
    tree: ListTree,
    /// `(source level, node index)` of the open ancestors
    stack: Vec<(usize, usize)>,
}

impl ListBuilder {
    fn new(ordered: bool) -> Self {
        Self {
            tree: ListTree {
                ordered,
                ..Default::default()
            },
            stack: Vec::new(),
        }
    }

    fn push(&mut self, markup: String, level: usize) {
        while self
            .stack
            .last()
            .is_some_and(|&(open_level, _)| open_level >= level)
        {
            self.stack.pop();
        }

        let index = self.tree.nodes.len();
        let depth = self.stack.len() + 1;
        self.tree.nodes.push(ListNode {
            markup,
            depth,
            children: Vec::new(),
        });

        // A deeper level with no shallower predecessor becomes a root
        match self.stack.last() {
            Some(&(_, parent)) => self.tree.nodes[parent].children.push(index),
            None => self.tree.roots.push(index),
        }
        self.stack.push((level, index));
    }

    fn finish(self) -> ListTree {
        self.tree
    }
}
