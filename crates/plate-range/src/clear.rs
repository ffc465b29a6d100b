use indextree::NodeId;

use crate::args::check_container;
use crate::document::Document;
use crate::editor::Editor;
use crate::error::ArgError;
use crate::range::{Boundary, Range};
use crate::selection::Selection;

impl Editor {
    /// Replaces the first range's content with its plain text. When the
    /// range sits inside a child of `limit`, that child is split at the
    /// range and the text lands between the two halves, directly under
    /// `limit`. A caret with no element between it and `limit` leaves the
    /// document alone. Returns the new text node, which ends up selected.
    pub fn clear_formatting(&mut self, limit: NodeId) -> Result<Option<NodeId>, ArgError> {
        let limit = check_container(self.doc(), limit)?;
        let Some(mut range) = self.selection().first().copied() else {
            return Ok(None);
        };
        let doc = self.doc_mut();

        widen_over_inline_edges(doc, &mut range, limit);
        let mut extracted = range.extract_contents(doc);
        if extracted.to_html().is_empty() {
            if !range.expand_within(doc, limit) {
                tracing::debug!("nothing to clear inside the limit");
                return Ok(None);
            }
            extracted = range.extract_contents(doc);
        }
        let text = doc.create_text(extracted.text());

        match containing_block(doc, range.common_ancestor(doc), limit) {
            None => {
                tracing::debug!("range is directly under the limit; inserting text in place");
                let (parent, index) = doc.insertion_point(range.start);
                doc.insert_at(parent, index, text);
            }
            Some(block) => {
                tracing::debug!("moving content after the range out of its block");
                let mut tail = Range::new(doc, range.start, Boundary::after(doc, block));
                let trailing = tail.extract_nodes(doc);
                let (parent, index) = doc.insertion_point(tail.start);
                doc.insert_at(parent, index, text);
                for (ix, node) in trailing.into_iter().enumerate() {
                    doc.insert_at(parent, index + 1 + ix, node);
                }
            }
        }

        let selection = Selection::single(Range::select_node_contents(self.doc(), text));
        self.set_selection(selection);
        Ok(Some(text))
    }
}

/// The child of `limit` that holds `node`, if `node` is below one.
fn containing_block(doc: &Document, node: NodeId, limit: NodeId) -> Option<NodeId> {
    std::iter::once(node)
        .chain(doc.ancestors(node))
        .take_while(|&id| id != limit)
        .find(|&id| doc.parent(id) == Some(limit))
}

/// Moves boundaries that sit at the very edge of a text or inline element
/// to just outside it, so extracting the range takes whole inline
/// wrappers instead of leaving empty ones behind.
fn widen_over_inline_edges(doc: &Document, range: &mut Range, limit: NodeId) {
    if range.is_collapsed() {
        return;
    }
    let widens = |node: NodeId| node != limit && node != doc.root() && doc.is_inline(node);

    while range.start.offset == 0 && widens(range.start.node) {
        range.start = Boundary::before(doc, range.start.node);
    }
    while range.end.offset == doc.len(range.end.node) && widens(range.end.node) {
        range.end = Boundary::after(doc, range.end.node);
    }
}
