#![allow(dead_code)]

use plate_range::{Boundary, Document, Editor, NodeId, Range};

/// First text position whose node contains `needle`.
pub fn find_text(doc: &Document, needle: &str) -> Boundary {
    doc.descendants(doc.root())
        .into_iter()
        .find_map(|id| {
            let offset = doc.text(id)?.find(needle)?;
            Some(Boundary::new(id, offset))
        })
        .unwrap_or_else(|| panic!("no text node contains {needle:?}"))
}

/// Range over the first occurrence of `needle` inside a single text node.
pub fn range_over(doc: &Document, needle: &str) -> Range {
    let start = find_text(doc, needle);
    Range::new(
        doc,
        start,
        Boundary::new(start.node, start.offset + needle.len()),
    )
}

/// Range from the start of `from` to the end of `to`.
pub fn range_between(doc: &Document, from: &str, to: &str) -> Range {
    let start = find_text(doc, from);
    let end = find_text(doc, to);
    Range::new(doc, start, Boundary::new(end.node, end.offset + to.len()))
}

pub fn select_text(editor: &mut Editor, needle: &str) {
    let range = range_over(editor.doc(), needle);
    editor.select(range);
}

pub fn caret_at(editor: &mut Editor, needle: &str) {
    let at = find_text(editor.doc(), needle);
    editor.select(Range::collapsed(at));
}

pub fn node(doc: &Document, path: &[usize]) -> NodeId {
    doc.node_at_path(path)
        .unwrap_or_else(|| panic!("no node at {path:?}"))
}
