use std::cmp::Ordering;

use indextree::NodeId;
use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::node::{Fragment, Node, TextNode};

/// A position in the tree: a byte offset into a text node, or a child
/// index into an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Boundary {
    pub node: NodeId,
    pub offset: usize,
}

impl Boundary {
    pub fn new(node: NodeId, offset: usize) -> Self {
        Self { node, offset }
    }

    /// Position just before `node` in its parent.
    pub fn before(doc: &Document, node: NodeId) -> Self {
        match doc.parent(node) {
            Some(parent) => Self::new(parent, doc.index(node)),
            None => Self::new(node, 0),
        }
    }

    /// Position just after `node` in its parent.
    pub fn after(doc: &Document, node: NodeId) -> Self {
        match doc.parent(node) {
            Some(parent) => Self::new(parent, doc.index(node) + 1),
            None => Self::new(node, doc.len(node)),
        }
    }
}

/// Content accepted by replacement operations: raw markup or nodes that
/// have already been built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Content {
    Html(String),
    Fragment(Fragment),
}

impl From<&str> for Content {
    fn from(markup: &str) -> Self {
        Content::Html(markup.to_string())
    }
}

impl From<String> for Content {
    fn from(markup: String) -> Self {
        Content::Html(markup)
    }
}

impl From<Fragment> for Content {
    fn from(fragment: Fragment) -> Self {
        Content::Fragment(fragment)
    }
}

impl From<Node> for Content {
    fn from(node: Node) -> Self {
        Content::Fragment(Fragment::from(node))
    }
}

/// A pair of boundaries with `start <= end` in document order.
///
/// Ranges are views into a [`Document`]: any mutation that shifts
/// offsets leaves them stale. Pin them with markers (see
/// [`crate::Selection::save`]) to carry them across edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    pub start: Boundary,
    pub end: Boundary,
}

impl Range {
    /// Builds a range from two boundaries in either order.
    pub fn new(doc: &Document, a: Boundary, b: Boundary) -> Self {
        match doc.compare_boundaries(a, b) {
            Ordering::Greater => Self { start: b, end: a },
            _ => Self { start: a, end: b },
        }
    }

    pub fn collapsed(at: Boundary) -> Self {
        Self { start: at, end: at }
    }

    pub fn select_node(doc: &Document, node: NodeId) -> Self {
        Self {
            start: Boundary::before(doc, node),
            end: Boundary::after(doc, node),
        }
    }

    pub fn select_node_contents(doc: &Document, node: NodeId) -> Self {
        Self {
            start: Boundary::new(node, 0),
            end: Boundary::new(node, doc.len(node)),
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    pub fn is_valid(&self, doc: &Document) -> bool {
        doc.is_valid_boundary(self.start)
            && doc.is_valid_boundary(self.end)
            && doc.compare_boundaries(self.start, self.end) != Ordering::Greater
    }

    pub fn common_ancestor(&self, doc: &Document) -> NodeId {
        doc.common_ancestor(self.start.node, self.end.node)
    }

    pub fn collapse(&mut self, to_start: bool) {
        if to_start {
            self.end = self.start;
        } else {
            self.start = self.end;
        }
    }

    pub fn collapse_after(&mut self, doc: &Document, node: NodeId) {
        *self = Self::collapsed(Boundary::after(doc, node));
    }

    /// True when some part of `node` lies strictly inside the range.
    pub fn intersects_node(&self, doc: &Document, node: NodeId) -> bool {
        let node_start = Boundary::new(node, 0);
        let node_end = Boundary::new(node, doc.len(node));
        doc.compare_boundaries(node_start, self.end) == Ordering::Less
            && doc.compare_boundaries(node_end, self.start) == Ordering::Greater
    }

    /// Detached copy of the spanned content. Partially selected elements
    /// are cloned shallowly around the part that is selected.
    pub fn clone_contents(&self, doc: &Document) -> Fragment {
        let ancestor = self.common_ancestor(doc);
        let start_key = boundary_key(doc, ancestor, self.start);
        let end_key = boundary_key(doc, ancestor, self.end);
        Fragment::new(clone_between(
            doc,
            ancestor,
            Some(&start_key),
            Some(&end_key),
        ))
    }

    pub fn to_html(&self, doc: &Document) -> String {
        self.clone_contents(doc).to_html()
    }

    pub fn text(&self, doc: &Document) -> String {
        self.clone_contents(doc).text()
    }

    /// Removes the spanned content and returns an owned copy of it. The
    /// removed nodes are freed from the document.
    pub fn extract_contents(&mut self, doc: &mut Document) -> Fragment {
        let nodes = self.extract_nodes(doc);
        let fragment = doc.export_nodes(&nodes);
        for node in nodes {
            doc.remove(node);
        }
        fragment
    }

    pub fn delete_contents(&mut self, doc: &mut Document) {
        for node in self.extract_nodes(doc) {
            doc.remove(node);
        }
    }

    /// Inserts detached nodes at the start boundary and collapses the
    /// range after the last of them.
    pub fn insert_nodes(&mut self, doc: &mut Document, nodes: &[NodeId]) {
        let (parent, index) = doc.insertion_point(self.start);
        for (ix, &node) in nodes.iter().enumerate() {
            doc.insert_at(parent, index + ix, node);
        }
        match nodes.last() {
            Some(&last) => self.collapse_after(doc, last),
            None => *self = Self::collapsed(Boundary::new(parent, index)),
        }
    }

    /// Discards the spanned content and puts `content` in its place.
    /// Returns the inserted top-level nodes.
    pub fn replace(&mut self, doc: &mut Document, content: &Content) -> Vec<NodeId> {
        self.delete_contents(doc);
        let nodes = doc.import_content(content);
        self.insert_nodes(doc, &nodes);
        nodes
    }

    /// Widens the range to enclose the nearest element around it that has
    /// some text, or the nearest element when none has.
    pub fn expand_to_parent(&mut self, doc: &Document) {
        self.expand_within(doc, doc.root());
    }

    /// Like [`Range::expand_to_parent`], but only elements strictly below
    /// `limit` qualify. Returns `false` and leaves the range alone when
    /// there is none.
    pub fn expand_within(&mut self, doc: &Document, limit: NodeId) -> bool {
        let ancestor = self.common_ancestor(doc);
        let candidates: Vec<NodeId> = std::iter::once(ancestor)
            .chain(doc.ancestors(ancestor))
            .take_while(|&id| id != limit && id != doc.root())
            .filter(|&id| doc.is_element(id))
            .collect();
        let target = candidates
            .iter()
            .find(|&&id| !doc.text_content(id).is_empty())
            .or(candidates.first());
        match target {
            Some(&target) => {
                *self = Self::select_node(doc, target);
                true
            }
            None => false,
        }
    }

    /// True when the common container is an element with nothing in it
    /// but markers and empty text.
    pub fn is_empty_tag(&self, doc: &Document) -> bool {
        let ancestor = self.common_ancestor(doc);
        ancestor != doc.root()
            && doc.is_element(ancestor)
            && doc
                .children(ancestor)
                .into_iter()
                .all(|child| doc.is_marker(child) || doc.text(child) == Some(""))
    }

    /// Removes the spanned nodes from the tree, splitting text and
    /// partially selected elements at the boundaries. Nodes outside the
    /// range keep their identity. The range collapses to where the
    /// content was.
    pub(crate) fn extract_nodes(&mut self, doc: &mut Document) -> Vec<NodeId> {
        if self.is_collapsed() {
            return Vec::new();
        }
        if self.start.node == self.end.node && doc.is_text(self.start.node) {
            let removed = doc.cut_text(self.start.node, self.start.offset, self.end.offset);
            self.collapse(true);
            if removed.is_empty() {
                return Vec::new();
            }
            return vec![doc.create_text(removed)];
        }

        let ancestor = self.common_ancestor(doc);
        let end_index = split_up_to(doc, self.end, ancestor, Keep::Right);
        let end_ref = doc.child_at(ancestor, end_index);
        let start_index = split_up_to(doc, self.start, ancestor, Keep::Left);
        let end_index = match end_ref {
            Some(node) => doc.index(node),
            None => doc.len(ancestor),
        };

        let removed: Vec<NodeId> = doc
            .children(ancestor)
            .into_iter()
            .skip(start_index)
            .take(end_index.saturating_sub(start_index))
            .collect();
        for &node in &removed {
            doc.detach(node);
        }
        *self = Self::collapsed(Boundary::new(ancestor, start_index));
        removed
    }

    /// Splits text at both boundaries and returns the text nodes that lie
    /// inside the range, in document order. The range is updated to start
    /// and end on those nodes.
    pub(crate) fn isolate_text_nodes(&mut self, doc: &mut Document) -> Vec<NodeId> {
        let same_node = self.start.node == self.end.node;
        if doc.is_text(self.end.node) && self.end.offset > 0 && self.end.offset < doc.len(self.end.node) {
            doc.split_off_right(self.end.node, self.end.offset);
        }
        if doc.is_text(self.start.node)
            && self.start.offset > 0
            && self.start.offset < doc.len(self.start.node)
        {
            let right = doc.split_off_right(self.start.node, self.start.offset);
            if same_node {
                self.end = Boundary::new(right, self.end.offset - self.start.offset);
            }
            self.start = Boundary::new(right, 0);
        }

        let ancestor = self.common_ancestor(doc);
        std::iter::once(ancestor)
            .chain(doc.descendants(ancestor))
            .filter(|&id| doc.is_text(id) && doc.len(id) > 0 && self.intersects_node(doc, id))
            .collect()
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum Keep {
    /// The part before the split point keeps the original node.
    Left,
    /// The part after the split point keeps the original node.
    Right,
}

/// Splits every node between `boundary` and `ancestor` so the boundary
/// falls between two children of `ancestor`. Returns that child index.
pub(crate) fn split_up_to(
    doc: &mut Document,
    boundary: Boundary,
    ancestor: NodeId,
    keep: Keep,
) -> usize {
    let (mut parent, mut index) = if boundary.node == ancestor {
        (boundary.node, boundary.offset)
    } else {
        doc.insertion_point(boundary)
    };
    while parent != ancestor {
        let Some(grandparent) = doc.parent(parent) else {
            break;
        };
        let position = doc.index(parent);
        index = if index == 0 {
            position
        } else if index >= doc.len(parent) {
            position + 1
        } else {
            match keep {
                Keep::Left => doc.split_off_right(parent, index),
                Keep::Right => doc.split_off_left(parent, index),
            };
            position + 1
        };
        parent = grandparent;
    }
    index
}

fn boundary_key(doc: &Document, ancestor: NodeId, boundary: Boundary) -> Vec<usize> {
    let mut key = doc.relative_path(ancestor, boundary.node);
    key.push(boundary.offset);
    key
}

fn clone_between(
    doc: &Document,
    node: NodeId,
    start: Option<&[usize]>,
    end: Option<&[usize]>,
) -> Vec<Node> {
    if let Some(text) = doc.text(node) {
        let from = start.and_then(|k| k.first().copied()).unwrap_or(0);
        let to = end.and_then(|k| k.first().copied()).unwrap_or(text.len());
        let slice = text.get(from..to.max(from)).unwrap_or_default();
        if slice.is_empty() {
            return Vec::new();
        }
        return vec![Node::Text(TextNode {
            text: slice.to_string(),
        })];
    }

    let children = doc.children(node);
    let (first, first_rest) = split_key(start, 0);
    let (last, last_rest) = split_key(end, children.len());

    let mut out = Vec::new();
    for (ix, &child) in children.iter().enumerate() {
        let starts_here = ix == first && first_rest.is_some();
        let ends_here = ix == last && last_rest.is_some();
        let inside = ix >= first && (ix < last || ends_here);
        if !inside {
            continue;
        }
        if starts_here || ends_here {
            let start = if starts_here { first_rest } else { None };
            let end = if ends_here { last_rest } else { None };
            out.extend(clone_partial(doc, child, start, end));
        } else if let Some(node) = doc.export(child) {
            out.push(node);
        }
    }
    out
}

fn clone_partial(
    doc: &Document,
    node: NodeId,
    start: Option<&[usize]>,
    end: Option<&[usize]>,
) -> Vec<Node> {
    let children = clone_between(doc, node, start, end);
    if doc.is_text(node) {
        return children;
    }
    match doc.export_shallow(node) {
        Some(mut shell) if !children.is_empty() => {
            shell.children = children;
            vec![Node::Element(shell)]
        }
        _ => Vec::new(),
    }
}

/// Splits a relative boundary key into the child index at this level and,
/// when the boundary lies deeper, the rest of the key.
fn split_key(key: Option<&[usize]>, default: usize) -> (usize, Option<&[usize]>) {
    match key {
        None | Some([]) => (default, None),
        Some([ix]) => (*ix, None),
        Some([ix, rest @ ..]) => (*ix, Some(rest)),
    }
}
