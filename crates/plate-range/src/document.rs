use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use indextree::{Arena, NodeId};

use crate::config::EditorConfig;
use crate::node::{Attrs, ElementNode, Fragment, Node, TextNode};
use crate::range::{Boundary, Content};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerId(u64);

#[derive(Debug, Clone, PartialEq)]
pub struct ElementData {
    pub tag: String,
    pub attrs: Attrs,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Invisible container of the top-level content.
    Root,
    Element(ElementData),
    Text(String),
    /// Zero-width placeholder that pins a boundary across edits. Never
    /// serialized and never exported into fragments.
    Marker(MarkerId),
}

/// The live, mutable tree. Nodes live in an arena and keep their
/// [`NodeId`] while they exist: a detached node stays in the arena until
/// [`Document::remove`] frees it. Ids of freed nodes stop resolving, so
/// [`Document::kind`] returns `None` for them.
#[derive(Debug, Clone)]
pub struct Document {
    arena: Arena<NodeKind>,
    root: NodeId,
    inline_tags: BTreeSet<String>,
    markers: HashMap<MarkerId, NodeId>,
    next_marker: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self::with_config(&EditorConfig::default().with_defaults())
    }

    pub fn with_config(config: &EditorConfig) -> Self {
        let mut arena = Arena::new();
        let root = arena.new_node(NodeKind::Root);
        Self {
            arena,
            root,
            inline_tags: config
                .inline_tags
                .iter()
                .map(|tag| tag.to_ascii_lowercase())
                .collect(),
            markers: HashMap::new(),
            next_marker: 0,
        }
    }

    pub fn parse(markup: &str) -> Self {
        let mut doc = Self::new();
        doc.append_html(doc.root, markup);
        doc
    }

    pub fn parse_with_config(markup: &str, config: &EditorConfig) -> Self {
        let mut doc = Self::with_config(config);
        doc.append_html(doc.root, markup);
        doc
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.node(id).map(|node| node.get())
    }

    fn node(&self, id: NodeId) -> Option<&indextree::Node<NodeKind>> {
        self.arena.get(id).filter(|_| !id.is_removed(&self.arena))
    }

    fn is_live(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Nodes currently held by the arena, attached or not.
    pub fn node_count(&self) -> usize {
        self.arena.iter().filter(|node| !node.is_removed()).count()
    }

    pub fn is_text(&self, id: NodeId) -> bool {
        matches!(self.kind(id), Some(NodeKind::Text(_)))
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.kind(id), Some(NodeKind::Element(_)))
    }

    pub fn is_marker(&self, id: NodeId) -> bool {
        matches!(self.kind(id), Some(NodeKind::Marker(_)))
    }

    /// Elements and the root: the nodes whose offsets count children.
    pub fn is_container(&self, id: NodeId) -> bool {
        matches!(
            self.kind(id),
            Some(NodeKind::Element(_)) | Some(NodeKind::Root)
        )
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match self.kind(id)? {
            NodeKind::Element(el) => Some(&el.tag),
            _ => None,
        }
    }

    pub fn attrs(&self, id: NodeId) -> Option<&Attrs> {
        match self.kind(id)? {
            NodeKind::Element(el) => Some(&el.attrs),
            _ => None,
        }
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.attrs(id)?.get(name).map(String::as_str)
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        if let Some(el) = self.element_mut(id) {
            el.attrs.insert(name.to_string(), value.into());
        }
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) -> Option<String> {
        self.element_mut(id)?.attrs.remove(name)
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        match self.kind(id)? {
            NodeKind::Text(text) => Some(text),
            _ => None,
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        if !self.is_live(id) {
            return None;
        }
        match self.arena.get_mut(id)?.get_mut() {
            NodeKind::Element(el) => Some(el),
            _ => None,
        }
    }

    fn text_mut(&mut self, id: NodeId) -> Option<&mut String> {
        if !self.is_live(id) {
            return None;
        }
        match self.arena.get_mut(id)?.get_mut() {
            NodeKind::Text(text) => Some(text),
            _ => None,
        }
    }

    // Navigation

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.parent()
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.next_sibling()
    }

    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.previous_sibling()
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        if !self.is_live(id) {
            return Vec::new();
        }
        id.children(&self.arena).collect()
    }

    pub fn child_at(&self, id: NodeId, index: usize) -> Option<NodeId> {
        id.children(&self.arena).nth(index)
    }

    /// Position of `id` among its siblings.
    pub fn index(&self, id: NodeId) -> usize {
        id.preceding_siblings(&self.arena).count().saturating_sub(1)
    }

    /// Ancestors from the parent upward, ending at the root when attached.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        if !self.is_live(id) {
            return Vec::new();
        }
        id.ancestors(&self.arena).skip(1).collect()
    }

    /// Descendants in document order, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        if !self.is_live(id) {
            return Vec::new();
        }
        id.descendants(&self.arena).skip(1).collect()
    }

    /// Byte length for text, child count for containers, zero for markers.
    pub fn len(&self, id: NodeId) -> usize {
        match self.kind(id) {
            Some(NodeKind::Text(text)) => text.len(),
            Some(NodeKind::Marker(_)) | None => 0,
            Some(NodeKind::Element(_)) | Some(NodeKind::Root) => id.children(&self.arena).count(),
        }
    }

    pub fn is_attached(&self, id: NodeId) -> bool {
        self.is_live(id) && id.ancestors(&self.arena).last() == Some(self.root)
    }

    /// True when `node` is `ancestor` or lies somewhere below it.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.is_live(node) && node.ancestors(&self.arena).any(|id| id == ancestor)
    }

    /// Nearest element (or the root) at or above `id`.
    pub fn closest_element(&self, id: NodeId) -> NodeId {
        id.ancestors(&self.arena)
            .find(|&ancestor| self.is_container(ancestor))
            .unwrap_or(self.root)
    }

    pub fn common_ancestor(&self, a: NodeId, b: NodeId) -> NodeId {
        let above_a: Vec<NodeId> = a.ancestors(&self.arena).collect();
        b.ancestors(&self.arena)
            .find(|id| above_a.contains(id))
            .unwrap_or(self.root)
    }

    pub fn is_inline(&self, id: NodeId) -> bool {
        match self.kind(id) {
            Some(NodeKind::Text(_)) | Some(NodeKind::Marker(_)) => true,
            Some(NodeKind::Element(el)) => self.inline_tags.contains(&el.tag),
            Some(NodeKind::Root) | None => false,
        }
    }

    pub fn is_block(&self, id: NodeId) -> bool {
        self.is_element(id) && !self.is_inline(id)
    }

    /// Child-index path from the root. Markers are not counted, so a
    /// path stays the same while a selection is saved. `None` for
    /// detached nodes and for markers.
    pub fn path_of(&self, id: NodeId) -> Option<Vec<usize>> {
        if !self.is_attached(id) || self.is_marker(id) {
            return None;
        }
        let mut path: Vec<usize> = id
            .ancestors(&self.arena)
            .take_while(|&node| node != self.root)
            .map(|node| {
                node.preceding_siblings(&self.arena)
                    .skip(1)
                    .filter(|&sibling| !self.is_marker(sibling))
                    .count()
            })
            .collect();
        path.reverse();
        Some(path)
    }

    /// Resolves a [`Document::path_of`] path. Markers are skipped.
    pub fn node_at_path(&self, path: &[usize]) -> Option<NodeId> {
        path.iter().try_fold(self.root, |node, &index| {
            node.children(&self.arena)
                .filter(|&child| !self.is_marker(child))
                .nth(index)
        })
    }

    pub(crate) fn relative_path(&self, ancestor: NodeId, node: NodeId) -> Vec<usize> {
        let mut path: Vec<usize> = node
            .ancestors(&self.arena)
            .take_while(|&id| id != ancestor)
            .map(|id| self.index(id))
            .collect();
        path.reverse();
        path
    }

    /// Document-order comparison. A position between two children sorts
    /// before anything inside the child that follows it.
    pub fn compare_boundaries(&self, a: Boundary, b: Boundary) -> Ordering {
        self.boundary_key(a).cmp(&self.boundary_key(b))
    }

    fn boundary_key(&self, boundary: Boundary) -> Vec<usize> {
        let mut key = self.relative_path(self.root, boundary.node);
        key.push(boundary.offset);
        key
    }

    pub fn is_valid_boundary(&self, boundary: Boundary) -> bool {
        !self.is_marker(boundary.node)
            && self.is_attached(boundary.node)
            && boundary.offset <= self.len(boundary.node)
    }

    // Mutation

    pub fn create_element(&mut self, tag: &str, attrs: Attrs) -> NodeId {
        self.arena.new_node(NodeKind::Element(ElementData {
            tag: tag.to_ascii_lowercase(),
            attrs,
        }))
    }

    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.arena.new_node(NodeKind::Text(text.into()))
    }

    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        child.detach(&mut self.arena);
        parent.append(child, &mut self.arena);
    }

    pub fn insert_at(&mut self, parent: NodeId, index: usize, child: NodeId) {
        child.detach(&mut self.arena);
        match self.child_at(parent, index) {
            Some(reference) => reference.insert_before(child, &mut self.arena),
            None => parent.append(child, &mut self.arena),
        }
    }

    pub fn insert_before(&mut self, reference: NodeId, node: NodeId) {
        node.detach(&mut self.arena);
        reference.insert_before(node, &mut self.arena);
    }

    pub fn insert_after(&mut self, reference: NodeId, node: NodeId) {
        node.detach(&mut self.arena);
        reference.insert_after(node, &mut self.arena);
    }

    pub fn detach(&mut self, id: NodeId) {
        id.detach(&mut self.arena);
    }

    /// Detaches `id` and frees it along with its subtree.
    pub fn remove(&mut self, id: NodeId) {
        if self.is_live(id) {
            id.remove_subtree(&mut self.arena);
        }
    }

    /// Puts `nodes` where `old` was and removes `old`.
    pub fn replace(&mut self, old: NodeId, nodes: &[NodeId]) {
        for &node in nodes {
            self.insert_before(old, node);
        }
        self.remove(old);
    }

    pub fn wrap(&mut self, node: NodeId, tag: &str, attrs: Attrs) -> NodeId {
        let wrapper = self.create_element(tag, attrs);
        self.insert_before(node, wrapper);
        self.append(wrapper, node);
        wrapper
    }

    /// Moves every child of `parent` into a new `tag` element, which
    /// becomes the only child.
    pub fn wrap_inner(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let wrapper = self.create_element(tag, Attrs::default());
        for child in self.children(parent) {
            self.append(wrapper, child);
        }
        self.append(parent, wrapper);
        wrapper
    }

    /// Replaces an element with its children and frees the element.
    /// Returns the moved children.
    pub fn unwrap(&mut self, id: NodeId) -> Vec<NodeId> {
        let children = self.children(id);
        for &child in &children {
            self.insert_before(id, child);
        }
        self.remove(id);
        children
    }

    /// Joins runs of adjacent text children of `parent` into their first
    /// node and frees empty text children.
    pub fn merge_adjacent_text(&mut self, parent: NodeId) {
        let mut previous: Option<NodeId> = None;
        for child in self.children(parent) {
            if !self.is_text(child) {
                previous = None;
                continue;
            }
            match previous {
                Some(prev) => self.merge_text_tracking(prev, child, &mut []),
                None if self.len(child) == 0 => self.remove(child),
                None => previous = Some(child),
            }
        }
    }

    /// Changes an element's tag in place, keeping attributes, children
    /// and identity.
    pub fn rename(&mut self, id: NodeId, tag: &str) -> bool {
        match self.element_mut(id) {
            Some(el) => {
                el.tag = tag.to_ascii_lowercase();
                true
            }
            None => false,
        }
    }

    /// Splits a text node at `offset`; the original keeps the head and
    /// the returned node, inserted right after it, holds the tail.
    pub fn split_text(&mut self, id: NodeId, offset: usize) -> Option<NodeId> {
        if !self.is_text(id) {
            return None;
        }
        Some(self.split_off_right(id, offset))
    }

    /// Splits `id` at `offset`. The original keeps everything before the
    /// offset; a new sibling after it receives the rest.
    pub(crate) fn split_off_right(&mut self, id: NodeId, offset: usize) -> NodeId {
        let sibling = self.shallow_copy(id, offset, SplitSide::Right);
        self.insert_after(id, sibling);
        if self.is_container(id) {
            for child in self.children(id).into_iter().skip(offset) {
                self.append(sibling, child);
            }
        }
        sibling
    }

    /// Splits `id` at `offset`. The original keeps everything from the
    /// offset on; a new sibling before it receives the head.
    pub(crate) fn split_off_left(&mut self, id: NodeId, offset: usize) -> NodeId {
        let sibling = self.shallow_copy(id, offset, SplitSide::Left);
        self.insert_before(id, sibling);
        if self.is_container(id) {
            for child in self.children(id).into_iter().take(offset) {
                self.append(sibling, child);
            }
        }
        sibling
    }

    fn shallow_copy(&mut self, id: NodeId, offset: usize, side: SplitSide) -> NodeId {
        if let Some(text) = self.text_mut(id) {
            let at = clamp_to_char_boundary(text, offset);
            let moved = match side {
                SplitSide::Right => text.split_off(at),
                SplitSide::Left => {
                    let tail = text.split_off(at);
                    std::mem::replace(text, tail)
                }
            };
            return self.create_text(moved);
        }
        let kind = match self.kind(id) {
            Some(NodeKind::Element(el)) => NodeKind::Element(ElementData {
                tag: el.tag.clone(),
                attrs: el.attrs.clone(),
            }),
            _ => NodeKind::Element(ElementData {
                tag: "span".to_string(),
                attrs: Attrs::default(),
            }),
        };
        self.arena.new_node(kind)
    }

    /// Removes `[start, end)` from a text node and returns the removed text.
    pub(crate) fn cut_text(&mut self, id: NodeId, start: usize, end: usize) -> String {
        let Some(text) = self.text_mut(id) else {
            return String::new();
        };
        let start = clamp_to_char_boundary(text, start);
        let end = clamp_to_char_boundary(text, end.max(start));
        text.drain(start..end).collect()
    }

    /// Resolves a boundary to a `(container, child index)` slot, splitting
    /// a text node when the boundary falls inside it.
    pub fn insertion_point(&mut self, boundary: Boundary) -> (NodeId, usize) {
        if !self.is_text(boundary.node) {
            let offset = boundary.offset.min(self.len(boundary.node));
            return (boundary.node, offset);
        }
        let Some(parent) = self.parent(boundary.node) else {
            return (self.root, self.len(self.root));
        };
        let index = self.index(boundary.node);
        if boundary.offset == 0 {
            (parent, index)
        } else if boundary.offset >= self.len(boundary.node) {
            (parent, index + 1)
        } else {
            self.split_off_right(boundary.node, boundary.offset);
            (parent, index + 1)
        }
    }

    // Fragments and markup

    /// Builds a detached copy of `node` inside the arena.
    pub fn import(&mut self, node: &Node) -> NodeId {
        match node {
            Node::Text(t) => self.create_text(t.text.clone()),
            Node::Element(el) => {
                let id = self.create_element(&el.tag, el.attrs.clone());
                for child in &el.children {
                    let child = self.import(child);
                    self.append(id, child);
                }
                id
            }
        }
    }

    pub fn import_fragment(&mut self, fragment: &Fragment) -> Vec<NodeId> {
        fragment.nodes.iter().map(|node| self.import(node)).collect()
    }

    pub fn import_content(&mut self, content: &Content) -> Vec<NodeId> {
        match content {
            Content::Html(markup) => self.import_fragment(&Fragment::parse(markup)),
            Content::Fragment(fragment) => self.import_fragment(fragment),
        }
    }

    pub fn append_html(&mut self, parent: NodeId, markup: &str) -> Vec<NodeId> {
        let nodes = self.import_fragment(&Fragment::parse(markup));
        for &node in &nodes {
            self.append(parent, node);
        }
        nodes
    }

    /// Owned copy of the subtree at `id`. Markers are skipped; the root
    /// and markers themselves export as `None`.
    pub fn export(&self, id: NodeId) -> Option<Node> {
        match self.kind(id)? {
            NodeKind::Text(text) => Some(Node::Text(TextNode { text: text.clone() })),
            NodeKind::Element(el) => Some(Node::Element(ElementNode {
                tag: el.tag.clone(),
                attrs: el.attrs.clone(),
                children: self.export_children(id).into_nodes(),
            })),
            NodeKind::Root | NodeKind::Marker(_) => None,
        }
    }

    pub(crate) fn export_shallow(&self, id: NodeId) -> Option<ElementNode> {
        match self.kind(id)? {
            NodeKind::Element(el) => Some(ElementNode {
                tag: el.tag.clone(),
                attrs: el.attrs.clone(),
                children: Vec::new(),
            }),
            _ => None,
        }
    }

    pub fn export_children(&self, id: NodeId) -> Fragment {
        self.export_nodes(&self.children(id))
    }

    pub fn export_nodes(&self, ids: &[NodeId]) -> Fragment {
        Fragment::new(ids.iter().filter_map(|&id| self.export(id)).collect())
    }

    pub fn to_html(&self) -> String {
        self.inner_html(self.root)
    }

    pub fn inner_html(&self, id: NodeId) -> String {
        self.export_children(id).to_html()
    }

    pub fn outer_html(&self, id: NodeId) -> String {
        match self.export(id) {
            Some(node) => Fragment::from(node).to_html(),
            None => self.inner_html(id),
        }
    }

    pub fn text_content(&self, id: NodeId) -> String {
        id.descendants(&self.arena)
            .filter_map(|node| self.text(node))
            .collect()
    }

    // Classes and inline styles

    pub fn classes(&self, id: NodeId) -> Vec<&str> {
        self.attr(id, "class")
            .map(|classes| classes.split_whitespace().collect())
            .unwrap_or_default()
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.classes(id).contains(&class)
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) {
        if self.has_class(id, class) {
            return;
        }
        let mut classes: Vec<String> = self.classes(id).into_iter().map(String::from).collect();
        classes.push(class.to_string());
        self.set_attr(id, "class", classes.join(" "));
    }

    pub fn remove_class(&mut self, id: NodeId, class: &str) {
        if !self.has_class(id, class) {
            return;
        }
        let classes: Vec<String> = self
            .classes(id)
            .into_iter()
            .filter(|c| *c != class)
            .map(String::from)
            .collect();
        if classes.is_empty() {
            self.remove_attr(id, "class");
        } else {
            self.set_attr(id, "class", classes.join(" "));
        }
    }

    pub fn style_property(&self, id: NodeId, property: &str) -> Option<String> {
        parse_style(self.attr(id, "style")?)
            .into_iter()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value)
    }

    pub fn set_style_property(&mut self, id: NodeId, property: &str, value: &str) {
        let mut declarations = self.attr(id, "style").map(parse_style).unwrap_or_default();
        match declarations.iter_mut().find(|(name, _)| name == property) {
            Some(declaration) => declaration.1 = value.to_string(),
            None => declarations.push((property.to_string(), value.to_string())),
        }
        self.set_attr(id, "style", write_style(&declarations));
    }

    pub fn remove_style_property(&mut self, id: NodeId, property: &str) {
        let Some(style) = self.attr(id, "style") else {
            return;
        };
        let declarations: Vec<(String, String)> = parse_style(style)
            .into_iter()
            .filter(|(name, _)| name != property)
            .collect();
        if declarations.is_empty() {
            self.remove_attr(id, "style");
        } else {
            self.set_attr(id, "style", write_style(&declarations));
        }
    }

    // Markers

    /// Pins each boundary with a marker node. Insertion runs back to front
    /// so earlier boundaries stay valid while later ones split text;
    /// boundaries at the same spot keep their input order.
    pub fn insert_markers(&mut self, boundaries: &[Boundary]) -> Vec<MarkerId> {
        let mut order: Vec<usize> = (0..boundaries.len()).collect();
        order.sort_by(|&a, &b| {
            self.compare_boundaries(boundaries[b], boundaries[a])
                .then(b.cmp(&a))
        });

        let mut markers = vec![MarkerId(0); boundaries.len()];
        for ix in order {
            let (parent, index) = self.insertion_point(boundaries[ix]);
            let marker = MarkerId(self.next_marker);
            self.next_marker += 1;
            let node = self.arena.new_node(NodeKind::Marker(marker));
            self.insert_at(parent, index, node);
            self.markers.insert(marker, node);
            markers[ix] = marker;
        }
        markers
    }

    /// The marker's node, if it is still in the document.
    pub fn marker_node(&self, marker: MarkerId) -> Option<NodeId> {
        let node = *self.markers.get(&marker)?;
        self.is_attached(node).then_some(node)
    }

    /// Removes a marker and returns the boundary it stood for. Text split
    /// apart by the marker is joined again, and `tracked` boundaries are
    /// rewritten to survive the join. `None` when an edit removed the
    /// marker from the document. The marker node is freed either way.
    pub fn take_marker(&mut self, marker: MarkerId, tracked: &mut [Boundary]) -> Option<Boundary> {
        let node = self.markers.remove(&marker)?;
        if !self.is_attached(node) {
            self.remove(node);
            return None;
        }
        let parent = self.parent(node)?;
        let index = self.index(node);
        let prev = self.previous_sibling(node).filter(|&id| self.is_text(id));
        let next = self.next_sibling(node).filter(|&id| self.is_text(id));
        self.detach_tracking(node, tracked);
        self.remove(node);

        let boundary = match (prev, next) {
            (Some(prev), Some(next)) => {
                let len = self.len(prev);
                self.merge_text_tracking(prev, next, tracked);
                Boundary::new(prev, len)
            }
            (Some(prev), None) => Boundary::new(prev, self.len(prev)),
            (None, Some(next)) => Boundary::new(next, 0),
            (None, None) => Boundary::new(parent, index),
        };
        Some(boundary)
    }

    fn detach_tracking(&mut self, id: NodeId, tracked: &mut [Boundary]) {
        if let Some(parent) = self.parent(id) {
            let index = self.index(id);
            for boundary in tracked.iter_mut() {
                if boundary.node == parent && boundary.offset > index {
                    boundary.offset -= 1;
                }
            }
        }
        self.detach(id);
    }

    fn merge_text_tracking(&mut self, left: NodeId, right: NodeId, tracked: &mut [Boundary]) {
        let len = self.len(left);
        let tail = self.text(right).unwrap_or_default().to_string();
        if let Some(text) = self.text_mut(left) {
            text.push_str(&tail);
        }
        for boundary in tracked.iter_mut() {
            if boundary.node == right {
                *boundary = Boundary::new(left, len + boundary.offset);
            }
        }
        self.detach_tracking(right, tracked);
        self.remove(right);
    }
}

#[derive(Clone, Copy)]
enum SplitSide {
    Left,
    Right,
}

fn clamp_to_char_boundary(s: &str, mut ix: usize) -> usize {
    ix = ix.min(s.len());
    while ix > 0 && !s.is_char_boundary(ix) {
        ix -= 1;
    }
    ix
}

fn parse_style(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|declaration| {
            let (name, value) = declaration.split_once(':')?;
            let name = name.trim().to_ascii_lowercase();
            if name.is_empty() {
                return None;
            }
            Some((name, value.trim().to_string()))
        })
        .collect()
}

fn write_style(declarations: &[(String, String)]) -> String {
    declarations
        .iter()
        .map(|(name, value)| format!("{name}: {value};"))
        .collect::<Vec<_>>()
        .join(" ")
}
