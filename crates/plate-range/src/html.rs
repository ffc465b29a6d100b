//! Markup <-> [`Fragment`] conversion. Parsing goes through `html5ever`
//! in fragment mode with a `body` context; serializing escapes with
//! `html-escape`.

use std::borrow::Cow;
use std::cell::RefCell;

use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::tree_builder::{ElemName, ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{Attribute, LocalName, Namespace, QualName};
use html5ever::{local_name, namespace_url, ns};
use indextree::{Arena, NodeId};
use tracing::trace;

use crate::node::{Attrs, ElementNode, Fragment, Node, TextNode};

const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

pub fn is_void_tag(tag: &str) -> bool {
    VOID_TAGS.iter().any(|void| void.eq_ignore_ascii_case(tag))
}

/// Parses markup the way a browser parses `body.innerHTML`: implied end
/// tags are generated, misnested formatting is repaired, and comments,
/// doctypes and processing instructions are dropped.
pub fn parse_fragment(markup: &str) -> Fragment {
    let context = QualName::new(None, ns!(html), local_name!("body"));
    html5ever::parse_fragment(FragmentSink::new(), Default::default(), context, Vec::new())
        .one(StrTendril::from(markup))
}

#[derive(Debug)]
enum Parsed {
    Document,
    Element { name: QualName, attrs: Attrs },
    Text(StrTendril),
    Comment,
}

#[derive(Debug, Clone)]
struct OwnedElemName(QualName);

impl ElemName for OwnedElemName {
    fn ns(&self) -> &Namespace {
        &self.0.ns
    }

    fn local_name(&self) -> &LocalName {
        &self.0.local
    }
}

struct FragmentSink {
    arena: RefCell<Arena<Parsed>>,
    document: NodeId,
}

impl FragmentSink {
    fn new() -> Self {
        let mut arena = Arena::new();
        let document = arena.new_node(Parsed::Document);
        Self {
            arena: RefCell::new(arena),
            document,
        }
    }

    fn new_text(&self, text: StrTendril) -> NodeId {
        self.arena.borrow_mut().new_node(Parsed::Text(text))
    }
}

impl TreeSink for FragmentSink {
    type Handle = NodeId;
    type Output = Fragment;
    type ElemName<'a>
        = OwnedElemName
    where
        Self: 'a;

    fn finish(self) -> Fragment {
        let arena = self.arena.into_inner();
        // Fragment content ends up under a synthetic `html` element.
        let top = self
            .document
            .children(&arena)
            .find(|&id| matches!(arena[id].get(), Parsed::Element { .. }))
            .unwrap_or(self.document);
        Fragment::new(convert_children(&arena, top))
    }

    fn parse_error(&self, msg: Cow<'static, str>) {
        trace!(%msg, "recovered from markup error");
    }

    fn get_document(&self) -> NodeId {
        self.document
    }

    fn set_quirks_mode(&self, _mode: QuirksMode) {}

    fn same_node(&self, a: &NodeId, b: &NodeId) -> bool {
        a == b
    }

    fn elem_name<'a>(&'a self, target: &'a NodeId) -> OwnedElemName {
        match self.arena.borrow()[*target].get() {
            Parsed::Element { name, .. } => OwnedElemName(name.clone()),
            _ => OwnedElemName(QualName::new(None, ns!(html), local_name!(""))),
        }
    }

    fn create_element(&self, name: QualName, attrs: Vec<Attribute>, _flags: ElementFlags) -> NodeId {
        let attrs = attrs
            .into_iter()
            .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
            .collect();
        self.arena
            .borrow_mut()
            .new_node(Parsed::Element { name, attrs })
    }

    fn create_comment(&self, _text: StrTendril) -> NodeId {
        self.arena.borrow_mut().new_node(Parsed::Comment)
    }

    fn create_pi(&self, _target: StrTendril, _data: StrTendril) -> NodeId {
        self.arena.borrow_mut().new_node(Parsed::Comment)
    }

    fn append(&self, parent: &NodeId, child: NodeOrText<NodeId>) {
        match child {
            NodeOrText::AppendNode(node) => parent.append(node, &mut self.arena.borrow_mut()),
            NodeOrText::AppendText(text) => {
                let mut arena = self.arena.borrow_mut();
                if let Some(last) = parent.children(&arena).last() {
                    if let Parsed::Text(existing) = arena[last].get_mut() {
                        existing.push_tendril(&text);
                        return;
                    }
                }
                let node = arena.new_node(Parsed::Text(text));
                parent.append(node, &mut arena);
            }
        }
    }

    fn append_before_sibling(&self, sibling: &NodeId, new_node: NodeOrText<NodeId>) {
        let node = match new_node {
            NodeOrText::AppendNode(node) => node,
            NodeOrText::AppendText(text) => self.new_text(text),
        };
        sibling.insert_before(node, &mut self.arena.borrow_mut());
    }

    fn append_based_on_parent_node(
        &self,
        element: &NodeId,
        prev_element: &NodeId,
        child: NodeOrText<NodeId>,
    ) {
        let has_parent = self.arena.borrow()[*element].parent().is_some();
        if has_parent {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(
        &self,
        _name: StrTendril,
        _public_id: StrTendril,
        _system_id: StrTendril,
    ) {
    }

    fn get_template_contents(&self, target: &NodeId) -> NodeId {
        *target
    }

    fn add_attrs_if_missing(&self, target: &NodeId, attrs: Vec<Attribute>) {
        let mut arena = self.arena.borrow_mut();
        if let Parsed::Element { attrs: existing, .. } = arena[*target].get_mut() {
            for attr in attrs {
                existing
                    .entry(attr.name.local.to_string())
                    .or_insert_with(|| attr.value.to_string());
            }
        }
    }

    fn remove_from_parent(&self, target: &NodeId) {
        target.detach(&mut self.arena.borrow_mut());
    }

    fn reparent_children(&self, node: &NodeId, new_parent: &NodeId) {
        let mut arena = self.arena.borrow_mut();
        let children: Vec<NodeId> = node.children(&arena).collect();
        for child in children {
            child.detach(&mut arena);
            new_parent.append(child, &mut arena);
        }
    }
}

/// Owned nodes for the children of `parent`. Comments vanish and the
/// text on either side of them is joined.
fn convert_children(arena: &Arena<Parsed>, parent: NodeId) -> Vec<Node> {
    let mut nodes: Vec<Node> = Vec::new();
    for child in parent.children(arena) {
        let node = match arena[child].get() {
            Parsed::Element { name, attrs } => Node::Element(ElementNode {
                tag: name.local.to_string(),
                attrs: attrs.clone(),
                children: convert_children(arena, child),
            }),
            Parsed::Text(text) => Node::Text(TextNode {
                text: text.to_string(),
            }),
            Parsed::Document | Parsed::Comment => continue,
        };
        if let (Node::Text(text), Some(Node::Text(last))) = (&node, nodes.last_mut()) {
            last.text.push_str(&text.text);
            continue;
        }
        nodes.push(node);
    }
    nodes
}

pub fn serialize(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        write_node(&mut out, node);
    }
    out
}

fn write_node(out: &mut String, node: &Node) {
    match node {
        Node::Text(t) => out.push_str(&html_escape::encode_text(&t.text)),
        Node::Element(el) => {
            out.push('<');
            out.push_str(&el.tag);
            for (name, value) in &el.attrs {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                out.push_str(&html_escape::encode_double_quoted_attribute(value));
                out.push('"');
            }
            out.push('>');
            if is_void_tag(&el.tag) {
                return;
            }
            for child in &el.children {
                write_node(out, child);
            }
            out.push_str("</");
            out.push_str(&el.tag);
            out.push('>');
        }
    }
}
