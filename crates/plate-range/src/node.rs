use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::html;

pub type Attrs = BTreeMap<String, String>;

/// A detached node, owned outright. Fragments handed out by range
/// extraction and cloning are built from these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum Node {
    Element(ElementNode),
    Text(TextNode),
}

impl Node {
    pub fn element(tag: impl Into<String>, children: Vec<Node>) -> Self {
        Node::Element(ElementNode {
            tag: tag.into(),
            attrs: Attrs::default(),
            children,
        })
    }

    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(TextNode { text: text.into() })
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.push_text(&mut out);
        out
    }

    fn push_text(&self, out: &mut String) {
        match self {
            Node::Text(t) => out.push_str(&t.text),
            Node::Element(el) => {
                for child in &el.children {
                    child.push_text(out);
                }
            }
        }
    }

    /// True when the node renders nothing: no characters and no void
    /// elements such as `<br>` or `<img>` anywhere inside it.
    pub fn is_blank(&self) -> bool {
        match self {
            Node::Text(t) => t.text.is_empty(),
            Node::Element(el) => {
                !html::is_void_tag(&el.tag) && el.children.iter().all(Node::is_blank)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementNode {
    pub tag: String,
    #[serde(default)]
    pub attrs: Attrs,
    #[serde(default)]
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextNode {
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fragment {
    pub nodes: Vec<Node>,
}

impl Fragment {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    pub fn parse(markup: &str) -> Self {
        html::parse_fragment(markup)
    }

    pub fn to_html(&self) -> String {
        html::serialize(&self.nodes)
    }

    pub fn text(&self) -> String {
        self.nodes.iter().map(Node::text_content).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn extend(&mut self, other: Fragment) {
        self.nodes.extend(other.nodes);
    }

    /// Drops top-level nodes that render nothing.
    pub fn without_blank_nodes(mut self) -> Self {
        self.nodes.retain(|node| !node.is_blank());
        self
    }

    pub fn into_nodes(self) -> Vec<Node> {
        self.nodes
    }
}

impl From<Vec<Node>> for Fragment {
    fn from(nodes: Vec<Node>) -> Self {
        Self::new(nodes)
    }
}

impl From<Node> for Fragment {
    fn from(node: Node) -> Self {
        Self::new(vec![node])
    }
}
