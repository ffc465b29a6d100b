use indextree::NodeId;

use crate::args::{check_class_names, check_container, check_tag_name};
use crate::document::Document;
use crate::editor::Editor;
use crate::error::ArgError;

/// Nearest block at or above `node`, looking no higher than just below
/// `limit`.
pub fn closest_block(doc: &Document, node: NodeId, limit: NodeId) -> Option<NodeId> {
    let root = doc.root();
    std::iter::once(node)
        .chain(doc.ancestors(node))
        .take_while(|&id| id != limit && id != root)
        .find(|&id| doc.is_block(id))
}

/// Blocks from `start` to `end` in document order. Blocks that contain
/// `end` are entered rather than collected.
fn blocks_between(doc: &Document, start: NodeId, end: NodeId, limit: NodeId) -> Vec<NodeId> {
    let mut blocks = vec![start];
    if start == end {
        return blocks;
    }
    if doc.contains(start, end) {
        blocks.push(end);
        return blocks;
    }

    let mut next = next_in_order(doc, start, limit);
    while let Some(node) = next {
        if node == end {
            blocks.push(end);
            break;
        }
        if doc.contains(node, end) {
            next = doc.child_at(node, 0);
            continue;
        }
        if doc.is_block(node) {
            blocks.push(node);
        }
        next = next_in_order(doc, node, limit);
    }
    blocks
}

/// The node after `node` once its subtree is skipped, staying inside `limit`.
pub(crate) fn next_in_order(doc: &Document, node: NodeId, limit: NodeId) -> Option<NodeId> {
    let mut current = node;
    loop {
        if let Some(sibling) = doc.next_sibling(current) {
            return Some(sibling);
        }
        current = doc.parent(current)?;
        if current == limit || current == doc.root() {
            return None;
        }
    }
}

impl Editor {
    /// Calls `f` on every block the selection touches inside `limit`. A
    /// range with no block around one of its ends gets the contents of
    /// `limit` wrapped in a new `wrapper_tag` element, and `f` sees that.
    pub fn each_block(
        &mut self,
        limit: NodeId,
        wrapper_tag: &str,
        mut f: impl FnMut(&mut Document, NodeId),
    ) -> Result<(), ArgError> {
        let limit = check_container(self.doc(), limit)?;
        let wrapper_tag = check_tag_name(wrapper_tag)?;

        self.for_each_range(|doc, range| {
            let start = closest_block(doc, range.start.node, limit);
            let end = closest_block(doc, range.end.node, limit);
            match (start, end) {
                (Some(start), Some(end)) => {
                    for block in blocks_between(doc, start, end, limit) {
                        f(doc, block);
                    }
                }
                _ => {
                    tracing::debug!(tag = %wrapper_tag, "no block around range; wrapping limit contents");
                    let wrapper = doc.wrap_inner(limit, &wrapper_tag);
                    f(doc, wrapper);
                }
            }
        });
        Ok(())
    }

    /// Toggles inline style properties on the block around each range.
    /// A property is removed when every block already has that value,
    /// and set on all of them otherwise. Returns the blocks touched.
    pub fn toggle_block_style(
        &mut self,
        styles: &[(&str, &str)],
        limit: NodeId,
    ) -> Result<Vec<NodeId>, ArgError> {
        let limit = check_container(self.doc(), limit)?;
        if styles.is_empty() {
            return Ok(Vec::new());
        }
        let default_tag = self.config().default_block_tag.clone();

        let mut blocks: Vec<NodeId> = Vec::new();
        self.for_each_range(|doc, range| {
            let block = match closest_block(doc, range.common_ancestor(doc), limit) {
                Some(block) => block,
                None if doc.is_inline(limit) => {
                    tracing::debug!("limit is inline; no block to style");
                    return;
                }
                None => {
                    tracing::debug!(tag = %default_tag, "no block around range; wrapping limit contents");
                    doc.wrap_inner(limit, &default_tag)
                }
            };
            if !blocks.contains(&block) {
                blocks.push(block);
            }
        });

        let doc = self.doc_mut();
        for &(property, value) in styles {
            let present = blocks
                .iter()
                .all(|&block| doc.style_property(block, property).as_deref() == Some(value));
            for &block in &blocks {
                if present {
                    doc.remove_style_property(block, property);
                } else {
                    doc.set_style_property(block, property, value);
                }
            }
        }
        Ok(blocks)
    }

    /// Adds `add` to every block the selection touches when any of them
    /// lacks any of those classes, and removes them from all otherwise.
    /// `remove` is stripped from every block either way. Returns the
    /// blocks touched.
    pub fn toggle_block_classes(
        &mut self,
        add: &[&str],
        remove: &[&str],
        limit: NodeId,
        wrapper_tag: Option<&str>,
    ) -> Result<Vec<NodeId>, ArgError> {
        check_class_names(add)?;
        check_class_names(remove)?;
        let limit = check_container(self.doc(), limit)?;
        let wrapper_tag = match wrapper_tag {
            Some(tag) => check_tag_name(tag)?,
            None => self.config().default_block_tag.clone(),
        };
        if add.is_empty() && remove.is_empty() {
            return Ok(Vec::new());
        }

        let mut blocks: Vec<NodeId> = Vec::new();
        self.each_block(limit, &wrapper_tag, |_, block| {
            if !blocks.contains(&block) {
                blocks.push(block);
            }
        })?;

        let doc = self.doc_mut();
        let apply = blocks
            .iter()
            .any(|&block| add.iter().any(|class| !doc.has_class(block, class)));
        tracing::debug!(blocks = blocks.len(), apply, "toggling block classes");

        for &block in &blocks {
            for class in add {
                if apply {
                    doc.add_class(block, class);
                } else {
                    doc.remove_class(block, class);
                }
            }
            for class in remove {
                doc.remove_class(block, class);
            }
        }
        Ok(blocks)
    }
}
