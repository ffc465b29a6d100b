use indextree::NodeId;

use crate::args::{check_container, check_tag_name};
use crate::block::next_in_order;
use crate::document::Document;
use crate::editor::Editor;
use crate::error::ArgError;

impl Editor {
    /// Elements tagged with one of `tags` that wrap the selection or lie
    /// inside it, in the order they are found. `limit` itself and
    /// everything above it are never returned.
    pub fn find_wrapping_and_inner_elements(&self, tags: &[&str], limit: NodeId) -> Vec<NodeId> {
        let doc = self.doc();
        let mut found = Vec::new();
        for range in self.selection().ranges() {
            let start = doc.closest_element(range.start.node);
            let end = doc.closest_element(range.end.node);

            let mut next = Some(start);
            while let Some(node) = next {
                if doc.is_container(node) {
                    collect_matches(doc, node, tags, limit, &mut found);
                }
                if node == end || node == limit || doc.contains(node, end) {
                    break;
                }
                next = next_in_order(doc, node, limit);
            }
        }
        found
    }

    /// Renames the elements found by
    /// [`Editor::find_wrapping_and_inner_elements`] for `change_from` to
    /// `change_to`. When there are none, the contents of `limit` are
    /// wrapped in a new `change_to` element instead. Returns the renamed
    /// elements or the new wrapper.
    pub fn change_tags(
        &mut self,
        change_to: &str,
        change_from: &[&str],
        limit: NodeId,
    ) -> Result<Vec<NodeId>, ArgError> {
        let change_to = check_tag_name(change_to)?;
        let change_from = change_from
            .iter()
            .map(|tag| check_tag_name(tag))
            .collect::<Result<Vec<_>, _>>()?;
        let limit = check_container(self.doc(), limit)?;
        if !self.selection().exists() {
            return Ok(Vec::new());
        }

        let change_from: Vec<&str> = change_from.iter().map(String::as_str).collect();
        let matches = self.find_wrapping_and_inner_elements(&change_from, limit);

        let (doc, selection) = self.doc_and_selection();
        let saved = selection.save(doc);
        let changed = if matches.is_empty() {
            tracing::debug!(tag = %change_to, "no matching elements; wrapping limit contents");
            vec![doc.wrap_inner(limit, &change_to)]
        } else {
            tracing::debug!(tag = %change_to, count = matches.len(), "renaming matching elements");
            for &element in &matches {
                doc.rename(element, &change_to);
            }
            matches
        };
        *selection = saved.restore(doc);
        Ok(changed)
    }
}

/// Adds `node`, its ancestors below `limit` and its descendants to
/// `found` when their tag is one of `tags`.
fn collect_matches(doc: &Document, node: NodeId, tags: &[&str], limit: NodeId, found: &mut Vec<NodeId>) {
    let root = doc.root();
    let above = std::iter::once(node)
        .chain(doc.ancestors(node))
        .take_while(|&id| id != limit && id != root);
    let below = doc.descendants(node).into_iter();

    for id in above.chain(below) {
        let matches = doc.tag(id).is_some_and(|tag| tags.contains(&tag));
        if matches && id != limit && !found.contains(&id) {
            found.push(id);
        }
    }
}
