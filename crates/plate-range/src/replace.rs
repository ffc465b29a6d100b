use indextree::NodeId;

use crate::args::check_tag_name;
use crate::editor::Editor;
use crate::error::ArgError;
use crate::node::Fragment;
use crate::range::{Boundary, Content, Range};
use crate::selection::Selection;

impl Editor {
    /// Replaces every range of the selection with `content`. Returns the
    /// inserted nodes for each range.
    pub fn replace_selection(&mut self, content: impl Into<Content>) -> Vec<Vec<NodeId>> {
        let content = content.into();
        self.for_each_range(|doc, range| range.replace(doc, &content))
    }

    pub fn delete_selection(&mut self) {
        let (doc, selection) = self.doc_and_selection();
        selection.delete(doc);
    }

    /// Inserts `content` at the selection only when the element around
    /// the first range and the elements at both of its ends all carry one
    /// of `valid_tags`. Otherwise the element around the range is split
    /// in two and the content goes between the halves.
    pub fn replace_within_valid_tags(
        &mut self,
        content: impl Into<Content>,
        valid_tags: &[&str],
    ) -> Result<Vec<NodeId>, ArgError> {
        let valid_tags = valid_tags
            .iter()
            .map(|tag| check_tag_name(tag))
            .collect::<Result<Vec<_>, _>>()?;
        let content = content.into();

        let doc = self.doc();
        let selection = self.selection();
        let anchors = [
            selection.wrapping_element(doc),
            selection.start_element(doc),
            selection.end_element(doc),
        ];
        if anchors.iter().any(Option::is_none) {
            return Ok(Vec::new());
        }
        let all_valid = anchors.iter().flatten().all(|&el| {
            doc.tag(el)
                .is_some_and(|tag| valid_tags.iter().any(|valid| valid == tag))
        });

        if all_valid {
            tracing::debug!("selection sits inside valid tags; replacing in place");
            return Ok(self.replace_selection(content).into_iter().flatten().collect());
        }
        Ok(self.replace_splitting_selected_element(&content))
    }

    /// Rebuilds the element around the first range as a copy holding what
    /// came before the range, then `content`, then a copy holding what came
    /// after. The selection ends up as a caret after the inserted content.
    fn replace_splitting_selected_element(&mut self, content: &Content) -> Vec<NodeId> {
        let Some(range) = self.selection().first().copied() else {
            return Vec::new();
        };
        let selected = self.doc().closest_element(range.common_ancestor(self.doc()));
        if selected == self.doc().root() {
            tracing::debug!("selection spans the top level; replacing in place");
            return self
                .replace_selection(content.clone())
                .into_iter()
                .flatten()
                .collect();
        }
        tracing::debug!(
            tag = self.doc().tag(selected).unwrap_or_default(),
            "splitting selected element around replacement"
        );

        let attr = self.config().replacement_attr.clone();
        let doc = self.doc_mut();
        let before = Range::new(doc, Boundary::before(doc, selected), range.start)
            .clone_contents(doc)
            .without_blank_nodes();
        let after = Range::new(doc, range.end, Boundary::after(doc, selected))
            .clone_contents(doc)
            .without_blank_nodes();
        let middle = match content {
            Content::Html(markup) => markup.clone(),
            Content::Fragment(fragment) => fragment.to_html(),
        };
        let markup = format!(
            "{}<span {attr}=\"\">{middle}</span>{}",
            before.to_html(),
            after.to_html()
        );

        let nodes = doc.import_fragment(&Fragment::parse(&markup));
        doc.replace(selected, &nodes);
        let Some(carrier) = nodes
            .iter()
            .copied()
            .find(|&node| doc.attr(node, &attr).is_some())
        else {
            return Vec::new();
        };
        let position = Boundary::before(doc, carrier);
        let inserted = doc.unwrap(carrier);
        let caret = match inserted.last() {
            Some(&last) => Boundary::after(doc, last),
            None => position,
        };
        self.set_selection(Selection::caret(caret));
        inserted
    }
}
