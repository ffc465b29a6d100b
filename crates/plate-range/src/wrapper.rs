use indextree::NodeId;
use serde::{Deserialize, Serialize};

use crate::args::{check_class_names, check_tag_name};
use crate::block::closest_block;
use crate::document::Document;
use crate::editor::Editor;
use crate::error::ArgError;
use crate::node::Attrs;
use crate::range::{Boundary, Keep, Range, split_up_to};

/// Classes and attributes carried by the element `toggle_wrapper` creates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WrapperOptions {
    pub classes: Vec<String>,
    pub attributes: Attrs,
}

impl WrapperOptions {
    pub fn with_classes<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.classes = classes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    fn attrs(&self) -> Attrs {
        let mut attrs = self.attributes.clone();
        if !self.classes.is_empty() {
            attrs.insert("class".to_string(), self.classes.join(" "));
        }
        attrs
    }
}

struct Wrapper<'a> {
    tag: &'a str,
    classes: &'a [String],
    attrs: Attrs,
}

impl Wrapper<'_> {
    fn matches(&self, doc: &Document, node: NodeId) -> bool {
        doc.tag(node) == Some(self.tag)
            && self.classes.iter().all(|class| doc.has_class(node, class))
    }

    /// The matching inline element around `text`, below its block.
    fn around(&self, doc: &Document, text: NodeId) -> Option<NodeId> {
        let block = closest_block(doc, text, doc.root()).unwrap_or(doc.root());
        doc.ancestors(text)
            .into_iter()
            .take_while(|&id| id != block)
            .find(|&id| self.matches(doc, id))
    }
}

impl Editor {
    /// Toggles an inline `tag` wrapper over each range.
    ///
    /// A collapsed range, or one inside an empty element, gets a new empty
    /// wrapper with the caret inside it. Otherwise, when every selected
    /// text run already sits in a matching wrapper the selected part is
    /// taken out of it; if not, every bare run is wrapped and identical
    /// neighbouring wrappers are merged.
    pub fn toggle_wrapper(&mut self, tag: &str, options: &WrapperOptions) -> Result<(), ArgError> {
        let tag = check_tag_name(tag)?;
        let classes: Vec<&str> = options.classes.iter().map(String::as_str).collect();
        check_class_names(&classes)?;
        let wrapper = Wrapper {
            tag: &tag,
            classes: &options.classes,
            attrs: options.attrs(),
        };

        self.for_each_range(|doc, range| {
            if range.is_collapsed() || range.is_empty_tag(doc) {
                insert_empty_wrapper(doc, range, &wrapper);
                return;
            }
            let texts = range.isolate_text_nodes(doc);
            let (Some(&first), Some(&last)) = (texts.first(), texts.last()) else {
                return;
            };

            if texts.iter().all(|&text| wrapper.around(doc, text).is_some()) {
                tracing::debug!(tag = wrapper.tag, "selection already wrapped; unwrapping");
                for &text in &texts {
                    unwrap_text(doc, text, &wrapper);
                }
            } else {
                tracing::debug!(tag = wrapper.tag, "wrapping selected text");
                for &text in &texts {
                    if wrapper.around(doc, text).is_none() {
                        let element = doc.wrap(text, wrapper.tag, wrapper.attrs.clone());
                        merge_with_neighbours(doc, element);
                    }
                }
            }
            *range = Range::new(
                doc,
                Boundary::new(first, 0),
                Boundary::new(last, doc.len(last)),
            );
        });
        Ok(())
    }
}

fn insert_empty_wrapper(doc: &mut Document, range: &mut Range, wrapper: &Wrapper<'_>) {
    let element = doc.create_element(wrapper.tag, wrapper.attrs.clone());
    let (parent, index) = doc.insertion_point(range.start);
    doc.insert_at(parent, index, element);
    *range = Range::collapsed(Boundary::new(element, 0));
}

/// Splits the wrapper around `text` so that only `text` is left inside
/// one copy of it, then removes that copy.
fn unwrap_text(doc: &mut Document, text: NodeId, wrapper: &Wrapper<'_>) {
    let Some(element) = wrapper.around(doc, text) else {
        return;
    };
    let Some(parent) = doc.parent(element) else {
        return;
    };
    let after = Boundary::after(doc, text);
    split_up_to(doc, after, parent, Keep::Left);
    let before = Boundary::before(doc, text);
    split_up_to(doc, before, parent, Keep::Right);
    doc.unwrap(element);
}

fn merge_with_neighbours(doc: &mut Document, element: NodeId) {
    let mut element = element;
    if let Some(previous) = doc
        .previous_sibling(element)
        .filter(|&prev| doc.kind(prev) == doc.kind(element))
    {
        for child in doc.children(element) {
            doc.append(previous, child);
        }
        doc.remove(element);
        element = previous;
    }
    if let Some(next) = doc
        .next_sibling(element)
        .filter(|&next| doc.kind(next) == doc.kind(element))
    {
        for child in doc.children(next) {
            doc.append(element, child);
        }
        doc.remove(next);
    }
}
