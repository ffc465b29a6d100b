use std::cmp::Ordering;

use indextree::NodeId;

use crate::document::{Document, MarkerId};
use crate::node::{Fragment, Node};
use crate::range::{Boundary, Content, Range};

/// Ordered, disjoint ranges plus the direction the user selected in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ranges: Vec<Range>,
    backwards: bool,
}

/// A selection pinned into the tree by marker nodes. It survives any edit
/// that does not remove the markers themselves and must be handed back
/// through [`SavedSelection::restore`] or [`SavedSelection::discard`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct SavedSelection {
    ranges: Vec<(MarkerId, MarkerId)>,
    backwards: bool,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(range: Range) -> Self {
        Self {
            ranges: vec![range],
            backwards: false,
        }
    }

    pub fn caret(at: Boundary) -> Self {
        Self::single(Range::collapsed(at))
    }

    /// Sorts the ranges by start and merges any that overlap.
    pub fn from_ranges(doc: &Document, mut ranges: Vec<Range>) -> Self {
        ranges.sort_by(|a, b| doc.compare_boundaries(a.start, b.start));
        let mut merged: Vec<Range> = Vec::with_capacity(ranges.len());
        for range in ranges {
            match merged.last_mut() {
                Some(last) if doc.compare_boundaries(range.start, last.end) == Ordering::Less => {
                    if doc.compare_boundaries(range.end, last.end) == Ordering::Greater {
                        last.end = range.end;
                    }
                }
                _ => merged.push(range),
            }
        }
        Self {
            ranges: merged,
            backwards: false,
        }
    }

    pub fn backwards(mut self, backwards: bool) -> Self {
        self.backwards = backwards;
        self
    }

    pub fn ranges(&self) -> &[Range] {
        &self.ranges
    }

    pub fn range_count(&self) -> usize {
        self.ranges.len()
    }

    pub fn first(&self) -> Option<&Range> {
        self.ranges.first()
    }

    pub fn last(&self) -> Option<&Range> {
        self.ranges.last()
    }

    pub fn exists(&self) -> bool {
        !self.ranges.is_empty()
    }

    pub fn is_backwards(&self) -> bool {
        self.backwards
    }

    /// Where the interaction began.
    pub fn anchor(&self) -> Option<Boundary> {
        if self.backwards {
            self.last().map(|range| range.end)
        } else {
            self.first().map(|range| range.start)
        }
    }

    /// Where the interaction currently ends.
    pub fn focus(&self) -> Option<Boundary> {
        if self.backwards {
            self.first().map(|range| range.start)
        } else {
            self.last().map(|range| range.end)
        }
    }

    /// The first boundary in document order.
    pub fn start(&self) -> Option<Boundary> {
        if self.backwards {
            self.focus()
        } else {
            self.anchor()
        }
    }

    /// The last boundary in document order.
    pub fn end(&self) -> Option<Boundary> {
        if self.backwards {
            self.anchor()
        } else {
            self.focus()
        }
    }

    pub fn remove_all_ranges(&mut self) {
        self.ranges.clear();
        self.backwards = false;
    }

    pub fn add_range(&mut self, doc: &Document, range: Range) {
        let mut ranges = std::mem::take(&mut self.ranges);
        ranges.push(range);
        let backwards = self.backwards;
        *self = Self::from_ranges(doc, ranges).backwards(backwards);
    }

    /// Runs `f` once per range. Every range is pinned with markers up
    /// front and resolved from them right before its turn, so edits made
    /// for one range never leave a later one pointing at stale offsets.
    /// Ranges whose markers an earlier call removed are skipped. The
    /// selection afterwards holds each range as `f` left it.
    pub fn for_each_range<R>(
        &mut self,
        doc: &mut Document,
        mut f: impl FnMut(&mut Document, &mut Range) -> R,
    ) -> Vec<R> {
        let saved = self.save(doc);
        let mut finished = Vec::with_capacity(saved.ranges.len());
        let mut results = Vec::with_capacity(saved.ranges.len());

        for (ix, &(start_marker, end_marker)) in saved.ranges.iter().enumerate() {
            let Some(mut range) = resolve_pair(doc, start_marker, end_marker) else {
                tracing::trace!(range = ix, "range removed by an earlier edit; skipping");
                continue;
            };
            tracing::trace!(range = ix, collapsed = range.is_collapsed(), "visiting range");
            results.push(f(doc, &mut range));
            if range.is_valid(doc) {
                finished.extend(pin_ranges(doc, std::slice::from_ref(&range)));
            }
        }

        *self = SavedSelection {
            ranges: finished,
            backwards: saved.backwards,
        }
        .restore(doc);
        results
    }

    /// Replaces every range with `content`; returns the nodes inserted
    /// for each range.
    pub fn replace(&mut self, doc: &mut Document, content: &Content) -> Vec<Vec<NodeId>> {
        self.for_each_range(doc, |doc, range| range.replace(doc, content))
    }

    pub fn delete(&mut self, doc: &mut Document) {
        self.for_each_range(doc, |doc, range| range.delete_contents(doc));
    }

    pub fn select_inner(&mut self, doc: &Document, elements: &[NodeId]) {
        let ranges = elements
            .iter()
            .map(|&el| Range::select_node_contents(doc, el))
            .collect();
        *self = Self::from_ranges(doc, ranges);
    }

    pub fn select_outer(&mut self, doc: &Document, elements: &[NodeId]) {
        let ranges = elements
            .iter()
            .map(|&el| Range::select_node(doc, el))
            .collect();
        *self = Self::from_ranges(doc, ranges);
    }

    pub fn select_edge(&mut self, doc: &Document, element: NodeId, at_start: bool) {
        let offset = if at_start { 0 } else { doc.len(element) };
        *self = Self::caret(Boundary::new(element, offset));
    }

    /// Extends the selection from its start to the end of `element`.
    pub fn select_to_end_of_element(&mut self, doc: &Document, element: NodeId) {
        let end = Boundary::new(element, doc.len(element));
        let start = self
            .start()
            .filter(|start| doc.contains(element, start.node))
            .unwrap_or(Boundary::new(element, 0));
        *self = Self::single(Range::new(doc, start, end));
    }

    /// Drops ranges that are not inside `element`. An emptied selection
    /// becomes a caret at the start of `element`.
    pub fn constrain_to(&mut self, doc: &Document, element: NodeId) {
        self.ranges
            .retain(|range| doc.contains(element, range.common_ancestor(doc)));
        if self.ranges.is_empty() {
            self.select_edge(doc, element, true);
        }
    }

    pub fn save(&self, doc: &mut Document) -> SavedSelection {
        save_many(doc, &[self]).pop().unwrap_or(SavedSelection {
            ranges: Vec::new(),
            backwards: self.backwards,
        })
    }

    pub fn fragment(&self, doc: &Document) -> Fragment {
        let mut fragment = Fragment::default();
        for range in &self.ranges {
            fragment.extend(range.clone_contents(doc));
        }
        fragment
    }

    pub fn to_html(&self, doc: &Document) -> String {
        self.fragment(doc).to_html()
    }

    pub fn is_empty(&self, doc: &Document) -> bool {
        self.to_html(doc).is_empty()
    }

    pub fn start_element(&self, doc: &Document) -> Option<NodeId> {
        self.start().map(|start| doc.closest_element(start.node))
    }

    pub fn end_element(&self, doc: &Document) -> Option<NodeId> {
        self.end().map(|end| doc.closest_element(end.node))
    }

    /// The element that encloses the whole first range.
    pub fn wrapping_element(&self, doc: &Document) -> Option<NodeId> {
        self.first()
            .map(|range| doc.closest_element(range.common_ancestor(doc)))
    }

    /// True when nothing but blank content separates the start of
    /// `element` from the selection's start.
    pub fn at_start_of_element(&self, doc: &Document, element: NodeId) -> bool {
        let Some(start) = self.start() else {
            return false;
        };
        doc.contains(element, start.node)
            && is_blank(Range::new(doc, Boundary::new(element, 0), start).clone_contents(doc))
    }

    pub fn at_end_of_element(&self, doc: &Document, element: NodeId) -> bool {
        let Some(end) = self.end() else {
            return false;
        };
        doc.contains(element, end.node)
            && is_blank(
                Range::new(doc, end, Boundary::new(element, doc.len(element))).clone_contents(doc),
            )
    }

    /// True when some range overlaps `node` or a caret sits inside it.
    pub fn contains(&self, doc: &Document, node: NodeId) -> bool {
        self.ranges.iter().any(|range| {
            range.intersects_node(doc, node)
                || (doc.contains(node, range.start.node) && doc.contains(node, range.end.node))
        })
    }
}

impl SavedSelection {
    pub fn is_backwards(&self) -> bool {
        self.backwards
    }

    /// Removes the markers and rebuilds the selection from where they
    /// ended up.
    pub fn restore(self, doc: &mut Document) -> Selection {
        let mut boundaries: Vec<Boundary> = Vec::with_capacity(self.ranges.len() * 2);
        let mut pairs = Vec::with_capacity(self.ranges.len());
        for (start_marker, end_marker) in self.ranges {
            let start = doc.take_marker(start_marker, &mut boundaries).map(|b| {
                boundaries.push(b);
                boundaries.len() - 1
            });
            let end = if end_marker == start_marker {
                start
            } else {
                doc.take_marker(end_marker, &mut boundaries).map(|b| {
                    boundaries.push(b);
                    boundaries.len() - 1
                })
            };
            if let (Some(start), Some(end)) = (start, end) {
                pairs.push((start, end));
            }
        }
        let ranges = pairs
            .into_iter()
            .map(|(start, end)| Range::new(doc, boundaries[start], boundaries[end]))
            .filter(|range| range.is_valid(doc))
            .collect();
        Selection::from_ranges(doc, ranges).backwards(self.backwards)
    }

    /// Removes the markers without producing a selection.
    pub fn discard(self, doc: &mut Document) {
        for (start_marker, end_marker) in self.ranges {
            let _ = doc.take_marker(start_marker, &mut []);
            if end_marker != start_marker {
                let _ = doc.take_marker(end_marker, &mut []);
            }
        }
    }
}

/// Saves several selections at once so none of them sees the text splits
/// made for the others.
pub fn save_many(doc: &mut Document, selections: &[&Selection]) -> Vec<SavedSelection> {
    let ranges: Vec<Range> = selections
        .iter()
        .flat_map(|selection| selection.ranges.iter().copied())
        .collect();
    let mut pinned = pin_ranges(doc, &ranges).into_iter();

    selections
        .iter()
        .map(|selection| SavedSelection {
            ranges: pinned.by_ref().take(selection.ranges.len()).collect(),
            backwards: selection.backwards,
        })
        .collect()
}

/// Marks both ends of each range. A collapsed range gets a single marker
/// standing for both ends.
fn pin_ranges(doc: &mut Document, ranges: &[Range]) -> Vec<(MarkerId, MarkerId)> {
    let boundaries: Vec<Boundary> = ranges
        .iter()
        .flat_map(|range| {
            if range.is_collapsed() {
                vec![range.start]
            } else {
                vec![range.start, range.end]
            }
        })
        .collect();
    let mut markers = doc.insert_markers(&boundaries).into_iter();

    ranges
        .iter()
        .filter_map(|range| {
            let start = markers.next()?;
            let end = if range.is_collapsed() {
                start
            } else {
                markers.next()?
            };
            Some((start, end))
        })
        .collect()
}

fn resolve_pair(doc: &mut Document, start_marker: MarkerId, end_marker: MarkerId) -> Option<Range> {
    let range = if start_marker == end_marker {
        Range::collapsed(doc.take_marker(start_marker, &mut [])?)
    } else {
        let mut tracked: Vec<Boundary> =
            doc.take_marker(start_marker, &mut []).into_iter().collect();
        let end = doc.take_marker(end_marker, &mut tracked);
        Range::new(doc, *tracked.first()?, end?)
    };
    range.is_valid(doc).then_some(range)
}

fn is_blank(fragment: Fragment) -> bool {
    fragment.nodes.iter().all(Node::is_blank)
}
