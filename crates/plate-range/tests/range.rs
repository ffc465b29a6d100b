mod common;

use plate_range::{Boundary, Content, Document, Node, Range};
use pretty_assertions::assert_eq;
use rstest::rstest;

use common::{find_text, node, range_between, range_over};

#[rstest]
#[case("<p>ab<b>cd</b>ef</p>", "b", "e", "b<b>cd</b>e")]
#[case("<p>one</p><p>two</p>", "ne", "tw", "<p>ne</p><p>tw</p>")]
#[case("<ul><li>a</li><li>b</li></ul>", "a", "b", "<li>a</li><li>b</li>")]
#[case("<p>a<b>bc</b>d</p>", "c", "d", "<b>c</b>d")]
fn clone_contents_copies_spanned_markup(
    #[case] markup: &str,
    #[case] from: &str,
    #[case] to: &str,
    #[case] expected: &str,
) {
    let doc = Document::parse(markup);
    let range = range_between(&doc, from, to);

    assert_eq!(range.to_html(&doc), expected);
    assert_eq!(doc.to_html(), markup);
}

#[test]
fn extract_contents_splits_partially_selected_elements() {
    let mut doc = Document::parse("<p>ab<b>cd</b>ef</p>");
    let p = node(&doc, &[0]);
    let mut range = range_between(&doc, "d", "e");

    let extracted = range.extract_contents(&mut doc);

    assert_eq!(extracted.to_html(), "<b>d</b>e");
    assert_eq!(doc.to_html(), "<p>ab<b>c</b>f</p>");
    assert!(range.is_collapsed());
    assert_eq!(range.start, Boundary::new(p, 2));
}

#[test]
fn extract_keeps_identity_of_nodes_outside_the_range() {
    let mut doc = Document::parse("<p>one two three</p>");
    let text = find_text(&doc, "one").node;
    let mut range = range_over(&doc, "two ");

    range.delete_contents(&mut doc);

    assert_eq!(doc.to_html(), "<p>one three</p>");
    assert_eq!(doc.text(text), Some("one three"));
}

#[test]
fn deleted_nodes_are_freed() {
    let mut doc = Document::parse("<p>a<b>bc</b>d</p>");
    let bold = node(&doc, &[0, 1]);
    assert_eq!(doc.node_count(), 6);

    Range::select_node(&doc, bold).delete_contents(&mut doc);

    assert_eq!(doc.to_html(), "<p>ad</p>");
    assert_eq!(doc.node_count(), 4);
    assert_eq!(doc.kind(bold), None);
    assert!(!doc.is_attached(bold));
}

#[test]
fn replace_collapses_after_inserted_content() {
    let mut doc = Document::parse("<p>Hello world</p>");
    let p = node(&doc, &[0]);
    let mut range = range_over(&doc, "world");

    let inserted = range.replace(&mut doc, &Content::from("<i>there</i>"));

    assert_eq!(doc.to_html(), "<p>Hello <i>there</i></p>");
    assert_eq!(inserted.len(), 1);
    assert_eq!(doc.tag(inserted[0]), Some("i"));
    assert_eq!(range, Range::collapsed(Boundary::new(p, 2)));
}

#[test]
fn replace_accepts_prebuilt_nodes() {
    let mut doc = Document::parse("<p>a-b</p>");
    let mut range = range_over(&doc, "-");

    range.replace(&mut doc, &Content::from(Node::element("br", vec![])));

    assert_eq!(doc.to_html(), "<p>a<br>b</p>");
}

#[test]
fn text_boundary_at_zero_does_not_reach_previous_sibling() {
    let mut doc = Document::parse("<p><b>x</b>yz</p>");
    let mut range = range_over(&doc, "yz");

    let extracted = range.extract_contents(&mut doc);

    assert_eq!(extracted.to_html(), "yz");
    assert_eq!(doc.to_html(), "<p><b>x</b></p>");
}

#[test]
fn expand_to_parent_encloses_nearest_element_with_text() {
    let doc = Document::parse("<p>a<b>bold</b></p>");
    let mut range = Range::collapsed(find_text(&doc, "ld"));

    range.expand_to_parent(&doc);

    assert_eq!(range.to_html(&doc), "<b>bold</b>");
}

#[test]
fn expand_within_never_reaches_the_limit() {
    let doc = Document::parse("<div><p>abc</p></div>");
    let p = node(&doc, &[0, 0]);
    let caret = Range::collapsed(find_text(&doc, "b"));

    let mut range = caret;
    assert!(!range.expand_within(&doc, p));
    assert_eq!(range, caret);

    let div = node(&doc, &[0]);
    assert!(range.expand_within(&doc, div));
    assert_eq!(range.to_html(&doc), "<p>abc</p>");
}

#[test]
fn empty_tag_detection() {
    let doc = Document::parse("<p>x</p><p></p>");
    let empty = node(&doc, &[1]);

    assert!(Range::collapsed(Boundary::new(empty, 0)).is_empty_tag(&doc));
    assert!(!Range::collapsed(find_text(&doc, "x")).is_empty_tag(&doc));
    assert!(!Range::collapsed(Boundary::new(doc.root(), 0)).is_empty_tag(&doc));
}

#[test]
fn new_orders_boundaries_and_collapse_picks_an_end() {
    let doc = Document::parse("<p>Hello world</p>");
    let hello = find_text(&doc, "Hello");
    let world = find_text(&doc, "world");

    let mut range = Range::new(&doc, world, hello);
    assert_eq!(range.start, hello);
    assert_eq!(range.end, world);

    range.collapse(false);
    assert!(range.is_collapsed());
    assert_eq!(range.start, world);
}

#[test]
fn select_node_and_contents() {
    let doc = Document::parse("<div><p>one</p><p>two</p></div>");
    let second = node(&doc, &[0, 1]);

    assert_eq!(Range::select_node(&doc, second).to_html(&doc), "<p>two</p>");
    assert_eq!(Range::select_node_contents(&doc, second).to_html(&doc), "two");
    assert!(Range::select_node(&doc, second).intersects_node(&doc, second));
    assert!(!Range::select_node(&doc, second).intersects_node(&doc, node(&doc, &[0, 0])));
}
