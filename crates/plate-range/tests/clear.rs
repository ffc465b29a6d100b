mod common;

use plate_range::{ArgError, Editor};
use pretty_assertions::assert_eq;
use rstest::rstest;

use common::{caret_at, find_text, node, range_between, select_text};

#[rstest]
#[case::inside_block("<p>A<b>B</b>C</p>", "<p>A</p>B<p>C</p>")]
#[case::directly_under_limit("A<b>B</b>C", "ABC")]
fn clearing_lifts_plain_text_out_of_its_block(#[case] markup: &str, #[case] expected: &str) {
    let mut editor = Editor::from_html(markup);
    select_text(&mut editor, "B");
    let root = editor.doc().root();

    let text = editor.clear_formatting(root).unwrap().unwrap();

    assert_eq!(editor.to_html(), expected);
    assert_eq!(editor.doc().text(text), Some("B"));
    assert_eq!(editor.selection().to_html(editor.doc()), "B");
}

#[test]
fn caret_clears_the_enclosing_inline_element() {
    let mut editor = Editor::from_html("<p>A<b>B</b>C</p>");
    caret_at(&mut editor, "B");
    let root = editor.doc().root();

    editor.clear_formatting(root).unwrap();

    assert_eq!(editor.to_html(), "<p>A</p>B<p>C</p>");
}

#[test]
fn text_lands_directly_under_the_limit() {
    let mut editor = Editor::from_html("<div><p>A<b>B</b>C</p></div>");
    select_text(&mut editor, "B");
    let div = node(editor.doc(), &[0]);

    let text = editor.clear_formatting(div).unwrap().unwrap();

    assert_eq!(editor.to_html(), "<div><p>A</p>B<p>C</p></div>");
    assert_eq!(editor.doc().parent(text), Some(div));
}

#[test]
fn selection_across_blocks_is_flattened() {
    let mut editor = Editor::from_html("<p>ab</p><p>cd</p>");
    let range = range_between(editor.doc(), "b", "c");
    editor.select(range);
    let root = editor.doc().root();

    editor.clear_formatting(root).unwrap();

    assert_eq!(editor.to_html(), "<p>a</p>bc<p>d</p>");
    assert_eq!(editor.selection().to_html(editor.doc()), "bc");
}

#[test]
fn nothing_happens_without_a_selection() {
    let mut editor = Editor::from_html("<p><b>B</b></p>");
    let root = editor.doc().root();

    assert_eq!(editor.clear_formatting(root), Ok(None));
    assert_eq!(editor.to_html(), "<p><b>B</b></p>");
}

#[test]
fn limit_must_be_an_element() {
    let mut editor = Editor::from_html("<p><b>B</b></p>");
    select_text(&mut editor, "B");
    let text = find_text(editor.doc(), "B").node;

    assert_eq!(editor.clear_formatting(text), Err(ArgError::NotAnElement));
    assert_eq!(editor.to_html(), "<p><b>B</b></p>");
}

#[rstest]
#[case::paragraph_limit("<div><p>abc</p></div>", &[0, 0])]
#[case::div_limit("<div>abc</div>", &[0])]
fn caret_directly_under_the_limit_keeps_the_limit(
    #[case] markup: &str,
    #[case] limit: &[usize],
) {
    let mut editor = Editor::from_html(markup);
    caret_at(&mut editor, "b");
    let limit = node(editor.doc(), limit);

    assert_eq!(editor.clear_formatting(limit), Ok(None));

    assert_eq!(editor.to_html(), markup);
    assert!(editor.doc().is_attached(limit));
}

#[test]
fn caret_expansion_stops_below_the_limit() {
    let mut editor = Editor::from_html("<div><p>a<b>bold</b></p></div>");
    caret_at(&mut editor, "ol");
    let p = node(editor.doc(), &[0, 0]);

    let text = editor.clear_formatting(p).unwrap().unwrap();

    assert_eq!(editor.to_html(), "<div><p>abold</p></div>");
    assert_eq!(editor.doc().parent(text), Some(p));
}
