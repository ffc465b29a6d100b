mod common;

use plate_range::{ArgError, Editor, closest_block};
use pretty_assertions::assert_eq;

use common::{caret_at, find_text, node, range_between, select_text};

fn select_between(editor: &mut Editor, from: &str, to: &str) {
    let range = range_between(editor.doc(), from, to);
    editor.select(range);
}

#[test]
fn add_classes_apply_to_all_blocks_when_any_lacks_them() {
    let mut editor = Editor::from_html(r#"<p class="note">a</p><p>b</p>"#);
    select_between(&mut editor, "a", "b");
    let root = editor.doc().root();

    let blocks = editor
        .toggle_block_classes(&["note"], &[], root, None)
        .unwrap();
    assert_eq!(blocks.len(), 2);
    assert_eq!(
        editor.to_html(),
        r#"<p class="note">a</p><p class="note">b</p>"#
    );

    editor
        .toggle_block_classes(&["note"], &[], root, None)
        .unwrap();
    assert_eq!(editor.to_html(), "<p>a</p><p>b</p>");
}

#[test]
fn empty_toggle_never_mutates() {
    for (markup, from, to) in [
        (r#"<p class="a">x</p><p>y</p>"#, "x", "y"),
        ("bare <b>text</b>", "bare", "text"),
    ] {
        let mut editor = Editor::from_html(markup);
        select_between(&mut editor, from, to);
        let root = editor.doc().root();

        let blocks = editor.toggle_block_classes(&[], &[], root, None).unwrap();

        assert!(blocks.is_empty());
        assert_eq!(editor.to_html(), markup);
    }
}

#[test]
fn remove_classes_are_stripped_regardless_of_add_decision() {
    let mut editor = Editor::from_html(r#"<p class="a old">x</p><p class="old">y</p>"#);
    select_between(&mut editor, "x", "y");
    let root = editor.doc().root();

    editor
        .toggle_block_classes(&["a"], &["old"], root, None)
        .unwrap();

    assert_eq!(editor.to_html(), r#"<p class="a">x</p><p class="a">y</p>"#);
}

#[test]
fn missing_block_synthesizes_wrapper_around_limit_contents() {
    let mut editor = Editor::from_html("Hello <b>world</b>");
    select_text(&mut editor, "world");
    let root = editor.doc().root();

    let blocks = editor
        .toggle_block_classes(&["x"], &[], root, Some("p"))
        .unwrap();

    assert_eq!(editor.to_html(), r#"<p class="x">Hello <b>world</b></p>"#);
    assert_eq!(blocks, vec![node(editor.doc(), &[0])]);
    assert_eq!(editor.selection().to_html(editor.doc()), "world");
}

#[test]
fn blocks_between_ends_are_visited_in_document_order() {
    let mut editor = Editor::from_html("<ul><li>a</li><li>b</li></ul><p>c</p><p>d</p>");
    select_between(&mut editor, "a", "c");
    let root = editor.doc().root();

    let mut tags = Vec::new();
    editor
        .each_block(root, "div", |doc, block| {
            tags.push(doc.tag(block).unwrap_or_default().to_string());
        })
        .unwrap();

    assert_eq!(tags, vec!["li", "li", "p"]);
}

#[test]
fn classes_follow_blocks_across_nesting() {
    let mut editor = Editor::from_html("<ul><li>a</li><li>b</li></ul><p>c</p>");
    select_between(&mut editor, "a", "c");
    let root = editor.doc().root();

    editor
        .toggle_block_classes(&["x"], &[], root, None)
        .unwrap();

    assert_eq!(
        editor.to_html(),
        r#"<ul><li class="x">a</li><li class="x">b</li></ul><p class="x">c</p>"#
    );
}

#[test]
fn invalid_arguments_are_rejected_without_mutating() {
    let mut editor = Editor::from_html("<p>x</p>");
    select_text(&mut editor, "x");
    let root = editor.doc().root();
    let text = find_text(editor.doc(), "x").node;

    assert_eq!(
        editor.toggle_block_classes(&["two words"], &[], root, None),
        Err(ArgError::InvalidClassName("two words".to_string()))
    );
    assert_eq!(
        editor.toggle_block_classes(&["a"], &[], text, None),
        Err(ArgError::NotAnElement)
    );
    assert_eq!(
        editor.toggle_block_classes(&["a"], &[], root, Some("<p>")),
        Err(ArgError::InvalidTagName("<p>".to_string()))
    );
    assert_eq!(editor.to_html(), "<p>x</p>");
}

#[test]
fn block_style_toggles_on_and_off() {
    let mut editor = Editor::from_html("<p>a</p>");
    caret_at(&mut editor, "a");
    let root = editor.doc().root();

    editor
        .toggle_block_style(&[("text-align", "center")], root)
        .unwrap();
    assert_eq!(editor.to_html(), r#"<p style="text-align: center;">a</p>"#);

    editor
        .toggle_block_style(&[("text-align", "center")], root)
        .unwrap();
    assert_eq!(editor.to_html(), "<p>a</p>");
}

#[test]
fn block_style_replaces_a_different_value() {
    let mut editor = Editor::from_html(r#"<p style="color: blue;">a</p>"#);
    caret_at(&mut editor, "a");
    let root = editor.doc().root();

    editor.toggle_block_style(&[("color", "red")], root).unwrap();

    assert_eq!(editor.to_html(), r#"<p style="color: red;">a</p>"#);
}

#[test]
fn block_style_wraps_limit_in_default_block() {
    let mut editor = Editor::from_html("text");
    caret_at(&mut editor, "text");
    let root = editor.doc().root();

    editor.toggle_block_style(&[("color", "red")], root).unwrap();

    assert_eq!(editor.to_html(), r#"<div style="color: red;">text</div>"#);
}

#[test]
fn block_style_skips_inline_limit() {
    let mut editor = Editor::from_html("<p><span>text</span></p>");
    caret_at(&mut editor, "text");
    let span = node(editor.doc(), &[0, 0]);

    let blocks = editor.toggle_block_style(&[("color", "red")], span).unwrap();

    assert!(blocks.is_empty());
    assert_eq!(editor.to_html(), "<p><span>text</span></p>");
}

#[test]
fn closest_block_stops_below_limit() {
    let editor = Editor::from_html("<div><p>a<b>b</b></p></div>");
    let doc = editor.doc();
    let bold_text = find_text(doc, "b").node;
    let div = node(doc, &[0]);
    let p = node(doc, &[0, 0]);

    assert_eq!(closest_block(doc, bold_text, doc.root()), Some(p));
    assert_eq!(closest_block(doc, bold_text, p), None);
    assert_eq!(closest_block(doc, p, div), Some(p));
}
