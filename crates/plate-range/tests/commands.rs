mod common;

use plate_range::{ArgError, CommandError, CommandSpec, Editor, EditorConfig};
use pretty_assertions::assert_eq;
use serde_json::json;

use common::{caret_at, select_text};

#[test]
fn registry_lists_selection_commands_and_queries() {
    let editor = Editor::from_html("");

    let mut commands: Vec<&str> = editor
        .registry()
        .commands()
        .keys()
        .map(String::as_str)
        .collect();
    commands.sort_unstable();
    assert_eq!(
        commands,
        vec![
            "selection.change_tags",
            "selection.clear_formatting",
            "selection.delete",
            "selection.replace",
            "selection.replace_within_valid_tags",
            "selection.toggle_block_classes",
            "selection.toggle_block_style",
            "selection.toggle_wrapper",
        ]
    );

    let mut queries: Vec<&str> = editor
        .registry()
        .queries()
        .keys()
        .map(String::as_str)
        .collect();
    queries.sort_unstable();
    assert_eq!(
        queries,
        vec![
            "selection.at_end_of_element",
            "selection.at_start_of_element",
            "selection.fragment",
            "selection.html",
            "selection.is_empty",
        ]
    );

    let replace = editor.registry().command("selection.replace").unwrap();
    assert_eq!(replace.label, "Replace selection");
    assert!(replace.args_example.is_some());
}

#[test]
fn change_tags_command_resolves_limit_path() {
    let mut editor = Editor::from_html("<div><p>one</p></div>");
    select_text(&mut editor, "one");

    editor
        .run_command(
            "selection.change_tags",
            Some(json!({ "change_to": "H2", "change_from": "p", "limit": [0] })),
        )
        .unwrap();

    assert_eq!(editor.to_html(), "<div><h2>one</h2></div>");
}

#[test]
fn unknown_ids_are_reported() {
    let mut editor = Editor::from_html("<p>x</p>");

    let err = editor.run_command("selection.nope", None).unwrap_err();
    assert!(matches!(err, CommandError::UnknownCommand(id) if id == "selection.nope"));

    let err = editor.run_query_json("selection.nope", None).unwrap_err();
    assert!(matches!(err, CommandError::UnknownQuery(id) if id == "selection.nope"));
}

#[test]
fn malformed_arguments_leave_document_untouched() {
    let mut editor = Editor::from_html("<p>Hello</p>");
    select_text(&mut editor, "Hello");

    let err = editor
        .run_command("selection.change_tags", Some(json!({ "change_to": 5 })))
        .unwrap_err();
    assert!(matches!(
        err,
        CommandError::Arg(ArgError::WrongShape { ref field, .. }) if field == "change_to"
    ));

    let err = editor
        .run_command("selection.replace_within_valid_tags", Some(json!({ "html": "<hr>" })))
        .unwrap_err();
    assert!(matches!(err, CommandError::Arg(ArgError::Missing(ref f)) if f == "valid_tags"));

    let err = editor
        .run_command(
            "selection.toggle_block_classes",
            Some(json!({ "add": ["ok", ""] })),
        )
        .unwrap_err();
    assert!(matches!(err, CommandError::Arg(ArgError::InvalidClassName(_))));

    let err = editor
        .run_command(
            "selection.clear_formatting",
            Some(json!({ "limit": [5] })),
        )
        .unwrap_err();
    assert!(matches!(err, CommandError::Arg(ArgError::UnknownPath(ref p)) if *p == vec![5usize]));

    assert_eq!(editor.to_html(), "<p>Hello</p>");
    assert_eq!(editor.selection().to_html(editor.doc()), "Hello");
}

#[test]
fn selection_queries() {
    let mut editor = Editor::from_html("<p>Hello world</p>");
    select_text(&mut editor, "world");

    let html: String = editor.run_query("selection.html", None).unwrap();
    assert_eq!(html, "world");

    let empty: bool = editor.run_query("selection.is_empty", None).unwrap();
    assert!(!empty);

    let fragment = editor.run_query_json("selection.fragment", None).unwrap();
    assert_eq!(fragment, json!([{ "node": "text", "text": "world" }]));

    let at_end: bool = editor
        .run_query("selection.at_end_of_element", Some(json!({ "element": [0] })))
        .unwrap();
    assert!(at_end);

    let at_start: bool = editor
        .run_query("selection.at_start_of_element", Some(json!({ "element": [0] })))
        .unwrap();
    assert!(!at_start);

    let err = editor
        .run_query_json("selection.at_start_of_element", None)
        .unwrap_err();
    assert!(matches!(err, CommandError::Arg(ArgError::Missing(_))));
}

#[test]
fn replace_and_delete_commands() {
    let mut editor = Editor::from_html("<p>Hello world</p>");
    select_text(&mut editor, "Hello world");

    editor
        .run_command(
            "selection.replace_within_valid_tags",
            Some(json!({ "html": "<ul><li>x</li></ul>", "valid_tags": "ul" })),
        )
        .unwrap();
    assert_eq!(editor.to_html(), "<ul><li>x</li></ul>");

    let mut editor = Editor::from_html("<p>Hello world</p>");
    select_text(&mut editor, " world");
    editor.run_command("selection.delete", None).unwrap();
    assert_eq!(editor.to_html(), "<p>Hello</p>");
}

#[test]
fn block_and_wrapper_commands() {
    let mut editor = Editor::from_html("<p>Hello</p>");
    select_text(&mut editor, "Hello");

    editor
        .run_command(
            "selection.toggle_block_style",
            Some(json!({ "styles": { "text-align": "center" } })),
        )
        .unwrap();
    editor
        .run_command(
            "selection.toggle_block_classes",
            Some(json!({ "add": "lead" })),
        )
        .unwrap();
    editor
        .run_command(
            "selection.toggle_wrapper",
            Some(json!({ "tag": "mark", "classes": ["hl"] })),
        )
        .unwrap();

    assert_eq!(
        editor.to_html(),
        r#"<p class="lead" style="text-align: center;"><mark class="hl">Hello</mark></p>"#
    );
}

#[test]
fn configured_default_block_tag_is_used() {
    let config = EditorConfig::from_json_str(r#"{ "default_block_tag": "p" }"#).unwrap();
    let mut editor = Editor::with_config("text", config);
    caret_at(&mut editor, "text");

    editor
        .run_command(
            "selection.toggle_block_style",
            Some(json!({ "styles": { "color": "red" } })),
        )
        .unwrap();

    assert_eq!(editor.to_html(), r#"<p style="color: red;">text</p>"#);
    assert_eq!(editor.config().replacement_attr, "data-replacement");
}

#[test]
fn custom_commands_can_be_registered() {
    let editor = Editor::from_html("");
    let mut registry = editor.registry().clone();

    registry.register_command(
        CommandSpec::new("custom.noop", "No-op", |_editor, _args| Ok(()))
            .description("Does nothing.")
            .keywords(["noop"]),
    );

    let command = registry.command("custom.noop").unwrap();
    assert_eq!(command.description.as_deref(), Some("Does nothing."));
    assert_eq!(command.keywords, vec!["noop".to_string()]);
    assert!(registry.command("selection.replace").is_some());
}
