use std::collections::HashMap;
use std::sync::Arc;

use indextree::NodeId;
use serde_json::{Value, json};

use crate::args::{
    ArgShape, element_arg, list_arg, map_arg, optional_tag_arg, required, tag_arg, text_arg,
};
use crate::editor::Editor;
use crate::error::{ArgError, CommandError};
use crate::wrapper::WrapperOptions;

type CommandHandler = dyn Fn(&mut Editor, Option<Value>) -> Result<(), CommandError> + Send + Sync;
type QueryHandler = dyn Fn(&Editor, Option<Value>) -> Result<Value, CommandError> + Send + Sync;

#[derive(Clone)]
pub struct CommandSpec {
    pub id: String,
    pub label: String,
    pub description: Option<String>,
    pub keywords: Vec<String>,
    pub args_example: Option<Value>,
    pub handler: Arc<CommandHandler>,
}

impl CommandSpec {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        handler: impl Fn(&mut Editor, Option<Value>) -> Result<(), CommandError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            description: None,
            keywords: Vec::new(),
            args_example: None,
            handler: Arc::new(handler),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn args_example(mut self, args_example: Value) -> Self {
        self.args_example = Some(args_example);
        self
    }
}

#[derive(Clone)]
pub struct QuerySpec {
    pub id: String,
    pub handler: Arc<QueryHandler>,
}

impl QuerySpec {
    pub fn new(
        id: impl Into<String>,
        handler: impl Fn(&Editor, Option<Value>) -> Result<Value, CommandError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            handler: Arc::new(handler),
        }
    }
}

#[derive(Default, Clone)]
pub struct CommandRegistry {
    commands: HashMap<String, CommandSpec>,
    queries: HashMap<String, QuerySpec>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every selection command and query this crate provides.
    pub fn selection() -> Self {
        let mut registry = Self::new();
        for command in selection_commands() {
            registry.register_command(command);
        }
        for query in selection_queries() {
            registry.register_query(query);
        }
        registry
    }

    /// Adds `command`, replacing any command with the same id.
    pub fn register_command(&mut self, command: CommandSpec) {
        self.commands.insert(command.id.clone(), command);
    }

    pub fn register_query(&mut self, query: QuerySpec) {
        self.queries.insert(query.id.clone(), query);
    }

    pub fn commands(&self) -> &HashMap<String, CommandSpec> {
        &self.commands
    }

    pub fn command(&self, id: &str) -> Option<CommandSpec> {
        self.commands.get(id).cloned()
    }

    pub fn queries(&self) -> &HashMap<String, QuerySpec> {
        &self.queries
    }

    pub fn query(&self, id: &str) -> Option<QuerySpec> {
        self.queries.get(id).cloned()
    }
}

fn limit_arg(editor: &Editor, args: Option<&Value>) -> Result<NodeId, CommandError> {
    Ok(element_arg(editor.doc(), args, "limit")?.unwrap_or(editor.doc().root()))
}

fn as_strs(items: &[String]) -> Vec<&str> {
    items.iter().map(String::as_str).collect()
}

fn selection_commands() -> Vec<CommandSpec> {
    vec![
        CommandSpec::new("selection.replace", "Replace selection", |editor, args| {
            let html = text_arg(args.as_ref(), "html")?;
            editor.replace_selection(html);
            Ok(())
        })
        .description("Replace every selected range with the given markup.")
        .keywords(["replace", "insert", "html"])
        .args_example(json!({ "html": "<b>text</b>" })),
        CommandSpec::new(
            "selection.replace_within_valid_tags",
            "Replace within valid tags",
            |editor, args| {
                let args = args.as_ref();
                let html = text_arg(args, "html")?;
                required(args, "valid_tags")?;
                let valid_tags = list_arg(args, "valid_tags", ArgShape::TagList)?;
                editor.replace_within_valid_tags(html, &as_strs(&valid_tags))?;
                Ok(())
            },
        )
        .description(
            "Insert markup at the selection, splitting the selected element unless it and both ends of the selection carry a valid tag.",
        )
        .keywords(["replace", "insert", "split"])
        .args_example(json!({ "html": "<ul><li>item</li></ul>", "valid_tags": ["ul", "li"] })),
        CommandSpec::new("selection.change_tags", "Change tags", |editor, args| {
            let args = args.as_ref();
            let change_to = tag_arg(args, "change_to")?;
            let change_from = list_arg(args, "change_from", ArgShape::TagList)?;
            let limit = limit_arg(editor, args)?;
            editor.change_tags(&change_to, &as_strs(&change_from), limit)?;
            Ok(())
        })
        .description("Rename selected or wrapping elements, or wrap the limit's content when none match.")
        .keywords(["tag", "rename", "heading", "paragraph"])
        .args_example(json!({ "change_to": "h2", "change_from": ["p", "h1"], "limit": [0] })),
        CommandSpec::new(
            "selection.toggle_block_classes",
            "Toggle block classes",
            |editor, args| {
                let args = args.as_ref();
                let add = list_arg(args, "add", ArgShape::ClassList)?;
                let remove = list_arg(args, "remove", ArgShape::ClassList)?;
                let limit = limit_arg(editor, args)?;
                let wrapper = optional_tag_arg(args, "wrapper")?;
                editor.toggle_block_classes(
                    &as_strs(&add),
                    &as_strs(&remove),
                    limit,
                    wrapper.as_deref(),
                )?;
                Ok(())
            },
        )
        .description("Toggle classes on every block the selection touches.")
        .keywords(["class", "block", "align"])
        .args_example(json!({ "add": ["align-center"], "remove": ["align-left"] })),
        CommandSpec::new(
            "selection.toggle_block_style",
            "Toggle block style",
            |editor, args| {
                let args = args.as_ref();
                required(args, "styles")?;
                let styles = map_arg(args, "styles")?;
                let limit = limit_arg(editor, args)?;
                let styles: Vec<(&str, &str)> = styles
                    .iter()
                    .map(|(property, value)| (property.as_str(), value.as_str()))
                    .collect();
                editor.toggle_block_style(&styles, limit)?;
                Ok(())
            },
        )
        .description("Toggle inline style properties on the block around each range.")
        .keywords(["style", "block", "indent"])
        .args_example(json!({ "styles": { "text-align": "center" } })),
        CommandSpec::new(
            "selection.clear_formatting",
            "Clear formatting",
            |editor, args| {
                let limit = limit_arg(editor, args.as_ref())?;
                editor.clear_formatting(limit)?;
                Ok(())
            },
        )
        .description("Replace the selection with its plain text.")
        .keywords(["clear", "format", "plain"]),
        CommandSpec::new("selection.toggle_wrapper", "Toggle wrapper", |editor, args| {
            let args = args.as_ref();
            let tag = tag_arg(args, "tag")?;
            let options = WrapperOptions {
                classes: list_arg(args, "classes", ArgShape::ClassList)?,
                attributes: map_arg(args, "attributes")?,
            };
            editor.toggle_wrapper(&tag, &options)?;
            Ok(())
        })
        .description("Wrap the selected text in an inline element, or unwrap it when already wrapped.")
        .keywords(["wrap", "inline", "mark"])
        .args_example(json!({ "tag": "span", "classes": ["highlight"] })),
        CommandSpec::new("selection.delete", "Delete selection", |editor, _args| {
            editor.delete_selection();
            Ok(())
        })
        .description("Remove the selected content.")
        .keywords(["delete", "remove"]),
    ]
}

fn selection_queries() -> Vec<QuerySpec> {
    vec![
        QuerySpec::new("selection.html", |editor, _args| {
            Ok(Value::String(editor.selection().to_html(editor.doc())))
        }),
        QuerySpec::new("selection.is_empty", |editor, _args| {
            Ok(Value::Bool(editor.selection().is_empty(editor.doc())))
        }),
        QuerySpec::new("selection.fragment", |editor, _args| {
            Ok(serde_json::to_value(editor.selection().fragment(editor.doc()))?)
        }),
        QuerySpec::new("selection.at_start_of_element", |editor, args| {
            let element = element_path_arg(editor, args.as_ref())?;
            Ok(Value::Bool(
                editor.selection().at_start_of_element(editor.doc(), element),
            ))
        }),
        QuerySpec::new("selection.at_end_of_element", |editor, args| {
            let element = element_path_arg(editor, args.as_ref())?;
            Ok(Value::Bool(
                editor.selection().at_end_of_element(editor.doc(), element),
            ))
        }),
    ]
}

fn element_path_arg(editor: &Editor, args: Option<&Value>) -> Result<NodeId, CommandError> {
    required(args, "element")?;
    element_arg(editor.doc(), args, "element")?
        .ok_or_else(|| ArgError::Missing("element".to_string()).into())
}
