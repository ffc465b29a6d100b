//! Argument validation shared by every public entry point.
//!
//! Each argument is checked against an [`ArgShape`] and comes back either
//! as a typed [`ArgValue`] or as an [`ArgError`]. Rejections are logged
//! before they are returned, so a caller that drops the error still
//! leaves a trace.

use std::collections::BTreeMap;

use indextree::NodeId;
use serde_json::Value;

use crate::document::Document;
use crate::error::ArgError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgShape {
    Text,
    TagName,
    ClassName,
    /// A tag name or an array of them.
    TagList,
    /// A class name or an array of them.
    ClassList,
    /// An array of child indices from the document root.
    Path,
    /// An object whose values are all strings.
    StringMap,
}

impl ArgShape {
    fn expected(self) -> &'static str {
        match self {
            ArgShape::Text => "a string",
            ArgShape::TagName => "a tag name",
            ArgShape::ClassName => "a class name",
            ArgShape::TagList => "a tag name or an array of tag names",
            ArgShape::ClassList => "a class name or an array of class names",
            ArgShape::Path => "an array of child indices",
            ArgShape::StringMap => "an object of string values",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    Text(String),
    List(Vec<String>),
    Path(Vec<usize>),
    Map(BTreeMap<String, String>),
}

fn reject(err: ArgError) -> ArgError {
    tracing::warn!(error = %err, "rejected argument");
    err
}

fn wrong_shape(field: &str, shape: ArgShape) -> ArgError {
    reject(ArgError::WrongShape {
        field: field.to_string(),
        expected: shape.expected(),
    })
}

pub fn validate(field: &str, value: &Value, shape: ArgShape) -> Result<ArgValue, ArgError> {
    match shape {
        ArgShape::Text => match value {
            Value::String(s) => Ok(ArgValue::Text(s.clone())),
            _ => Err(wrong_shape(field, shape)),
        },
        ArgShape::TagName => match value {
            Value::String(s) => check_tag_name(s).map(ArgValue::Text),
            _ => Err(wrong_shape(field, shape)),
        },
        ArgShape::ClassName => match value {
            Value::String(s) => {
                check_class_names(std::slice::from_ref(&s.as_str()))?;
                Ok(ArgValue::Text(s.clone()))
            }
            _ => Err(wrong_shape(field, shape)),
        },
        ArgShape::TagList | ArgShape::ClassList => {
            let items = string_list(value).ok_or_else(|| wrong_shape(field, shape))?;
            if shape == ArgShape::TagList {
                let tags = items
                    .iter()
                    .map(|tag| check_tag_name(tag))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(ArgValue::List(tags))
            } else {
                let names: Vec<&str> = items.iter().map(String::as_str).collect();
                check_class_names(&names)?;
                Ok(ArgValue::List(items))
            }
        }
        ArgShape::Path => {
            let Value::Array(items) = value else {
                return Err(wrong_shape(field, shape));
            };
            items
                .iter()
                .map(|item| item.as_u64().and_then(|ix| usize::try_from(ix).ok()))
                .collect::<Option<Vec<usize>>>()
                .map(ArgValue::Path)
                .ok_or_else(|| wrong_shape(field, shape))
        }
        ArgShape::StringMap => {
            let Value::Object(map) = value else {
                return Err(wrong_shape(field, shape));
            };
            map.iter()
                .map(|(k, v)| Some((k.clone(), v.as_str()?.to_string())))
                .collect::<Option<BTreeMap<_, _>>>()
                .map(ArgValue::Map)
                .ok_or_else(|| wrong_shape(field, shape))
        }
    }
}

fn string_list(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::String(s) => Some(vec![s.clone()]),
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => None,
    }
}

/// Looks up `field`; `null` counts as absent.
pub fn optional<'a>(args: Option<&'a Value>, field: &str) -> Option<&'a Value> {
    args?.get(field).filter(|value| !value.is_null())
}

pub fn required<'a>(args: Option<&'a Value>, field: &str) -> Result<&'a Value, ArgError> {
    optional(args, field).ok_or_else(|| reject(ArgError::Missing(field.to_string())))
}

pub fn text_arg(args: Option<&Value>, field: &str) -> Result<String, ArgError> {
    match validate(field, required(args, field)?, ArgShape::Text)? {
        ArgValue::Text(text) => Ok(text),
        _ => Err(wrong_shape(field, ArgShape::Text)),
    }
}

pub fn tag_arg(args: Option<&Value>, field: &str) -> Result<String, ArgError> {
    match validate(field, required(args, field)?, ArgShape::TagName)? {
        ArgValue::Text(tag) => Ok(tag),
        _ => Err(wrong_shape(field, ArgShape::TagName)),
    }
}

pub fn optional_tag_arg(args: Option<&Value>, field: &str) -> Result<Option<String>, ArgError> {
    optional(args, field)
        .map(|_| tag_arg(args, field))
        .transpose()
}

/// A list argument; absent means empty.
pub fn list_arg(args: Option<&Value>, field: &str, shape: ArgShape) -> Result<Vec<String>, ArgError> {
    let Some(value) = optional(args, field) else {
        return Ok(Vec::new());
    };
    match validate(field, value, shape)? {
        ArgValue::List(items) => Ok(items),
        _ => Err(wrong_shape(field, shape)),
    }
}

pub fn map_arg(args: Option<&Value>, field: &str) -> Result<BTreeMap<String, String>, ArgError> {
    let Some(value) = optional(args, field) else {
        return Ok(BTreeMap::new());
    };
    match validate(field, value, ArgShape::StringMap)? {
        ArgValue::Map(map) => Ok(map),
        _ => Err(wrong_shape(field, ArgShape::StringMap)),
    }
}

/// An element addressed by path, if given.
pub fn element_arg(doc: &Document, args: Option<&Value>, field: &str) -> Result<Option<NodeId>, ArgError> {
    let Some(value) = optional(args, field) else {
        return Ok(None);
    };
    match validate(field, value, ArgShape::Path)? {
        ArgValue::Path(path) => resolve_path(doc, &path).map(Some),
        _ => Err(wrong_shape(field, ArgShape::Path)),
    }
}

pub fn resolve_path(doc: &Document, path: &[usize]) -> Result<NodeId, ArgError> {
    let node = doc
        .node_at_path(path)
        .ok_or_else(|| reject(ArgError::UnknownPath(path.to_vec())))?;
    check_container(doc, node)
}

/// Accepts the root or an element attached to the document.
pub fn check_container(doc: &Document, node: NodeId) -> Result<NodeId, ArgError> {
    if node == doc.root() || (doc.is_element(node) && doc.is_attached(node)) {
        Ok(node)
    } else {
        Err(reject(ArgError::NotAnElement))
    }
}

/// Lowercases `tag` after checking it is a plausible element name.
pub fn check_tag_name(tag: &str) -> Result<String, ArgError> {
    let mut chars = tag.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-');
    if valid {
        Ok(tag.to_ascii_lowercase())
    } else {
        Err(reject(ArgError::InvalidTagName(tag.to_string())))
    }
}

pub fn check_class_names(classes: &[&str]) -> Result<(), ArgError> {
    match classes
        .iter()
        .find(|class| class.is_empty() || class.contains(char::is_whitespace))
    {
        Some(class) => Err(reject(ArgError::InvalidClassName(class.to_string()))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn lists_accept_single_strings() {
        let args = json!({ "tags": "B", "classes": ["a", "b"] });
        assert_eq!(
            list_arg(Some(&args), "tags", ArgShape::TagList),
            Ok(vec!["b".to_string()])
        );
        assert_eq!(
            list_arg(Some(&args), "classes", ArgShape::ClassList),
            Ok(vec!["a".to_string(), "b".to_string()])
        );
        assert_eq!(list_arg(Some(&args), "missing", ArgShape::TagList), Ok(vec![]));
    }

    #[test]
    fn wrong_shapes_are_rejected() {
        let args = json!({ "tag": 3, "path": [0, -1], "classes": ["two words"] });
        assert!(matches!(
            tag_arg(Some(&args), "tag"),
            Err(ArgError::WrongShape { .. })
        ));
        assert!(matches!(
            validate("path", &args["path"], ArgShape::Path),
            Err(ArgError::WrongShape { .. })
        ));
        assert_eq!(
            list_arg(Some(&args), "classes", ArgShape::ClassList),
            Err(ArgError::InvalidClassName("two words".to_string()))
        );
        assert_eq!(
            text_arg(None, "html"),
            Err(ArgError::Missing("html".to_string()))
        );
    }

    #[test]
    fn tag_names_are_checked() {
        assert_eq!(check_tag_name("H1"), Ok("h1".to_string()));
        assert!(check_tag_name("1h").is_err());
        assert!(check_tag_name("a b").is_err());
        assert!(check_tag_name("").is_err());
    }
}
