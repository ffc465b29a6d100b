use thiserror::Error;

/// A public operation was handed arguments of the wrong shape. Nothing
/// has been mutated when one of these comes back.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgError {
    #[error("missing argument `{0}`")]
    Missing(String),

    #[error("argument `{field}` must be {expected}")]
    WrongShape {
        field: String,
        expected: &'static str,
    },

    #[error("invalid tag name `{0}`")]
    InvalidTagName(String),

    #[error("invalid class name `{0}`")]
    InvalidClassName(String),

    #[error("no node at path {0:?}")]
    UnknownPath(Vec<usize>),

    #[error("node is not an element attached to the document")]
    NotAnElement,
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("unknown command `{0}`")]
    UnknownCommand(String),

    #[error("unknown query `{0}`")]
    UnknownQuery(String),

    #[error(transparent)]
    Arg(#[from] ArgError),

    #[error("failed to convert query value: {0}")]
    Json(#[from] serde_json::Error),
}
