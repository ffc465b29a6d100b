mod args;
mod block;
mod clear;
mod command;
mod config;
mod document;
mod editor;
mod error;
mod html;
mod node;
mod range;
mod replace;
mod selection;
mod tags;
mod wrapper;

pub use crate::args::*;
pub use crate::block::closest_block;
pub use crate::command::*;
pub use crate::config::*;
pub use crate::document::*;
pub use crate::editor::*;
pub use crate::error::*;
pub use crate::html::{is_void_tag, parse_fragment, serialize};
pub use crate::node::*;
pub use crate::range::*;
pub use crate::selection::*;
pub use crate::wrapper::WrapperOptions;

pub use indextree::NodeId;
