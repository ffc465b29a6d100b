use serde::{Deserialize, Serialize};

const DEFAULT_INLINE_TAGS: &[&str] = &[
    "a", "abbr", "b", "bdi", "bdo", "big", "br", "cite", "code", "data", "dfn", "em", "font", "i",
    "img", "input", "kbd", "label", "mark", "q", "s", "samp", "select", "small", "span", "strike",
    "strong", "sub", "sup", "textarea", "time", "tt", "u", "var", "wbr",
];
const DEFAULT_BLOCK_TAG: &str = "div";
const DEFAULT_REPLACEMENT_ATTR: &str = "data-replacement";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Tags laid out inline. Every other element counts as a block.
    pub inline_tags: Vec<String>,
    /// Wrapper created when block styles land on a limit with no block inside.
    pub default_block_tag: String,
    /// Attribute that tags freshly spliced content until it has been located.
    pub replacement_attr: String,
}

impl EditorConfig {
    pub fn with_defaults(mut self) -> Self {
        if self.inline_tags.is_empty() {
            self.inline_tags = DEFAULT_INLINE_TAGS.iter().map(|t| t.to_string()).collect();
        }
        if self.default_block_tag.is_empty() {
            self.default_block_tag = DEFAULT_BLOCK_TAG.to_string();
        }
        if self.replacement_attr.is_empty() {
            self.replacement_attr = DEFAULT_REPLACEMENT_ATTR.to_string();
        }
        self
    }

    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(s).map(Self::with_defaults)
    }
}
