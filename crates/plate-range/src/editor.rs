use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::command::CommandRegistry;
use crate::config::EditorConfig;
use crate::document::Document;
use crate::error::CommandError;
use crate::range::Range;
use crate::selection::{SavedSelection, Selection, save_many};

/// A document together with its active selection.
///
/// Selection-level operations (`replace_within_valid_tags`,
/// `toggle_block_classes`, `clear_formatting`, ...) live in their own
/// modules as `impl Editor` blocks and act on the active selection. Use
/// [`Editor::with_selection`] to run one of them against an explicit
/// selection instead.
pub struct Editor {
    doc: Document,
    selection: Selection,
    saved: Option<SavedSelection>,
    registry: CommandRegistry,
    config: EditorConfig,
}

impl Editor {
    pub fn new(doc: Document, selection: Selection, config: EditorConfig) -> Self {
        let mut editor = Self {
            doc,
            selection: Selection::new(),
            saved: None,
            registry: CommandRegistry::selection(),
            config: config.with_defaults(),
        };
        editor.set_selection(selection);
        editor
    }

    pub fn from_html(markup: &str) -> Self {
        Self::with_config(markup, EditorConfig::default())
    }

    pub fn with_config(markup: &str, config: EditorConfig) -> Self {
        let config = config.with_defaults();
        let doc = Document::parse_with_config(markup, &config);
        Self::new(doc, Selection::new(), config)
    }

    pub fn doc(&self) -> &Document {
        &self.doc
    }

    pub fn doc_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Replaces the active selection. Ranges that do not point into the
    /// document are dropped and overlapping ones merged.
    pub fn set_selection(&mut self, selection: Selection) {
        let backwards = selection.is_backwards();
        let ranges = selection
            .ranges()
            .iter()
            .copied()
            .filter(|range| range.is_valid(&self.doc))
            .collect();
        self.selection = Selection::from_ranges(&self.doc, ranges).backwards(backwards);
    }

    pub(crate) fn doc_and_selection(&mut self) -> (&mut Document, &mut Selection) {
        (&mut self.doc, &mut self.selection)
    }

    pub fn select(&mut self, range: Range) {
        self.set_selection(Selection::single(range));
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn to_html(&self) -> String {
        self.doc.to_html()
    }

    /// Pins the active selection with markers and clears it. Does nothing
    /// and returns `false` when a selection is already saved, unless
    /// `overwrite` is set.
    ///
    /// The active selection stays empty until [`Editor::restore_selection`]
    /// or [`Editor::discard_selection`]: the markers split text nodes, so
    /// its offsets no longer hold while they are in the tree.
    pub fn save_selection(&mut self, overwrite: bool) -> bool {
        if self.saved.is_some() && !overwrite {
            return false;
        }
        let saved = self.selection.save(&mut self.doc);
        if let Some(previous) = self.saved.replace(saved) {
            previous.discard(&mut self.doc);
        }
        self.selection.remove_all_ranges();
        true
    }

    /// Brings back the saved selection. Returns `false` when nothing was
    /// saved.
    pub fn restore_selection(&mut self) -> bool {
        let Some(saved) = self.saved.take() else {
            return false;
        };
        self.selection = saved.restore(&mut self.doc);
        true
    }

    pub fn discard_selection(&mut self) -> bool {
        let Some(saved) = self.saved.take() else {
            return false;
        };
        saved.discard(&mut self.doc);
        true
    }

    pub fn has_saved_selection(&self) -> bool {
        self.saved.is_some()
    }

    /// Runs `f` with `selection` as the active selection, or with the
    /// active one when `None`. The previous active selection is pinned
    /// for the duration and comes back afterwards.
    pub fn with_selection<R>(
        &mut self,
        selection: Option<Selection>,
        f: impl FnOnce(&mut Editor) -> R,
    ) -> R {
        let Some(explicit) = selection else {
            return f(self);
        };
        let mut saved = save_many(&mut self.doc, &[&self.selection, &explicit]);
        let explicit = saved.pop();
        let active = saved.pop();

        self.selection = explicit
            .map(|explicit| explicit.restore(&mut self.doc))
            .unwrap_or_default();
        let result = f(self);
        if let Some(active) = active {
            self.selection = active.restore(&mut self.doc);
        }
        result
    }

    /// Runs `f` over each range of the active selection.
    /// See [`Selection::for_each_range`].
    pub fn for_each_range<R>(
        &mut self,
        f: impl FnMut(&mut Document, &mut Range) -> R,
    ) -> Vec<R> {
        self.selection.for_each_range(&mut self.doc, f)
    }

    pub fn run_command(&mut self, id: &str, args: Option<Value>) -> Result<(), CommandError> {
        let Some(command) = self.registry.command(id) else {
            return Err(CommandError::UnknownCommand(id.to_string()));
        };
        tracing::debug!(command = id, "running command");
        (command.handler)(self, args)
    }

    pub fn run_query_json(&self, id: &str, args: Option<Value>) -> Result<Value, CommandError> {
        let Some(query) = self.registry.query(id) else {
            return Err(CommandError::UnknownQuery(id.to_string()));
        };
        (query.handler)(self, args)
    }

    pub fn run_query<T>(&self, id: &str, args: Option<Value>) -> Result<T, CommandError>
    where
        T: DeserializeOwned,
    {
        let value = self.run_query_json(id, args)?;
        Ok(serde_json::from_value(value)?)
    }
}
