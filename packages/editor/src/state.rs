//! # Editor State
//!
//! The explicit state object a host holds for one open document: history,
//! id generation and change listeners. Every edit goes through here so the
//! history sees each commit exactly once.

use crate::drop::{resolve_drop, DropTarget, PaletteItem, MAX_COLUMNS};
use crate::errors::{DropRejection, EditorError};
use crate::history::{CommitOptions, History, DEFAULT_MAX_LEVELS};
use crate::locate::{contains_id, find_block};
use crate::mutations::Command;
use crate::upload::{UploadError, UploadedFile, Uploader};
use mailforge_schema::{ContentBlock, Document, IdGenerator};
use std::borrow::Cow;
use tracing::{debug, instrument};

/// Host hooks fired after edits
pub trait EditorListener {
    /// After every commit, undo, redo or load
    fn document_changed(&mut self, _doc: &Document) {}

    /// After an explicit save of a dirty document
    fn saved(&mut self, _doc: &Document) {}
}

pub struct EditorState {
    history: History,
    ids: IdGenerator,
    listeners: Vec<Box<dyn EditorListener>>,
}

/// Next generated id for `kind` that is not already used in `doc`
fn fresh_id(ids: &mut IdGenerator, doc: &Document, kind: &str) -> String {
    loop {
        let id = ids.next_id(kind);
        if !contains_id(doc, &id) {
            return id;
        }
    }
}

impl EditorState {
    pub fn new(doc: Document) -> Self {
        Self::with_max_levels(doc, DEFAULT_MAX_LEVELS)
    }

    pub fn with_max_levels(doc: Document, max_levels: usize) -> Self {
        Self {
            ids: IdGenerator::new(&doc.meta.title),
            history: History::with_max_levels(doc, max_levels),
            listeners: Vec::new(),
        }
    }

    /// Validate a JSON document and open it
    pub fn from_json(json: &str) -> Result<Self, EditorError> {
        Ok(Self::new(mailforge_schema::parse_str(json)?))
    }

    pub fn add_listener(&mut self, listener: Box<dyn EditorListener>) {
        self.listeners.push(listener);
    }

    pub fn document(&self) -> &Document {
        self.history.present()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    fn notify_changed(&mut self) {
        let doc = self.history.present();
        for listener in &mut self.listeners {
            listener.document_changed(doc);
        }
    }

    /// Apply a command and record it. Returns false on a no-op.
    #[instrument(skip_all, fields(command = command.name()))]
    pub fn apply(&mut self, command: &Command) -> bool {
        let next = match command.apply(self.history.present()) {
            Cow::Borrowed(_) => return false,
            Cow::Owned(next) => next,
        };
        let changed = self.history.commit(next);
        if changed {
            self.notify_changed();
        }
        changed
    }

    /// Replace the document wholesale; clears undo history
    pub fn load(&mut self, doc: Document) {
        self.ids = IdGenerator::new(&doc.meta.title);
        self.history
            .commit_with(doc, CommitOptions { replace_history: true });
        self.notify_changed();
    }

    pub fn undo(&mut self) -> bool {
        let changed = self.history.undo();
        if changed {
            self.notify_changed();
        }
        changed
    }

    pub fn redo(&mut self) -> bool {
        let changed = self.history.redo();
        if changed {
            self.notify_changed();
        }
        changed
    }

    /// Persist the current document if dirty. Returns whether a save happened.
    pub fn save(&mut self) -> bool {
        let Some(doc) = self.history.save() else {
            return false;
        };
        for listener in &mut self.listeners {
            listener.saved(doc);
        }
        true
    }

    pub fn is_dirty(&self) -> bool {
        self.history.is_dirty()
    }

    /// Generate an id no node in the current document uses
    pub fn fresh_id(&mut self, kind: &str) -> String {
        fresh_id(&mut self.ids, self.history.present(), kind)
    }

    /// Drop a palette item, creating any containers it needs
    pub fn drop_item(&mut self, item: &PaletteItem, target: &DropTarget) -> Result<bool, DropRejection> {
        let doc = self.history.present();
        let ids = &mut self.ids;
        let command = resolve_drop(doc, item, target, |kind| fresh_id(ids, doc, kind))?;
        Ok(self.apply(&command))
    }

    /// Rebuild a row with `count` columns, reflowing its blocks into the first
    pub fn change_column_count(&mut self, row_id: &str, count: usize) -> Result<bool, DropRejection> {
        if count == 0 || count > MAX_COLUMNS {
            return Err(DropRejection::InvalidColumnCount(count));
        }
        let column_ids = (0..count).map(|_| self.fresh_id("column")).collect();
        Ok(self.apply(&Command::ReplaceRowStructure {
            row_id: row_id.to_string(),
            column_ids,
        }))
    }

    /// Copy a block directly after itself; returns the copy's id
    pub fn duplicate_block(&mut self, block_id: &str) -> Option<String> {
        let kind = find_block(self.document(), block_id)?.block(self.document()).kind();
        let new_id = self.fresh_id(kind.as_str());
        self.apply(&Command::DuplicateBlock {
            block_id: block_id.to_string(),
            new_id: new_id.clone(),
        })
        .then_some(new_id)
    }

    /// Upload `file` and point the image block `block_id` at the result.
    ///
    /// The block is checked before the upload starts and again after it
    /// finishes, since the document may have changed meanwhile.
    pub async fn upload_image<U: Uploader>(
        &mut self,
        uploader: &U,
        block_id: &str,
        file: UploadedFile,
    ) -> Result<String, EditorError> {
        self.image_block(block_id)?;
        debug!(block_id, file = %file.name, "uploading image");

        let url = uploader.upload(file).await?;

        let mut block = self.image_block(block_id)?;
        if let ContentBlock::Image(image) = &mut block {
            image.props.src = url.clone();
        }
        self.apply(&Command::UpdateBlock { block });
        Ok(url)
    }

    fn image_block(&self, block_id: &str) -> Result<ContentBlock, UploadError> {
        let doc = self.document();
        let location =
            find_block(doc, block_id).ok_or_else(|| UploadError::BlockNotFound(block_id.to_string()))?;
        if location.is_locked(doc) {
            return Err(UploadError::Locked(block_id.to_string()));
        }
        match location.block(doc) {
            block @ ContentBlock::Image(_) => Ok(block.clone()),
            _ => Err(UploadError::NotAnImage(block_id.to_string())),
        }
    }
}
