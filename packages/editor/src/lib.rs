//! # Mailforge Editor
//!
//! Document editing for the email builder: structural commands, palette
//! drops, undo/redo history and the state object a host keeps per document.
//!
//! ## Architecture
//!
//! ```text
//! drag/drop, toolbar, API
//!     ↓
//! PaletteItem + DropTarget ──resolve_drop──→ Command
//!     ↓
//! Command::apply(&Document) → Cow<Document>   (Borrowed = no-op)
//!     ↓
//! History::commit → listeners
//! ```
//!
//! Commands are pure: they never modify the document they are given. A
//! command that cannot apply (missing id, locked target, index out of range)
//! is a no-op rather than an error; [`Command::try_apply`] reports the reason.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mailforge_editor::{Command, EditorState};
//!
//! let mut state = EditorState::from_json(json)?;
//! state.apply(&Command::MoveBlock {
//!     source_column_id: "c1".into(),
//!     source_index: 0,
//!     target_column_id: "c2".into(),
//!     target_index: 0,
//! });
//! state.undo();
//! ```

mod drop;
mod errors;
mod history;
mod locate;
mod mutations;
mod state;
mod upload;

pub use drop::{resolve_drop, DropTarget, PaletteItem, MAX_COLUMNS};
pub use errors::{DropRejection, EditorError, Rejection};
pub use history::{CommitOptions, History, SaveState, DEFAULT_MAX_LEVELS};
pub use locate::{
    contains_id, find_block, find_column, find_node, find_row, find_section, BlockLocation,
    ColumnLocation, NodeLocation, RowLocation, SectionLocation,
};
pub use mutations::{Command, InsertPosition, NodeFlag};
pub use state::{EditorListener, EditorState};
pub use upload::{UploadError, UploadedFile, Uploader};
