//! # Palette Drops
//!
//! Turns "item X was released over target Y" into a [`Command`], enforcing
//! where each kind of palette item may land:
//!
//! | Item          | Canvas              | Section    | Row | Column |
//! |---------------|---------------------|------------|-----|--------|
//! | content block | rejected            | rejected   | rejected | insert |
//! | N columns     | new wrapping section | new row   | rejected | rejected |
//! | section       | new section         | rejected   | rejected | rejected |
//!
//! A block dropped outside a column is rejected rather than wrapped for the
//! user; only structural items get automatic containers.

use crate::errors::DropRejection;
use crate::locate::{find_column, find_row, find_section};
use crate::mutations::{Command, InsertPosition};
use mailforge_schema::{Column, ContentBlock, Document, Row, Section};
use serde::{Deserialize, Serialize};

/// Widest row the palette can create
pub const MAX_COLUMNS: usize = 4;

/// Something dragged in from the sidebar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum PaletteItem {
    Block(ContentBlock),
    Columns(usize),
    Section,
}

impl PaletteItem {
    fn label(&self) -> String {
        match self {
            PaletteItem::Block(block) => format!("{} block", block.kind().as_str()),
            PaletteItem::Columns(n) => format!("{n}-column row"),
            PaletteItem::Section => "section".to_string(),
        }
    }
}

/// Where the item was released
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum DropTarget {
    /// The document root, with an optional insertion index among sections
    Canvas { index: Option<usize> },
    Section { section_id: String, index: Option<usize> },
    Row { row_id: String },
    Column { column_id: String, index: Option<usize> },
}

impl DropTarget {
    fn label(&self) -> String {
        match self {
            DropTarget::Canvas { .. } => "the canvas".to_string(),
            DropTarget::Section { section_id, .. } => format!("section {section_id}"),
            DropTarget::Row { row_id } => format!("row {row_id}"),
            DropTarget::Column { column_id, .. } => format!("column {column_id}"),
        }
    }
}

fn position(index: Option<usize>) -> InsertPosition {
    index.map(InsertPosition::Index).unwrap_or_default()
}

/// Build a row of `count` empty columns with ids drawn from `next_id`
fn new_row(count: usize, next_id: &mut impl FnMut(&str) -> String) -> Result<Row, DropRejection> {
    if count == 0 || count > MAX_COLUMNS {
        return Err(DropRejection::InvalidColumnCount(count));
    }
    let row = Row::new(next_id("row"));
    Ok((0..count).fold(row, |row, _| row.with_column(Column::new(next_id("column")))))
}

/// Resolve a palette drop into the command that performs it.
///
/// `next_id` is called with a node kind (`"section"`, `"row"`, `"column"`)
/// for every container the drop has to create.
pub fn resolve_drop(
    doc: &Document,
    item: &PaletteItem,
    target: &DropTarget,
    mut next_id: impl FnMut(&str) -> String,
) -> Result<Command, DropRejection> {
    let invalid = || DropRejection::InvalidTarget {
        item: item.label(),
        target: target.label(),
    };

    match (item, target) {
        (PaletteItem::Block(block), DropTarget::Column { column_id, index }) => {
            let location = find_column(doc, column_id)
                .ok_or_else(|| DropRejection::TargetNotFound(column_id.clone()))?;
            if location.is_locked(doc) {
                return Err(DropRejection::Locked(column_id.clone()));
            }
            Ok(Command::InsertBlock {
                column_id: column_id.clone(),
                block: block.clone(),
                position: position(*index),
            })
        }

        (PaletteItem::Block(_), _) => Err(DropRejection::BlockOutsideColumn {
            target: target.label(),
        }),

        (PaletteItem::Columns(count), DropTarget::Canvas { index }) => {
            let section = Section::new(next_id("section")).with_row(new_row(*count, &mut next_id)?);
            Ok(Command::InsertSection {
                section,
                position: position(*index),
            })
        }

        (PaletteItem::Columns(count), DropTarget::Section { section_id, index }) => {
            let location = find_section(doc, section_id)
                .ok_or_else(|| DropRejection::TargetNotFound(section_id.clone()))?;
            if doc.sections[location.index].locked {
                return Err(DropRejection::Locked(section_id.clone()));
            }
            Ok(Command::InsertRow {
                section_id: section_id.clone(),
                row: new_row(*count, &mut next_id)?,
                position: position(*index),
            })
        }

        (PaletteItem::Section, DropTarget::Canvas { index }) => Ok(Command::InsertSection {
            section: Section::new(next_id("section")),
            position: position(*index),
        }),

        (_, DropTarget::Row { row_id }) => {
            // Report a missing row before the structural mismatch
            find_row(doc, row_id).ok_or_else(|| DropRejection::TargetNotFound(row_id.clone()))?;
            Err(invalid())
        }

        _ => Err(invalid()),
    }
}
