//! # Structural Commands
//!
//! Pure operations over an email document. Applying a command never touches
//! the input tree: [`Command::apply`] returns `Cow::Owned` with the new tree,
//! or `Cow::Borrowed` (the very same reference) when the command is a no-op.
//! Callers use that distinction as their "did anything change" check.
//!
//! ## Semantics
//!
//! ### Moves
//! - Remove at the source index, then insert at the target index
//! - Within one container, a target index past the source index is shifted
//!   down by one to compensate for the removal
//! - Missing containers or locked endpoints make the move a no-op
//!
//! ### Inserts
//! - Positions clamp into `[0, len]`; `After(id)` falls back to the end
//! - Inserted ids must not already exist in the document
//!
//! ### Structure replacement
//! - Changing a row's column count never drops content: every block of the
//!   old columns is reflowed, in reading order, into the first new column
//!
//! ### Flags
//! - `locked`/`hidden` on a container are written onto every descendant
//! - On a block they affect only that block

use crate::errors::Rejection;
use crate::locate::{find_block, find_column, find_node, find_row, find_section, NodeLocation};
use mailforge_schema::{
    Column, ContentBlock, Document, DocumentMeta, Row, Section, Theme, VariableBag,
};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use tracing::debug;

/// Where to place an inserted node among its siblings
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum InsertPosition {
    /// Clamped into `[0, len]`
    Index(usize),
    /// Directly after the sibling with this id, or at the end if it is gone
    After(String),
    #[default]
    End,
}

impl InsertPosition {
    fn resolve<'a>(&self, sibling_ids: impl Iterator<Item = &'a str>, len: usize) -> usize {
        match self {
            InsertPosition::Index(index) => (*index).min(len),
            InsertPosition::After(id) => {
                let mut ids = sibling_ids;
                ids.position(|sibling| sibling == id)
                    .map(|pos| pos + 1)
                    .unwrap_or(len)
            }
            InsertPosition::End => len,
        }
    }
}

/// Per-node boolean that cascades from containers to their descendants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeFlag {
    Locked,
    Hidden,
}

/// Structural and prop-level edits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Command {
    MoveBlock {
        source_column_id: String,
        source_index: usize,
        target_column_id: String,
        target_index: usize,
    },

    MoveColumn {
        source_row_id: String,
        source_index: usize,
        target_row_id: String,
        target_index: usize,
    },

    MoveRow {
        source_section_id: String,
        source_index: usize,
        target_section_id: String,
        target_index: usize,
    },

    MoveSection {
        source_index: usize,
        target_index: usize,
    },

    InsertSection {
        section: Section,
        #[serde(default)]
        position: InsertPosition,
    },

    InsertRow {
        section_id: String,
        row: Row,
        #[serde(default)]
        position: InsertPosition,
    },

    InsertColumn {
        row_id: String,
        column: Column,
        #[serde(default)]
        position: InsertPosition,
    },

    InsertBlock {
        column_id: String,
        block: ContentBlock,
        #[serde(default)]
        position: InsertPosition,
    },

    /// Rebuild a row with fresh empty columns (one per id), reflowing all
    /// existing blocks into the first of them
    ReplaceRowStructure {
        row_id: String,
        column_ids: Vec<String>,
    },

    SetFlag {
        node_id: String,
        flag: NodeFlag,
        value: bool,
    },

    ToggleFlag {
        node_id: String,
        flag: NodeFlag,
    },

    DeleteSection {
        section_id: String,
    },

    DeleteRow {
        row_id: String,
    },

    DeleteColumn {
        column_id: String,
    },

    DeleteBlock {
        block_id: String,
    },

    /// Replace a block's content; the block keeps its id and flags
    UpdateBlock {
        block: ContentBlock,
    },

    DuplicateBlock {
        block_id: String,
        new_id: String,
    },

    UpdateMeta {
        meta: DocumentMeta,
    },

    SetVariables {
        variables: Option<VariableBag>,
    },

    SetTheme {
        theme: Option<Theme>,
    },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::MoveBlock { .. } => "MoveBlock",
            Command::MoveColumn { .. } => "MoveColumn",
            Command::MoveRow { .. } => "MoveRow",
            Command::MoveSection { .. } => "MoveSection",
            Command::InsertSection { .. } => "InsertSection",
            Command::InsertRow { .. } => "InsertRow",
            Command::InsertColumn { .. } => "InsertColumn",
            Command::InsertBlock { .. } => "InsertBlock",
            Command::ReplaceRowStructure { .. } => "ReplaceRowStructure",
            Command::SetFlag { .. } => "SetFlag",
            Command::ToggleFlag { .. } => "ToggleFlag",
            Command::DeleteSection { .. } => "DeleteSection",
            Command::DeleteRow { .. } => "DeleteRow",
            Command::DeleteColumn { .. } => "DeleteColumn",
            Command::DeleteBlock { .. } => "DeleteBlock",
            Command::UpdateBlock { .. } => "UpdateBlock",
            Command::DuplicateBlock { .. } => "DuplicateBlock",
            Command::UpdateMeta { .. } => "UpdateMeta",
            Command::SetVariables { .. } => "SetVariables",
            Command::SetTheme { .. } => "SetTheme",
        }
    }

    /// Apply to `doc`, returning the same reference when nothing changes
    pub fn apply<'a>(&self, doc: &'a Document) -> Cow<'a, Document> {
        let mut next = doc.clone();
        match self.try_apply(&mut next) {
            Ok(()) if next != *doc => Cow::Owned(next),
            Ok(()) => {
                debug!(command = self.name(), "command left document unchanged");
                Cow::Borrowed(doc)
            }
            Err(rejection) => {
                debug!(command = self.name(), %rejection, "command rejected");
                Cow::Borrowed(doc)
            }
        }
    }

    /// Apply in place, reporting why the command was refused.
    ///
    /// Every check runs before the first write, so `doc` is untouched on `Err`.
    pub fn try_apply(&self, doc: &mut Document) -> Result<(), Rejection> {
        match self {
            Command::MoveBlock {
                source_column_id,
                source_index,
                target_column_id,
                target_index,
            } => move_block(doc, source_column_id, *source_index, target_column_id, *target_index),

            Command::MoveColumn {
                source_row_id,
                source_index,
                target_row_id,
                target_index,
            } => move_column(doc, source_row_id, *source_index, target_row_id, *target_index),

            Command::MoveRow {
                source_section_id,
                source_index,
                target_section_id,
                target_index,
            } => move_row(doc, source_section_id, *source_index, target_section_id, *target_index),

            Command::MoveSection {
                source_index,
                target_index,
            } => move_section(doc, *source_index, *target_index),

            Command::InsertSection { section, position } => insert_section(doc, section, position),

            Command::InsertRow {
                section_id,
                row,
                position,
            } => insert_row(doc, section_id, row, position),

            Command::InsertColumn {
                row_id,
                column,
                position,
            } => insert_column(doc, row_id, column, position),

            Command::InsertBlock {
                column_id,
                block,
                position,
            } => insert_block(doc, column_id, block, position),

            Command::ReplaceRowStructure { row_id, column_ids } => {
                replace_row_structure(doc, row_id, column_ids)
            }

            Command::SetFlag {
                node_id,
                flag,
                value,
            } => set_flag(doc, node_id, *flag, *value),

            Command::ToggleFlag { node_id, flag } => {
                let current = flag_value(doc, node_id, *flag)
                    .ok_or_else(|| Rejection::not_found("Node", node_id))?;
                set_flag(doc, node_id, *flag, !current)
            }

            Command::DeleteSection { section_id } => delete_section(doc, section_id),
            Command::DeleteRow { row_id } => delete_row(doc, row_id),
            Command::DeleteColumn { column_id } => delete_column(doc, column_id),
            Command::DeleteBlock { block_id } => delete_block(doc, block_id),

            Command::UpdateBlock { block } => update_block(doc, block),

            Command::DuplicateBlock { block_id, new_id } => duplicate_block(doc, block_id, new_id),

            Command::UpdateMeta { meta } => {
                doc.meta = meta.clone();
                Ok(())
            }

            Command::SetVariables { variables } => {
                doc.variables = variables.clone();
                Ok(())
            }

            Command::SetTheme { theme } => {
                doc.theme = theme.clone();
                Ok(())
            }
        }
    }
}

/// Destination index after removing the source element from the same list
fn adjusted_index(same_container: bool, source_index: usize, target_index: usize) -> usize {
    if same_container && target_index > source_index {
        target_index - 1
    } else {
        target_index
    }
}

fn check_index(container: &str, index: usize, len: usize) -> Result<(), Rejection> {
    if index < len {
        Ok(())
    } else {
        Err(Rejection::IndexOutOfRange {
            container: container.to_string(),
            index,
            len,
        })
    }
}

fn move_block(
    doc: &mut Document,
    source_column_id: &str,
    source_index: usize,
    target_column_id: &str,
    target_index: usize,
) -> Result<(), Rejection> {
    let source = find_column(doc, source_column_id)
        .ok_or_else(|| Rejection::not_found("Column", source_column_id))?;
    let target = find_column(doc, target_column_id)
        .ok_or_else(|| Rejection::not_found("Column", target_column_id))?;

    let source_len = source.column(doc).blocks.len();
    check_index(source_column_id, source_index, source_len)?;

    if source.is_locked(doc) {
        return Err(Rejection::Locked(source_column_id.to_string()));
    }
    if target.is_locked(doc) {
        return Err(Rejection::Locked(target_column_id.to_string()));
    }
    let block = &source.column(doc).blocks[source_index];
    if block.is_locked() {
        return Err(Rejection::Locked(block.id().to_string()));
    }

    let same = source_column_id == target_column_id;
    let destination = adjusted_index(same, source_index, target_index);
    if same && destination.min(source_len - 1) == source_index {
        return Err(Rejection::Unchanged);
    }

    let block = source.column_mut(doc).blocks.remove(source_index);
    let blocks = &mut target.column_mut(doc).blocks;
    let destination = destination.min(blocks.len());
    blocks.insert(destination, block);
    Ok(())
}

fn move_column(
    doc: &mut Document,
    source_row_id: &str,
    source_index: usize,
    target_row_id: &str,
    target_index: usize,
) -> Result<(), Rejection> {
    let source = find_row(doc, source_row_id).ok_or_else(|| Rejection::not_found("Row", source_row_id))?;
    let target = find_row(doc, target_row_id).ok_or_else(|| Rejection::not_found("Row", target_row_id))?;

    let source_len = source.row(doc).columns.len();
    check_index(source_row_id, source_index, source_len)?;

    if source.is_locked(doc) {
        return Err(Rejection::Locked(source_row_id.to_string()));
    }
    if target.is_locked(doc) {
        return Err(Rejection::Locked(target_row_id.to_string()));
    }
    let column = &source.row(doc).columns[source_index];
    if column.locked {
        return Err(Rejection::Locked(column.id.clone()));
    }

    let same = source_row_id == target_row_id;
    let destination = adjusted_index(same, source_index, target_index);
    if same && destination.min(source_len - 1) == source_index {
        return Err(Rejection::Unchanged);
    }

    let column = source.row_mut(doc).columns.remove(source_index);
    let columns = &mut target.row_mut(doc).columns;
    let destination = destination.min(columns.len());
    columns.insert(destination, column);
    Ok(())
}

fn move_row(
    doc: &mut Document,
    source_section_id: &str,
    source_index: usize,
    target_section_id: &str,
    target_index: usize,
) -> Result<(), Rejection> {
    let source = find_section(doc, source_section_id)
        .ok_or_else(|| Rejection::not_found("Section", source_section_id))?;
    let target = find_section(doc, target_section_id)
        .ok_or_else(|| Rejection::not_found("Section", target_section_id))?;

    let source_len = doc.sections[source.index].rows.len();
    check_index(source_section_id, source_index, source_len)?;

    if doc.sections[source.index].locked {
        return Err(Rejection::Locked(source_section_id.to_string()));
    }
    if doc.sections[target.index].locked {
        return Err(Rejection::Locked(target_section_id.to_string()));
    }
    let row = &doc.sections[source.index].rows[source_index];
    if row.locked {
        return Err(Rejection::Locked(row.id.clone()));
    }

    let same = source.index == target.index;
    let destination = adjusted_index(same, source_index, target_index);
    if same && destination.min(source_len - 1) == source_index {
        return Err(Rejection::Unchanged);
    }

    let row = doc.sections[source.index].rows.remove(source_index);
    let rows = &mut doc.sections[target.index].rows;
    let destination = destination.min(rows.len());
    rows.insert(destination, row);
    Ok(())
}

fn move_section(doc: &mut Document, source_index: usize, target_index: usize) -> Result<(), Rejection> {
    let len = doc.sections.len();
    check_index("document", source_index, len)?;

    let section = &doc.sections[source_index];
    if section.locked {
        return Err(Rejection::Locked(section.id.clone()));
    }

    let destination = adjusted_index(true, source_index, target_index).min(len - 1);
    if destination == source_index {
        return Err(Rejection::Unchanged);
    }

    let section = doc.sections.remove(source_index);
    doc.sections.insert(destination, section);
    Ok(())
}

/// Ids of `section` and everything beneath it
fn subtree_ids_section(section: &Section) -> Vec<&str> {
    let mut ids = vec![section.id.as_str()];
    for row in &section.rows {
        ids.extend(subtree_ids_row(row));
    }
    ids
}

fn subtree_ids_row(row: &Row) -> Vec<&str> {
    let mut ids = vec![row.id.as_str()];
    for column in &row.columns {
        ids.extend(subtree_ids_column(column));
    }
    ids
}

fn subtree_ids_column(column: &Column) -> Vec<&str> {
    let mut ids = vec![column.id.as_str()];
    ids.extend(column.blocks.iter().map(|b| b.id()));
    ids
}

/// First locked node in a subtree, the root included
fn locked_in_column(column: &Column) -> Option<&str> {
    if column.locked {
        return Some(column.id.as_str());
    }
    column.blocks.iter().find(|b| b.is_locked()).map(|b| b.id())
}

fn locked_in_row(row: &Row) -> Option<&str> {
    if row.locked {
        return Some(row.id.as_str());
    }
    row.columns.iter().find_map(locked_in_column)
}

fn locked_in_section(section: &Section) -> Option<&str> {
    if section.locked {
        return Some(section.id.as_str());
    }
    section.rows.iter().find_map(locked_in_row)
}

fn reject_locked(locked: Option<&str>) -> Result<(), Rejection> {
    match locked {
        Some(id) => Err(Rejection::Locked(id.to_string())),
        None => Ok(()),
    }
}

fn check_new_ids(doc: &Document, new_ids: &[&str]) -> Result<(), Rejection> {
    let existing = doc.all_ids();
    for (i, id) in new_ids.iter().enumerate() {
        if existing.contains(id) || new_ids[..i].contains(id) {
            return Err(Rejection::DuplicateId(id.to_string()));
        }
    }
    Ok(())
}

fn insert_section(doc: &mut Document, section: &Section, position: &InsertPosition) -> Result<(), Rejection> {
    check_new_ids(doc, &subtree_ids_section(section))?;

    let index = position.resolve(doc.sections.iter().map(|s| s.id.as_str()), doc.sections.len());
    doc.sections.insert(index, section.clone());
    Ok(())
}

fn insert_row(doc: &mut Document, section_id: &str, row: &Row, position: &InsertPosition) -> Result<(), Rejection> {
    let location = find_section(doc, section_id).ok_or_else(|| Rejection::not_found("Section", section_id))?;
    if doc.sections[location.index].locked {
        return Err(Rejection::Locked(section_id.to_string()));
    }
    check_new_ids(doc, &subtree_ids_row(row))?;

    let rows = &mut doc.sections[location.index].rows;
    let index = position.resolve(rows.iter().map(|r| r.id.as_str()), rows.len());
    rows.insert(index, row.clone());
    Ok(())
}

fn insert_column(
    doc: &mut Document,
    row_id: &str,
    column: &Column,
    position: &InsertPosition,
) -> Result<(), Rejection> {
    let location = find_row(doc, row_id).ok_or_else(|| Rejection::not_found("Row", row_id))?;
    if location.is_locked(doc) {
        return Err(Rejection::Locked(row_id.to_string()));
    }
    check_new_ids(doc, &subtree_ids_column(column))?;

    let columns = &mut location.row_mut(doc).columns;
    let index = position.resolve(columns.iter().map(|c| c.id.as_str()), columns.len());
    columns.insert(index, column.clone());
    Ok(())
}

fn insert_block(
    doc: &mut Document,
    column_id: &str,
    block: &ContentBlock,
    position: &InsertPosition,
) -> Result<(), Rejection> {
    let location = find_column(doc, column_id).ok_or_else(|| Rejection::not_found("Column", column_id))?;
    if location.is_locked(doc) {
        return Err(Rejection::Locked(column_id.to_string()));
    }
    check_new_ids(doc, &[block.id()])?;

    let blocks = &mut location.column_mut(doc).blocks;
    let index = position.resolve(blocks.iter().map(|b| b.id()), blocks.len());
    blocks.insert(index, block.clone());
    Ok(())
}

fn replace_row_structure(doc: &mut Document, row_id: &str, column_ids: &[String]) -> Result<(), Rejection> {
    let location = find_row(doc, row_id).ok_or_else(|| Rejection::not_found("Row", row_id))?;
    if column_ids.is_empty() {
        return Err(Rejection::InvalidStructure("a row needs at least one column".to_string()));
    }
    if location.is_locked(doc) {
        return Err(Rejection::Locked(row_id.to_string()));
    }
    reject_locked(location.row(doc).columns.iter().find_map(locked_in_column))?;

    // The old columns disappear, so their ids may be reused
    let old_ids: Vec<String> = location.row(doc).columns.iter().map(|c| c.id.clone()).collect();
    let fresh: Vec<&str> = column_ids
        .iter()
        .map(String::as_str)
        .filter(|id| !old_ids.iter().any(|old| old == id))
        .collect();
    check_new_ids(doc, &fresh)?;
    for (i, id) in column_ids.iter().enumerate() {
        if column_ids[..i].contains(id) {
            return Err(Rejection::DuplicateId(id.clone()));
        }
    }

    let row = location.row_mut(doc);
    let blocks: Vec<ContentBlock> = row
        .columns
        .drain(..)
        .flat_map(|column| column.blocks)
        .collect();

    let mut columns: Vec<Column> = column_ids.iter().map(Column::new).collect();
    columns[0].blocks = blocks;
    row.columns = columns;
    Ok(())
}

fn flag_value(doc: &Document, node_id: &str, flag: NodeFlag) -> Option<bool> {
    let pick = |locked: bool, hidden: bool| match flag {
        NodeFlag::Locked => locked,
        NodeFlag::Hidden => hidden,
    };
    Some(match find_node(doc, node_id)? {
        NodeLocation::Section(loc) => {
            let s = &doc.sections[loc.index];
            pick(s.locked, s.hidden)
        }
        NodeLocation::Row(loc) => {
            let r = loc.row(doc);
            pick(r.locked, r.hidden)
        }
        NodeLocation::Column(loc) => {
            let c = loc.column(doc);
            pick(c.locked, c.hidden)
        }
        NodeLocation::Block(loc) => {
            let b = loc.block(doc);
            pick(b.is_locked(), b.is_hidden())
        }
    })
}

fn set_block_flag(block: &mut ContentBlock, flag: NodeFlag, value: bool) {
    match flag {
        NodeFlag::Locked => block.set_locked(value),
        NodeFlag::Hidden => block.set_hidden(value),
    }
}

fn cascade_column(column: &mut Column, flag: NodeFlag, value: bool) {
    match flag {
        NodeFlag::Locked => column.locked = value,
        NodeFlag::Hidden => column.hidden = value,
    }
    for block in &mut column.blocks {
        set_block_flag(block, flag, value);
    }
}

fn cascade_row(row: &mut Row, flag: NodeFlag, value: bool) {
    match flag {
        NodeFlag::Locked => row.locked = value,
        NodeFlag::Hidden => row.hidden = value,
    }
    for column in &mut row.columns {
        cascade_column(column, flag, value);
    }
}

fn cascade_section(section: &mut Section, flag: NodeFlag, value: bool) {
    match flag {
        NodeFlag::Locked => section.locked = value,
        NodeFlag::Hidden => section.hidden = value,
    }
    for row in &mut section.rows {
        cascade_row(row, flag, value);
    }
}

/// Flags are writable on locked nodes; that is how they get unlocked
fn set_flag(doc: &mut Document, node_id: &str, flag: NodeFlag, value: bool) -> Result<(), Rejection> {
    match find_node(doc, node_id).ok_or_else(|| Rejection::not_found("Node", node_id))? {
        NodeLocation::Section(loc) => cascade_section(&mut doc.sections[loc.index], flag, value),
        NodeLocation::Row(loc) => cascade_row(loc.row_mut(doc), flag, value),
        NodeLocation::Column(loc) => cascade_column(loc.column_mut(doc), flag, value),
        NodeLocation::Block(loc) => set_block_flag(loc.block_mut(doc), flag, value),
    }
    Ok(())
}

fn delete_section(doc: &mut Document, section_id: &str) -> Result<(), Rejection> {
    let location = find_section(doc, section_id).ok_or_else(|| Rejection::not_found("Section", section_id))?;
    reject_locked(locked_in_section(&doc.sections[location.index]))?;
    doc.sections.remove(location.index);
    Ok(())
}

fn delete_row(doc: &mut Document, row_id: &str) -> Result<(), Rejection> {
    let location = find_row(doc, row_id).ok_or_else(|| Rejection::not_found("Row", row_id))?;
    if location.is_locked(doc) {
        return Err(Rejection::Locked(row_id.to_string()));
    }
    reject_locked(locked_in_row(location.row(doc)))?;
    doc.sections[location.section_index].rows.remove(location.index);
    Ok(())
}

fn delete_column(doc: &mut Document, column_id: &str) -> Result<(), Rejection> {
    let location = find_column(doc, column_id).ok_or_else(|| Rejection::not_found("Column", column_id))?;
    if location.is_locked(doc) {
        return Err(Rejection::Locked(column_id.to_string()));
    }
    reject_locked(locked_in_column(location.column(doc)))?;
    doc.sections[location.section_index].rows[location.row_index]
        .columns
        .remove(location.index);
    Ok(())
}

fn delete_block(doc: &mut Document, block_id: &str) -> Result<(), Rejection> {
    let location = find_block(doc, block_id).ok_or_else(|| Rejection::not_found("Block", block_id))?;
    if location.is_locked(doc) {
        return Err(Rejection::Locked(block_id.to_string()));
    }
    location.column_location().column_mut(doc).blocks.remove(location.index);
    Ok(())
}

fn update_block(doc: &mut Document, block: &ContentBlock) -> Result<(), Rejection> {
    let location = find_block(doc, block.id()).ok_or_else(|| Rejection::not_found("Block", block.id()))?;
    if location.is_locked(doc) {
        return Err(Rejection::Locked(block.id().to_string()));
    }

    let slot = location.block_mut(doc);
    let (locked, hidden) = (slot.is_locked(), slot.is_hidden());
    *slot = block.clone();
    slot.set_locked(locked);
    slot.set_hidden(hidden);
    Ok(())
}

fn duplicate_block(doc: &mut Document, block_id: &str, new_id: &str) -> Result<(), Rejection> {
    let location = find_block(doc, block_id).ok_or_else(|| Rejection::not_found("Block", block_id))?;
    if location.column_location().is_locked(doc) {
        return Err(Rejection::Locked(location.column_id.clone()));
    }
    check_new_ids(doc, &[new_id])?;

    let mut copy = location.block(doc).clone();
    copy.set_id(new_id);
    copy.set_locked(false);
    location
        .column_location()
        .column_mut(doc)
        .blocks
        .insert(location.index + 1, copy);
    Ok(())
}
