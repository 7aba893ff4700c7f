//! # Node Lookup
//!
//! Linear walks that find a node by id and report the chain of containers
//! owning it. Documents are editor-sized, so O(nodes) per lookup is fine.
//! Ids are unique, so the first match is the only match.

use mailforge_schema::{Column, ContentBlock, Document, Row, Section};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionLocation {
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowLocation {
    pub section_id: String,
    pub section_index: usize,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLocation {
    pub section_id: String,
    pub row_id: String,
    pub section_index: usize,
    pub row_index: usize,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockLocation {
    pub section_id: String,
    pub row_id: String,
    pub column_id: String,
    pub section_index: usize,
    pub row_index: usize,
    pub column_index: usize,
    pub index: usize,
}

/// Location of a node of any level
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeLocation {
    Section(SectionLocation),
    Row(RowLocation),
    Column(ColumnLocation),
    Block(BlockLocation),
}

pub fn find_section(doc: &Document, section_id: &str) -> Option<SectionLocation> {
    doc.sections
        .iter()
        .position(|s| s.id == section_id)
        .map(|index| SectionLocation { index })
}

pub fn find_row(doc: &Document, row_id: &str) -> Option<RowLocation> {
    for (si, section) in doc.sections.iter().enumerate() {
        if let Some(index) = section.rows.iter().position(|r| r.id == row_id) {
            return Some(RowLocation {
                section_id: section.id.clone(),
                section_index: si,
                index,
            });
        }
    }
    None
}

pub fn find_column(doc: &Document, column_id: &str) -> Option<ColumnLocation> {
    for (si, section) in doc.sections.iter().enumerate() {
        for (ri, row) in section.rows.iter().enumerate() {
            if let Some(index) = row.columns.iter().position(|c| c.id == column_id) {
                return Some(ColumnLocation {
                    section_id: section.id.clone(),
                    row_id: row.id.clone(),
                    section_index: si,
                    row_index: ri,
                    index,
                });
            }
        }
    }
    None
}

pub fn find_block(doc: &Document, block_id: &str) -> Option<BlockLocation> {
    for (si, section) in doc.sections.iter().enumerate() {
        for (ri, row) in section.rows.iter().enumerate() {
            for (ci, column) in row.columns.iter().enumerate() {
                if let Some(index) = column.blocks.iter().position(|b| b.id() == block_id) {
                    return Some(BlockLocation {
                        section_id: section.id.clone(),
                        row_id: row.id.clone(),
                        column_id: column.id.clone(),
                        section_index: si,
                        row_index: ri,
                        column_index: ci,
                        index,
                    });
                }
            }
        }
    }
    None
}

/// Find a node at any level, trying sections first and blocks last
pub fn find_node(doc: &Document, id: &str) -> Option<NodeLocation> {
    find_section(doc, id)
        .map(NodeLocation::Section)
        .or_else(|| find_row(doc, id).map(NodeLocation::Row))
        .or_else(|| find_column(doc, id).map(NodeLocation::Column))
        .or_else(|| find_block(doc, id).map(NodeLocation::Block))
}

pub fn contains_id(doc: &Document, id: &str) -> bool {
    doc.all_ids().contains(&id)
}

// Index-based accessors used by the mutation engine once a location is known

impl RowLocation {
    pub(crate) fn section<'d>(&self, doc: &'d Document) -> &'d Section {
        &doc.sections[self.section_index]
    }

    pub(crate) fn row<'d>(&self, doc: &'d Document) -> &'d Row {
        &doc.sections[self.section_index].rows[self.index]
    }

    pub(crate) fn row_mut<'d>(&self, doc: &'d mut Document) -> &'d mut Row {
        &mut doc.sections[self.section_index].rows[self.index]
    }

    /// Locked state of the row or anything above it
    pub(crate) fn is_locked(&self, doc: &Document) -> bool {
        self.section(doc).locked || self.row(doc).locked
    }
}

impl ColumnLocation {
    pub(crate) fn column<'d>(&self, doc: &'d Document) -> &'d Column {
        &doc.sections[self.section_index].rows[self.row_index].columns[self.index]
    }

    pub(crate) fn column_mut<'d>(&self, doc: &'d mut Document) -> &'d mut Column {
        &mut doc.sections[self.section_index].rows[self.row_index].columns[self.index]
    }

    pub(crate) fn is_locked(&self, doc: &Document) -> bool {
        let section = &doc.sections[self.section_index];
        let row = &section.rows[self.row_index];
        section.locked || row.locked || row.columns[self.index].locked
    }
}

impl BlockLocation {
    pub(crate) fn column_location(&self) -> ColumnLocation {
        ColumnLocation {
            section_id: self.section_id.clone(),
            row_id: self.row_id.clone(),
            section_index: self.section_index,
            row_index: self.row_index,
            index: self.column_index,
        }
    }

    pub(crate) fn block<'d>(&self, doc: &'d Document) -> &'d ContentBlock {
        &self.column_location().column(doc).blocks[self.index]
    }

    pub(crate) fn block_mut<'d>(&self, doc: &'d mut Document) -> &'d mut ContentBlock {
        let index = self.index;
        &mut self.column_location().column_mut(doc).blocks[index]
    }

    pub(crate) fn is_locked(&self, doc: &Document) -> bool {
        self.column_location().is_locked(doc) || self.block(doc).is_locked()
    }
}
