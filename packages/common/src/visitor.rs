use mailforge_schema::{Column, ContentBlock, Document, Row, Section};

/// Nodes that can be hidden from rendered output
pub trait Visibility {
    fn is_hidden(&self) -> bool;
}

impl Visibility for Section {
    fn is_hidden(&self) -> bool {
        self.hidden
    }
}

impl Visibility for Row {
    fn is_hidden(&self) -> bool {
        self.hidden
    }
}

impl Visibility for Column {
    fn is_hidden(&self) -> bool {
        self.hidden
    }
}

impl Visibility for ContentBlock {
    fn is_hidden(&self) -> bool {
        ContentBlock::is_hidden(self)
    }
}

/// `items` without the hidden ones, in order
pub fn visible<T: Visibility>(items: &[T]) -> impl Iterator<Item = &T> {
    items.iter().filter(|item| !item.is_hidden())
}

/// Read-only walk over the rendered part of a document
///
/// Hidden nodes and everything beneath them are skipped by the default walk
/// functions. Override specific visit_* methods to act on nodes.
pub trait Visitor: Sized {
    fn visit_document(&mut self, doc: &Document) {
        walk_document(self, doc);
    }

    fn visit_section(&mut self, section: &Section) {
        walk_section(self, section);
    }

    fn visit_row(&mut self, row: &Row) {
        walk_row(self, row);
    }

    fn visit_column(&mut self, column: &Column) {
        walk_column(self, column);
    }

    fn visit_block(&mut self, _block: &ContentBlock) {
        // Leaf node, no children to walk
    }
}

pub fn walk_document<V: Visitor>(visitor: &mut V, doc: &Document) {
    for section in visible(&doc.sections) {
        visitor.visit_section(section);
    }
}

pub fn walk_section<V: Visitor>(visitor: &mut V, section: &Section) {
    for row in visible(&section.rows) {
        visitor.visit_row(row);
    }
}

pub fn walk_row<V: Visitor>(visitor: &mut V, row: &Row) {
    for column in visible(&row.columns) {
        visitor.visit_column(column);
    }
}

pub fn walk_column<V: Visitor>(visitor: &mut V, column: &Column) {
    for block in visible(&column.blocks) {
        visitor.visit_block(block);
    }
}

/// Visible blocks in reading order
pub fn visible_blocks(doc: &Document) -> Vec<&ContentBlock> {
    let mut blocks = Vec::new();
    for section in visible(&doc.sections) {
        for row in visible(&section.rows) {
            for column in visible(&row.columns) {
                blocks.extend(visible(&column.blocks));
            }
        }
    }
    blocks
}
