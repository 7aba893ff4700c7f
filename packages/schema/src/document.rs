use crate::blocks::ContentBlock;
use crate::style::{Align, Spacing, Theme, VerticalAlign};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Current schema version. Documents with any other version are rejected.
pub const SCHEMA_VERSION: u32 = 1;

/// Variables available to `{{ placeholder }}` substitution.
///
/// Values are strings or nested objects; the open map keeps object-valued
/// variables intact for custom blocks that want structured data.
pub type VariableBag = Map<String, Value>;

/// Root email document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub version: u32,
    pub meta: DocumentMeta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<VariableBag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
    #[serde(default)]
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMeta {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// Discriminator carried by every container node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerKind {
    Section,
    Row,
    Column,
}

impl ContainerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerKind::Section => "section",
            ContainerKind::Row => "row",
            ContainerKind::Column => "column",
        }
    }
}

/// Top-level band of an email
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ContainerKind,
    #[serde(default)]
    pub rows: Vec<Row>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<Spacing>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin: Option<Spacing>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<Align>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub locked: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub hidden: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ContainerKind,
    #[serde(default)]
    pub columns: Vec<Column>,
    /// Horizontal spacing between columns, in pixels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gutter: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<Spacing>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin: Option<Spacing>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<Align>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub locked: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub hidden: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ContainerKind,
    #[serde(default)]
    pub blocks: Vec<ContentBlock>,
    /// CSS width, e.g. `"50%"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<Spacing>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<Align>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertical_align: Option<VerticalAlign>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub locked: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub hidden: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Document {
    /// Empty document with the current schema version
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            version: SCHEMA_VERSION,
            meta: DocumentMeta {
                title: title.into(),
                ..Default::default()
            },
            variables: None,
            theme: None,
            sections: Vec::new(),
        }
    }

    pub fn with_section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    pub fn with_variables(mut self, variables: VariableBag) -> Self {
        self.variables = Some(variables);
        self
    }

    /// Total number of (rows, columns, blocks) in the tree
    pub fn node_counts(&self) -> NodeCounts {
        let mut counts = NodeCounts {
            sections: self.sections.len(),
            ..Default::default()
        };
        for section in &self.sections {
            counts.rows += section.rows.len();
            for row in &section.rows {
                counts.columns += row.columns.len();
                for column in &row.columns {
                    counts.blocks += column.blocks.len();
                }
            }
        }
        counts
    }

    /// Every id in the tree in document order (sections, then their descendants)
    pub fn all_ids(&self) -> Vec<&str> {
        let mut ids = Vec::new();
        for section in &self.sections {
            ids.push(section.id.as_str());
            for row in &section.rows {
                ids.push(row.id.as_str());
                for column in &row.columns {
                    ids.push(column.id.as_str());
                    for block in &column.blocks {
                        ids.push(block.id());
                    }
                }
            }
        }
        ids
    }
}

/// Node tallies used to check that structural commands never lose content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NodeCounts {
    pub sections: usize,
    pub rows: usize,
    pub columns: usize,
    pub blocks: usize,
}

impl Section {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: ContainerKind::Section,
            rows: Vec::new(),
            background_color: None,
            class_name: None,
            padding: None,
            margin: None,
            align: None,
            locked: false,
            hidden: false,
        }
    }

    pub fn with_row(mut self, row: Row) -> Self {
        self.rows.push(row);
        self
    }
}

impl Row {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: ContainerKind::Row,
            columns: Vec::new(),
            gutter: None,
            background_color: None,
            class_name: None,
            padding: None,
            margin: None,
            align: None,
            locked: false,
            hidden: false,
        }
    }

    pub fn with_column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    /// Rows render only once they hold at least one column
    pub fn is_well_formed(&self) -> bool {
        !self.columns.is_empty()
    }
}

impl Column {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: ContainerKind::Column,
            blocks: Vec::new(),
            width: None,
            background_color: None,
            class_name: None,
            padding: None,
            align: None,
            vertical_align: None,
            locked: false,
            hidden: false,
        }
    }

    pub fn with_block(mut self, block: ContentBlock) -> Self {
        self.blocks.push(block);
        self
    }
}
