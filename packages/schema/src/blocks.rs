use crate::style::{Align, Spacing};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Leaf content node
///
/// Tagged on `type`; each variant wraps the shared node header together with
/// its variant-specific `props`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Button(BlockNode<ButtonProps>),
    Text(BlockNode<TextProps>),
    Heading(BlockNode<HeadingProps>),
    Divider(BlockNode<DividerProps>),
    Image(BlockNode<ImageProps>),
    Custom(BlockNode<CustomBlockProps>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockNode<P> {
    pub id: String,
    pub props: P,
    #[serde(default, skip_serializing_if = "is_false")]
    pub locked: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub hidden: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl<P> BlockNode<P> {
    pub fn new(id: impl Into<String>, props: P) -> Self {
        Self {
            id: id.into(),
            props,
            locked: false,
            hidden: false,
        }
    }
}

/// Block type discriminators accepted by the schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Button,
    Text,
    Heading,
    Divider,
    Image,
    Custom,
}

impl BlockKind {
    pub const ALL: [BlockKind; 6] = [
        BlockKind::Button,
        BlockKind::Text,
        BlockKind::Heading,
        BlockKind::Divider,
        BlockKind::Image,
        BlockKind::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Button => "button",
            BlockKind::Text => "text",
            BlockKind::Heading => "heading",
            BlockKind::Divider => "divider",
            BlockKind::Image => "image",
            BlockKind::Custom => "custom",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == tag)
    }
}

macro_rules! with_node {
    ($block:expr, $node:ident => $body:expr) => {
        match $block {
            ContentBlock::Button($node) => $body,
            ContentBlock::Text($node) => $body,
            ContentBlock::Heading($node) => $body,
            ContentBlock::Divider($node) => $body,
            ContentBlock::Image($node) => $body,
            ContentBlock::Custom($node) => $body,
        }
    };
}

impl ContentBlock {
    pub fn id(&self) -> &str {
        with_node!(self, node => &node.id)
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        let id = id.into();
        with_node!(self, node => node.id = id)
    }

    pub fn kind(&self) -> BlockKind {
        match self {
            ContentBlock::Button(_) => BlockKind::Button,
            ContentBlock::Text(_) => BlockKind::Text,
            ContentBlock::Heading(_) => BlockKind::Heading,
            ContentBlock::Divider(_) => BlockKind::Divider,
            ContentBlock::Image(_) => BlockKind::Image,
            ContentBlock::Custom(_) => BlockKind::Custom,
        }
    }

    pub fn is_locked(&self) -> bool {
        with_node!(self, node => node.locked)
    }

    pub fn is_hidden(&self) -> bool {
        with_node!(self, node => node.hidden)
    }

    pub fn set_locked(&mut self, locked: bool) {
        with_node!(self, node => node.locked = locked)
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        with_node!(self, node => node.hidden = hidden)
    }

    pub fn text(id: impl Into<String>, content: impl Into<String>) -> Self {
        ContentBlock::Text(BlockNode::new(
            id,
            TextProps {
                content: content.into(),
                ..Default::default()
            },
        ))
    }

    pub fn heading(id: impl Into<String>, content: impl Into<String>) -> Self {
        ContentBlock::Heading(BlockNode::new(
            id,
            HeadingProps {
                content: content.into(),
                ..Default::default()
            },
        ))
    }

    pub fn button(id: impl Into<String>, label: impl Into<String>, href: impl Into<String>) -> Self {
        ContentBlock::Button(BlockNode::new(
            id,
            ButtonProps {
                label: label.into(),
                href: Some(href.into()),
                ..Default::default()
            },
        ))
    }

    pub fn image(id: impl Into<String>, src: impl Into<String>) -> Self {
        ContentBlock::Image(BlockNode::new(
            id,
            ImageProps {
                src: src.into(),
                ..Default::default()
            },
        ))
    }

    pub fn divider(id: impl Into<String>) -> Self {
        ContentBlock::Divider(BlockNode::new(id, DividerProps::default()))
    }

    pub fn custom(id: impl Into<String>, component_name: impl Into<String>, props: Map<String, Value>) -> Self {
        ContentBlock::Custom(BlockNode::new(
            id,
            CustomBlockProps {
                component_name: component_name.into(),
                props,
            },
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonProps {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<Align>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<FontWeight>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<Spacing>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub full_width: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextProps {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<Align>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<FontWeight>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<Spacing>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingLevel {
    H1,
    #[default]
    H2,
    H3,
    H4,
    H5,
    H6,
}

impl HeadingLevel {
    pub fn tag(&self) -> &'static str {
        match self {
            HeadingLevel::H1 => "h1",
            HeadingLevel::H2 => "h2",
            HeadingLevel::H3 => "h3",
            HeadingLevel::H4 => "h4",
            HeadingLevel::H5 => "h5",
            HeadingLevel::H6 => "h6",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadingProps {
    pub content: String,
    #[serde(rename = "as", default)]
    pub level: HeadingLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<Align>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<FontWeight>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<Spacing>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl BorderStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            BorderStyle::Solid => "solid",
            BorderStyle::Dashed => "dashed",
            BorderStyle::Dotted => "dotted",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DividerProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thickness: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(default)]
    pub style: BorderStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin: Option<Spacing>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageProps {
    pub src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<Align>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<u32>,
}

/// Props of a block rendered by an externally registered component.
///
/// `props` is deliberately an open map: the registry owns its shape.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomBlockProps {
    pub component_name: String,
    #[serde(default)]
    pub props: Map<String, Value>,
}

/// CSS font weight; numeric (`600`) or keyword (`"bold"`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FontWeight {
    Numeric(u16),
    Keyword(String),
}

impl std::fmt::Display for FontWeight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FontWeight::Numeric(weight) => write!(f, "{}", weight),
            FontWeight::Keyword(keyword) => f.write_str(keyword),
        }
    }
}
