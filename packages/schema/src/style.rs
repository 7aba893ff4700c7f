use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Padding or margin value
///
/// Accepts a bare pixel number, a raw CSS string, or per-side pixel values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Spacing {
    Pixels(f64),
    Css(String),
    Sides(SpacingSides),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SpacingSides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    Center,
    Right,
}

impl Align {
    pub fn as_str(&self) -> &'static str {
        match self {
            Align::Left => "left",
            Align::Center => "center",
            Align::Right => "right",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    Top,
    Middle,
    Bottom,
}

impl VerticalAlign {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerticalAlign::Top => "top",
            VerticalAlign::Middle => "middle",
            VerticalAlign::Bottom => "bottom",
        }
    }
}

/// Fonts and palette shared by every block in a document
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fonts: Vec<FontDefinition>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub palette: BTreeMap<String, String>,
    /// Body font family; falls back to the first entry of `fonts`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontDefinition {
    pub family: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_font: Option<WebFont>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebFont {
    pub url: String,
    #[serde(default = "default_font_format")]
    pub format: String,
}

fn default_font_format() -> String {
    "woff2".to_string()
}

impl Theme {
    /// CSS `font-family` stack for the document body
    pub fn font_stack(&self) -> Option<String> {
        if let Some(family) = &self.font_family {
            return Some(family.clone());
        }
        self.fonts.first().map(|font| match &font.fallback {
            Some(fallback) => format!("{}, {}", font.family, fallback),
            None => font.family.clone(),
        })
    }
}
