use mailforge_common::{RenderFormat, VNode};
use serde::{Deserialize, Serialize};

/// Result of a render, tagged with the format that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "format", rename_all = "kebab-case")]
pub enum RenderOutput {
    Html { html: String },
    PlainText { text: String },
    ReactElement { node: VNode },
    ReactSourceText { code: String },
}

impl RenderOutput {
    pub fn format(&self) -> RenderFormat {
        match self {
            RenderOutput::Html { .. } => RenderFormat::Html,
            RenderOutput::PlainText { .. } => RenderFormat::PlainText,
            RenderOutput::ReactElement { .. } => RenderFormat::ReactElement,
            RenderOutput::ReactSourceText { .. } => RenderFormat::ReactSourceText,
        }
    }

    /// The textual output; `None` for the element tree
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RenderOutput::Html { html } => Some(html),
            RenderOutput::PlainText { text } => Some(text),
            RenderOutput::ReactSourceText { code } => Some(code),
            RenderOutput::ReactElement { .. } => None,
        }
    }

    pub fn as_node(&self) -> Option<&VNode> {
        match self {
            RenderOutput::ReactElement { node } => Some(node),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serialized_tag() {
        let output = RenderOutput::PlainText {
            text: "Hello".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&output).unwrap(),
            json!({ "format": "plain-text", "text": "Hello" })
        );
        assert_eq!(output.format().as_str(), "plain-text");
    }

    #[test]
    fn test_element_output_nests_node() {
        let output = RenderOutput::ReactElement {
            node: VNode::element("Html"),
        };
        assert_eq!(
            serde_json::to_value(&output).unwrap(),
            json!({ "format": "react-element", "node": { "type": "element", "tag": "Html" } })
        );
        assert!(output.as_text().is_none());
    }
}
