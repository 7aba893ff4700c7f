use mailforge_schema::{Theme, VariableBag};
use serde::{Deserialize, Serialize};

/// Output representation of a render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderFormat {
    #[default]
    Html,
    PlainText,
    ReactElement,
    ReactSourceText,
}

impl RenderFormat {
    pub const ALL: [RenderFormat; 4] = [
        RenderFormat::Html,
        RenderFormat::PlainText,
        RenderFormat::ReactElement,
        RenderFormat::ReactSourceText,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RenderFormat::Html => "html",
            RenderFormat::PlainText => "plain-text",
            RenderFormat::ReactElement => "react-element",
            RenderFormat::ReactSourceText => "react-source-text",
        }
    }
}

/// Options accepted by every renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderOptions {
    pub format: RenderFormat,

    /// Merged over the document's own variables, key by key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<VariableBag>,

    /// Spaces per nesting level in HTML and JSX output
    pub indent: usize,

    /// Name of the generated React component
    pub component_name: String,

    /// Replaces the document theme when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,

    /// Add daisyUI utility classes to HTML and React output
    pub daisyui: bool,

    /// Fail the render on an unregistered custom block instead of emitting
    /// a placeholder
    pub throw_on_missing_custom_blocks: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            format: RenderFormat::Html,
            variables: None,
            indent: 2,
            component_name: "EmailTemplate".to_string(),
            theme: None,
            daisyui: false,
            throw_on_missing_custom_blocks: true,
        }
    }
}

impl RenderOptions {
    pub fn new(format: RenderFormat) -> Self {
        Self {
            format,
            ..Default::default()
        }
    }

    pub fn with_variables(mut self, variables: VariableBag) -> Self {
        self.variables = Some(variables);
        self
    }

    /// Emit placeholders for unregistered custom blocks
    pub fn fail_soft(mut self) -> Self {
        self.throw_on_missing_custom_blocks = false;
        self
    }

    pub fn indent_str(&self) -> String {
        " ".repeat(self.indent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_json() {
        let options: RenderOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, RenderOptions::default());
        assert_eq!(options.component_name, "EmailTemplate");
        assert!(options.throw_on_missing_custom_blocks);
    }

    #[test]
    fn test_camel_case_keys() {
        let options: RenderOptions = serde_json::from_str(
            r#"{ "format": "react-source-text", "componentName": "Receipt", "throwOnMissingCustomBlocks": false }"#,
        )
        .unwrap();

        assert_eq!(options.format, RenderFormat::ReactSourceText);
        assert_eq!(options.component_name, "Receipt");
        assert!(!options.throw_on_missing_custom_blocks);
        assert_eq!(options.indent, 2);
    }
}
