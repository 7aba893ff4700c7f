//! Per-render state shared by the renderers.

use crate::error::RenderError;
use crate::options::RenderOptions;
use crate::registry::CustomBlockRegistry;
use crate::style::{self, Styles};
use crate::vnode::VNode;
use mailforge_schema::{BlockNode, ContentBlock, CustomBlockProps, Document, Theme, VariableBag};
use mailforge_template::{deep_substitute, substitute};
use serde_json::Value;
use tracing::warn;

/// Document variables overlaid with option variables, per top-level key
pub fn merge_variables(document: Option<&VariableBag>, overrides: Option<&VariableBag>) -> VariableBag {
    let mut merged = document.cloned().unwrap_or_default();
    if let Some(overrides) = overrides {
        for (key, value) in overrides {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}

pub struct RenderContext<'a> {
    pub document: &'a Document,
    pub options: &'a RenderOptions,
    pub registry: &'a CustomBlockRegistry,
    variables: VariableBag,
}

impl<'a> RenderContext<'a> {
    pub fn new(document: &'a Document, options: &'a RenderOptions, registry: &'a CustomBlockRegistry) -> Self {
        Self {
            document,
            options,
            registry,
            variables: merge_variables(document.variables.as_ref(), options.variables.as_ref()),
        }
    }

    pub fn variables(&self) -> &VariableBag {
        &self.variables
    }

    /// Option theme if given, else the document's
    pub fn theme(&self) -> Option<&'a Theme> {
        self.options.theme.as_ref().or(self.document.theme.as_ref())
    }

    pub fn daisyui(&self) -> bool {
        self.options.daisyui
    }

    pub fn substitute(&self, text: &str) -> String {
        substitute(text, &self.variables)
    }

    fn substitute_opt(&self, text: &Option<String>) -> Option<String> {
        text.as_deref().map(|t| self.substitute(t))
    }

    /// Copy of `block` with every text-like prop interpolated.
    ///
    /// Structural and numeric props are left alone; custom block props are
    /// substituted deeply so object variables arrive intact.
    pub fn interpolate(&self, block: &ContentBlock) -> ContentBlock {
        let mut block = block.clone();
        match &mut block {
            ContentBlock::Text(node) => node.props.content = self.substitute(&node.props.content),
            ContentBlock::Heading(node) => node.props.content = self.substitute(&node.props.content),
            ContentBlock::Button(node) => {
                node.props.label = self.substitute(&node.props.label);
                node.props.href = self.substitute_opt(&node.props.href);
            }
            ContentBlock::Image(node) => {
                node.props.src = self.substitute(&node.props.src);
                node.props.alt = self.substitute_opt(&node.props.alt);
                node.props.href = self.substitute_opt(&node.props.href);
            }
            ContentBlock::Divider(_) => {}
            ContentBlock::Custom(node) => {
                if let Value::Object(props) = deep_substitute(&Value::Object(node.props.props.clone()), &self.variables) {
                    node.props.props = props;
                }
            }
        }
        block
    }

    pub fn block_styles(&self, block: &ContentBlock) -> Styles {
        style::block_styles(block, self.theme())
    }

    /// Class attribute for a node kind, combining its own class with daisyUI
    pub fn class_list(&self, own: Option<&str>, kind: &str) -> Option<String> {
        style::class_list(own, kind, self.daisyui())
    }

    /// Render a custom block through the registry.
    ///
    /// `node` must already be interpolated. An unregistered component is an
    /// error unless the options ask for placeholders, in which case a
    /// [`VNode::Placeholder`] carrying the block's props is returned.
    pub fn render_custom(&self, node: &BlockNode<CustomBlockProps>) -> Result<VNode, RenderError> {
        let name = &node.props.component_name;
        match self.registry.get(name) {
            Some(definition) => {
                let props = definition.merged_props(&node.props.props);
                Ok(definition.render(&props))
            }
            None if self.options.throw_on_missing_custom_blocks => {
                Err(RenderError::MissingCustomBlock(name.clone()))
            }
            None => {
                warn!(component = %name, block = %node.id, "custom block not registered, rendering placeholder");
                Ok(VNode::placeholder(name.clone(), node.props.props.clone()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::CustomBlockDefinition;
    use serde_json::{json, Map};

    fn bag(value: Value) -> VariableBag {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_option_variables_win() {
        let merged = merge_variables(
            Some(&bag(json!({ "name": "Doc", "company": "Acme" }))),
            Some(&bag(json!({ "name": "Sam" }))),
        );
        assert_eq!(merged["name"], json!("Sam"));
        assert_eq!(merged["company"], json!("Acme"));
    }

    #[test]
    fn test_interpolate_text_like_props_only() {
        let doc = Document::new("Ctx").with_variables(bag(json!({ "name": "Sam", "url": "https://x.io" })));
        let options = RenderOptions::default();
        let registry = CustomBlockRegistry::new();
        let ctx = RenderContext::new(&doc, &options, &registry);

        let mut button = ContentBlock::button("b1", "Hi {{name}}", "{{url}}/a");
        if let ContentBlock::Button(node) = &mut button {
            node.props.background_color = Some("{{name}}".to_string());
        }
        let ContentBlock::Button(node) = ctx.interpolate(&button) else {
            panic!("expected button");
        };

        assert_eq!(node.props.label, "Hi Sam");
        assert_eq!(node.props.href.as_deref(), Some("https://x.io/a"));
        assert_eq!(node.props.background_color.as_deref(), Some("{{name}}"));
    }

    #[test]
    fn test_custom_props_receive_objects() {
        let doc = Document::new("Ctx").with_variables(bag(json!({ "product": { "title": "Lamp" } })));
        let options = RenderOptions::default();
        let registry = CustomBlockRegistry::new();
        let ctx = RenderContext::new(&doc, &options, &registry);

        let block = ContentBlock::custom("k1", "Product", bag(json!({ "item": "{{product}}" })));
        let ContentBlock::Custom(node) = ctx.interpolate(&block) else {
            panic!("expected custom");
        };
        assert_eq!(node.props.props["item"], json!({ "title": "Lamp" }));
    }

    #[test]
    fn test_missing_custom_block_modes() {
        let doc = Document::new("Ctx");
        let registry = CustomBlockRegistry::new().with(CustomBlockDefinition::new("Known", |_| VNode::element("div")));
        let node = BlockNode::new(
            "k1",
            CustomBlockProps {
                component_name: "Unknown".to_string(),
                props: Map::new(),
            },
        );

        let strict = RenderOptions::default();
        let ctx = RenderContext::new(&doc, &strict, &registry);
        assert_eq!(
            ctx.render_custom(&node).unwrap_err().to_string(),
            "Custom block \"Unknown\" not found in registry"
        );

        let soft = RenderOptions::default().fail_soft();
        let ctx = RenderContext::new(&doc, &soft, &registry);
        assert!(matches!(ctx.render_custom(&node), Ok(VNode::Placeholder { .. })));
    }
}
