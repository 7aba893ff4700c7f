use crate::vnode::VNode;
use mailforge_schema::CustomBlockProps;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Renders a custom block from its (already substituted) props
pub type CustomComponent = Arc<dyn Fn(&Map<String, Value>) -> VNode + Send + Sync>;

/// A host-supplied implementation of one custom block type
#[derive(Clone)]
pub struct CustomBlockDefinition {
    /// Props a freshly dropped block starts with; also the fallback for any
    /// prop a block leaves out
    pub defaults: CustomBlockProps,
    pub component: CustomComponent,
}

impl CustomBlockDefinition {
    pub fn new(
        component_name: impl Into<String>,
        component: impl Fn(&Map<String, Value>) -> VNode + Send + Sync + 'static,
    ) -> Self {
        Self {
            defaults: CustomBlockProps {
                component_name: component_name.into(),
                props: Map::new(),
            },
            component: Arc::new(component),
        }
    }

    pub fn with_default(mut self, key: impl Into<String>, value: Value) -> Self {
        self.defaults.props.insert(key.into(), value);
        self
    }

    /// Block props layered over the defaults
    pub fn merged_props(&self, props: &Map<String, Value>) -> Map<String, Value> {
        let mut merged = self.defaults.props.clone();
        for (key, value) in props {
            merged.insert(key.clone(), value.clone());
        }
        merged
    }

    pub fn render(&self, props: &Map<String, Value>) -> VNode {
        (self.component)(props)
    }
}

impl fmt::Debug for CustomBlockDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomBlockDefinition")
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}

/// Custom block implementations keyed by component name
#[derive(Debug, Clone, Default)]
pub struct CustomBlockRegistry {
    definitions: HashMap<String, CustomBlockDefinition>,
}

impl CustomBlockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register under the definition's own component name
    pub fn register(&mut self, definition: CustomBlockDefinition) {
        self.definitions
            .insert(definition.defaults.component_name.clone(), definition);
    }

    pub fn with(mut self, definition: CustomBlockDefinition) -> Self {
        self.register(definition);
        self
    }

    pub fn get(&self, component_name: &str) -> Option<&CustomBlockDefinition> {
        self.definitions.get(component_name)
    }

    pub fn contains(&self, component_name: &str) -> bool {
        self.definitions.contains_key(component_name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.definitions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merged_props_prefer_block_values() {
        let definition = CustomBlockDefinition::new("Badge", |props| {
            VNode::element("span").with_child(VNode::text(
                props.get("label").and_then(Value::as_str).unwrap_or_default(),
            ))
        })
        .with_default("label", json!("New"))
        .with_default("tone", json!("info"));

        let mut props = Map::new();
        props.insert("label".to_string(), json!("Sale"));
        let merged = definition.merged_props(&props);

        assert_eq!(merged["label"], json!("Sale"));
        assert_eq!(merged["tone"], json!("info"));
        assert_eq!(definition.render(&merged).text_content(), "Sale");
    }

    #[test]
    fn test_registry_lookup() {
        let registry = CustomBlockRegistry::new()
            .with(CustomBlockDefinition::new("Footer", |_| VNode::element("footer")))
            .with(CustomBlockDefinition::new("Badge", |_| VNode::element("span")));

        assert!(registry.contains("Footer"));
        assert!(registry.get("Missing").is_none());
        assert_eq!(registry.names(), vec!["Badge", "Footer"]);
    }
}
