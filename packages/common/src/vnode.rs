use crate::escape::{escape_attr, escape_text};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Framework-neutral element tree.
///
/// Tags are React-Email component names (`Section`, `Text`, ...) or plain
/// HTML tags. Attribute names follow React (`className`), and style keys
/// are camelCase as in a React `style` object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum VNode {
    Element {
        tag: String,
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        attributes: BTreeMap<String, String>,
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        styles: BTreeMap<String, String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        children: Vec<VNode>,
    },

    Text { content: String },

    Comment { content: String },

    /// Stand-in for a custom block with no registered component; rendered
    /// inline instead of failing the whole document
    Placeholder {
        component_name: String,
        props: Map<String, Value>,
    },
}

impl VNode {
    pub fn element(tag: impl Into<String>) -> Self {
        VNode::Element {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            styles: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        VNode::Text {
            content: content.into(),
        }
    }

    pub fn comment(content: impl Into<String>) -> Self {
        VNode::Comment {
            content: content.into(),
        }
    }

    pub fn placeholder(component_name: impl Into<String>, props: Map<String, Value>) -> Self {
        VNode::Placeholder {
            component_name: component_name.into(),
            props,
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let VNode::Element {
            ref mut attributes, ..
        } = self
        {
            attributes.insert(key.into(), value.into());
        }
        self
    }

    /// Set the attribute only when `value` is present
    pub fn with_opt_attr(self, key: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.with_attr(key, value),
            None => self,
        }
    }

    pub fn with_style(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let VNode::Element { ref mut styles, .. } = self {
            styles.insert(key.into(), value.into());
        }
        self
    }

    pub fn with_styles(mut self, new_styles: impl IntoIterator<Item = (String, String)>) -> Self {
        if let VNode::Element { ref mut styles, .. } = self {
            styles.extend(new_styles);
        }
        self
    }

    pub fn with_child(mut self, child: VNode) -> Self {
        if let VNode::Element {
            ref mut children, ..
        } = self
        {
            children.push(child);
        }
        self
    }

    pub fn with_children(mut self, new_children: impl IntoIterator<Item = VNode>) -> Self {
        if let VNode::Element {
            ref mut children, ..
        } = self
        {
            children.extend(new_children);
        }
        self
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            VNode::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        match self {
            VNode::Element { attributes, .. } => attributes.get(key).map(String::as_str),
            _ => None,
        }
    }

    pub fn children(&self) -> &[VNode] {
        match self {
            VNode::Element { children, .. } => children,
            _ => &[],
        }
    }

    /// Concatenated text of this subtree; placeholders read as `[Name]`
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            VNode::Element { children, .. } => {
                for child in children {
                    child.collect_text(out);
                }
            }
            VNode::Text { content } => out.push_str(content),
            VNode::Comment { .. } => {}
            VNode::Placeholder { component_name, .. } => {
                out.push('[');
                out.push_str(component_name);
                out.push(']');
            }
        }
    }

    /// Depth-first search for a node matching `predicate`
    pub fn find(&self, predicate: &impl Fn(&VNode) -> bool) -> Option<&VNode> {
        if predicate(self) {
            return Some(self);
        }
        self.children().iter().find_map(|child| child.find(predicate))
    }

    /// Compact HTML for this subtree, mapping React-Email tags to HTML
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            VNode::Element {
                tag,
                attributes,
                styles,
                children,
            } => {
                let tag = html_tag(tag, attributes);
                out.push('<');
                out.push_str(tag);
                for (key, value) in attributes {
                    if key == "as" {
                        continue;
                    }
                    let key = if key == "className" { "class" } else { key.as_str() };
                    out.push_str(&format!(" {}=\"{}\"", key, escape_attr(value)));
                }
                if !styles.is_empty() {
                    out.push_str(&format!(" style=\"{}\"", escape_attr(&style_attribute(styles))));
                }

                if children.is_empty() && is_void(tag) {
                    out.push_str(" />");
                    return;
                }
                out.push('>');
                for child in children {
                    child.write_html(out);
                }
                out.push_str(&format!("</{}>", tag));
            }
            VNode::Text { content } => out.push_str(&escape_text(content)),
            VNode::Comment { content } => {
                out.push_str(&format!("<!-- {} -->", content.replace("--", "- -")));
            }
            VNode::Placeholder { component_name, props } => {
                out.push_str(&placeholder_html(component_name, props));
            }
        }
    }
}

/// The tagged div that stands in for an unregistered custom block
pub fn placeholder_html(component_name: &str, props: &Map<String, Value>) -> String {
    let props = serde_json::to_string(props).unwrap_or_default();
    format!(
        "<div data-custom-block-placeholder=\"{}\" data-props=\"{}\" style=\"border:1px dashed #9ca3af;padding:12px;color:#6b7280;font-family:monospace\">Missing custom block: {}</div>",
        escape_attr(component_name),
        escape_attr(&props),
        escape_text(component_name)
    )
}

/// `backgroundColor` → `background-color`
pub fn kebab_case(property: &str) -> String {
    let mut out = String::with_capacity(property.len() + 4);
    for c in property.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// `background-color` → `backgroundColor`
pub fn camel_case(property: &str) -> String {
    let mut out = String::with_capacity(property.len());
    let mut upper = false;
    for c in property.chars() {
        if c == '-' {
            upper = true;
        } else if upper {
            out.push(c.to_ascii_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

fn style_attribute(styles: &BTreeMap<String, String>) -> String {
    styles
        .iter()
        .map(|(key, value)| format!("{}:{}", kebab_case(key), value))
        .collect::<Vec<_>>()
        .join(";")
}

fn html_tag<'a>(tag: &'a str, attributes: &'a BTreeMap<String, String>) -> &'a str {
    match tag {
        "Html" => "html",
        "Head" => "head",
        "Body" => "body",
        "Container" | "Section" | "Row" | "Column" => "div",
        "Text" => "p",
        "Heading" => attributes.get("as").map(String::as_str).unwrap_or("h2"),
        "Button" | "Link" => "a",
        "Img" => "img",
        "Hr" => "hr",
        other => other,
    }
}

fn is_void(tag: &str) -> bool {
    matches!(
        tag,
        "img" | "br" | "hr" | "meta" | "link" | "area" | "base" | "col" | "source" | "wbr"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_and_text_content() {
        let node = VNode::element("div")
            .with_attr("className", "card")
            .with_child(VNode::text("Hello "))
            .with_child(VNode::element("strong").with_child(VNode::text("Sam")))
            .with_child(VNode::comment("ignored"));

        assert_eq!(node.text_content(), "Hello Sam");
        assert_eq!(node.attr("className"), Some("card"));
        assert_eq!(node.children().len(), 3);
    }

    #[test]
    fn test_to_html_maps_react_email_tags() {
        let node = VNode::element("Section")
            .with_style("backgroundColor", "#fff")
            .with_child(VNode::element("Text").with_child(VNode::text("a < b")))
            .with_child(VNode::element("Heading").with_attr("as", "h1").with_child(VNode::text("Title")))
            .with_child(VNode::element("Img").with_attr("src", "x.png"));

        assert_eq!(
            node.to_html(),
            "<div style=\"background-color:#fff\"><p>a &lt; b</p><h1>Title</h1><img src=\"x.png\" /></div>"
        );
    }

    #[test]
    fn test_placeholder_html_is_tagged() {
        let mut props = Map::new();
        props.insert("sku".to_string(), json!("A\"1"));
        let html = VNode::placeholder("ProductCard", props).to_html();

        assert!(html.contains("data-custom-block-placeholder=\"ProductCard\""));
        assert!(html.contains("&quot;A\\&quot;1&quot;"));
        assert!(html.contains("Missing custom block: ProductCard"));
    }

    #[test]
    fn test_case_conversion() {
        assert_eq!(kebab_case("borderTopLeftRadius"), "border-top-left-radius");
        assert_eq!(camel_case("border-top-left-radius"), "borderTopLeftRadius");
        assert_eq!(camel_case(&kebab_case("color")), "color");
    }

    #[test]
    fn test_serialized_shape() {
        let node = VNode::element("Text").with_child(VNode::text("Hi"));
        assert_eq!(
            serde_json::to_value(&node).unwrap(),
            json!({ "type": "element", "tag": "Text", "children": [{ "type": "text", "content": "Hi" }] })
        );
    }
}
