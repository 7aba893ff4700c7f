use crate::context::CompilerContext;
use crate::element::compile_to_element;
use mailforge_common::{escape_attr, RenderContext, RenderError, RenderResult, VNode};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use tracing::instrument;

pub const REACT_EMAIL_PACKAGE: &str = "@react-email/components";

const REACT_EMAIL_COMPONENTS: &[&str] = &[
    "Body",
    "Button",
    "Column",
    "Container",
    "Font",
    "Head",
    "Heading",
    "Hr",
    "Html",
    "Img",
    "Link",
    "Preview",
    "Row",
    "Section",
    "Text",
];

const RESERVED_WORDS: &[&str] = &[
    "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete", "do",
    "else", "enum", "export", "extends", "false", "finally", "for", "function", "if", "import", "in",
    "instanceof", "new", "null", "return", "super", "switch", "this", "throw", "true", "try",
    "typeof", "var", "void", "while", "with", "yield", "let", "static", "await",
];

/// Whether `name` can be used as the generated component's identifier
pub fn is_valid_component_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_' || first == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        && !RESERVED_WORDS.contains(&name)
}

/// Compile an email document to React-Email component source.
///
/// The module imports only the components the document uses and exports one
/// function component named by `componentName`.
#[instrument(skip_all, fields(component = %render.options.component_name))]
pub fn compile_to_react(render: &RenderContext) -> RenderResult<String> {
    let component_name = &render.options.component_name;
    if !is_valid_component_name(component_name) {
        return Err(RenderError::InvalidComponentName(component_name.clone()));
    }

    let tree = compile_to_element(render)?;
    let mut ctx = CompilerContext::new(render.options.indent_str());

    compile_imports(&tree, &mut ctx);

    ctx.add_line(&format!("export function {}() {{", component_name));
    ctx.indent();
    ctx.add_line("return (");
    ctx.indent();
    compile_node(&tree, &mut ctx);
    ctx.dedent();
    ctx.add_line(");");
    ctx.dedent();
    ctx.add_line("}");
    ctx.add("\n");
    ctx.add_line(&format!("export default {};", component_name));

    Ok(ctx.get_output())
}

fn collect_components<'a>(node: &'a VNode, used: &mut BTreeSet<&'a str>) {
    if let Some(tag) = node.tag() {
        if REACT_EMAIL_COMPONENTS.contains(&tag) {
            used.insert(tag);
        }
    }
    for child in node.children() {
        collect_components(child, used);
    }
}

fn compile_imports(tree: &VNode, ctx: &mut CompilerContext) {
    let mut used = BTreeSet::new();
    collect_components(tree, &mut used);

    ctx.add_line("import * as React from \"react\";");
    ctx.add_line(&format!(
        "import {{ {} }} from \"{}\";",
        used.into_iter().collect::<Vec<_>>().join(", "),
        REACT_EMAIL_PACKAGE
    ));
    ctx.add("\n");
}

/// JSX text: markup characters become entities and braces are escaped
fn escape_jsx_text(text: &str) -> String {
    escape_attr(text).replace('{', "&#123;").replace('}', "&#125;")
}

/// Body of a `{/* ... */}` comment
fn escape_comment(text: &str) -> String {
    text.replace("*/", "*\\/")
}

/// Object key, quoted unless it is a plain identifier
fn object_key(key: &str) -> String {
    if is_valid_component_name(key) {
        key.to_string()
    } else {
        Value::from(key).to_string()
    }
}

fn style_object(styles: &BTreeMap<String, String>) -> String {
    let entries: Vec<String> = styles
        .iter()
        .map(|(key, value)| format!("{}: {}", object_key(key), Value::from(value.as_str())))
        .collect();
    format!("{{{{ {} }}}}", entries.join(", "))
}

fn placeholder_comment(component_name: &str, props: &Map<String, Value>) -> String {
    let props = serde_json::to_string(props).unwrap_or_default();
    format!(
        "{{/* Missing custom block: {} props={} */}}",
        escape_comment(component_name),
        escape_comment(&props)
    )
}

fn open_tag(tag: &str, attributes: &BTreeMap<String, String>, styles: &BTreeMap<String, String>) -> String {
    let mut open = format!("<{}", tag);
    for (key, value) in attributes {
        open.push_str(&format!(" {}=\"{}\"", key, escape_attr(value)));
    }
    if !styles.is_empty() {
        open.push_str(&format!(" style={}", style_object(styles)));
    }
    open
}

/// Children printed on the element's own line; text must not gain whitespace
fn compile_inline(node: &VNode) -> String {
    match node {
        VNode::Element {
            tag,
            attributes,
            styles,
            children,
        } => {
            let open = open_tag(tag, attributes, styles);
            if children.is_empty() {
                return format!("{} />", open);
            }
            if tag == "style" {
                let css: String = children.iter().map(VNode::text_content).collect();
                return format!("{}>{{{}}}</{}>", open, Value::from(css), tag);
            }
            let inner: String = children.iter().map(compile_inline).collect();
            format!("{}>{}</{}>", open, inner, tag)
        }
        VNode::Text { content } => escape_jsx_text(content),
        VNode::Comment { content } => format!("{{/* {} */}}", escape_comment(content)),
        VNode::Placeholder { component_name, props } => placeholder_comment(component_name, props),
    }
}

fn compile_node(node: &VNode, ctx: &mut CompilerContext) {
    match node {
        VNode::Element {
            tag,
            attributes,
            styles,
            children,
        } if !children.is_empty() && tag != "style" && !children.iter().any(|c| matches!(c, VNode::Text { .. })) => {
            ctx.add_line(&format!("{}>", open_tag(tag, attributes, styles)));
            ctx.indent();
            for child in children {
                compile_node(child, ctx);
            }
            ctx.dedent();
            ctx.add_line(&format!("</{}>", tag));
        }
        _ => ctx.add_line(&compile_inline(node)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_name_validation() {
        assert!(is_valid_component_name("EmailTemplate"));
        assert!(is_valid_component_name("_Welcome$2"));
        assert!(!is_valid_component_name(""));
        assert!(!is_valid_component_name("2Fast"));
        assert!(!is_valid_component_name("My-Email"));
        assert!(!is_valid_component_name("class"));
    }

    #[test]
    fn test_escape_jsx_text() {
        assert_eq!(escape_jsx_text("a < b & {c} \"d\""), "a &lt; b &amp; &#123;c&#125; &quot;d&quot;");
    }

    #[test]
    fn test_style_object() {
        let mut styles = BTreeMap::new();
        styles.insert("backgroundColor".to_string(), "#fff".to_string());
        styles.insert("margin".to_string(), "0".to_string());
        assert_eq!(style_object(&styles), "{{ backgroundColor: \"#fff\", margin: \"0\" }}");
    }

    #[test]
    fn test_placeholder_comment_cannot_close_early() {
        let mut props = Map::new();
        props.insert("note".to_string(), Value::from("*/ alert(1) /*"));
        let comment = placeholder_comment("Evil", &props);
        assert_eq!(comment.matches("*/").count(), 1);
        assert!(comment.ends_with("*/}"));
    }
}
