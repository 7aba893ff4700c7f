use crate::{compile_to_element, compile_to_react};
use mailforge_common::{
    CustomBlockDefinition, CustomBlockRegistry, RenderContext, RenderError, RenderOptions, VNode,
};
use mailforge_schema::{Column, ContentBlock, Document, Row, Section};
use serde_json::{json, Map, Value};

fn vars(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => panic!("expected object"),
    }
}

fn document(blocks: Vec<ContentBlock>) -> Document {
    let column = blocks.into_iter().fold(Column::new("c1"), Column::with_block);
    Document::new("Welcome").with_section(Section::new("s1").with_row(Row::new("r1").with_column(column)))
}

fn element(doc: &Document, options: &RenderOptions) -> Result<VNode, RenderError> {
    compile_to_element(&RenderContext::new(doc, options, &CustomBlockRegistry::new()))
}

fn source(doc: &Document, options: &RenderOptions) -> Result<String, RenderError> {
    compile_to_react(&RenderContext::new(doc, options, &CustomBlockRegistry::new()))
}

fn by_tag<'a>(tree: &'a VNode, tag: &str) -> Option<&'a VNode> {
    tree.find(&|node: &VNode| node.tag() == Some(tag))
}

#[test]
fn test_element_tree_shape() {
    let doc = document(vec![ContentBlock::text("t1", "Hi {{name}}")]).with_variables(vars(json!({ "name": "Sam" })));
    let tree = element(&doc, &RenderOptions::default()).unwrap();

    assert_eq!(tree.tag(), Some("Html"));
    let section = by_tag(&tree, "Section").expect("section");
    assert_eq!(section.attr("data-section-id"), Some("s1"));
    assert_eq!(by_tag(&tree, "Row").and_then(|row| row.attr("data-row-id")), Some("r1"));
    assert_eq!(by_tag(&tree, "Column").and_then(|c| c.attr("data-column-id")), Some("c1"));

    let text = by_tag(&tree, "Text").expect("text");
    assert_eq!(text.text_content(), "Hi Sam");
}

#[test]
fn test_element_tree_blocks() {
    let mut image = ContentBlock::image("i1", "https://cdn.example.com/a.png");
    if let ContentBlock::Image(node) = &mut image {
        node.props.href = Some("https://example.com".to_string());
        node.props.width = Some(300);
    }
    let doc = document(vec![
        ContentBlock::heading("h1", "Title"),
        ContentBlock::button("b1", "Go", "https://example.com/go"),
        ContentBlock::divider("d1"),
        image,
    ]);
    let tree = element(&doc, &RenderOptions::default()).unwrap();

    assert_eq!(by_tag(&tree, "Heading").and_then(|h| h.attr("as")), Some("h2"));
    let button = by_tag(&tree, "Button").expect("button");
    assert_eq!(button.attr("href"), Some("https://example.com/go"));
    assert_eq!(button.text_content(), "Go");
    assert!(by_tag(&tree, "Hr").is_some());

    let link = by_tag(&tree, "Link").expect("image link");
    let img = by_tag(link, "Img").expect("img inside link");
    assert_eq!(img.attr("width"), Some("300"));
}

#[test]
fn test_element_tree_uses_camel_case_styles() {
    let mut button = ContentBlock::button("b1", "Go", "#");
    if let ContentBlock::Button(node) = &mut button {
        node.props.background_color = Some("#111827".to_string());
    }
    let tree = element(&document(vec![button]), &RenderOptions::default()).unwrap();

    let VNode::Element { styles, .. } = by_tag(&tree, "Button").expect("button") else {
        panic!("expected element");
    };
    assert_eq!(styles.get("backgroundColor").map(String::as_str), Some("#111827"));
    assert_eq!(styles.get("padding").map(String::as_str), Some("12px 24px"));
}

#[test]
fn test_element_tree_hides_hidden_nodes() {
    let mut hidden = ContentBlock::text("t2", "secret");
    hidden.set_hidden(true);
    let tree = element(&document(vec![ContentBlock::text("t1", "shown"), hidden]), &RenderOptions::default()).unwrap();

    assert!(!tree.text_content().contains("secret"));
    assert!(tree.text_content().contains("shown"));
}

#[test]
fn test_element_tree_missing_custom_block() {
    let doc = document(vec![ContentBlock::custom("k1", "Promo", Map::new())]);

    assert_eq!(
        element(&doc, &RenderOptions::default()).unwrap_err(),
        RenderError::MissingCustomBlock("Promo".to_string())
    );

    let tree = element(&doc, &RenderOptions::default().fail_soft()).unwrap();
    let placeholder = tree.find(&|node: &VNode| matches!(node, VNode::Placeholder { .. }));
    assert!(placeholder.is_some());
    assert!(tree.text_content().contains("[Promo]"));
}

#[test]
fn test_simple_component_source() {
    let doc = document(vec![ContentBlock::text("t1", "Hi {{name}}")]).with_variables(vars(json!({ "name": "Sam" })));
    let result = source(&doc, &RenderOptions::default()).expect("Failed to compile");

    println!("Generated code:\n{}", result);

    assert!(result.contains("import * as React from \"react\";"));
    assert!(result.contains(
        "import { Body, Column, Container, Head, Html, Row, Section, Text } from \"@react-email/components\";"
    ));
    assert!(result.contains("export function EmailTemplate() {"));
    assert!(result.contains("export default EmailTemplate;"));
    assert!(result.contains("<Text style={{ margin: \"0\" }}>Hi Sam</Text>"));
    assert!(result.contains("<Section data-section-id=\"s1\">"));
}

#[test]
fn test_imports_only_used_components() {
    let doc = document(vec![ContentBlock::divider("d1")]);
    let result = source(&doc, &RenderOptions::default()).unwrap();

    assert!(result.contains("Hr"));
    assert!(!result.contains("Button"));
    assert!(!result.contains("Img"));
}

#[test]
fn test_custom_component_name() {
    let doc = document(vec![ContentBlock::text("t1", "x")]);
    let options = RenderOptions {
        component_name: "WelcomeEmail".to_string(),
        ..Default::default()
    };
    let result = source(&doc, &options).unwrap();

    assert!(result.contains("export function WelcomeEmail() {"));
    assert!(result.contains("export default WelcomeEmail;"));
}

#[test]
fn test_invalid_component_name() {
    let doc = document(vec![ContentBlock::text("t1", "x")]);
    let options = RenderOptions {
        component_name: "my-email".to_string(),
        ..Default::default()
    };
    assert_eq!(
        source(&doc, &options).unwrap_err(),
        RenderError::InvalidComponentName("my-email".to_string())
    );
}

#[test]
fn test_escape_text_and_attributes() {
    let doc = document(vec![
        ContentBlock::text("t1", "Use <b> & {braces} \"quoted\""),
        ContentBlock::button("b1", "Go", "https://example.com/?a=1&b=\"2\""),
    ]);
    let result = source(&doc, &RenderOptions::default()).unwrap();

    assert!(result.contains("Use &lt;b&gt; &amp; &#123;braces&#125; &quot;quoted&quot;"));
    assert!(result.contains("href=\"https://example.com/?a=1&amp;b=&quot;2&quot;\""));
}

#[test]
fn test_line_breaks_become_br() {
    let doc = document(vec![ContentBlock::text("t1", "one\ntwo")]);
    let result = source(&doc, &RenderOptions::default()).unwrap();
    assert!(result.contains(">one<br />two</Text>"));
}

#[test]
fn test_registered_custom_block_source() {
    let registry = CustomBlockRegistry::new().with(
        CustomBlockDefinition::new("Badge", |props| {
            VNode::element("Text")
                .with_attr("className", "badge")
                .with_child(VNode::text(props.get("label").and_then(Value::as_str).unwrap_or_default()))
        })
        .with_default("label", json!("New")),
    );
    let doc = document(vec![ContentBlock::custom("k1", "Badge", Map::new())]);
    let options = RenderOptions::default();
    let result = compile_to_react(&RenderContext::new(&doc, &options, &registry)).unwrap();

    assert!(result.contains("<Text className=\"badge\">New</Text>"));
}

#[test]
fn test_missing_custom_block_source() {
    let doc = document(vec![ContentBlock::custom("k1", "Promo", vars(json!({ "code": "SAVE10" })))]);

    assert_eq!(
        source(&doc, &RenderOptions::default()).unwrap_err(),
        RenderError::MissingCustomBlock("Promo".to_string())
    );

    let result = source(&doc, &RenderOptions::default().fail_soft()).unwrap();
    assert!(result.contains("{/* Missing custom block: Promo props={\"code\":\"SAVE10\"} */}"));
}

#[test]
fn test_daisyui_class_names() {
    let doc = document(vec![ContentBlock::button("b1", "Go", "#")]);
    let options = RenderOptions {
        daisyui: true,
        ..Default::default()
    };
    let result = source(&doc, &options).unwrap();

    assert!(result.contains("className=\"btn btn-primary\""));
    assert!(result.contains("className=\"card bg-base-100\""));
}
