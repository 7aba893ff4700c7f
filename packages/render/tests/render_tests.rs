//! Rendering through the public dispatch API and JSON requests

use mailforge_render::{
    render_document, render_request, render_request_with_defaults, CustomBlockDefinition,
    CustomBlockRegistry, RenderError, RenderFormat, RenderOptions, RenderOutput, VNode,
};
use mailforge_schema::{parse_str, Document};
use serde_json::{json, Value};

const WELCOME: &str = r##"{
    "version": 1,
    "meta": { "title": "Welcome", "description": "First email" },
    "variables": { "name": "Sam", "product": { "title": "Desk Lamp", "price": "$40" } },
    "theme": { "palette": { "primary": "#4f46e5" }, "fontFamily": "Inter, sans-serif" },
    "sections": [
        {
            "id": "s1",
            "type": "section",
            "padding": { "top": 24, "bottom": 24 },
            "rows": [
                {
                    "id": "r1",
                    "type": "row",
                    "columns": [
                        {
                            "id": "c1",
                            "type": "column",
                            "blocks": [
                                { "id": "h1", "type": "heading", "props": { "content": "Welcome aboard", "as": "h1" } },
                                { "id": "t1", "type": "text", "props": { "content": "Hi {{name}}" } },
                                { "id": "b1", "type": "button", "props": { "label": "Start", "href": "https://example.com", "backgroundColor": "palette.primary" } },
                                { "id": "d1", "type": "divider", "props": {} },
                                { "id": "k1", "type": "custom", "props": { "componentName": "ProductCard", "props": { "product": "{{product}}" } } }
                            ]
                        }
                    ]
                }
            ]
        }
    ]
}"##;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn welcome() -> Document {
    parse_str(WELCOME).expect("valid fixture")
}

fn product_registry() -> CustomBlockRegistry {
    CustomBlockRegistry::new().with(CustomBlockDefinition::new("ProductCard", |props| {
        let product = props.get("product").cloned().unwrap_or(Value::Null);
        let field = |key: &str| product.get(key).and_then(Value::as_str).unwrap_or_default().to_string();
        VNode::element("Section")
            .with_attr("className", "product")
            .with_child(VNode::element("Text").with_child(VNode::text(field("title"))))
            .with_child(VNode::element("Text").with_child(VNode::text(field("price"))))
    }))
}

#[test]
fn test_every_format_renders_with_registered_blocks() {
    init_tracing();
    let doc = welcome();
    let registry = product_registry();

    for format in RenderFormat::ALL {
        let output = render_document(&doc, &RenderOptions::new(format), &registry)
            .unwrap_or_else(|err| panic!("{} failed: {}", format.as_str(), err));
        assert_eq!(output.format(), format);
    }
}

#[test]
fn test_html_output() {
    let output = render_document(&welcome(), &RenderOptions::default(), &product_registry()).unwrap();
    let html = output.as_text().expect("html is text");

    assert!(html.contains("Hi Sam"));
    assert!(html.contains("<h1"));
    assert!(html.contains("background-color:#4f46e5"));
    assert!(html.contains("padding:24px 0px 24px 0px"));
    assert!(html.contains("Desk Lamp"));
    assert!(html.contains("font-family:Inter, sans-serif"));
}

#[test]
fn test_plain_text_output() {
    let options = RenderOptions::new(RenderFormat::PlainText);
    let output = render_document(&welcome(), &options, &product_registry()).unwrap();

    assert_eq!(
        output,
        RenderOutput::PlainText {
            text: "Welcome aboard\n\nHi Sam\n\nStart: https://example.com\n\n---\n\nDesk Lamp$40\n".to_string()
        }
    );
}

#[test]
fn test_react_element_output() {
    let options = RenderOptions::new(RenderFormat::ReactElement);
    let output = render_document(&welcome(), &options, &product_registry()).unwrap();
    let node = output.as_node().expect("element tree");

    assert_eq!(node.tag(), Some("Html"));
    let product = node
        .find(&|n: &VNode| n.attr("className") == Some("product"))
        .expect("custom block rendered");
    assert_eq!(product.text_content(), "Desk Lamp$40");
}

#[test]
fn test_react_source_output() {
    let options = RenderOptions {
        format: RenderFormat::ReactSourceText,
        component_name: "WelcomeEmail".to_string(),
        ..Default::default()
    };
    let output = render_document(&welcome(), &options, &product_registry()).unwrap();
    let code = output.as_text().expect("source is text");

    assert!(code.contains("export function WelcomeEmail() {"));
    assert!(code.contains("Button"));
    assert!(code.contains("<Heading "));
    assert!(code.contains("Hi Sam"));
}

#[test]
fn test_missing_custom_block_every_format() {
    init_tracing();
    let doc = welcome();
    let empty = CustomBlockRegistry::new();

    for format in RenderFormat::ALL {
        let err = render_document(&doc, &RenderOptions::new(format), &empty).unwrap_err();
        assert_eq!(err, RenderError::MissingCustomBlock("ProductCard".to_string()));
        assert_eq!(err.to_string(), "Custom block \"ProductCard\" not found in registry");

        let output = render_document(&doc, &RenderOptions::new(format).fail_soft(), &empty)
            .unwrap_or_else(|err| panic!("{} failed: {}", format.as_str(), err));
        let marked = match &output {
            RenderOutput::Html { html } => html.contains("data-custom-block-placeholder=\"ProductCard\""),
            RenderOutput::PlainText { text } => text.contains("[ProductCard]"),
            RenderOutput::ReactElement { node } => node
                .find(&|n: &VNode| matches!(n, VNode::Placeholder { component_name, .. } if component_name == "ProductCard"))
                .is_some(),
            RenderOutput::ReactSourceText { code } => code.contains("{/* Missing custom block: ProductCard"),
        };
        assert!(marked, "no placeholder in {} output", format.as_str());
    }
}

#[test]
fn test_placeholder_props_are_substituted() {
    let options = RenderOptions::new(RenderFormat::ReactSourceText).fail_soft();
    let output = render_document(&welcome(), &options, &CustomBlockRegistry::new()).unwrap();
    let code = output.as_text().unwrap();

    assert!(code.contains(r#"props={"product":{"price":"$40","title":"Desk Lamp"}}"#));
}

#[test]
fn test_render_request_html() -> anyhow::Result<()> {
    let request = json!({
        "document": serde_json::from_str::<Value>(WELCOME)?,
        "options": { "format": "html", "variables": { "name": "Ada" } }
    });
    let response: Value = serde_json::from_str(&render_request(&request.to_string(), &product_registry())?)?;

    assert_eq!(response["format"], json!("html"));
    let html = response["html"].as_str().unwrap_or_default();
    assert!(html.contains("Hi Ada"));
    Ok(())
}

#[test]
fn test_render_request_fail_soft_option() -> anyhow::Result<()> {
    let request = json!({
        "document": serde_json::from_str::<Value>(WELCOME)?,
        "options": { "format": "plain-text", "throwOnMissingCustomBlocks": false }
    });
    let response: Value = serde_json::from_str(&render_request(&request.to_string(), &CustomBlockRegistry::new())?)?;

    assert_eq!(response["format"], json!("plain-text"));
    assert!(response["text"].as_str().unwrap_or_default().contains("[ProductCard]"));
    Ok(())
}

#[test]
fn test_render_request_errors() {
    let registry = CustomBlockRegistry::new();

    let err = render_request("not json", &registry).unwrap_err();
    assert!(err.to_string().contains("Failed to parse render request"));

    let err = render_request(r#"{ "options": {} }"#, &registry).unwrap_err();
    assert!(err.to_string().contains("missing \"document\""));

    let err = render_request(r#"{ "document": { "version": 1, "meta": {}, "sections": [] } }"#, &registry).unwrap_err();
    assert!(err.to_string().contains("Invalid document"));

    let request = json!({ "document": serde_json::from_str::<Value>(WELCOME).unwrap() });
    let err = render_request(&request.to_string(), &registry).unwrap_err();
    assert_eq!(
        err.downcast_ref::<RenderError>(),
        Some(&RenderError::MissingCustomBlock("ProductCard".to_string()))
    );
}

#[test]
fn test_render_request_layers_over_defaults() -> anyhow::Result<()> {
    let defaults = RenderOptions {
        format: RenderFormat::PlainText,
        throw_on_missing_custom_blocks: false,
        ..Default::default()
    };
    let request = json!({ "document": serde_json::from_str::<Value>(WELCOME)? });
    let response: Value = serde_json::from_str(&render_request_with_defaults(
        &request.to_string(),
        &CustomBlockRegistry::new(),
        &defaults,
    )?)?;

    assert_eq!(response["format"], json!("plain-text"));
    Ok(())
}
