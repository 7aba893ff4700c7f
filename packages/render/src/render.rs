use crate::output::RenderOutput;
use anyhow::{anyhow, Context};
use mailforge_common::{
    merge_variables, visible_blocks, CustomBlockRegistry, RenderContext, RenderFormat, RenderOptions,
    RenderResult,
};
use mailforge_compiler_html::compile_to_html;
use mailforge_compiler_react::{compile_to_element, compile_to_react};
use mailforge_compiler_text::compile_to_text;
use mailforge_schema::{ContentBlock, Document};
use mailforge_template::unresolved;
use serde_json::Value;
use std::collections::BTreeSet;
use tracing::{debug, instrument};

/// Render `document` in the format named by `options`.
///
/// Fails only on an unregistered custom block (unless the options ask for
/// placeholders) or an invalid component name for React source.
#[instrument(skip_all, fields(format = options.format.as_str()))]
pub fn render_document(
    document: &Document,
    options: &RenderOptions,
    registry: &CustomBlockRegistry,
) -> RenderResult<RenderOutput> {
    let ctx = RenderContext::new(document, options, registry);
    let output = match options.format {
        RenderFormat::Html => RenderOutput::Html {
            html: compile_to_html(&ctx)?,
        },
        RenderFormat::PlainText => RenderOutput::PlainText {
            text: compile_to_text(&ctx)?,
        },
        RenderFormat::ReactElement => RenderOutput::ReactElement {
            node: compile_to_element(&ctx)?,
        },
        RenderFormat::ReactSourceText => RenderOutput::ReactSourceText {
            code: compile_to_react(&ctx)?,
        },
    };
    debug!("rendered document");
    Ok(output)
}

/// Answer a JSON render request with default options as the base
pub fn render_request(json: &str, registry: &CustomBlockRegistry) -> anyhow::Result<String> {
    render_request_with_defaults(json, registry, &RenderOptions::default())
}

/// Answer a JSON render request `{ document, options? }`.
///
/// Request options are layered over `defaults` key by key. The document is
/// validated before anything renders.
pub fn render_request_with_defaults(
    json: &str,
    registry: &CustomBlockRegistry,
    defaults: &RenderOptions,
) -> anyhow::Result<String> {
    let request: Value = serde_json::from_str(json).context("Failed to parse render request")?;
    let Value::Object(mut request) = request else {
        return Err(anyhow!("Render request must be a JSON object"));
    };

    let document = request
        .remove("document")
        .ok_or_else(|| anyhow!("Render request is missing \"document\""))?;
    let document = mailforge_schema::parse(&document).context("Invalid document in render request")?;

    let options = match request.remove("options") {
        Some(overrides) => layer_options(defaults, overrides)?,
        None => defaults.clone(),
    };

    let output = render_document(&document, &options, registry)?;
    Ok(serde_json::to_string(&output)?)
}

fn layer_options(defaults: &RenderOptions, overrides: Value) -> anyhow::Result<RenderOptions> {
    let Value::Object(overrides) = overrides else {
        return Err(anyhow!("Render options must be a JSON object"));
    };
    let mut merged = match serde_json::to_value(defaults)? {
        Value::Object(map) => map,
        _ => serde_json::Map::new(),
    };
    merged.extend(overrides);
    serde_json::from_value(Value::Object(merged)).context("Invalid render options")
}

fn text_props(block: &ContentBlock) -> Vec<&str> {
    match block {
        ContentBlock::Text(node) => vec![node.props.content.as_str()],
        ContentBlock::Heading(node) => vec![node.props.content.as_str()],
        ContentBlock::Button(node) => {
            let mut props = vec![node.props.label.as_str()];
            props.extend(node.props.href.as_deref());
            props
        }
        ContentBlock::Image(node) => {
            let mut props = vec![node.props.src.as_str()];
            props.extend(node.props.alt.as_deref());
            props.extend(node.props.href.as_deref());
            props
        }
        ContentBlock::Divider(_) | ContentBlock::Custom(_) => Vec::new(),
    }
}

fn custom_strings(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(s) => out.push(s.clone()),
        Value::Array(items) => items.iter().for_each(|item| custom_strings(item, out)),
        Value::Object(map) => map.values().for_each(|item| custom_strings(item, out)),
        _ => {}
    }
}

/// Variable paths the visible document references but cannot resolve,
/// sorted and unique
pub fn unresolved_variables(document: &Document, options: &RenderOptions) -> Vec<String> {
    let variables = merge_variables(document.variables.as_ref(), options.variables.as_ref());
    let mut missing = BTreeSet::new();

    for block in visible_blocks(document) {
        let mut texts: Vec<String> = text_props(block).into_iter().map(str::to_string).collect();
        if let ContentBlock::Custom(node) = block {
            node.props.props.values().for_each(|value| custom_strings(value, &mut texts));
        }
        for text in texts {
            missing.extend(unresolved(&text, &variables));
        }
    }

    missing.into_iter().collect()
}
