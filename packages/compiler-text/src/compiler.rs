use crate::strip::strip_tags;
use mailforge_common::{RenderContext, RenderError, RenderResult, Visitor};
use mailforge_schema::ContentBlock;
use tracing::instrument;

/// Collects one paragraph per visible block. The first render error stops
/// further output and is reported by [`compile_to_text`].
struct TextCollector<'a> {
    render: &'a RenderContext<'a>,
    paragraphs: Vec<String>,
    error: Option<RenderError>,
}

impl Visitor for TextCollector<'_> {
    fn visit_block(&mut self, block: &ContentBlock) {
        if self.error.is_some() {
            return;
        }
        match block_text(self.render, block) {
            Ok(text) => {
                let text = text.trim();
                if !text.is_empty() {
                    self.paragraphs.push(text.to_string());
                }
            }
            Err(err) => self.error = Some(err),
        }
    }
}

fn block_text(render: &RenderContext, block: &ContentBlock) -> RenderResult<String> {
    let block = render.interpolate(block);
    let text = match &block {
        ContentBlock::Text(node) => strip_tags(&node.props.content),
        ContentBlock::Heading(node) => strip_tags(&node.props.content),
        ContentBlock::Button(node) => match node.props.href.as_deref().filter(|href| !href.is_empty()) {
            Some(href) => format!("{}: {}", node.props.label, href),
            None => node.props.label.clone(),
        },
        ContentBlock::Divider(_) => "---".to_string(),
        ContentBlock::Image(node) => {
            format!("[{}]({})", node.props.alt.as_deref().unwrap_or_default(), node.props.src)
        }
        ContentBlock::Custom(node) => render.render_custom(node)?.text_content(),
    };
    Ok(text)
}

/// Compile an email document to plain text.
///
/// Blocks appear in reading order, separated by a blank line; hidden nodes
/// contribute nothing.
#[instrument(skip_all, fields(title = %render.document.meta.title))]
pub fn compile_to_text(render: &RenderContext) -> RenderResult<String> {
    let mut collector = TextCollector {
        render,
        paragraphs: Vec::new(),
        error: None,
    };
    collector.visit_document(render.document);

    if let Some(err) = collector.error {
        return Err(err);
    }

    let mut output = collector.paragraphs.join("\n\n");
    if !output.is_empty() {
        output.push('\n');
    }
    Ok(output)
}
