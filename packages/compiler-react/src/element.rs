use mailforge_common::{
    block_alignment, column_styles, row_styles, section_styles, visible, RenderContext, RenderResult,
    Styles, VNode,
};
use mailforge_schema::{Column, ContentBlock, Document, Row, Section, Theme};
use tracing::instrument;

fn styled(tag: &str, styles: &Styles) -> VNode {
    VNode::element(tag).with_styles(styles.to_react())
}

/// Text children with line breaks turned into `<br />` elements
fn text_children(text: &str) -> Vec<VNode> {
    let mut children = Vec::new();
    for (index, line) in text.split('\n').enumerate() {
        if index > 0 {
            children.push(VNode::element("br"));
        }
        if !line.is_empty() {
            children.push(VNode::text(line));
        }
    }
    children
}

/// Build the React-Email element tree for a document.
///
/// Layout nodes carry their ids as `data-*` attributes. Unregistered custom
/// blocks appear as [`VNode::Placeholder`] when the options allow it.
#[instrument(skip_all, fields(title = %render.document.meta.title))]
pub fn compile_to_element(render: &RenderContext) -> RenderResult<VNode> {
    let document = render.document;
    let theme = render.theme();

    let mut body = Styles::new();
    body.set("margin", "0");
    body.set("padding", "0");
    body.set_opt("font-family", theme.and_then(Theme::font_stack));

    let container = visible(&document.sections)
        .map(|section| compile_section(section, render))
        .collect::<RenderResult<Vec<_>>>()?;

    Ok(VNode::element("Html")
        .with_attr("lang", "en")
        .with_child(compile_head(document, theme))
        .with_child(
            styled("Body", &body).with_child(
                VNode::element("Container")
                    .with_style("width", "100%")
                    .with_children(container),
            ),
        ))
}

fn compile_head(document: &Document, theme: Option<&Theme>) -> VNode {
    let mut head = VNode::element("Head")
        .with_child(VNode::element("title").with_child(VNode::text(document.meta.title.as_str())));

    if let Some(description) = &document.meta.description {
        head = head.with_child(
            VNode::element("meta")
                .with_attr("name", "description")
                .with_attr("content", description.as_str()),
        );
    }

    let font_faces: Vec<String> = theme
        .map(|theme| {
            theme
                .fonts
                .iter()
                .filter_map(|font| {
                    font.web_font.as_ref().map(|web| {
                        format!(
                            "@font-face {{ font-family: '{}'; src: url('{}') format('{}'); }}",
                            font.family, web.url, web.format
                        )
                    })
                })
                .collect()
        })
        .unwrap_or_default();
    if !font_faces.is_empty() {
        head = head.with_child(VNode::element("style").with_child(VNode::text(font_faces.join("\n"))));
    }

    head
}

fn compile_section(section: &Section, render: &RenderContext) -> RenderResult<VNode> {
    let rows = visible(&section.rows)
        .map(|row| compile_row(row, render))
        .collect::<RenderResult<Vec<_>>>()?;

    Ok(styled("Section", &section_styles(section, render.theme()))
        .with_attr("data-section-id", section.id.as_str())
        .with_opt_attr("className", render.class_list(section.class_name.as_deref(), "section"))
        .with_children(rows))
}

fn compile_row(row: &Row, render: &RenderContext) -> RenderResult<VNode> {
    let columns = visible(&row.columns)
        .enumerate()
        .map(|(index, column)| compile_column(column, index, row.gutter, render))
        .collect::<RenderResult<Vec<_>>>()?;

    Ok(styled("Row", &row_styles(row, render.theme()))
        .with_attr("data-row-id", row.id.as_str())
        .with_opt_attr("className", render.class_list(row.class_name.as_deref(), "row"))
        .with_children(columns))
}

fn compile_column(column: &Column, index: usize, gutter: Option<u32>, render: &RenderContext) -> RenderResult<VNode> {
    let blocks = visible(&column.blocks)
        .map(|block| compile_block(block, render))
        .collect::<RenderResult<Vec<_>>>()?;

    Ok(styled("Column", &column_styles(column, index, gutter, render.theme()))
        .with_attr("data-column-id", column.id.as_str())
        .with_opt_attr("className", render.class_list(column.class_name.as_deref(), "column"))
        .with_children(blocks))
}

fn compile_block(block: &ContentBlock, render: &RenderContext) -> RenderResult<VNode> {
    let block = render.interpolate(block);
    let styles = render.block_styles(&block);
    let class = render.class_list(None, block.kind().as_str());

    let element = match &block {
        ContentBlock::Text(node) => styled("Text", &styles)
            .with_opt_attr("className", class)
            .with_children(text_children(&node.props.content)),

        ContentBlock::Heading(node) => styled("Heading", &styles)
            .with_attr("as", node.props.level.tag())
            .with_opt_attr("className", class)
            .with_children(text_children(&node.props.content)),

        ContentBlock::Button(node) => styled("Button", &styles)
            .with_attr("href", node.props.href.as_deref().unwrap_or("#"))
            .with_attr("target", "_blank")
            .with_opt_attr("className", class)
            .with_child(VNode::text(node.props.label.as_str())),

        ContentBlock::Divider(_) => styled("Hr", &styles).with_opt_attr("className", class),

        ContentBlock::Image(node) => {
            let props = &node.props;
            let img = styled("Img", &styles)
                .with_attr("src", props.src.as_str())
                .with_attr("alt", props.alt.as_deref().unwrap_or_default())
                .with_opt_attr("width", props.width.map(|w| w.to_string()))
                .with_opt_attr("height", props.height.map(|h| h.to_string()))
                .with_opt_attr("className", class);
            match &props.href {
                Some(href) => VNode::element("Link")
                    .with_attr("href", href.as_str())
                    .with_attr("target", "_blank")
                    .with_child(img),
                None => img,
            }
        }

        ContentBlock::Custom(node) => render.render_custom(node)?,
    };

    let mut wrapper = VNode::element("div")
        .with_attr("data-block-id", block.id())
        .with_attr("data-block-type", block.kind().as_str());
    if let Some(align) = block_alignment(&block) {
        wrapper = wrapper.with_style("textAlign", align.as_str());
    }
    Ok(wrapper.with_child(element))
}
