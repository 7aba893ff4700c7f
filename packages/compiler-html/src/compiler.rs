use mailforge_common::{
    block_alignment, column_styles, escape_attr, escape_text, row_styles, section_styles, visible,
    RenderContext, RenderResult, Styles, VNode,
};
use mailforge_schema::{Column, ContentBlock, Document, Row, Section, Theme};
use tracing::instrument;

struct Context<'a> {
    render: &'a RenderContext<'a>,
    indent: String,
    depth: usize,
    buffer: String,
}

impl<'a> Context<'a> {
    fn new(render: &'a RenderContext<'a>) -> Self {
        Self {
            indent: render.options.indent_str(),
            render,
            depth: 0,
            buffer: String::new(),
        }
    }

    fn pretty(&self) -> bool {
        !self.indent.is_empty()
    }

    fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn add_line(&mut self, text: &str) {
        if self.pretty() {
            self.add_indent();
        }
        self.add(text);
        if self.pretty() {
            self.add("\n");
        }
    }

    fn add_indent(&mut self) {
        for _ in 0..self.depth {
            self.buffer.push_str(&self.indent);
        }
    }

    fn indent(&mut self) {
        self.depth += 1;
    }

    fn dedent(&mut self) {
        if self.depth > 0 {
            self.depth -= 1;
        }
    }

    fn get_output(self) -> String {
        self.buffer
    }
}

/// ` style="..."` or nothing
fn style_attr(styles: &Styles) -> String {
    if styles.is_empty() {
        String::new()
    } else {
        format!(" style=\"{}\"", escape_attr(&styles.to_css()))
    }
}

fn class_attr(class: Option<String>) -> String {
    class
        .map(|class| format!(" class=\"{}\"", escape_attr(&class)))
        .unwrap_or_default()
}

/// Text content; line breaks become `<br />`
fn text_html(text: &str) -> String {
    escape_text(text).replace('\n', "<br />")
}

const TABLE_ATTRS: &str = "role=\"presentation\" width=\"100%\" cellpadding=\"0\" cellspacing=\"0\" border=\"0\"";

/// Compile an email document to a complete HTML page.
///
/// Layout uses nested presentation tables so it survives email clients;
/// each section, row and column carries its id in a `data-*` attribute.
#[instrument(skip_all, fields(title = %render.document.meta.title))]
pub fn compile_to_html(render: &RenderContext) -> RenderResult<String> {
    let mut ctx = Context::new(render);
    let document = render.document;

    ctx.add_line("<!DOCTYPE html>");
    ctx.add_line("<html lang=\"en\">");
    ctx.indent();

    compile_head(document, render.theme(), &mut ctx);

    let mut body = Styles::new();
    body.set("margin", "0");
    body.set("padding", "0");
    body.set_opt("font-family", render.theme().and_then(Theme::font_stack));
    ctx.add_line(&format!("<body{}>", style_attr(&body)));
    ctx.indent();

    for section in visible(&document.sections) {
        compile_section(section, &mut ctx)?;
    }

    ctx.dedent();
    ctx.add_line("</body>");

    ctx.dedent();
    ctx.add_line("</html>");

    Ok(ctx.get_output())
}

fn compile_head(document: &Document, theme: Option<&Theme>, ctx: &mut Context) {
    ctx.add_line("<head>");
    ctx.indent();

    ctx.add_line("<meta charset=\"UTF-8\">");
    ctx.add_line("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">");
    ctx.add_line(&format!("<title>{}</title>", escape_text(&document.meta.title)));
    if let Some(description) = &document.meta.description {
        ctx.add_line(&format!(
            "<meta name=\"description\" content=\"{}\">",
            escape_attr(description)
        ));
    }

    let web_fonts: Vec<_> = theme
        .map(|theme| {
            theme
                .fonts
                .iter()
                .filter_map(|font| font.web_font.as_ref().map(|web| (font, web)))
                .collect()
        })
        .unwrap_or_default();
    if !web_fonts.is_empty() {
        ctx.add_line("<style>");
        ctx.indent();
        for (font, web) in web_fonts {
            ctx.add_line(&format!(
                "@font-face {{ font-family: '{}'; src: url('{}') format('{}'); }}",
                font.family, web.url, web.format
            ));
        }
        ctx.dedent();
        ctx.add_line("</style>");
    }

    ctx.dedent();
    ctx.add_line("</head>");
}

fn compile_section(section: &Section, ctx: &mut Context) -> RenderResult<()> {
    let render = ctx.render;
    ctx.add_line(&format!(
        "<table {} data-section-id=\"{}\"{}{}>",
        TABLE_ATTRS,
        escape_attr(&section.id),
        class_attr(render.class_list(section.class_name.as_deref(), "section")),
        style_attr(&section_styles(section, render.theme())),
    ));
    ctx.indent();
    ctx.add_line("<tr>");
    ctx.indent();
    ctx.add_line("<td>");
    ctx.indent();

    for row in visible(&section.rows) {
        compile_row(row, ctx)?;
    }

    ctx.dedent();
    ctx.add_line("</td>");
    ctx.dedent();
    ctx.add_line("</tr>");
    ctx.dedent();
    ctx.add_line("</table>");
    Ok(())
}

fn compile_row(row: &Row, ctx: &mut Context) -> RenderResult<()> {
    let render = ctx.render;
    ctx.add_line(&format!(
        "<table {} data-row-id=\"{}\"{}{}>",
        TABLE_ATTRS,
        escape_attr(&row.id),
        class_attr(render.class_list(row.class_name.as_deref(), "row")),
        style_attr(&row_styles(row, render.theme())),
    ));
    ctx.indent();
    ctx.add_line("<tr>");
    ctx.indent();

    for (index, column) in visible(&row.columns).enumerate() {
        compile_column(column, index, row.gutter, ctx)?;
    }

    ctx.dedent();
    ctx.add_line("</tr>");
    ctx.dedent();
    ctx.add_line("</table>");
    Ok(())
}

fn compile_column(column: &Column, index: usize, gutter: Option<u32>, ctx: &mut Context) -> RenderResult<()> {
    let render = ctx.render;
    let styles = column_styles(column, index, gutter, render.theme());
    let valign = column
        .vertical_align
        .map(|v| format!(" valign=\"{}\"", v.as_str()))
        .unwrap_or_default();
    let width = column
        .width
        .as_ref()
        .map(|w| format!(" width=\"{}\"", escape_attr(w)))
        .unwrap_or_default();

    ctx.add_line(&format!(
        "<td data-column-id=\"{}\"{}{}{}{}>",
        escape_attr(&column.id),
        width,
        valign,
        class_attr(render.class_list(column.class_name.as_deref(), "column")),
        style_attr(&styles),
    ));
    ctx.indent();

    for block in visible(&column.blocks) {
        compile_block(block, ctx)?;
    }

    ctx.dedent();
    ctx.add_line("</td>");
    Ok(())
}

fn compile_block(block: &ContentBlock, ctx: &mut Context) -> RenderResult<()> {
    let render = ctx.render;
    let block = render.interpolate(block);
    let styles = style_attr(&render.block_styles(&block));
    let class = class_attr(render.class_list(None, block.kind().as_str()));

    let html = match &block {
        ContentBlock::Text(node) => format!("<p{}{}>{}</p>", class, styles, text_html(&node.props.content)),

        ContentBlock::Heading(node) => {
            let tag = node.props.level.tag();
            format!("<{tag}{}{}>{}</{tag}>", class, styles, text_html(&node.props.content))
        }

        ContentBlock::Button(node) => format!(
            "<a href=\"{}\" target=\"_blank\"{}{}>{}</a>",
            escape_attr(node.props.href.as_deref().unwrap_or("#")),
            class,
            styles,
            escape_text(&node.props.label),
        ),

        ContentBlock::Divider(_) => format!("<hr{}{} />", class, styles),

        ContentBlock::Image(node) => {
            let props = &node.props;
            let mut img = format!(
                "<img src=\"{}\" alt=\"{}\"",
                escape_attr(&props.src),
                escape_attr(props.alt.as_deref().unwrap_or_default())
            );
            if let Some(width) = props.width {
                img.push_str(&format!(" width=\"{}\"", width));
            }
            if let Some(height) = props.height {
                img.push_str(&format!(" height=\"{}\"", height));
            }
            img.push_str(&format!("{}{} />", class, styles));
            match &props.href {
                Some(href) => format!("<a href=\"{}\" target=\"_blank\">{}</a>", escape_attr(href), img),
                None => img,
            }
        }

        ContentBlock::Custom(node) => match render.render_custom(node)? {
            VNode::Placeholder { component_name, props } => {
                mailforge_common::placeholder_html(&component_name, &props)
            }
            rendered => rendered.to_html(),
        },
    };

    ctx.add_line(&format!(
        "<div data-block-id=\"{}\" data-block-type=\"{}\"{}>",
        escape_attr(block.id()),
        block.kind().as_str(),
        block_alignment(&block)
            .map(|align| format!(" style=\"text-align:{}\"", align.as_str()))
            .unwrap_or_default(),
    ));
    ctx.indent();
    ctx.add_line(&html);
    ctx.dedent();
    ctx.add_line("</div>");
    Ok(())
}
