//! Style normalization shared by every renderer.
//!
//! Each node's presentation props are turned into one ordered list of CSS
//! declarations here; renderers only decide how to print that list (inline
//! `style` attribute, React style object, JSX literal). Spacing and colors
//! therefore resolve to the same values in every format.

use crate::vnode::camel_case;
use mailforge_schema::{
    Align, BlockNode, ButtonProps, Column, ContentBlock, DividerProps, HeadingProps, ImageProps, Row,
    Section, Spacing, SpacingSides, TextProps, Theme,
};

/// Ordered CSS declarations with kebab-case property names
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Styles(Vec<(&'static str, String)>);

impl Styles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `property`, replacing an earlier value in place
    pub fn set(&mut self, property: &'static str, value: impl Into<String>) {
        let value = value.into();
        match self.0.iter_mut().find(|(p, _)| *p == property) {
            Some(slot) => slot.1 = value,
            None => self.0.push((property, value)),
        }
    }

    pub fn set_opt(&mut self, property: &'static str, value: Option<impl Into<String>>) {
        if let Some(value) = value {
            self.set(property, value);
        }
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(p, _)| *p == property)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(p, v)| (*p, v.as_str()))
    }

    /// `color:#111;font-size:16px`
    pub fn to_css(&self) -> String {
        self.iter()
            .map(|(p, v)| format!("{}:{}", p, v))
            .collect::<Vec<_>>()
            .join(";")
    }

    /// Entries keyed the way a React `style` object expects
    pub fn to_react(&self) -> Vec<(String, String)> {
        self.iter().map(|(p, v)| (camel_case(p), v.to_string())).collect()
    }
}

/// `16` → `16px`, `1.5` → `1.5px`
pub fn px(value: impl Into<f64>) -> String {
    format!("{}px", value.into())
}

/// Resolve a padding/margin value to one CSS value.
///
/// Per-side objects always print all four sides; missing sides are `0`.
pub fn spacing_css(spacing: &Spacing) -> String {
    match spacing {
        Spacing::Pixels(n) => px(*n),
        Spacing::Css(css) => css.trim().to_string(),
        Spacing::Sides(SpacingSides {
            top,
            right,
            bottom,
            left,
        }) => [top, right, bottom, left]
            .iter()
            .map(|side| px(side.unwrap_or(0.0)))
            .collect::<Vec<_>>()
            .join(" "),
    }
}

/// Resolve a color against the theme palette.
///
/// `palette.primary` and a bare `primary` both name a palette entry; anything
/// else (or an unknown key) is used as a literal CSS color.
pub fn resolve_color(color: &str, theme: Option<&Theme>) -> String {
    let key = color.strip_prefix("palette.").unwrap_or(color);
    theme
        .and_then(|theme| theme.palette.get(key))
        .cloned()
        .unwrap_or_else(|| color.to_string())
}

/// daisyUI utility classes for a node kind (`section`, `button`, ...)
pub fn daisyui_class(kind: &str) -> Option<&'static str> {
    match kind {
        "section" => Some("card bg-base-100"),
        "button" => Some("btn btn-primary"),
        "divider" => Some("divider"),
        "image" => Some("rounded-box"),
        "heading" => Some("card-title"),
        _ => None,
    }
}

/// Join a node's own class name with its daisyUI class
pub fn class_list(own: Option<&str>, kind: &str, daisyui: bool) -> Option<String> {
    let daisy = daisyui.then(|| daisyui_class(kind)).flatten();
    match (own, daisy) {
        (Some(own), Some(daisy)) => Some(format!("{} {}", daisy, own)),
        (Some(own), None) => Some(own.to_string()),
        (None, Some(daisy)) => Some(daisy.to_string()),
        (None, None) => None,
    }
}

fn container_box(
    styles: &mut Styles,
    background: Option<&String>,
    padding: Option<&Spacing>,
    margin: Option<&Spacing>,
    align: Option<Align>,
    theme: Option<&Theme>,
) {
    styles.set_opt("background-color", background.map(|c| resolve_color(c, theme)));
    styles.set_opt("padding", padding.map(spacing_css));
    styles.set_opt("margin", margin.map(spacing_css));
    styles.set_opt("text-align", align.map(|a| a.as_str()));
}

pub fn section_styles(section: &Section, theme: Option<&Theme>) -> Styles {
    let mut styles = Styles::new();
    container_box(
        &mut styles,
        section.background_color.as_ref(),
        section.padding.as_ref(),
        section.margin.as_ref(),
        section.align,
        theme,
    );
    styles
}

pub fn row_styles(row: &Row, theme: Option<&Theme>) -> Styles {
    let mut styles = Styles::new();
    container_box(
        &mut styles,
        row.background_color.as_ref(),
        row.padding.as_ref(),
        row.margin.as_ref(),
        row.align,
        theme,
    );
    styles
}

/// `gutter` is the owning row's gutter; it spaces every column after the first
pub fn column_styles(column: &Column, index: usize, gutter: Option<u32>, theme: Option<&Theme>) -> Styles {
    let mut styles = Styles::new();
    container_box(
        &mut styles,
        column.background_color.as_ref(),
        column.padding.as_ref(),
        None,
        column.align,
        theme,
    );
    styles.set_opt("width", column.width.as_ref());
    styles.set_opt("vertical-align", column.vertical_align.map(|v| v.as_str()));
    if let Some(gutter) = gutter.filter(|g| *g > 0 && index > 0) {
        styles.set("padding-left", px(gutter));
    }
    styles
}

fn typography(
    styles: &mut Styles,
    font_size: Option<u32>,
    color: Option<&String>,
    line_height: Option<f64>,
    font_weight: Option<String>,
    theme: Option<&Theme>,
) {
    styles.set_opt("font-size", font_size.map(px));
    styles.set_opt("color", color.map(|c| resolve_color(c, theme)));
    styles.set_opt("line-height", line_height.map(|h| h.to_string()));
    styles.set_opt("font-weight", font_weight);
}

fn text_styles(props: &TextProps, theme: Option<&Theme>) -> Styles {
    let mut styles = Styles::new();
    styles.set("margin", "0");
    typography(
        &mut styles,
        props.font_size,
        props.color.as_ref(),
        props.line_height,
        props.font_weight.as_ref().map(|w| w.to_string()),
        theme,
    );
    styles.set_opt("text-align", props.align.map(|a| a.as_str()));
    styles.set_opt("padding", props.padding.as_ref().map(spacing_css));
    styles
}

fn heading_styles(props: &HeadingProps, theme: Option<&Theme>) -> Styles {
    let mut styles = Styles::new();
    styles.set("margin", "0");
    typography(
        &mut styles,
        props.font_size,
        props.color.as_ref(),
        props.line_height,
        props.font_weight.as_ref().map(|w| w.to_string()),
        theme,
    );
    styles.set_opt("text-align", props.align.map(|a| a.as_str()));
    styles.set_opt("padding", props.padding.as_ref().map(spacing_css));
    styles
}

fn button_styles(props: &ButtonProps, theme: Option<&Theme>) -> Styles {
    let mut styles = Styles::new();
    styles.set("display", "inline-block");
    styles.set("text-decoration", "none");
    styles.set("text-align", "center");
    styles.set_opt(
        "background-color",
        props.background_color.as_ref().map(|c| resolve_color(c, theme)),
    );
    typography(
        &mut styles,
        props.font_size,
        props.color.as_ref(),
        None,
        props.font_weight.as_ref().map(|w| w.to_string()),
        theme,
    );
    styles.set_opt("border-radius", props.border_radius.map(px));
    styles.set(
        "padding",
        props
            .padding
            .as_ref()
            .map(spacing_css)
            .unwrap_or_else(|| "12px 24px".to_string()),
    );
    if props.full_width {
        styles.set("width", "100%");
        styles.set("box-sizing", "border-box");
    }
    styles
}

fn divider_styles(props: &DividerProps, theme: Option<&Theme>) -> Styles {
    let color = props
        .color
        .as_ref()
        .map(|c| resolve_color(c, theme))
        .unwrap_or_else(|| "#e5e7eb".to_string());
    let mut styles = Styles::new();
    styles.set("border", "none");
    styles.set(
        "border-top",
        format!("{} {} {}", px(props.thickness.unwrap_or(1)), props.style.as_str(), color),
    );
    styles.set_opt("width", props.width.as_ref());
    styles.set(
        "margin",
        props
            .margin
            .as_ref()
            .map(spacing_css)
            .unwrap_or_else(|| "16px 0".to_string()),
    );
    styles
}

fn image_styles(props: &ImageProps) -> Styles {
    let mut styles = Styles::new();
    styles.set("display", "block");
    styles.set("max-width", "100%");
    styles.set("border", "none");
    styles.set("outline", "none");
    styles.set_opt("border-radius", props.border_radius.map(px));
    if props.align == Some(Align::Center) {
        styles.set("margin", "0 auto");
    } else if props.align == Some(Align::Right) {
        styles.set("margin-left", "auto");
    }
    styles
}

/// Declarations for a block's own element
pub fn block_styles(block: &ContentBlock, theme: Option<&Theme>) -> Styles {
    match block {
        ContentBlock::Text(BlockNode { props, .. }) => text_styles(props, theme),
        ContentBlock::Heading(BlockNode { props, .. }) => heading_styles(props, theme),
        ContentBlock::Button(BlockNode { props, .. }) => button_styles(props, theme),
        ContentBlock::Divider(BlockNode { props, .. }) => divider_styles(props, theme),
        ContentBlock::Image(BlockNode { props, .. }) => image_styles(props),
        ContentBlock::Custom(_) => Styles::new(),
    }
}

/// Horizontal alignment of the wrapper around buttons and images
pub fn block_alignment(block: &ContentBlock) -> Option<Align> {
    match block {
        ContentBlock::Button(node) => node.props.align,
        ContentBlock::Image(node) => node.props.align,
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailforge_schema::BorderStyle;

    fn theme() -> Theme {
        let mut theme = Theme::default();
        theme.palette.insert("primary".to_string(), "#4f46e5".to_string());
        theme
    }

    #[test]
    fn test_spacing_css() {
        assert_eq!(spacing_css(&Spacing::Pixels(8.0)), "8px");
        assert_eq!(spacing_css(&Spacing::Css(" 4px 8px ".to_string())), "4px 8px");
        assert_eq!(
            spacing_css(&Spacing::Sides(SpacingSides {
                top: Some(8.0),
                right: Some(16.0),
                bottom: None,
                left: Some(2.5),
            })),
            "8px 16px 0px 2.5px"
        );
    }

    #[test]
    fn test_resolve_color() {
        let theme = theme();
        assert_eq!(resolve_color("palette.primary", Some(&theme)), "#4f46e5");
        assert_eq!(resolve_color("primary", Some(&theme)), "#4f46e5");
        assert_eq!(resolve_color("palette.missing", Some(&theme)), "palette.missing");
        assert_eq!(resolve_color("#fff", None), "#fff");
        assert_eq!(resolve_color("primary", None), "primary");
    }

    #[test]
    fn test_styles_set_replaces_in_place() {
        let mut styles = Styles::new();
        styles.set("color", "red");
        styles.set("margin", "0");
        styles.set("color", "blue");

        assert_eq!(styles.to_css(), "color:blue;margin:0");
        assert_eq!(
            styles.to_react(),
            vec![("color".to_string(), "blue".to_string()), ("margin".to_string(), "0".to_string())]
        );
    }

    #[test]
    fn test_button_styles_resolve_palette() {
        let mut block = ContentBlock::button("b1", "Go", "https://example.com");
        if let ContentBlock::Button(node) = &mut block {
            node.props.background_color = Some("palette.primary".to_string());
            node.props.border_radius = Some(6);
            node.props.full_width = true;
        }
        let styles = block_styles(&block, Some(&theme()));

        assert_eq!(styles.get("background-color"), Some("#4f46e5"));
        assert_eq!(styles.get("border-radius"), Some("6px"));
        assert_eq!(styles.get("padding"), Some("12px 24px"));
        assert_eq!(styles.get("width"), Some("100%"));
    }

    #[test]
    fn test_divider_border() {
        let mut block = ContentBlock::divider("d1");
        if let ContentBlock::Divider(node) = &mut block {
            node.props.thickness = Some(2);
            node.props.style = BorderStyle::Dashed;
            node.props.color = Some("primary".to_string());
        }
        let styles = block_styles(&block, Some(&theme()));
        assert_eq!(styles.get("border-top"), Some("2px dashed #4f46e5"));
    }

    #[test]
    fn test_column_gutter_skips_first_column() {
        let column = Column::new("c1");
        assert_eq!(column_styles(&column, 0, Some(12), None).get("padding-left"), None);
        assert_eq!(column_styles(&column, 1, Some(12), None).get("padding-left"), Some("12px"));
    }

    #[test]
    fn test_class_list() {
        assert_eq!(class_list(Some("hero"), "section", true).as_deref(), Some("card bg-base-100 hero"));
        assert_eq!(class_list(None, "button", false), None);
        assert_eq!(class_list(None, "text", true), None);
    }
}
