use crate::config::{LayoutConfig, RenderConfig};
use crate::ir::ContainerKind;
use crate::snapshot::{ContainerSnapshot, Snapshot};
use crate::theme::Theme;
use crate::tour::{Panel, PresentationClass, StepView};
use anyhow::Result;
use std::path::Path;

const PANEL_HEIGHT: f32 = 56.0;
const TITLE_FONT_SIZE: f32 = 18.0;
const DESCRIPTION_FONT_SIZE: f32 = 13.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptionSlot {
    Title,
    Description,
}

/// Anything that can show a tour step: an SVG document, a DOM, a test recorder.
pub trait RenderSurface {
    fn set_class(&mut self, id: &str, class: PresentationClass);
    fn set_description(&mut self, slot: DescriptionSlot, text: &str);
}

/// Pushes every class and both panel texts of `view` into `surface`.
pub fn apply_view(surface: &mut dyn RenderSurface, view: &StepView) {
    for (id, class) in view.classes() {
        surface.set_class(id, class);
    }
    let (title, description) = match &view.panel {
        Panel::Overview { title, subtitle } => (title, subtitle),
        Panel::Step { title, description } => (title, description),
    };
    surface.set_description(DescriptionSlot::Title, title);
    surface.set_description(DescriptionSlot::Description, description);
}

/// Surface that owns a [`Snapshot`] and serializes it to SVG on demand.
#[derive(Debug, Clone)]
pub struct SvgSurface<'a> {
    snapshot: Snapshot,
    theme: &'a Theme,
    layout: &'a LayoutConfig,
    render: &'a RenderConfig,
}

impl<'a> SvgSurface<'a> {
    pub fn new(
        snapshot: Snapshot,
        theme: &'a Theme,
        layout: &'a LayoutConfig,
        render: &'a RenderConfig,
    ) -> Self {
        Self {
            snapshot,
            theme,
            layout,
            render,
        }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn to_svg(&self) -> String {
        render_svg_with(&self.snapshot, self.theme, self.layout, self.render)
    }
}

impl RenderSurface for SvgSurface<'_> {
    fn set_class(&mut self, id: &str, class: PresentationClass) {
        let pick = |removed: bool| if removed { PresentationClass::Hidden } else { class };
        if let Some(container) = self.snapshot.containers.iter_mut().find(|c| c.id == id) {
            container.class = pick(container.removed);
        } else if let Some(connection) = self.snapshot.connections.iter_mut().find(|c| c.id == id) {
            connection.class = pick(connection.removed);
        } else if let Some(icon) = self.snapshot.function_icons.iter_mut().find(|c| c.id == id) {
            icon.class = pick(icon.removed);
        }
    }

    fn set_description(&mut self, slot: DescriptionSlot, text: &str) {
        let target = match (&mut self.snapshot.panel, slot) {
            (Panel::Overview { title, .. }, DescriptionSlot::Title) => title,
            (Panel::Overview { subtitle, .. }, DescriptionSlot::Description) => subtitle,
            (Panel::Step { title, .. }, DescriptionSlot::Title) => title,
            (Panel::Step { description, .. }, DescriptionSlot::Description) => description,
        };
        *target = text.to_string();
    }
}

pub fn render_svg(snapshot: &Snapshot, theme: &Theme, config: &LayoutConfig) -> String {
    render_svg_with(snapshot, theme, config, &RenderConfig::default())
}

pub fn render_svg_with(
    snapshot: &Snapshot,
    theme: &Theme,
    config: &LayoutConfig,
    render: &RenderConfig,
) -> String {
    let zoom = snapshot.zoom as f32;
    let offset_x = render.padding;
    let offset_y = render.padding + PANEL_HEIGHT;
    let width = (snapshot.width * zoom + render.padding * 2.0).max(render.width);
    let height = (snapshot.height * zoom + offset_y + render.padding).max(render.height);

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" width=\"{width:.2}\" height=\"{height:.2}\" viewBox=\"0 0 {width:.2} {height:.2}\">",
    ));
    svg.push_str(&style_block(theme));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        render.background
    ));

    svg.push_str("<defs>");
    svg.push_str(&format!(
        "<marker id=\"arrow\" viewBox=\"0 0 10 10\" refX=\"10\" refY=\"5\" markerWidth=\"6\" markerHeight=\"6\" orient=\"auto-start-reverse\"><path d=\"M 0 0 L 10 5 L 0 10 z\" fill=\"{}\"/></marker>",
        theme.line_color
    ));
    svg.push_str("</defs>");

    svg.push_str(&panel_svg(&snapshot.panel, theme, render.padding));

    svg.push_str(&format!(
        "<g id=\"diagram\" transform=\"translate({offset_x:.2} {offset_y:.2}) scale({zoom:.2})\">"
    ));

    for container in snapshot.containers.iter().filter(|c| is_group(c.kind)) {
        svg.push_str(&container_svg(container, theme, config, render));
    }

    for connection in &snapshot.connections {
        svg.push_str(&format!(
            "<path id=\"{}\"{} d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1.4\" marker-end=\"url(#arrow)\"/>",
            escape_xml(&connection.id),
            class_attr(connection.class),
            points_to_path(&connection.points),
            theme.line_color
        ));
    }

    for container in snapshot.containers.iter().filter(|c| !is_group(c.kind)) {
        svg.push_str(&container_svg(container, theme, config, render));
    }

    let icon_size = render.icon_size * 0.75;
    for icon in &snapshot.function_icons {
        let (Some(owner), Some(href)) = (snapshot.container(&icon.container_id), icon.icon.as_ref())
        else {
            continue;
        };
        let x = owner.x + owner.width - (icon.slot as f32 + 1.0) * (icon_size + 4.0);
        let y = owner.y - icon_size / 2.0;
        svg.push_str(&format!(
            "<image id=\"{}\"{} x=\"{x:.2}\" y=\"{y:.2}\" width=\"{icon_size:.2}\" height=\"{icon_size:.2}\" xlink:href=\"{}\"/>",
            escape_xml(&icon.id),
            class_attr(icon.class),
            escape_xml(href)
        ));
    }

    svg.push_str("</g>");
    svg.push_str("</svg>");
    svg
}

fn style_block(theme: &Theme) -> String {
    format!(
        "<style>.highlight>rect{{stroke:{hc};fill:{hf};stroke-width:2.5}}path.highlight{{stroke:{hc};stroke-width:2.5}}.dim{{opacity:{dim}}}.dim-conn{{opacity:{dim_conn}}}.hidden{{display:none}}</style>",
        hc = theme.highlight_color,
        hf = theme.highlight_fill,
        dim = theme.dim_opacity,
        dim_conn = theme.dim_connection_opacity
    )
}

fn panel_svg(panel: &Panel, theme: &Theme, padding: f32) -> String {
    let (title, description) = match panel {
        Panel::Overview { title, subtitle } => (title, subtitle),
        Panel::Step { title, description } => (title, description),
    };
    let title_y = padding + TITLE_FONT_SIZE;
    let description_y = title_y + DESCRIPTION_FONT_SIZE + 10.0;
    format!(
        "<g id=\"panel\"><text id=\"step-title\" x=\"{padding:.2}\" y=\"{title_y:.2}\" font-family=\"{font}\" font-size=\"{TITLE_FONT_SIZE}\" font-weight=\"600\" fill=\"{}\">{}</text><text id=\"step-description\" x=\"{padding:.2}\" y=\"{description_y:.2}\" font-family=\"{font}\" font-size=\"{DESCRIPTION_FONT_SIZE}\" fill=\"{}\">{}</text></g>",
        theme.panel_title_color,
        escape_xml(title),
        theme.panel_text_color,
        escape_xml(description),
        font = theme.font_family,
    )
}

fn container_svg(
    container: &ContainerSnapshot,
    theme: &Theme,
    config: &LayoutConfig,
    render: &RenderConfig,
) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "<g id=\"{}\"{}",
        escape_xml(&container.id),
        class_attr(container.class)
    ));
    if let Some(url) = &container.url {
        out.push_str(&format!(" data-url=\"{}\"", escape_xml(url)));
    }
    out.push('>');

    if is_group(container.kind) {
        out.push_str(&format!(
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"10\" ry=\"10\" fill=\"{}\" stroke=\"{}\" stroke-dasharray=\"6 4\" stroke-width=\"1.2\"/>",
            container.x,
            container.y,
            container.width,
            container.height,
            theme.group_fill,
            theme.group_border
        ));
    } else if container.kind != ContainerKind::Label {
        out.push_str(&format!(
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"6\" ry=\"6\" fill=\"{}\" stroke=\"{}\" stroke-width=\"1.4\"/>",
            container.x,
            container.y,
            container.width,
            container.height,
            theme.box_fill,
            theme.box_border
        ));
    }

    let icon_size = render.icon_size.min(container.width).min(container.height);
    if let Some(href) = &container.icon {
        let x = container.x + (container.width - icon_size) / 2.0;
        let y = container.y + (container.height - icon_size) / 2.0;
        out.push_str(&format!(
            "<image x=\"{x:.2}\" y=\"{y:.2}\" width=\"{icon_size:.2}\" height=\"{icon_size:.2}\" xlink:href=\"{}\"/>",
            escape_xml(href)
        ));
    }
    if let Some(href) = &container.secondary_icon {
        let small = icon_size / 2.0;
        let x = container.x + container.width - small - 4.0;
        let y = container.y + 4.0;
        out.push_str(&format!(
            "<image x=\"{x:.2}\" y=\"{y:.2}\" width=\"{small:.2}\" height=\"{small:.2}\" xlink:href=\"{}\"/>",
            escape_xml(href)
        ));
    }

    out.push_str(&label_svg(container, theme, config));
    out.push_str("</g>");
    out
}

fn label_svg(container: &ContainerSnapshot, theme: &Theme, config: &LayoutConfig) -> String {
    if container.label_lines.is_empty() {
        return String::new();
    }
    let [x, top] = container.label_anchor;
    let font_size = container.font_size;
    let line_height = font_size * config.label_line_height;
    let mut text = format!(
        "<text x=\"{x:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{font_size}\" fill=\"{}\">",
        top + font_size,
        theme.font_family,
        theme.text_color
    );
    for (idx, line) in container.label_lines.iter().enumerate() {
        let dy = if idx == 0 { 0.0 } else { line_height };
        text.push_str(&format!(
            "<tspan x=\"{x:.2}\" dy=\"{dy:.2}\">{}</tspan>",
            escape_xml(line)
        ));
    }
    text.push_str("</text>");
    text
}

fn is_group(kind: ContainerKind) -> bool {
    matches!(kind, ContainerKind::Group | ContainerKind::Zone)
}

fn class_attr(class: PresentationClass) -> String {
    class
        .css_class()
        .map(|name| format!(" class=\"{name}\""))
        .unwrap_or_default()
}

fn points_to_path(points: &[[f32; 2]]) -> String {
    let Some((first, rest)) = points.split_first() else {
        return String::new();
    };
    let mut d = format!("M {:.2} {:.2}", first[0], first[1]);
    for point in rest {
        d.push_str(&format!(" L {:.2} {:.2}", point[0], point[1]));
    }
    d
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig, theme: &Theme) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = theme
        .font_family
        .split(',')
        .next()
        .map(|family| family.trim().trim_matches('"').to_string())
        .unwrap_or_else(|| "sans-serif".to_string());
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .or_else(|| usvg::Size::from_wh(800.0, 600.0))
        .ok_or_else(|| anyhow::anyhow!("Invalid render size"))?;
    opt.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

#[cfg(not(feature = "png"))]
pub fn write_output_png(_svg: &str, _output: &Path, _render_cfg: &RenderConfig, _theme: &Theme) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
