mod routing;
mod text;
mod types;

pub use routing::{anchor, clip_to_edge, internal_path, is_internal, orthogonal_path, route};
pub use text::{max_chars_per_line, measure_wrapped, strip_break_hints, wrap_label};
pub use types::*;

use crate::config::LayoutConfig;
use crate::ir::{Container, Diagram, LabelPosition};

/// Wraps every label and routes every connection of a diagram.
///
/// Pure function of the diagram: positions are authored, so nothing here moves a box.
pub fn compute_layout(diagram: &Diagram, config: &LayoutConfig) -> Layout {
    let containers: Vec<ContainerLayout> = diagram
        .containers
        .iter()
        .map(|container| layout_container(container, config))
        .collect();

    let connections = diagram
        .connections
        .iter()
        .filter_map(|connection| {
            route(connection, &diagram.containers, config).map(|path| ConnectionLayout {
                id: connection.id.clone(),
                from: connection.from_id.clone(),
                to: connection.to_id.clone(),
                path,
            })
        })
        .collect();

    let (width, height) = diagram_extent(&containers);
    Layout {
        containers,
        connections,
        width,
        height,
    }
}

fn layout_container(container: &Container, config: &LayoutConfig) -> ContainerLayout {
    let font_size = container
        .font_size
        .filter(|size| *size > 0.0)
        .unwrap_or(config.default_font_size);
    let label = match container.label.as_deref() {
        Some(text) => {
            let lines = wrap_label(text, container.width, font_size, config);
            measure_wrapped(lines, font_size, config)
        }
        None => TextBlock::empty(),
    };
    let label_anchor = label_anchor(container, &label, config);
    ContainerLayout {
        id: container.id.clone(),
        kind: container.kind,
        x: container.x,
        y: container.y,
        width: container.width,
        height: container.height,
        font_size,
        label,
        label_position: container.label_position,
        label_anchor,
    }
}

fn label_anchor(container: &Container, label: &TextBlock, config: &LayoutConfig) -> (f32, f32) {
    let (cx, cy) = container.center();
    match container.label_position {
        LabelPosition::BottomCenter => (cx, container.y + container.height + config.label_gap),
        LabelPosition::TopCenter => (cx, container.y - config.label_gap - label.height),
        LabelPosition::Center => (cx, cy - label.height / 2.0),
    }
}

fn diagram_extent(containers: &[ContainerLayout]) -> (f32, f32) {
    let mut width: f32 = 0.0;
    let mut height: f32 = 0.0;
    for container in containers {
        width = width.max(container.x + container.width);
        height = height.max(container.y + container.height);
        if !container.label.is_empty() {
            height = height.max(container.label_anchor.1 + container.label.height);
        }
    }
    (width, height)
}
