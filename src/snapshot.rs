use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use serde::Serialize;

use crate::icons::IconResolver;
use crate::ir::{ContainerKind, Diagram, LabelPosition};
use crate::layout::{Layout, PathKind};
use crate::tour::{Panel, PresentationClass, StepView};

/// Render-ready state for one step: base diagram, customer overlay and step classification
/// folded into plain data a surface can draw without consulting anything else.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub width: f32,
    pub height: f32,
    pub zoom: f64,
    pub step_index: usize,
    pub step_id: Option<String>,
    pub panel: Panel,
    pub containers: Vec<ContainerSnapshot>,
    pub connections: Vec<ConnectionSnapshot>,
    pub function_icons: Vec<FunctionIconSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerSnapshot {
    pub id: String,
    pub kind: ContainerKind,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub font_size: f32,
    pub label_lines: Vec<String>,
    pub label_position: LabelPosition,
    pub label_anchor: [f32; 2],
    pub icon: Option<String>,
    pub secondary_icon: Option<String>,
    pub url: Option<String>,
    pub class: PresentationClass,
    /// Hidden by the customer overlay; no step can show it.
    pub removed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionSnapshot {
    pub id: String,
    pub from: String,
    pub to: String,
    pub kind: PathKind,
    pub points: Vec<[f32; 2]>,
    pub class: PresentationClass,
    pub removed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionIconSnapshot {
    pub id: String,
    pub container_id: String,
    /// Position among the icons attached to the same container.
    pub slot: usize,
    pub icon: Option<String>,
    pub class: PresentationClass,
    pub removed: bool,
}

impl Snapshot {
    /// Containers hidden by the customer overlay stay hidden whatever the step says, and so do
    /// connections and function icons attached to them.
    pub fn build(
        diagram: &Diagram,
        layout: &Layout,
        view: &StepView,
        zoom: f64,
        icons: &dyn IconResolver,
    ) -> Self {
        let overlay_hidden: BTreeSet<&str> = diagram
            .containers
            .iter()
            .filter(|c| c.is_hidden())
            .map(|c| c.id.as_str())
            .collect();

        let containers = diagram
            .containers
            .iter()
            .filter_map(|container| {
                let placed = layout.container(&container.id)?;
                let removed = overlay_hidden.contains(container.id.as_str());
                let class = if removed {
                    PresentationClass::Hidden
                } else {
                    view.class_of(&container.id)
                };
                Some(ContainerSnapshot {
                    id: container.id.clone(),
                    kind: container.kind,
                    x: placed.x,
                    y: placed.y,
                    width: placed.width,
                    height: placed.height,
                    font_size: placed.font_size,
                    label_lines: placed.label.lines.clone(),
                    label_position: placed.label_position,
                    label_anchor: [placed.label_anchor.0, placed.label_anchor.1],
                    icon: container
                        .logo_icon_key
                        .as_ref()
                        .and_then(|icon| icons.resolve(icon)),
                    secondary_icon: container
                        .secondary_logo_icon_key
                        .as_ref()
                        .and_then(|icon| icons.resolve(icon)),
                    url: container.url.clone(),
                    class,
                    removed,
                })
            })
            .collect();

        let connections = layout
            .connections
            .iter()
            .map(|connection| {
                let removed = overlay_hidden.contains(connection.from.as_str())
                    || overlay_hidden.contains(connection.to.as_str());
                let class = if removed {
                    PresentationClass::Hidden
                } else {
                    view.connections
                        .get(&connection.id)
                        .copied()
                        .unwrap_or_default()
                };
                ConnectionSnapshot {
                    id: connection.id.clone(),
                    from: connection.from.clone(),
                    to: connection.to.clone(),
                    kind: connection.path.kind,
                    points: connection.path.points.iter().map(|(x, y)| [*x, *y]).collect(),
                    class,
                    removed,
                }
            })
            .collect();

        let mut function_icons: Vec<FunctionIconSnapshot> = Vec::new();
        for icon in &diagram.function_icons {
            let slot = function_icons
                .iter()
                .filter(|other| other.container_id == icon.container_id)
                .count();
            let removed = overlay_hidden.contains(icon.container_id.as_str());
            let class = if removed {
                PresentationClass::Hidden
            } else {
                view.function_icons.get(&icon.id).copied().unwrap_or_default()
            };
            function_icons.push(FunctionIconSnapshot {
                id: icon.id.clone(),
                container_id: icon.container_id.clone(),
                slot,
                icon: icons.resolve(&icon.icon_key),
                class,
                removed,
            });
        }

        Snapshot {
            width: layout.width,
            height: layout.height,
            zoom,
            step_index: view.index,
            step_id: view.step_id.clone(),
            panel: view.panel.clone(),
            containers,
            connections,
            function_icons,
        }
    }

    pub fn container(&self, id: &str) -> Option<&ContainerSnapshot> {
        self.containers.iter().find(|c| c.id == id)
    }

    pub fn connection(&self, id: &str) -> Option<&ConnectionSnapshot> {
        self.connections.iter().find(|c| c.id == id)
    }
}

pub fn write_snapshot_json(snapshot: &Snapshot, output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            let file = File::create(path)?;
            let writer = BufWriter::new(file);
            serde_json::to_writer_pretty(writer, snapshot)?;
        }
        None => {
            println!("{}", serde_json::to_string_pretty(snapshot)?);
        }
    }
    Ok(())
}
