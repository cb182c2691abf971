use serde::Serialize;

use crate::ir::{ContainerKind, LabelPosition};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextBlock {
    pub lines: Vec<String>,
    pub width: f32,
    pub height: f32,
}

impl TextBlock {
    pub fn empty() -> Self {
        Self {
            lines: Vec::new(),
            width: 0.0,
            height: 0.0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PathKind {
    /// Four-point L-shaped route between edge anchors.
    Orthogonal,
    /// Straight center line clipped to both boxes.
    Internal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionPath {
    pub kind: PathKind,
    pub points: Vec<(f32, f32)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContainerLayout {
    pub id: String,
    pub kind: ContainerKind,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub font_size: f32,
    pub label: TextBlock,
    pub label_position: LabelPosition,
    /// Top-center point of the first label line.
    pub label_anchor: (f32, f32),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionLayout {
    pub id: String,
    pub from: String,
    pub to: String,
    pub path: ConnectionPath,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub containers: Vec<ContainerLayout>,
    /// Only connections whose endpoints both exist.
    pub connections: Vec<ConnectionLayout>,
    pub width: f32,
    pub height: f32,
}

impl Layout {
    pub fn container(&self, id: &str) -> Option<&ContainerLayout> {
        self.containers.iter().find(|c| c.id == id)
    }

    pub fn connection(&self, id: &str) -> Option<&ConnectionLayout> {
        self.connections.iter().find(|c| c.id == id)
    }
}
