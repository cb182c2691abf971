use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::icons::IconRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContainerKind {
    Device,
    System,
    Process,
    Label,
    Pipeline,
    Group,
    Zone,
    #[serde(other)]
    Other,
}

/// Visibility state of a diagram element after overlay and step application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ElementState {
    #[default]
    Normal,
    Highlight,
    Hidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LabelPosition {
    #[default]
    BottomCenter,
    TopCenter,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Side {
    Top,
    #[default]
    Bottom,
    Left,
    Right,
    /// Any unrecognized side hint anchors at the box center.
    #[serde(other)]
    Center,
}

impl Side {
    pub fn from_token(token: &str) -> Self {
        match token.trim().to_ascii_lowercase().as_str() {
            "top" => Self::Top,
            "bottom" => Self::Bottom,
            "left" => Self::Left,
            "right" => Self::Right,
            _ => Self::Center,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Routing {
    /// Internal routing when both ends share a cluster prefix, orthogonal otherwise.
    #[default]
    Auto,
    Orthogonal,
    Internal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(rename = "type", default = "default_kind")]
    pub kind: ContainerKind,
    #[serde(default)]
    pub state: ElementState,
    #[serde(default)]
    pub font_size: Option<f32>,
    #[serde(default)]
    pub label_position: LabelPosition,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub logo_icon_key: Option<IconRef>,
    #[serde(default)]
    pub secondary_logo_icon_key: Option<IconRef>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub parent: Option<String>,
}

fn default_kind() -> ContainerKind {
    ContainerKind::Other
}

impl Container {
    pub fn new(id: &str, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            id: id.to_string(),
            x,
            y,
            width,
            height,
            kind: ContainerKind::Other,
            state: ElementState::Normal,
            font_size: None,
            label_position: LabelPosition::BottomCenter,
            label: None,
            logo_icon_key: None,
            secondary_logo_icon_key: None,
            url: None,
            parent: None,
        }
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn is_hidden(&self) -> bool {
        self.state == ElementState::Hidden
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub id: String,
    pub from_id: String,
    pub to_id: String,
    #[serde(default)]
    pub from_side: Side,
    #[serde(default = "default_to_side")]
    pub to_side: Side,
    #[serde(default)]
    pub routing: Routing,
    #[serde(default)]
    pub state: ElementState,
}

fn default_to_side() -> Side {
    Side::Top
}

impl Connection {
    pub fn new(id: &str, from_id: &str, to_id: &str, from_side: Side, to_side: Side) -> Self {
        Self {
            id: id.to_string(),
            from_id: from_id.to_string(),
            to_id: to_id.to_string(),
            from_side,
            to_side,
            routing: Routing::Auto,
            state: ElementState::Normal,
        }
    }
}

/// Text keyed by locale, e.g. `{"de": "Übersicht", "en": "Overview"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizedText(pub BTreeMap<String, String>);

impl LocalizedText {
    pub fn single(locale: &str, text: &str) -> Self {
        let mut map = BTreeMap::new();
        map.insert(locale.to_string(), text.to_string());
        Self(map)
    }

    /// Requested locale, then the default locale, then `key` itself.
    pub fn resolve<'a>(&'a self, locale: &str, default_locale: &str, key: &'a str) -> &'a str {
        self.0
            .get(locale)
            .or_else(|| self.0.get(default_locale))
            .map(String::as_str)
            .unwrap_or(key)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub id: String,
    #[serde(default)]
    pub visible_container_ids: BTreeSet<String>,
    #[serde(default)]
    pub highlighted_container_ids: BTreeSet<String>,
    #[serde(default)]
    pub visible_connection_ids: BTreeSet<String>,
    #[serde(default)]
    pub highlighted_connection_ids: BTreeSet<String>,
    #[serde(default)]
    pub highlighted_function_icons: BTreeSet<String>,
    #[serde(default)]
    pub show_function_icons: bool,
    /// Explicit hide list used by auto-dim tours.
    #[serde(default)]
    pub hide_ids: BTreeSet<String>,
    #[serde(default)]
    pub title: Option<LocalizedText>,
    #[serde(default)]
    pub description: Option<LocalizedText>,
}

impl Step {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionIcon {
    pub id: String,
    pub container_id: String,
    pub icon_key: IconRef,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagram {
    #[serde(default)]
    pub title: Option<LocalizedText>,
    #[serde(default)]
    pub subtitle: Option<LocalizedText>,
    pub containers: Vec<Container>,
    #[serde(default)]
    pub connections: Vec<Connection>,
    #[serde(default)]
    pub steps: Vec<Step>,
    #[serde(default)]
    pub function_icons: Vec<FunctionIcon>,
}

impl Diagram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn container(&self, id: &str) -> Option<&Container> {
        self.containers.iter().find(|c| c.id == id)
    }

    pub fn container_mut(&mut self, id: &str) -> Option<&mut Container> {
        self.containers.iter_mut().find(|c| c.id == id)
    }

    pub fn connection(&self, id: &str) -> Option<&Connection> {
        self.connections.iter().find(|c| c.id == id)
    }

    /// Ids listed as highlighted but not visible in a step. These resolve to hidden at
    /// runtime; the list exists so authoring tools can flag them.
    pub fn authoring_warnings(&self) -> Vec<(String, String)> {
        let mut warnings = Vec::new();
        for step in &self.steps {
            for id in step
                .highlighted_container_ids
                .difference(&step.visible_container_ids)
                .chain(
                    step.highlighted_connection_ids
                        .difference(&step.visible_connection_ids),
                )
            {
                warnings.push((step.id.clone(), id.clone()));
            }
        }
        warnings
    }
}
