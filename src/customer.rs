//! Per-tenant re-skinning of a fixed diagram topology.
//!
//! A [`CustomerConfig`] carries three mapping lists keyed by container id. Containers whose id
//! carries one of the recognized prefixes are relabeled and get customer icons when mapped,
//! and are hidden when the customer has no mapping for them.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::i18n::TextProvider;
use crate::icons::{IconCategory, IconRef};
use crate::ir::{Container, Diagram, ElementState};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerMapping {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub icon_key: String,
    #[serde(default)]
    pub custom_icon_path: Option<String>,
    #[serde(default)]
    pub custom_brand_logo_path: Option<String>,
    #[serde(default)]
    pub brand_logo_key: Option<String>,
}

impl CustomerMapping {
    pub fn new(id: &str, label: &str, icon_key: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            icon_key: icon_key.to_string(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerConfig {
    pub customer_key: String,
    pub customer_name: String,
    #[serde(default)]
    pub sf_devices: Vec<CustomerMapping>,
    #[serde(default)]
    pub sf_systems: Vec<CustomerMapping>,
    #[serde(default)]
    pub bp_processes: Vec<CustomerMapping>,
}

/// Container family recognized by its id prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappedGroup {
    Device,
    System,
    Process,
}

impl MappedGroup {
    pub const ALL: [MappedGroup; 3] = [Self::Device, Self::System, Self::Process];

    pub fn prefix(self) -> &'static str {
        match self {
            Self::Device => "sf-device-",
            Self::System => "sf-system-",
            Self::Process => "bp-",
        }
    }

    pub fn of(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|group| id.starts_with(group.prefix()))
    }

    /// Generic icon family for the primary logo. Processes share the system assets.
    fn icon_category(self) -> IconCategory {
        match self {
            Self::Device => IconCategory::Device,
            Self::System | Self::Process => IconCategory::System,
        }
    }
}

impl CustomerConfig {
    pub fn mappings(&self, group: MappedGroup) -> &[CustomerMapping] {
        match group {
            MappedGroup::Device => &self.sf_devices,
            MappedGroup::System => &self.sf_systems,
            MappedGroup::Process => &self.bp_processes,
        }
    }

    pub fn mapping_for(&self, container_id: &str) -> Option<&CustomerMapping> {
        let group = MappedGroup::of(container_id)?;
        self.mappings(group).iter().find(|m| m.id == container_id)
    }
}

/// Primary icon precedence: custom path, then a key that already names a concrete generic
/// asset, then the legacy prefixed key.
pub fn resolve_primary_icon(mapping: &CustomerMapping, group: MappedGroup) -> IconRef {
    if let Some(path) = mapping.custom_icon_path.as_deref().filter(|p| !p.is_empty()) {
        return IconRef::Custom(path.to_string());
    }
    let category = group.icon_category();
    match category.semantic_suffix() {
        Some(suffix) if mapping.icon_key.ends_with(suffix) => {
            IconRef::Semantic(mapping.icon_key.clone())
        }
        _ => IconRef::generic(category, &mapping.icon_key),
    }
}

pub fn resolve_brand_icon(mapping: &CustomerMapping) -> Option<IconRef> {
    if let Some(path) = mapping.custom_brand_logo_path.as_deref().filter(|p| !p.is_empty()) {
        return Some(IconRef::Custom(path.to_string()));
    }
    mapping
        .brand_logo_key
        .as_deref()
        .filter(|key| !key.is_empty())
        .map(|key| IconRef::generic(IconCategory::Brand, key))
}

/// Returns a copy of `diagram` with the customer's labels, icons and visibility applied.
///
/// Applying the same config to its own output changes nothing.
pub fn apply_customer_config(diagram: &Diagram, config: &CustomerConfig) -> Diagram {
    let mut out = diagram.clone();
    let mut mapped = 0usize;
    let mut hidden = 0usize;
    for container in &mut out.containers {
        let Some(group) = MappedGroup::of(&container.id) else {
            continue;
        };
        match config.mapping_for(&container.id) {
            Some(mapping) => {
                apply_mapping(container, mapping, group);
                mapped += 1;
            }
            None => {
                container.state = ElementState::Hidden;
                hidden += 1;
            }
        }
    }
    debug!(
        customer = config.customer_key.as_str(),
        mapped = mapped,
        hidden = hidden;
        "Applied customer mapping"
    );
    out
}

fn apply_mapping(container: &mut Container, mapping: &CustomerMapping, group: MappedGroup) {
    container.label = Some(mapping.label.clone());
    container.logo_icon_key = Some(resolve_primary_icon(mapping, group));
    if group == MappedGroup::Process {
        container.secondary_logo_icon_key = resolve_brand_icon(mapping);
    }
    if container.state == ElementState::Hidden {
        container.state = ElementState::Normal;
    }
}

/// Fills labels that are still unset with default text (`container.<id>`).
///
/// Runs after the customer overlay and never overrides a customer label or unhides a container.
pub fn fill_default_labels(diagram: &mut Diagram, texts: &dyn TextProvider, locale: &str) {
    for container in &mut diagram.containers {
        if container.label.is_some() {
            continue;
        }
        let key = format!("container.{}", container.id);
        let text = texts.text(&key, locale);
        if text != key {
            container.label = Some(text);
        }
    }
}
