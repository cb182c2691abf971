//! Reading authored tour data.
//!
//! Every input is JSON5, so plain JSON works and hand-edited files may carry comments and
//! trailing commas. Parsing is strict about shape and duplicate ids and lenient about
//! everything else: unknown ids only surface later as unstyled or hidden elements.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use log::debug;
use serde::Deserialize;

use crate::customer::CustomerConfig;
use crate::error::LoadError;
use crate::i18n::TextCatalog;
use crate::icons::IconRegistry;
use crate::ir::{Diagram, LocalizedText, Step};

pub type Result<T> = std::result::Result<T, LoadError>;

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub fn parse_diagram(input: &str) -> Result<Diagram> {
    let diagram: Diagram =
        json5::from_str(input).map_err(|err| LoadError::syntax("diagram", err))?;
    let mut seen = BTreeSet::new();
    for container in &diagram.containers {
        if !seen.insert(container.id.as_str()) {
            return Err(LoadError::DuplicateContainer(container.id.clone()));
        }
    }
    let mut seen = BTreeSet::new();
    for connection in &diagram.connections {
        if !seen.insert(connection.id.as_str()) {
            return Err(LoadError::DuplicateConnection(connection.id.clone()));
        }
    }
    debug!(
        containers = diagram.containers.len(),
        connections = diagram.connections.len(),
        steps = diagram.steps.len();
        "Parsed diagram"
    );
    Ok(diagram)
}

pub fn load_diagram(path: &Path) -> Result<Diagram> {
    parse_diagram(&read(path)?)
}

/// One entry of a standalone step file.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StepEntry {
    id: String,
    #[serde(default)]
    title: Option<LocalizedText>,
    #[serde(default)]
    description: Option<LocalizedText>,
    #[serde(default)]
    highlight_ids: Vec<String>,
    #[serde(default)]
    hide_ids: Vec<String>,
    #[serde(default)]
    highlight_function_icons: Vec<String>,
    #[serde(default)]
    show_function_icons: bool,
    #[serde(default)]
    dim_ids: Option<Vec<String>>,
    #[serde(default)]
    show_ids: Option<Vec<String>>,
}

/// Parses a step file against `diagram`.
///
/// Step files only name what to highlight and what to hide, so everything else in the diagram
/// is visible. Highlight ids are sorted into the container or connection set by looking them
/// up in the diagram; ids the diagram does not know are kept as container ids.
pub fn parse_steps(input: &str, diagram: &Diagram) -> Result<Vec<Step>> {
    let entries: Vec<StepEntry> =
        json5::from_str(input).map_err(|err| LoadError::syntax("step file", err))?;
    Ok(entries
        .into_iter()
        .map(|entry| step_from_entry(entry, diagram))
        .collect())
}

pub fn load_steps(path: &Path, diagram: &Diagram) -> Result<Vec<Step>> {
    parse_steps(&read(path)?, diagram)
}

fn step_from_entry(entry: StepEntry, diagram: &Diagram) -> Step {
    if entry.dim_ids.is_some() || entry.show_ids.is_some() {
        debug!(step = entry.id.as_str(); "Ignoring legacy dimIds/showIds");
    }
    let hide: BTreeSet<String> = entry.hide_ids.into_iter().collect();
    let mut step = Step::new(&entry.id);
    step.visible_container_ids = diagram
        .containers
        .iter()
        .map(|c| c.id.clone())
        .filter(|id| !hide.contains(id))
        .collect();
    step.visible_connection_ids = diagram
        .connections
        .iter()
        .map(|c| c.id.clone())
        .filter(|id| !hide.contains(id))
        .collect();
    for id in entry.highlight_ids {
        if diagram.connection(&id).is_some() {
            step.highlighted_connection_ids.insert(id);
        } else {
            step.highlighted_container_ids.insert(id);
        }
    }
    step.highlighted_function_icons = entry.highlight_function_icons.into_iter().collect();
    step.show_function_icons = entry.show_function_icons;
    step.hide_ids = hide;
    step.title = entry.title;
    step.description = entry.description;
    step
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CustomerCatalog {
    Many(Vec<CustomerConfig>),
    One(Box<CustomerConfig>),
}

/// Accepts a single customer object or an array of them.
pub fn parse_customers(input: &str) -> Result<Vec<CustomerConfig>> {
    let catalog: CustomerCatalog =
        json5::from_str(input).map_err(|err| LoadError::syntax("customer catalog", err))?;
    Ok(match catalog {
        CustomerCatalog::Many(list) => list,
        CustomerCatalog::One(config) => vec![*config],
    })
}

pub fn load_customers(path: &Path) -> Result<Vec<CustomerConfig>> {
    parse_customers(&read(path)?)
}

/// Picks a customer by key, or the only customer when no key is given.
pub fn select_customer<'a>(
    customers: &'a [CustomerConfig],
    key: Option<&str>,
) -> Result<&'a CustomerConfig> {
    match key {
        Some(key) => customers
            .iter()
            .find(|c| c.customer_key == key)
            .ok_or_else(|| LoadError::UnknownCustomer(key.to_string())),
        None => customers.first().ok_or(LoadError::EmptyCatalog),
    }
}

pub fn parse_text_catalog(input: &str, default_locale: &str) -> Result<TextCatalog> {
    let entries: BTreeMap<String, BTreeMap<String, String>> =
        json5::from_str(input).map_err(|err| LoadError::syntax("text catalog", err))?;
    Ok(TextCatalog::from_entries(default_locale, entries))
}

pub fn load_text_catalog(path: &Path, default_locale: &str) -> Result<TextCatalog> {
    parse_text_catalog(&read(path)?, default_locale)
}

pub fn parse_icon_table(input: &str) -> Result<IconRegistry> {
    let table: BTreeMap<String, String> =
        json5::from_str(input).map_err(|err| LoadError::syntax("icon table", err))?;
    Ok(IconRegistry::from_table(table))
}

pub fn load_icon_table(path: &Path) -> Result<IconRegistry> {
    parse_icon_table(&read(path)?)
}
