//! Step-driven guided tour.
//!
//! A [`Tour`] tracks the current step index and turns it into a [`StepView`]: one
//! [`PresentationClass`] per container, connection and function icon plus the text for the
//! description panel. Step 0 is the overview and always renders everything unstyled.

mod autoplay;
mod reveal;
mod zoom;

pub use autoplay::{AutoPlayTask, Tick};
pub use reveal::RevealAccumulator;
pub use zoom::ZoomController;

use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::time::Duration;

use log::debug;
use serde::Serialize;

use crate::config::{TourConfig, ZoomConfig};
use crate::i18n::TextProvider;
use crate::ir::{Diagram, ElementState, LocalizedText, Step};

/// Closed set of presentation classes a rendering surface has to support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PresentationClass {
    #[default]
    None,
    Highlight,
    Dim,
    DimConn,
    Hidden,
}

impl PresentationClass {
    pub fn css_class(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Highlight => Some("highlight"),
            Self::Dim => Some("dim"),
            Self::DimConn => Some("dim-conn"),
            Self::Hidden => Some("hidden"),
        }
    }
}

impl From<ElementState> for PresentationClass {
    fn from(state: ElementState) -> Self {
        match state {
            ElementState::Normal => Self::None,
            ElementState::Highlight => Self::Highlight,
            ElementState::Hidden => Self::Hidden,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HighlightMode {
    /// Elements outside a step's visible sets are hidden.
    #[default]
    Visibility,
    /// Everything stays on screen; elements off the highlight path are dimmed.
    AutoDim,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Panel {
    Overview { title: String, subtitle: String },
    Step { title: String, description: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepView {
    pub index: usize,
    pub step_id: Option<String>,
    pub containers: BTreeMap<String, PresentationClass>,
    pub connections: BTreeMap<String, PresentationClass>,
    pub function_icons: BTreeMap<String, PresentationClass>,
    pub panel: Panel,
}

impl StepView {
    pub fn class_of(&self, id: &str) -> PresentationClass {
        self.containers
            .get(id)
            .or_else(|| self.connections.get(id))
            .or_else(|| self.function_icons.get(id))
            .copied()
            .unwrap_or_default()
    }

    /// Every classified id, containers first.
    pub fn classes(&self) -> impl Iterator<Item = (&str, PresentationClass)> {
        self.containers
            .iter()
            .chain(self.connections.iter())
            .chain(self.function_icons.iter())
            .map(|(id, class)| (id.as_str(), *class))
    }
}

/// Plain visibility rule: membership in `visible` is checked first, so an id that is
/// highlighted but not visible resolves to hidden.
pub fn resolve_visibility(
    id: &str,
    visible: &BTreeSet<String>,
    highlighted: &BTreeSet<String>,
) -> ElementState {
    if !visible.contains(id) {
        ElementState::Hidden
    } else if highlighted.contains(id) {
        ElementState::Highlight
    } else {
        ElementState::Normal
    }
}

/// Whether `id` structurally contains any highlighted id, either through explicit `parent`
/// links or through the dash-separated id namespace (`plant` contains `plant-line-1`).
pub fn contains_highlighted(diagram: &Diagram, id: &str, highlighted: &BTreeSet<String>) -> bool {
    highlighted.iter().any(|candidate| {
        if candidate == id {
            return false;
        }
        let namespaced = candidate
            .strip_prefix(id)
            .is_some_and(|rest| rest.starts_with('-'));
        namespaced || has_parent(diagram, candidate, id)
    })
}

fn has_parent(diagram: &Diagram, child: &str, ancestor: &str) -> bool {
    let mut current = diagram.container(child).and_then(|c| c.parent.as_deref());
    // Bounded walk so a parent cycle in authored data cannot loop forever.
    for _ in 0..diagram.containers.len() {
        match current {
            Some(parent) if parent == ancestor => return true,
            Some(parent) => current = diagram.container(parent).and_then(|c| c.parent.as_deref()),
            None => return false,
        }
    }
    false
}

/// Classifies every container and connection for one non-overview step.
pub fn classify_step(
    diagram: &Diagram,
    step: &Step,
    mode: HighlightMode,
) -> (
    BTreeMap<String, PresentationClass>,
    BTreeMap<String, PresentationClass>,
) {
    let mut containers = BTreeMap::new();
    let mut connections = BTreeMap::new();
    match mode {
        HighlightMode::Visibility => {
            for container in &diagram.containers {
                let state = resolve_visibility(
                    &container.id,
                    &step.visible_container_ids,
                    &step.highlighted_container_ids,
                );
                containers.insert(container.id.clone(), state.into());
            }
            for connection in &diagram.connections {
                let state = resolve_visibility(
                    &connection.id,
                    &step.visible_connection_ids,
                    &step.highlighted_connection_ids,
                );
                connections.insert(connection.id.clone(), state.into());
            }
        }
        HighlightMode::AutoDim => {
            for container in &diagram.containers {
                let id = container.id.as_str();
                let class = if step.hide_ids.contains(id) {
                    PresentationClass::Hidden
                } else if step.highlighted_container_ids.contains(id) {
                    PresentationClass::Highlight
                } else if contains_highlighted(diagram, id, &step.highlighted_container_ids) {
                    PresentationClass::None
                } else {
                    PresentationClass::Dim
                };
                containers.insert(container.id.clone(), class);
            }
            for connection in &diagram.connections {
                let id = connection.id.as_str();
                let class = if step.hide_ids.contains(id) {
                    PresentationClass::Hidden
                } else if step.highlighted_connection_ids.contains(id) {
                    PresentationClass::Highlight
                } else {
                    PresentationClass::DimConn
                };
                connections.insert(connection.id.clone(), class);
            }
        }
    }
    (containers, connections)
}

/// Guided-tour navigation, highlight resolution, zoom and auto-play state.
#[derive(Debug)]
pub struct Tour {
    steps: Vec<Step>,
    index: usize,
    mode: HighlightMode,
    loop_playback: bool,
    period: Duration,
    default_locale: String,
    reveal: RevealAccumulator,
    autoplay: Option<AutoPlayTask>,
    pub zoom: ZoomController,
}

impl Tour {
    pub fn new(steps: Vec<Step>, config: &TourConfig, zoom: ZoomConfig) -> Self {
        let mode = if config.auto_dim {
            HighlightMode::AutoDim
        } else {
            HighlightMode::Visibility
        };
        Self {
            steps,
            index: 0,
            mode,
            loop_playback: config.loop_playback,
            period: Duration::from_millis(config.autoplay_period_ms.max(1)),
            default_locale: config.default_locale.clone(),
            reveal: RevealAccumulator::new(config.reveal_range),
            autoplay: None,
            zoom: ZoomController::new(zoom),
        }
    }

    pub fn for_diagram(diagram: &Diagram, config: &TourConfig) -> Self {
        Self::new(diagram.steps.clone(), config, ZoomConfig::default())
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of reachable indices; the overview exists even without authored steps.
    pub fn step_count(&self) -> usize {
        self.steps.len().max(1)
    }

    pub fn current_step(&self) -> Option<&Step> {
        self.steps.get(self.index)
    }

    pub fn is_overview(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.step_count()
    }

    pub fn revealed_icons(&self) -> &BTreeSet<String> {
        self.reveal.revealed()
    }

    pub fn next(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.set_index(self.index + 1);
        true
    }

    pub fn prev(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.set_index(self.index - 1);
        true
    }

    pub fn go_to(&mut self, index: usize) -> bool {
        if index >= self.step_count() {
            debug!(index = index, step_count = self.step_count(); "Ignoring out-of-range step");
            return false;
        }
        if index == self.index {
            return false;
        }
        self.set_index(index);
        true
    }

    fn set_index(&mut self, index: usize) {
        self.index = index;
        self.reveal.advance(&self.steps, index);
        debug!(
            step = index,
            step_id = self.current_step().map(|s| s.id.as_str()).unwrap_or("");
            "Applying tour step"
        );
    }

    /// Starts auto-play, replacing any ticker that is already running.
    pub fn start_autoplay(&mut self) -> io::Result<()> {
        self.autoplay = None;
        self.autoplay = Some(AutoPlayTask::spawn(self.period)?);
        Ok(())
    }

    pub fn stop_autoplay(&mut self) {
        self.autoplay = None;
    }

    pub fn is_playing(&self) -> bool {
        self.autoplay.is_some()
    }

    /// Advances one step; at the last step wraps to the overview or stops playback.
    pub fn on_tick(&mut self) -> bool {
        if self.next() {
            return true;
        }
        if self.loop_playback && self.step_count() > 1 {
            self.set_index(0);
            return true;
        }
        self.stop_autoplay();
        false
    }

    /// Handles every tick that has arrived since the last call. Returns the number of steps
    /// taken.
    pub fn pump_autoplay(&mut self) -> usize {
        let pending = self.autoplay.as_ref().map_or(0, AutoPlayTask::pending);
        let mut moved = 0;
        for _ in 0..pending {
            if !self.is_playing() {
                break;
            }
            if self.on_tick() {
                moved += 1;
            }
        }
        moved
    }

    /// Blocks up to `timeout` for the next tick and applies it.
    pub fn wait_autoplay(&mut self, timeout: Duration) -> bool {
        let ticked = self
            .autoplay
            .as_ref()
            .and_then(|task| task.wait(timeout))
            .is_some();
        ticked && self.on_tick()
    }

    pub fn view(&self, diagram: &Diagram, texts: &dyn TextProvider, locale: &str) -> StepView {
        if self.is_overview() {
            return self.overview(diagram, texts, locale);
        }
        let Some(step) = self.steps.get(self.index) else {
            return self.overview(diagram, texts, locale);
        };
        let (containers, connections) = classify_step(diagram, step, self.mode);
        let function_icons = self.classify_function_icons(diagram, step, &containers);
        StepView {
            index: self.index,
            step_id: Some(step.id.clone()),
            containers,
            connections,
            function_icons,
            panel: Panel::Step {
                title: self.localize(
                    step.title.as_ref(),
                    &format!("steps.{}.title", step.id),
                    texts,
                    locale,
                ),
                description: self.localize(
                    step.description.as_ref(),
                    &format!("steps.{}.description", step.id),
                    texts,
                    locale,
                ),
            },
        }
    }

    fn overview(&self, diagram: &Diagram, texts: &dyn TextProvider, locale: &str) -> StepView {
        let unstyled = |ids: Vec<&String>| -> BTreeMap<String, PresentationClass> {
            ids.into_iter()
                .map(|id| (id.clone(), PresentationClass::None))
                .collect()
        };
        StepView {
            index: 0,
            step_id: self.steps.first().map(|s| s.id.clone()),
            containers: unstyled(diagram.containers.iter().map(|c| &c.id).collect()),
            connections: unstyled(diagram.connections.iter().map(|c| &c.id).collect()),
            function_icons: unstyled(diagram.function_icons.iter().map(|f| &f.id).collect()),
            panel: Panel::Overview {
                title: self.localize(diagram.title.as_ref(), "diagram.title", texts, locale),
                subtitle: self.localize(
                    diagram.subtitle.as_ref(),
                    "diagram.subtitle",
                    texts,
                    locale,
                ),
            },
        }
    }

    /// Function icons are drawn outside their owner's group, so an icon whose owner is hidden
    /// is hidden with it.
    fn classify_function_icons(
        &self,
        diagram: &Diagram,
        step: &Step,
        containers: &BTreeMap<String, PresentationClass>,
    ) -> BTreeMap<String, PresentationClass> {
        let revealing = self.reveal.in_range(self.index);
        diagram
            .function_icons
            .iter()
            .map(|icon| {
                let owner_hidden =
                    containers.get(&icon.container_id) == Some(&PresentationClass::Hidden);
                let class = if !step.show_function_icons || owner_hidden {
                    PresentationClass::Hidden
                } else if step.highlighted_function_icons.contains(&icon.id) {
                    PresentationClass::Highlight
                } else if revealing && !self.reveal.revealed().contains(&icon.id) {
                    PresentationClass::Hidden
                } else {
                    PresentationClass::None
                };
                (icon.id.clone(), class)
            })
            .collect()
    }

    fn localize(
        &self,
        inline: Option<&LocalizedText>,
        key: &str,
        texts: &dyn TextProvider,
        locale: &str,
    ) -> String {
        match inline {
            Some(text) => text.resolve(locale, &self.default_locale, key).to_string(),
            None => texts.text(key, locale),
        }
    }
}
