#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod customer;
pub mod error;
pub mod i18n;
pub mod icons;
pub mod ir;
pub mod layout;
pub mod loader;
pub mod render;
pub mod snapshot;
pub mod theme;
pub mod tour;

#[cfg(feature = "cli")]
pub use cli::run;
pub use error::LoadError;
pub use snapshot::Snapshot;
pub use tour::{HighlightMode, PresentationClass, StepView, Tour};

use crate::config::Config;
use crate::customer::{CustomerConfig, apply_customer_config, fill_default_labels};
use crate::i18n::TextCatalog;
use crate::icons::IconRegistry;
use crate::ir::Diagram;
use crate::layout::{Layout, compute_layout};
use crate::render::render_svg_with;

/// Everything needed to turn a diagram into rendered tour steps.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub config: Config,
    pub customer: Option<CustomerConfig>,
    pub texts: TextCatalog,
    pub icons: IconRegistry,
    /// Falls back to `config.tour.default_locale`.
    pub locale: Option<String>,
    /// Zoom clicks from 100%: positive zooms in, negative zooms out.
    pub zoom_steps: i32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        let config = Config::default();
        let texts = TextCatalog::new(&config.tour.default_locale);
        Self {
            config,
            customer: None,
            texts,
            icons: IconRegistry::new(),
            locale: None,
            zoom_steps: 0,
        }
    }
}

impl RenderOptions {
    pub fn locale(&self) -> &str {
        self.locale
            .as_deref()
            .unwrap_or(&self.config.tour.default_locale)
    }
}

struct PreparedTour {
    diagram: Diagram,
    layout: Layout,
    tour: Tour,
}

impl PreparedTour {
    fn new(diagram: &Diagram, options: &RenderOptions) -> Self {
        let mut diagram = match &options.customer {
            Some(customer) => apply_customer_config(diagram, customer),
            None => diagram.clone(),
        };
        fill_default_labels(&mut diagram, &options.texts, options.locale());
        let layout = compute_layout(&diagram, &options.config.layout);

        let mut tour = Tour::new(
            diagram.steps.clone(),
            &options.config.tour,
            options.config.zoom.clone(),
        );
        for _ in 0..options.zoom_steps.unsigned_abs() {
            if options.zoom_steps > 0 {
                tour.zoom.zoom_in();
            } else {
                tour.zoom.zoom_out();
            }
        }
        Self {
            diagram,
            layout,
            tour,
        }
    }

    /// Out-of-range indices render the overview.
    fn snapshot(&mut self, index: usize, options: &RenderOptions) -> Snapshot {
        if !self.tour.go_to(index) && self.tour.index() != index {
            self.tour.go_to(0);
        }
        let view = self
            .tour
            .view(&self.diagram, &options.texts, options.locale());
        Snapshot::build(
            &self.diagram,
            &self.layout,
            &view,
            self.tour.zoom.zoom(),
            &options.icons,
        )
    }
}

/// Number of tour steps in `diagram`, counting the overview.
pub fn step_count(diagram: &Diagram) -> usize {
    diagram.steps.len().max(1)
}

pub fn snapshot_steps(diagram: &Diagram, options: &RenderOptions, indices: &[usize]) -> Vec<Snapshot> {
    let mut prepared = PreparedTour::new(diagram, options);
    indices
        .iter()
        .map(|&index| prepared.snapshot(index, options))
        .collect()
}

pub fn snapshot_step(diagram: &Diagram, options: &RenderOptions, index: usize) -> Snapshot {
    PreparedTour::new(diagram, options).snapshot(index, options)
}

pub fn render_step_svg(diagram: &Diagram, options: &RenderOptions, index: usize) -> String {
    let snapshot = snapshot_step(diagram, options, index);
    render_svg_with(
        &snapshot,
        &options.config.theme,
        &options.config.layout,
        &options.config.render,
    )
}
