use std::collections::BTreeMap;

use archtour::RenderOptions;
use archtour::customer::CustomerConfig;
use archtour::i18n::TextCatalog;
use archtour::icons::IconRegistry;
use archtour::loader::parse_diagram;
use archtour::render_step_svg;
use archtour::theme::Theme;
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TourRenderOptions {
    step: Option<usize>,
    locale: Option<String>,
    theme: Option<String>,
    auto_dim: Option<bool>,
    zoom_steps: Option<i32>,
    customer: Option<CustomerConfig>,
    texts: Option<BTreeMap<String, BTreeMap<String, String>>>,
    icons: Option<BTreeMap<String, String>>,
}

fn build_render_options(options: TourRenderOptions) -> (RenderOptions, usize) {
    let mut render_options = RenderOptions::default();
    if options.theme.as_deref() == Some("dark") {
        render_options.config.theme = Theme::dark();
        render_options.config.render.background = render_options.config.theme.background.clone();
    }
    if let Some(auto_dim) = options.auto_dim {
        render_options.config.tour.auto_dim = auto_dim;
    }
    if let Some(texts) = options.texts {
        render_options.texts =
            TextCatalog::from_entries(&render_options.config.tour.default_locale, texts);
    }
    if let Some(icons) = options.icons {
        render_options.icons = IconRegistry::from_table(icons);
    }
    render_options.customer = options.customer;
    render_options.locale = options.locale;
    render_options.zoom_steps = options.zoom_steps.unwrap_or(0);
    (render_options, options.step.unwrap_or(0))
}

#[wasm_bindgen]
pub fn render_tour_svg(diagram_json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<TourRenderOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        TourRenderOptions::default()
    };
    let diagram = parse_diagram(diagram_json).map_err(|error| JsValue::from_str(&error.to_string()))?;
    let (render_options, step) = build_render_options(options);
    Ok(render_step_svg(&diagram, &render_options, step))
}
