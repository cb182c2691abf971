use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

const COMPOUND_SUFFIXES: [&str; 4] = ["station", "system", "anlage", "plattform"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Horizontal padding subtracted from the box width before counting characters.
    pub label_padding: f32,
    /// Fixed-pitch width of one character as a fraction of the font size.
    pub char_width_factor: f32,
    pub min_chars_per_line: usize,
    pub max_label_lines: usize,
    /// Suffixes an unbreakable compound word may be split before.
    pub compound_suffixes: Vec<String>,
    pub default_font_size: f32,
    pub label_line_height: f32,
    pub label_gap: f32,
    /// Id prefixes that mark a visual cluster; links inside one cluster use internal routing.
    pub internal_cluster_prefixes: Vec<String>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            label_padding: 12.0,
            char_width_factor: 0.58,
            min_chars_per_line: 8,
            max_label_lines: 3,
            compound_suffixes: COMPOUND_SUFFIXES
                .iter()
                .map(|value| value.to_string())
                .collect(),
            default_font_size: 12.0,
            label_line_height: 1.2,
            label_gap: 4.0,
            internal_cluster_prefixes: vec!["bp-".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TourConfig {
    pub autoplay_period_ms: u64,
    /// Wrap to the overview after the last step instead of stopping.
    pub loop_playback: bool,
    pub auto_dim: bool,
    pub default_locale: String,
    /// Inclusive step range across which revealed function icons accumulate.
    pub reveal_range: Option<(usize, usize)>,
}

impl Default for TourConfig {
    fn default() -> Self {
        Self {
            autoplay_period_ms: 3000,
            loop_playback: true,
            auto_dim: false,
            default_locale: "de".to_string(),
            reveal_range: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoomConfig {
    pub min: f64,
    pub max: f64,
    pub fine_step: f64,
    pub coarse_step: f64,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            min: 0.4,
            max: 1.8,
            fine_step: 0.05,
            coarse_step: 0.10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Minimum canvas size; larger diagrams grow the canvas.
    pub width: f32,
    pub height: f32,
    pub padding: f32,
    pub background: String,
    pub icon_size: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            padding: 24.0,
            background: "#FFFFFF".to_string(),
            icon_size: 32.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub tour: TourConfig,
    pub zoom: ZoomConfig,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        let theme = Theme::reference();
        let render = RenderConfig {
            background: theme.background.clone(),
            ..Default::default()
        };
        Self {
            theme,
            layout: LayoutConfig::default(),
            tour: TourConfig::default(),
            zoom: ZoomConfig::default(),
            render,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    label_padding: Option<f32>,
    char_width_factor: Option<f32>,
    min_chars_per_line: Option<usize>,
    max_label_lines: Option<usize>,
    compound_suffixes: Option<Vec<String>>,
    default_font_size: Option<f32>,
    label_line_height: Option<f32>,
    internal_cluster_prefixes: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct TourConfigFile {
    autoplay_period_ms: Option<u64>,
    loop_playback: Option<bool>,
    auto_dim: Option<bool>,
    default_locale: Option<String>,
    reveal_range: Option<(usize, usize)>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ZoomConfigFile {
    min: Option<f64>,
    max: Option<f64>,
    fine_step: Option<f64>,
    coarse_step: Option<f64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    text_color: Option<String>,
    box_fill: Option<String>,
    box_border: Option<String>,
    line_color: Option<String>,
    highlight_color: Option<String>,
    highlight_fill: Option<String>,
    dim_opacity: Option<f32>,
    dim_connection_opacity: Option<f32>,
    background: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutConfigFile>,
    tour: Option<TourConfigFile>,
    zoom: Option<ZoomConfigFile>,
    width: Option<f32>,
    height: Option<f32>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let parsed: ConfigFile = serde_json::from_str(contents)?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        if theme_name == "dark" {
            config.theme = Theme::dark();
        } else if theme_name == "reference" || theme_name == "default" {
            config.theme = Theme::reference();
        }
        config.render.background = config.theme.background.clone();
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.text_color {
            config.theme.text_color = v;
        }
        if let Some(v) = vars.box_fill {
            config.theme.box_fill = v;
        }
        if let Some(v) = vars.box_border {
            config.theme.box_border = v;
        }
        if let Some(v) = vars.line_color {
            config.theme.line_color = v;
        }
        if let Some(v) = vars.highlight_color {
            config.theme.highlight_color = v;
        }
        if let Some(v) = vars.highlight_fill {
            config.theme.highlight_fill = v;
        }
        if let Some(v) = vars.dim_opacity {
            config.theme.dim_opacity = v.clamp(0.0, 1.0);
        }
        if let Some(v) = vars.dim_connection_opacity {
            config.theme.dim_connection_opacity = v.clamp(0.0, 1.0);
        }
        if let Some(v) = vars.background {
            config.render.background = v.clone();
            config.theme.background = v;
        }
    }

    if let Some(layout) = parsed.layout {
        if let Some(v) = layout.label_padding {
            config.layout.label_padding = v;
        }
        if let Some(v) = layout.char_width_factor {
            if v > 0.0 {
                config.layout.char_width_factor = v;
            }
        }
        if let Some(v) = layout.min_chars_per_line {
            config.layout.min_chars_per_line = v.max(1);
        }
        if let Some(v) = layout.max_label_lines {
            config.layout.max_label_lines = v.max(1);
        }
        if let Some(v) = layout.compound_suffixes {
            config.layout.compound_suffixes = v;
        }
        if let Some(v) = layout.default_font_size {
            config.layout.default_font_size = v;
        }
        if let Some(v) = layout.label_line_height {
            config.layout.label_line_height = v;
        }
        if let Some(v) = layout.internal_cluster_prefixes {
            config.layout.internal_cluster_prefixes = v;
        }
    }

    if let Some(tour) = parsed.tour {
        if let Some(v) = tour.autoplay_period_ms {
            config.tour.autoplay_period_ms = v.max(1);
        }
        if let Some(v) = tour.loop_playback {
            config.tour.loop_playback = v;
        }
        if let Some(v) = tour.auto_dim {
            config.tour.auto_dim = v;
        }
        if let Some(v) = tour.default_locale {
            config.tour.default_locale = v;
        }
        if tour.reveal_range.is_some() {
            config.tour.reveal_range = tour.reveal_range;
        }
    }

    if let Some(zoom) = parsed.zoom {
        if let Some(v) = zoom.min {
            config.zoom.min = v;
        }
        if let Some(v) = zoom.max {
            config.zoom.max = v;
        }
        if let Some(v) = zoom.fine_step {
            config.zoom.fine_step = v;
        }
        if let Some(v) = zoom.coarse_step {
            config.zoom.coarse_step = v;
        }
        if config.zoom.min > config.zoom.max {
            std::mem::swap(&mut config.zoom.min, &mut config.zoom.max);
        }
    }

    if let Some(v) = parsed.width {
        config.render.width = v;
    }
    if let Some(v) = parsed.height {
        config.render.height = v;
    }

    Ok(config)
}
