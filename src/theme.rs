use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub text_color: String,
    pub box_fill: String,
    pub box_border: String,
    pub group_fill: String,
    pub group_border: String,
    pub line_color: String,
    pub highlight_color: String,
    pub highlight_fill: String,
    pub dim_opacity: f32,
    pub dim_connection_opacity: f32,
    pub panel_title_color: String,
    pub panel_text_color: String,
    pub background: String,
}

impl Theme {
    pub fn reference() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            text_color: "#1C2430".to_string(),
            box_fill: "#FFFFFF".to_string(),
            box_border: "#C7D2E5".to_string(),
            group_fill: "#F7FAFF".to_string(),
            group_border: "#D7E0F0".to_string(),
            line_color: "#7A8AA6".to_string(),
            highlight_color: "#E2001A".to_string(),
            highlight_fill: "#FFF4F5".to_string(),
            dim_opacity: 0.25,
            dim_connection_opacity: 0.45,
            panel_title_color: "#1C2430".to_string(),
            panel_text_color: "#4A5568".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }

    pub fn dark() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            text_color: "#E6EDF3".to_string(),
            box_fill: "#161B22".to_string(),
            box_border: "#30363D".to_string(),
            group_fill: "#0D1117".to_string(),
            group_border: "#30363D".to_string(),
            line_color: "#8B949E".to_string(),
            highlight_color: "#FF7B72".to_string(),
            highlight_fill: "#2D1A1C".to_string(),
            dim_opacity: 0.3,
            dim_connection_opacity: 0.5,
            panel_title_color: "#E6EDF3".to_string(),
            panel_text_color: "#8B949E".to_string(),
            background: "#0D1117".to_string(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::reference()
    }
}
