use serde::{Deserialize, Serialize};

/// Colours for one lane: pale column background, event fill, text on the fill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanePalette {
    pub name: String,
    pub lane: String,
    pub event: String,
    pub event_text: String,
}

impl LanePalette {
    fn new(name: &str, lane: &str, event: &str, event_text: &str) -> Self {
        Self {
            name: name.to_string(),
            lane: lane.to_string(),
            event: event.to_string(),
            event_text: event_text.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub text_color: String,
    pub muted_text_color: String,
    pub border_color: String,
    pub gridline_color: String,
    pub axis_background: String,
    pub background: String,
    pub lane_palettes: Vec<LanePalette>,
}

impl Theme {
    pub fn nenpyo_default() -> Self {
        Self {
            font_family: "\"Noto Sans JP\", \"Hiragino Sans\", Meiryo, sans-serif".to_string(),
            font_size: 14.0,
            text_color: "#212121".to_string(),
            muted_text_color: "#666666".to_string(),
            border_color: "rgba(0,0,0,0.2)".to_string(),
            gridline_color: "rgba(0,0,0,0.1)".to_string(),
            axis_background: "rgba(255,255,255,0.95)".to_string(),
            background: "#F7F7F7".to_string(),
            lane_palettes: vec![
                LanePalette::new("Blue", "#E3F2FD", "#1565C0", "#FFFFFF"),
                LanePalette::new("Purple", "#F3E5F5", "#7B1FA2", "#FFFFFF"),
                LanePalette::new("Green", "#E8F5E8", "#2E7D32", "#FFFFFF"),
                LanePalette::new("Brown", "#FFF8E1", "#5D4037", "#FFFFFF"),
                LanePalette::new("Pink", "#FCE4EC", "#C2185B", "#FFFFFF"),
            ],
        }
    }

    /// Greyscale variant for print.
    pub fn mono() -> Self {
        Self {
            font_family: "\"Noto Sans JP\", sans-serif".to_string(),
            font_size: 13.0,
            text_color: "#000000".to_string(),
            muted_text_color: "#444444".to_string(),
            border_color: "#888888".to_string(),
            gridline_color: "#CCCCCC".to_string(),
            axis_background: "#FFFFFF".to_string(),
            background: "#FFFFFF".to_string(),
            lane_palettes: vec![
                LanePalette::new("Light", "#F5F5F5", "#424242", "#FFFFFF"),
                LanePalette::new("Mid", "#EEEEEE", "#212121", "#FFFFFF"),
            ],
        }
    }

    /// Palette for the lane at `index`, cycling when there are more lanes than palettes.
    pub fn lane_palette(&self, index: usize) -> Option<&LanePalette> {
        if self.lane_palettes.is_empty() {
            return None;
        }
        self.lane_palettes.get(index % self.lane_palettes.len())
    }
}
