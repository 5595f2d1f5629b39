use crate::theme::{LanePalette, Theme};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionStrategy {
    /// First-fit downward search bounded by `collision_attempts`.
    #[default]
    Greedy,
    /// Single ascending sweep over committed slots; always conflict-free.
    Exact,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub min_lane_width: f32,
    pub max_lane_width: f32,
    /// Horizontal room reserved beside the caption for padding and the marker icon.
    pub lane_label_padding: f32,
    pub timeline_padding: f32,
    pub event_vertical_spacing: f32,
    pub min_event_height: f32,
    pub min_year_height: f32,
    pub min_timeline_height: f32,
    pub header_height: f32,
    pub year_axis_min_width: f32,
    pub year_axis_max_width: f32,
    pub year_axis_ratio: f32,
    pub empty_year_axis_width: f32,
    pub year_rounding: i32,
    pub gridline_interval: i32,
    pub collision_attempts: usize,
    pub collision_strategy: CollisionStrategy,
    pub wide_char_width: f32,
    pub narrow_char_width: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            min_lane_width: 300.0,
            max_lane_width: 500.0,
            lane_label_padding: 80.0,
            timeline_padding: 4.0,
            event_vertical_spacing: 4.0,
            min_event_height: 12.0,
            min_year_height: 24.0,
            min_timeline_height: 800.0,
            header_height: 60.0,
            year_axis_min_width: 80.0,
            year_axis_max_width: 180.0,
            year_axis_ratio: 0.25,
            empty_year_axis_width: 120.0,
            year_rounding: 10,
            gridline_interval: 10,
            collision_attempts: 20,
            collision_strategy: CollisionStrategy::Greedy,
            wide_char_width: 10.0,
            narrow_char_width: 8.0,
        }
    }
}

impl LayoutConfig {
    /// Minimum vertical distance between two committed slots at the given scale.
    pub fn slot_spacing(&self, year_height_scale: f32) -> f32 {
        (self.min_event_height + self.event_vertical_spacing) * year_height_scale
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub background: String,
    /// Pixels per year used when a layout carries no `timeline_height`.
    pub fallback_year_height: f32,
    pub axis_title: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            background: "#F7F7F7".to_string(),
            fallback_year_height: 8.0,
            axis_title: "年代".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub raster_scale: f32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        // A4 landscape
        Self {
            page_width_mm: 297.0,
            page_height_mm: 210.0,
            raster_scale: 3.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
    pub export: ExportConfig,
}

impl Default for Config {
    fn default() -> Self {
        let theme = Theme::nenpyo_default();
        let render = RenderConfig {
            background: theme.background.clone(),
            ..Default::default()
        };
        Self {
            theme,
            layout: LayoutConfig::default(),
            render,
            export: ExportConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<f32>,
    text_color: Option<String>,
    muted_text_color: Option<String>,
    border_color: Option<String>,
    gridline_color: Option<String>,
    axis_background: Option<String>,
    background: Option<String>,
    lane_palettes: Option<Vec<LanePalette>>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    min_lane_width: Option<f32>,
    max_lane_width: Option<f32>,
    lane_label_padding: Option<f32>,
    timeline_padding: Option<f32>,
    event_vertical_spacing: Option<f32>,
    min_event_height: Option<f32>,
    min_year_height: Option<f32>,
    min_timeline_height: Option<f32>,
    header_height: Option<f32>,
    year_axis_min_width: Option<f32>,
    year_axis_max_width: Option<f32>,
    year_axis_ratio: Option<f32>,
    empty_year_axis_width: Option<f32>,
    year_rounding: Option<i32>,
    gridline_interval: Option<i32>,
    collision_attempts: Option<usize>,
    collision_strategy: Option<CollisionStrategy>,
    wide_char_width: Option<f32>,
    narrow_char_width: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RenderConfigFile {
    background: Option<String>,
    fallback_year_height: Option<f32>,
    axis_title: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ExportConfigFile {
    page_width_mm: Option<f32>,
    page_height_mm: Option<f32>,
    raster_scale: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutConfigFile>,
    render: Option<RenderConfigFile>,
    export: Option<ExportConfigFile>,
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
        if theme_name == "mono" {
            config.theme = Theme::mono();
        } else if theme_name == "default" {
            config.theme = Theme::nenpyo_default();
        }
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.text_color {
            config.theme.text_color = v;
        }
        if let Some(v) = vars.muted_text_color {
            config.theme.muted_text_color = v;
        }
        if let Some(v) = vars.border_color {
            config.theme.border_color = v;
        }
        if let Some(v) = vars.gridline_color {
            config.theme.gridline_color = v;
        }
        if let Some(v) = vars.axis_background {
            config.theme.axis_background = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
        if let Some(v) = vars.lane_palettes
            && !v.is_empty()
        {
            config.theme.lane_palettes = v;
        }
    }
    config.render.background = config.theme.background.clone();

    if let Some(layout) = parsed.layout {
        let target = &mut config.layout;
        if let Some(v) = layout.min_lane_width {
            target.min_lane_width = v;
        }
        if let Some(v) = layout.max_lane_width {
            target.max_lane_width = v;
        }
        if let Some(v) = layout.lane_label_padding {
            target.lane_label_padding = v;
        }
        if let Some(v) = layout.timeline_padding {
            target.timeline_padding = v;
        }
        if let Some(v) = layout.event_vertical_spacing {
            target.event_vertical_spacing = v;
        }
        if let Some(v) = layout.min_event_height {
            target.min_event_height = v;
        }
        if let Some(v) = layout.min_year_height {
            target.min_year_height = v;
        }
        if let Some(v) = layout.min_timeline_height {
            target.min_timeline_height = v;
        }
        if let Some(v) = layout.header_height {
            target.header_height = v;
        }
        if let Some(v) = layout.year_axis_min_width {
            target.year_axis_min_width = v;
        }
        if let Some(v) = layout.year_axis_max_width {
            target.year_axis_max_width = v;
        }
        if let Some(v) = layout.year_axis_ratio {
            target.year_axis_ratio = v;
        }
        if let Some(v) = layout.empty_year_axis_width {
            target.empty_year_axis_width = v;
        }
        if let Some(v) = layout.year_rounding {
            target.year_rounding = v.max(1);
        }
        if let Some(v) = layout.gridline_interval {
            target.gridline_interval = v.max(1);
        }
        if let Some(v) = layout.collision_attempts {
            target.collision_attempts = v;
        }
        if let Some(v) = layout.collision_strategy {
            target.collision_strategy = v;
        }
        if let Some(v) = layout.wide_char_width {
            target.wide_char_width = v;
        }
        if let Some(v) = layout.narrow_char_width {
            target.narrow_char_width = v;
        }
    }

    if let Some(render) = parsed.render {
        if let Some(v) = render.background {
            config.render.background = v;
        }
        if let Some(v) = render.fallback_year_height {
            config.render.fallback_year_height = v;
        }
        if let Some(v) = render.axis_title {
            config.render.axis_title = v;
        }
    }

    if let Some(export) = parsed.export {
        if let Some(v) = export.page_width_mm {
            config.export.page_width_mm = v;
        }
        if let Some(v) = export.page_height_mm {
            config.export.page_height_mm = v;
        }
        if let Some(v) = export.raster_scale {
            config.export.raster_scale = v;
        }
    }

    Ok(config)
}
