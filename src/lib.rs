#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod export;
pub mod filter;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod parser;
pub mod render;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, RenderConfig};
pub use ir::{Event, Lane, TimelineData};
pub use layout::{
    DynamicLayoutConfig, PositionedEvent, TimelineLayout, calculate_timeline_height,
    calculate_timeline_width, compute_layout,
};
pub use parser::{ParseError, parse_timeline};
pub use render::render_svg;
pub use theme::Theme;

/// Theme, layout constants and year-height scale for one-shot rendering.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
    pub year_height_scale: f32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        let config = Config::default();
        Self {
            theme: config.theme,
            layout: config.layout,
            render: config.render,
            year_height_scale: 1.0,
        }
    }
}

impl RenderOptions {
    pub fn mono() -> Self {
        let theme = Theme::mono();
        let render = RenderConfig {
            background: theme.background.clone(),
            ..RenderConfig::default()
        };
        Self {
            theme,
            render,
            ..Self::default()
        }
    }
}

/// Parses `input` and renders it straight to SVG.
pub fn render_with_options(input: &str, options: RenderOptions) -> anyhow::Result<String> {
    let data = parse_timeline(input)?;
    let layout = compute_layout(&data, options.year_height_scale, &options.layout);
    Ok(render_svg(
        &layout,
        &data,
        &options.theme,
        &options.layout,
        &options.render,
    ))
}
