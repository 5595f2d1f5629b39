use crate::config::{LayoutConfig, RenderConfig};
use crate::ir::TimelineData;
use crate::layout::{PositionedEvent, TimelineLayout, event_caption};
use crate::theme::{LanePalette, Theme};
use anyhow::Result;
use std::path::Path;

const AXIS_LABEL_FONT_SIZE: f32 = 12.0;
const MARKER_COLUMN: f32 = 20.0;
const BAR_WIDTH: f32 = 8.0;

/// Pixel height a renderer should use for `layout`, falling back to a height
/// derived from the year span when the layout carries none.
///
/// Collision pushes in the last years can move events below the content
/// area, so the canvas always extends to the lowest event bottom.
pub fn canvas_height(layout: &TimelineLayout, layout_cfg: &LayoutConfig, render: &RenderConfig) -> f32 {
    let timeline = layout.layout_config.timeline_height.unwrap_or_else(|| {
        let span = layout.year_range.span() as f32;
        layout_cfg
            .min_timeline_height
            .max(span * render.fallback_year_height)
    });
    let events_bottom = layout
        .positioned_events
        .iter()
        .flatten()
        .map(|event| layout.header_height + event.y + event.height)
        .fold(0.0f32, f32::max);
    timeline.max(events_bottom)
}

pub fn render_svg(
    layout: &TimelineLayout,
    data: &TimelineData,
    theme: &Theme,
    layout_cfg: &LayoutConfig,
    render: &RenderConfig,
) -> String {
    let height = canvas_height(layout, layout_cfg, render);
    render_svg_region(layout, data, theme, layout_cfg, render, 0.0, height)
}

/// Renders the horizontal band `[top, top + band_height)` of the full timeline
/// as a standalone document of that height.
pub fn render_svg_region(
    layout: &TimelineLayout,
    data: &TimelineData,
    theme: &Theme,
    layout_cfg: &LayoutConfig,
    render: &RenderConfig,
    top: f32,
    band_height: f32,
) -> String {
    let width = layout.layout_config.total_width;
    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.2}\" height=\"{band_height:.2}\" viewBox=\"0 {top:.2} {width:.2} {band_height:.2}\">",
    ));
    svg.push_str(&timeline_body(layout, data, theme, layout_cfg, render));
    svg.push_str("</svg>");
    svg
}

fn timeline_body(
    layout: &TimelineLayout,
    data: &TimelineData,
    theme: &Theme,
    layout_cfg: &LayoutConfig,
    render: &RenderConfig,
) -> String {
    let config = &layout.layout_config;
    let width = config.total_width;
    let height = canvas_height(layout, layout_cfg, render);
    let header = layout.header_height;
    let axis_width = config.year_axis_width;
    let mut body = String::new();

    body.push_str(&format!(
        "<rect x=\"0\" y=\"0\" width=\"{width:.2}\" height=\"{height:.2}\" fill=\"{}\"/>",
        render.background
    ));

    let offsets = layout.lane_offsets();
    for (idx, (offset, lane_width)) in offsets.iter().zip(&config.lane_widths).enumerate() {
        let x = axis_width + offset;
        let palette = theme.lane_palette(idx);
        if let Some(palette) = palette {
            body.push_str(&format!(
                "<rect x=\"{x:.2}\" y=\"0\" width=\"{lane_width:.2}\" height=\"{height:.2}\" fill=\"{}\"/>",
                palette.lane
            ));
        }
        body.push_str(&format!(
            "<line x1=\"{x:.2}\" y1=\"0\" x2=\"{x:.2}\" y2=\"{height:.2}\" stroke=\"{}\" stroke-width=\"1\"/>",
            theme.gridline_color
        ));
        if let Some(lane) = data.lanes.get(idx) {
            let center = x + lane_width / 2.0;
            let baseline = header / 2.0 + theme.font_size / 3.0;
            body.push_str(&format!(
                "<text x=\"{center:.2}\" y=\"{baseline:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" font-weight=\"bold\" fill=\"{}\">{}</text>",
                escape_xml_attr(&theme.font_family),
                theme.font_size,
                theme.text_color,
                escape_xml(&lane.name)
            ));
        }
    }

    let gridlines = layout.gridlines(layout_cfg.gridline_interval);
    for line in &gridlines {
        let y = header + line.y;
        body.push_str(&format!(
            "<line x1=\"{axis_width:.2}\" y1=\"{y:.2}\" x2=\"{width:.2}\" y2=\"{y:.2}\" stroke=\"{}\" stroke-width=\"1\" stroke-dasharray=\"4 4\"/>",
            theme.gridline_color
        ));
    }

    // Year axis column and header band.
    body.push_str(&format!(
        "<rect x=\"0\" y=\"0\" width=\"{axis_width:.2}\" height=\"{height:.2}\" fill=\"{}\"/>",
        theme.axis_background
    ));
    body.push_str(&format!(
        "<line x1=\"{axis_width:.2}\" y1=\"0\" x2=\"{axis_width:.2}\" y2=\"{height:.2}\" stroke=\"{}\" stroke-width=\"2\"/>",
        theme.border_color
    ));
    body.push_str(&format!(
        "<line x1=\"0\" y1=\"{header:.2}\" x2=\"{width:.2}\" y2=\"{header:.2}\" stroke=\"{}\" stroke-width=\"2\"/>",
        theme.border_color
    ));
    body.push_str(&format!(
        "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" font-weight=\"bold\" fill=\"{}\">{}</text>",
        axis_width / 2.0,
        header / 2.0 + theme.font_size / 3.0,
        escape_xml_attr(&theme.font_family),
        theme.font_size,
        theme.text_color,
        escape_xml(&render.axis_title)
    ));
    for line in &gridlines {
        let y = header + line.y + AXIS_LABEL_FONT_SIZE / 2.0;
        body.push_str(&format!(
            "<text x=\"12\" y=\"{y:.2}\" data-year-label=\"{}\" font-family=\"{}\" font-size=\"{}\" font-weight=\"bold\" fill=\"{}\">{}</text>",
            line.year,
            escape_xml_attr(&theme.font_family),
            AXIS_LABEL_FONT_SIZE,
            theme.muted_text_color,
            line.year
        ));
    }

    for (idx, lane_events) in layout.positioned_events.iter().enumerate() {
        let palette = theme.lane_palette(idx);
        for event in lane_events {
            body.push_str(&event_svg(event, axis_width, header, palette, theme));
        }
    }

    body
}

fn event_svg(
    event: &PositionedEvent,
    axis_width: f32,
    header: f32,
    palette: Option<&LanePalette>,
    theme: &Theme,
) -> String {
    let fill = palette.map(|p| p.event.as_str()).unwrap_or(theme.text_color.as_str());
    let ring = palette
        .map(|p| p.event_text.as_str())
        .unwrap_or(theme.background.as_str());
    let x = axis_width + event.x;
    let y = header + event.y;
    let caption = escape_xml(&event_caption(&event.event));
    let mut out = format!("<g data-event-id=\"{}\"><title>{caption}</title>", event.id().0);

    let text_y = if event.event.is_span() {
        out.push_str(&format!(
            "<rect x=\"{:.2}\" y=\"{y:.2}\" width=\"{BAR_WIDTH:.2}\" height=\"{:.2}\" rx=\"3\" ry=\"3\" fill=\"{fill}\" stroke=\"{ring}\" stroke-width=\"1\"/>",
            x + (MARKER_COLUMN - BAR_WIDTH) / 2.0,
            event.height
        ));
        y + theme.font_size * 0.9
    } else {
        let radius = event.height / 2.0;
        let cy = y + radius;
        out.push_str(&format!(
            "<circle cx=\"{:.2}\" cy=\"{cy:.2}\" r=\"{radius:.2}\" fill=\"{fill}\" stroke=\"{ring}\" stroke-width=\"2\"/>",
            x + MARKER_COLUMN / 2.0
        ));
        cy + theme.font_size / 3.0
    };

    out.push_str(&format!(
        "<text x=\"{:.2}\" y=\"{text_y:.2}\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{caption}</text></g>",
        x + MARKER_COLUMN + 4.0,
        escape_xml_attr(&theme.font_family),
        theme.font_size,
        theme.text_color
    ));
    out
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, raster_scale: f32) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let scale = if raster_scale > 0.0 { raster_scale } else { 1.0 };
    let size = tree.size().to_int_size();
    let width = (size.width() as f32 * scale).ceil() as u32;
    let height = (size.height() as f32 * scale).ceil() as u32;
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width.max(1), height.max(1))
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate {width}x{height} pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap_mut,
    );
    pixmap.save_png(output)?;
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn escape_xml_attr(input: &str) -> String {
    input.replace('&', "&amp;").replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Event, Lane};
    use crate::layout::compute_layout;

    fn sample() -> TimelineData {
        TimelineData::new(vec![
            Lane::new("政治", vec![Event::point(1868, "明治維新"), Event::span(1914, 1918, "大戦")]),
            Lane::new("A&B", vec![Event::point(1900, "<tag>")]),
        ])
    }

    #[test]
    fn render_svg_basic() {
        let data = sample();
        let layout_cfg = LayoutConfig::default();
        let layout = compute_layout(&data, 1.0, &layout_cfg);
        let svg = render_svg(&layout, &data, &Theme::nenpyo_default(), &layout_cfg, &RenderConfig::default());
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("1868年：明治維新"));
        assert!(svg.contains("1914年-1918年：大戦"));
        assert!(svg.contains("A&amp;B"));
        assert!(svg.contains("&lt;tag&gt;"));
        assert_eq!(svg.matches("<circle").count(), 2);
        assert_eq!(svg.matches("data-event-id").count(), 3);
    }

    #[test]
    fn axis_labels_follow_gridlines() {
        let data = sample();
        let layout_cfg = LayoutConfig::default();
        let layout = compute_layout(&data, 1.0, &layout_cfg);
        let svg = render_svg(&layout, &data, &Theme::nenpyo_default(), &layout_cfg, &RenderConfig::default());
        // 1860..1920 at ten-year steps.
        assert_eq!(svg.matches("data-year-label").count(), 7);
        assert!(svg.contains("年代"));
    }

    #[test]
    fn empty_layout_uses_fallback_height() {
        let data = TimelineData::default();
        let layout_cfg = LayoutConfig::default();
        let layout = compute_layout(&data, 1.0, &layout_cfg);
        assert_eq!(canvas_height(&layout, &layout_cfg, &RenderConfig::default()), 800.0);
        let svg = render_svg(&layout, &data, &Theme::nenpyo_default(), &layout_cfg, &RenderConfig::default());
        assert!(svg.contains("height=\"800.00\""));
    }

    fn crowded_final_year() -> TimelineData {
        let mut events = vec![Event::point(2000, "start")];
        events.extend((0..10).map(|i| Event::point(2010, format!("late {i}"))));
        TimelineData::new(vec![Lane::new("A", events)])
    }

    fn root_height(svg: &str) -> f32 {
        let rest = &svg[svg.find("height=\"").unwrap() + "height=\"".len()..];
        rest[..rest.find('"').unwrap()].parse().unwrap()
    }

    #[test]
    fn canvas_extends_to_pushed_events() {
        let data = crowded_final_year();
        let layout_cfg = LayoutConfig::default();
        let layout = compute_layout(&data, 1.0, &layout_cfg);
        let lowest = layout
            .positioned_events
            .iter()
            .flatten()
            .map(|event| layout.header_height + event.y + event.height)
            .fold(0.0f32, f32::max);
        assert!(lowest > layout.layout_config.timeline_height.unwrap());

        let render = RenderConfig::default();
        assert_eq!(canvas_height(&layout, &layout_cfg, &render), lowest);
        let svg = render_svg(&layout, &data, &Theme::nenpyo_default(), &layout_cfg, &render);
        assert!(root_height(&svg) >= lowest - 0.01);
    }

    #[test]
    fn markers_are_ringed_with_palette_text_colour() {
        let data = sample();
        let layout_cfg = LayoutConfig::default();
        let layout = compute_layout(&data, 1.0, &layout_cfg);
        let mut theme = Theme::nenpyo_default();
        theme.lane_palettes[0].event_text = "#ABCDEF".to_string();
        let svg = render_svg(&layout, &data, &theme, &layout_cfg, &RenderConfig::default());
        // Lane 0 has one circle and one bar.
        assert_eq!(svg.matches("stroke=\"#ABCDEF\"").count(), 2);
    }

    #[test]
    fn region_sets_viewbox_window() {
        let data = sample();
        let layout_cfg = LayoutConfig::default();
        let layout = compute_layout(&data, 1.0, &layout_cfg);
        let svg = render_svg_region(
            &layout,
            &data,
            &Theme::nenpyo_default(),
            &layout_cfg,
            &RenderConfig::default(),
            400.0,
            300.0,
        );
        let width = layout.layout_config.total_width;
        assert!(svg.contains(&format!("viewBox=\"0 400.00 {width:.2} 300.00\"")));
    }
}
