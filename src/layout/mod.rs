mod collision;
mod density;
mod sizing;
mod text;
pub(crate) mod types;
pub use collision::resolve_event_collisions;
pub use density::{EventDensity, analyze_event_density};
pub use sizing::{dynamic_height, lane_widths, optimal_lane_width, year_axis_width};
pub use text::{estimate_text_width, event_caption};
pub use types::*;

use crate::config::LayoutConfig;
use crate::ir::{TimelineData, YearRange};

/// Decade-aligned range covering every event; `None` when there are no events.
///
/// The upper bound uses `end` for span events.
pub fn year_range(data: &TimelineData, config: &LayoutConfig) -> Option<YearRange> {
    let mut bounds: Option<(i32, i32)> = None;
    for event in data.lanes.iter().flat_map(|lane| lane.events.iter()) {
        let (lo, hi) = bounds.get_or_insert((event.start, event.end_or_start()));
        *lo = (*lo).min(event.start);
        *hi = (*hi).max(event.end_or_start());
    }
    let (min, max) = bounds?;
    let step = i64::from(config.year_rounding.max(1));
    let floor = i64::from(min).div_euclid(step) * step;
    let ceil = (i64::from(max) + step - 1).div_euclid(step) * step;
    // Rounding past the ends of i32 saturates instead of wrapping.
    Some(YearRange {
        min: clamp_year(floor),
        max: clamp_year(ceil),
    })
}

fn clamp_year(year: i64) -> i32 {
    year.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

fn year_range_or_degenerate(data: &TimelineData, config: &LayoutConfig) -> YearRange {
    year_range(data, config).unwrap_or(YearRange { min: 0, max: 0 })
}

pub fn compute_layout(
    data: &TimelineData,
    year_height_scale: f32,
    config: &LayoutConfig,
) -> TimelineLayout {
    if data.is_empty() {
        let years = YearRange { min: 0, max: 0 };
        return TimelineLayout {
            positioned_events: Vec::new(),
            layout_config: DynamicLayoutConfig {
                lane_widths: Vec::new(),
                year_axis_width: config.empty_year_axis_width,
                total_width: config.empty_year_axis_width,
                timeline_height: None,
            },
            year_range: years,
            scale: YearScale::new(years, (0.0, 0.0)),
            content_height: 0.0,
            header_height: config.header_height,
        };
    }

    let years = year_range_or_degenerate(data, config);
    let widths = lane_widths(data, config);
    let axis_width = year_axis_width(&widths, config);
    let total_width = axis_width + widths.iter().sum::<f32>();

    let timeline_height = dynamic_height(data, years, year_height_scale, config);
    let content_height = timeline_height - config.header_height;
    let scale = YearScale::new(years, (0.0, content_height));

    let min_height = config.min_event_height * year_height_scale;
    let padding = config.timeline_padding;

    let mut positioned_events = Vec::with_capacity(data.len());
    let mut current_x = 0.0f32;
    for (lane, lane_width) in data.lanes.iter().zip(&widths) {
        let provisional = lane
            .events
            .iter()
            .map(|event| {
                let y = scale.apply(event.start);
                let height = match event.end {
                    Some(end) => min_height.max(scale.apply(end) - y),
                    None => min_height,
                };
                PositionedEvent {
                    event: event.clone(),
                    x: current_x + padding,
                    y,
                    width: lane_width - padding * 2.0,
                    height,
                }
            })
            .collect();
        positioned_events.push(resolve_event_collisions(
            provisional,
            year_height_scale,
            config,
        ));
        current_x += lane_width;
    }

    TimelineLayout {
        positioned_events,
        layout_config: DynamicLayoutConfig {
            lane_widths: widths,
            year_axis_width: axis_width,
            total_width,
            timeline_height: Some(timeline_height),
        },
        year_range: years,
        scale,
        content_height,
        header_height: config.header_height,
    }
}

/// Timeline height without running the full layout. An empty dataset reports
/// the minimum height, which is also what renderers fall back to.
pub fn calculate_timeline_height(
    data: &TimelineData,
    year_height_scale: f32,
    config: &LayoutConfig,
) -> f32 {
    if data.is_empty() {
        return config.min_timeline_height;
    }
    let years = year_range_or_degenerate(data, config);
    dynamic_height(data, years, year_height_scale, config)
}

pub fn calculate_timeline_width(data: &TimelineData, config: &LayoutConfig) -> f32 {
    if data.is_empty() {
        return config.empty_year_axis_width;
    }
    let widths = lane_widths(data, config);
    year_axis_width(&widths, config) + widths.iter().sum::<f32>()
}
