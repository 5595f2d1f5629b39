use crate::config::LayoutConfig;
use crate::ir::{Event, TimelineData, YearRange};

use super::density::analyze_event_density;
use super::text::{estimate_text_width, event_caption};

/// Widest caption among the lane's events plus label padding, clamped to the
/// configured lane bounds.
pub fn optimal_lane_width(events: &[Event], config: &LayoutConfig) -> f32 {
    let max_text_width = events
        .iter()
        .map(|event| estimate_text_width(&event_caption(event), config))
        .fold(0.0, f32::max);
    let required = max_text_width + config.lane_label_padding;
    required.max(config.min_lane_width).min(config.max_lane_width)
}

pub fn lane_widths(data: &TimelineData, config: &LayoutConfig) -> Vec<f32> {
    data.lanes
        .iter()
        .map(|lane| optimal_lane_width(&lane.events, config))
        .collect()
}

pub fn year_axis_width(lane_widths: &[f32], config: &LayoutConfig) -> f32 {
    let max_lane_width = lane_widths.iter().copied().fold(0.0, f32::max);
    (max_lane_width * config.year_axis_ratio)
        .max(config.year_axis_min_width)
        .min(config.year_axis_max_width)
}

/// Total pixel height of the timeline for the given per-year density and scale.
///
/// Each year gets at least `min_year_height * scale`, and more when a lane
/// stacks several events in that year. The sum is padded on both ends and
/// never drops below `min_timeline_height`.
pub fn dynamic_height(
    data: &TimelineData,
    years: YearRange,
    year_height_scale: f32,
    config: &LayoutConfig,
) -> f32 {
    let density = analyze_event_density(data, years);
    let stacked_step = config.min_event_height + config.event_vertical_spacing;

    let mut total = 0.0f32;
    for year in years.years() {
        let max_events = density.max_events_in(year) as f32;
        let base = config.min_year_height * year_height_scale;
        let stacked =
            (config.min_event_height + (max_events - 1.0) * stacked_step) * year_height_scale;
        total += base.max(stacked);
    }

    let padded = total + config.timeline_padding * 2.0;
    padded.max(config.min_timeline_height)
}
