use std::collections::HashSet;

use crate::ir::{Event, EventId, Lane, TimelineData};
use crate::layout::PositionedEvent;

#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    /// Inclusive `(from, to)` years an event must overlap to stay visible.
    pub year_range: (i32, i32),
    pub selected_lanes: Vec<String>,
}

impl FilterState {
    /// Everything in `data` visible.
    pub fn all(data: &TimelineData) -> Self {
        Self {
            year_range: (i32::MIN, i32::MAX),
            selected_lanes: data.lane_names(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilteredTimeline {
    pub data: TimelineData,
    pub positioned_events: Vec<Vec<PositionedEvent>>,
}

/// Drops unselected lanes and events outside the year window. Lanes left
/// with no events are removed. Ids stay as assigned at ingestion;
/// `TimelineData::new` would renumber them.
pub fn filter_data(data: &TimelineData, filters: &FilterState) -> TimelineData {
    let mut filtered = TimelineData::default();
    for lane in &data.lanes {
        if let Some(events) = visible_events(lane, filters) {
            filtered.lanes.push(Lane::new(lane.name.clone(), events));
        }
    }
    filtered
}

/// Like [`filter_data`], also keeping the positioned events that belong to the
/// surviving source events.
pub fn filter_timeline(
    data: &TimelineData,
    positioned_events: &[Vec<PositionedEvent>],
    filters: &FilterState,
) -> FilteredTimeline {
    let mut filtered = FilteredTimeline::default();

    for (lane_idx, lane) in data.lanes.iter().enumerate() {
        let Some(events) = visible_events(lane, filters) else {
            continue;
        };

        let kept: HashSet<EventId> = events.iter().map(|event| event.id).collect();
        let positioned = positioned_events
            .get(lane_idx)
            .map(|lane_events| {
                lane_events
                    .iter()
                    .filter(|pe| kept.contains(&pe.id()))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        filtered.data.lanes.push(Lane::new(lane.name.clone(), events));
        filtered.positioned_events.push(positioned);
    }

    filtered
}

fn visible_events(lane: &Lane, filters: &FilterState) -> Option<Vec<Event>> {
    if !filters.selected_lanes.iter().any(|name| name == &lane.name) {
        return None;
    }
    let (from, to) = filters.year_range;
    let events: Vec<_> = lane
        .events
        .iter()
        .filter(|event| event.end_or_start() >= from && event.start <= to)
        .cloned()
        .collect();
    (!events.is_empty()).then_some(events)
}
