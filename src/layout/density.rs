use std::collections::BTreeMap;

use crate::ir::{TimelineData, YearRange};

/// Per-year activity counts over a year range.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventDensity {
    /// Active events per year summed over every lane.
    pub year_event_counts: BTreeMap<i32, usize>,
    /// Highest number of simultaneously active events in any single lane.
    pub year_max_events_per_lane: BTreeMap<i32, usize>,
}

impl EventDensity {
    pub fn max_events_in(&self, year: i32) -> usize {
        self.year_max_events_per_lane.get(&year).copied().unwrap_or(0)
    }
}

/// An event is active in every integer year of `[start, end_or_start]`.
pub fn analyze_event_density(data: &TimelineData, years: YearRange) -> EventDensity {
    let mut density = EventDensity::default();
    for year in years.years() {
        density.year_event_counts.insert(year, 0);
        density.year_max_events_per_lane.insert(year, 0);
    }

    for lane in &data.lanes {
        let mut lane_counts: BTreeMap<i32, usize> = BTreeMap::new();
        for event in &lane.events {
            for year in event.start..=event.end_or_start() {
                *density.year_event_counts.entry(year).or_insert(0) += 1;
                *lane_counts.entry(year).or_insert(0) += 1;
            }
        }
        for (year, count) in lane_counts {
            let current = density.year_max_events_per_lane.entry(year).or_insert(0);
            *current = (*current).max(count);
        }
    }

    density
}
