use serde::Serialize;

use crate::ir::{Event, EventId, YearRange};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionedEvent {
    #[serde(flatten)]
    pub event: Event,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PositionedEvent {
    pub fn id(&self) -> EventId {
        self.event.id
    }

    pub fn start(&self) -> i32 {
        self.event.start
    }

    pub fn end(&self) -> Option<i32> {
        self.event.end
    }

    pub fn end_or_start(&self) -> i32 {
        self.event.end_or_start()
    }

    pub fn label(&self) -> &str {
        &self.event.label
    }
}

/// Sizing metadata derived on every layout call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicLayoutConfig {
    pub lane_widths: Vec<f32>,
    pub year_axis_width: f32,
    pub total_width: f32,
    /// Absent for an empty dataset; consumers fall back to their own height.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeline_height: Option<f32>,
}

/// Linear year → pixel mapping shared by events, gridlines and axis labels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YearScale {
    domain: (i32, i32),
    range: (f32, f32),
}

impl YearScale {
    pub fn new(years: YearRange, range: (f32, f32)) -> Self {
        Self {
            domain: (years.min, years.max),
            range,
        }
    }

    /// Maps a year onto the pixel range. A zero-span domain maps every year to
    /// the start of the range.
    pub fn apply(&self, year: i32) -> f32 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d0 == d1 {
            return r0;
        }
        let t = (i64::from(year) - i64::from(d0)) as f64 / (i64::from(d1) - i64::from(d0)) as f64;
        (r0 as f64 + t * (r1 - r0) as f64) as f32
    }

    pub fn domain(&self) -> (i32, i32) {
        self.domain
    }

    pub fn range(&self) -> (f32, f32) {
        self.range
    }

    /// Years at `interval` steps from the domain start up to the domain end.
    pub fn ticks(&self, interval: i32) -> Vec<i32> {
        let step = interval.max(1) as usize;
        (self.domain.0..=self.domain.1).step_by(step).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Gridline {
    pub year: i32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimelineLayout {
    /// Lane-major; one inner vector per input lane, in input order.
    pub positioned_events: Vec<Vec<PositionedEvent>>,
    pub layout_config: DynamicLayoutConfig,
    pub year_range: YearRange,
    pub scale: YearScale,
    pub content_height: f32,
    pub header_height: f32,
}

impl TimelineLayout {
    pub fn gridlines(&self, interval: i32) -> Vec<Gridline> {
        self.scale
            .ticks(interval)
            .into_iter()
            .map(|year| Gridline {
                year,
                y: self.scale.apply(year),
            })
            .collect()
    }

    /// Left edge of each lane column, relative to the end of the year axis.
    pub fn lane_offsets(&self) -> Vec<f32> {
        let mut offsets = Vec::with_capacity(self.layout_config.lane_widths.len());
        let mut current = 0.0;
        for width in &self.layout_config.lane_widths {
            offsets.push(current);
            current += width;
        }
        offsets
    }

    pub fn is_empty(&self) -> bool {
        self.positioned_events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_maps_domain_onto_range() {
        let scale = YearScale::new(YearRange { min: 2000, max: 2020 }, (0.0, 740.0));
        assert_eq!(scale.apply(2000), 0.0);
        assert_eq!(scale.apply(2020), 740.0);
        assert!((scale.apply(2010) - 370.0).abs() < 1e-3);
    }

    #[test]
    fn zero_span_domain_maps_to_range_start() {
        let scale = YearScale::new(YearRange { min: 1990, max: 1990 }, (0.0, 740.0));
        assert_eq!(scale.apply(1990), 0.0);
        assert!(scale.apply(2000).is_finite());
    }

    #[test]
    fn ticks_step_from_domain_start() {
        let scale = YearScale::new(YearRange { min: 1980, max: 2010 }, (0.0, 100.0));
        assert_eq!(scale.ticks(10), vec![1980, 1990, 2000, 2010]);
    }
}
