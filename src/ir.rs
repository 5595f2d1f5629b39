use serde::{Deserialize, Serialize};

/// Stable per-event identifier assigned at ingestion time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventId(pub u32);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    #[serde(default)]
    pub id: EventId,
    pub start: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<i32>,
    pub label: String,
}

impl Event {
    pub fn point(start: i32, label: impl Into<String>) -> Self {
        Self {
            id: EventId::default(),
            start,
            end: None,
            label: label.into(),
        }
    }

    pub fn span(start: i32, end: i32, label: impl Into<String>) -> Self {
        Self {
            id: EventId::default(),
            start,
            end: Some(end),
            label: label.into(),
        }
    }

    pub fn is_span(&self) -> bool {
        self.end.is_some()
    }

    /// Last year the event is active in; `start` for point events.
    pub fn end_or_start(&self) -> i32 {
        self.end.unwrap_or(self.start)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lane {
    pub name: String,
    pub events: Vec<Event>,
}

impl Lane {
    pub fn new(name: impl Into<String>, events: Vec<Event>) -> Self {
        Self {
            name: name.into(),
            events,
        }
    }
}

/// Inclusive, decade-aligned year domain shared by every lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub min: i32,
    pub max: i32,
}

impl YearRange {
    pub fn span(&self) -> i64 {
        i64::from(self.max) - i64::from(self.min)
    }

    pub fn years(&self) -> std::ops::RangeInclusive<i32> {
        self.min..=self.max
    }

    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }
}

/// Ordered lanes of a timeline. Lane order is preserved by every derived value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimelineData {
    pub lanes: Vec<Lane>,
}

impl TimelineData {
    /// Builds a dataset and numbers every event sequentially in lane-major order.
    pub fn new(mut lanes: Vec<Lane>) -> Self {
        let mut next = 0u32;
        for lane in &mut lanes {
            for event in &mut lane.events {
                event.id = EventId(next);
                next += 1;
            }
        }
        Self { lanes }
    }

    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lanes.len()
    }

    pub fn event_count(&self) -> usize {
        self.lanes.iter().map(|lane| lane.events.len()).sum()
    }

    pub fn lane_names(&self) -> Vec<String> {
        self.lanes.iter().map(|lane| lane.name.clone()).collect()
    }
}

impl From<Vec<Lane>> for TimelineData {
    fn from(lanes: Vec<Lane>) -> Self {
        Self::new(lanes)
    }
}
