use std::collections::HashMap;

use crate::config::{CollisionStrategy, LayoutConfig};

use super::types::PositionedEvent;

/// Committed vertical positions per year.
#[derive(Debug, Default)]
struct YearSlots {
    slots: HashMap<i32, Vec<f32>>,
}

impl YearSlots {
    fn in_span(&self, start: i32, end: i32) -> impl Iterator<Item = f32> + '_ {
        (start..=end)
            .filter_map(|year| self.slots.get(&year))
            .flat_map(|slots| slots.iter().copied())
    }

    fn first_conflict(&self, start: i32, end: i32, y: f32, spacing: f32) -> Option<f32> {
        self.in_span(start, end).find(|used| (y - used).abs() < spacing)
    }

    fn commit(&mut self, start: i32, end: i32, y: f32) {
        for year in start..=end {
            self.slots.entry(year).or_default().push(y);
        }
    }
}

/// Sorts a lane by `(start, end_or_start)` and pushes events down until no
/// two events sharing a year sit closer than one slot spacing.
///
/// With [`CollisionStrategy::Greedy`] each event gets at most
/// `collision_attempts` re-checks and keeps its last candidate once the cap is
/// hit, so pathological density can still leave close pairs.
/// [`CollisionStrategy::Exact`] settles each event in one sweep over the
/// sorted slots of its span and has no cap.
pub fn resolve_event_collisions(
    events: Vec<PositionedEvent>,
    year_height_scale: f32,
    config: &LayoutConfig,
) -> Vec<PositionedEvent> {
    let mut sorted = events;
    sorted.sort_by_key(|event| (event.start(), event.end_or_start()));

    let spacing = config.slot_spacing(year_height_scale);
    let mut slots = YearSlots::default();

    sorted
        .into_iter()
        .map(|mut event| {
            let start = event.start();
            let end = event.end_or_start();
            let y = match config.collision_strategy {
                CollisionStrategy::Greedy => {
                    greedy_slot(&slots, start, end, event.y, spacing, config.collision_attempts)
                }
                CollisionStrategy::Exact => exact_slot(&slots, start, end, event.y, spacing),
            };
            slots.commit(start, end, y);
            event.y = y;
            event
        })
        .collect()
}

fn greedy_slot(
    slots: &YearSlots,
    start: i32,
    end: i32,
    provisional: f32,
    spacing: f32,
    max_attempts: usize,
) -> f32 {
    let mut candidate = provisional;
    for _ in 0..max_attempts {
        match slots.first_conflict(start, end, candidate, spacing) {
            Some(used) => candidate = used + spacing,
            None => break,
        }
    }
    candidate
}

fn exact_slot(slots: &YearSlots, start: i32, end: i32, provisional: f32, spacing: f32) -> f32 {
    let mut used: Vec<f32> = slots.in_span(start, end).collect();
    used.sort_by(f32::total_cmp);

    // The candidate only moves down, so every slot already passed stays at
    // least one spacing above it.
    let mut candidate = provisional;
    for slot in used {
        if (candidate - slot).abs() < spacing {
            candidate = slot + spacing;
        }
    }
    candidate
}
