//! Candidate slot generation.
//!
//! Pure derivation: given the day's template entry, the slot policy, and
//! the date's exceptions, produce the ordered list of candidate slots.
//! Capacity fields are left at their defaults; the availability stage fills
//! them in.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::api::{ComputedSlot, DateException, SlotPolicy, WeeklyTemplateEntry};
use crate::models::TimeWindow;

/// How exceptions carrying a blocked time range filter generated slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartialClosureRule {
    /// Drop a slot when its interval overlaps the blocked range
    /// (`slot.start < range.end && slot.end > range.start`).
    Overlap,
    /// Drop a slot only when its start time lies inside the blocked range.
    /// Reproduces the legacy generator, which tested the start only: a slot
    /// starting just before a blocked range but overlapping it survives.
    SlotStart,
}

impl Default for PartialClosureRule {
    fn default() -> Self {
        Self::Overlap
    }
}

impl std::str::FromStr for PartialClosureRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "overlap" => Ok(Self::Overlap),
            "slot_start" | "slot-start" => Ok(Self::SlotStart),
            _ => Err(format!("Unknown partial closure rule: {}", s)),
        }
    }
}

/// Options controlling slot generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorOptions {
    pub partial_closure_rule: PartialClosureRule,
}

/// Generate the ordered candidate slots for `date`.
///
/// The caller resolves the template entry for the date's weekday and the
/// exceptions recorded for the date; this function is a pure transformation
/// of those inputs and always yields identical output for identical inputs.
///
/// Rules, in order:
/// 1. A missing or closed template entry yields no slots, regardless of
///    exceptions.
/// 2. Any fully-closed exception yields no slots.
/// 3. Hour overrides are applied per field in (creation timestamp, id)
///    order, so the most recent exception wins independently for opening
///    and closing; the policy's daily window then narrows the result.
/// 4. Slot starts advance in steps of duration + buffer; a slot that would
///    intersect the break window fast-forwards to the break's end, so no
///    emitted slot ever touches the break.
/// 5. Exceptions with a blocked time range filter the emitted slots
///    according to the configured [`PartialClosureRule`].
pub fn generate(
    entry: Option<&WeeklyTemplateEntry>,
    policy: &SlotPolicy,
    exceptions: &[DateException],
    date: NaiveDate,
    options: GeneratorOptions,
) -> Vec<ComputedSlot> {
    let entry = match entry {
        Some(e) if !e.closed => e,
        _ => return Vec::new(),
    };

    if exceptions.iter().any(|e| e.fully_closed) {
        return Vec::new();
    }

    let hours = match effective_hours(entry, policy, exceptions) {
        Some(hours) => hours,
        None => return Vec::new(),
    };

    let mut slots = walk_slots(entry, policy, &hours, date);
    filter_blocked_ranges(&mut slots, exceptions, options.partial_closure_rule);
    slots
}

/// Resolve the effective operating window for the day.
///
/// Starts from the template's opening/closing pair and applies each
/// exception's override fields independently, in (creation timestamp, id)
/// order: the last exception in that order wins for each field it sets.
/// The policy's optional daily window only ever narrows the result.
fn effective_hours(
    entry: &WeeklyTemplateEntry,
    policy: &SlotPolicy,
    exceptions: &[DateException],
) -> Option<TimeWindow> {
    let mut opening = entry.opening_time?;
    let mut closing = entry.closing_time?;

    let mut overrides: Vec<&DateException> = exceptions
        .iter()
        .filter(|e| e.is_hours_override())
        .collect();
    overrides.sort_by_key(|e| (e.created_at, e.id));

    for exception in overrides {
        if let Some(open) = exception.override_opening {
            opening = open;
        }
        if let Some(close) = exception.override_closing {
            closing = close;
        }
    }

    if let Some(daily_start) = policy.daily_start {
        opening = opening.max(daily_start);
    }
    if let Some(daily_end) = policy.daily_end {
        closing = closing.min(daily_end);
    }

    let window = TimeWindow::new(opening, closing);
    window.is_ordered().then_some(window)
}

/// Walk forward through the operating window emitting slots.
///
/// The walk runs on minutes-since-midnight so a step can never wrap past
/// midnight into an infinite loop.
fn walk_slots(
    entry: &WeeklyTemplateEntry,
    policy: &SlotPolicy,
    hours: &TimeWindow,
    date: NaiveDate,
) -> Vec<ComputedSlot> {
    let start_minute = minute_of_day(hours.start);
    let end_minute = minute_of_day(hours.end);
    let duration = policy.slot_duration_minutes as i64;
    let step = policy.slot_interval_minutes() as i64;
    let break_minutes = entry
        .break_window()
        .map(|b| (minute_of_day(b.start), minute_of_day(b.end)));

    let mut slots = Vec::new();
    let mut sequence = 1u32;
    let mut current = start_minute;

    while current + duration <= end_minute {
        if let Some((break_start, break_end)) = break_minutes {
            // No slot may intersect the break: a start inside the break and
            // a slot that would run into it both defer to the break's end.
            if current < break_end && current + duration > break_start {
                current = break_end;
                continue;
            }
        }

        let slot_start = hours.start + Duration::minutes(current - start_minute);
        let slot_end = slot_start + Duration::minutes(duration);
        slots.push(ComputedSlot {
            id: ComputedSlot::derive_id(entry.service_version_id, sequence, date),
            service_version_id: entry.service_version_id,
            start: NaiveDateTime::new(date, slot_start),
            end: NaiveDateTime::new(date, slot_end),
            total_capacity: policy.capacity_per_slot,
            booked: 0,
            available: policy.capacity_per_slot,
            is_available: true,
        });

        sequence += 1;
        current += step;
    }

    slots
}

/// Drop slots hit by exceptions carrying a blocked time range.
fn filter_blocked_ranges(
    slots: &mut Vec<ComputedSlot>,
    exceptions: &[DateException],
    rule: PartialClosureRule,
) {
    let blocked: Vec<TimeWindow> = exceptions.iter().filter_map(|e| e.blocked_window()).collect();
    if blocked.is_empty() {
        return;
    }

    slots.retain(|slot| {
        let window = slot.window();
        !blocked.iter().any(|range| match rule {
            PartialClosureRule::Overlap => window.overlaps(range),
            PartialClosureRule::SlotStart => range.contains(window.start),
        })
    });
}

fn minute_of_day(time: NaiveTime) -> i64 {
    (time.num_seconds_from_midnight() / 60) as i64
}
