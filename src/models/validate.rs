//! Field-level validation of schedule inputs.
//!
//! Malformed input is rejected here before any repository lookup happens;
//! the error names the offending field so callers can surface it directly.

use chrono::NaiveTime;

use crate::api::{NewDateException, SlotPolicyUpdate, WeeklyTemplateUpdate};

/// A rejected input field with the reason for rejection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct InvalidField {
    pub field: &'static str,
    pub message: String,
}

impl InvalidField {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

pub type FieldResult = Result<(), InvalidField>;

/// Validate a slot policy update.
pub fn validate_slot_policy(update: &SlotPolicyUpdate) -> FieldResult {
    if update.slot_duration_minutes == 0 {
        return Err(InvalidField::new(
            "slot_duration_minutes",
            "slot duration must be positive",
        ));
    }
    if update.capacity_per_slot == 0 {
        return Err(InvalidField::new(
            "capacity_per_slot",
            "capacity per slot must be positive",
        ));
    }
    if let (Some(start), Some(end)) = (update.daily_start, update.daily_end) {
        if start >= end {
            return Err(InvalidField::new(
                "daily_end",
                format!("daily window is inverted ({} >= {})", start, end),
            ));
        }
    }
    Ok(())
}

/// Validate a weekly template day update.
///
/// Open days need an ordered opening/closing pair; a break must come as a
/// pair and lie inside the operating window.
pub fn validate_template_update(update: &WeeklyTemplateUpdate) -> FieldResult {
    if update.closed {
        return Ok(());
    }

    let opening = update
        .opening_time
        .ok_or_else(|| InvalidField::new("opening_time", "required for open days"))?;
    let closing = update
        .closing_time
        .ok_or_else(|| InvalidField::new("closing_time", "required for open days"))?;
    if opening >= closing {
        return Err(InvalidField::new(
            "closing_time",
            format!("operating window is inverted ({} >= {})", opening, closing),
        ));
    }

    match (update.break_start, update.break_end) {
        (None, None) => Ok(()),
        (Some(break_start), Some(break_end)) => {
            validate_break(opening, closing, break_start, break_end)
        }
        (Some(_), None) => Err(InvalidField::new("break_end", "break end is missing")),
        (None, Some(_)) => Err(InvalidField::new("break_start", "break start is missing")),
    }
}

fn validate_break(
    opening: NaiveTime,
    closing: NaiveTime,
    break_start: NaiveTime,
    break_end: NaiveTime,
) -> FieldResult {
    if break_start >= break_end {
        return Err(InvalidField::new(
            "break_end",
            format!("break window is inverted ({} >= {})", break_start, break_end),
        ));
    }
    if break_start < opening || break_end > closing {
        return Err(InvalidField::new(
            "break_start",
            "break must lie inside the operating window",
        ));
    }
    Ok(())
}

/// Validate a new date exception.
pub fn validate_exception(exception: &NewDateException) -> FieldResult {
    if exception.fully_closed {
        // A full-day closure needs no time fields; any present ones are
        // ignored by the generator.
        return Ok(());
    }

    match (exception.start_time, exception.end_time) {
        (None, None) => {}
        (Some(start), Some(end)) => {
            if start >= end {
                return Err(InvalidField::new(
                    "end_time",
                    format!("blocked range is inverted ({} >= {})", start, end),
                ));
            }
        }
        (Some(_), None) => return Err(InvalidField::new("end_time", "end time is missing")),
        (None, Some(_)) => return Err(InvalidField::new("start_time", "start time is missing")),
    }

    if let (Some(opening), Some(closing)) = (exception.override_opening, exception.override_closing)
    {
        if opening >= closing {
            return Err(InvalidField::new(
                "override_closing",
                format!("override window is inverted ({} >= {})", opening, closing),
            ));
        }
    }

    Ok(())
}

/// Validate a legacy slot time window.
pub fn validate_slot_window(start: NaiveTime, end: NaiveTime) -> FieldResult {
    if start >= end {
        return Err(InvalidField::new(
            "end_time",
            format!("slot window is inverted ({} >= {})", start, end),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ExceptionKind;
    use chrono::NaiveTime;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn open_day(opening: NaiveTime, closing: NaiveTime) -> WeeklyTemplateUpdate {
        WeeklyTemplateUpdate {
            closed: false,
            opening_time: Some(opening),
            closing_time: Some(closing),
            break_start: None,
            break_end: None,
        }
    }

    fn policy(duration: u32, buffer: u32, capacity: u32) -> SlotPolicyUpdate {
        SlotPolicyUpdate {
            slot_duration_minutes: duration,
            buffer_minutes: buffer,
            capacity_per_slot: capacity,
            daily_start: None,
            daily_end: None,
        }
    }

    #[test]
    fn policy_zero_duration_rejected() {
        let err = validate_slot_policy(&policy(0, 0, 10)).unwrap_err();
        assert_eq!(err.field, "slot_duration_minutes");
    }

    #[test]
    fn policy_zero_capacity_rejected() {
        let err = validate_slot_policy(&policy(30, 0, 0)).unwrap_err();
        assert_eq!(err.field, "capacity_per_slot");
    }

    #[test]
    fn policy_inverted_daily_window_rejected() {
        let mut update = policy(30, 5, 10);
        update.daily_start = Some(t(20, 0));
        update.daily_end = Some(t(12, 0));
        let err = validate_slot_policy(&update).unwrap_err();
        assert_eq!(err.field, "daily_end");
    }

    #[test]
    fn policy_valid_passes() {
        assert!(validate_slot_policy(&policy(90, 15, 20)).is_ok());
    }

    #[test]
    fn closed_day_needs_no_hours() {
        let update = WeeklyTemplateUpdate {
            closed: true,
            opening_time: None,
            closing_time: None,
            break_start: None,
            break_end: None,
        };
        assert!(validate_template_update(&update).is_ok());
    }

    #[test]
    fn open_day_without_hours_rejected() {
        let update = WeeklyTemplateUpdate {
            closed: false,
            opening_time: None,
            closing_time: None,
            break_start: None,
            break_end: None,
        };
        let err = validate_template_update(&update).unwrap_err();
        assert_eq!(err.field, "opening_time");
    }

    #[test]
    fn inverted_operating_window_rejected() {
        let err = validate_template_update(&open_day(t(22, 0), t(18, 0))).unwrap_err();
        assert_eq!(err.field, "closing_time");
    }

    #[test]
    fn break_outside_operating_window_rejected() {
        let mut update = open_day(t(12, 0), t(15, 0));
        update.break_start = Some(t(11, 0));
        update.break_end = Some(t(13, 0));
        let err = validate_template_update(&update).unwrap_err();
        assert_eq!(err.field, "break_start");
    }

    #[test]
    fn half_configured_break_rejected() {
        let mut update = open_day(t(12, 0), t(15, 0));
        update.break_start = Some(t(13, 0));
        let err = validate_template_update(&update).unwrap_err();
        assert_eq!(err.field, "break_end");
    }

    #[test]
    fn exception_inverted_range_rejected() {
        let exception = NewDateException {
            date: chrono::NaiveDate::from_ymd_opt(2026, 8, 15).unwrap(),
            kind: ExceptionKind::PartialClosure,
            fully_closed: false,
            start_time: Some(t(20, 0)),
            end_time: Some(t(19, 0)),
            override_opening: None,
            override_closing: None,
            note: None,
        };
        let err = validate_exception(&exception).unwrap_err();
        assert_eq!(err.field, "end_time");
    }

    #[test]
    fn fully_closed_exception_skips_range_checks() {
        let exception = NewDateException {
            date: chrono::NaiveDate::from_ymd_opt(2026, 8, 15).unwrap(),
            kind: ExceptionKind::FullClosure,
            fully_closed: true,
            start_time: None,
            end_time: None,
            override_opening: None,
            override_closing: None,
            note: Some("public holiday".to_string()),
        };
        assert!(validate_exception(&exception).is_ok());
    }

    #[test]
    fn slot_window_inversion_rejected() {
        assert!(validate_slot_window(t(19, 0), t(21, 0)).is_ok());
        let err = validate_slot_window(t(21, 0), t(19, 0)).unwrap_err();
        assert_eq!(err.field, "end_time");
    }
}
