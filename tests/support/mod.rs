#![allow(dead_code)]

//! Shared fixtures for the integration tests.
//!
//! Most suites start from the same shape: an active service version with a
//! Monday evening service (18:00-22:00), 90-minute slots, a 15-minute
//! buffer, and capacity for 20 covers per slot.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime, Weekday};

use tavola::api::{
    RestaurantId, ServiceId, ServiceVersion, SlotPolicyUpdate, UserId, WeeklyTemplateUpdate,
};
use tavola::db::repository::ScheduleRepository;
use tavola::db::LocalRepository;
use tavola::scheduler::GeneratorOptions;

pub fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

/// 2026-08-10 is a Monday.
pub fn monday() -> NaiveDate {
    d(2026, 8, 10)
}

/// Fixed "today" well before the fixture dates, so validation tests are
/// deterministic.
pub fn today() -> NaiveDate {
    d(2026, 8, 1)
}

pub fn staff() -> UserId {
    UserId::new(99)
}

pub fn options() -> GeneratorOptions {
    GeneratorOptions::default()
}

pub fn open_day(opening: NaiveTime, closing: NaiveTime) -> WeeklyTemplateUpdate {
    WeeklyTemplateUpdate {
        closed: false,
        opening_time: Some(opening),
        closing_time: Some(closing),
        break_start: None,
        break_end: None,
    }
}

pub fn closed_day() -> WeeklyTemplateUpdate {
    WeeklyTemplateUpdate {
        closed: true,
        opening_time: None,
        closing_time: None,
        break_start: None,
        break_end: None,
    }
}

pub fn policy(duration: u32, buffer: u32, capacity: u32) -> SlotPolicyUpdate {
    SlotPolicyUpdate {
        slot_duration_minutes: duration,
        buffer_minutes: buffer,
        capacity_per_slot: capacity,
        daily_start: None,
        daily_end: None,
    }
}

pub struct Fixture {
    pub repo: Arc<LocalRepository>,
    pub version: ServiceVersion,
}

/// Monday 18:00-22:00, 90-minute slots, 15-minute buffer, capacity 20.
/// Generates exactly two slots: 18:00-19:30 and 19:45-21:15.
pub async fn evening_service() -> Fixture {
    let repo = Arc::new(LocalRepository::new());
    let version = repo.seed_service_version(ServiceId::new(1), RestaurantId::new(1), d(2026, 1, 1));
    repo.upsert_template_entry(version.id, Weekday::Mon, open_day(t(18, 0), t(22, 0)))
        .await
        .unwrap();
    repo.upsert_slot_policy(version.id, policy(90, 15, 20))
        .await
        .unwrap();
    Fixture { repo, version }
}

/// Service open every day 12:00-15:00 with 30-minute back-to-back slots and
/// capacity 10.
pub async fn daily_lunch_service() -> Fixture {
    let repo = Arc::new(LocalRepository::new());
    let version = repo.seed_service_version(ServiceId::new(1), RestaurantId::new(1), d(2026, 1, 1));
    for weekday in [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ] {
        repo.upsert_template_entry(version.id, weekday, open_day(t(12, 0), t(15, 0)))
            .await
            .unwrap();
    }
    repo.upsert_slot_policy(version.id, policy(30, 0, 10))
        .await
        .unwrap();
    Fixture { repo, version }
}
