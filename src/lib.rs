//! # Tavola Availability Engine
//!
//! Availability and slot-scheduling engine for a multi-tenant restaurant
//! reservation platform. Given a recurring weekly template, slot-generation
//! parameters, and a sparse set of date-specific exceptions, the engine
//! deterministically computes the bookable time slots for any calendar date,
//! tracks remaining capacity, and validates reservation requests against the
//! computed availability. Generated slots are derived on demand and never
//! persisted.
//!
//! ## Features
//!
//! - **Weekly templates**: one entry per day of week per service version
//!   (open/closed, operating hours, optional break window)
//! - **Slot policies**: duration, buffer, and capacity parameters driving
//!   slot generation
//! - **Date exceptions**: full closures, partial closures, and hour
//!   overrides layered over the weekly template
//! - **Reservation validation**: capacity-aware accept/reject decisions and
//!   alternative-date search
//! - **Legacy slot versioning**: append-only supersession chains for the
//!   older fixed-slot model, with a change policy for affected reservations
//! - **HTTP API**: RESTful endpoints for restaurant staff and booking flows
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`api`]: identifiers and shared data types crossing module boundaries
//! - [`models`]: time-window arithmetic and input validation
//! - [`scheduler`]: slot generation and availability resolution
//! - [`services`]: high-level business logic (schedule management,
//!   reservation validation, legacy slot transitions)
//! - [`db`]: repository traits, the in-memory backend, and configuration
//! - [`http`]: axum-based HTTP server and request handlers
//!

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod api;

pub mod db;
pub mod models;

pub mod scheduler;

pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
