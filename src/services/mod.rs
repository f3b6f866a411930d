//! Service layer for business logic and orchestration.
//!
//! Services sit between the HTTP layer (or any other caller) and the
//! repository traits. They orchestrate repository calls, run the slot
//! pipeline, enforce input validation, and emit audit records and
//! notifications. Every function takes the repository and the acting user
//! explicitly; there is no ambient request context.

pub mod schedule;
pub mod transition;
pub mod validation;

pub use schedule::{
    create_exception, deactivate_schedule, delete_exception, delete_exceptions_for_date,
    get_available_slots, get_slot_details, get_weekly_template, is_date_closed, list_exceptions,
    reactivate_schedule, update_slot_policy, update_weekly_template_day,
};
pub use transition::{
    can_slot_be_modified, change_slot_schedule, deactivate_slot, future_reservation_count,
    reactivate_slot,
};
pub use validation::{find_alternatives, validate_and_book, validate_reservation};
