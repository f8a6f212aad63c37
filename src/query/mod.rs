//! Query Layer
//!
//! In-memory filtering, ordering and calendar lookups over tasks and defects.
//! Everything here is a pure function of its inputs and preserves input order
//! unless it says otherwise.

mod filter;
mod order;
mod calendar;

pub use filter::{Filter, TaskFilter, DefectFilter, matches_text};
pub use order::{sort_items, split_active_closed, DueState, Ordered};
pub use calendar::{due_on, due_dates_in_month, DayAgenda};
