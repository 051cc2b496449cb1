//! The deterministic timetable core: normalization, coalescing, rendering.
//!
//! Everything in this module tree is pure and synchronous. No I/O, no
//! shared state; safe to call concurrently from any number of request
//! handlers.

pub mod coalesce;
pub mod format;
pub mod slot;

pub use coalesce::{MergedSlot, coalesce_day_slots};
pub use format::{format_clarify, format_full_timetable};
