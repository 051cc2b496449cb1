//! rota: a backend relay that answers natural-language timetable questions.
//!
//! Questions go to an external spreadsheet-backed query service; the
//! structured result is rendered either by the deterministic timetable
//! formatter ([`timetable`]) or by an injected completion provider
//! ([`providers`]). A speech-to-text endpoint turns uploaded audio into a
//! question string.

pub mod app;
pub mod cli;
pub mod config;
pub mod dispatch;
pub mod logging;
pub mod providers;
pub mod query;
pub mod state;
pub mod timetable;
pub mod web;
