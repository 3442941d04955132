//! # Domain Models
//!
//! Strongly-typed records flowing through the acquisition pipeline.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Symbol`] | Validated, uppercase-normalized ticker |
//! | [`EarningsEvent`] | One calendar entry with normalized numerics |
//! | [`Transcript`] | One fetched earnings-call document |
//! | [`FiscalPeriod`] | (year, quarter) pair derived from a call date |
//! | [`DateWindow`] | Inclusive calendar-date query window |
//!
//! All types enforce their invariants at construction time and carry
//! full serde support for JSON.

mod date;
mod event;
mod period;
mod symbol;
mod transcript;
mod window;

pub use date::{format_iso_date, parse_iso_date};
pub use event::EarningsEvent;
pub use period::FiscalPeriod;
pub use symbol::Symbol;
pub use transcript::Transcript;
pub use window::DateWindow;
