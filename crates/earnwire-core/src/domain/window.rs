use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use time::{Date, Duration, OffsetDateTime};

use super::date::{format_iso_date, iso};
use crate::ValidationError;

/// Inclusive calendar-date window for calendar queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    #[serde(with = "iso")]
    from: Date,
    #[serde(with = "iso")]
    to: Date,
}

impl DateWindow {
    pub fn new(from: Date, to: Date) -> Result<Self, ValidationError> {
        if to < from {
            return Err(ValidationError::WindowEndsBeforeStart {
                from: format_iso_date(from),
                to: format_iso_date(to),
            });
        }
        Ok(Self { from, to })
    }

    /// Window covering the trailing `days` days, ending today (UTC).
    pub fn trailing(days: u16) -> Self {
        Self::trailing_from(OffsetDateTime::now_utc().date(), days)
    }

    /// Window of `days` days ending at `to`.
    pub fn trailing_from(to: Date, days: u16) -> Self {
        Self {
            from: to - Duration::days(i64::from(days)),
            to,
        }
    }

    /// The last seven days ending today.
    pub fn last_week() -> Self {
        Self::trailing(7)
    }

    pub const fn from_date(&self) -> Date {
        self.from
    }

    pub const fn to_date(&self) -> Date {
        self.to
    }
}

impl Display for DateWindow {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}..{}",
            format_iso_date(self.from),
            format_iso_date(self.to)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::parse_iso_date;

    #[test]
    fn accepts_single_day_windows() {
        let day = parse_iso_date("2026-02-25").expect("valid date");
        let window = DateWindow::new(day, day).expect("single day is valid");
        assert_eq!(window.from_date(), window.to_date());
    }

    #[test]
    fn rejects_inverted_windows() {
        let from = parse_iso_date("2026-02-25").expect("valid date");
        let to = parse_iso_date("2026-02-20").expect("valid date");

        let err = DateWindow::new(from, to).expect_err("must fail");
        assert!(matches!(err, ValidationError::WindowEndsBeforeStart { .. }));
    }

    #[test]
    fn trailing_window_spans_the_requested_days() {
        let to = parse_iso_date("2026-02-25").expect("valid date");

        let window = DateWindow::trailing_from(to, 7);

        assert_eq!(format_iso_date(window.from_date()), "2026-02-18");
        assert_eq!(format_iso_date(window.to_date()), "2026-02-25");
    }

    #[test]
    fn serializes_bounds_as_iso_strings() {
        let to = parse_iso_date("2026-02-25").expect("valid date");
        let window = DateWindow::trailing_from(to, 1);

        let encoded = serde_json::to_value(window).expect("serializable");
        assert_eq!(
            encoded,
            serde_json::json!({"from": "2026-02-24", "to": "2026-02-25"})
        );
    }
}
