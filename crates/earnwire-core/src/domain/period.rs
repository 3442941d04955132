use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use time::Date;

use crate::ValidationError;

/// Fiscal (year, quarter) pair a transcript request is keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "PeriodParts")]
pub struct FiscalPeriod {
    year: i32,
    quarter: u8,
}

impl FiscalPeriod {
    pub fn new(year: i32, quarter: u8) -> Result<Self, ValidationError> {
        if !(1..=4).contains(&quarter) {
            return Err(ValidationError::InvalidQuarter { value: quarter });
        }
        Ok(Self { year, quarter })
    }

    /// Approximate the reporting period from the call date: calls in the
    /// first calendar quarter cover Q4 of the prior year, later calls
    /// cover the preceding quarter of the same year.
    pub fn from_call_date(date: Date) -> Self {
        let year = date.year();
        match u8::from(date.month()) {
            1..=3 => Self {
                year: year - 1,
                quarter: 4,
            },
            4..=6 => Self { year, quarter: 1 },
            7..=9 => Self { year, quarter: 2 },
            _ => Self { year, quarter: 3 },
        }
    }

    pub const fn year(self) -> i32 {
        self.year
    }

    pub const fn quarter(self) -> u8 {
        self.quarter
    }
}

impl Display for FiscalPeriod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}Q{}", self.year, self.quarter)
    }
}

#[derive(Deserialize)]
struct PeriodParts {
    year: i32,
    quarter: u8,
}

impl TryFrom<PeriodParts> for FiscalPeriod {
    type Error = ValidationError;

    fn try_from(parts: PeriodParts) -> Result<Self, Self::Error> {
        Self::new(parts.year, parts.quarter)
    }
}
