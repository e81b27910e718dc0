use crate::error::{Result, SalesError};
use std::fmt;

/// The twelve month labels, in calendar order.
pub const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Calendar quarter of a month label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Quarter {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quarter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Quarter::Q1 => "Q1",
            Quarter::Q2 => "Q2",
            Quarter::Q3 => "Q3",
            Quarter::Q4 => "Q4",
        }
    }

    /// Map a three-letter month label to its quarter. Anything outside
    /// Jan..Sep, including typos and full month names, lands in `Q4`.
    pub fn from_month(month: &str) -> Self {
        match month {
            "Jan" | "Feb" | "Mar" => Quarter::Q1,
            "Apr" | "May" | "Jun" => Quarter::Q2,
            "Jul" | "Aug" | "Sep" => Quarter::Q3,
            _ => Quarter::Q4,
        }
    }

    /// Like [`Quarter::from_month`] but only accepts the twelve labels in
    /// [`MONTHS`].
    pub fn try_from_month(month: &str) -> Result<Self> {
        if MONTHS.contains(&month) {
            Ok(Self::from_month(month))
        } else {
            Err(SalesError::UnknownMonth(month.to_string()))
        }
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
