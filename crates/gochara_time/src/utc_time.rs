//! UTC calendar date/time with sub-second precision.
//!
//! `UtcTime` is the civil representation accepted by the CLI and config
//! layer. It converts to a Julian Date on the same civil scale; the ephemeris
//! provider decides whether that needs a ΔT correction.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TimeError;
use crate::julian::{calendar_to_jd, days_in_month, jd_to_calendar};

/// UTC calendar date with sub-second precision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct UtcTime {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: f64,
}

impl UtcTime {
    pub fn new(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: f64) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    /// Midnight at the start of the given date.
    pub fn date(year: i32, month: u32, day: u32) -> Self {
        Self::new(year, month, day, 0, 0, 0.0)
    }

    /// Check calendar field ranges.
    pub fn validate(&self) -> Result<(), TimeError> {
        if !(1..=12).contains(&self.month) {
            return Err(TimeError::OutOfRange("month must be 1-12"));
        }
        if self.day == 0 || self.day > days_in_month(self.year, self.month) {
            return Err(TimeError::OutOfRange("day is outside the month"));
        }
        if self.hour > 23 {
            return Err(TimeError::OutOfRange("hour must be 0-23"));
        }
        if self.minute > 59 {
            return Err(TimeError::OutOfRange("minute must be 0-59"));
        }
        if !self.second.is_finite() || !(0.0..61.0).contains(&self.second) {
            return Err(TimeError::OutOfRange("second must be in [0, 61)"));
        }
        Ok(())
    }

    /// Julian Date on the UTC scale.
    pub fn to_jd(&self) -> f64 {
        let day_frac = self.day as f64
            + self.hour as f64 / 24.0
            + self.minute as f64 / 1440.0
            + self.second / 86_400.0;
        calendar_to_jd(self.year, self.month, day_frac)
    }

    /// Convert a Julian Date on the UTC scale back to a calendar date.
    pub fn from_jd(jd: f64) -> Self {
        let (year, month, day_frac) = jd_to_calendar(jd);
        let day = day_frac.floor() as u32;
        let total_seconds = day_frac.fract() * 86_400.0;
        let hour = (total_seconds / 3600.0).floor() as u32;
        let minute = ((total_seconds % 3600.0) / 60.0).floor() as u32;
        let second = total_seconds % 60.0;
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    /// Same civil date and time in another year.
    pub fn with_year(self, year: i32) -> Self {
        Self { year, ..self }
    }

    /// `YYYY-MM-DD` portion only.
    pub fn date_string(&self) -> String {
        format!("{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl Display for UtcTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
            self.year,
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.second.floor() as u32
        )
    }
}

/// Parses `YYYY-MM-DD`, `YYYY-MM-DDThh:mm` or `YYYY-MM-DDThh:mm:ss[.fff]`,
/// with an optional trailing `Z`.
impl FromStr for UtcTime {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_end_matches('Z');
        let (date, time) = match trimmed.split_once('T') {
            Some((d, t)) => (d, Some(t)),
            None => (trimmed, None),
        };

        let date_parts: Vec<&str> = date.split('-').collect();
        if date_parts.len() != 3 {
            return Err(TimeError::Parse(format!(
                "expected YYYY-MM-DD[Thh:mm[:ss]][Z], got {s}"
            )));
        }
        let year: i32 = parse_field(date_parts[0], s)?;
        let month: u32 = parse_field(date_parts[1], s)?;
        let day: u32 = parse_field(date_parts[2], s)?;

        let (hour, minute, second) = match time {
            None => (0, 0, 0.0),
            Some(t) => {
                let time_parts: Vec<&str> = t.split(':').collect();
                match time_parts.as_slice() {
                    [h, m] => (parse_field(h, s)?, parse_field(m, s)?, 0.0),
                    [h, m, sec] => (
                        parse_field(h, s)?,
                        parse_field(m, s)?,
                        parse_field(sec, s)?,
                    ),
                    _ => return Err(TimeError::Parse(format!("invalid time of day: {s}"))),
                }
            }
        };

        let utc = Self::new(year, month, day, hour, minute, second);
        utc.validate()?;
        Ok(utc)
    }
}

fn parse_field<T: FromStr>(field: &str, whole: &str) -> Result<T, TimeError> {
    field
        .parse()
        .map_err(|_| TimeError::Parse(format!("invalid field '{field}' in {whole}")))
}

impl From<UtcTime> for String {
    fn from(t: UtcTime) -> Self {
        t.to_string()
    }
}

impl TryFrom<String> for UtcTime {
    type Error = TimeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}
