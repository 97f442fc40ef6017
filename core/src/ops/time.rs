//! Calendar arithmetic for `add`.
use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A calendar duration. Each field is added to the matching calendar field of a date, from the
/// largest to the smallest, and the result is normalised: January 31st plus one month is March
/// 3rd (or 2nd on leap years).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timespan {
    pub years: i32,
    pub months: i32,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub milliseconds: i64,
}

impl Timespan {
    pub fn years(years: i32) -> Self {
        Timespan {
            years,
            ..Default::default()
        }
    }

    pub fn months(months: i32) -> Self {
        Timespan {
            months,
            ..Default::default()
        }
    }

    pub fn days(days: i64) -> Self {
        Timespan {
            days,
            ..Default::default()
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Timespan::default()
    }

    /// The end of the span starting at `start`.
    pub fn after(&self, start: NaiveDateTime) -> Result<NaiveDateTime> {
        let months = i64::from(start.year()) * 12
            + i64::from(start.month0())
            + i64::from(self.years) * 12
            + i64::from(self.months);
        let year = i32::try_from(months.div_euclid(12)).map_err(|_| Error::DateOverflow)?;
        let month = months.rem_euclid(12) as u32 + 1;

        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or(Error::DateOverflow)?;
        let date = i64::from(start.day0())
            .checked_add(self.days)
            .and_then(TimeDelta::try_days)
            .and_then(|days| first.checked_add_signed(days))
            .ok_or(Error::DateOverflow)?;

        [
            TimeDelta::try_hours(self.hours),
            TimeDelta::try_minutes(self.minutes),
            TimeDelta::try_seconds(self.seconds),
            TimeDelta::try_milliseconds(self.milliseconds),
        ]
        .into_iter()
        .try_fold(date.and_time(start.time()), |acc, delta| {
            delta.and_then(|delta| acc.checked_add_signed(delta))
        })
        .ok_or(Error::DateOverflow)
    }

    /// Adds the span to a millisecond timestamp, by doing the calendar arithmetic from the date
    /// the timestamp designates.
    pub fn after_timestamp(&self, millis: f64) -> Result<f64> {
        if !millis.is_finite() {
            return Err(Error::DateOverflow);
        }
        let start = DateTime::from_timestamp_millis(millis.trunc() as i64)
            .ok_or(Error::DateOverflow)?
            .naive_utc();
        let end = self.after(start)?;
        Ok(millis + (end - start).num_milliseconds() as f64)
    }
}

/// ISO 8601 duration notation, e.g. `P1Y2M10DT3H`.
impl fmt::Display for Timespan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P")?;
        for (n, unit) in [
            (i64::from(self.years), 'Y'),
            (i64::from(self.months), 'M'),
            (self.days, 'D'),
        ] {
            if n != 0 {
                write!(f, "{n}{unit}")?;
            }
        }

        let millis = self.seconds.saturating_mul(1000).saturating_add(self.milliseconds);
        if self.hours != 0 || self.minutes != 0 || millis != 0 {
            write!(f, "T")?;
            if self.hours != 0 {
                write!(f, "{}H", self.hours)?;
            }
            if self.minutes != 0 {
                write!(f, "{}M", self.minutes)?;
            }
            if millis != 0 {
                write!(f, "{}S", millis as f64 / 1000.0)?;
            }
        } else if self.is_zero() {
            write!(f, "T0S")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn years_and_days() {
        let span = Timespan {
            years: 2,
            days: 10,
            ..Default::default()
        };
        assert_eq!(span.after(at(1900, 2, 1, 0, 0, 0)).unwrap(), at(1902, 2, 11, 0, 0, 0));
    }

    #[test]
    fn month_overflow_normalises() {
        let one_month = Timespan::months(1);
        assert_eq!(one_month.after(at(2023, 1, 31, 12, 0, 0)).unwrap(), at(2023, 3, 3, 12, 0, 0));
        assert_eq!(one_month.after(at(2024, 1, 31, 12, 0, 0)).unwrap(), at(2024, 3, 2, 12, 0, 0));
        assert_eq!(Timespan::months(-13).after(at(2024, 1, 15, 0, 0, 0)).unwrap(), at(2022, 12, 15, 0, 0, 0));
    }

    #[test]
    fn time_fields_carry_over() {
        let span = Timespan {
            hours: 25,
            minutes: 61,
            seconds: -1,
            milliseconds: 1500,
            ..Default::default()
        };
        let end = span.after(at(2020, 12, 31, 0, 0, 0)).unwrap();
        assert_eq!(end, at(2021, 1, 1, 2, 1, 0) + TimeDelta::milliseconds(500));
    }

    #[test]
    fn timestamps() {
        // 2021-01-01T00:00:00Z
        let start = 1_609_459_200_000.0;
        let end = Timespan::days(1).after_timestamp(start).unwrap();
        assert_eq!(end, start + 86_400_000.0);
        assert_matches!(Timespan::days(1).after_timestamp(f64::NAN), Err(Error::DateOverflow));
    }

    #[test]
    fn overflow() {
        assert_matches!(
            Timespan::years(i32::MAX).after(at(2000, 1, 1, 0, 0, 0)),
            Err(Error::DateOverflow)
        );
        assert_matches!(
            Timespan::days(i64::MAX).after(at(2000, 1, 1, 0, 0, 0)),
            Err(Error::DateOverflow)
        );
    }

    #[test]
    fn spans_from_toml() {
        let span: Timespan = toml::from_str("months = 1\ndays = -2").unwrap();
        assert_eq!(
            span,
            Timespan {
                months: 1,
                days: -2,
                ..Default::default()
            }
        );
        assert_eq!(span.after(at(2023, 1, 31, 0, 0, 0)).unwrap(), at(2023, 3, 1, 0, 0, 0));
        assert_eq!(serde_json::to_value(span).unwrap()["days"], -2);
    }

    #[test]
    fn display() {
        let span = Timespan {
            years: 1,
            days: 10,
            hours: 3,
            milliseconds: 500,
            ..Default::default()
        };
        assert_eq!(span.to_string(), "P1Y10DT3H0.5S");
        assert_eq!(Timespan::default().to_string(), "PT0S");
    }
}
