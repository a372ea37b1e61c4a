//! Interpretation of GRIB1 time-range indicators and calendar-exact
//! forecast-offset arithmetic.

use chrono::{DateTime, Datelike, Duration, Months, Utc};

use crate::{
    codetables::{
        Code, Name, Num,
        grib1::{TimeRangeIndicator, TimeUnit},
    },
    error::GribError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operand {
    Zero,
    P1,
    P2,
    NegP1,
    NegP2,
}

impl Operand {
    fn eval(self, p1: i32, p2: i32) -> i32 {
        match self {
            Self::Zero => 0,
            Self::P1 => p1,
            Self::P2 => p2,
            Self::NegP1 => -p1,
            Self::NegP2 => -p2,
        }
    }
}

struct TimeRangeDescriptor {
    description: &'static str,
    forecast_time: Operand,
    interval: Option<(Operand, Operand)>,
}

/// The finite interpretation table for code table 5. Forecast time is always
/// the end of the range the product is valid for.
fn descriptor(tri: TimeRangeIndicator) -> &'static TimeRangeDescriptor {
    use Operand::*;
    use TimeRangeIndicator::*;
    match tri {
        ForecastAt => &TimeRangeDescriptor {
            description: "product valid at RT + P1",
            forecast_time: P1,
            interval: None,
        },
        AnalysisAt => &TimeRangeDescriptor {
            description: "product valid for RT, P1=0",
            forecast_time: Zero,
            interval: None,
        },
        ValidityPeriod => &TimeRangeDescriptor {
            description: "product valid from (RT + P1) to (RT + P2)",
            forecast_time: P2,
            interval: Some((P1, P2)),
        },
        Average => &TimeRangeDescriptor {
            description: "product is an average between (RT + P1) to (RT + P2)",
            forecast_time: P2,
            interval: Some((P1, P2)),
        },
        Accumulation => &TimeRangeDescriptor {
            description: "product is an accumulation between (RT + P1) to (RT + P2)",
            forecast_time: P2,
            interval: Some((P1, P2)),
        },
        Difference => &TimeRangeDescriptor {
            description: "product is the difference (RT + P2) - (RT + P1)",
            forecast_time: P2,
            interval: Some((P1, P2)),
        },
        AverageBeforeReference => &TimeRangeDescriptor {
            description: "product is an average from (RT - P1) to (RT - P2)",
            forecast_time: NegP2,
            interval: Some((NegP1, NegP2)),
        },
        AverageAroundReference => &TimeRangeDescriptor {
            description: "product is an average from (RT - P1) to (RT + P2)",
            forecast_time: P2,
            interval: Some((NegP1, P2)),
        },
        ForecastAtLong => &TimeRangeDescriptor {
            description: "product valid at RT + P1",
            forecast_time: P1,
            interval: None,
        },
        ClimatologicalMean => &TimeRangeDescriptor {
            description: "mean value from RT to (RT + P2)",
            forecast_time: P2,
            interval: Some((Zero, P2)),
        },
        AverageOfForecasts => &TimeRangeDescriptor {
            description: "Average of N forecasts, forecast period of P1, reference intervals of P2",
            forecast_time: P1,
            interval: None,
        },
        AverageOfAnalyses => &TimeRangeDescriptor {
            description: "Average of N uninitialized analyses, starting at the reference time, \
                          at intervals of P2",
            forecast_time: Zero,
            interval: Some((Zero, P2)),
        },
        AccumulationOfAnalyses => &TimeRangeDescriptor {
            description: "Accumulation of N uninitialized analyses, starting at the reference \
                          time, at intervals of P2",
            forecast_time: Zero,
            interval: Some((Zero, P2)),
        },
    }
}

/// The decoded octets 19-21 of a GRIB1 PDS: the period octets P1/P2 and the
/// time-range indicator that assigns them meaning.
///
/// `forecast_time`, interval-ness, and the interval bounds are fully
/// determined by the indicator and P1/P2; this type is the single source of
/// truth for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeRange {
    pub indicator: Code<TimeRangeIndicator, u8>,
    pub p1: i32,
    pub p2: i32,
    /// Valid-time offset from the reference time, in the PDS time unit.
    pub forecast_time: i32,
}

impl TimeRange {
    /// Interprets the raw P1/P2/indicator octets.
    ///
    /// Indicator 10 reinterprets P1 and P2 as one 2-octet P1 before anything
    /// else is derived. Unsupported indicators are kept as raw numbers with a
    /// forecast time of 0 and a logged warning.
    pub fn from_octets(code: u8, p1: u8, p2: u8) -> Self {
        let indicator: Code<TimeRangeIndicator, u8> = TimeRangeIndicator::try_from(code).into();
        let (p1, p2) = match indicator {
            Name(TimeRangeIndicator::ForecastAtLong) => {
                ((i32::from(p1) << 8) | i32::from(p2), 0)
            }
            _ => (i32::from(p1), i32::from(p2)),
        };
        let forecast_time = match indicator {
            Name(tri) => descriptor(tri).forecast_time.eval(p1, p2),
            Num(n) => {
                log::warn!("time range indicator {n} is not yet supported");
                0
            }
        };
        Self {
            indicator,
            p1,
            p2,
            forecast_time,
        }
    }

    pub fn description(&self) -> Option<&'static str> {
        match self.indicator {
            Name(tri) => Some(descriptor(tri).description),
            Num(_) => None,
        }
    }

    /// Whether the product is a statistically processed period rather than an
    /// instant.
    pub fn is_interval(&self) -> bool {
        self.interval().is_some()
    }

    /// The `[start, end)` offsets of the processed period, in the PDS time
    /// unit.
    pub fn interval(&self) -> Option<(i32, i32)> {
        match self.indicator {
            Name(tri) => descriptor(tri)
                .interval
                .map(|(start, end)| (start.eval(self.p1, self.p2), end.eval(self.p1, self.p2))),
            Num(_) => None,
        }
    }

    pub fn interval_length(&self) -> i32 {
        match self.interval() {
            Some((start, end)) => end - start,
            None => 0,
        }
    }
}

/// Applies an offset of `value` units to `base`.
///
/// Fixed-width units go through second arithmetic; month-based units (month,
/// year, decade, normal, century) go through calendar-month arithmetic so
/// that month- and year-length irregularities cannot introduce drift.
pub fn offset_date_time(
    base: DateTime<Utc>,
    value: i32,
    unit: TimeUnit,
) -> Result<DateTime<Utc>, GribError> {
    if let Some(secs) = unit.fixed_seconds() {
        Ok(base + Duration::seconds(secs * i64::from(value)))
    } else if let Some(months) = unit.months() {
        let total = i64::from(months) * i64::from(value);
        let shifted = if total >= 0 {
            base.checked_add_months(Months::new(total as u32))
        } else {
            base.checked_sub_months(Months::new((-total) as u32))
        };
        shifted.ok_or_else(|| {
            GribError::InvalidValueError(format!("offset of {value} {unit:?} from {base} overflows"))
        })
    } else {
        Err(GribError::InternalDataError)
    }
}

/// Re-expresses an offset given in `from` units as a whole count of `to`
/// units, anchored at `base`.
///
/// The anchor must be the reference date of the record that carried the
/// offset; anchoring at any other date changes the answer for month-based
/// units.
pub fn convert_offset(
    base: DateTime<Utc>,
    value: i32,
    from: TimeUnit,
    to: TimeUnit,
) -> Result<i32, GribError> {
    if from == to {
        return Ok(value);
    }
    let target = offset_date_time(base, value, from)?;
    offset_count(base, target, to)
}

pub(crate) fn offset_count(
    base: DateTime<Utc>,
    target: DateTime<Utc>,
    unit: TimeUnit,
) -> Result<i32, GribError> {
    if let Some(secs) = unit.fixed_seconds() {
        Ok(((target - base).num_seconds() / secs) as i32)
    } else if let Some(months) = unit.months() {
        Ok(months_between(base, target) / months)
    } else {
        Err(GribError::InternalDataError)
    }
}

fn months_between(a: DateTime<Utc>, b: DateTime<Utc>) -> i32 {
    (b.year() - a.year()) * 12 + (b.month() as i32 - a.month() as i32)
}

#[inline]
pub(crate) fn create_date_time(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
) -> Result<DateTime<Utc>, GribError> {
    use chrono::{LocalResult, TimeZone};
    let result = Utc.with_ymd_and_hms(year, month, day, hour, minute, second);
    if let LocalResult::None = result {
        Err(GribError::InvalidValueError(format!(
            "invalid date time: {year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02}"
        )))
    } else {
        Ok(result.unwrap())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    macro_rules! test_forecast_time_table {
        ($(($name:ident, $code:expr, $p1:expr, $p2:expr, $expected:expr),)*) => ($(
            #[test]
            fn $name() {
                let range = TimeRange::from_octets($code, $p1, $p2);
                assert_eq!(range.forecast_time, $expected);
            }
        )*);
    }

    test_forecast_time_table! {
        (forecast_time_for_code_0, 0, 5, 0, 5),
        (forecast_time_for_code_1, 1, 0, 0, 0),
        (forecast_time_for_code_2, 2, 0, 6, 6),
        (forecast_time_for_code_3, 3, 0, 6, 6),
        (forecast_time_for_code_4, 4, 6, 12, 12),
        (forecast_time_for_code_5, 5, 6, 12, 12),
        (forecast_time_for_code_6, 6, 12, 6, -6),
        (forecast_time_for_code_7, 7, 12, 6, 6),
        (forecast_time_for_code_51, 51, 0, 3, 3),
        (forecast_time_for_code_113, 113, 6, 12, 6),
        (forecast_time_for_code_123, 123, 0, 6, 0),
        (forecast_time_for_code_124, 124, 0, 6, 0),
    }

    #[test]
    fn code_10_combines_period_octets() {
        let range = TimeRange::from_octets(10, 0x01, 0x2c);
        assert_eq!(range.p1, 300);
        assert_eq!(range.p2, 0);
        assert_eq!(range.forecast_time, 300);
        assert!(!range.is_interval());
    }

    #[test]
    fn unsupported_code_defaults_forecast_time() {
        let range = TimeRange::from_octets(118, 3, 9);
        assert_eq!(range.indicator, Num(118));
        assert_eq!(range.forecast_time, 0);
        assert_eq!(range.description(), None);
        assert!(!range.is_interval());
    }

    #[test]
    fn interval_bounds() {
        assert_eq!(TimeRange::from_octets(4, 6, 12).interval(), Some((6, 12)));
        assert_eq!(TimeRange::from_octets(6, 12, 6).interval(), Some((-12, -6)));
        assert_eq!(TimeRange::from_octets(7, 12, 6).interval(), Some((-12, 6)));
        assert_eq!(TimeRange::from_octets(51, 0, 3).interval(), Some((0, 3)));
        assert_eq!(TimeRange::from_octets(0, 5, 0).interval(), None);
    }

    #[test]
    fn interval_length_of_instant_is_zero() {
        assert_eq!(TimeRange::from_octets(0, 5, 0).interval_length(), 0);
        assert_eq!(TimeRange::from_octets(4, 6, 12).interval_length(), 6);
    }

    #[test]
    fn fixed_unit_offsets() -> Result<(), GribError> {
        let base = Utc.with_ymd_and_hms(1972, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(
            offset_date_time(base, 6, TimeUnit::Hour)?,
            Utc.with_ymd_and_hms(1972, 1, 1, 6, 0, 0).unwrap()
        );
        assert_eq!(
            offset_date_time(base, -2, TimeUnit::TwelveHours)?,
            Utc.with_ymd_and_hms(1971, 12, 31, 0, 0, 0).unwrap()
        );
        Ok(())
    }

    #[test]
    fn month_offsets_follow_the_calendar() -> Result<(), GribError> {
        let base = Utc.with_ymd_and_hms(2004, 1, 31, 0, 0, 0).unwrap();
        // clamped to the leap-February end, not 31 days later
        assert_eq!(
            offset_date_time(base, 1, TimeUnit::Month)?,
            Utc.with_ymd_and_hms(2004, 2, 29, 0, 0, 0).unwrap()
        );
        Ok(())
    }

    #[test]
    fn offset_conversion_is_anchored() -> Result<(), GribError> {
        let january = Utc.with_ymd_and_hms(2004, 1, 1, 0, 0, 0).unwrap();
        let february = Utc.with_ymd_and_hms(2004, 2, 1, 0, 0, 0).unwrap();
        assert_eq!(convert_offset(january, 1, TimeUnit::Month, TimeUnit::Hour)?, 744);
        assert_eq!(convert_offset(february, 1, TimeUnit::Month, TimeUnit::Hour)?, 696);
        assert_eq!(convert_offset(january, 48, TimeUnit::Hour, TimeUnit::Day)?, 2);
        Ok(())
    }

    #[test]
    fn conversion_to_months_counts_whole_periods() -> Result<(), GribError> {
        let base = Utc.with_ymd_and_hms(2003, 11, 1, 0, 0, 0).unwrap();
        assert_eq!(convert_offset(base, 3, TimeUnit::Month, TimeUnit::Year)?, 0);
        assert_eq!(convert_offset(base, 24, TimeUnit::Month, TimeUnit::Year)?, 2);
        Ok(())
    }
}
