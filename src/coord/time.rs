//! The time coordinate axis.

use chrono::{DateTime, Utc};

use crate::{
    codetables::{Name, grib1::TimeUnit},
    error::GribError,
    record::GridRecord,
    time::{offset_count, offset_date_time},
};

/// A position on the time axis.
///
/// Two records sharing a valid time but spanning different interval lengths
/// are distinct axis points, so identity is the full pair. Instants have an
/// interval length of zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeCoordValue {
    pub valid_time: DateTime<Utc>,
    pub interval_length: i32,
}

/// The sorted, deduplicated time axis of a record list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeCoord {
    unit_name: String,
    unit: Option<TimeUnit>,
    is_interval: bool,
    ref_date_differs: bool,
    values: Vec<TimeCoordValue>,
    constant_interval: Option<i32>,
}

impl TimeCoord {
    pub fn from_records(records: &[&GridRecord]) -> Result<Self, GribError> {
        let first = records.first().ok_or_else(|| {
            GribError::OperationError("cannot build a time axis from an empty record list".into())
        })?;
        let unit_name = first.time_unit_name();
        let unit = match first.time_unit() {
            Name(unit) => Some(unit),
            _ => None,
        };
        let is_interval = records.iter().any(|r| r.is_interval());
        let ref_date_differs = records.iter().any(|r| r.ref_time() != first.ref_time());

        let mut values = records
            .iter()
            .map(|r| Self::value_of(r, unit))
            .collect::<Result<Vec<_>, _>>()?;
        values.sort_unstable();
        values.dedup();

        // A single interval length shared by every interval point allows the
        // axis to carry one scalar instead of per-point bounds. Zero-length
        // intervals occur in real data and are kept on the axis but ignored
        // here.
        let mut constant = None;
        let mut mixed = false;
        for value in &values {
            match (value.interval_length, constant) {
                (0, _) => {}
                (len, None) => constant = Some(len),
                (len, Some(c)) if c != len => mixed = true,
                _ => {}
            }
        }
        let constant_interval = if mixed { None } else { constant };

        Ok(Self {
            unit_name,
            unit,
            is_interval,
            ref_date_differs,
            values,
            constant_interval,
        })
    }

    /// The axis position a record maps to.
    ///
    /// Interval lengths are re-expressed in the axis unit when the record's
    /// unit differs, anchored at the record's own reference date.
    fn value_of(record: &GridRecord, axis_unit: Option<TimeUnit>) -> Result<TimeCoordValue, GribError> {
        let valid_time = record.valid_time()?;
        let interval_length = match record.interval() {
            None => 0,
            Some((start, end)) => match (record.time_unit(), axis_unit) {
                (Name(from), Some(to)) if from != to => {
                    let start_date = offset_date_time(record.ref_time(), start, from)?;
                    let end_date = offset_date_time(record.ref_time(), end, from)?;
                    offset_count(start_date, end_date, to)?
                }
                _ => end - start,
            },
        };
        Ok(TimeCoordValue {
            valid_time,
            interval_length,
        })
    }

    pub fn value_for(&self, record: &GridRecord) -> Result<TimeCoordValue, GribError> {
        Self::value_of(record, self.unit)
    }

    pub fn index_of(&self, record: &GridRecord) -> Option<usize> {
        let value = Self::value_of(record, self.unit).ok()?;
        self.values.binary_search(&value).ok()
    }

    /// Whether a new batch of records is compatible with this axis, i.e.
    /// whether their records could be merged into the variable that owns it.
    ///
    /// All records must carry the axis's unit string and interval-ness; for
    /// interval axes the batch must reproduce the axis point set exactly.
    pub fn matches(&self, records: &[&GridRecord]) -> bool {
        if records.iter().any(|r| r.time_unit_name() != self.unit_name) {
            return false;
        }
        let batch_is_interval = records.iter().any(|r| r.is_interval());
        if batch_is_interval != self.is_interval {
            return false;
        }
        if !self.is_interval {
            return true;
        }
        let Ok(mut values) = records
            .iter()
            .map(|r| Self::value_of(r, self.unit))
            .collect::<Result<Vec<_>, _>>()
        else {
            return false;
        };
        values.sort_unstable();
        values.dedup();
        values == self.values
    }

    pub fn unit_name(&self) -> &str {
        &self.unit_name
    }

    pub fn is_interval(&self) -> bool {
        self.is_interval
    }

    /// Whether the records the axis was built from disagree on their
    /// reference date.
    pub fn ref_date_differs(&self) -> bool {
        self.ref_date_differs
    }

    pub fn values(&self) -> &[TimeCoordValue] {
        &self.values
    }

    /// The single interval length shared by every interval point, if there
    /// is one.
    pub fn constant_interval(&self) -> Option<i32> {
        self.constant_interval
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
