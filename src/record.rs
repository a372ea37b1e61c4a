//! The per-message record model shared by both GRIB editions.

use chrono::{DateTime, Utc};

use crate::{
    codetables::{
        Code, Name, Num,
        grib1::{LevelDescriptor, TimeUnit, level_values, lookup_level},
    },
    coord::{EnsembleMember, LevelValue},
    error::GribError,
    pds::{Grib1ProductDefinition, grib2::Grib2ProductDefinition},
    time::{TimeRange, offset_date_time},
};

/// A level or layer specification from a PDS.
///
/// `value2` is zero unless the level type denotes a layer bounded by two
/// values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Level {
    type_code: u8,
    value1: f64,
    value2: f64,
}

impl Level {
    pub fn new(type_code: u8, value1: f64, value2: f64) -> Self {
        Self {
            type_code,
            value1,
            value2,
        }
    }

    /// Builds a level from PDS octets 10-12, applying the value layout and
    /// scaling that code table 3 defines for the level type.
    pub fn from_octets(type_code: u8, octet11: u8, octet12: u8) -> Self {
        let (value1, value2) = level_values(type_code, octet11, octet12);
        Self::new(type_code, value1, value2)
    }

    pub fn type_code(&self) -> u8 {
        self.type_code
    }

    pub fn value1(&self) -> f64 {
        self.value1
    }

    pub fn value2(&self) -> f64 {
        self.value2
    }

    pub fn descriptor(&self) -> LevelDescriptor {
        lookup_level(self.type_code)
    }

    pub fn is_layer(&self) -> bool {
        self.descriptor().is_layer
    }

    pub(crate) fn coord_value(&self) -> LevelValue {
        LevelValue::new(self.value1, self.value2)
    }
}

/// Identification of the originating centre and its parameter table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OriginatingCenter {
    pub center_id: u16,
    pub subcenter_id: u16,
    pub table_version: u8,
}

/// The edition-tagged product definition of a record.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductDefinition {
    Grib1(Grib1ProductDefinition),
    Grib2(Grib2ProductDefinition),
}

/// The identity shared by all records of one grid variable: parameter,
/// level type, and horizontal grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VariableKey {
    pub grid_id: u64,
    pub parameter_id: u32,
    pub level_type: u8,
}

/// Diagnostic back-tag recorded on a record once it has been absorbed into a
/// grid variable. Not a traversal edge; only used to detect double
/// ownership.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Belongs {
    pub record_index: usize,
    pub variable_index: usize,
}

/// One GRIB message's decoded header metadata, together with the opaque
/// horizontal-grid identity and the byte position of the message's data
/// supplied by the surrounding scan.
#[derive(Debug, Clone, PartialEq)]
pub struct GridRecord {
    pds: ProductDefinition,
    discipline: u8,
    center: OriginatingCenter,
    grid_id: u64,
    data_offset: u64,
    belongs: Option<Belongs>,
}

impl GridRecord {
    pub fn from_grib1(pds: Grib1ProductDefinition, grid_id: u64, data_offset: u64) -> Self {
        let center = OriginatingCenter {
            center_id: pds.center_id().into(),
            subcenter_id: pds.subcenter_id().into(),
            table_version: pds.table_version(),
        };
        Self {
            pds: ProductDefinition::Grib1(pds),
            discipline: 0,
            center,
            grid_id,
            data_offset,
            belongs: None,
        }
    }

    /// GRIB2 records take the discipline from the Indicator Section and the
    /// centre identification from the Identification Section.
    pub fn from_grib2(
        pds: Grib2ProductDefinition,
        discipline: u8,
        center: OriginatingCenter,
        grid_id: u64,
        data_offset: u64,
    ) -> Self {
        Self {
            pds: ProductDefinition::Grib2(pds),
            discipline,
            center,
            grid_id,
            data_offset,
            belongs: None,
        }
    }

    pub fn edition(&self) -> u8 {
        match &self.pds {
            ProductDefinition::Grib1(_) => 1,
            ProductDefinition::Grib2(_) => 2,
        }
    }

    pub fn pds(&self) -> &ProductDefinition {
        &self.pds
    }

    pub fn center(&self) -> OriginatingCenter {
        self.center
    }

    pub fn grid_id(&self) -> u64 {
        self.grid_id
    }

    pub fn data_offset(&self) -> u64 {
        self.data_offset
    }

    pub fn discipline(&self) -> u8 {
        self.discipline
    }

    /// Parameter identity within the originating centre's tables. GRIB2
    /// parameters are composite (discipline, category, number).
    pub fn parameter_id(&self) -> u32 {
        match &self.pds {
            ProductDefinition::Grib1(pds) => pds.parameter_number().into(),
            ProductDefinition::Grib2(pds) => {
                (u32::from(self.discipline) << 16)
                    + (u32::from(pds.parameter_category()) << 8)
                    + u32::from(pds.parameter_number())
            }
        }
    }

    pub fn level(&self) -> &Level {
        match &self.pds {
            ProductDefinition::Grib1(pds) => pds.level(),
            ProductDefinition::Grib2(pds) => pds.level(),
        }
    }

    pub fn ref_time(&self) -> DateTime<Utc> {
        match &self.pds {
            ProductDefinition::Grib1(pds) => pds.ref_time(),
            ProductDefinition::Grib2(pds) => pds.ref_time(),
        }
    }

    pub fn time_unit(&self) -> Code<TimeUnit, u8> {
        match &self.pds {
            ProductDefinition::Grib1(pds) => pds.time_unit(),
            ProductDefinition::Grib2(pds) => pds.time_unit(),
        }
    }

    /// The unit string used for axis matching; unrecognized units keep their
    /// raw code so that they never silently match a known unit.
    pub fn time_unit_name(&self) -> String {
        match self.time_unit() {
            Name(unit) => unit.name().to_owned(),
            Num(n) => format!("unit {n}"),
        }
    }

    pub fn time_range(&self) -> Option<&TimeRange> {
        match &self.pds {
            ProductDefinition::Grib1(pds) => Some(pds.time_range()),
            ProductDefinition::Grib2(_) => None,
        }
    }

    /// Valid-time offset from the reference time, in the record's time unit.
    pub fn forecast_time(&self) -> i32 {
        match &self.pds {
            ProductDefinition::Grib1(pds) => pds.forecast_time(),
            ProductDefinition::Grib2(pds) => pds.forecast_time(),
        }
    }

    pub fn is_interval(&self) -> bool {
        match &self.pds {
            ProductDefinition::Grib1(pds) => pds.time_range().is_interval(),
            ProductDefinition::Grib2(pds) => pds.interval().is_some(),
        }
    }

    /// The `[start, end)` offsets of the processed period, in the record's
    /// time unit.
    pub fn interval(&self) -> Option<(i32, i32)> {
        match &self.pds {
            ProductDefinition::Grib1(pds) => pds.time_range().interval(),
            ProductDefinition::Grib2(pds) => pds
                .interval()
                .map(|intv| (pds.forecast_time(), pds.forecast_time() + intv.length)),
        }
    }

    /// The timestamp the record is valid at; for statistically processed
    /// periods this is the end of the interval.
    pub fn valid_time(&self) -> Result<DateTime<Utc>, GribError> {
        match &self.pds {
            ProductDefinition::Grib1(pds) => match pds.time_unit() {
                Name(unit) => offset_date_time(pds.ref_time(), pds.forecast_time(), unit),
                Num(n) => Err(GribError::InvalidValueError(format!(
                    "cannot compute a valid time with unrecognized time unit {n}"
                ))),
            },
            ProductDefinition::Grib2(pds) => match pds.interval() {
                Some(intv) => Ok(intv.end_time),
                None => match pds.time_unit() {
                    Name(unit) => offset_date_time(pds.ref_time(), pds.forecast_time(), unit),
                    Num(n) => Err(GribError::InvalidValueError(format!(
                        "cannot compute a valid time with unrecognized time unit {n}"
                    ))),
                },
            },
        }
    }

    pub fn decimal_scale_factor(&self) -> i32 {
        match &self.pds {
            ProductDefinition::Grib1(pds) => pds.decimal_scale_factor(),
            ProductDefinition::Grib2(_) => 0,
        }
    }

    pub fn ensemble_member(&self) -> Option<EnsembleMember> {
        match &self.pds {
            ProductDefinition::Grib1(pds) => pds.ensemble_member(),
            ProductDefinition::Grib2(pds) => pds.ensemble_member(),
        }
    }

    pub fn variable_key(&self) -> VariableKey {
        VariableKey {
            grid_id: self.grid_id,
            parameter_id: self.parameter_id(),
            level_type: self.level().type_code(),
        }
    }

    pub fn belongs(&self) -> Option<Belongs> {
        self.belongs
    }

    pub(crate) fn tag_belongs(&mut self, belongs: Belongs) {
        if let Some(prev) = self.belongs {
            log::warn!(
                "record {} is already owned by variable {}; retagging to variable {}",
                prev.record_index,
                prev.variable_index,
                belongs.variable_index
            );
        }
        self.belongs = Some(belongs);
    }
}
