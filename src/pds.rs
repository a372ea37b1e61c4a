//! Product Definition Section decoding.

pub mod grib2;

use chrono::{DateTime, Utc};

use crate::{
    codetables::{Code, Num, grib1::TimeUnit},
    error::{GribError, ParseError},
    reader::GribRead,
    record::Level,
    time::{TimeRange, create_date_time},
};

/// Octets 1-28 of a GRIB1 PDS are a fixed layout; anything beyond is a
/// centre-specific extension.
const GRIB1_PDS_FIXED_SIZE: usize = 28;

/// A decoded GRIB1 Product Definition Section.
///
/// The raw section octets are retained in full (including centre-specific
/// extensions) and exposed through [`payload`](Self::payload) for
/// octet-oriented access; the structured accessors cover the fixed layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Grib1ProductDefinition {
    payload: Box<[u8]>,
    table_version: u8,
    center_id: u8,
    generating_process: u8,
    grid_id: u8,
    gds_present: bool,
    bms_present: bool,
    parameter_number: u8,
    level: Level,
    ref_time: DateTime<Utc>,
    time_unit: Code<TimeUnit, u8>,
    time_range: TimeRange,
    subcenter_id: u8,
    decimal_scale_factor: i32,
    length_error: bool,
}

impl Grib1ProductDefinition {
    /// Decodes a PDS from a reader positioned at the start of the section.
    ///
    /// On return the reader is positioned at the end of the section as
    /// claimed by the 3-octet length field, regardless of whether the field
    /// reads landed there; a mismatch is recorded as
    /// [`length_error`](Self::length_error), not an error. A section too
    /// short for the fixed layout or extending past the end of the data
    /// fails without interpreting any field.
    pub fn read_from<R: GribRead + ?Sized>(reader: &mut R) -> Result<Self, GribError> {
        let section_start = reader.position()?;
        let length = reader.read_uint(3)? as usize;
        if length < GRIB1_PDS_FIXED_SIZE {
            return Err(ParseError::TruncatedSection {
                offset: section_start as usize,
                length,
            }
            .into());
        }
        let section_end = section_start + length as u64;

        // Keep the whole section for octet-oriented access, then re-read the
        // fixed fields in order.
        reader.seek_to(section_start)?;
        let payload = reader.read_octets(length)?;
        reader.seek_to(section_start + 3)?;

        let table_version = reader.read_u8()?;
        let center_id = reader.read_u8()?;
        let generating_process = reader.read_u8()?;
        let grid_id = reader.read_u8()?;
        let exists = reader.read_u8()?;
        let gds_present = exists & 0x80 != 0;
        let bms_present = exists & 0x40 != 0;
        let parameter_number = reader.read_u8()?;

        let level_type = reader.read_u8()?;
        let level_octet11 = reader.read_u8()?;
        let level_octet12 = reader.read_u8()?;
        let level = Level::from_octets(level_type, level_octet11, level_octet12);

        let year = reader.read_u8()?;
        let month = reader.read_u8()?;
        let day = reader.read_u8()?;
        let hour = reader.read_u8()?;
        let minute = reader.read_u8()?;

        let time_unit = TimeUnit::from_grib1_octet(reader.read_u8()?);
        if let Num(n) = time_unit {
            log::warn!("PDS time unit {n} is not yet supported");
        }

        let p1 = reader.read_u8()?;
        let p2 = reader.read_u8()?;
        let time_range = TimeRange::from_octets(reader.read_u8()?, p1, p2);

        let _averaging_included = reader.read_uint(2)?;
        let _averaging_missing = reader.read_u8()?;

        // Octet 25 carries the century of the reference time, offset by one;
        // zero means "unspecified" and defaults to the 20th century.
        let mut century = i32::from(reader.read_u8()?) - 1;
        if century == -1 {
            century = 20;
        }

        let subcenter_id = reader.read_u8()?;
        let decimal_scale_factor = reader.read_int(2)?;

        // Resynchronize before interpreting anything further, so a decode
        // problem in this section cannot corrupt the position for siblings.
        let length_error = reader.position()? != section_end;
        reader.seek_to(section_end)?;

        let ref_time = create_date_time(
            century * 100 + i32::from(year),
            month.into(),
            day.into(),
            hour.into(),
            minute.into(),
            0,
        )?;

        Ok(Self {
            payload,
            table_version,
            center_id,
            generating_process,
            grid_id,
            gds_present,
            bms_present,
            parameter_number,
            level,
            ref_time,
            time_unit,
            time_range,
            subcenter_id,
            decimal_scale_factor,
            length_error,
        })
    }

    /// The raw section octets, length octets included.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    pub fn table_version(&self) -> u8 {
        self.table_version
    }

    pub fn center_id(&self) -> u8 {
        self.center_id
    }

    pub fn subcenter_id(&self) -> u8 {
        self.subcenter_id
    }

    /// Generating process id (table A of the originating centre).
    pub fn generating_process(&self) -> u8 {
        self.generating_process
    }

    pub fn grid_id(&self) -> u8 {
        self.grid_id
    }

    pub fn gds_present(&self) -> bool {
        self.gds_present
    }

    pub fn bms_present(&self) -> bool {
        self.bms_present
    }

    pub fn parameter_number(&self) -> u8 {
        self.parameter_number
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn ref_time(&self) -> DateTime<Utc> {
        self.ref_time
    }

    pub fn time_unit(&self) -> Code<TimeUnit, u8> {
        self.time_unit
    }

    pub fn time_range(&self) -> &TimeRange {
        &self.time_range
    }

    pub fn forecast_time(&self) -> i32 {
        self.time_range.forecast_time
    }

    /// Exponent for unpacking quantized data values; consumed by the
    /// data-unpacking stage.
    pub fn decimal_scale_factor(&self) -> i32 {
        self.decimal_scale_factor
    }

    /// Whether the fixed-field reads failed to land exactly on the claimed
    /// section end.
    pub fn length_error(&self) -> bool {
        self.length_error
    }

    /// The ensemble member identity, when the centre-specific extension
    /// carries one (NCEP encodes it in octets 41-43).
    pub fn ensemble_member(&self) -> Option<crate::coord::EnsembleMember> {
        if self.center_id == 7 && self.subcenter_id == 2 && self.payload.len() >= 43 {
            Some(crate::coord::EnsembleMember {
                number: i32::from(self.payload[41]),
                member_type: i32::from(self.payload[40]),
            })
        } else {
            None
        }
    }
}
