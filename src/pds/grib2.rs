//! GRIB2 Product Definition Section (section 4) decoding for the
//! forecast-at-a-point and statistically-processed-interval template
//! families.

use chrono::{DateTime, Utc};

use crate::{
    codetables::{Code, Name, Num, grib1::TimeUnit},
    coord::EnsembleMember,
    error::{BuildError, GribError, ParseError},
    record::Level,
    time::{convert_offset, create_date_time, offset_date_time},
    utils::{GribInt, grib_int_from_bytes, read_as},
};

/// Templates 4.0/4.1 (instant) and 4.8/4.11 (statistical interval), the
/// ensemble variants being 4.1 and 4.11.
const SUPPORTED_TEMPLATES: [u16; 4] = [0, 1, 8, 11];

/// The statistically-processed period of a GRIB2 interval template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatisticalInterval {
    /// End of the overall interval, from the explicit timestamp octets.
    pub end_time: DateTime<Utc>,
    /// Statistical process code (code table 4.10).
    pub process: u8,
    /// Interval length re-expressed in the section's own time unit,
    /// anchored at the interval start.
    pub length: i32,
}

/// A decoded GRIB2 Product Definition Section.
///
/// The section octets are retained in full; the reference time comes from
/// the Identification Section and must be supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct Grib2ProductDefinition {
    payload: Box<[u8]>,
    template: u16,
    ref_time: DateTime<Utc>,
    parameter_category: u8,
    parameter_number: u8,
    generating_process: u8,
    time_unit: Code<TimeUnit, u8>,
    forecast_time: i32,
    level: Level,
    interval: Option<StatisticalInterval>,
    ensemble: Option<EnsembleMember>,
}

impl Grib2ProductDefinition {
    /// Decodes a section-4 byte block (length octets included).
    pub fn from_payload(payload: Box<[u8]>, ref_time: DateTime<Utc>) -> Result<Self, GribError> {
        if payload.len() < 34 {
            return Err(ParseError::from(BuildError::SectionSizeTooSmall(payload.len())).into());
        }
        let template = read_as!(u16, payload, 7);
        if !SUPPORTED_TEMPLATES.contains(&template) {
            return Err(ParseError::UnsupportedTemplate(template).into());
        }

        let parameter_category = payload[9];
        let parameter_number = payload[10];
        let generating_process = payload[11];

        let time_unit = TimeUnit::from_grib2_octet(payload[17]);
        if let Num(n) = time_unit {
            log::warn!("product definition time unit {n} is not yet supported");
        }
        let forecast_time = grib_int_from_bytes(&payload[18..22]);

        let level = Self::read_surfaces(&payload);

        let ensemble = match template {
            1 | 11 => {
                if payload.len() < 37 {
                    return Err(
                        ParseError::from(BuildError::SectionSizeTooSmall(payload.len())).into()
                    );
                }
                Some(EnsembleMember {
                    number: i32::from(payload[35]),
                    member_type: i32::from(payload[34]),
                })
            }
            _ => None,
        };

        let interval = match template {
            8 => Some(Self::read_interval(&payload, 34, ref_time, forecast_time, time_unit)?),
            11 => Some(Self::read_interval(&payload, 37, ref_time, forecast_time, time_unit)?),
            _ => None,
        };

        Ok(Self {
            payload,
            template,
            ref_time,
            parameter_category,
            parameter_number,
            generating_process,
            time_unit,
            forecast_time,
            level,
            interval,
            ensemble,
        })
    }

    /// Octets 23-34: the two fixed surfaces. A second surface of type 255 is
    /// absent; values are scaled-value x 10^-scale.
    fn read_surfaces(payload: &[u8]) -> Level {
        fn surface_value(scale_octet: u8, value_octets: &[u8]) -> f64 {
            let factor = 10f64.powi(-i32::from(scale_octet.as_grib_int()));
            f64::from(grib_int_from_bytes(value_octets)) * factor
        }

        let surface_type = payload[22];
        let value1 = surface_value(payload[23], &payload[24..28]);
        let value2 = if payload[28] == 255 {
            0.0
        } else {
            surface_value(payload[29], &payload[30..34])
        };
        Level::new(surface_type, value1, value2)
    }

    fn read_interval(
        payload: &[u8],
        base: usize,
        ref_time: DateTime<Utc>,
        forecast_time: i32,
        time_unit: Code<TimeUnit, u8>,
    ) -> Result<StatisticalInterval, GribError> {
        if payload.len() < base + 19 {
            return Err(ParseError::from(BuildError::SectionSizeTooSmall(payload.len())).into());
        }
        let end_time = create_date_time(
            i32::from(read_as!(u16, payload, base)),
            payload[base + 2].into(),
            payload[base + 3].into(),
            payload[base + 4].into(),
            payload[base + 5].into(),
            payload[base + 6].into(),
        )?;
        let process = payload[base + 12];
        let range_unit = TimeUnit::from_grib2_octet(payload[base + 14]);
        let raw_length = grib_int_from_bytes(&payload[base + 15..base + 19]);

        // The range length carries its own unit; re-express it in the
        // section's unit, anchored at the interval start so calendar-length
        // irregularities resolve against the record's own dates.
        let length = match (range_unit, time_unit) {
            (Name(from), Name(to)) if from != to => {
                let start = offset_date_time(ref_time, forecast_time, to)?;
                convert_offset(start, raw_length, from, to)?
            }
            _ => raw_length,
        };

        Ok(StatisticalInterval {
            end_time,
            process,
            length,
        })
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn template(&self) -> u16 {
        self.template
    }

    pub fn ref_time(&self) -> DateTime<Utc> {
        self.ref_time
    }

    pub fn parameter_category(&self) -> u8 {
        self.parameter_category
    }

    pub fn parameter_number(&self) -> u8 {
        self.parameter_number
    }

    pub fn generating_process(&self) -> u8 {
        self.generating_process
    }

    pub fn time_unit(&self) -> Code<TimeUnit, u8> {
        self.time_unit
    }

    pub fn forecast_time(&self) -> i32 {
        self.forecast_time
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn interval(&self) -> Option<&StatisticalInterval> {
        self.interval.as_ref()
    }

    pub fn ensemble_member(&self) -> Option<EnsembleMember> {
        self.ensemble
    }
}

#[cfg(test)]
pub(crate) mod testdata {
    use chrono::{DateTime, Datelike, Timelike, Utc};

    /// Builds a minimal section-4 byte block for the supported templates.
    pub(crate) struct Section4Spec {
        pub template: u16,
        pub category: u8,
        pub number: u8,
        pub time_unit: u8,
        pub forecast_time: u32,
        pub surface_type: u8,
        pub surface_scale: u8,
        pub surface_value: u32,
        pub ensemble: Option<(u8, u8)>,
        pub interval: Option<IntervalSpec>,
    }

    pub(crate) struct IntervalSpec {
        pub end_time: DateTime<Utc>,
        pub process: u8,
        pub unit: u8,
        pub length: u32,
    }

    impl Default for Section4Spec {
        fn default() -> Self {
            Self {
                template: 0,
                category: 0,
                number: 0,
                time_unit: 1,
                forecast_time: 0,
                surface_type: 1,
                surface_scale: 0,
                surface_value: 0,
                ensemble: None,
                interval: None,
            }
        }
    }

    impl Section4Spec {
        pub(crate) fn build(&self) -> Vec<u8> {
            let mut octets = vec![0u8; 34];
            octets[4] = 4;
            octets[7..9].copy_from_slice(&self.template.to_be_bytes());
            octets[9] = self.category;
            octets[10] = self.number;
            octets[17] = self.time_unit;
            octets[18..22].copy_from_slice(&self.forecast_time.to_be_bytes());
            octets[22] = self.surface_type;
            octets[23] = self.surface_scale;
            octets[24..28].copy_from_slice(&self.surface_value.to_be_bytes());
            octets[28] = 255;
            if let Some((member_type, number)) = self.ensemble {
                octets.extend_from_slice(&[member_type, number, 20]);
            }
            if let Some(intv) = &self.interval {
                let end = &intv.end_time;
                octets.extend_from_slice(&(end.year() as u16).to_be_bytes());
                octets.extend_from_slice(&[
                    end.month() as u8,
                    end.day() as u8,
                    end.hour() as u8,
                    end.minute() as u8,
                    end.second() as u8,
                    1, // one time range
                ]);
                octets.extend_from_slice(&0u32.to_be_bytes()); // missing count
                octets.extend_from_slice(&[intv.process, 2, intv.unit]);
                octets.extend_from_slice(&intv.length.to_be_bytes());
                octets.extend_from_slice(&[intv.unit]);
                octets.extend_from_slice(&0u32.to_be_bytes()); // increment
            }
            let length = octets.len() as u32;
            octets[0..4].copy_from_slice(&length.to_be_bytes());
            octets
        }
    }
}
