//! GRIB1 code tables used by PDS decoding.

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::codetables::Code;

/// Code table 4: unit of the forecast time period (PDS octet 18).
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum TimeUnit {
    Minute = 0,
    Hour = 1,
    Day = 2,
    Month = 3,
    Year = 4,
    Decade = 5,
    Normal = 6,
    Century = 7,
    ThreeHours = 10,
    SixHours = 11,
    TwelveHours = 12,
    Second = 254,
}

impl TimeUnit {
    /// The unit string used for time-axis matching.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Minute => "minute",
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Month => "month",
            Self::Year => "1year",
            Self::Decade => "decade",
            // A "normal" is 30 years; the original tables expose it with a
            // day unit string and that string is load-bearing for axis
            // matching.
            Self::Normal => "day",
            Self::Century => "century",
            Self::ThreeHours => "3hours",
            Self::SixHours => "6hours",
            Self::TwelveHours => "12hours",
            Self::Second => "second",
        }
    }

    /// Length in seconds for fixed-width units; `None` for units that only
    /// exist as calendar periods.
    pub(crate) fn fixed_seconds(&self) -> Option<i64> {
        match self {
            Self::Second => Some(1),
            Self::Minute => Some(60),
            Self::Hour => Some(3600),
            Self::ThreeHours => Some(3 * 3600),
            Self::SixHours => Some(6 * 3600),
            Self::TwelveHours => Some(12 * 3600),
            Self::Day => Some(86400),
            _ => None,
        }
    }

    /// Calendar months per unit for month-based units.
    pub(crate) fn months(&self) -> Option<i32> {
        match self {
            Self::Month => Some(1),
            Self::Year => Some(12),
            Self::Decade => Some(120),
            Self::Normal => Some(360),
            Self::Century => Some(1200),
            _ => None,
        }
    }

    pub fn from_grib1_octet(octet: u8) -> Code<Self, u8> {
        Self::try_from(octet).into()
    }

    /// GRIB2 code table 4.4 is identical except that `13` denotes seconds.
    pub fn from_grib2_octet(octet: u8) -> Code<Self, u8> {
        if octet == 13 {
            Code::Name(Self::Second)
        } else {
            Self::try_from(octet).into()
        }
    }
}

/// Code table 5: time range indicator (PDS octet 21).
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum TimeRangeIndicator {
    ForecastAt = 0,
    AnalysisAt = 1,
    ValidityPeriod = 2,
    Average = 3,
    Accumulation = 4,
    Difference = 5,
    AverageBeforeReference = 6,
    AverageAroundReference = 7,
    ForecastAtLong = 10,
    ClimatologicalMean = 51,
    AverageOfForecasts = 113,
    AverageOfAnalyses = 123,
    AccumulationOfAnalyses = 124,
}

/// Code table 3: type of level or layer (PDS octet 10).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelDescriptor {
    pub name: &'static str,
    pub is_layer: bool,
}

/// Looks up a level type. Unknown codes degrade to an empty name and
/// single-level semantics rather than an error.
pub fn lookup_level(code: u8) -> LevelDescriptor {
    LevelDescriptor {
        name: level_name(code),
        is_layer: level_is_layer(code),
    }
}

pub(crate) fn level_is_layer(code: u8) -> bool {
    matches!(
        code,
        101 | 104 | 106 | 108 | 110 | 112 | 114 | 116 | 120 | 121 | 128 | 141 | 236
    )
}

/// Splits level octets 11 and 12 into the one or two values the level type
/// defines, applying the per-type scaling of table 3.
pub(crate) fn level_values(code: u8, octet11: u8, octet12: u8) -> (f64, f64) {
    let combined = f64::from((u16::from(octet11) << 8) | u16::from(octet12));
    let (o11, o12) = (f64::from(octet11), f64::from(octet12));
    match code {
        20 => (combined * 0.01, 0.0),
        100 | 103 | 105 | 109 | 111 | 113 | 115 | 117 | 125 | 126 | 160 => (combined, 0.0),
        107 | 119 => (combined * 0.0001, 0.0),
        // kPa encoded layers come out in hPa
        101 => (o11 * 10.0, o12 * 10.0),
        // hm to m
        104 | 106 => (o11 * 100.0, o12 * 100.0),
        108 | 120 => (o11 * 0.01, o12 * 0.01),
        110 | 112 | 116 | 236 => (o11, o12),
        114 => (475.0 - o11, 475.0 - o12),
        121 => (1100.0 - o11, 1100.0 - o12),
        128 => (1.1 - o11 * 0.001, 1.1 - o12 * 0.001),
        141 => (o11, 1100.0 - o12),
        _ => (0.0, 0.0),
    }
}

fn level_name(code: u8) -> &'static str {
    match code {
        1 => "surface",
        2 => "cloud base level",
        3 => "cloud top level",
        4 => "0 degree isotherm level",
        5 => "condensation level",
        6 => "maximum wind level",
        7 => "tropopause level",
        8 => "nominal atmosphere top",
        9 => "sea bottom",
        20 => "isothermal level",
        100 => "isobaric",
        101 => "layer between two isobaric levels",
        102 => "mean sea level",
        103 => "altitude above MSL",
        104 => "layer between two altitudes above MSL",
        105 => "fixed height above ground",
        106 => "layer between two height levels",
        107 => "sigma level",
        108 => "layer between two sigma layers",
        109 => "hybrid level",
        110 => "layer between two hybrid levels",
        111 => "depth below land surface",
        112 => "layer between two levels below land surface",
        113 => "isentropic theta level",
        114 => "layer between two isentropic layers",
        115 => "level at specified pressure difference from ground to level",
        116 => "layer between pressure differences from ground to levels",
        117 => "potential vorticity surface",
        119 => "eta level",
        120 => "layer between two eta levels",
        121 => "layer between two isobaric surfaces",
        125 => "height above ground high precision",
        126 => "isobaric level",
        128 => "layer between two sigma levels",
        141 => "layer between two isobaric surfaces",
        160 => "depth below sea level",
        200 => "entire atmosphere layer",
        201 => "entire ocean layer",
        204 => "highest tropospheric freezing level",
        206 => "grid scale cloud bottom level",
        207 => "grid scale cloud top level",
        209 => "boundary layer cloud bottom level",
        210 => "boundary layer cloud top level",
        211 => "boundary layer cloud layer",
        212 => "low cloud bottom level",
        213 => "low cloud top level",
        214 => "low cloud layer",
        215 => "cloud ceiling",
        220 => "planetary boundary layer",
        222 => "middle cloud bottom level",
        223 => "middle cloud top level",
        224 => "middle cloud layer",
        232 => "high cloud bottom level",
        233 => "high cloud top level",
        234 => "high cloud layer",
        235 => "ocean isotherm level",
        236 => "layer between two depths below ocean surface",
        237 => "bottom of ocean mixed layer",
        238 => "bottom of ocean isothermal layer",
        242 => "convective cloud bottom level",
        243 => "convective cloud top level",
        244 => "convective cloud layer",
        245 => "lowest level of the wet bulb zero",
        246 => "maximum equivalent potential temperature level",
        247 => "equilibrium level",
        248 => "shallow convective cloud bottom level",
        249 => "shallow convective cloud top level",
        251 => "deep convective cloud bottom level",
        252 => "deep convective cloud top level",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use num_enum::TryFromPrimitiveError;

    use super::*;
    use crate::codetables::{Name, Num};

    #[test]
    fn time_unit_conversion() {
        assert_eq!(TimeUnit::try_from(1u8), Ok(TimeUnit::Hour));
        assert_eq!(TimeUnit::try_from(10u8), Ok(TimeUnit::ThreeHours));
        assert_eq!(
            TimeUnit::try_from(13u8),
            Err(TryFromPrimitiveError { number: 13 })
        );
    }

    #[test]
    fn time_unit_from_octets() {
        assert_eq!(TimeUnit::from_grib1_octet(254), Name(TimeUnit::Second));
        assert_eq!(TimeUnit::from_grib2_octet(13), Name(TimeUnit::Second));
        assert_eq!(TimeUnit::from_grib1_octet(13), Num(13));
        assert_eq!(TimeUnit::from_grib1_octet(99), Num(99));
    }

    macro_rules! test_level_values {
        ($(($name:ident, $code:expr, $o11:expr, $o12:expr, $expected:expr),)*) => ($(
            #[test]
            fn $name() {
                assert_eq!(level_values($code, $o11, $o12), $expected);
            }
        )*);
    }

    test_level_values! {
        (isobaric_level_combines_octets, 100, 0x03, 0xe8, (1000.0, 0.0)),
        (isothermal_level_is_centikelvin, 20, 0x75, 0x30, (300.0, 0.0)),
        (isobaric_layer_scales_kpa, 101, 10, 50, (100.0, 500.0)),
        (height_layer_scales_hm, 106, 3, 1, (300.0, 100.0)),
        (hybrid_layer_keeps_octets, 110, 1, 2, (1.0, 2.0)),
        (unknown_level_has_no_values, 77, 12, 34, (0.0, 0.0)),
    }

    #[test]
    fn sigma_level_is_ten_thousandths() {
        let (value1, value2) = level_values(107, 0x26, 0x94);
        assert!((value1 - 0.9876).abs() < 1e-12);
        assert_eq!(value2, 0.0);
    }

    #[test]
    fn level_lookup() {
        assert_eq!(
            lookup_level(100),
            LevelDescriptor { name: "isobaric", is_layer: false }
        );
        assert_eq!(
            lookup_level(101),
            LevelDescriptor {
                name: "layer between two isobaric levels",
                is_layer: true
            }
        );
        assert_eq!(lookup_level(77), LevelDescriptor { name: "", is_layer: false });
    }
}
