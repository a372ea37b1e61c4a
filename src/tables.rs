//! External parameter-table lookup.
//!
//! Parameter tables are versioned by originating centre and supplied by the
//! caller; the aggregation driver takes the table as an explicit object so
//! that fixtures can stand in for the real tables.

/// The resolved description of a parameter. Absent table entries yield empty
/// strings rather than an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterEntry {
    pub name: String,
    pub description: String,
    pub unit: String,
}

impl ParameterEntry {
    pub fn new(name: &str, description: &str, unit: &str) -> Self {
        Self {
            name: name.to_owned(),
            description: description.to_owned(),
            unit: unit.to_owned(),
        }
    }
}

pub trait ParameterTable {
    fn parameter(
        &self,
        center_id: u16,
        subcenter_id: u16,
        table_version: u8,
        parameter_id: u32,
    ) -> ParameterEntry;
}

/// Degrades every lookup to empty strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyParameterTable;

impl ParameterTable for EmptyParameterTable {
    fn parameter(&self, _: u16, _: u16, _: u8, _: u32) -> ParameterEntry {
        ParameterEntry::default()
    }
}

/// The parameters of WMO table 2 common to every centre's GRIB1 tables.
/// Centre-specific entries shadow these in a real deployment; lookups that
/// miss degrade to empty strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct WmoStandardTable;

impl ParameterTable for WmoStandardTable {
    fn parameter(&self, _: u16, _: u16, _: u8, parameter_id: u32) -> ParameterEntry {
        let (name, description, unit) = match parameter_id {
            1 => ("PRES", "Pressure", "Pa"),
            2 => ("PRMSL", "Pressure reduced to MSL", "Pa"),
            7 => ("HGT", "Geopotential height", "gpm"),
            11 => ("TMP", "Temperature", "K"),
            17 => ("DPT", "Dew point temperature", "K"),
            33 => ("UGRD", "u-component of wind", "m/s"),
            34 => ("VGRD", "v-component of wind", "m/s"),
            39 => ("VVEL", "Vertical velocity (pressure)", "Pa/s"),
            41 => ("ABSV", "Absolute vorticity", "/s"),
            51 => ("SPFH", "Specific humidity", "kg/kg"),
            52 => ("RH", "Relative humidity", "%"),
            54 => ("PWAT", "Precipitable water", "kg/m^2"),
            59 => ("PRATE", "Precipitation rate", "kg/m^2/s"),
            61 => ("APCP", "Total precipitation", "kg/m^2"),
            63 => ("ACPCP", "Convective precipitation", "kg/m^2"),
            71 => ("TCDC", "Total cloud cover", "%"),
            _ => return ParameterEntry::default(),
        };
        ParameterEntry::new(name, description, unit)
    }
}
