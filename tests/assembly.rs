//! End-to-end scenarios over synthetic PDS byte blocks.

use std::io::Cursor;

use chrono::{TimeZone, Utc};
use grib_grid::{
    GribError, GribRead, Grib1ProductDefinition, GridCollection, GridRecord, TimeCoord,
    WmoStandardTable,
};

/// A fixed-layout GRIB1 PDS with the fields the scenarios vary.
fn pds_block(
    century_octet: u8,
    year: u8,
    time_unit: u8,
    p1: u8,
    p2: u8,
    time_range_indicator: u8,
) -> Vec<u8> {
    vec![
        0, 0, 28, // length
        3,   // table version
        7,   // centre
        96,  // generating process
        255, // grid id
        0x80, // GDS present
        11,  // parameter: temperature
        100, 0x03, 0xe8, // isobaric 1000
        year, 1, 1, 0, 0, // reference date
        time_unit, p1, p2, time_range_indicator, //
        0, 0, 0, // averaging
        century_octet, 0, // century, subcentre
        0, 0, // decimal scale
    ]
}

fn record(octets: Vec<u8>, data_offset: u64) -> GridRecord {
    let pds = Grib1ProductDefinition::read_from(&mut Cursor::new(octets)).unwrap();
    GridRecord::from_grib1(pds, 1, data_offset)
}

#[test]
fn decode_lands_on_the_reference_scenario() -> Result<(), GribError> {
    let mut reader = Cursor::new(pds_block(20, 72, 1, 5, 0, 0));
    let pds = Grib1ProductDefinition::read_from(&mut reader)?;

    assert_eq!(pds.ref_time(), Utc.with_ymd_and_hms(1972, 1, 1, 0, 0, 0).unwrap());
    assert_eq!(pds.forecast_time(), 5);
    assert_eq!(GribRead::position(&mut reader).unwrap(), 28);
    Ok(())
}

#[test]
fn consecutive_sections_decode_independently() -> Result<(), GribError> {
    // a PDS with a trailing extension, then a clean one; the resync after
    // the first must position the second correctly
    let mut octets = pds_block(20, 72, 1, 5, 0, 0);
    octets[2] = 36;
    octets.extend_from_slice(&[0xaa; 8]);
    let second_start = octets.len() as u64;
    octets.extend_from_slice(&pds_block(21, 4, 1, 9, 0, 0));

    let mut reader = Cursor::new(octets);
    let first = Grib1ProductDefinition::read_from(&mut reader)?;
    assert!(first.length_error());
    assert_eq!(GribRead::position(&mut reader).unwrap(), second_start);

    let second = Grib1ProductDefinition::read_from(&mut reader)?;
    assert!(!second.length_error());
    assert_eq!(second.ref_time(), Utc.with_ymd_and_hms(2004, 1, 1, 0, 0, 0).unwrap());
    assert_eq!(second.forecast_time(), 9);
    Ok(())
}

#[test]
fn two_validity_periods_make_a_two_point_axis() -> Result<(), GribError> {
    let mut collection = GridCollection::new();
    collection.add(record(pds_block(20, 72, 1, 0, 6, 2), 100));
    collection.add(record(pds_block(20, 72, 1, 0, 12, 2), 900));

    let dataset = collection.build(&WmoStandardTable)?;
    assert_eq!(dataset.variables().len(), 1);

    let variable = &dataset.variables()[0];
    let axis = variable.time_coord();
    assert!(axis.is_interval());
    assert_eq!(axis.len(), 2);
    assert_eq!(
        axis.values()[0].valid_time,
        Utc.with_ymd_and_hms(1972, 1, 1, 6, 0, 0).unwrap()
    );
    assert_eq!(
        axis.values()[1].valid_time,
        Utc.with_ymd_and_hms(1972, 1, 1, 12, 0, 0).unwrap()
    );
    assert_eq!(axis.values()[0].interval_length, 6);
    assert_eq!(axis.values()[1].interval_length, 12);
    assert_eq!(axis.constant_interval(), None);

    assert_eq!(variable.parameter().name, "TMP");
    assert_eq!(variable.filled_cell_count(), 2);
    Ok(())
}

#[test]
fn rebuilt_axis_matches_its_own_records() -> Result<(), GribError> {
    let records = [
        record(pds_block(20, 72, 1, 0, 6, 4), 100),
        record(pds_block(20, 72, 1, 6, 12, 4), 900),
    ];
    let refs: Vec<&GridRecord> = records.iter().collect();

    let axis = TimeCoord::from_records(&refs)?;
    assert!(axis.matches(&refs));
    assert_eq!(axis.constant_interval(), Some(6));
    Ok(())
}

#[test]
fn truncated_block_fails_without_reading_garbage() {
    let mut octets = pds_block(20, 72, 1, 5, 0, 0);
    octets.truncate(20);
    octets[2] = 20;

    let result = Grib1ProductDefinition::read_from(&mut Cursor::new(octets));
    assert!(matches!(result, Err(GribError::ParseError(_))));
}
