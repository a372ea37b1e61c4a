//! Aggregation of decoded records into grid variables.

use std::{
    collections::HashMap,
    fmt::{self, Display, Formatter},
};

use crate::{
    coord::{EnsCoord, TimeCoord, VertCoord},
    error::GribError,
    record::{Belongs, GridRecord, ProductDefinition, VariableKey},
    tables::ParameterTable,
    variable::GridVariable,
};

/// Accumulates decoded records across one file or a whole collection scan,
/// then assembles one [`GridVariable`] per distinct (parameter, level type,
/// grid) identity.
#[derive(Debug, Default)]
pub struct GridCollection {
    records: Vec<GridRecord>,
}

impl GridCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, record: GridRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[GridRecord] {
        &self.records
    }

    /// Builds the variables.
    ///
    /// Records are grouped by identity in first-seen order; each group's
    /// axes are built, sorted, and finalized, and every record is absorbed
    /// at its coordinate cell. Data-quality trouble (duplicates, unplaceable
    /// ensemble members) never aborts the build; it is logged and totalled
    /// in the dataset's [`ScanReport`].
    pub fn build(mut self, table: &dyn ParameterTable) -> Result<GridDataset, GribError> {
        let mut group_order: Vec<VariableKey> = Vec::new();
        let mut groups: HashMap<VariableKey, Vec<usize>> = HashMap::new();
        for (index, record) in self.records.iter().enumerate() {
            let key = record.variable_key();
            groups
                .entry(key)
                .or_insert_with(|| {
                    group_order.push(key);
                    Vec::new()
                })
                .push(index);
        }

        let mut variables = Vec::with_capacity(group_order.len());
        for (variable_index, key) in group_order.iter().enumerate() {
            let indices = &groups[key];
            let members: Vec<&GridRecord> = indices.iter().map(|&i| &self.records[i]).collect();

            let time = TimeCoord::from_records(&members)?;
            let vert = VertCoord::from_records(&members);
            let ens = EnsCoord::from_records(&members);

            let center = members[0].center();
            let parameter = table.parameter(
                center.center_id,
                center.subcenter_id,
                center.table_version,
                key.parameter_id,
            );

            let mut variable = GridVariable::new(*key, parameter, time, vert, ens);
            for &record_index in indices {
                let record = &self.records[record_index];
                let time_index = variable
                    .time_coord()
                    .index_of(record)
                    .ok_or(GribError::InternalDataError)?;
                let level_index = variable
                    .vert_coord()
                    .index_of(&record.level().coord_value())
                    .ok_or(GribError::InternalDataError)?;
                let ensemble_index = variable
                    .ens_coord()
                    .and_then(|axis| axis.index_of(record));
                variable.absorb(record_index, time_index, level_index, ensemble_index);
                self.records[record_index].tag_belongs(Belongs {
                    record_index,
                    variable_index,
                });
            }
            variables.push(variable);
        }

        let report = ScanReport::tally(&self.records, &variables);
        if report.duplicates > 0 || report.ensemble_misses > 0 {
            log::info!("{report}");
        }

        Ok(GridDataset {
            records: self.records,
            variables,
            report,
        })
    }
}

/// The result of a collection scan: the variables, the records they index
/// into, and the batch data-quality report.
#[derive(Debug)]
pub struct GridDataset {
    records: Vec<GridRecord>,
    variables: Vec<GridVariable>,
    report: ScanReport,
}

impl GridDataset {
    pub fn variables(&self) -> &[GridVariable] {
        &self.variables
    }

    pub fn records(&self) -> &[GridRecord] {
        &self.records
    }

    pub fn record(&self, index: usize) -> Option<&GridRecord> {
        self.records.get(index)
    }

    pub fn report(&self) -> &ScanReport {
        &self.report
    }
}

/// Batch totals surfaced once per scan instead of flooding the log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub records: usize,
    pub variables: usize,
    pub duplicates: usize,
    pub ensemble_misses: usize,
    pub length_errors: usize,
}

impl ScanReport {
    fn tally(records: &[GridRecord], variables: &[GridVariable]) -> Self {
        let length_errors = records
            .iter()
            .filter(|r| match r.pds() {
                ProductDefinition::Grib1(pds) => pds.length_error(),
                ProductDefinition::Grib2(_) => false,
            })
            .count();
        Self {
            records: records.len(),
            variables: variables.len(),
            duplicates: variables.iter().map(GridVariable::duplicate_count).sum(),
            ensemble_misses: variables.iter().map(GridVariable::ensemble_miss_count).sum(),
            length_errors,
        }
    }
}

impl Display for ScanReport {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(
            f,
            "scanned {} records into {} variables ({} duplicates, {} unplaceable ensemble \
             members, {} length errors)",
            self.records, self.variables, self.duplicates, self.ensemble_misses, self.length_errors
        )
    }
}
