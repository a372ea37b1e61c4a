//! A grid variable: one (parameter, level type, grid) identity with its
//! assembled coordinate axes and the dense cell-to-record lookup.

use crate::{
    coord::{EnsCoord, TimeCoord, VertCoord},
    record::VariableKey,
    tables::ParameterEntry,
};

/// The assembled multi-dimensional description of one variable.
///
/// The tracker maps every `(ensemble, time, level)` cell to the index of the
/// record supplying that cell's data. Each variable owns its tracker
/// exclusively; there is no aliasing between variables.
#[derive(Debug, Clone)]
pub struct GridVariable {
    key: VariableKey,
    parameter: ParameterEntry,
    time: TimeCoord,
    vert: VertCoord,
    ens: Option<EnsCoord>,
    tracker: Vec<Option<usize>>,
    duplicate_count: usize,
    duplicate_warned: bool,
    ensemble_miss_count: usize,
}

impl GridVariable {
    pub(crate) fn new(
        key: VariableKey,
        parameter: ParameterEntry,
        time: TimeCoord,
        vert: VertCoord,
        ens: Option<EnsCoord>,
    ) -> Self {
        let cells = ens.as_ref().map(EnsCoord::len).unwrap_or(1) * time.len() * vert.len();
        Self {
            key,
            parameter,
            time,
            vert,
            ens,
            tracker: vec![None; cells],
            duplicate_count: 0,
            duplicate_warned: false,
            ensemble_miss_count: 0,
        }
    }

    /// Stores a record at its coordinate cell.
    ///
    /// A second record mapping to an occupied cell is a duplicate: the later
    /// record wins and the event is warned once per variable, with the total
    /// kept for the scan report. A record whose ensemble member is missing
    /// from the axis (`ensemble_index` of `None` on a variable that has an
    /// ensemble axis) cannot be placed correctly; it is slotted at the first
    /// ensemble index so the data stays reachable, and reported at a higher
    /// severity.
    pub(crate) fn absorb(
        &mut self,
        record_index: usize,
        time_index: usize,
        level_index: usize,
        ensemble_index: Option<usize>,
    ) {
        let ensemble_index = match (&self.ens, ensemble_index) {
            (Some(_), Some(e)) => e,
            (Some(_), None) => {
                self.ensemble_miss_count += 1;
                log::error!(
                    "record {record_index} has no ensemble member on the axis of variable \
                     {:?}; placing it at member 0",
                    self.key
                );
                0
            }
            (None, _) => 0,
        };
        let cell = self.cell_index(time_index, level_index, ensemble_index);
        if let Some(previous) = self.tracker[cell] {
            if previous != record_index {
                self.duplicate_count += 1;
                if !self.duplicate_warned {
                    log::warn!(
                        "duplicate record for variable {:?} at (ensemble {ensemble_index}, \
                         time {time_index}, level {level_index}): record {record_index} \
                         replaces record {previous}; further duplicates for this variable \
                         will not be logged",
                        self.key
                    );
                    self.duplicate_warned = true;
                }
            }
        }
        self.tracker[cell] = Some(record_index);
    }

    fn cell_index(&self, time_index: usize, level_index: usize, ensemble_index: usize) -> usize {
        ensemble_index * (self.time.len() * self.vert.len())
            + time_index * self.vert.len()
            + level_index
    }

    /// The record occupying a cell, if any.
    pub fn record_at(
        &self,
        time_index: usize,
        level_index: usize,
        ensemble_index: usize,
    ) -> Option<usize> {
        if time_index >= self.time.len()
            || level_index >= self.vert.len()
            || ensemble_index >= self.ens.as_ref().map(EnsCoord::len).unwrap_or(1)
        {
            return None;
        }
        self.tracker[self.cell_index(time_index, level_index, ensemble_index)]
    }

    pub fn key(&self) -> VariableKey {
        self.key
    }

    pub fn parameter(&self) -> &ParameterEntry {
        &self.parameter
    }

    pub fn time_coord(&self) -> &TimeCoord {
        &self.time
    }

    pub fn vert_coord(&self) -> &VertCoord {
        &self.vert
    }

    pub fn ens_coord(&self) -> Option<&EnsCoord> {
        self.ens.as_ref()
    }

    pub fn cell_count(&self) -> usize {
        self.tracker.len()
    }

    pub fn filled_cell_count(&self) -> usize {
        self.tracker.iter().filter(|c| c.is_some()).count()
    }

    pub fn duplicate_count(&self) -> usize {
        self.duplicate_count
    }

    pub fn ensemble_miss_count(&self) -> usize {
        self.ensemble_miss_count
    }
}
