//! The ensemble-member coordinate axis.

use crate::record::GridRecord;

/// One perturbation within an ensemble forecast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnsembleMember {
    pub number: i32,
    pub member_type: i32,
}

/// The distinct ensemble members of a record list, in a stable sorted order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnsCoord {
    members: Vec<EnsembleMember>,
}

impl EnsCoord {
    /// Builds the axis, or `None` when no record declares ensemble
    /// membership.
    pub fn from_records(records: &[&GridRecord]) -> Option<Self> {
        let mut members: Vec<EnsembleMember> =
            records.iter().filter_map(|r| r.ensemble_member()).collect();
        if members.is_empty() {
            return None;
        }
        members.sort_unstable();
        members.dedup();
        Some(Self { members })
    }

    pub fn index_of(&self, record: &GridRecord) -> Option<usize> {
        let member = record.ensemble_member()?;
        self.members.binary_search(&member).ok()
    }

    pub fn members(&self) -> &[EnsembleMember] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
