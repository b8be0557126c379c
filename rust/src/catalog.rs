//! Immutable inputs of a run: the indexed cost table and prerequisite map.

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::interner::{FacilityId, FacilityInterner};
use crate::models::{CostRecord, PrerequisiteMap};

/// Position of a record in the flattened cost table.
pub type RowIndex = usize;

/// Errors caused by inconsistent authored data. All of them abort a run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unknown metric: {0:?} (expected \"res\" or \"time\")")]
    UnknownMetric(String),
    #[error("Unknown facility: {0}")]
    UnknownFacility(String),
    #[error("No cost record for {facility} level {level}")]
    MissingLevel { facility: String, level: u32 },
    #[error("Duplicate cost record for {facility} level {level}")]
    DuplicateLevel { facility: String, level: u32 },
    #[error("Levels of {facility} must run 1..N: expected level {expected}, found {found}")]
    LevelGap {
        facility: String,
        expected: u32,
        found: u32,
    },
    #[error("No initial level given for {0}")]
    MissingInitialLevel(String),
    #[error("Circular prerequisite: {0}")]
    CircularPrerequisite(String),
}

/// Indexed cost table plus interned prerequisites.
///
/// Built once per run and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Catalog {
    records: Vec<CostRecord>,
    /// Facility of each row, parallel to `records`.
    row_facility: Vec<FacilityId>,
    facilities: FacilityInterner,
    index: FxHashMap<(FacilityId, u32), RowIndex>,
    max_levels: Vec<u32>,
    /// Prerequisites by facility ID, in declaration order.
    prerequisites: Vec<Vec<(FacilityId, u32)>>,
}

impl Catalog {
    /// Build a catalog, validating that every facility's levels run 1..N
    /// and that prerequisites only name known facilities.
    ///
    /// Prerequisite keys that are not in the cost table are ignored.
    pub fn new(
        records: Vec<CostRecord>,
        prerequisites: &PrerequisiteMap,
    ) -> Result<Self, ConfigError> {
        let mut facilities = FacilityInterner::with_capacity(records.len() / 4 + 1);
        let mut row_facility = Vec::with_capacity(records.len());
        let mut index =
            FxHashMap::with_capacity_and_hasher(records.len(), Default::default());

        for (row, record) in records.iter().enumerate() {
            let id = facilities.intern(&record.facility);
            row_facility.push(id);
            if index.insert((id, record.level), row).is_some() {
                return Err(ConfigError::DuplicateLevel {
                    facility: record.facility.clone(),
                    level: record.level,
                });
            }
        }

        let mut levels_by_facility: Vec<Vec<u32>> = vec![Vec::new(); facilities.len()];
        for (row, record) in records.iter().enumerate() {
            levels_by_facility[row_facility[row] as usize].push(record.level);
        }

        let mut max_levels = Vec::with_capacity(facilities.len());
        for (id, levels) in levels_by_facility.iter_mut().enumerate() {
            levels.sort_unstable();
            for (expected, &found) in (1..).zip(levels.iter()) {
                if found != expected {
                    return Err(ConfigError::LevelGap {
                        facility: facilities.name(id as FacilityId).to_string(),
                        expected,
                        found,
                    });
                }
            }
            max_levels.push(levels.last().copied().unwrap_or(0));
        }

        let mut interned_prereqs = vec![Vec::new(); facilities.len()];
        for (facility, required) in prerequisites {
            let Some(id) = facilities.get(facility) else {
                continue;
            };
            let mut resolved = Vec::with_capacity(required.len());
            for (req_name, req_level) in required {
                let req_id = facilities
                    .get(req_name)
                    .ok_or_else(|| ConfigError::UnknownFacility(req_name.clone()))?;
                resolved.push((req_id, *req_level));
            }
            interned_prereqs[id as usize] = resolved;
        }

        Ok(Self {
            records,
            row_facility,
            facilities,
            index,
            max_levels,
            prerequisites: interned_prereqs,
        })
    }

    #[inline]
    pub fn record(&self, row: RowIndex) -> &CostRecord {
        &self.records[row]
    }

    pub fn records(&self) -> &[CostRecord] {
        &self.records
    }

    #[inline]
    pub fn facility_of(&self, row: RowIndex) -> FacilityId {
        self.row_facility[row]
    }

    #[inline]
    pub fn level_of(&self, row: RowIndex) -> u32 {
        self.records[row].level
    }

    /// Row for a (facility, level) pair.
    pub fn row_for(&self, facility: FacilityId, level: u32) -> Result<RowIndex, ConfigError> {
        self.index
            .get(&(facility, level))
            .copied()
            .ok_or_else(|| ConfigError::MissingLevel {
                facility: self.facility_name(facility).to_string(),
                level,
            })
    }

    /// Row for a (facility name, level) pair.
    pub fn row_by_name(&self, facility: &str, level: u32) -> Result<RowIndex, ConfigError> {
        let id = self
            .facility_id(facility)
            .ok_or_else(|| ConfigError::UnknownFacility(facility.to_string()))?;
        self.row_for(id, level)
    }

    #[inline]
    pub fn prerequisites(&self, facility: FacilityId) -> &[(FacilityId, u32)] {
        &self.prerequisites[facility as usize]
    }

    #[inline]
    pub fn facility_name(&self, facility: FacilityId) -> &str {
        self.facilities.name(facility)
    }

    pub fn facility_id(&self, name: &str) -> Option<FacilityId> {
        self.facilities.get(name)
    }

    /// Highest level present in the cost table for a facility.
    #[inline]
    pub fn max_level(&self, facility: FacilityId) -> u32 {
        self.max_levels[facility as usize]
    }

    /// Facility names in ID (first appearance) order.
    pub fn facility_names(&self) -> impl Iterator<Item = &str> {
        self.facilities.names()
    }

    pub fn facility_count(&self) -> usize {
        self.facilities.len()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
