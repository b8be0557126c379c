//! Per-facility level state for a scheduling run.

use rustc_hash::FxHashMap;
use std::collections::HashMap;

use crate::catalog::{Catalog, ConfigError};
use crate::interner::FacilityId;

/// Current level of every facility in a catalog, indexed by facility ID.
///
/// Levels only ever increase during a run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelState {
    levels: Vec<u32>,
}

impl LevelState {
    /// Build from an explicit map holding one entry per catalog facility.
    pub fn from_levels(
        catalog: &Catalog,
        levels: &HashMap<String, u32>,
    ) -> Result<Self, ConfigError> {
        for name in levels.keys() {
            if catalog.facility_id(name).is_none() {
                return Err(ConfigError::UnknownFacility(name.clone()));
            }
        }
        let levels = catalog
            .facility_names()
            .map(|name| {
                levels
                    .get(name)
                    .copied()
                    .ok_or_else(|| ConfigError::MissingInitialLevel(name.to_string()))
            })
            .collect::<Result<Vec<u32>, ConfigError>>()?;
        Ok(Self { levels })
    }

    /// Every facility at level 0 except the given base levels.
    pub fn with_base(catalog: &Catalog, base: &[(&str, u32)]) -> Result<Self, ConfigError> {
        let mut state = Self {
            levels: vec![0; catalog.facility_count()],
        };
        for (name, level) in base {
            let id = catalog
                .facility_id(name)
                .ok_or_else(|| ConfigError::UnknownFacility(name.to_string()))?;
            state.levels[id as usize] = *level;
        }
        Ok(state)
    }

    /// Like [`LevelState::with_base`], with every excluded facility set to
    /// its maximum level so it never enters the schedule.
    pub fn excluding(
        catalog: &Catalog,
        base: &[(&str, u32)],
        excluded: &[&str],
    ) -> Result<Self, ConfigError> {
        let mut state = Self::with_base(catalog, base)?;
        for name in excluded {
            let id = catalog
                .facility_id(name)
                .ok_or_else(|| ConfigError::UnknownFacility(name.to_string()))?;
            state.levels[id as usize] = catalog.max_level(id);
        }
        Ok(state)
    }

    #[inline]
    pub fn level(&self, facility: FacilityId) -> u32 {
        self.levels[facility as usize]
    }

    /// Raise a facility to `level`. Never lowers it.
    #[inline]
    pub fn raise(&mut self, facility: FacilityId, level: u32) {
        let current = &mut self.levels[facility as usize];
        *current = (*current).max(level);
    }

    /// Number of facilities tracked.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Levels keyed by facility name.
    pub fn to_map(&self, catalog: &Catalog) -> FxHashMap<String, u32> {
        catalog
            .facility_names()
            .zip(self.levels.iter())
            .map(|(name, &level)| (name.to_string(), level))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CostRecord, PrerequisiteMap};
    use chrono::Duration;

    fn make_catalog() -> Catalog {
        let mut records = Vec::new();
        for (name, max) in [("Main Building", 3), ("Warehouse", 4), ("Barracks", 2)] {
            for level in 1..=max {
                records.push(CostRecord {
                    facility: name.to_string(),
                    level,
                    resource_cost: 10.0,
                    time_cost: Duration::seconds(60),
                    progress_delta: 1.0,
                });
            }
        }
        Catalog::new(records, &PrerequisiteMap::new()).unwrap()
    }

    #[test]
    fn test_with_base() {
        let catalog = make_catalog();
        let state = LevelState::with_base(&catalog, &[("Main Building", 1)]).unwrap();
        let map = state.to_map(&catalog);
        assert_eq!(map["Main Building"], 1);
        assert_eq!(map["Warehouse"], 0);
        assert_eq!(map["Barracks"], 0);
    }

    #[test]
    fn test_excluding_maxes_facility() {
        let catalog = make_catalog();
        let state =
            LevelState::excluding(&catalog, &[("Main Building", 1)], &["Warehouse"]).unwrap();
        let warehouse = catalog.facility_id("Warehouse").unwrap();
        assert_eq!(state.level(warehouse), 4);
    }

    #[test]
    fn test_from_levels_requires_every_facility() {
        let catalog = make_catalog();
        let levels: HashMap<String, u32> = [("Main Building".to_string(), 1)].into();
        let err = LevelState::from_levels(&catalog, &levels).unwrap_err();
        assert_eq!(err, ConfigError::MissingInitialLevel("Warehouse".to_string()));
    }

    #[test]
    fn test_from_levels_rejects_unknown() {
        let catalog = make_catalog();
        let mut levels: HashMap<String, u32> = catalog
            .facility_names()
            .map(|name| (name.to_string(), 0))
            .collect();
        levels.insert("Moat".to_string(), 1);
        let err = LevelState::from_levels(&catalog, &levels).unwrap_err();
        assert_eq!(err, ConfigError::UnknownFacility("Moat".to_string()));
    }

    #[test]
    fn test_raise_is_monotonic() {
        let catalog = make_catalog();
        let mut state = LevelState::with_base(&catalog, &[]).unwrap();
        let barracks = catalog.facility_id("Barracks").unwrap();
        state.raise(barracks, 2);
        state.raise(barracks, 1);
        assert_eq!(state.level(barracks), 2);
    }
}
