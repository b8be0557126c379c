//! Hand-authored village data: building prerequisites and the starting
//! level strategies used with them.

use crate::catalog::{Catalog, ConfigError};
use crate::models::PrerequisiteMap;
use crate::scheduler::LevelState;

/// Buildings a fresh village already has.
const BASE_LEVELS: &[(&str, u32)] = &[("Main Building", 1)];

/// Buildings left out of a core-only run.
const AUXILIARY_FACILITIES: &[&str] = &[
    "Warehouse",
    "Granary",
    "Iron Foundry",
    "Brickyard",
    "Sawmill",
    "Bakery",
    "Grain Mill",
    "Stonemason's Lodge",
    "Brewery",
    "Trapper",
    "Great Warehouse",
    "Great Granary",
    "Horse Drinking Pool",
];

const PREREQUISITES: &[(&str, &[(&str, u32)])] = &[
    ("Sawmill", &[("Woodcutter", 10)]),
    ("Brickyard", &[("Clay Pit", 10)]),
    ("Iron Foundry", &[("Iron Mine", 10)]),
    ("Grain Mill", &[("Cropland", 10)]),
    ("Bakery", &[("Grain Mill", 5)]),
    ("Smithy", &[("Main Building", 5), ("Academy", 1)]),
    ("Tournament Square", &[("Rally Point", 15)]),
    (
        "Marketplace",
        &[("Main Building", 3), ("Warehouse", 1), ("Granary", 1)],
    ),
    ("Barracks", &[("Main Building", 3)]),
    ("Stable", &[("Smithy", 3), ("Academy", 5)]),
    ("Workshop", &[("Main Building", 5), ("Academy", 10)]),
    ("Academy", &[("Main Building", 3), ("Barracks", 3)]),
    ("Townhall", &[("Main Building", 10), ("Academy", 10)]),
    ("Residence", &[("Main Building", 5)]),
    ("Palace", &[("Embassy", 1), ("Main Building", 5)]),
    ("Treasury", &[("Main Building", 10)]),
    ("Trade Office", &[("Marketplace", 20), ("Stable", 10)]),
    ("Great Barracks", &[("Barracks", 20)]),
    ("Great Stable", &[("Stable", 20)]),
    ("Stonemason's Lodge", &[("Main Building", 5)]),
    ("Brewery", &[("Granary", 20), ("Rally Point", 10)]),
    ("Trapper", &[("Rally Point", 1)]),
    ("Hero's Mansion", &[("Rally Point", 1), ("Main Building", 3)]),
    ("Great Warehouse", &[("Main Building", 10)]),
    ("Great Granary", &[("Main Building", 10)]),
    ("Horse Drinking Pool", &[("Stable", 20), ("Rally Point", 10)]),
    ("Hospital", &[("Academy", 15), ("Main Building", 10)]),
];

/// Building prerequisites. Buildings without prerequisites have no entry,
/// so a misspelt name silently reads as "no prerequisites".
pub fn village_prerequisites() -> PrerequisiteMap {
    PREREQUISITES
        .iter()
        .map(|(name, reqs)| {
            (
                name.to_string(),
                reqs.iter()
                    .map(|(req, level)| (req.to_string(), *level))
                    .collect(),
            )
        })
        .collect()
}

pub fn village_base_levels() -> &'static [(&'static str, u32)] {
    BASE_LEVELS
}

/// Every building at 0 except the base levels.
///
/// Preset names missing from `catalog` are skipped, so partial tables work.
pub fn village_levels_all_empty(catalog: &Catalog) -> Result<LevelState, ConfigError> {
    LevelState::with_base(catalog, &known(catalog, BASE_LEVELS))
}

/// Like [`village_levels_all_empty`] with auxiliary buildings pre-maxed.
pub fn village_levels_core_only(catalog: &Catalog) -> Result<LevelState, ConfigError> {
    let excluded: Vec<&str> = AUXILIARY_FACILITIES
        .iter()
        .copied()
        .filter(|name| catalog.facility_id(name).is_some())
        .collect();
    LevelState::excluding(catalog, &known(catalog, BASE_LEVELS), &excluded)
}

fn known<'a>(catalog: &Catalog, levels: &[(&'a str, u32)]) -> Vec<(&'a str, u32)> {
    levels
        .iter()
        .copied()
        .filter(|(name, _)| catalog.facility_id(name).is_some())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CostRecord;
    use chrono::Duration;

    fn make_catalog(names: &[&str], max_level: u32) -> Catalog {
        let mut records = Vec::new();
        for name in names {
            for level in 1..=max_level {
                records.push(CostRecord {
                    facility: name.to_string(),
                    level,
                    resource_cost: 100.0,
                    time_cost: Duration::minutes(level as i64),
                    progress_delta: 1.0,
                });
            }
        }
        Catalog::new(records, &PrerequisiteMap::new()).unwrap()
    }

    #[test]
    fn test_prerequisites_keep_declaration_order() {
        let prereqs = village_prerequisites();
        assert_eq!(prereqs.len(), PREREQUISITES.len());
        assert_eq!(
            prereqs["Marketplace"],
            vec![
                ("Main Building".to_string(), 3),
                ("Warehouse".to_string(), 1),
                ("Granary".to_string(), 1)
            ]
        );
        assert!(!prereqs.contains_key("Woodcutter"));
    }

    #[test]
    fn test_all_empty_levels() {
        let catalog = make_catalog(&["Main Building", "Warehouse", "Cropland"], 20);
        let state = village_levels_all_empty(&catalog).unwrap();
        let levels = state.to_map(&catalog);
        assert_eq!(levels["Main Building"], 1);
        assert_eq!(levels["Warehouse"], 0);
        assert_eq!(levels["Cropland"], 0);
    }

    #[test]
    fn test_core_only_maxes_auxiliary_buildings() {
        let catalog = make_catalog(&["Main Building", "Warehouse", "Cropland"], 20);
        let state = village_levels_core_only(&catalog).unwrap();
        let levels = state.to_map(&catalog);
        assert_eq!(levels["Main Building"], 1);
        assert_eq!(levels["Warehouse"], 20);
        assert_eq!(levels["Cropland"], 0);
    }

    #[test]
    fn test_missing_base_building_skipped() {
        let catalog = make_catalog(&["Cropland"], 3);
        let state = village_levels_core_only(&catalog).unwrap();
        assert_eq!(state.to_map(&catalog)["Cropland"], 0);
    }
}
