//! Dependency resolution: expand one requested upgrade into the ordered
//! chain of upgrades needed to reach it.

use rustc_hash::FxHashSet;

use crate::catalog::{Catalog, ConfigError, RowIndex};
use crate::interner::FacilityId;

use super::state::LevelState;

/// Resolve the minimal ordered chain of rows needed to reach `target`.
///
/// Returns an empty chain when the target level is already reached.
/// Prerequisites are only consulted for a facility still at level 0, in
/// declaration order, de-duplicated by row while keeping first-seen order.
/// Missing intermediate levels of the target's own facility come next, then
/// the target itself. `state` is not modified.
///
/// # Errors
/// * `MissingLevel` when a required (facility, level) has no cost record
/// * `CircularPrerequisite` when the prerequisite map loops back on itself
pub fn resolve(
    catalog: &Catalog,
    state: &LevelState,
    target: RowIndex,
) -> Result<Vec<RowIndex>, ConfigError> {
    let mut path = Vec::new();
    resolve_on_path(catalog, state, target, &mut path)
}

fn resolve_on_path(
    catalog: &Catalog,
    state: &LevelState,
    target: RowIndex,
    path: &mut Vec<FacilityId>,
) -> Result<Vec<RowIndex>, ConfigError> {
    let facility = catalog.facility_of(target);
    let level = catalog.level_of(target);
    let current = state.level(facility);
    if level <= current {
        return Ok(Vec::new());
    }

    if path.contains(&facility) {
        let mut names: Vec<&str> = path.iter().map(|&id| catalog.facility_name(id)).collect();
        names.push(catalog.facility_name(facility));
        return Err(ConfigError::CircularPrerequisite(names.join(" -> ")));
    }
    path.push(facility);

    let mut order = Vec::with_capacity((level - current) as usize);
    if current == 0 {
        let mut added: FxHashSet<RowIndex> = FxHashSet::default();
        for &(required, required_level) in catalog.prerequisites(facility) {
            let required_row = catalog.row_for(required, required_level)?;
            for row in resolve_on_path(catalog, state, required_row, path)? {
                if added.insert(row) {
                    order.push(row);
                }
            }
        }
    }

    for missing in current + 1..level {
        order.push(catalog.row_for(facility, missing)?);
    }
    order.push(target);

    path.pop();
    Ok(order)
}
