//! Rust implementation of the greedy build-order scheduler.
//!
//! Orders every facility level-up in a cost table by cost per unit of
//! progress, honouring level order and prerequisite gates. Loading the cost
//! tables and writing the result stay on the Python side; this module exposes
//! the algorithm and its data types.

// Allow clippy warning triggered by PyO3 macro expansion
#![allow(clippy::useless_conversion)]

use pyo3::prelude::*;
use std::collections::HashMap;

mod catalog;
mod config;
mod interner;
pub mod logging;
mod models;
pub mod presets;
pub mod scheduler;
mod table;

pub use catalog::{Catalog, ConfigError, RowIndex};
pub use config::{Metric, ScheduleConfig};
pub use interner::{FacilityId, FacilityInterner};
pub use models::{BuildOrderResult, CostRecord, LevelRecord, PrerequisiteMap, ScheduledAction};
pub use scheduler::{
    resolve, schedule_build_order, BuildOrderScheduler, Efficiency, LevelState, ScheduleError,
};
pub use table::flatten_facility_tables;

fn value_error(err: impl std::fmt::Display) -> PyErr {
    pyo3::exceptions::PyValueError::new_err(err.to_string())
}

/// Flatten per-facility level tables into one cost table.
///
/// # Arguments
/// * `tables` - List of (facility name, level records) in sheet order; each
///   record carries the cumulative progress value of its level
///
/// # Returns
/// * List of CostRecord with per-level progress deltas
#[pyfunction]
#[pyo3(name = "flatten_facility_tables")]
fn py_flatten_facility_tables(tables: Vec<(String, Vec<LevelRecord>)>) -> Vec<CostRecord> {
    flatten_facility_tables(&tables)
}

/// Compute the greedy build order.
///
/// # Arguments
/// * `records` - Flattened cost table
/// * `prerequisites` - Dict mapping facility to [(required facility, level)]
/// * `initial_levels` - Dict with the starting level of every facility
/// * `config` - Metric and verbosity (defaults to resources, silent)
///
/// # Returns
/// * BuildOrderResult with the committed actions in build order
///
/// # Raises
/// * ValueError on an unknown metric, inconsistent cost table, missing
///   prerequisite level or circular prerequisites
#[pyfunction]
#[pyo3(name = "schedule_build_order", signature = (records, prerequisites, initial_levels, config=None))]
fn py_schedule_build_order(
    records: Vec<CostRecord>,
    prerequisites: PrerequisiteMap,
    initial_levels: HashMap<String, u32>,
    config: Option<ScheduleConfig>,
) -> PyResult<BuildOrderResult> {
    let config = config.unwrap_or_default();
    let catalog = Catalog::new(records, &prerequisites).map_err(value_error)?;
    let initial = LevelState::from_levels(&catalog, &initial_levels).map_err(value_error)?;
    schedule_build_order(&catalog, initial, &config).map_err(value_error)
}

/// Resolve the chain of upgrades needed to bring `facility` to `level`.
///
/// Returns an empty list when the level is already reached.
#[pyfunction]
#[pyo3(name = "resolve_build_order")]
fn py_resolve_build_order(
    records: Vec<CostRecord>,
    prerequisites: PrerequisiteMap,
    levels: HashMap<String, u32>,
    facility: &str,
    level: u32,
) -> PyResult<Vec<CostRecord>> {
    let catalog = Catalog::new(records, &prerequisites).map_err(value_error)?;
    let state = LevelState::from_levels(&catalog, &levels).map_err(value_error)?;
    let target = catalog.row_by_name(facility, level).map_err(value_error)?;
    let order = resolve(&catalog, &state, target).map_err(value_error)?;
    Ok(order
        .into_iter()
        .map(|row| catalog.record(row).clone())
        .collect())
}

/// The hand-authored village prerequisite table.
#[pyfunction]
#[pyo3(name = "village_prerequisites")]
fn py_village_prerequisites() -> PrerequisiteMap {
    presets::village_prerequisites()
}

/// Starting levels with every building empty except the Main Building.
#[pyfunction]
fn initial_levels_all_empty(records: Vec<CostRecord>) -> PyResult<HashMap<String, u32>> {
    let catalog = Catalog::new(records, &PrerequisiteMap::new()).map_err(value_error)?;
    let state = presets::village_levels_all_empty(&catalog).map_err(value_error)?;
    Ok(state.to_map(&catalog).into_iter().collect())
}

/// Starting levels with auxiliary buildings pre-maxed out of the run.
#[pyfunction]
fn initial_levels_core_only(records: Vec<CostRecord>) -> PyResult<HashMap<String, u32>> {
    let catalog = Catalog::new(records, &PrerequisiteMap::new()).map_err(value_error)?;
    let state = presets::village_levels_core_only(&catalog).map_err(value_error)?;
    Ok(state.to_map(&catalog).into_iter().collect())
}

/// The buildorder.rust Python module.
#[pymodule]
fn rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Core data types
    m.add_class::<LevelRecord>()?;
    m.add_class::<CostRecord>()?;
    m.add_class::<ScheduledAction>()?;
    m.add_class::<BuildOrderResult>()?;

    // Config types
    m.add_class::<ScheduleConfig>()?;

    // Data preparation
    m.add_function(wrap_pyfunction!(py_flatten_facility_tables, m)?)?;
    m.add_function(wrap_pyfunction!(py_village_prerequisites, m)?)?;
    m.add_function(wrap_pyfunction!(initial_levels_all_empty, m)?)?;
    m.add_function(wrap_pyfunction!(initial_levels_core_only, m)?)?;

    // Algorithms
    m.add_function(wrap_pyfunction!(py_schedule_build_order, m)?)?;
    m.add_function(wrap_pyfunction!(py_resolve_build_order, m)?)?;

    Ok(())
}
