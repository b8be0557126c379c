//! Core data types for the build-order system.

use chrono::Duration;
use pyo3::prelude::*;
use std::collections::HashMap;

use crate::scheduler::Efficiency;

// Note: We use std HashMap here for PyO3 interface compatibility

/// Prerequisite map: facility -> [(required facility, required level)].
///
/// A facility missing from the map has no prerequisites.
pub type PrerequisiteMap = HashMap<String, Vec<(String, u32)>>;

/// One level of a single facility's table, as authored.
///
/// `progress` is cumulative: the facility's total progress value once this
/// level is reached.
#[pyclass]
#[derive(Clone, Debug, PartialEq)]
pub struct LevelRecord {
    #[pyo3(get, set)]
    pub level: u32,
    #[pyo3(get, set)]
    pub resource_cost: f64,
    #[pyo3(get, set)]
    pub time_cost: Duration,
    #[pyo3(get, set)]
    pub progress: f64,
}

#[pymethods]
impl LevelRecord {
    #[new]
    fn new(level: u32, resource_cost: f64, time_cost: Duration, progress: f64) -> Self {
        Self {
            level,
            resource_cost,
            time_cost,
            progress,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "LevelRecord(level={}, resource_cost={}, time_cost={}, progress={})",
            self.level, self.resource_cost, self.time_cost, self.progress
        )
    }
}

/// One row of the flattened cost table: upgrading `facility` to `level`.
#[pyclass]
#[derive(Clone, Debug, PartialEq)]
pub struct CostRecord {
    #[pyo3(get, set)]
    pub facility: String,
    #[pyo3(get, set)]
    pub level: u32,
    #[pyo3(get, set)]
    pub resource_cost: f64,
    #[pyo3(get, set)]
    pub time_cost: Duration,
    /// Progress gained by this level alone.
    #[pyo3(get, set)]
    pub progress_delta: f64,
}

#[pymethods]
impl CostRecord {
    #[new]
    fn new(
        facility: String,
        level: u32,
        resource_cost: f64,
        time_cost: Duration,
        progress_delta: f64,
    ) -> Self {
        Self {
            facility,
            level,
            resource_cost,
            time_cost,
            progress_delta,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "CostRecord(facility={:?}, level={}, resource_cost={}, progress_delta={})",
            self.facility, self.level, self.resource_cost, self.progress_delta
        )
    }
}

/// A committed upgrade with the efficiency it was committed under.
#[pyclass]
#[derive(Clone, Debug)]
pub struct ScheduledAction {
    #[pyo3(get)]
    pub facility: String,
    #[pyo3(get)]
    pub level: u32,
    #[pyo3(get)]
    pub resource_cost: f64,
    #[pyo3(get)]
    pub time_cost: Duration,
    #[pyo3(get)]
    pub progress_delta: f64,
    /// The action's own efficiency, or the shared value of its group.
    pub efficiency: Efficiency,
}

impl ScheduledAction {
    pub fn from_record(record: &CostRecord, efficiency: Efficiency) -> Self {
        Self {
            facility: record.facility.clone(),
            level: record.level,
            resource_cost: record.resource_cost,
            time_cost: record.time_cost,
            progress_delta: record.progress_delta,
            efficiency,
        }
    }
}

#[pymethods]
impl ScheduledAction {
    /// Efficiency as `float` (res), `timedelta` (time) or `None` when undefined.
    #[getter]
    fn effective_efficiency(&self, py: Python<'_>) -> PyObject {
        match self.efficiency {
            Efficiency::Resource(value) => value.into_py(py),
            Efficiency::Time(value) => value.into_py(py),
            Efficiency::Undefined => py.None(),
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "ScheduledAction(facility={:?}, level={}, efficiency={})",
            self.facility, self.level, self.efficiency
        )
    }
}

/// Result from a scheduling run.
#[pyclass]
#[derive(Clone, Debug, Default)]
pub struct BuildOrderResult {
    #[pyo3(get)]
    pub actions: Vec<ScheduledAction>,
    #[pyo3(get)]
    pub algorithm_metadata: HashMap<String, String>,
}

#[pymethods]
impl BuildOrderResult {
    fn __len__(&self) -> usize {
        self.actions.len()
    }

    fn __repr__(&self) -> String {
        format!(
            "BuildOrderResult(actions={}, metadata_keys={})",
            self.actions.len(),
            self.algorithm_metadata.len()
        )
    }
}
