//! Configuration types for the build-order scheduler.

use pyo3::prelude::*;

use crate::catalog::ConfigError;

/// Cost column a run optimises against.
///
/// Parsed once from [`ScheduleConfig::metric`] at the start of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Metric {
    /// Total resource cost per level (`resource_cost`).
    Resource,
    /// Construction time per level (`time_cost`).
    Time,
}

impl Metric {
    /// Parse a metric selector, case-insensitively: "res", "resource",
    /// "resources" or "time".
    pub fn parse(name: &str) -> Result<Self, ConfigError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "res" | "resource" | "resources" => Ok(Metric::Resource),
            "time" => Ok(Metric::Time),
            _ => Err(ConfigError::UnknownMetric(name.to_string())),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Metric::Resource => "res",
            Metric::Time => "time",
        }
    }
}

/// Configuration for a scheduling run.
#[pyclass]
#[derive(Clone, Debug)]
pub struct ScheduleConfig {
    /// Cost metric: "res" or "time"
    #[pyo3(get, set)]
    pub metric: String,
    /// Verbosity level: 0=silent, 1=changes, 2=checks, 3=debug
    #[pyo3(get, set)]
    pub verbosity: u8,
    /// Commit groups still queued once every row has been visited
    #[pyo3(get, set)]
    pub drain_residual_groups: bool,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            metric: Metric::Resource.name().to_string(),
            verbosity: 0,
            drain_residual_groups: false,
        }
    }
}

impl ScheduleConfig {
    /// Resolve the metric selector into a [`Metric`].
    pub fn metric(&self) -> Result<Metric, ConfigError> {
        Metric::parse(&self.metric)
    }
}

#[pymethods]
impl ScheduleConfig {
    #[new]
    #[pyo3(signature = (metric=None, verbosity=None, drain_residual_groups=None))]
    fn new(
        metric: Option<String>,
        verbosity: Option<u8>,
        drain_residual_groups: Option<bool>,
    ) -> Self {
        let defaults = Self::default();
        Self {
            metric: metric.unwrap_or(defaults.metric),
            verbosity: verbosity.unwrap_or(defaults.verbosity),
            drain_residual_groups: drain_residual_groups
                .unwrap_or(defaults.drain_residual_groups),
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "ScheduleConfig(metric={:?}, verbosity={}, drain_residual_groups={})",
            self.metric, self.verbosity, self.drain_residual_groups
        )
    }
}
