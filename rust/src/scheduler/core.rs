//! Greedy build-order scheduler.

use rustc_hash::FxHashSet;
use std::collections::HashMap;
use thiserror::Error;

use crate::catalog::{Catalog, ConfigError, RowIndex};
use crate::config::{Metric, ScheduleConfig};
use crate::interner::FacilityId;
use crate::models::{BuildOrderResult, ScheduledAction};
use crate::{log_changes, log_checks};

use super::efficiency::{chain_efficiency, record_efficiency, Efficiency};
use super::queue::{Group, GroupQueue};
use super::resolve::resolve;
use super::state::LevelState;

/// Errors that can occur during scheduling.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Level state tracks {found} facilities but the catalog has {expected}")]
    LevelStateMismatch { expected: usize, found: usize },
}

/// Greedy scheduler ordering every upgrade by cost per unit of progress.
///
/// Rows are visited in ascending order of their own efficiency. A row whose
/// resolution needs other upgrades first becomes a [`Group`] and waits in a
/// [`GroupQueue`]; a row that resolves to itself competes directly with the
/// best queued group, and whichever is strictly better is committed.
pub struct BuildOrderScheduler<'a> {
    catalog: &'a Catalog,
    metric: Metric,
    verbosity: u8,
    drain_residual_groups: bool,
}

/// One commit made inside the main loop, with what it was weighed against.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(not(test), allow(dead_code))]
struct Commit {
    efficiency: Efficiency,
    single: bool,
    /// Best group still queued after the commit was chosen
    best_queued: Option<Efficiency>,
    /// Own efficiency of the next row still to be visited
    next_row: Option<Efficiency>,
}

/// Bookkeeping for one run.
#[derive(Default)]
struct RunStats {
    singles_committed: usize,
    groups_committed: usize,
    groups_drained: usize,
    commits: Vec<Commit>,
}

impl<'a> BuildOrderScheduler<'a> {
    /// Create a scheduler. The metric selector is validated here.
    pub fn new(catalog: &'a Catalog, config: &ScheduleConfig) -> Result<Self, ScheduleError> {
        Ok(Self {
            catalog,
            metric: config.metric()?,
            verbosity: config.verbosity,
            drain_residual_groups: config.drain_residual_groups,
        })
    }

    /// All rows sorted by their own efficiency, ascending. Ties keep table
    /// order and undefined efficiencies go last.
    pub fn candidate_order(&self) -> Vec<RowIndex> {
        let keys: Vec<Efficiency> = self
            .catalog
            .records()
            .iter()
            .map(|record| record_efficiency(record, self.metric))
            .collect();
        let mut rows: Vec<RowIndex> = (0..self.catalog.len()).collect();
        rows.sort_by(|&a, &b| keys[a].cmp(&keys[b]));
        rows
    }

    /// Produce the build order starting from `state`.
    ///
    /// `state` is advanced as actions are committed and holds the final
    /// levels when this returns.
    ///
    /// # Errors
    /// * `LevelStateMismatch` if `state` was built for another catalog
    /// * `Config` if resolution hits a missing level or a prerequisite cycle
    pub fn schedule(&self, state: &mut LevelState) -> Result<BuildOrderResult, ScheduleError> {
        self.run(state).map(|(result, _)| result)
    }

    fn run(&self, state: &mut LevelState) -> Result<(BuildOrderResult, RunStats), ScheduleError> {
        if state.len() != self.catalog.facility_count() {
            return Err(ScheduleError::LevelStateMismatch {
                expected: self.catalog.facility_count(),
                found: state.len(),
            });
        }

        let catalog = self.catalog;
        let verbosity = self.verbosity;
        let candidates = self.candidate_order();
        let mut queue = GroupQueue::new(self.metric);
        let mut actions: Vec<ScheduledAction> = Vec::with_capacity(candidates.len());
        let mut stats = RunStats::default();
        let mut pos = 0;

        while let Some(&row) = candidates.get(pos) {
            let record = catalog.record(row);
            let order = resolve(catalog, state, row)?;
            if order.is_empty() {
                log_checks!(
                    verbosity,
                    "  Skipping {} {}: already reached",
                    record.facility,
                    record.level
                );
                pos += 1;
                continue;
            }

            let efficiency = chain_efficiency(catalog, &order, self.metric);
            if order.len() > 1 {
                log_checks!(
                    verbosity,
                    "  Queued group for {} {} ({} actions, efficiency={})",
                    record.facility,
                    record.level,
                    order.len(),
                    efficiency
                );
                queue.push(Group::new(catalog, order, efficiency));
                pos += 1;
                continue;
            }

            let popped = match queue.peek_best() {
                Some(best) if !efficiency.is_better_than(&best) => {
                    log_checks!(
                        verbosity,
                        "  {} {} ({}) loses to queued group ({})",
                        record.facility,
                        record.level,
                        efficiency,
                        best
                    );
                    queue.pop()
                }
                _ => None,
            };

            let updated = match popped {
                Some(group) => {
                    // Current row stays put; the group may have reached it
                    stats.groups_committed += 1;
                    stats.commits.push(Commit {
                        efficiency: group.efficiency,
                        single: false,
                        best_queued: queue.peek_best(),
                        next_row: Some(efficiency),
                    });
                    self.commit_group(state, &group, &mut actions)
                }
                None => {
                    pos += 1;
                    stats.singles_committed += 1;
                    stats.commits.push(Commit {
                        efficiency,
                        single: true,
                        best_queued: queue.peek_best(),
                        next_row: candidates
                            .get(pos)
                            .map(|&next| record_efficiency(catalog.record(next), self.metric)),
                    });
                    log_changes!(
                        verbosity,
                        "Commit {} {} (efficiency={})",
                        record.facility,
                        record.level,
                        efficiency
                    );
                    self.commit(state, &order, efficiency, &mut actions)
                }
            };
            queue.invalidate(catalog, state, &updated, verbosity)?;
        }

        let residual_groups = queue.len();
        if residual_groups > 0 {
            for group in queue.groups() {
                if let Some(target) = group.target() {
                    log_changes!(
                        verbosity,
                        "Residual group for {} {} ({} actions, efficiency={})",
                        catalog.record(target).facility,
                        catalog.level_of(target),
                        group.order.len(),
                        group.efficiency
                    );
                }
            }
        }

        if self.drain_residual_groups {
            while let Some(group) = queue.pop() {
                stats.groups_drained += 1;
                let updated = self.commit_group(state, &group, &mut actions);
                queue.invalidate(catalog, state, &updated, verbosity)?;
            }
        }

        log_changes!(
            verbosity,
            "Scheduled {} actions ({} singles, {} groups, {} residual)",
            actions.len(),
            stats.singles_committed,
            stats.groups_committed + stats.groups_drained,
            residual_groups
        );

        let algorithm_metadata = HashMap::from([
            ("metric".to_string(), self.metric.name().to_string()),
            ("actions".to_string(), actions.len().to_string()),
            (
                "singles_committed".to_string(),
                stats.singles_committed.to_string(),
            ),
            (
                "groups_committed".to_string(),
                stats.groups_committed.to_string(),
            ),
            ("residual_groups".to_string(), residual_groups.to_string()),
            (
                "residual_groups_drained".to_string(),
                stats.groups_drained.to_string(),
            ),
        ]);

        Ok((
            BuildOrderResult {
                actions,
                algorithm_metadata,
            },
            stats,
        ))
    }

    fn commit_group(
        &self,
        state: &mut LevelState,
        group: &Group,
        actions: &mut Vec<ScheduledAction>,
    ) -> FxHashSet<FacilityId> {
        if let Some(target) = group.target() {
            log_changes!(
                self.verbosity,
                "Commit group for {} {} ({} actions, efficiency={})",
                self.catalog.record(target).facility,
                self.catalog.level_of(target),
                group.order.len(),
                group.efficiency
            );
        }
        self.commit(state, &group.order, group.efficiency, actions)
    }

    /// Apply `order` to `state`, emitting each row tagged with `efficiency`.
    /// Returns the facilities whose level changed.
    fn commit(
        &self,
        state: &mut LevelState,
        order: &[RowIndex],
        efficiency: Efficiency,
        actions: &mut Vec<ScheduledAction>,
    ) -> FxHashSet<FacilityId> {
        let mut updated = FxHashSet::default();
        for &row in order {
            let facility = self.catalog.facility_of(row);
            state.raise(facility, self.catalog.level_of(row));
            updated.insert(facility);
            actions.push(ScheduledAction::from_record(
                self.catalog.record(row),
                efficiency,
            ));
        }
        updated
    }
}

/// Run the greedy scheduler over `catalog` from `initial` levels.
///
/// Convenience wrapper around [`BuildOrderScheduler`] that consumes the
/// initial state.
pub fn schedule_build_order(
    catalog: &Catalog,
    initial: LevelState,
    config: &ScheduleConfig,
) -> Result<BuildOrderResult, ScheduleError> {
    let scheduler = BuildOrderScheduler::new(catalog, config)?;
    let mut state = initial;
    scheduler.schedule(&mut state)
}
