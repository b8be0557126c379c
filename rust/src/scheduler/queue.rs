//! Priority queue of dependency groups with lazy invalidation.
//!
//! A group is a chain of upgrades that must be committed together, in order,
//! because later links depend on earlier ones. Each group caches the
//! efficiency it had when resolved; when a facility it touches changes level
//! that value may be stale, so the queue rebuilds affected groups on demand.
//!
//! The queue tracks the union of all member groups' facilities so the common
//! case (a commit touching nothing queued) is a single disjointness check.

use rustc_hash::FxHashSet;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::catalog::{Catalog, ConfigError, RowIndex};
use crate::config::Metric;
use crate::interner::FacilityId;
use crate::{log_checks, log_debug};

use super::efficiency::{chain_efficiency, Efficiency};
use super::resolve::resolve;
use super::state::LevelState;

/// An ordered chain of upgrades committed atomically.
#[derive(Clone, Debug)]
pub struct Group {
    pub efficiency: Efficiency,
    pub order: Vec<RowIndex>,
    /// Distinct facilities touched by `order`.
    pub dependencies: FxHashSet<FacilityId>,
}

impl Group {
    pub fn new(catalog: &Catalog, order: Vec<RowIndex>, efficiency: Efficiency) -> Self {
        let dependencies = order.iter().map(|&row| catalog.facility_of(row)).collect();
        Self {
            efficiency,
            order,
            dependencies,
        }
    }

    /// The row this group was resolved for.
    pub fn target(&self) -> Option<RowIndex> {
        self.order.last().copied()
    }
}

/// Heap entry; equal efficiencies pop in insertion order.
#[derive(Debug)]
struct QueuedGroup {
    group: Group,
    seq: u64,
}

impl Ord for QueuedGroup {
    fn cmp(&self, other: &Self) -> Ordering {
        self.group
            .efficiency
            .cmp(&other.group.efficiency)
            .then(self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for QueuedGroup {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for QueuedGroup {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueuedGroup {}

/// Min-priority queue of groups keyed by efficiency.
#[derive(Debug)]
pub struct GroupQueue {
    heap: BinaryHeap<Reverse<QueuedGroup>>,
    /// Union of every member's `dependencies`.
    dependencies: FxHashSet<FacilityId>,
    metric: Metric,
    seq: u64,
}

impl GroupQueue {
    pub fn new(metric: Metric) -> Self {
        Self {
            heap: BinaryHeap::new(),
            dependencies: FxHashSet::default(),
            metric,
            seq: 0,
        }
    }

    /// Efficiency of the best group, `None` when empty.
    pub fn peek_best(&self) -> Option<Efficiency> {
        self.heap.peek().map(|Reverse(entry)| entry.group.efficiency)
    }

    pub fn push(&mut self, group: Group) {
        self.dependencies.extend(group.dependencies.iter().copied());
        self.push_entry(group);
    }

    /// Remove the best group. The facility union is recomputed from the
    /// remaining members since another group may share a facility.
    pub fn pop(&mut self) -> Option<Group> {
        let Reverse(entry) = self.heap.pop()?;
        self.rebuild_dependencies();
        Some(entry.group)
    }

    /// Re-resolve every group touching an updated facility.
    ///
    /// Untouched groups are kept as-is. Touched groups are resolved again
    /// from their target against the current `state`; a group whose target
    /// is already reached is dropped. Returns the number of groups
    /// re-resolved.
    pub fn invalidate(
        &mut self,
        catalog: &Catalog,
        state: &LevelState,
        updated: &FxHashSet<FacilityId>,
        verbosity: u8,
    ) -> Result<usize, ConfigError> {
        if self.dependencies.is_disjoint(updated) {
            return Ok(0);
        }

        let previous = std::mem::take(&mut self.heap);
        let mut recomputed = 0;
        for Reverse(entry) in previous.into_vec() {
            let group = entry.group;
            if group.dependencies.is_disjoint(updated) {
                self.heap.push(Reverse(QueuedGroup {
                    group,
                    seq: entry.seq,
                }));
                continue;
            }

            recomputed += 1;
            let Some(target) = group.target() else {
                continue;
            };
            let order = resolve(catalog, state, target)?;
            if order.is_empty() {
                log_debug!(
                    verbosity,
                    "    Dropped group for {} {}: already reached",
                    catalog.record(target).facility,
                    catalog.level_of(target)
                );
                continue;
            }

            let efficiency = chain_efficiency(catalog, &order, self.metric);
            log_debug!(
                verbosity,
                "    Recomputed group for {} {}: {} -> {} ({} actions)",
                catalog.record(target).facility,
                catalog.level_of(target),
                group.efficiency,
                efficiency,
                order.len()
            );
            self.push_entry(Group::new(catalog, order, efficiency));
        }

        self.rebuild_dependencies();
        log_checks!(
            verbosity,
            "    Queue invalidated: {} recomputed, {} queued",
            recomputed,
            self.heap.len()
        );
        Ok(recomputed)
    }

    /// Facilities touched by any queued group.
    pub fn dependencies(&self) -> &FxHashSet<FacilityId> {
        &self.dependencies
    }

    /// Queued groups in no particular order.
    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.heap.iter().map(|Reverse(entry)| &entry.group)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    fn push_entry(&mut self, group: Group) {
        let seq = self.seq;
        self.seq += 1;
        self.heap.push(Reverse(QueuedGroup { group, seq }));
    }

    fn rebuild_dependencies(&mut self) {
        self.dependencies.clear();
        for Reverse(entry) in self.heap.iter() {
            self.dependencies
                .extend(entry.group.dependencies.iter().copied());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CostRecord, PrerequisiteMap};
    use chrono::Duration;

    /// Facilities with levels 1..=max, each level costing `cost` for 10 progress.
    fn make_catalog(facilities: &[(&str, u32, f64)], prereqs: &[(&str, &[(&str, u32)])]) -> Catalog {
        let mut records = Vec::new();
        for &(name, max, cost) in facilities {
            for level in 1..=max {
                records.push(CostRecord {
                    facility: name.to_string(),
                    level,
                    resource_cost: cost,
                    time_cost: Duration::minutes(1),
                    progress_delta: 10.0,
                });
            }
        }
        let map: PrerequisiteMap = prereqs
            .iter()
            .map(|(name, reqs)| {
                (
                    name.to_string(),
                    reqs.iter().map(|(r, l)| (r.to_string(), *l)).collect(),
                )
            })
            .collect();
        Catalog::new(records, &map).unwrap()
    }

    fn make_group(catalog: &Catalog, state: &LevelState, name: &str, level: u32) -> Group {
        let target = catalog.row_by_name(name, level).unwrap();
        let order = resolve(catalog, state, target).unwrap();
        let efficiency = chain_efficiency(catalog, &order, Metric::Resource);
        Group::new(catalog, order, efficiency)
    }

    fn ids(catalog: &Catalog, names: &[&str]) -> FxHashSet<FacilityId> {
        names
            .iter()
            .map(|name| catalog.facility_id(name).unwrap())
            .collect()
    }

    #[test]
    fn test_pop_in_efficiency_order() {
        let catalog = make_catalog(&[("A", 2, 300.0), ("B", 2, 100.0), ("C", 2, 200.0)], &[]);
        let state = LevelState::with_base(&catalog, &[]).unwrap();
        let mut queue = GroupQueue::new(Metric::Resource);
        assert!(queue.peek_best().is_none());

        for name in ["A", "B", "C"] {
            queue.push(make_group(&catalog, &state, name, 2));
        }
        assert_eq!(queue.peek_best(), Some(Efficiency::Resource(10.0)));

        let popped: Vec<Efficiency> = std::iter::from_fn(|| queue.pop())
            .map(|g| g.efficiency)
            .collect();
        assert_eq!(
            popped,
            vec![
                Efficiency::Resource(10.0),
                Efficiency::Resource(20.0),
                Efficiency::Resource(30.0)
            ]
        );
        assert!(queue.pop().is_none());
    }

    #[test]
    fn test_equal_efficiency_pops_in_insertion_order() {
        let catalog = make_catalog(&[("A", 2, 100.0), ("B", 2, 100.0)], &[]);
        let state = LevelState::with_base(&catalog, &[]).unwrap();
        let mut queue = GroupQueue::new(Metric::Resource);
        queue.push(make_group(&catalog, &state, "B", 2));
        queue.push(make_group(&catalog, &state, "A", 2));

        let first = queue.pop().unwrap();
        assert_eq!(first.dependencies, ids(&catalog, &["B"]));
    }

    #[test]
    fn test_pop_recomputes_union_of_shared_facilities() {
        let catalog = make_catalog(
            &[("MB", 5, 100.0), ("Barracks", 1, 100.0), ("Residence", 1, 100.0)],
            &[("Barracks", &[("MB", 3)]), ("Residence", &[("MB", 5)])],
        );
        let state = LevelState::with_base(&catalog, &[("MB", 1)]).unwrap();
        let mut queue = GroupQueue::new(Metric::Resource);
        queue.push(make_group(&catalog, &state, "Barracks", 1));
        queue.push(make_group(&catalog, &state, "Residence", 1));
        assert_eq!(
            queue.dependencies(),
            &ids(&catalog, &["MB", "Barracks", "Residence"])
        );

        queue.pop().unwrap();
        // MB is still needed by the remaining group
        assert_eq!(queue.dependencies(), &ids(&catalog, &["MB", "Residence"]));
    }

    #[test]
    fn test_invalidate_disjoint_is_noop() {
        let catalog = make_catalog(&[("A", 2, 100.0), ("B", 2, 100.0)], &[]);
        let state = LevelState::with_base(&catalog, &[]).unwrap();
        let mut queue = GroupQueue::new(Metric::Resource);
        queue.push(make_group(&catalog, &state, "A", 2));

        let recomputed = queue
            .invalidate(&catalog, &state, &ids(&catalog, &["B"]), 0)
            .unwrap();
        assert_eq!(recomputed, 0);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_invalidate_shrinks_and_drops_groups() {
        let catalog = make_catalog(
            &[("A", 3, 100.0), ("B", 1, 400.0), ("C", 2, 100.0)],
            &[("B", &[("A", 2)])],
        );
        let mut state = LevelState::with_base(&catalog, &[]).unwrap();
        let mut queue = GroupQueue::new(Metric::Resource);
        queue.push(make_group(&catalog, &state, "B", 1));
        queue.push(make_group(&catalog, &state, "A", 2));
        queue.push(make_group(&catalog, &state, "C", 2));
        assert_eq!(queue.len(), 3);

        let a = catalog.facility_id("A").unwrap();
        state.raise(a, 2);
        let recomputed = queue
            .invalidate(&catalog, &state, &ids(&catalog, &["A"]), 0)
            .unwrap();

        // B's group and A's group touched A; A's target is now reached
        assert_eq!(recomputed, 2);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.dependencies(), &ids(&catalog, &["B", "C"]));

        // B alone now costs 400 for 10 progress
        let b1 = catalog.row_by_name("B", 1).unwrap();
        let b_group = queue.groups().find(|g| g.order == vec![b1]).unwrap();
        assert_eq!(b_group.efficiency, Efficiency::Resource(40.0));
    }
}
