//! Cost-per-progress efficiency of a chain of upgrades.

use chrono::Duration;
use std::cmp::Ordering;
use std::fmt;

use crate::catalog::{Catalog, RowIndex};
use crate::config::Metric;
use crate::models::CostRecord;

/// Cost per unit of progress. Lower is better.
///
/// `Undefined` marks a chain with zero total progress, or one whose cost or
/// progress is not a finite number. It orders after every defined value and
/// equal to itself, so such chains go last.
#[derive(Clone, Copy, Debug)]
pub enum Efficiency {
    Resource(f64),
    Time(Duration),
    Undefined,
}

impl Efficiency {
    pub fn is_undefined(&self) -> bool {
        matches!(self, Efficiency::Undefined)
    }

    /// Strictly better (lower) than `other`.
    #[inline]
    pub fn is_better_than(&self, other: &Efficiency) -> bool {
        self.cmp(other) == Ordering::Less
    }
}

impl Ord for Efficiency {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Efficiency::Undefined, Efficiency::Undefined) => Ordering::Equal,
            (Efficiency::Undefined, _) => Ordering::Greater,
            (_, Efficiency::Undefined) => Ordering::Less,
            (Efficiency::Resource(a), Efficiency::Resource(b)) => a.total_cmp(b),
            (Efficiency::Time(a), Efficiency::Time(b)) => a.cmp(b),
            // Metrics never mix within a run
            _ => Ordering::Equal,
        }
    }
}

impl PartialOrd for Efficiency {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Efficiency {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Efficiency {}

impl fmt::Display for Efficiency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Efficiency::Resource(value) => write!(f, "{:.3}", value),
            Efficiency::Time(value) => write!(f, "{}", value),
            Efficiency::Undefined => write!(f, "undefined"),
        }
    }
}

/// Efficiency of a whole chain: summed cost over summed progress delta.
pub fn chain_efficiency(catalog: &Catalog, order: &[RowIndex], metric: Metric) -> Efficiency {
    efficiency_of(order.iter().map(|&row| catalog.record(row)), metric)
}

/// Efficiency of a single record; the candidate sort key.
pub fn record_efficiency(record: &CostRecord, metric: Metric) -> Efficiency {
    efficiency_of(std::iter::once(record), metric)
}

fn efficiency_of<'a>(records: impl Iterator<Item = &'a CostRecord>, metric: Metric) -> Efficiency {
    let mut progress = 0.0;
    let mut resources = 0.0;
    let mut time = Duration::zero();
    for record in records {
        progress += record.progress_delta;
        match metric {
            Metric::Resource => resources += record.resource_cost,
            Metric::Time => time = time + record.time_cost,
        }
    }

    if progress == 0.0 || !progress.is_finite() {
        return Efficiency::Undefined;
    }
    match metric {
        Metric::Resource => {
            let ratio = resources / progress;
            if ratio.is_finite() {
                Efficiency::Resource(ratio)
            } else {
                Efficiency::Undefined
            }
        }
        Metric::Time => Efficiency::Time(divide_duration(time, progress)),
    }
}

/// `duration / divisor`, rounded to whole microseconds.
fn divide_duration(duration: Duration, divisor: f64) -> Duration {
    // num_microseconds overflows past ~292k years
    let micros = duration
        .num_microseconds()
        .map(|m| m as f64)
        .unwrap_or_else(|| duration.num_milliseconds() as f64 * 1000.0);
    Duration::microseconds((micros / divisor).round() as i64)
}
