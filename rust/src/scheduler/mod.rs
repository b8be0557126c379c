//! Greedy build-order scheduler.
//!
//! Orders every level-up in a cost table by cost per unit of progress while
//! respecting level order within a facility and prerequisite gates between
//! facilities. Upgrades that only become possible after other upgrades are
//! grouped into dependency chains and compete as a whole.

mod core;
mod efficiency;
mod queue;
mod resolve;
mod state;

pub use self::core::{schedule_build_order, BuildOrderScheduler, ScheduleError};
pub use efficiency::{chain_efficiency, record_efficiency, Efficiency};
pub use queue::{Group, GroupQueue};
pub use resolve::resolve;
pub use state::LevelState;
