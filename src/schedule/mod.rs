//! Video effect scheduling: the weighted effect table, per-run state and the per-frame step.

pub(crate) mod scheduler;
pub(crate) mod state;
pub(crate) mod table;
