// Dashboard: totals, per-status chart series and recent activity, derived
// from the full application list on every load.

pub mod aggregation;
pub mod controller;
pub mod handlers;
