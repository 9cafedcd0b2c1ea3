pub mod logging;
pub mod metrics;
pub mod trace_id;
