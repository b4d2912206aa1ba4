//! ENCLOSE diagnostic module.
//!
//! Rule-based root-cause analysis of a single freedive: maps observed
//! symptoms to categorized assessments with priorities, root causes,
//! recommendations, drills, and safety flags. Exposed both as a pure
//! in-process function and as HTTP endpoints for the coaching frontend.

pub mod engine;
pub mod models;
mod routes;
mod tables;

pub use routes::router;
