//! Role-based vehicle inspection scheduling.
//!
//! Owners register vehicles and book hourly appointment slots. Inspectors
//! score confirmed appointments against an eight-item checklist, and a rule
//! evaluator turns the score sheet into a SAFE or RECHECK verdict. The
//! workflow modules expose plain services plus axum routers; storage sits
//! behind the traits in [`store`].

pub mod config;
pub mod error;
pub mod identity;
pub mod store;
pub mod telemetry;
pub mod workflows;
