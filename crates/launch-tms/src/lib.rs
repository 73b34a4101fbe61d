//! Daily operations reporting for the Launch transportation management platform.
//!
//! The library turns fleet snapshots (drivers, trucks, trailers, loads and load
//! events) into the LSW daily status report, tracks the report's draft and
//! submission lifecycle, and exposes the builder over HTTP.

pub mod config;
pub mod error;
pub mod fleet;
pub mod reports;
pub mod telemetry;
