//! Core types and data access for SNCF monthly TGV punctuality records.

#[cfg(feature = "api")]
pub mod client;
pub mod page;
pub mod record;
pub mod station;
