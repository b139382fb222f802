//! Data processing for TGV punctuality records.
//!
//! This crate turns raw API rows into the series a dashboard charts:
//! enriched records, filtered selections, headline KPIs, monthly rates with
//! their synthetic companion series, and per-station map markers.

pub mod enrich;
pub mod filter;
pub mod kpi;
pub mod monthly;
pub mod stations;
pub mod synthetic;
