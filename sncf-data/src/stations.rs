//! Per-station delay figures placed on a map.

use crate::monthly::rate;
use log::debug;
use serde::{Deserialize, Serialize};
use sncf_api::record::Record;
use sncf_api::station::{Coordinates, StationTable};
use std::collections::BTreeMap;

pub const MIN_RADIUS: f64 = 5.0;
pub const RADIUS_SPAN: f64 = 15.0;

/// How bad the late rate is at a station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    /// Below 20% is low, below 50% medium, anything else high.
    pub fn from_late_rate(late_rate: f64) -> Severity {
        if late_rate < 20.0 {
            Severity::Low
        } else if late_rate < 50.0 {
            Severity::Medium
        } else {
            Severity::High
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Severity::Low => "#4CAF50",
            Severity::Medium => "#FFC107",
            Severity::High => "#F44336",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationMarker {
    pub station: String,
    pub planned: u64,
    pub late_arrivals: u64,
    pub late_rate: f64,
    pub coordinates: Coordinates,
    pub severity: Severity,
    /// Scaled by traffic: 5 for the quietest, 20 for the busiest station
    pub radius: f64,
}

/// One marker per departure station that the gazetteer can place.
///
/// Stations are sorted by name; unplaceable ones are left out before the
/// radius is scaled against the busiest remaining station.
pub fn station_markers(records: &[Record], table: &StationTable) -> Vec<StationMarker> {
    let mut totals: BTreeMap<&str, (u64, u64)> = BTreeMap::new();
    for record in records {
        let entry = totals.entry(record.departure.as_str()).or_insert((0, 0));
        entry.0 += u64::from(record.planned);
        entry.1 += u64::from(record.late_arrivals);
    }

    let placed: Vec<(&str, u64, u64, Coordinates)> = totals
        .into_iter()
        .filter_map(|(station, (planned, late))| match table.resolve(Some(station)) {
            Some(coordinates) => Some((station, planned, late, coordinates)),
            None => {
                debug!("No coordinates for station {:?}", station);
                None
            }
        })
        .collect();

    let max_planned = placed.iter().map(|p| p.1).max().unwrap_or(0);

    placed
        .into_iter()
        .map(|(station, planned, late, coordinates)| {
            let late_rate = rate(late, planned);
            let radius = if max_planned == 0 {
                MIN_RADIUS
            } else {
                MIN_RADIUS + planned as f64 / max_planned as f64 * RADIUS_SPAN
            };
            StationMarker {
                station: station.to_string(),
                planned,
                late_arrivals: late,
                late_rate,
                coordinates,
                severity: Severity::from_late_rate(late_rate),
                radius,
            }
        })
        .collect()
}

/// Mean position of the markers, a reasonable initial map center.
pub fn map_center(markers: &[StationMarker]) -> Option<Coordinates> {
    if markers.is_empty() {
        return None;
    }
    let n = markers.len() as f64;
    let latitude = markers.iter().map(|m| m.coordinates.latitude).sum::<f64>() / n;
    let longitude = markers.iter().map(|m| m.coordinates.longitude).sum::<f64>() / n;
    Some(Coordinates::new(latitude, longitude))
}
