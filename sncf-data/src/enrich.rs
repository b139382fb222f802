//! Turns raw API rows into typed, calendar-aware records.

use log::{debug, warn};
use sncf_api::record::{DelayCauses, RawRecord, Record, ServiceType};
use chrono::Datelike;

/// Numeric columns every downstream computation relies on.
pub const REQUIRED_COLUMNS: [&str; 4] = [
    "nb_train_prevu",
    "nb_annulation",
    "nb_train_retard_arrivee",
    "retard_moyen_tous_trains_arrivee",
];

/// Required columns that no row carries, i.e. columns the current API
/// version does not publish.
pub fn missing_required_columns(records: &[RawRecord]) -> Vec<&'static str> {
    let present: [fn(&RawRecord) -> bool; 4] = [
        |r| r.nb_train_prevu.is_some(),
        |r| r.nb_annulation.is_some(),
        |r| r.nb_train_retard_arrivee.is_some(),
        |r| r.retard_moyen_tous_trains_arrivee.is_some(),
    ];
    REQUIRED_COLUMNS
        .iter()
        .zip(present.iter())
        .filter(|(_, is_present)| !records.iter().any(|r| is_present(r)))
        .map(|(column, _)| *column)
        .collect()
}

fn count(value: Option<f64>) -> Option<u32> {
    value
        .filter(|v| v.is_finite())
        .map(|v| v.max(0.0).round() as u32)
}

/// Add year and month to every record and make sure the required numeric
/// columns exist.
///
/// A required column absent from the whole input is zero-filled. Counters
/// missing on a single row count as zero; a missing average delay stays
/// `None` so it does not drag means down. Rows without a parseable month are
/// dropped. The input is left untouched.
pub fn enrich(records: &[RawRecord]) -> Vec<Record> {
    if records.is_empty() {
        return Vec::new();
    }

    let missing = missing_required_columns(records);
    for column in &missing {
        warn!("Column {} missing from every record, filling with 0", column);
    }
    let delay_column_missing = missing.contains(&"retard_moyen_tous_trains_arrivee");

    records
        .iter()
        .filter_map(|raw| {
            let Some(date) = raw.parsed_date() else {
                debug!(
                    "Skipping {} -> {}: unparseable date {:?}",
                    raw.gare_depart, raw.gare_arrivee, raw.date
                );
                return None;
            };
            let avg_arrival_delay = if delay_column_missing {
                Some(0.0)
            } else {
                raw.retard_moyen_tous_trains_arrivee.filter(|v| v.is_finite())
            };
            Some(Record {
                date,
                year: date.year(),
                month: date.month(),
                service: ServiceType::from(raw.service.as_str()),
                departure: raw.gare_depart.trim().to_string(),
                arrival: raw.gare_arrivee.trim().to_string(),
                planned: count(raw.nb_train_prevu).unwrap_or(0),
                cancelled: count(raw.nb_annulation).unwrap_or(0),
                late_arrivals: count(raw.nb_train_retard_arrivee).unwrap_or(0),
                avg_arrival_delay,
                late_departures: count(raw.nb_train_depart_retard),
                late_over_15: count(raw.nb_train_retard_sup_15),
                late_over_30: count(raw.nb_train_retard_sup_30),
                late_over_60: count(raw.nb_train_retard_sup_60),
                avg_journey_minutes: raw.duree_moyenne,
                causes: DelayCauses {
                    external: raw.prct_cause_externe,
                    infrastructure: raw.prct_cause_infra,
                    traffic_management: raw.prct_cause_gestion_trafic,
                    rolling_stock: raw.prct_cause_materiel_roulant,
                    station_management: raw.prct_cause_gestion_gare,
                    passenger_handling: raw.prct_cause_prise_en_charge_voyageurs,
                },
            })
        })
        .collect()
}
