use serde::{Deserialize, Serialize};
use sncf_api::record::Record;

/// Headline figures for a selection of records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kpis {
    pub total_planned: u64,
    pub total_cancelled: u64,
    pub total_late: u64,
    /// Mean of the per-record average arrival delay, in minutes
    pub mean_delay: f64,
}

impl Kpis {
    /// None when there is nothing to summarise.
    pub fn from_records(records: &[Record]) -> Option<Kpis> {
        if records.is_empty() {
            return None;
        }
        let delays: Vec<f64> = records.iter().filter_map(|r| r.avg_arrival_delay).collect();
        let mean_delay = if delays.is_empty() {
            0.0
        } else {
            delays.iter().sum::<f64>() / delays.len() as f64
        };
        Some(Kpis {
            total_planned: records.iter().map(|r| u64::from(r.planned)).sum(),
            total_cancelled: records.iter().map(|r| u64::from(r.cancelled)).sum(),
            total_late: records.iter().map(|r| u64::from(r.late_arrivals)).sum(),
            mean_delay,
        })
    }
}

/// Group digits by thousands with a space, the French way ("12 345").
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(c);
    }
    out
}
