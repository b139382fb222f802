//! Monthly aggregation of punctuality records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sncf_api::record::Record;
use std::collections::BTreeMap;

/// Network-wide figures for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyMetric {
    /// First day of the month
    pub date: NaiveDate,
    pub year: i32,
    pub month: u32,
    pub planned: u64,
    pub cancelled: u64,
    pub late_arrivals: u64,
    /// Mean of the records' average arrival delay, in minutes
    pub mean_delay: f64,
    /// Late arrivals per 100 planned trains
    pub late_rate: f64,
    /// Cancellations per 100 planned trains
    pub cancellation_rate: f64,
    /// Synthetic, in [-1, 1]
    pub sentiment_score: f64,
    /// Synthetic, in [5000, 30000]
    pub bookings: u32,
}

#[derive(Default)]
struct MonthAccumulator {
    date: Option<NaiveDate>,
    planned: u64,
    cancelled: u64,
    late_arrivals: u64,
    delay_sum: f64,
    delay_count: usize,
}

/// `100 * part / whole`, or 0 when nothing was planned.
pub fn rate(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        100.0 * part as f64 / whole as f64
    }
}

/// Group records by (year, month), oldest first.
///
/// The synthetic columns are left at zero; see
/// [`SyntheticGenerator`](crate::synthetic::SyntheticGenerator).
pub fn aggregate_monthly(records: &[Record]) -> Vec<MonthlyMetric> {
    let mut months: BTreeMap<(i32, u32), MonthAccumulator> = BTreeMap::new();
    for record in records {
        let acc = months.entry((record.year, record.month)).or_default();
        acc.date.get_or_insert(record.date);
        acc.planned += u64::from(record.planned);
        acc.cancelled += u64::from(record.cancelled);
        acc.late_arrivals += u64::from(record.late_arrivals);
        if let Some(delay) = record.avg_arrival_delay {
            acc.delay_sum += delay;
            acc.delay_count += 1;
        }
    }

    months
        .into_iter()
        .map(|((year, month), acc)| {
            let date = sncf_utils::dates::first_of_month(year, month)
                .or(acc.date)
                .unwrap_or_default();
            MonthlyMetric {
                date,
                year,
                month,
                planned: acc.planned,
                cancelled: acc.cancelled,
                late_arrivals: acc.late_arrivals,
                mean_delay: if acc.delay_count == 0 {
                    0.0
                } else {
                    acc.delay_sum / acc.delay_count as f64
                },
                late_rate: rate(acc.late_arrivals, acc.planned),
                cancellation_rate: rate(acc.cancelled, acc.planned),
                sentiment_score: 0.0,
                bookings: 0,
            }
        })
        .collect()
}
