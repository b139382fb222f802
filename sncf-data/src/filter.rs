//! Record selection by year range, service and station pair.

use sncf_api::record::{Record, ServiceType};
use std::collections::BTreeSet;
use std::ops::RangeInclusive;

/// A user selection. `None` keeps everything for that criterion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFilter {
    pub years: Option<RangeInclusive<i32>>,
    pub service: Option<ServiceType>,
    pub origin: Option<String>,
    pub destination: Option<String>,
}

impl RecordFilter {
    fn matches_years(&self, record: &Record) -> bool {
        self.years
            .as_ref()
            .map_or(true, |years| years.contains(&record.year))
    }

    fn matches_service(&self, record: &Record) -> bool {
        self.service
            .as_ref()
            .map_or(true, |service| &record.service == service)
    }

    fn matches_origin(&self, record: &Record) -> bool {
        self.origin
            .as_deref()
            .map_or(true, |origin| record.departure == origin)
    }

    fn matches_destination(&self, record: &Record) -> bool {
        self.destination
            .as_deref()
            .map_or(true, |destination| record.arrival == destination)
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.matches_years(record)
            && self.matches_service(record)
            && self.matches_origin(record)
            && self.matches_destination(record)
    }

    /// Copy out the records matching every criterion.
    pub fn apply(&self, records: &[Record]) -> Vec<Record> {
        records
            .iter()
            .filter(|r| self.matches(r))
            .cloned()
            .collect()
    }
}

/// Values a selection widget can offer, each narrowed by the choices made
/// before it: years, then services, then origins, then destinations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    pub years: Vec<i32>,
    pub services: Vec<ServiceType>,
    pub origins: Vec<String>,
    pub destinations: Vec<String>,
}

impl FilterOptions {
    pub fn cascade(records: &[Record], filter: &RecordFilter) -> FilterOptions {
        let years: BTreeSet<i32> = records.iter().map(|r| r.year).collect();

        let in_years: Vec<&Record> = records.iter().filter(|r| filter.matches_years(r)).collect();
        let services: BTreeSet<ServiceType> = in_years.iter().map(|r| r.service.clone()).collect();

        let in_service: Vec<&Record> = in_years
            .into_iter()
            .filter(|r| filter.matches_service(r))
            .collect();
        let origins: BTreeSet<String> = in_service
            .iter()
            .filter(|r| !r.departure.is_empty())
            .map(|r| r.departure.clone())
            .collect();

        let destinations: BTreeSet<String> = in_service
            .into_iter()
            .filter(|r| filter.matches_origin(r) && !r.arrival.is_empty())
            .map(|r| r.arrival.clone())
            .collect();

        FilterOptions {
            years: years.into_iter().collect(),
            services: services.into_iter().collect(),
            origins: origins.into_iter().collect(),
            destinations: destinations.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use sncf_api::record::DelayCauses;

    fn record(year: i32, service: ServiceType, departure: &str, arrival: &str) -> Record {
        Record {
            date: NaiveDate::from_ymd_opt(year, 1, 1).unwrap(),
            year,
            month: 1,
            service,
            departure: departure.to_string(),
            arrival: arrival.to_string(),
            planned: 100,
            cancelled: 0,
            late_arrivals: 10,
            avg_arrival_delay: None,
            late_departures: None,
            late_over_15: None,
            late_over_30: None,
            late_over_60: None,
            avg_journey_minutes: None,
            causes: DelayCauses::default(),
        }
    }

    fn sample() -> Vec<Record> {
        vec![
            record(2019, ServiceType::National, "RENNES", "PARIS MONTPARNASSE"),
            record(2020, ServiceType::National, "PARIS LYON", "NICE VILLE"),
            record(2021, ServiceType::International, "PARIS NORD", "LAUSANNE"),
            record(2021, ServiceType::National, "PARIS LYON", "GRENOBLE"),
            record(2022, ServiceType::International, "PARIS LYON", "GENEVE"),
        ]
    }

    #[test]
    fn test_default_filter_keeps_everything() {
        let records = sample();
        assert_eq!(RecordFilter::default().apply(&records), records);
    }

    #[test]
    fn test_filter_by_years_and_origin() {
        let filter = RecordFilter {
            years: Some(2020..=2021),
            origin: Some("PARIS LYON".to_string()),
            ..Default::default()
        };
        let kept = filter.apply(&sample());
        let arrivals: Vec<&str> = kept.iter().map(|r| r.arrival.as_str()).collect();
        assert_eq!(arrivals, vec!["NICE VILLE", "GRENOBLE"]);
    }

    #[test]
    fn test_filter_by_service_and_destination() {
        let filter = RecordFilter {
            service: Some(ServiceType::International),
            destination: Some("GENEVE".to_string()),
            ..Default::default()
        };
        let kept = filter.apply(&sample());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].year, 2022);
    }

    #[test]
    fn test_filter_can_empty_the_selection() {
        let filter = RecordFilter {
            years: Some(2030..=2031),
            ..Default::default()
        };
        assert!(filter.apply(&sample()).is_empty());
    }

    #[test]
    fn test_options_cascade() {
        let filter = RecordFilter {
            years: Some(2021..=2022),
            service: Some(ServiceType::National),
            origin: Some("PARIS LYON".to_string()),
            ..Default::default()
        };
        let options = FilterOptions::cascade(&sample(), &filter);
        assert_eq!(options.years, vec![2019, 2020, 2021, 2022]);
        assert_eq!(
            options.services,
            vec![ServiceType::National, ServiceType::International]
        );
        assert_eq!(options.origins, vec!["PARIS LYON".to_string()]);
        assert_eq!(options.destinations, vec!["GRENOBLE".to_string()]);
    }
}
