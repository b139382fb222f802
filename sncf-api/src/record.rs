use chrono::NaiveDate;
use csv::{ReaderBuilder, WriterBuilder};
use serde::{Deserialize, Serialize};
use sncf_utils::dates::parse_year_month;
use std::fmt;
use std::io::{Read, Write};

/// One row of the `regularite-mensuelle-tgv-aqst` dataset, as the API hands it over.
///
/// Every numeric field is optional: columns come and go between versions of
/// the dataset, and a missing column simply deserializes to `None`.
#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawRecord {
    /// Month key, "YYYY-MM"
    pub date: String,
    pub service: String,
    pub gare_depart: String,
    pub gare_arrivee: String,
    /// Mean journey time in minutes
    pub duree_moyenne: Option<f64>,
    pub nb_train_prevu: Option<f64>,
    pub nb_annulation: Option<f64>,
    pub nb_train_depart_retard: Option<f64>,
    pub retard_moyen_depart: Option<f64>,
    pub retard_moyen_tous_trains_depart: Option<f64>,
    pub nb_train_retard_arrivee: Option<f64>,
    pub retard_moyen_arrivee: Option<f64>,
    pub retard_moyen_tous_trains_arrivee: Option<f64>,
    pub nb_train_retard_sup_15: Option<f64>,
    pub nb_train_retard_sup_30: Option<f64>,
    pub nb_train_retard_sup_60: Option<f64>,
    pub prct_cause_externe: Option<f64>,
    pub prct_cause_infra: Option<f64>,
    pub prct_cause_gestion_trafic: Option<f64>,
    pub prct_cause_materiel_roulant: Option<f64>,
    pub prct_cause_gestion_gare: Option<f64>,
    pub prct_cause_prise_en_charge_voyageurs: Option<f64>,
}

impl RawRecord {
    /// The first day of the record's month, if the month key parses.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_year_month(&self.date).ok()
    }
}

/// Read raw records from CSV (headers named after the API fields).
pub fn read_records_csv<R: Read>(reader: R) -> Result<Vec<RawRecord>, csv::Error> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    rdr.deserialize().collect()
}

/// Write raw records as CSV with a header row.
pub fn write_records_csv<W: Write>(writer: W, records: &[RawRecord]) -> Result<(), csv::Error> {
    let mut wtr = WriterBuilder::new().has_headers(true).from_writer(writer);
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Kind of TGV service as labelled by SNCF.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ServiceType {
    National,
    International,
    Other(String),
}

impl From<&str> for ServiceType {
    fn from(value: &str) -> Self {
        let trimmed = value.trim();
        match trimmed.to_lowercase().as_str() {
            "national" => ServiceType::National,
            "international" => ServiceType::International,
            _ => ServiceType::Other(trimmed.to_string()),
        }
    }
}

impl From<String> for ServiceType {
    fn from(value: String) -> Self {
        ServiceType::from(value.as_str())
    }
}

impl From<ServiceType> for String {
    fn from(value: ServiceType) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceType::National => write!(f, "National"),
            ServiceType::International => write!(f, "International"),
            ServiceType::Other(s) => write!(f, "{s}"),
        }
    }
}

/// Share of delay minutes attributed to each cause, in percent.
#[derive(Debug, PartialEq, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DelayCauses {
    pub external: Option<f64>,
    pub infrastructure: Option<f64>,
    pub traffic_management: Option<f64>,
    pub rolling_stock: Option<f64>,
    pub station_management: Option<f64>,
    pub passenger_handling: Option<f64>,
}

/// An enriched monthly observation for one departure/arrival pair.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Record {
    /// First day of the observed month
    pub date: NaiveDate,
    pub year: i32,
    pub month: u32,
    pub service: ServiceType,
    pub departure: String,
    pub arrival: String,
    pub planned: u32,
    pub cancelled: u32,
    pub late_arrivals: u32,
    /// Mean arrival delay over all trains, in minutes
    pub avg_arrival_delay: Option<f64>,
    pub late_departures: Option<u32>,
    pub late_over_15: Option<u32>,
    pub late_over_30: Option<u32>,
    pub late_over_60: Option<u32>,
    pub avg_journey_minutes: Option<f64>,
    pub causes: DelayCauses,
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV_DATA: &str = "\
date,service,gare_depart,gare_arrivee,nb_train_prevu,nb_annulation,nb_train_retard_arrivee,retard_moyen_tous_trains_arrivee
2023-01,National,PARIS LYON,MARSEILLE ST CHARLES,420,3,61,5.2
2023-02,International,PARIS NORD,LILLE EUROPE,,,,
";

    #[test]
    fn test_read_records_csv() {
        let records = read_records_csv(CSV_DATA.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].gare_depart, "PARIS LYON");
        assert_eq!(records[0].nb_train_prevu, Some(420.0));
        assert_eq!(records[0].retard_moyen_tous_trains_arrivee, Some(5.2));
        assert_eq!(records[0].prct_cause_infra, None);
        assert_eq!(records[1].nb_train_prevu, None);
        assert_eq!(
            records[1].parsed_date(),
            NaiveDate::from_ymd_opt(2023, 2, 1)
        );
    }

    #[test]
    fn test_write_then_read_keeps_records() {
        let records = read_records_csv(CSV_DATA.as_bytes()).unwrap();
        let mut buffer = Vec::new();
        write_records_csv(&mut buffer, &records).unwrap();
        let reread = read_records_csv(buffer.as_slice()).unwrap();
        assert_eq!(reread, records);
    }

    #[test]
    fn test_parsed_date_invalid() {
        let record = RawRecord {
            date: "not a month".to_string(),
            ..Default::default()
        };
        assert_eq!(record.parsed_date(), None);
    }

    #[test]
    fn test_service_type_parsing() {
        assert_eq!(ServiceType::from("National"), ServiceType::National);
        assert_eq!(ServiceType::from(" INTERNATIONAL "), ServiceType::International);
        assert_eq!(
            ServiceType::from("Ouigo"),
            ServiceType::Other("Ouigo".to_string())
        );
        assert_eq!(ServiceType::International.to_string(), "International");
    }
}
