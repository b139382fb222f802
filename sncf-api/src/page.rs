//! Parsing of `records/1.0/search` responses from the SNCF open-data portal.

use crate::record::RawRecord;
use log::debug;
use serde::Deserialize;
use sncf_utils::dates::years_before;

/// A single hit in a search response. Only `fields` carries data.
#[derive(Debug, Deserialize)]
struct Hit {
    #[serde(default)]
    fields: RawRecord,
}

/// Top-level search response body.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    records: Vec<Hit>,
}

/// Parse one page of search results into raw records.
pub fn parse_page(body: &str) -> Result<Vec<RawRecord>, serde_json::Error> {
    let response: SearchResponse = serde_json::from_str(body)?;
    Ok(response.records.into_iter().map(|hit| hit.fields).collect())
}

/// Keep only the records from the last `years` years before the newest month.
///
/// Records whose month key does not parse are dropped.
pub fn keep_recent_years(records: Vec<RawRecord>, years: u32) -> Vec<RawRecord> {
    let dated: Vec<_> = records
        .into_iter()
        .filter_map(|record| match record.parsed_date() {
            Some(date) => Some((date, record)),
            None => {
                debug!("Dropping record with unparseable date {:?}", record.date);
                None
            }
        })
        .collect();
    let Some(newest) = dated.iter().map(|(date, _)| *date).max() else {
        return Vec::new();
    };
    let oldest = years_before(&newest, years);
    dated
        .into_iter()
        .filter(|(date, _)| *date >= oldest)
        .map(|(_, record)| record)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"{
  "nhits": 2,
  "parameters": {"dataset": "regularite-mensuelle-tgv-aqst", "rows": 10000, "start": 0},
  "records": [
    {
      "datasetid": "regularite-mensuelle-tgv-aqst",
      "recordid": "a1",
      "fields": {
        "date": "2023-05",
        "service": "National",
        "gare_depart": "PARIS MONTPARNASSE",
        "gare_arrivee": "BORDEAUX ST JEAN",
        "nb_train_prevu": 812,
        "nb_annulation": 4,
        "nb_train_retard_arrivee": 97,
        "retard_moyen_tous_trains_arrivee": 4.83,
        "prct_cause_externe": 31.2,
        "commentaire_annulation": null
      },
      "record_timestamp": "2024-01-01T00:00:00Z"
    },
    {
      "datasetid": "regularite-mensuelle-tgv-aqst",
      "recordid": "a2",
      "fields": {
        "date": "2023-06",
        "service": "International",
        "gare_depart": "PARIS NORD",
        "gare_arrivee": "LILLE EUROPE"
      }
    }
  ]
}"#;

    fn record(date: &str) -> RawRecord {
        RawRecord {
            date: date.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_page() {
        let records = parse_page(PAGE).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].gare_arrivee, "BORDEAUX ST JEAN");
        assert_eq!(records[0].nb_train_prevu, Some(812.0));
        assert_eq!(records[0].prct_cause_externe, Some(31.2));
        assert_eq!(records[1].service, "International");
        assert_eq!(records[1].nb_train_prevu, None);
    }

    #[test]
    fn test_parse_empty_page() {
        assert!(parse_page(r#"{"nhits": 0, "records": []}"#).unwrap().is_empty());
        assert!(parse_page("{}").unwrap().is_empty());
        assert!(parse_page("<html>").is_err());
    }

    #[test]
    fn test_keep_recent_years() {
        let records = vec![
            record("2017-12"),
            record("2018-06"),
            record("2019-01"),
            record("garbage"),
            record("2023-06"),
        ];
        let kept = keep_recent_years(records, 5);
        let dates: Vec<&str> = kept.iter().map(|r| r.date.as_str()).collect();
        assert_eq!(dates, vec!["2018-06", "2019-01", "2023-06"]);
    }

    #[test]
    fn test_keep_recent_years_without_dates() {
        assert!(keep_recent_years(vec![record(""), record("n/a")], 5).is_empty());
        assert!(keep_recent_years(Vec::new(), 5).is_empty());
    }
}
