//! Paginated client for the SNCF open-data search API.

use crate::page::{keep_recent_years, parse_page};
use crate::record::RawRecord;
use log::{info, warn};
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Search endpoint of the SNCF open-data portal.
pub const BASE_URL: &str = "https://ressources.data.sncf.com/api/records/1.0/search/";

/// Monthly TGV punctuality dataset.
pub const DATASET: &str = "regularite-mensuelle-tgv-aqst";

/// Knobs for a download session.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub base_url: String,
    pub dataset: String,
    /// Records requested per page
    pub rows: usize,
    /// Hard stop on the number of pages read
    pub max_pages: usize,
    pub timeout: Duration,
    /// Attempts per page before giving up on it
    pub max_tries: u32,
    /// First retry delay, doubled after each failed attempt
    pub backoff: Duration,
    /// Years of history kept, counted back from the newest month
    pub years: u32,
}

impl Default for FetchConfig {
    fn default() -> Self {
        FetchConfig {
            base_url: BASE_URL.to_string(),
            dataset: DATASET.to_string(),
            rows: 10_000,
            max_pages: 20,
            timeout: Duration::from_secs(30),
            max_tries: 3,
            backoff: Duration::from_millis(1000),
            years: 5,
        }
    }
}

pub struct SncfClient {
    client: Client,
    config: FetchConfig,
}

impl SncfClient {
    pub fn new(config: FetchConfig) -> anyhow::Result<SncfClient> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(SncfClient { client, config })
    }

    /// Fetch one page starting at `start`, retrying with exponential backoff.
    ///
    /// Returns None once every attempt has failed.
    async fn get_page(&self, start: usize) -> Option<Vec<RawRecord>> {
        let max_tries = self.config.max_tries.max(1);
        let mut sleep_for = self.config.backoff;
        let query = [
            ("dataset", self.config.dataset.clone()),
            ("rows", self.config.rows.to_string()),
            ("start", start.to_string()),
            ("sort", "date".to_string()),
            ("facet", "service".to_string()),
            ("facet", "gare_depart".to_string()),
            ("facet", "gare_arrivee".to_string()),
        ];

        for attempt in 1..=max_tries {
            match self
                .client
                .get(&self.config.base_url)
                .query(&query)
                .send()
                .await
            {
                Ok(response) => {
                    if response.status() != StatusCode::OK {
                        warn!(
                            "Attempt {}/{}: Bad response status for page at {}: {}",
                            attempt,
                            max_tries,
                            start,
                            response.status()
                        );
                    } else {
                        match response.text().await {
                            Ok(body) => match parse_page(&body) {
                                Ok(records) => return Some(records),
                                Err(e) => {
                                    warn!(
                                        "Attempt {}/{}: Unreadable page at {}: {}",
                                        attempt, max_tries, start, e
                                    );
                                }
                            },
                            Err(e) => {
                                warn!(
                                    "Attempt {}/{}: Failed to read response body at {}: {}",
                                    attempt, max_tries, start, e
                                );
                            }
                        }
                    }
                }
                Err(e) => {
                    warn!(
                        "Attempt {}/{}: Request failed for page at {}: {}",
                        attempt, max_tries, start, e
                    );
                }
            }

            if attempt < max_tries {
                info!(
                    "Sleeping for {} milliseconds before retrying page at {}",
                    sleep_for.as_millis(),
                    start
                );
                tokio::time::sleep(sleep_for).await;
                sleep_for *= 2;
            }
        }

        warn!("All attempts failed for page at {}", start);
        None
    }

    /// Download the dataset page by page and keep the configured window of years.
    ///
    /// A failure on the first page yields an empty result. A failure later on
    /// stops pagination and keeps what was already read.
    pub async fn fetch_records(&self) -> Vec<RawRecord> {
        let mut all_records: Vec<RawRecord> = Vec::new();
        let mut offset = 0;

        for _ in 0..self.config.max_pages {
            let records = match self.get_page(offset).await {
                Some(records) => records,
                None if offset == 0 => return Vec::new(),
                None => break,
            };
            if records.is_empty() {
                break;
            }

            let page_len = records.len();
            offset += page_len;
            all_records.extend(records);
            info!("Fetched {} records ({} total)", page_len, all_records.len());

            if page_len < self.config.rows {
                break;
            }
        }

        if all_records.is_empty() {
            return all_records;
        }
        let kept = keep_recent_years(all_records, self.config.years);
        info!(
            "Kept {} records from the last {} years",
            kept.len(),
            self.config.years
        );
        kept
    }
}
