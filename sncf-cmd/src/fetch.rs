//! Download of the monthly TGV punctuality dataset.

use log::info;
use sncf_api::client::{FetchConfig, SncfClient};
use sncf_api::record::write_records_csv;
use std::fs::File;

/// Fetch the last `years` years of records and store them as CSV.
pub async fn run_fetch(
    output_csv: &str,
    years: u32,
    base_url: Option<String>,
) -> anyhow::Result<()> {
    let mut config = FetchConfig {
        years,
        ..Default::default()
    };
    if let Some(url) = base_url {
        config.base_url = url;
    }

    info!(
        "Querying {} from {} ({} years)",
        config.dataset, config.base_url, config.years
    );
    let client = SncfClient::new(config)?;
    let records = client.fetch_records().await;
    if records.is_empty() {
        anyhow::bail!(
            "Unable to load data from the SNCF API. Check the network connection or try again later."
        );
    }

    let file = File::create(output_csv)?;
    write_records_csv(file, &records)?;
    info!(
        "Fetch complete. {} records written to {}",
        records.len(),
        output_csv
    );
    Ok(())
}
