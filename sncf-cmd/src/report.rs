//! Reports derived from a stored records CSV.

use anyhow::Context;
use log::{info, warn};
use serde::Serialize;
use sncf_api::record::{read_records_csv, Record};
use sncf_api::station::{Coordinates, StationTable};
use sncf_data::enrich::enrich;
use sncf_data::filter::{FilterOptions, RecordFilter};
use sncf_data::kpi::{format_thousands, Kpis};
use sncf_data::monthly::{aggregate_monthly, MonthlyMetric};
use sncf_data::stations::{map_center, station_markers, StationMarker};
use sncf_data::synthetic::SyntheticGenerator;
use std::fs::File;
use std::io::{Read, Write};

/// Map payload: markers plus where to center the view.
#[derive(Debug, Serialize)]
pub struct StationsReport {
    pub center: Option<Coordinates>,
    pub markers: Vec<StationMarker>,
}

/// Read and enrich every record of a raw CSV.
pub fn load_records<R: Read>(reader: R) -> anyhow::Result<Vec<Record>> {
    let raw = read_records_csv(reader)?;
    let records = enrich(&raw);
    info!("Loaded {} records ({} raw rows)", records.len(), raw.len());
    Ok(records)
}

fn load_selection(input_csv: &str, filter: &RecordFilter) -> anyhow::Result<Vec<Record>> {
    let file = File::open(input_csv).with_context(|| format!("Failed to open {input_csv}"))?;
    let records = load_records(file)?;
    let selection = filter.apply(&records);
    info!("{} records match the selection", selection.len());
    Ok(selection)
}

/// Monthly aggregate with the synthetic series filled in.
pub fn monthly_report(records: &[Record], seed: u64) -> anyhow::Result<Vec<MonthlyMetric>> {
    let monthly = aggregate_monthly(records);
    let mut generator = SyntheticGenerator::with_seed(seed)?;
    Ok(generator.apply(monthly))
}

pub fn write_metrics_csv<W: Write>(writer: W, metrics: &[MonthlyMetric]) -> anyhow::Result<()> {
    let mut wtr = csv::WriterBuilder::new().has_headers(true).from_writer(writer);
    for metric in metrics {
        wtr.serialize(metric)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn stations_report(records: &[Record], table: &StationTable) -> StationsReport {
    let markers = station_markers(records, table);
    StationsReport {
        center: map_center(&markers),
        markers,
    }
}

pub fn run_metrics(
    input_csv: &str,
    output_csv: &str,
    seed: u64,
    filter: &RecordFilter,
) -> anyhow::Result<()> {
    let selection = load_selection(input_csv, filter)?;
    if selection.is_empty() {
        warn!("No data available for the selected filters");
        return Ok(());
    }
    let metrics = monthly_report(&selection, seed)?;
    write_metrics_csv(File::create(output_csv)?, &metrics)?;
    info!("{} monthly rows written to {}", metrics.len(), output_csv);
    Ok(())
}

pub fn run_stations(
    input_csv: &str,
    output_json: &str,
    stations_csv: Option<&str>,
    filter: &RecordFilter,
) -> anyhow::Result<()> {
    let table = match stations_csv {
        Some(path) => {
            let data = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {path}"))?;
            StationTable::parse_station_csv(&data)
                .map_err(|e| anyhow::anyhow!("Failed to parse stations CSV: {}", e))?
        }
        None => StationTable::embedded(),
    };

    let selection = load_selection(input_csv, filter)?;
    if selection.is_empty() {
        warn!("No data available for the selected filters");
        return Ok(());
    }
    let report = stations_report(&selection, &table);
    if report.markers.is_empty() {
        warn!("No geolocation available for the selected stations");
    }
    serde_json::to_writer_pretty(File::create(output_json)?, &report)?;
    info!(
        "{} station markers written to {}",
        report.markers.len(),
        output_json
    );
    Ok(())
}

pub fn run_kpis(input_csv: &str, filter: &RecordFilter) -> anyhow::Result<()> {
    let selection = load_selection(input_csv, filter)?;
    let Some(kpis) = Kpis::from_records(&selection) else {
        warn!("No data available for the selected filters");
        return Ok(());
    };
    println!("Planned trains:      {}", format_thousands(kpis.total_planned));
    println!("Cancellations:       {}", format_thousands(kpis.total_cancelled));
    println!("Late arrivals:       {}", format_thousands(kpis.total_late));
    println!("Mean delay (min):    {:.1}", kpis.mean_delay);
    Ok(())
}

pub fn run_options(input_csv: &str, filter: &RecordFilter) -> anyhow::Result<()> {
    let file = File::open(input_csv).with_context(|| format!("Failed to open {input_csv}"))?;
    let records = load_records(file)?;
    let options = FilterOptions::cascade(&records, filter);
    let years: Vec<String> = options.years.iter().map(|y| y.to_string()).collect();
    let services: Vec<String> = options.services.iter().map(|s| s.to_string()).collect();
    println!("Years:        {}", years.join(", "));
    println!("Services:     {}", services.join(", "));
    println!("Origins:      {}", options.origins.join(", "));
    println!("Destinations: {}", options.destinations.join(", "));
    Ok(())
}
