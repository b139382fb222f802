//! Command implementations for the SNCF punctuality CLI.
//!
//! Provides subcommands for downloading the monthly TGV punctuality
//! dataset and for deriving the figures a dashboard displays from it.

use clap::{Args, Subcommand};
use sncf_api::record::ServiceType;
use sncf_data::filter::RecordFilter;

pub mod fetch;
pub mod report;

/// Selection shared by every reporting command.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// First year to include
    #[arg(long)]
    pub from_year: Option<i32>,

    /// Last year to include
    #[arg(long)]
    pub to_year: Option<i32>,

    /// Service type ("National", "International")
    #[arg(long)]
    pub service: Option<String>,

    /// Departure station, exactly as spelled in the dataset
    #[arg(long)]
    pub origin: Option<String>,

    /// Arrival station, exactly as spelled in the dataset
    #[arg(long)]
    pub destination: Option<String>,
}

impl FilterArgs {
    pub fn to_filter(&self) -> RecordFilter {
        let years = match (self.from_year, self.to_year) {
            (None, None) => None,
            (from, to) => Some(from.unwrap_or(i32::MIN)..=to.unwrap_or(i32::MAX)),
        };
        RecordFilter {
            years,
            service: self.service.as_deref().map(ServiceType::from),
            origin: self.origin.clone(),
            destination: self.destination.clone(),
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Download punctuality records from the SNCF open-data API
    Fetch {
        /// Output path for the raw records CSV
        #[arg(short = 'o', long)]
        output: String,

        /// Years of history to keep, counted back from the newest month
        #[arg(long, default_value_t = 5)]
        years: u32,

        /// Override the search API endpoint
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Monthly late and cancellation rates with synthetic sentiment and bookings
    Metrics {
        /// Path to a raw records CSV written by `fetch`
        #[arg(short = 'i', long)]
        input: String,

        /// Output path for the monthly metrics CSV
        #[arg(short = 'o', long)]
        output: String,

        /// Seed for the synthetic series
        #[arg(long, default_value_t = sncf_data::synthetic::DEFAULT_SEED)]
        seed: u64,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Per-departure-station late rates with map coordinates, as JSON
    Stations {
        /// Path to a raw records CSV written by `fetch`
        #[arg(short = 'i', long)]
        input: String,

        /// Output path for the markers JSON
        #[arg(short = 'o', long)]
        output: String,

        /// Custom gazetteer CSV (name,latitude,longitude) instead of the embedded one
        #[arg(long)]
        stations: Option<String>,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Print headline figures for a selection
    Kpis {
        /// Path to a raw records CSV written by `fetch`
        #[arg(short = 'i', long)]
        input: String,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// List the years, services and stations a selection can narrow down to
    Options {
        /// Path to a raw records CSV written by `fetch`
        #[arg(short = 'i', long)]
        input: String,

        #[command(flatten)]
        filter: FilterArgs,
    },
}

pub async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Fetch {
            output,
            years,
            base_url,
        } => fetch::run_fetch(&output, years, base_url).await,
        Command::Metrics {
            input,
            output,
            seed,
            filter,
        } => report::run_metrics(&input, &output, seed, &filter.to_filter()),
        Command::Stations {
            input,
            output,
            stations,
            filter,
        } => report::run_stations(&input, &output, stations.as_deref(), &filter.to_filter()),
        Command::Kpis { input, filter } => report::run_kpis(&input, &filter.to_filter()),
        Command::Options { input, filter } => report::run_options(&input, &filter.to_filter()),
    }
}

#[cfg(test)]
mod tests {
    use super::FilterArgs;
    use sncf_api::record::ServiceType;

    #[test]
    fn test_empty_filter_args() {
        let filter = FilterArgs::default().to_filter();
        assert_eq!(filter.years, None);
        assert_eq!(filter.service, None);
    }

    #[test]
    fn test_open_ended_year_range() {
        let args = FilterArgs {
            from_year: Some(2021),
            service: Some("international".to_string()),
            ..Default::default()
        };
        let filter = args.to_filter();
        let years = filter.years.unwrap();
        assert!(years.contains(&2021));
        assert!(years.contains(&2030));
        assert!(!years.contains(&2020));
        assert_eq!(filter.service, Some(ServiceType::International));
    }
}
