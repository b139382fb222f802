//! Command line entry point for the SNCF punctuality toolkit.

use clap::Parser;
use env_logger::Env;

#[derive(Parser)]
#[command(
    name = "sncf-cli",
    version,
    about = "Fetch SNCF TGV punctuality data and derive dashboard series from it"
)]
struct Cli {
    #[command(subcommand)]
    command: sncf_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Progress is logged at info; RUST_LOG overrides it.
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
    let cli = Cli::parse();
    sncf_cmd::run(cli.command).await
}

#[cfg(test)]
mod tests {
    use super::Cli;
    use clap::Parser;
    use sncf_cmd::Command;

    #[test]
    fn test_parse_kpis_with_filters() {
        let cli = Cli::try_parse_from([
            "sncf-cli",
            "kpis",
            "-i",
            "records.csv",
            "--from-year",
            "2021",
            "--service",
            "National",
        ])
        .unwrap();
        match cli.command {
            Command::Kpis { input, filter } => {
                assert_eq!(input, "records.csv");
                assert_eq!(filter.from_year, Some(2021));
                assert_eq!(filter.to_year, None);
                assert_eq!(filter.service.as_deref(), Some("National"));
            }
            _ => panic!("expected the kpis command"),
        }
    }

    #[test]
    fn test_metrics_requires_output() {
        assert!(Cli::try_parse_from(["sncf-cli", "metrics", "-i", "records.csv"]).is_err());
    }
}
