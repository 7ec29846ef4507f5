#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for the incident panel.
//!
//! Without a subcommand it starts the interactive walkthrough, which
//! prompts for each filter stage in order with options narrowed by the
//! stages before it. Subcommands print the same views non-interactively
//! (optionally as JSON) or start the API server.

mod interactive;
mod output;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use incident_panel_analytics::build_report;
use incident_panel_dataset::DatasetCache;
use incident_panel_filter::evaluate;
use incident_panel_filter_models::{
    FilterCriteria, parse_secretariat_choice, unknown_secretariat_message,
};
use incident_panel_server::ServerOptions;
use incident_panel_server_models::{ApiIncident, OptionsResponse, SummaryResponse};
use incident_panel_source::DatasetConfig;

#[derive(Parser)]
#[command(name = "incident_panel", about = "Camera incident panel")]
struct Cli {
    /// Dataset config TOML (defaults to the built-in layout)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Incident export CSV (overrides config and `INCIDENTS_CSV`)
    #[arg(long, global = true)]
    incidents: Option<PathBuf>,
    /// Camera catalog CSV (overrides config and `CAMERAS_CSV`)
    #[arg(long, global = true)]
    cameras: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk through the filters interactively
    Interactive,
    /// Show load counts and camera catalog status
    Report {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Show the option set of every filter stage
    Options {
        #[command(flatten)]
        filters: FilterArgs,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Show metrics, the per-camera table and breakdowns
    Summary {
        #[command(flatten)]
        filters: FilterArgs,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// List the filtered incidents
    Incidents {
        #[command(flatten)]
        filters: FilterArgs,
        /// Maximum rows to print
        #[arg(long, default_value = "50")]
        limit: usize,
        /// Rows to skip
        #[arg(long, default_value = "0")]
        offset: usize,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Start the API server
    Serve {
        /// Bind address (default: `BIND_ADDR` or 127.0.0.1)
        #[arg(long)]
        bind_addr: Option<String>,
        /// Port (default: `PORT` or 8080)
        #[arg(long)]
        port: Option<u16>,
        /// Ask for the address and port before starting
        #[arg(long, conflicts_with_all = ["bind_addr", "port"])]
        prompt: bool,
    },
}

/// Filter selections shared by the reporting subcommands.
#[derive(Args)]
struct FilterArgs {
    /// First day (YYYY-MM-DD). Defaults to the earliest incident.
    #[arg(long)]
    from: Option<NaiveDate>,
    /// Last day, inclusive (YYYY-MM-DD). Defaults to the latest incident.
    #[arg(long)]
    to: Option<NaiveDate>,
    /// SG, SCSP, Outros or Todas
    #[arg(long, default_value = "Todas")]
    secretariat: String,
    /// Region (repeatable)
    #[arg(long = "region")]
    regions: Vec<String>,
    /// Neighborhood (repeatable)
    #[arg(long = "neighborhood")]
    neighborhoods: Vec<String>,
    /// Canonical camera identifier (repeatable)
    #[arg(long = "camera")]
    cameras: Vec<String>,
    /// Incident type (repeatable)
    #[arg(long = "incident-type")]
    incident_types: Vec<String>,
    /// Problem category (repeatable)
    #[arg(long = "problem")]
    problem_categories: Vec<String>,
}

impl FilterArgs {
    fn into_criteria(self) -> Result<FilterCriteria, String> {
        let secretariat = parse_secretariat_choice(&self.secretariat)
            .map_err(|_| unknown_secretariat_message(&self.secretariat))?;

        Ok(FilterCriteria {
            start_date: self.from,
            end_date: self.to,
            secretariat,
            regions: self.regions,
            neighborhoods: self.neighborhoods,
            cameras: self.cameras,
            incident_types: self.incident_types,
            problem_categories: self.problem_categories,
        })
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let config =
        DatasetConfig::resolve(cli.config.as_deref())?.with_paths(cli.incidents, cli.cameras);

    match cli.command {
        None | Some(Commands::Interactive) => {
            let cache = DatasetCache::from_config(config);
            interactive::run(&cache)?;
        }
        Some(Commands::Report { json }) => {
            let cache = DatasetCache::from_config(config);
            let loaded = cache.get_or_load()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&loaded.report)?);
            } else {
                output::print_load_report(&loaded.report);
            }
        }
        Some(Commands::Options { filters, json }) => {
            let criteria = filters.into_criteria()?;
            let cache = DatasetCache::from_config(config);
            let loaded = cache.get_or_load()?;
            let outcome = evaluate(&loaded.dataset, &criteria)?;
            if json {
                let response = OptionsResponse::from(&outcome.options);
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                output::print_options(&outcome.options);
            }
        }
        Some(Commands::Summary { filters, json }) => {
            let criteria = filters.into_criteria()?;
            let cache = DatasetCache::from_config(config);
            let loaded = cache.get_or_load()?;
            let outcome = evaluate(&loaded.dataset, &criteria)?;
            let report = build_report(&outcome.records);
            if json {
                let response = SummaryResponse {
                    applied_range: outcome.options.applied_range,
                    enriched: loaded.dataset.is_enriched(),
                    report,
                };
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                output::print_dashboard(&report, outcome.options.applied_range.as_ref());
            }
        }
        Some(Commands::Incidents {
            filters,
            limit,
            offset,
            json,
        }) => {
            let criteria = filters.into_criteria()?;
            let cache = DatasetCache::from_config(config);
            let loaded = cache.get_or_load()?;
            let outcome = evaluate(&loaded.dataset, &criteria)?;
            let page: Vec<_> = outcome
                .records
                .iter()
                .skip(offset)
                .take(limit)
                .copied()
                .collect();
            if json {
                let rows: Vec<ApiIncident> =
                    page.iter().map(|row| ApiIncident::from(*row)).collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                output::print_incidents(&page, outcome.len(), offset);
            }
        }
        Some(Commands::Serve { prompt: true, .. }) => {
            actix_web::rt::System::new()
                .block_on(incident_panel_server::interactive::run(config))?;
        }
        Some(Commands::Serve {
            bind_addr, port, ..
        }) => {
            let defaults = ServerOptions::from_env();
            let options = ServerOptions {
                bind_addr: bind_addr.unwrap_or(defaults.bind_addr),
                port: port.unwrap_or(defaults.port),
            };
            actix_web::rt::System::new()
                .block_on(incident_panel_server::run_server(config, options))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use incident_panel_incident_models::Secretariat;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn filter_flags_build_criteria() {
        let cli = Cli::try_parse_from([
            "incident_panel",
            "summary",
            "--from",
            "2024-01-01",
            "--to",
            "2024-01-15",
            "--secretariat",
            "SCSP",
            "--region",
            "Norte",
            "--region",
            "Sul",
            "--problem",
            "Lixo",
        ])
        .unwrap();

        let Some(Commands::Summary { filters, json }) = cli.command else {
            panic!("expected summary subcommand");
        };
        assert!(!json);
        let criteria = filters.into_criteria().unwrap();
        assert_eq!(criteria.start_date, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(criteria.end_date, NaiveDate::from_ymd_opt(2024, 1, 15));
        assert_eq!(criteria.secretariat, Some(Secretariat::Scsp));
        assert_eq!(criteria.regions, vec!["Norte", "Sul"]);
        assert_eq!(criteria.problem_categories, vec!["Lixo"]);
        assert!(criteria.cameras.is_empty());
    }

    #[test]
    fn todas_is_the_default_secretariat() {
        let cli = Cli::try_parse_from(["incident_panel", "options"]).unwrap();
        let Some(Commands::Options { filters, .. }) = cli.command else {
            panic!("expected options subcommand");
        };
        assert_eq!(filters.into_criteria().unwrap().secretariat, None);
    }

    #[test]
    fn unknown_secretariat_is_rejected() {
        let cli =
            Cli::try_parse_from(["incident_panel", "summary", "--secretariat", "XYZ"]).unwrap();
        let Some(Commands::Summary { filters, .. }) = cli.command else {
            panic!("expected summary subcommand");
        };
        let err = filters.into_criteria().unwrap_err();
        assert!(err.contains("'XYZ'"));
        assert!(err.ends_with("expected Todas, SG, SCSP or Outros"));
    }

    #[test]
    fn serve_prompt_conflicts_with_explicit_address() {
        assert!(
            Cli::try_parse_from(["incident_panel", "serve", "--prompt", "--port", "9000"]).is_err()
        );
        let cli = Cli::try_parse_from(["incident_panel", "serve", "--prompt"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Serve { prompt: true, .. })));
    }

    #[test]
    fn no_subcommand_means_interactive() {
        let cli = Cli::try_parse_from(["incident_panel", "--incidents", "x.csv"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.incidents, Some(PathBuf::from("x.csv")));
    }
}
