use clap::{Arg, ArgMatches, Command};
use cli_table::{format::Justify, Table, WithTitle};
use prometheus_client::encoding::text::encode;
use std::process;

use crate::config::config::Config;
use crate::metrics::collector::{snapshot_registry, GpuDescriptors, MetricDescriptor};
use crate::metrics::snapshot;
use crate::slurm::error::CollectError;
use crate::slurm::inventory::{InventoryFetcher, SinfoCommand};

pub(crate) fn command_config() -> Command {
    Command::new("collect")
        .about("Query the cluster once and print the GPU metrics")
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .value_parser(["table", "json", "text"])
                .default_value("table")
                .help("Output format; text prints the scrape body")
        )
}

#[derive(Table)]
struct MetricItem {
    #[table(title = "Metric")]
    name: String,
    #[table(title = "Value", justify = "Justify::Right")]
    value: f64,
}

pub(crate) fn execute(args: &ArgMatches, configuration: Config) {
    let fetcher = SinfoCommand::new(configuration.sinfo.command.clone());
    let format = args.get_one::<String>("format")
        .map(|s| s.as_str())
        .unwrap_or("table");

    match render(format, &fetcher) {
        Ok(output) => print!("{}", output),
        Err(err) => {
            eprintln!("Error: {}", err);
            process::exit(1);
        }
    }
}

/// Runs the pipeline once; a failing inventory query is an error in every format.
pub(crate) fn render(format: &str, fetcher: &dyn InventoryFetcher) -> Result<String, CollectError> {
    let metrics = snapshot::collect(fetcher)?;

    match format {
        "text" => {
            let registry = snapshot_registry(&metrics);
            let mut body = String::new();
            encode(&mut body, &registry)
                .map_err(|err| CollectError::Output(format!("{}", err)))?;

            Ok(body)
        }
        "json" => {
            let json = serde_json::to_string_pretty(&metrics)
                .map_err(|err| CollectError::Output(format!("{}", err)))?;

            Ok(format!("{}\n", json))
        }
        _ => {
            let items: Vec<MetricItem> = GpuDescriptors::new()
                .samples(&metrics)
                .into_iter()
                .map(|(descriptor, value): (MetricDescriptor, f64)| MetricItem {
                    name: descriptor.name.to_string(),
                    value,
                })
                .collect();

            let table = items.with_title()
                .display()
                .map_err(|err| CollectError::Output(format!("{}", err)))?;

            Ok(format!("{}\n", table))
        }
    }
}
