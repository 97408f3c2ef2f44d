use clap::{Arg, ArgAction, ArgMatches, Command};
use log::info;
use std::process;
use std::sync::Arc;

use crate::api::server as ApiServer;
use crate::config::config::Config;
use crate::metrics::collector::build_registry;
use crate::slurm::inventory::SinfoCommand;

pub(crate) fn command_config() -> Command {
    Command::new("server")
        .about("Start the metrics exporter")
        .arg(
            Arg::new("listen-address")
                .long("listen-address")
                .help("Address to listen on for scrape requests (e.g. 0.0.0.0:8080)")
        )
        .arg(
            Arg::new("metrics-path")
                .long("metrics-path")
                .help("Path under which metrics are exposed")
        )
        .arg(
            Arg::new("no-gpus")
                .long("no-gpus")
                .help("Do not register the GPU collector")
                .action(ArgAction::SetTrue)
        )
}

pub(crate) async fn execute(_args: &ArgMatches, configuration: Config) {
    info!("Start server");
    debug!("Configuration {:?}", configuration);

    let fetcher = Arc::new(SinfoCommand::new(configuration.sinfo.command.clone()));
    let registry = Arc::new(build_registry(&configuration, fetcher));

    if let Err(err) = ApiServer::start(registry, configuration).await {
        error!("Server stopped: {}", err);
        eprintln!("Error: {}", err);
        process::exit(1);
    }
}
