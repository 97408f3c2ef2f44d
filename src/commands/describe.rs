use clap::{ArgMatches, Command};
use cli_table::{print_stdout, Table, WithTitle};

use std::sync::Arc;

use crate::config::config::Config;
use crate::metrics::collector::GpusCollector;
use crate::slurm::inventory::SinfoCommand;

pub(crate) fn command_config() -> Command {
    Command::new("describe")
        .about("Print the exported metrics without querying the cluster")
}

#[derive(Table)]
struct DescriptorItem {
    #[table(title = "Name")]
    name: String,
    #[table(title = "Type")]
    kind: String,
    #[table(title = "Help")]
    help: String,
}

pub(crate) fn execute(_args: &ArgMatches, configuration: Config) {
    let collector = GpusCollector::new(Arc::new(SinfoCommand::new(configuration.sinfo.command)));

    let descriptors: Vec<DescriptorItem> = collector
        .describe()
        .iter()
        .map(|descriptor| DescriptorItem {
            name: descriptor.name.to_string(),
            kind: "gauge".to_string(),
            help: descriptor.help.to_string(),
        })
        .collect();

    if let Err(err) = print_stdout(descriptors.with_title()) {
        eprintln!("Error: {}", err);
    }
}
