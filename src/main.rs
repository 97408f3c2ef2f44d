use clap::{Arg, Command};

#[macro_use]
extern crate log;
extern crate env_logger;

mod commands {
  pub(crate) mod server;
  pub(crate) mod collect;
  pub(crate) mod describe;
}

mod config {
    pub(crate) mod config;
    pub(crate) mod gpus;
    pub(crate) mod sinfo;
}

mod slurm {
    pub(crate) mod error;
    pub(crate) mod gres;
    pub(crate) mod inventory;
    pub(crate) mod sinfo;
}

mod metrics {
    pub(crate) mod collector;
    pub(crate) mod snapshot;
}

mod api {
    pub(crate) mod server;

    pub(crate) mod action {
        pub(crate) mod healthz;
        pub(crate) mod metrics;
    }
}


#[tokio::main]
async fn main() {
    env_logger::init();

    let app = Command::new("slurm-exporter")
        .version("0.1.0")
        .author("Mlanawo Mbechezi <mlanawo.mbechezi@kemeter.io>")
        .about("Expose Slurm GPU allocation as Prometheus gauges")
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .required(false)
                .help("Path to the configuration file")
                .long("config")
                .short('c')
                .global(true)
        )
        .arg(
            Arg::new("sinfo")
                .required(false)
                .help("sinfo binary used to query the node inventory")
                .long("sinfo")
                .global(true)
        )
        .subcommand(
            commands::server::command_config(),
        )
        .subcommand(
            commands::collect::command_config(),
        )
        .subcommand(
            commands::describe::command_config(),
        );

    let matches = app.get_matches();
    let config_file = matches.get_one::<String>("config")
        .map(|s| s.as_str());

    let mut config = config::config::load_config(config_file);

    if let Some((_, sub_matches)) = matches.subcommand() {
        config.merge_args(sub_matches);
    }

    match matches.subcommand() {
        Some(("server", sub_matches)) => {
            commands::server::execute(
                sub_matches,
                config,
            ).await
        }
        Some(("collect", sub_matches)) => {
            commands::collect::execute(
                sub_matches,
                config,
            );
        }
        Some(("describe", sub_matches)) => {
            commands::describe::execute(
                sub_matches,
                config,
            );
        }
        _ => {}
    }
}
