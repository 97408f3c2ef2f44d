use std::env;
use std::fs;
use serde::Deserialize;
use clap::ArgMatches;
use crate::config;
use toml::de::Error as TomlError;

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub(crate) struct Config {
    pub(crate) listen_address: String,
    pub(crate) metrics_path: String,
    pub(crate) scrape_timeout: u64,
    pub(crate) sinfo: config::sinfo::Sinfo,
    pub(crate) gpus: config::gpus::Gpus,
}

impl Config {
    /// Command line flags win over the file.
    pub(crate) fn merge_args(&mut self, args: &ArgMatches) {
        if let Ok(Some(command)) = args.try_get_one::<String>("sinfo") {
            self.sinfo.command = command.clone();
        }

        if let Ok(Some(address)) = args.try_get_one::<String>("listen-address") {
            self.listen_address = address.clone();
        }

        if let Ok(Some(path)) = args.try_get_one::<String>("metrics-path") {
            self.metrics_path = path.clone();
        }

        if let Ok(Some(&true)) = args.try_get_one::<bool>("no-gpus") {
            self.gpus.enabled = false;
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            listen_address: "0.0.0.0:8080".to_string(),
            metrics_path: "/metrics".to_string(),
            scrape_timeout: 30,
            sinfo: config::sinfo::Sinfo::default(),
            gpus: config::gpus::Gpus::default(),
        }
    }
}

pub(crate) fn get_config_dir() -> String {
    return match env::var_os("SLURM_EXPORTER_CONFIG_DIR") {
        Some(variable) => variable.to_string_lossy().into_owned(),
        None => format!("{}/.config/slurm-exporter", env::var("HOME").unwrap_or_else(|_| ".".to_string()))
    };
}

pub(crate) fn load_config(config_file: Option<&str>) -> Config {
    let file = match config_file {
        Some(file) => file.to_string(),
        None => format!("{}/config.toml", get_config_dir()),
    };

    debug!("load config file {}", file);

    if fs::metadata(&file).is_ok() {
        let contents = match fs::read_to_string(&file) {
            Ok(contents) => contents,
            Err(err) => {
                error!("Unable to read {} : {}", file, err);
                return Config::default();
            }
        };

        let config: Result<Config, TomlError> = toml::from_str(&contents);

        match config {
            Ok(mut config) => {
                if config.scrape_timeout == 0 {
                    warn!("scrape_timeout must be at least one second, using {}", Config::default().scrape_timeout);
                    config.scrape_timeout = Config::default().scrape_timeout;
                }

                return config
            }
            Err(err) => {
                error!("Error while deserializing the TOML file : {}", err);
            }
        }
    }

    debug!("Switch to default configuration");

    return Config::default();
}
