use anyhow::{Context, Result};
use chrono::Local;
use clap::{crate_version, App, Arg, ArgMatches};
use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::convert::TryFrom;
use std::fs;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use crate::error::AdmissionError;

// Process-wide configuration, set once at startup.
pub static CONFIG: OnceCell<Config> = OnceCell::new();

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub applicants_file: PathBuf,
    pub output_dir: PathBuf, // roster files land here
    pub waves: usize,
    pub capacity: Option<usize>, // None: read from stdin

    pub logging: bool, // write result.csv
    pub log_dir_base: PathBuf,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            applicants_file: PathBuf::from(Config::APPLICANTS_FILE),
            output_dir: PathBuf::from("."),
            waves: Config::WAVES,
            capacity: None,
            logging: false,
            log_dir_base: PathBuf::from("logs"),
            log_level: String::from("info"),
        }
    }
}

impl Config {
    pub const APPLICANTS_FILE: &'static str = "applicants.txt";
    pub const WAVES: usize = 3;

    pub fn app() -> App<'static, 'static> {
        App::new("university admission")
            .version(crate_version!())
            .arg(Arg::with_name("CONFIG_FILE")
                .help("TOML configuration file")
                .index(1)
            )
            .arg(Arg::with_name("capacity")
                .help("seats per department; read from stdin when absent")
                .short("c")
                .long("capacity")
                .takes_value(true)
            )
            .arg(Arg::with_name("input")
                .help("applicant list")
                .short("i")
                .long("input")
                .takes_value(true)
            )
            .arg(Arg::with_name("output")
                .help("directory for the department rosters")
                .short("o")
                .long("output")
                .takes_value(true)
            )
            .arg(Arg::with_name("waves")
                .help("number of admission waves")
                .short("w")
                .long("waves")
                .takes_value(true)
            )
            .arg(Arg::with_name("logging")
                .help("write result csv")
                .short("l")
                .long("log")
            )
    }

    // Builds the global config from the command line. Call once.
    pub fn from_args() -> Result<()> {
        let cfg = Config::from_matches(&Config::app().get_matches())?;
        CONFIG
            .set(cfg)
            .map_err(|_| AdmissionError::Config("configuration already initialised".into()))?;
        Ok(())
    }

    pub fn get() -> Result<&'static Config, AdmissionError> {
        CONFIG
            .get()
            .ok_or_else(|| AdmissionError::Config("configuration not initialised".into()))
    }

    // Command line values override the config file.
    pub fn from_matches(matches: &ArgMatches) -> Result<Config> {
        let mut cfg = match matches.value_of("CONFIG_FILE") {
            Some(filename) => Config::from_file(Path::new(filename))?,
            None => Config::default(),
        };

        if let Some(capacity) = matches.value_of("capacity") {
            cfg.capacity = Some(parse_capacity(capacity)?);
        }
        if let Some(input) = matches.value_of("input") {
            cfg.applicants_file = PathBuf::from(input);
        }
        if let Some(output) = matches.value_of("output") {
            cfg.output_dir = PathBuf::from(output);
        }
        if let Some(waves) = matches.value_of("waves") {
            cfg.waves = waves
                .parse()
                .map_err(|_| AdmissionError::Config(format!("waves must be a positive integer, got {:?}", waves)))?;
        }
        if matches.is_present("logging") {
            cfg.logging = true;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> Result<Config> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("config file {} cannot be read", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("config file {} is not valid", path.display()))
    }

    pub fn validate(&self) -> Result<(), AdmissionError> {
        if self.waves == 0 {
            return Err(AdmissionError::Config("waves must be at least 1".into()));
        }
        Ok(())
    }

    // Creates <log_dir_base>/c<capacity>w<waves>_<timestamp>/ and returns it.
    pub fn log_dir(&self, capacity: usize) -> Result<PathBuf> {
        let name = format!(
            "c{}w{}_{}",
            capacity,
            self.waves,
            Local::now().format("%Y_%m%d_%H%M%S")
        );
        let dir = self.log_dir_base.join(name);
        fs::create_dir_all(&dir).with_context(|| format!("dir {} cannot be created", dir.display()))?;
        Ok(dir)
    }
}

/// Reads the department capacity: the first whitespace-separated token of the input.
///
/// Any integer is accepted; a negative one means no seats at all.
pub fn read_capacity<R: BufRead>(mut reader: R) -> Result<usize, AdmissionError> {
    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Err(AdmissionError::Capacity(String::new()));
        }
        if let Some(token) = line.split_whitespace().next() {
            return parse_capacity(token);
        }
    }
}

fn parse_capacity(token: &str) -> Result<usize, AdmissionError> {
    let capacity = token
        .parse::<i64>()
        .map_err(|_| AdmissionError::Capacity(token.to_owned()))?;
    usize::try_from(capacity.max(0)).map_err(|_| AdmissionError::Capacity(token.to_owned()))
}
