use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

pub mod commands;

use commands::{check, export, lookup, serve};

use crate::config::Settings;

#[derive(Parser)]
#[command(name = "meteocast")]
#[command(about = "Palembang climate forecast dashboard with CLI tools and web server")]
#[command(version)]
pub struct Cli {
    /// Directory holding the six input CSV files
    ///
    /// Overrides `data_dir` from the settings file and `METEOCAST__DATA_DIR`.
    #[arg(short, long, global = true, env = "DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    Serve {
        /// Bind address for the web server
        ///
        /// Format: IP:PORT (e.g., 0.0.0.0:3000, 127.0.0.1:8080)
        #[arg(short, long, env = "BIND_ADDRESS")]
        bind_address: Option<String>,
    },
    /// Load all input files and print a summary of the dataset
    Check,
    /// Print the forecast of a variable for the month containing a date
    ///
    /// Examples:
    ///   meteocast lookup --variable RR --date 2025-12-01
    ///   meteocast lookup --variable TX --date 2044-12-31
    Lookup {
        /// Variable code (TN, TX, RH_AVG, RR, SS, FF_X, FF_AVG, DDD_X_sin)
        #[arg(short, long)]
        variable: String,

        /// Any day of the month to look up (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
    },
    /// Write the forecast rows of a variable as CSV
    Export {
        /// Variable code (TN, TX, RH_AVG, RR, SS, FF_X, FF_AVG, DDD_X_sin)
        #[arg(short, long)]
        variable: String,

        /// Output file; defaults to forecast_{code}.csv in the current directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Serve { bind_address } => {
                let settings = Settings::load()?.with_overrides(self.data_dir, bind_address);
                serve(settings).await?;
            }
            Commands::Check => {
                let settings = Settings::load()?.with_overrides(self.data_dir, None);
                check(&settings)?;
            }
            Commands::Lookup { variable, date } => {
                let settings = Settings::load()?.with_overrides(self.data_dir, None);
                lookup(&settings, &variable, date)?;
            }
            Commands::Export { variable, output } => {
                let settings = Settings::load()?.with_overrides(self.data_dir, None);
                export(&settings, &variable, output)?;
            }
        }
        Ok(())
    }
}
