use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "london-weather-dashboard")]
#[command(about = "Normalized monthly temperature and global radiation for London weather data")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Suppress progress spinners")]
    pub quiet: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        help = "Configuration file [default: dashboard.toml if present]"
    )]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show row count, date bounds and value ranges of the input file
    Info {
        #[arg(short, long, help = "Input CSV file [default: weather_cleaned.csv]")]
        input: Option<PathBuf>,
    },

    /// Build the monthly normalized series for a date range and chart it
    Chart {
        #[arg(short, long, help = "Input CSV file [default: weather_cleaned.csv]")]
        input: Option<PathBuf>,

        #[arg(short, long, help = "First date (YYYY-MM-DD) [default: earliest date]")]
        start: Option<NaiveDate>,

        #[arg(short, long, help = "Last date (YYYY-MM-DD) [default: latest date]")]
        end: Option<NaiveDate>,

        #[arg(
            short,
            long,
            help = "SVG chart path [default: output/weather-chart-{start}-{end}.svg]"
        )]
        output: Option<PathBuf>,

        #[arg(long, help = "Also write the long-form chart rows as CSV")]
        csv: Option<PathBuf>,

        #[arg(long, help = "Also write the long-form chart rows as Parquet")]
        parquet: Option<PathBuf>,

        #[arg(short, long, help = "Parquet compression [default: from config]")]
        compression: Option<String>,

        #[arg(long, default_value = "false", help = "Print the monthly means as CSV instead of drawing")]
        table_only: bool,
    },

    /// Generate a data-profiling report of the input file
    Profile {
        #[arg(short, long, help = "Input CSV file [default: weather_cleaned.csv]")]
        input: Option<PathBuf>,

        #[arg(
            short,
            long,
            help = "HTML report path [default: output/weather-profile-{YYMMDD}.html]"
        )]
        output: Option<PathBuf>,

        #[arg(long, help = "Also write the report as JSON")]
        json: Option<PathBuf>,

        #[arg(short, long, requires = "end", help = "Profile only from this date")]
        start: Option<NaiveDate>,

        #[arg(short, long, requires = "start", help = "Profile only up to this date")]
        end: Option<NaiveDate>,
    },
}
