use clap::Parser;
use london_weather_dashboard::cli::{run, Cli};
use london_weather_dashboard::error::Result;

fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}
