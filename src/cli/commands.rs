use crate::analyzers::DataProfiler;
use crate::cli::args::{Cli, Commands};
use crate::dashboard::Dashboard;
use crate::error::Result;
use crate::models::{DateRange, Variable};
use crate::settings::DashboardConfig;
use crate::utils::filename::{generate_default_chart_filename, generate_default_profile_filename};
use crate::utils::logging::init_logging;
use crate::utils::progress::ProgressReporter;
use crate::writers::{ChartWriter, CsvWriter, ParquetWriter, ReportWriter};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose, cli.log_file.as_deref())?;

    let mut config = DashboardConfig::load(cli.config.as_deref())?;
    debug!("Configuration: {:?}", config);

    match cli.command {
        Commands::Info { input } => {
            apply_input(&mut config, input);
            let dashboard = open_dashboard(&config, cli.quiet)?;
            println!("{}", describe(&dashboard));
        }

        Commands::Chart {
            input,
            start,
            end,
            output,
            csv,
            parquet,
            compression,
            table_only,
        } => {
            apply_input(&mut config, input);
            if let Some(compression) = compression {
                config.compression = compression;
            }

            let mut dashboard = open_dashboard(&config, cli.quiet)?;
            let range = dashboard.select_range(start, end);
            if range.is_empty() {
                warn!("Start date {} is after end date {}", range.start, range.end);
            }

            let data = dashboard.chart(range)?;
            println!(
                "Date range: {} ({} readings, {} months)",
                range,
                data.matched_readings,
                data.monthly.len()
            );

            let csv_writer = CsvWriter::new().with_delimiter(config.delimiter_byte()?);
            if table_only {
                csv_writer.write_monthly_to(&data.monthly, std::io::stdout().lock())?;
            } else {
                let output = output.unwrap_or_else(|| generate_default_chart_filename(&range));
                ensure_parent(&output)?;
                ChartWriter::new()
                    .with_size(config.chart_width, config.chart_height)
                    .with_title(&config.chart_title)
                    .write_svg(&data, &output)?;
                println!("Chart written to {}", output.display());
            }

            if let Some(path) = csv {
                ensure_parent(&path)?;
                csv_writer.write_long_form(&data.rows, &path)?;
                println!("Chart data written to {}", path.display());
            }

            if let Some(path) = parquet {
                ensure_parent(&path)?;
                let writer = ParquetWriter::new().with_compression(&config.compression)?;
                writer.write_long_form(&data.rows, &path)?;
                println!("\n{}", writer.get_file_info(&path)?.summary());
            }
        }

        Commands::Profile {
            input,
            output,
            json,
            start,
            end,
        } => {
            apply_input(&mut config, input);
            let dashboard = open_dashboard(&config, cli.quiet)?;

            let progress = ProgressReporter::new_spinner("Profiling London weather data...", cli.quiet);
            let profiler = DataProfiler::new().with_histogram_bins(config.histogram_bins);
            let report = match (start, end) {
                (Some(start), Some(end)) => {
                    dashboard.profile_range(&profiler, DateRange::new(start, end))?
                }
                _ => dashboard.profile(&profiler)?,
            };
            progress.finish_with_message("Profiling complete");

            println!("\n{}", report.detailed_summary());

            let output = output.unwrap_or_else(generate_default_profile_filename);
            ensure_parent(&output)?;
            let writer = ReportWriter::new().with_container_height(config.report_height);
            writer.write_html(&report, &output)?;
            println!("\nReport written to {}", output.display());

            if let Some(path) = json {
                ensure_parent(&path)?;
                writer.write_json(&report, &path)?;
                println!("Report data written to {}", path.display());
            }
        }
    }

    Ok(())
}

fn apply_input(config: &mut DashboardConfig, input: Option<PathBuf>) {
    if let Some(input) = input {
        config.input_path = input;
    }
}

fn open_dashboard(config: &DashboardConfig, quiet: bool) -> Result<Dashboard> {
    let progress = ProgressReporter::new_spinner(
        &format!("Loading {}...", config.input_path.display()),
        quiet,
    );
    let dashboard = Dashboard::from_config(config)?;
    progress.finish_with_message(&format!("Loaded {} readings", dashboard.dataset().len()));
    Ok(dashboard)
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

fn describe(dashboard: &Dashboard) -> String {
    let dataset = dashboard.dataset();
    let mut text = format!(
        "Readings: {}\nDate range: {}",
        dataset.len(),
        dashboard.date_bounds()
    );

    for variable in Variable::ALL {
        let range = match dataset.value_range(variable) {
            Some((min, max)) => format!("{:.1} to {:.1}", min, max),
            None => "No values".to_string(),
        };
        let missing = dataset
            .readings
            .iter()
            .filter(|r| r.value(variable).is_none())
            .count();
        text.push_str(&format!(
            "\n{}: {} ({} missing)",
            variable.column(),
            range,
            missing
        ));
    }

    if !dataset.auxiliary_columns.is_empty() {
        text.push_str(&format!(
            "\nOther columns: {}",
            dataset.auxiliary_columns.join(", ")
        ));
    }

    text
}
