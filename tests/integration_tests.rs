use chrono::NaiveDate;
use clap::Parser;
use london_weather_dashboard::analyzers::DataProfiler;
use london_weather_dashboard::cli::{run, Cli};
use london_weather_dashboard::models::{DateRange, Variable};
use london_weather_dashboard::processors::{filter_by_date_range, min_max_normalize};
use london_weather_dashboard::readers::WeatherReader;
use london_weather_dashboard::settings::DashboardConfig;
use london_weather_dashboard::writers::{CsvWriter, ParquetWriter, ReportWriter};
use london_weather_dashboard::{Dashboard, DashboardError};
use pretty_assertions::assert_eq;
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

const SCENARIO_CSV: &str = "Unnamed: 0,date,cloud_cover,sunshine,global_radiation,max_temp,mean_temp,min_temp\n\
0,2020-01-01,2.0,7.0,0.0,2.3,0.0,-7.5\n\
1,2020-01-15,6.0,1.7,50.0,6.1,5.0,1.2\n\
2,2020-02-01,5.0,0.0,100.0,12.0,10.0,8.3\n";

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn write_input(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("weather_cleaned.csv");
    fs::write(&path, contents).expect("Failed to write input file");
    path
}

/// A few years of synthetic daily readings with a seasonal cycle
fn synthetic_csv() -> String {
    let mut csv = String::from("Unnamed: 0,date,mean_temp,global_radiation\n");
    let mut day = date(1979, 1, 1);
    let mut idx = 0;
    while day <= date(1981, 12, 31) {
        let phase = (idx as f64 / 365.25) * std::f64::consts::TAU;
        let temp = 11.0 - 7.0 * phase.cos();
        let radiation = 120.0 - 100.0 * phase.cos();
        if idx % 17 == 0 {
            csv.push_str(&format!("{},{},,{:.1}\n", idx, day, radiation));
        } else {
            csv.push_str(&format!("{},{},{:.1},{:.1}\n", idx, day, temp, radiation));
        }
        day = day.succ_opt().unwrap();
        idx += 1;
    }
    csv
}

#[test]
fn test_end_to_end_scenario() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let input = write_input(&dir, SCENARIO_CSV);

    let config = DashboardConfig {
        input_path: input,
        ..DashboardConfig::default()
    };
    let mut dashboard = Dashboard::from_config(&config).unwrap();

    assert_eq!(
        dashboard.date_bounds(),
        DateRange::new(date(2020, 1, 1), date(2020, 2, 1))
    );

    let range = dashboard.select_range(None, None);
    let data = dashboard.chart(range).unwrap();

    assert_eq!(data.monthly.len(), 2);
    assert_eq!(data.monthly[0].date, date(2020, 1, 1));
    assert_eq!(data.monthly[0].mean(Variable::MeanTemp), Some(0.25));
    assert_eq!(data.monthly[1].mean(Variable::MeanTemp), Some(1.0));
    assert_eq!(data.monthly[0].mean(Variable::GlobalRadiation), Some(0.25));
    assert_eq!(data.monthly[1].mean(Variable::GlobalRadiation), Some(1.0));
    assert_eq!(data.rows.len(), 4);
}

#[test]
fn test_long_form_rows_unique_per_month_and_variable() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, &synthetic_csv());
    let dataset = WeatherReader::new().read_dataset(&input).unwrap();
    let mut dashboard = Dashboard::new(Arc::new(dataset)).unwrap();

    let data = dashboard
        .chart(DateRange::new(date(1980, 3, 10), date(1981, 2, 5)))
        .unwrap();

    // March 1980 .. February 1981 inclusive
    assert_eq!(data.monthly.len(), 12);
    assert_eq!(data.rows.len(), 12 * 2);
    let keys: HashSet<_> = data.rows.iter().map(|r| (r.date, r.variable)).collect();
    assert_eq!(keys.len(), data.rows.len());
    assert!(data
        .rows
        .iter()
        .filter_map(|r| r.value)
        .all(|v| (0.0..=1.0).contains(&v)));
}

#[test]
fn test_full_span_filter_returns_all_readings() {
    let dataset = WeatherReader::new()
        .read_from(synthetic_csv().as_bytes())
        .unwrap();
    let (start, end) = dataset.date_bounds().unwrap();

    let filtered = filter_by_date_range(&dataset.readings, DateRange::new(start, end));
    assert_eq!(filtered.len(), dataset.len());

    let inner = DateRange::new(date(1980, 6, 1), date(1980, 6, 30));
    let june = filter_by_date_range(&dataset.readings, inner);
    assert_eq!(june.len(), 30);
    assert!(june.iter().all(|r| inner.contains(r.date)));
}

#[test]
fn test_normalized_extremes() {
    let dataset = WeatherReader::new()
        .read_from(synthetic_csv().as_bytes())
        .unwrap();
    let normalized = min_max_normalize("mean_temp", &dataset.column(Variable::MeanTemp)).unwrap();

    let present: Vec<f64> = normalized.iter().flatten().copied().collect();
    assert!(present.iter().all(|v| (0.0..=1.0).contains(v)));
    assert!(present.iter().any(|v| *v == 0.0));
    assert!(present.iter().any(|v| *v == 1.0));
    assert_eq!(normalized.len(), dataset.len());
}

#[test]
fn test_cached_chart_matches_recompute() {
    let dataset = Arc::new(
        WeatherReader::new()
            .read_from(synthetic_csv().as_bytes())
            .unwrap(),
    );
    let mut cached = Dashboard::new(Arc::clone(&dataset)).unwrap();
    let mut uncached = Dashboard::new(dataset).unwrap().with_cache_capacity(0);
    let range = DateRange::new(date(1979, 5, 1), date(1980, 4, 30));

    cached.chart(range).unwrap();
    let from_cache = cached.chart(range).unwrap();
    let recomputed = uncached.chart(range).unwrap();

    assert_eq!(*from_cache, *recomputed);
    assert_eq!(cached.cache_stats().hits, 1);
    assert_eq!(uncached.cache_stats().hits, 0);
}

#[test]
fn test_exports() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, SCENARIO_CSV);
    let dataset = WeatherReader::new().read_dataset(&input).unwrap();
    let mut dashboard = Dashboard::new(Arc::new(dataset)).unwrap();
    let data = dashboard.chart(dashboard.date_bounds()).unwrap();

    let csv_path = dir.path().join("chart.csv");
    CsvWriter::new().write_long_form(&data.rows, &csv_path).unwrap();
    assert_eq!(
        fs::read_to_string(&csv_path).unwrap(),
        "date,variable,value\n\
         2020-01-01,mean_temp_normalized,0.25\n\
         2020-01-01,global_radiation_normalized,0.25\n\
         2020-02-01,mean_temp_normalized,1.0\n\
         2020-02-01,global_radiation_normalized,1.0\n"
    );

    let parquet_path = dir.path().join("chart.parquet");
    let writer = ParquetWriter::new().with_compression("gzip").unwrap();
    writer.write_long_form(&data.rows, &parquet_path).unwrap();
    assert_eq!(writer.get_file_info(&parquet_path).unwrap().total_rows, 4);
    assert_eq!(writer.read_long_form(&parquet_path).unwrap(), data.rows);
}

#[test]
fn test_profile_report_covers_all_numeric_columns() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, SCENARIO_CSV);
    let dataset = WeatherReader::new().read_dataset(&input).unwrap();
    let dashboard = Dashboard::new(Arc::new(dataset)).unwrap();

    let report = dashboard.profile(&DataProfiler::new()).unwrap();
    let names: Vec<&str> = report.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["mean_temp", "global_radiation", "cloud_cover", "sunshine", "max_temp", "min_temp"]
    );
    assert_eq!(report.total_rows, 3);
    assert_eq!(report.missing_days, 32 - 3);

    let html_path = dir.path().join("profile.html");
    ReportWriter::new().write_html(&report, &html_path).unwrap();
    let html = fs::read_to_string(&html_path).unwrap();
    assert!(html.contains("<td>sunshine</td>"));
    assert!(!html.contains("Unnamed"));
}

#[test]
fn test_missing_column_is_fatal() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "date,mean_temp\n2020-01-01,1.0\n");
    let config = DashboardConfig {
        input_path: input,
        ..DashboardConfig::default()
    };

    assert!(Dashboard::from_config(&config).is_err());
}

#[test]
fn test_missing_input_file_is_fatal() {
    let config = DashboardConfig {
        input_path: PathBuf::from("/nonexistent/weather_cleaned.csv"),
        ..DashboardConfig::default()
    };

    assert!(Dashboard::from_config(&config).is_err());
}

const CONSTANT_RADIATION_CSV: &str = "Unnamed: 0,date,mean_temp,global_radiation\n\
0,2020-01-01,1.0,5.0\n\
1,2020-01-02,2.0,5.0\n\
2,2020-01-03,4.0,5.0\n";

fn run_cli(args: &[&str]) -> london_weather_dashboard::Result<()> {
    let mut argv = vec!["london-weather-dashboard", "--quiet"];
    argv.extend_from_slice(args);
    run(Cli::try_parse_from(argv).expect("Arguments should parse"))
}

fn path_arg(path: &std::path::Path) -> String {
    path.to_string_lossy().into_owned()
}

#[test]
fn test_cli_profile_constant_column() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, CONSTANT_RADIATION_CSV);
    let html = dir.path().join("profile.html");
    let json = dir.path().join("profile.json");

    run_cli(&[
        "profile",
        "--input",
        &path_arg(&input),
        "--output",
        &path_arg(&html),
        "--json",
        &path_arg(&json),
    ])
    .unwrap();

    assert!(fs::read_to_string(&html).unwrap().contains("<td>global_radiation</td>"));
    let report: serde_json::Value = serde_json::from_str(&fs::read_to_string(&json).unwrap()).unwrap();
    assert_eq!(report["total_rows"], 3);
    assert_eq!(report["columns"][1]["distinct"], 1);
}

#[test]
fn test_cli_info_constant_column() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, CONSTANT_RADIATION_CSV);

    assert!(run_cli(&["info", "--input", &path_arg(&input)]).is_ok());
}

#[test]
fn test_cli_chart_constant_column_fails() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, CONSTANT_RADIATION_CSV);

    let err = run_cli(&["chart", "--input", &path_arg(&input), "--table-only"]).unwrap_err();
    assert!(matches!(err, DashboardError::Normalization { .. }));
}

#[test]
fn test_cli_profile_subset() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, SCENARIO_CSV);
    let html = dir.path().join("profile.html");
    let json = dir.path().join("profile.json");

    run_cli(&[
        "profile",
        "--input",
        &path_arg(&input),
        "--output",
        &path_arg(&html),
        "--json",
        &path_arg(&json),
        "--start",
        "2020-01-01",
        "--end",
        "2020-01-15",
    ])
    .unwrap();

    let report: serde_json::Value = serde_json::from_str(&fs::read_to_string(&json).unwrap()).unwrap();
    assert_eq!(report["total_rows"], 2);
    assert_eq!(report["filter"]["start"], "2020-01-01");
    assert_eq!(report["filter"]["end"], "2020-01-15");
}

#[test]
fn test_cli_profile_empty_subset_fails() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, SCENARIO_CSV);
    let html = dir.path().join("profile.html");

    let err = run_cli(&[
        "profile",
        "--input",
        &path_arg(&input),
        "--output",
        &path_arg(&html),
        "--start",
        "2020-01-02",
        "--end",
        "2020-01-14",
    ])
    .unwrap_err();

    assert!(matches!(err, DashboardError::EmptyRange { .. }));
    assert!(!html.exists());
}

#[test]
fn test_cli_profile_start_requires_end() {
    let result = Cli::try_parse_from(["london-weather-dashboard", "profile", "--start", "2020-01-01"]);
    assert!(result.is_err());
}

#[test]
fn test_cli_chart_inverted_range_fails_on_svg() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, SCENARIO_CSV);
    let svg = dir.path().join("charts").join("chart.svg");

    let err = run_cli(&[
        "chart",
        "--input",
        &path_arg(&input),
        "--start",
        "2020-02-01",
        "--end",
        "2020-01-01",
        "--output",
        &path_arg(&svg),
    ])
    .unwrap_err();

    assert!(matches!(err, DashboardError::EmptyRange { .. }));
    assert!(!svg.exists());
}

#[test]
fn test_cli_chart_table_only_with_exports() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, SCENARIO_CSV);
    let svg = dir.path().join("chart.svg");
    let csv = dir.path().join("out").join("chart.csv");
    let parquet = dir.path().join("out").join("chart.parquet");

    run_cli(&[
        "chart",
        "--input",
        &path_arg(&input),
        "--table-only",
        "--output",
        &path_arg(&svg),
        "--csv",
        &path_arg(&csv),
        "--parquet",
        &path_arg(&parquet),
        "--compression",
        "zstd",
    ])
    .unwrap();

    assert!(!svg.exists());
    assert_eq!(fs::read_to_string(&csv).unwrap().lines().count(), 5);
    assert_eq!(
        ParquetWriter::new().read_long_form(&parquet).unwrap().len(),
        4
    );
}

#[test]
fn test_cli_chart_unknown_compression_fails() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, SCENARIO_CSV);
    let parquet = dir.path().join("chart.parquet");

    let err = run_cli(&[
        "chart",
        "--input",
        &path_arg(&input),
        "--table-only",
        "--parquet",
        &path_arg(&parquet),
        "--compression",
        "rar",
    ])
    .unwrap_err();

    assert!(matches!(err, DashboardError::Config(_)));
}

#[test]
fn test_cli_config_file_layering() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("semicolon.csv");
    fs::write(
        &input,
        "date;mean_temp;global_radiation\n2020-01-01;0.0;0.0\n2020-02-01;10.0;100.0\n",
    )
    .unwrap();
    let config = dir.path().join("dashboard.toml");
    fs::write(
        &config,
        format!(
            "input_path = {:?}\ndelimiter = \";\"\ncache_capacity = 0\n",
            path_arg(&input)
        ),
    )
    .unwrap();
    let csv = dir.path().join("chart.csv");

    run_cli(&[
        "--config",
        &path_arg(&config),
        "chart",
        "--table-only",
        "--csv",
        &path_arg(&csv),
    ])
    .unwrap();

    assert_eq!(
        fs::read_to_string(&csv).unwrap(),
        "date;variable;value\n\
         2020-01-01;mean_temp_normalized;0.0\n\
         2020-01-01;global_radiation_normalized;0.0\n\
         2020-02-01;mean_temp_normalized;1.0\n\
         2020-02-01;global_radiation_normalized;1.0\n"
    );
}
