use crate::models::DateRange;
use chrono::{Datelike, Local};
use std::path::PathBuf;

/// Default chart path: output/weather-chart-{YYYYMMDD}-{YYYYMMDD}.svg
pub fn generate_default_chart_filename(range: &DateRange) -> PathBuf {
    let filename = format!(
        "weather-chart-{}-{}.svg",
        range.start.format("%Y%m%d"),
        range.end.format("%Y%m%d")
    );
    PathBuf::from("output").join(filename)
}

/// Default profile path: output/weather-profile-{YYMMDD}.html
pub fn generate_default_profile_filename() -> PathBuf {
    let now = Local::now();
    let year = now.year() % 100; // Get last 2 digits of year

    let filename = format!(
        "weather-profile-{:02}{:02}{:02}.html",
        year,
        now.month(),
        now.day()
    );
    PathBuf::from("output").join(filename)
}
