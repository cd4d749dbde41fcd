use crate::error::{DashboardError, Result};
use crate::models::{DateRange, WeatherDataset};
use crate::processors::filter_by_date_range;
use crate::utils::constants::HISTOGRAM_BINS;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, info};

#[derive(Debug, Clone, Serialize)]
pub struct ProfileReport {
    pub total_rows: usize,
    pub date_span: DateRange,
    /// Set when the report covers a subset of the table
    pub filter: Option<DateRange>,
    pub duplicate_dates: usize,
    pub missing_days: i64,
    pub columns: Vec<ColumnProfile>,
    pub correlations: CorrelationMatrix,
}

#[derive(Debug, Clone, Serialize)]
pub struct ColumnProfile {
    pub name: String,
    pub count: usize,
    pub missing: usize,
    pub distinct: usize,
    pub zeros: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub std_dev: Option<f64>,
    pub percentiles: Option<Percentiles>,
    pub histogram: Vec<HistogramBin>,
}

impl ColumnProfile {
    pub fn missing_percentage(&self) -> f64 {
        let total = self.count + self.missing;
        if total == 0 {
            0.0
        } else {
            (self.missing as f64 / total as f64) * 100.0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Percentiles {
    pub p05: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p95: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Pearson coefficients over pairwise-complete observations
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        self.values[i][j]
    }
}

/// Descriptive statistics over a weather table
pub struct DataProfiler {
    histogram_bins: usize,
}

impl DataProfiler {
    pub fn new() -> Self {
        Self {
            histogram_bins: HISTOGRAM_BINS,
        }
    }

    pub fn with_histogram_bins(mut self, bins: usize) -> Self {
        self.histogram_bins = bins.max(1);
        self
    }

    /// Profile the whole table, independent of any chart date range
    pub fn profile(&self, dataset: &WeatherDataset) -> Result<ProfileReport> {
        if dataset.is_empty() {
            return Err(DashboardError::InvalidFormat(
                "No readings to profile".to_string(),
            ));
        }
        info!("Profiling {} readings", dataset.len());
        self.build_report(dataset, None)
    }

    /// Profile only the readings inside `range`
    pub fn profile_range(&self, dataset: &WeatherDataset, range: DateRange) -> Result<ProfileReport> {
        let subset = WeatherDataset::new(filter_by_date_range(&dataset.readings, range))
            .with_auxiliary_columns(dataset.auxiliary_columns.clone());

        if subset.is_empty() {
            return Err(DashboardError::EmptyRange {
                start: range.start,
                end: range.end,
            });
        }
        info!("Profiling {} readings in {}", subset.len(), range);
        self.build_report(&subset, Some(range))
    }

    fn build_report(&self, dataset: &WeatherDataset, filter: Option<DateRange>) -> Result<ProfileReport> {
        let date_span: DateRange = dataset.require_date_bounds()?.into();

        let distinct_dates: BTreeSet<NaiveDate> = dataset.readings.iter().map(|r| r.date).collect();
        let duplicate_dates = dataset.len() - distinct_dates.len();
        let missing_days = date_span.num_days() - distinct_dates.len() as i64;

        let numeric = dataset.numeric_columns();
        let columns: Vec<ColumnProfile> = numeric
            .iter()
            .map(|(name, values)| self.profile_column(name, values))
            .collect();

        let correlations = correlation_matrix(&numeric);

        debug!(
            "Profiled {} columns, {} duplicate dates, {} missing days",
            columns.len(),
            duplicate_dates,
            missing_days
        );

        Ok(ProfileReport {
            total_rows: dataset.len(),
            date_span,
            filter,
            duplicate_dates,
            missing_days,
            columns,
            correlations,
        })
    }

    fn profile_column(&self, name: &str, values: &[Option<f64>]) -> ColumnProfile {
        let mut present: Vec<f64> = values.iter().flatten().copied().filter(|v| v.is_finite()).collect();
        present.sort_by(|a, b| a.total_cmp(b));

        let count = present.len();
        let missing = values.len() - count;
        let zeros = present.iter().filter(|v| **v == 0.0).count();

        let mut distinct_values = present.clone();
        distinct_values.dedup();

        let mean = arithmetic_mean(&present);
        let std_dev = mean.and_then(|m| sample_std_dev(&present, m));

        let percentiles = if present.is_empty() {
            None
        } else {
            Some(Percentiles {
                p05: percentile(&present, 5.0),
                p25: percentile(&present, 25.0),
                p50: percentile(&present, 50.0),
                p75: percentile(&present, 75.0),
                p95: percentile(&present, 95.0),
            })
        };

        ColumnProfile {
            name: name.to_string(),
            count,
            missing,
            distinct: distinct_values.len(),
            zeros,
            min: present.first().copied(),
            max: present.last().copied(),
            mean,
            std_dev,
            percentiles,
            histogram: histogram(&present, self.histogram_bins),
        }
    }
}

impl Default for DataProfiler {
    fn default() -> Self {
        Self::new()
    }
}

fn arithmetic_mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

fn sample_std_dev(values: &[f64], mean: f64) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

/// Percentile of sorted values using linear interpolation between ranks
fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.len() == 1 {
        return sorted[0];
    }
    let rank = (p / 100.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let weight = rank - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}

fn histogram(sorted: &[f64], bins: usize) -> Vec<HistogramBin> {
    let (min, max) = match (sorted.first(), sorted.last()) {
        (Some(min), Some(max)) => (*min, *max),
        _ => return Vec::new(),
    };

    if min == max {
        return vec![HistogramBin {
            lower: min,
            upper: max,
            count: sorted.len(),
        }];
    }

    let width = (max - min) / bins as f64;
    let mut result: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lower: min + width * i as f64,
            upper: if i + 1 == bins { max } else { min + width * (i + 1) as f64 },
            count: 0,
        })
        .collect();

    for value in sorted {
        let idx = (((value - min) / width) as usize).min(bins - 1);
        result[idx].count += 1;
    }

    result
}

fn pearson(a: &[Option<f64>], b: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = a
        .iter()
        .zip(b)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .collect();

    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in &pairs {
        cov += (x - mean_x) * (y - mean_y);
        var_x += (x - mean_x).powi(2);
        var_y += (y - mean_y).powi(2);
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }

    Some(cov / (var_x.sqrt() * var_y.sqrt()))
}

fn correlation_matrix(columns: &[(String, Vec<Option<f64>>)]) -> CorrelationMatrix {
    let values = columns
        .iter()
        .map(|(_, a)| columns.iter().map(|(_, b)| pearson(a, b)).collect())
        .collect();

    CorrelationMatrix {
        columns: columns.iter().map(|(name, _)| name.clone()).collect(),
        values,
    }
}

impl ProfileReport {
    pub fn column(&self, name: &str) -> Option<&ColumnProfile> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn summary(&self) -> String {
        let scope = match self.filter {
            Some(range) => format!("Readings from {}", range),
            None => "Full table".to_string(),
        };

        format!(
            "Scope: {}\n\
            Rows: {}\n\
            Date Range: {} ({} years)\n\
            Duplicate Dates: {}\n\
            Missing Days: {}\n\
            Numeric Columns: {}",
            scope,
            self.total_rows,
            self.date_span,
            self.date_span.num_days() / 365,
            self.duplicate_dates,
            self.missing_days,
            self.columns.len()
        )
    }

    pub fn detailed_summary(&self) -> String {
        let mut text = self.summary();
        text.push_str("\n\nColumns:\n");

        for column in &self.columns {
            let range = match (column.min, column.max, column.mean) {
                (Some(min), Some(max), Some(mean)) => {
                    format!("min={:.2}, mean={:.2}, max={:.2}", min, mean, max)
                }
                _ => "No values".to_string(),
            };
            text.push_str(&format!(
                "  - {}: {} values, {:.1}% missing, {}\n",
                column.name,
                column.count,
                column.missing_percentage(),
                range
            ));
        }

        let names = &self.correlations.columns;
        if names.len() >= 2 {
            if let Some(r) = self.correlations.get(&names[0], &names[1]) {
                text.push_str(&format!("\nCorrelation {} / {}: {:.3}\n", names[0], names[1], r));
            }
        }

        text
    }
}
