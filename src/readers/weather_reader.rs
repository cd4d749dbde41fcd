use crate::error::{DashboardError, Result};
use crate::models::{WeatherDataset, WeatherReading};
use crate::utils::constants::{
    COL_DATE, COL_GLOBAL_RADIATION, COL_MEAN_TEMP, DATETIME_FORMATS, DATE_FORMATS,
    DEFAULT_INDEX_COLUMN, MISSING_MARKERS,
};
use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord};
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

/// Column positions resolved from the header row
#[derive(Debug)]
struct ColumnLayout {
    date: usize,
    mean_temp: usize,
    global_radiation: usize,
    index: Option<usize>,
    auxiliary: Vec<(usize, String)>,
}

pub struct WeatherReader {
    index_column: String,
    delimiter: u8,
}

impl WeatherReader {
    pub fn new() -> Self {
        Self {
            index_column: DEFAULT_INDEX_COLUMN.to_string(),
            delimiter: b',',
        }
    }

    pub fn with_index_column(mut self, index_column: &str) -> Self {
        self.index_column = index_column.to_string();
        self
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Load the whole file into memory
    pub fn read_dataset(&self, path: &Path) -> Result<WeatherDataset> {
        info!("Loading weather data from {}", path.display());
        let file = File::open(path)?;
        let dataset = self.read_from(file)?;
        info!(
            "Loaded {} readings with {} auxiliary columns",
            dataset.len(),
            dataset.auxiliary_columns.len()
        );
        Ok(dataset)
    }

    /// Parse readings from any byte source carrying a header row
    pub fn read_from<R: Read>(&self, source: R) -> Result<WeatherDataset> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(source);

        let headers = reader.headers()?.clone();
        let layout = self.resolve_layout(&headers)?;

        if let Some(idx) = layout.index {
            debug!("Dropping index column '{}' at position {}", &headers[idx], idx);
        }

        let mut readings = Vec::new();
        let mut seen_dates = HashSet::new();
        let mut duplicate_dates = 0usize;
        // Auxiliary columns that turned out not to be numeric
        let mut non_numeric = vec![false; layout.auxiliary.len()];

        for record_result in reader.records() {
            let record = record_result?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);

            let date = parse_date(field(&record, layout.date), line)?;
            let mean_temp = parse_value(field(&record, layout.mean_temp), COL_MEAN_TEMP, line)?;
            let global_radiation = parse_value(
                field(&record, layout.global_radiation),
                COL_GLOBAL_RADIATION,
                line,
            )?;

            let mut auxiliary = Vec::with_capacity(layout.auxiliary.len());
            for (slot, (idx, name)) in layout.auxiliary.iter().enumerate() {
                match parse_value(field(&record, *idx), name, line) {
                    Ok(value) => auxiliary.push(value),
                    Err(_) => {
                        non_numeric[slot] = true;
                        auxiliary.push(None);
                    }
                }
            }

            if !seen_dates.insert(date) {
                duplicate_dates += 1;
            }

            readings.push(WeatherReading {
                date,
                mean_temp,
                global_radiation,
                auxiliary,
            });
        }

        if duplicate_dates > 0 {
            warn!("{} readings share a date with an earlier reading", duplicate_dates);
        }

        let mut auxiliary_columns = Vec::new();
        let mut keep = Vec::with_capacity(layout.auxiliary.len());
        for ((_, name), skip) in layout.auxiliary.iter().zip(&non_numeric) {
            if *skip {
                warn!("Column '{}' is not numeric and will not be profiled", name);
            } else {
                auxiliary_columns.push(name.clone());
            }
            keep.push(!*skip);
        }

        if non_numeric.iter().any(|s| *s) {
            for reading in &mut readings {
                let mut flags = keep.iter();
                reading.auxiliary.retain(|_| *flags.next().unwrap_or(&false));
            }
        }

        Ok(WeatherDataset::new(readings).with_auxiliary_columns(auxiliary_columns))
    }

    fn resolve_layout(&self, headers: &StringRecord) -> Result<ColumnLayout> {
        let position = |name: &str| headers.iter().position(|h| h == name);

        let date = position(COL_DATE)
            .ok_or_else(|| DashboardError::MissingColumn(COL_DATE.to_string()))?;
        let mean_temp = position(COL_MEAN_TEMP)
            .ok_or_else(|| DashboardError::MissingColumn(COL_MEAN_TEMP.to_string()))?;
        let global_radiation = position(COL_GLOBAL_RADIATION)
            .ok_or_else(|| DashboardError::MissingColumn(COL_GLOBAL_RADIATION.to_string()))?;

        // pandas writes the index without a header name
        let index = position(self.index_column.as_str())
            .or_else(|| headers.get(0).filter(|h| h.is_empty()).map(|_| 0));

        let reserved = [Some(date), Some(mean_temp), Some(global_radiation), index];
        let auxiliary = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| !reserved.contains(&Some(*i)))
            .map(|(i, h)| (i, h.to_string()))
            .collect();

        Ok(ColumnLayout {
            date,
            mean_temp,
            global_radiation,
            index,
            auxiliary,
        })
    }
}

impl Default for WeatherReader {
    fn default() -> Self {
        Self::new()
    }
}

fn field(record: &StringRecord, idx: usize) -> &str {
    record.get(idx).unwrap_or("")
}

/// Parse a calendar date, discarding any time-of-day component
pub fn parse_date(value: &str, line: u64) -> Result<NaiveDate> {
    let value = value.trim();

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Ok(date);
        }
    }

    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(datetime.date());
        }
    }

    Err(DashboardError::DateParse {
        line,
        value: value.to_string(),
    })
}

/// Parse a numeric cell; missing markers, NaN and infinities become `None`
pub fn parse_value(value: &str, column: &str, line: u64) -> Result<Option<f64>> {
    let value = value.trim();

    if MISSING_MARKERS.contains(&value) {
        return Ok(None);
    }

    let parsed = value.parse::<f64>().map_err(|_| {
        DashboardError::InvalidFormat(format!(
            "Invalid value '{}' in column '{}' on line {}",
            value, column, line
        ))
    })?;

    Ok(parsed.is_finite().then_some(parsed))
}
