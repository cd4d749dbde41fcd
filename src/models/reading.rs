use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{DashboardError, Result};
use crate::utils::constants::{COL_GLOBAL_RADIATION, COL_MEAN_TEMP};

/// Numeric columns the aggregation pipeline knows how to chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variable {
    MeanTemp,
    GlobalRadiation,
}

impl Variable {
    pub const ALL: [Variable; 2] = [Variable::MeanTemp, Variable::GlobalRadiation];

    /// Column name in the input file
    pub fn column(&self) -> &'static str {
        match self {
            Variable::MeanTemp => COL_MEAN_TEMP,
            Variable::GlobalRadiation => COL_GLOBAL_RADIATION,
        }
    }

    /// Series label used once the column has been min-max normalized
    pub fn normalized_label(&self) -> &'static str {
        match self {
            Variable::MeanTemp => "mean_temp_normalized",
            Variable::GlobalRadiation => "global_radiation_normalized",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.normalized_label() == label)
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.normalized_label())
    }
}

/// Anything that belongs to a single calendar date.
pub trait Dated {
    fn date(&self) -> NaiveDate;
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReading {
    pub date: NaiveDate,
    pub mean_temp: Option<f64>,
    pub global_radiation: Option<f64>,
    /// Values of the auxiliary numeric columns, aligned with
    /// `WeatherDataset::auxiliary_columns`.
    pub auxiliary: Vec<Option<f64>>,
}

impl WeatherReading {
    pub fn new(date: NaiveDate, mean_temp: Option<f64>, global_radiation: Option<f64>) -> Self {
        Self {
            date,
            mean_temp,
            global_radiation,
            auxiliary: Vec::new(),
        }
    }

    pub fn value(&self, variable: Variable) -> Option<f64> {
        match variable {
            Variable::MeanTemp => self.mean_temp,
            Variable::GlobalRadiation => self.global_radiation,
        }
    }
}

impl Dated for WeatherReading {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

/// The full reading set, loaded once and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct WeatherDataset {
    pub readings: Vec<WeatherReading>,
    pub auxiliary_columns: Vec<String>,
}

impl WeatherDataset {
    pub fn new(readings: Vec<WeatherReading>) -> Self {
        Self {
            readings,
            auxiliary_columns: Vec::new(),
        }
    }

    pub fn with_auxiliary_columns(mut self, columns: Vec<String>) -> Self {
        self.auxiliary_columns = columns;
        self
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Earliest and latest date in the table, which bound the date pickers.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.readings.iter().map(|r| r.date).min()?;
        let max = self.readings.iter().map(|r| r.date).max()?;
        Some((min, max))
    }

    pub fn require_date_bounds(&self) -> Result<(NaiveDate, NaiveDate)> {
        self.date_bounds()
            .ok_or_else(|| DashboardError::InvalidFormat("Dataset contains no readings".to_string()))
    }

    pub fn column(&self, variable: Variable) -> Vec<Option<f64>> {
        self.readings.iter().map(|r| r.value(variable)).collect()
    }

    /// Every numeric column by name, charted variables first.
    pub fn numeric_columns(&self) -> Vec<(String, Vec<Option<f64>>)> {
        let mut columns: Vec<(String, Vec<Option<f64>>)> = Variable::ALL
            .iter()
            .map(|v| (v.column().to_string(), self.column(*v)))
            .collect();

        for (idx, name) in self.auxiliary_columns.iter().enumerate() {
            let values = self
                .readings
                .iter()
                .map(|r| r.auxiliary.get(idx).copied().flatten())
                .collect();
            columns.push((name.clone(), values));
        }

        columns
    }

    /// Observed (min, max) of a column over its present values.
    pub fn value_range(&self, variable: Variable) -> Option<(f64, f64)> {
        self.readings
            .iter()
            .filter_map(|r| r.value(variable))
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_variable_labels() {
        assert_eq!(Variable::MeanTemp.column(), "mean_temp");
        assert_eq!(Variable::GlobalRadiation.normalized_label(), "global_radiation_normalized");
        assert_eq!(Variable::from_label("cloud_cover"), None);
        assert_eq!(Variable::from_label("mean_temp_normalized"), Some(Variable::MeanTemp));
    }

    #[test]
    fn test_date_bounds_unsorted() {
        let dataset = WeatherDataset::new(vec![
            WeatherReading::new(date(2020, 3, 1), Some(1.0), None),
            WeatherReading::new(date(2019, 12, 31), None, Some(4.0)),
            WeatherReading::new(date(2020, 1, 15), Some(2.0), Some(3.0)),
        ]);

        assert_eq!(dataset.date_bounds(), Some((date(2019, 12, 31), date(2020, 3, 1))));
        assert_eq!(dataset.value_range(Variable::MeanTemp), Some((1.0, 2.0)));
        assert_eq!(dataset.value_range(Variable::GlobalRadiation), Some((3.0, 4.0)));
    }

    #[test]
    fn test_empty_dataset_has_no_bounds() {
        let dataset = WeatherDataset::default();
        assert!(dataset.date_bounds().is_none());
        assert!(dataset.require_date_bounds().is_err());
    }

    #[test]
    fn test_numeric_columns_include_auxiliary() {
        let mut reading = WeatherReading::new(date(2020, 1, 1), Some(5.0), Some(50.0));
        reading.auxiliary = vec![Some(7.0)];
        let dataset = WeatherDataset::new(vec![reading])
            .with_auxiliary_columns(vec!["cloud_cover".to_string()]);

        let columns = dataset.numeric_columns();
        let names: Vec<&str> = columns.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["mean_temp", "global_radiation", "cloud_cover"]);
        assert_eq!(columns[2].1, vec![Some(7.0)]);
    }
}
