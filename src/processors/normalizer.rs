use crate::error::{DashboardError, Result};
use serde::Serialize;

/// Observed bounds of a column, used to rescale it linearly onto [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MinMaxScale {
    pub min: f64,
    pub max: f64,
}

impl MinMaxScale {
    /// Fit the scale over the present, finite values of a column.
    ///
    /// Fails when the column has no present values or when every present
    /// value is equal, since `max - min` would be zero.
    pub fn fit(column: &str, values: &[Option<f64>]) -> Result<Self> {
        let (min, max) = values
            .iter()
            .flatten()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<(f64, f64)>, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
            .ok_or_else(|| DashboardError::Normalization {
                column: column.to_string(),
                reason: "column has no values".to_string(),
            })?;

        if max == min {
            return Err(DashboardError::Normalization {
                column: column.to_string(),
                reason: format!("zero variance (every value is {})", min),
            });
        }

        Ok(Self { min, max })
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn apply(&self, value: f64) -> f64 {
        (value - self.min) / self.span()
    }

    pub fn transform(&self, values: &[Option<f64>]) -> Vec<Option<f64>> {
        values
            .iter()
            .map(|v| v.filter(|x| x.is_finite()).map(|x| self.apply(x)))
            .collect()
    }
}

/// Min-max normalize a column; missing and non-finite values stay missing.
pub fn min_max_normalize(column: &str, values: &[Option<f64>]) -> Result<Vec<Option<f64>>> {
    Ok(MinMaxScale::fit(column, values)?.transform(values))
}
