use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::reading::{Dated, Variable};

/// A reading after min-max normalization, values aligned with the pipeline's variables.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRow {
    pub date: NaiveDate,
    pub values: Vec<Option<f64>>,
}

impl Dated for NormalizedRow {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

/// Per-month means, one slot per requested variable.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyRecord {
    /// First day of the month
    pub date: NaiveDate,
    pub readings: usize,
    pub means: Vec<(Variable, Option<f64>)>,
}

impl MonthlyRecord {
    pub fn mean(&self, variable: Variable) -> Option<f64> {
        self.means
            .iter()
            .find(|(v, _)| *v == variable)
            .and_then(|(_, m)| *m)
    }
}

/// One (month, variable) observation of the melted table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LongFormRow {
    pub date: NaiveDate,
    pub variable: Variable,
    pub value: Option<f64>,
}

impl Dated for LongFormRow {
    fn date(&self) -> NaiveDate {
        self.date
    }
}
