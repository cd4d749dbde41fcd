use crate::models::{MonthlyRecord, NormalizedRow, Variable};
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
struct MonthAccumulator {
    readings: usize,
    sums: Vec<f64>,
    counts: Vec<usize>,
}

impl MonthAccumulator {
    fn new(width: usize) -> Self {
        Self {
            readings: 0,
            sums: vec![0.0; width],
            counts: vec![0; width],
        }
    }

    fn add(&mut self, values: &[Option<f64>]) {
        self.readings += 1;
        for (slot, value) in values.iter().enumerate().take(self.sums.len()) {
            if let Some(v) = value.filter(|v| !v.is_nan()) {
                self.sums[slot] += v;
                self.counts[slot] += 1;
            }
        }
    }

    fn mean(&self, slot: usize) -> Option<f64> {
        match self.counts[slot] {
            0 => None,
            n => Some(self.sums[slot] / n as f64),
        }
    }
}

/// Group rows by calendar month and average each variable over its present values.
///
/// `variables` names the slots of `NormalizedRow::values`, in order. The output
/// is sorted by month and has one record per month that has at least one row;
/// a month whose values for a variable are all missing gets a `None` mean.
pub fn monthly_mean(rows: &[NormalizedRow], variables: &[Variable]) -> Vec<MonthlyRecord> {
    let mut months: BTreeMap<(i32, u32), MonthAccumulator> = BTreeMap::new();

    for row in rows {
        months
            .entry((row.date.year(), row.date.month()))
            .or_insert_with(|| MonthAccumulator::new(variables.len()))
            .add(&row.values);
    }

    months
        .into_iter()
        .filter_map(|((year, month), acc)| {
            let date = NaiveDate::from_ymd_opt(year, month, 1)?;
            let means = variables
                .iter()
                .enumerate()
                .map(|(slot, variable)| (*variable, acc.mean(slot)))
                .collect();

            Some(MonthlyRecord {
                date,
                readings: acc.readings,
                means,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn row(date: NaiveDate, values: &[Option<f64>]) -> NormalizedRow {
        NormalizedRow {
            date,
            values: values.to_vec(),
        }
    }

    #[test]
    fn test_two_january_readings_average() {
        let rows = vec![
            row(date(2021, 1, 3), &[Some(5.0)]),
            row(date(2021, 1, 20), &[Some(7.0)]),
        ];

        let monthly = monthly_mean(&rows, &[Variable::MeanTemp]);

        assert_eq!(monthly.len(), 1);
        assert_eq!(monthly[0].date, date(2021, 1, 1));
        assert_eq!(monthly[0].readings, 2);
        assert_eq!(monthly[0].mean(Variable::MeanTemp), Some(6.0));
    }

    #[test]
    fn test_months_sorted_and_not_zero_filled() {
        let rows = vec![
            row(date(2020, 5, 2), &[Some(1.0), Some(0.0)]),
            row(date(2020, 1, 2), &[Some(0.5), Some(0.5)]),
            row(date(2019, 12, 31), &[Some(0.0), Some(1.0)]),
        ];

        let monthly = monthly_mean(&rows, &Variable::ALL);
        let dates: Vec<NaiveDate> = monthly.iter().map(|m| m.date).collect();

        assert_eq!(dates, vec![date(2019, 12, 1), date(2020, 1, 1), date(2020, 5, 1)]);
    }

    #[test]
    fn test_missing_values_skipped() {
        let rows = vec![
            row(date(2020, 3, 1), &[Some(0.2), None]),
            row(date(2020, 3, 2), &[None, None]),
            row(date(2020, 3, 3), &[Some(0.4), None]),
        ];

        let monthly = monthly_mean(&rows, &Variable::ALL);

        assert_eq!(monthly.len(), 1);
        let temp = monthly[0].mean(Variable::MeanTemp).unwrap();
        assert!((temp - 0.3).abs() < 1e-12);
        assert_eq!(monthly[0].mean(Variable::GlobalRadiation), None);
    }

    #[test]
    fn test_same_month_different_years() {
        let rows = vec![
            row(date(2019, 6, 1), &[Some(0.0)]),
            row(date(2020, 6, 1), &[Some(1.0)]),
        ];

        assert_eq!(monthly_mean(&rows, &[Variable::MeanTemp]).len(), 2);
    }

    #[test]
    fn test_empty_input() {
        assert!(monthly_mean(&[], &Variable::ALL).is_empty());
    }
}
