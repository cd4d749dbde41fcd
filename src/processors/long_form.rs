use crate::models::{LongFormRow, MonthlyRecord, Variable};

/// Melt wide monthly records into one row per month per variable.
///
/// Rows come out ordered by month, then by the order of `variables`. A variable
/// the record carries no mean for still produces a row, with a missing value.
pub fn to_long_form(records: &[MonthlyRecord], variables: &[Variable]) -> Vec<LongFormRow> {
    let mut rows = Vec::with_capacity(records.len() * variables.len());

    for record in records {
        for variable in variables {
            rows.push(LongFormRow {
                date: record.date,
                variable: *variable,
                value: record.mean(*variable),
            });
        }
    }

    rows
}
