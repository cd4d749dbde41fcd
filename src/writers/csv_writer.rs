use crate::error::Result;
use crate::models::{LongFormRow, MonthlyRecord};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tracing::info;

#[derive(Debug, Serialize)]
struct LongFormCsvRow<'a> {
    date: String,
    variable: &'a str,
    value: Option<f64>,
}

/// Writes chart data as delimited text
pub struct CsvWriter {
    delimiter: u8,
}

impl CsvWriter {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Long-form rows, one line per month per variable
    pub fn write_long_form(&self, rows: &[LongFormRow], path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)?;
        self.write_long_form_to(rows, file)?;
        info!("Wrote {} chart rows to {}", rows.len(), path.display());
        Ok(())
    }

    pub fn write_long_form_to<W: Write>(&self, rows: &[LongFormRow], sink: W) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(sink);

        for row in rows {
            writer.serialize(LongFormCsvRow {
                date: row.date.format("%Y-%m-%d").to_string(),
                variable: row.variable.normalized_label(),
                value: row.value,
            })?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Wide monthly table: one line per month, one column per variable
    pub fn write_monthly_to<W: Write>(&self, records: &[MonthlyRecord], sink: W) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(sink);

        if let Some(first) = records.first() {
            let mut header = vec!["date".to_string(), "readings".to_string()];
            header.extend(first.means.iter().map(|(v, _)| v.normalized_label().to_string()));
            writer.write_record(&header)?;
        }

        for record in records {
            let mut line = vec![record.date.format("%Y-%m-%d").to_string(), record.readings.to_string()];
            line.extend(
                record
                    .means
                    .iter()
                    .map(|(_, m)| m.map(|v| v.to_string()).unwrap_or_default()),
            );
            writer.write_record(&line)?;
        }

        writer.flush()?;
        Ok(())
    }
}

impl Default for CsvWriter {
    fn default() -> Self {
        Self::new()
    }
}
