use crate::models::{DateRange, Dated};

/// Keep the rows whose date lies in the closed interval, preserving input order.
///
/// Bounds are not validated: an inverted range simply matches nothing.
pub fn filter_by_date_range<T: Dated + Clone>(rows: &[T], range: DateRange) -> Vec<T> {
    if range.is_empty() {
        return Vec::new();
    }

    rows.iter()
        .filter(|row| range.contains(row.date()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WeatherReading;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn readings() -> Vec<WeatherReading> {
        vec![
            WeatherReading::new(date(2020, 1, 15), Some(5.0), Some(50.0)),
            WeatherReading::new(date(2020, 1, 1), Some(0.0), Some(0.0)),
            WeatherReading::new(date(2020, 2, 1), Some(10.0), Some(100.0)),
        ]
    }

    #[test]
    fn test_filter_inclusive_bounds() {
        let filtered = filter_by_date_range(
            &readings(),
            DateRange::new(date(2020, 1, 1), date(2020, 1, 15)),
        );

        let dates: Vec<NaiveDate> = filtered.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![date(2020, 1, 15), date(2020, 1, 1)]);
    }

    #[test]
    fn test_full_span_returns_everything() {
        let all = readings();
        let filtered = filter_by_date_range(&all, DateRange::new(date(2020, 1, 1), date(2020, 2, 1)));
        assert_eq!(filtered, all);
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let filtered = filter_by_date_range(
            &readings(),
            DateRange::new(date(2020, 2, 1), date(2020, 1, 1)),
        );
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_range_outside_data() {
        let filtered = filter_by_date_range(
            &readings(),
            DateRange::new(date(1990, 1, 1), date(1990, 12, 31)),
        );
        assert!(filtered.is_empty());
    }
}
