use crate::error::Result;
use crate::models::{DateRange, LongFormRow, MonthlyRecord, NormalizedRow, Variable, WeatherDataset};
use crate::processors::date_filter::filter_by_date_range;
use crate::processors::long_form::to_long_form;
use crate::processors::monthly_aggregator::monthly_mean;
use crate::processors::normalizer::MinMaxScale;
use crate::utils::constants::DEFAULT_CACHE_CAPACITY;
use hashlink::LruCache;
use std::sync::Arc;
use tracing::debug;

/// Everything needed to draw one chart for one date range.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub range: DateRange,
    pub variables: Vec<Variable>,
    /// Rows of the table that fell inside the range
    pub matched_readings: usize,
    pub monthly: Vec<MonthlyRecord>,
    pub rows: Vec<LongFormRow>,
}

impl ChartData {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Points of one series, in month order, skipping months without a value
    pub fn series(&self, variable: Variable) -> Vec<(chrono::NaiveDate, f64)> {
        self.rows
            .iter()
            .filter(|r| r.variable == variable)
            .filter_map(|r| r.value.map(|v| (r.date, v)))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// Normalize once, then filter, group and melt per requested range.
///
/// Normalization runs over the full columns, so it does not depend on the
/// range and is computed at construction. The remaining stages are recomputed
/// for each new range; results are memoized in an LRU keyed by range unless
/// the cache capacity is zero.
pub struct AggregationPipeline {
    variables: Vec<Variable>,
    normalized: Vec<NormalizedRow>,
    cache: Option<LruCache<DateRange, Arc<ChartData>>>,
    stats: CacheStats,
}

impl AggregationPipeline {
    pub fn new(dataset: &WeatherDataset, variables: &[Variable]) -> Result<Self> {
        let mut columns = Vec::with_capacity(variables.len());

        for variable in variables {
            let values = dataset.column(*variable);
            let scale = MinMaxScale::fit(variable.column(), &values)?;
            debug!(
                "Normalizing {} over [{}, {}]",
                variable.column(),
                scale.min,
                scale.max
            );
            columns.push(scale.transform(&values));
        }

        let normalized = dataset
            .readings
            .iter()
            .enumerate()
            .map(|(i, reading)| NormalizedRow {
                date: reading.date,
                values: columns.iter().map(|c| c[i]).collect(),
            })
            .collect();

        Ok(Self {
            variables: variables.to_vec(),
            normalized,
            cache: Some(LruCache::new(DEFAULT_CACHE_CAPACITY)),
            stats: CacheStats::default(),
        })
    }

    /// Pipeline over both charted variables
    pub fn for_dataset(dataset: &WeatherDataset) -> Result<Self> {
        Self::new(dataset, &Variable::ALL)
    }

    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache = if capacity == 0 {
            None
        } else {
            Some(LruCache::new(capacity))
        };
        self
    }

    pub fn normalized_rows(&self) -> &[NormalizedRow] {
        &self.normalized
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.stats
    }

    pub fn cached_ranges(&self) -> usize {
        self.cache.as_ref().map_or(0, |c| c.len())
    }

    /// Chart data for a range, served from the cache when possible
    pub fn run(&mut self, range: DateRange) -> Arc<ChartData> {
        if let Some(cache) = self.cache.as_mut() {
            if let Some(hit) = cache.get(&range) {
                let hit = Arc::clone(hit);
                self.stats.hits += 1;
                debug!("Cache hit for {}", range);
                return hit;
            }
        }

        self.stats.misses += 1;
        let data = Arc::new(self.compute(range));

        if let Some(cache) = self.cache.as_mut() {
            cache.insert(range, Arc::clone(&data));
        }

        data
    }

    /// Run every stage for a range without touching the cache
    pub fn compute(&self, range: DateRange) -> ChartData {
        let filtered = filter_by_date_range(&self.normalized, range);
        let monthly = monthly_mean(&filtered, &self.variables);
        let rows = to_long_form(&monthly, &self.variables);

        debug!(
            "Range {}: {} readings, {} months, {} chart rows",
            range,
            filtered.len(),
            monthly.len(),
            rows.len()
        );

        ChartData {
            range,
            variables: self.variables.clone(),
            matched_readings: filtered.len(),
            monthly,
            rows,
        }
    }
}
