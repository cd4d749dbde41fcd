use crate::analyzers::{DataProfiler, ProfileReport};
use crate::error::Result;
use crate::models::{DateRange, WeatherDataset};
use crate::processors::{AggregationPipeline, CacheStats, ChartData};
use crate::readers::WeatherReader;
use crate::settings::DashboardConfig;
use crate::utils::constants::DEFAULT_CACHE_CAPACITY;
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, info};

/// State of one viewing session.
///
/// The table is shared read-only between sessions; the range cache is owned
/// by the session, so no mutable state crosses sessions. The aggregation
/// pipeline is built on the first chart request, so profiling never depends
/// on the charted columns being normalizable.
pub struct Dashboard {
    dataset: Arc<WeatherDataset>,
    pipeline: Option<AggregationPipeline>,
    cache_capacity: usize,
    bounds: DateRange,
}

impl Dashboard {
    pub fn new(dataset: Arc<WeatherDataset>) -> Result<Self> {
        let bounds = dataset.require_date_bounds()?.into();

        Ok(Self {
            dataset,
            pipeline: None,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            bounds,
        })
    }

    /// Load the configured input file and open a session on it
    pub fn from_config(config: &DashboardConfig) -> Result<Self> {
        let dataset = WeatherReader::new()
            .with_index_column(&config.index_column)
            .with_delimiter(config.delimiter_byte()?)
            .read_dataset(&config.input_path)?;

        Ok(Self::new(Arc::new(dataset))?.with_cache_capacity(config.cache_capacity))
    }

    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self.pipeline = self
            .pipeline
            .take()
            .map(|pipeline| pipeline.with_cache_capacity(capacity));
        self
    }

    pub fn dataset(&self) -> &WeatherDataset {
        &self.dataset
    }

    /// Earliest and latest dates in the table; the limits of both date pickers
    pub fn date_bounds(&self) -> DateRange {
        self.bounds
    }

    /// Resolve picker input: unset bounds default to the data bounds, and
    /// both bounds are clamped into them. The order is not corrected.
    pub fn select_range(&self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> DateRange {
        DateRange::new(
            start.unwrap_or(self.bounds.start),
            end.unwrap_or(self.bounds.end),
        )
        .clamp_to(self.bounds.start, self.bounds.end)
    }

    /// Chart data for a range. Fails only when a charted column cannot be
    /// normalized; an empty or inverted range gives empty data.
    pub fn chart(&mut self, range: DateRange) -> Result<Arc<ChartData>> {
        let pipeline = match self.pipeline.take() {
            Some(pipeline) => pipeline,
            None => AggregationPipeline::for_dataset(&self.dataset)?
                .with_cache_capacity(self.cache_capacity),
        };
        let pipeline = self.pipeline.insert(pipeline);

        let data = pipeline.run(range);
        info!(
            "Chart for {}: {} months from {} readings",
            range,
            data.monthly.len(),
            data.matched_readings
        );
        debug!("{} ranges cached", pipeline.cached_ranges());
        Ok(data)
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.pipeline
            .as_ref()
            .map(|p| p.cache_stats())
            .unwrap_or_default()
    }

    /// Profile the full table; the chart range never applies here
    pub fn profile(&self, profiler: &DataProfiler) -> Result<ProfileReport> {
        profiler.profile(&self.dataset)
    }

    pub fn profile_range(&self, profiler: &DataProfiler, range: DateRange) -> Result<ProfileReport> {
        profiler.profile_range(&self.dataset, range)
    }
}
