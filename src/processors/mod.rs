pub mod date_filter;
pub mod long_form;
pub mod monthly_aggregator;
pub mod normalizer;
pub mod pipeline;

pub use date_filter::filter_by_date_range;
pub use long_form::to_long_form;
pub use monthly_aggregator::monthly_mean;
pub use normalizer::{min_max_normalize, MinMaxScale};
pub use pipeline::{AggregationPipeline, CacheStats, ChartData};
