pub mod profiler;

pub use profiler::{
    ColumnProfile, CorrelationMatrix, DataProfiler, HistogramBin, Percentiles, ProfileReport,
};
