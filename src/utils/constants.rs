/// Input column names
pub const COL_DATE: &str = "date";
pub const COL_MEAN_TEMP: &str = "mean_temp";
pub const COL_GLOBAL_RADIATION: &str = "global_radiation";

/// Stray index column written by the cleaning step
pub const DEFAULT_INDEX_COLUMN: &str = "Unnamed: 0";

/// Default input file
pub const DEFAULT_INPUT_FILE: &str = "weather_cleaned.csv";

/// Accepted date layouts, tried in order
pub const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y%m%d"];
pub const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Cell values treated as missing
pub const MISSING_MARKERS: [&str; 6] = ["", "NA", "NaN", "nan", "null", "NULL"];

/// Chart defaults
pub const CHART_TITLE: &str = "Monthly Mean of Normalized Temperature and Global Radiation";
pub const DEFAULT_CHART_WIDTH: u32 = 1280;
pub const DEFAULT_CHART_HEIGHT: u32 = 720;

/// Pipeline defaults
pub const DEFAULT_CACHE_CAPACITY: usize = 16;

/// Profile defaults
pub const HISTOGRAM_BINS: usize = 10;
pub const REPORT_CONTAINER_HEIGHT_PX: u32 = 800;

/// Parquet defaults
pub const DEFAULT_ROW_GROUP_SIZE: usize = 10000;

/// Parquet compression options
pub const COMPRESSION_SNAPPY: &str = "snappy";
pub const COMPRESSION_GZIP: &str = "gzip";
pub const COMPRESSION_LZ4: &str = "lz4";
pub const COMPRESSION_ZSTD: &str = "zstd";
pub const COMPRESSION_NONE: &str = "none";
