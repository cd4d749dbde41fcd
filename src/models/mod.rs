pub mod aggregate;
pub mod range;
pub mod reading;

pub use aggregate::{LongFormRow, MonthlyRecord, NormalizedRow};
pub use range::DateRange;
pub use reading::{Dated, Variable, WeatherDataset, WeatherReading};
