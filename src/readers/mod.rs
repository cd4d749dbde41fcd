pub mod weather_reader;

pub use weather_reader::{parse_date, parse_value, WeatherReader};
