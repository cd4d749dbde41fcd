pub mod analyzers;
pub mod cli;
pub mod dashboard;
pub mod error;
pub mod models;
pub mod processors;
pub mod readers;
pub mod settings;
pub mod utils;
pub mod writers;

pub use dashboard::Dashboard;
pub use error::{DashboardError, Result};
