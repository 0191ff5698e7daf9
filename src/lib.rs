pub mod app;
pub mod config;
pub mod error;
pub mod infra;
pub mod logging;
pub mod source;
pub mod types;

pub use app::import_use_case::{AllianceImporter, ImportPlan, ImportSummary};
pub use config::{Config, UnknownAirlinePolicy};
pub use error::{ImportError, Result};
