use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read alliances file '{}'", path.display())]
    InputRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Alliances file '{}' is not valid JSON", path.display())]
    InputParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Unknown airline code '{iata}' listed by alliance '{alliance}'")]
    UnknownAirline { alliance: String, iata: String },

    #[error("Store error: {message}")]
    Store { message: String },

    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("{count} airline codes could not be resolved")]
    UnresolvedAirlines { count: usize },

    /// The alliance batch is already persisted when this is returned. With an
    /// ordered bulk insert, memberships ahead of the failing document may be
    /// stored too.
    #[error("Membership insert failed after {orphaned_alliances} alliances were written")]
    MembershipWrite {
        orphaned_alliances: usize,
        source: Box<ImportError>,
    },
}

pub type Result<T> = std::result::Result<T, ImportError>;
